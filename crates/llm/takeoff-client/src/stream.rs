//! Decoding of `/generate_stream` bodies into text fragments.
//!
//! The server writes either SSE events whose `data:` lines carry raw tokens, or JSON lines
//! with a `text` field. The format is fixed by the first non-blank line of the body. SSE
//! data lines of one event are joined with `\n` and emitted at the blank line that ends the
//! event. Bytes are buffered across chunk boundaries; a trailing line or unterminated event
//! is flushed when the body ends.

use std::collections::VecDeque;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use serde::Deserialize;

use crate::error::{Result, TakeoffError};

/// Lazy, non-restartable sequence of generated text fragments.
///
/// Dropping it drops the underlying response body, which closes the connection.
pub type TextStream = BoxStream<'static, Result<String>>;

const END_OF_SEQUENCE: &str = "</s>";

#[derive(Deserialize)]
struct Fragment {
    text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Sse,
    JsonLines,
}

/// Incremental decoder for streamed generation output.
#[derive(Debug, Default)]
pub struct FragmentDecoder {
    buffer: Vec<u8>,
    format: Option<Format>,
    event_data: Option<String>,
}

impl FragmentDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns the fragments it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut fragments = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..pos]).into_owned();
            fragments.extend(self.decode_line(&line));
        }
        fragments
    }

    /// Flushes whatever is left once the body has ended.
    pub fn finish(&mut self) -> Vec<String> {
        let mut fragments = Vec::new();
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&line).into_owned();
            fragments.extend(self.decode_line(&line));
        }
        fragments.extend(self.dispatch_event());
        fragments
    }

    fn decode_line(&mut self, line: &str) -> Option<String> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let format = match self.format {
            Some(format) => format,
            None if line.trim().is_empty() => return None,
            None => {
                let format = if line.trim_start().starts_with('{') {
                    Format::JsonLines
                } else {
                    Format::Sse
                };
                self.format = Some(format);
                format
            }
        };
        match format {
            Format::JsonLines => decode_json_line(line),
            Format::Sse => self.decode_sse_line(line),
        }
    }

    fn decode_sse_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch_event();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        if field == "data" {
            match self.event_data.as_mut() {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => self.event_data = Some(value.to_string()),
            }
        }
        None
    }

    fn dispatch_event(&mut self) -> Option<String> {
        let data = self.event_data.take()?;
        non_empty(data.replace(END_OF_SEQUENCE, ""))
    }
}

fn decode_json_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let fragment: Fragment = serde_json::from_str(line).ok()?;
    non_empty(fragment.text.replace(END_OF_SEQUENCE, ""))
}

fn non_empty(token: String) -> Option<String> {
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

struct StreamState {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: FragmentDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

/// Wraps a successful streaming response as a [`TextStream`].
pub(crate) fn text_stream(response: reqwest::Response) -> TextStream {
    let state = StreamState {
        body: response.bytes_stream().boxed(),
        decoder: FragmentDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.pending.pop_front() {
                return Some((Ok(fragment), state));
            }
            if state.finished {
                return None;
            }
            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let fragments = state.decoder.push(&chunk);
                    state.pending.extend(fragments);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(TakeoffError::Transport(e)), state));
                }
                None => {
                    state.finished = true;
                    let rest = state.decoder.finish();
                    state.pending.extend(rest);
                }
            }
        }
    })
    .boxed()
}

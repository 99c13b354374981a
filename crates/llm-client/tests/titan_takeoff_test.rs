//! Integration tests for [`llm_client::TitanTakeoff`] and [`llm_client::TitanTakeoffPro`].
//!
//! Both variants are exercised in streaming and non-streaming mode against local mock
//! servers: reader provisioning on the management port, `/generate` or `/generate_stream`
//! on the inference port, and error statuses.

use futures::TryStreamExt;
use llm_client::{ClientConfig, LlmClient, ProOptions, TitanTakeoff, TitanTakeoffPro};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use takeoff_client::{Device, ReaderConfig, SamplingParams, TakeoffError};

const PROMPT: &str = "What is 2 + 2?";

#[derive(Clone, Copy, Debug)]
enum Variant {
    Basic,
    Pro,
}

const CASES: &[(Variant, bool)] = &[
    (Variant::Basic, false),
    (Variant::Basic, true),
    (Variant::Pro, false),
    (Variant::Pro, true),
];

fn host(server: &ServerGuard) -> String {
    format!("http://{}", server.socket_address().ip())
}

fn port(server: &ServerGuard) -> u16 {
    server.socket_address().port()
}

async fn build(variant: Variant, config: ClientConfig) -> Result<Box<dyn LlmClient>, TakeoffError> {
    Ok(match variant {
        Variant::Basic => Box::new(TitanTakeoff::new(config).await?),
        Variant::Pro => Box::new(TitanTakeoffPro::new(config).await?),
    })
}

fn generation_path(streaming: bool) -> &'static str {
    if streaming {
        "/generate_stream"
    } else {
        "/generate"
    }
}

fn reader(name: &str) -> ReaderConfig {
    ReaderConfig::new(name)
        .with_device(Device::Cpu)
        .with_consumer_group("primary")
        .with_max_sequence_length(512)
        .with_max_batch_size(4)
        .with_tensor_parallel(3)
}

/// **Test: `call` and `invoke` send the same request and return the same text.**
///
/// **Setup:** No readers; mock answers on `/generate` (static reply) or `/generate_stream`
/// (echo of the prompt) depending on `streaming`.
///
/// **Expected:** Each form hits the selected endpoint once with `{"text": prompt}`; both
/// return identical strings. In streaming mode an extra `stream` call hits the same
/// endpoint once more and its fragments concatenate to the echoed prompt.
#[tokio::test]
async fn test_titan_takeoff_call() {
    for &(variant, streaming) in CASES {
        let mut server = Server::new_async().await;
        let reply = if streaming {
            json!({ "text": PROMPT }).to_string()
        } else {
            json!({ "text": "ask someone else" }).to_string()
        };
        let calls = if streaming { 3 } else { 2 };
        let mock = server
            .mock("POST", generation_path(streaming))
            .match_body(Matcher::Json(json!({ "text": PROMPT })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply)
            .expect(calls)
            .create_async()
            .await;
        let other = server
            .mock("POST", generation_path(!streaming))
            .expect(0)
            .create_async()
            .await;

        let config = ClientConfig::default()
            .with_base_url(host(&server))
            .with_port(port(&server))
            .with_streaming(streaming);
        let llm = build(variant, config).await.expect("build");

        let via_call = llm.call(PROMPT).await.expect("call");
        let via_invoke = llm.invoke(PROMPT).await.expect("invoke");
        assert_eq!(via_call, via_invoke, "{:?} streaming={}", variant, streaming);
        if streaming {
            assert_eq!(via_invoke, PROMPT);
            let fragments: Vec<String> = llm
                .stream(PROMPT)
                .await
                .expect("stream")
                .try_collect()
                .await
                .expect("fragments");
            assert_eq!(fragments.concat(), PROMPT);
        } else {
            assert_eq!(via_invoke, "ask someone else");
        }

        mock.assert_async().await;
        other.assert_async().await;
    }
}

/// **Test: A 400 from the generation endpoint is an InferenceServer error.**
///
/// **Expected:** Exactly one request recorded, with `{"text": prompt}`; the error carries
/// status 400 and the server payload.
#[tokio::test]
async fn test_titan_takeoff_bad_call() {
    for &(variant, streaming) in CASES {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", generation_path(streaming))
            .match_body(Matcher::Json(json!({ "text": PROMPT })))
            .with_status(400)
            .with_body(r#"{"text": "bad things"}"#)
            .expect(1)
            .create_async()
            .await;

        let config = ClientConfig::default()
            .with_base_url(host(&server))
            .with_port(port(&server))
            .with_streaming(streaming);
        let llm = build(variant, config).await.expect("build");

        let err = llm.call(PROMPT).await.unwrap_err();
        match err {
            TakeoffError::InferenceServer { status, body } => {
                assert_eq!(status, 400);
                assert_eq!(body, r#"{"text": "bad things"}"#);
            }
            other => panic!("unexpected error for {:?}: {:?}", variant, other),
        }
        mock.assert_async().await;
    }
}

/// **Test: Readers are provisioned in order before the first generation.**
///
/// **Setup:** Management and inference on separate mock servers; readers `test`, `test2`.
///
/// **Expected:** Three calls in total: two `/reader` (one per reader, bodies equal to the
/// configs) and one `/generate` with the prompt. No management call during generate.
#[tokio::test]
async fn test_titan_takeoff_model_initialisation() {
    for variant in [Variant::Basic, Variant::Pro] {
        let mut mgmt = Server::new_async().await;
        let mut inference = Server::new_async().await;

        let reader_1 = reader("test");
        let reader_2 = reader("test2");
        let mgmt_1 = mgmt
            .mock("POST", "/reader")
            .match_body(Matcher::Json(serde_json::to_value(&reader_1).unwrap()))
            .with_status(201)
            .with_body(r#"{"key": "value"}"#)
            .expect(1)
            .create_async()
            .await;
        let mgmt_2 = mgmt
            .mock("POST", "/reader")
            .match_body(Matcher::Json(serde_json::to_value(&reader_2).unwrap()))
            .with_status(201)
            .with_body(r#"{"key": "value"}"#)
            .expect(1)
            .create_async()
            .await;
        let generate = inference
            .mock("POST", "/generate")
            .match_body(Matcher::Json(json!({ "text": PROMPT })))
            .with_status(200)
            .with_body(r#"{"text": "value"}"#)
            .expect(1)
            .create_async()
            .await;

        let config = ClientConfig::default()
            .with_base_url(host(&inference))
            .with_port(port(&inference))
            .with_mgmt_port(port(&mgmt))
            .with_models(vec![reader_1, reader_2]);
        let llm = build(variant, config).await.expect("build");

        mgmt_1.assert_async().await;
        mgmt_2.assert_async().await;

        let output = llm.call(PROMPT).await.expect("call");
        assert_eq!(output, "value");

        mgmt_1.assert_async().await;
        mgmt_2.assert_async().await;
        generate.assert_async().await;
    }
}

/// **Test: A rejected reader aborts construction and nothing after it is sent.**
#[tokio::test]
async fn test_titan_takeoff_provisioning_failure() {
    let mut mgmt = Server::new_async().await;
    let first = mgmt
        .mock("POST", "/reader")
        .match_body(Matcher::PartialJson(json!({ "model_name": "test" })))
        .with_status(503)
        .with_body("busy")
        .expect(1)
        .create_async()
        .await;
    let second = mgmt
        .mock("POST", "/reader")
        .match_body(Matcher::PartialJson(json!({ "model_name": "test2" })))
        .with_status(201)
        .expect(0)
        .create_async()
        .await;

    let config = ClientConfig::default()
        .with_base_url(host(&mgmt))
        .with_mgmt_port(port(&mgmt))
        .with_models(vec![reader("test"), reader("test2")]);
    let err = TitanTakeoff::new(config).await.unwrap_err();
    assert!(matches!(
        err,
        TakeoffError::Provisioning { ref model_name, status: 503, .. } if model_name == "test"
    ));

    first.assert_async().await;
    second.assert_async().await;
}

/// **Test: Pro options are added to the generation body.**
#[tokio::test]
async fn test_titan_takeoff_pro_options() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .match_body(Matcher::Json(json!({
            "text": PROMPT,
            "consumer_group": "fast",
            "generate_max_length": 64,
            "sampling_temperature": 0.5,
        })))
        .with_status(200)
        .with_body(r#"{"text": "4"}"#)
        .expect(1)
        .create_async()
        .await;

    let config = ClientConfig::default()
        .with_base_url(host(&server))
        .with_port(port(&server));
    let llm = TitanTakeoffPro::new(config)
        .await
        .expect("build")
        .with_options(ProOptions {
            consumer_group: Some("fast".to_string()),
            sampling: SamplingParams {
                generate_max_length: Some(64),
                sampling_temperature: Some(0.5),
                ..Default::default()
            },
        });

    assert_eq!(llm.invoke(PROMPT).await.expect("invoke"), "4");
    mock.assert_async().await;
}

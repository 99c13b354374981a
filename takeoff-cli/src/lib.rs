//! # takeoff-cli
//!
//! Command-line front end for a Titan Takeoff server: argument parsing, config loading,
//! logging setup and the `generate`, `stream` and `embed` commands.

pub mod cli;
pub mod commands;
pub mod logger;

pub use cli::{Cli, Commands, ServerArgs};
pub use commands::run;
pub use logger::init_tracing;

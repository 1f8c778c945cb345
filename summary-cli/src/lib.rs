//! # summary-cli
//!
//! CLI host for the summary-memory pipeline: argument parsing, logging init and
//! command handlers over a SQLite message store.

pub mod cli;
pub mod commands;
pub mod logger;

pub use cli::{Cli, Commands, QueryArgs};
pub use logger::init_tracing;

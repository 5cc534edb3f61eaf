//! taskbot - to-do tracking bot library
//!
//! Users add tasks, complete them for points, climb rank tiers and earn a
//! reward role once their points reach a threshold.
//!
//! # Module Organization
//!
//! - `store`: user id → record mapping persisted as one JSON document
//! - `format`: progress bar and rank helpers
//! - `commands`: one handler per user-facing command
//! - `notifier`: reward role grants after completions
//! - `platform`: invocation identity, replies and the `Guild` trait
//! - `guild`: file-backed `Guild` for local runs
//! - `cli`: clap front end acting as the dispatcher
//! - `config`: `.taskbot.toml` loading
//! - `lock`: file locking and atomic writes
//! - `output`: reply and error rendering
//! - `error`: error types and exit codes

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod guild;
pub mod lock;
pub mod notifier;
pub mod output;
pub mod platform;
pub mod store;

pub use error::{Error, Result};

//! Command-line front end for the bot dashboard.
//!
//! Wires the API client, the state store and the controller together and
//! exposes them through a small CLI:
//! - `watch`: live view-model in the log
//! - `snapshot`: one-shot view-model as JSON
//! - `start-bot` / `stop-bot` / `delete-bot`: bot lifecycle actions

pub mod app;
pub mod cli;
pub mod config;
pub mod error;

pub use app::{Application, ViewSummary};
pub use cli::{Cli, Command, StartBotArgs};
pub use config::AppConfig;
pub use error::{AppError, AppResult};

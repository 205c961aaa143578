//! AlfaPilot: an AI business assistant for small businesses.
//!
//! Marketing posts, document drafting, contract review, financial analysis
//! and meeting summaries behind a per-user conversation, served over HTTP
//! or in the terminal.

pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod db;
pub mod errors;
pub mod history;
pub mod llm;
pub mod schema;
pub mod tasks;
pub mod utils;

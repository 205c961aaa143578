mod demo;
mod error;
mod format_validator;
mod llm_client;
mod message;
pub mod providers;

pub use demo::*;
pub use error::*;
pub use format_validator::*;
pub use llm_client::*;
pub use message::*;
pub use providers::LlmProvider;

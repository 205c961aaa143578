//! Task kinds, their typed inputs and results, and the service that runs them.

mod fallback;
mod kind;
pub mod normalizer;
pub mod prompt;
mod request;
mod result;
mod service;

pub use fallback::fallback;
pub use kind::*;
pub use normalizer::normalize;
pub use prompt::Prompt;
pub use request::*;
pub use result::*;
pub use service::*;

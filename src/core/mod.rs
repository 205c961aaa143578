mod controller;
pub mod render;
mod reply;
mod session;
mod session_store;
mod step;

pub use controller::*;
pub use reply::*;
pub use session::*;
pub use session_store::*;
pub use step::*;

//! Terminal UI: snapshot rendering, stdin input reader, and the session event loop.

pub mod input;
pub mod render;
pub mod session;

pub use session::Session;

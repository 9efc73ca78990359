//! The HTTP request/response pairs handed to us by the execution engine,
//! and the textual renderings of them used throughout output management.

mod render;
mod types;

// Re-export all public symbols
pub use render::*;
pub use types::*;

//! Chat session model, persistence port and prompt assembly.

pub mod prompt;
pub mod session;
pub mod store;

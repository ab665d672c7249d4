//! HTTP layer for Ladle.
//!
//! Axum server exposing the streaming chat endpoint, the upload endpoint and
//! a health check, with permissive CORS so the widget can be embedded on any
//! origin.

pub mod error;
pub mod handlers;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;

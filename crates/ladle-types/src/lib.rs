//! Shared domain types for Ladle.
//!
//! This crate contains the types shared by the chat endpoint, the upstream
//! client and the widget core: messages and sessions, the wire event
//! protocol, upstream request/error shapes, knowledge-base records, the upload
//! contract and configuration.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod knowledge;
pub mod llm;
pub mod upload;
pub mod widget;

//! Chat pipeline and widget core for Ladle.
//!
//! This crate defines the ports (traits) that the infrastructure layer
//! implements -- upstream provider, content source, media store, chat
//! transport, session store -- and the logic built on them: session
//! operations, the knowledge-context builder, the upstream stream adapter,
//! the wire protocol codec and the widget state machine. It depends only on
//! `ladle-types`, never on `ladle-infra` or any HTTP crate.

pub mod chat;
pub mod knowledge;
pub mod llm;
pub mod protocol;
pub mod upload;
pub mod widget;

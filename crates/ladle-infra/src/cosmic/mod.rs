//! Cosmic headless CMS client.
//!
//! One [`CosmicClient`] serves three ports: the streamed AI text endpoint
//! ([`UpstreamProvider`](ladle_core::llm::provider::UpstreamProvider)), the
//! object collections feeding the knowledge context
//! ([`ContentSource`](ladle_core::knowledge::source::ContentSource)) and the
//! media library ([`MediaStore`](ladle_core::upload::MediaStore)).

pub mod client;
pub mod media;
pub mod objects;
pub mod streaming;
pub mod types;

pub use client::{CosmicClient, CosmicError};

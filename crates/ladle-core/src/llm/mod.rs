//! Upstream text-generation abstractions for Ladle.
//!
//! - `UpstreamProvider`: RPITIT trait for concrete provider clients
//! - `BoxUpstreamProvider`: object-safe wrapper for dynamic dispatch
//! - `StreamAdapter`: context injection and timeouts around a provider

pub mod adapter;
pub mod box_provider;
pub mod provider;

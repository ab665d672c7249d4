//! Infrastructure implementations for Ladle.
//!
//! Implements the ports defined in `ladle-core`: the Cosmic client (upstream
//! provider, content source, media store), the HTTP chat transport used by
//! the terminal widget and the JSON-file session store. Also loads
//! configuration and resolves the data directory.

pub mod config;
pub mod cosmic;
pub mod filesystem;
pub mod storage;
pub mod transport;

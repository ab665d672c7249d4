//! Knowledge-base context for grounding chat answers.
//!
//! - `ContentSource`: RPITIT port for fetching recipes, categories, authors
//!   and reviews from the content provider
//! - `BoxContentSource`: object-safe wrapper for dynamic dispatch
//! - `context`: concurrent gathering and deterministic rendering

pub mod context;
pub mod source;

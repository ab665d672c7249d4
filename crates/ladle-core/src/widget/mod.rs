//! Rendering-agnostic chat widget core.
//!
//! - `ChatTransport`: port to the chat and upload endpoints
//! - `WidgetRenderer`: notifications for whatever draws the widget
//! - `turn`: consumes one streamed reply
//! - `ChatWidget`: owns the session and drives turns

pub mod controller;
pub mod renderer;
pub mod transport;
pub mod turn;

pub use controller::{APOLOGY_MESSAGE, ChatWidget, WidgetError, WidgetEvent};
pub use renderer::WidgetRenderer;
pub use transport::{ByteStream, ChatTransport};
pub use turn::TurnError;

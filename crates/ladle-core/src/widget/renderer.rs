use ladle_types::chat::ChatMessage;
use ladle_types::widget::WidgetState;

/// Receives widget changes for display.
///
/// Every method has a no-op default, so `()` is a complete headless
/// renderer and adapters override only what they draw.
pub trait WidgetRenderer: Send {
    fn state_changed(&mut self, _state: WidgetState) {}

    fn sending_changed(&mut self, _sending: bool) {}

    /// The committed transcript changed (append or clear).
    fn transcript_changed(&mut self, _messages: &[ChatMessage]) {}

    /// The streaming placeholder changed. Content is the full reply so far,
    /// not a delta. `None` means the placeholder was removed.
    fn streaming_changed(&mut self, _placeholder: Option<&ChatMessage>) {}
}

impl WidgetRenderer for () {}

//! Terminal `WidgetRenderer`.
//!
//! Streaming uses the full-replace model: each update carries the whole
//! reply so far, and the renderer prints only the part not yet on screen.
//! When the reply is committed and differs from what was streamed (the
//! apology after a failure), the committed text is printed instead.

use std::io::Write;

use console::style;

use ladle_core::widget::WidgetRenderer;
use ladle_types::chat::{ChatMessage, MessageRole};
use ladle_types::widget::WidgetState;

pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    title: String,
    /// Reply text already printed for the current turn.
    streamed: String,
    transcript_len: usize,
}

impl TerminalRenderer<std::io::Stdout> {
    pub fn stdout(title: impl Into<String>) -> Self {
        Self::new(std::io::stdout(), title)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W, title: impl Into<String>) -> Self {
        Self {
            out,
            title: title.into(),
            streamed: String::new(),
            transcript_len: 0,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print every committed message.
    pub fn print_transcript(&mut self, messages: &[ChatMessage]) {
        for message in messages {
            self.print_message(message);
        }
        let _ = self.out.flush();
    }

    fn print_message(&mut self, message: &ChatMessage) {
        let label = match message.role {
            MessageRole::User => style("You").green().bold(),
            MessageRole::Assistant => style("Chef").magenta().bold(),
        };
        let _ = writeln!(self.out, "  {label}  {}", message.content);
    }
}

impl<W: Write + Send> WidgetRenderer for TerminalRenderer<W> {
    fn state_changed(&mut self, state: WidgetState) {
        let line = match state {
            WidgetState::Open => format!("  {} {}", style("▲").cyan(), style(&self.title).bold()),
            WidgetState::Minimized => format!(
                "  {} {}",
                style("▼").dim(),
                style("chat minimized (/toggle to open)").dim()
            ),
        };
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }

    fn sending_changed(&mut self, sending: bool) {
        if sending {
            self.streamed.clear();
            let _ = write!(self.out, "  {}  ", style("Chef").magenta().bold());
            let _ = self.out.flush();
        }
    }

    fn transcript_changed(&mut self, messages: &[ChatMessage]) {
        let previous = std::mem::replace(&mut self.transcript_len, messages.len());

        if messages.len() < previous || previous == 0 {
            // Fresh or cleared session: show what is there now.
            self.print_transcript(messages);
            return;
        }

        let Some(last) = messages.last() else {
            return;
        };
        if messages.len() == previous || last.role != MessageRole::Assistant {
            return;
        }

        if last.content != self.streamed {
            let _ = write!(self.out, "{}", style(&last.content).yellow());
        }
        let _ = writeln!(self.out);
        let _ = self.out.flush();
        self.streamed.clear();
    }

    fn streaming_changed(&mut self, placeholder: Option<&ChatMessage>) {
        let Some(placeholder) = placeholder else {
            return;
        };
        let content = placeholder.content.as_str();
        if let Some(fresh) = content
            .strip_prefix(self.streamed.as_str())
            .filter(|rest| !rest.is_empty())
        {
            let _ = write!(self.out, "{fresh}");
            let _ = self.out.flush();
            self.streamed.push_str(fresh);
        }
    }
}

//! Terminal embedding of the chat widget.
//!
//! - `commands`: slash command parsing
//! - `renderer`: `WidgetRenderer` that prints to the terminal
//! - `loop_runner`: input loop driving the widget

pub mod commands;
pub mod loop_runner;
pub mod renderer;

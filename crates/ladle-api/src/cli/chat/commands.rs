//! Slash command parsing for the terminal widget.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Start a fresh session with the greeting.
    Clear,
    /// Minimize or open the widget.
    Toggle,
    /// Upload a file to send with the next message.
    Attach(String),
    /// Drop the pending attachment.
    Detach,
    /// Print the conversation so far.
    History,
    /// Exit the chat.
    Exit,
    /// Unknown or malformed command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(' ') {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (trimmed, ""),
    };

    let command = match cmd.to_lowercase().as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/new" => ChatCommand::Clear,
        "/toggle" | "/min" => ChatCommand::Toggle,
        "/attach" | "/file" if arg.is_empty() => {
            ChatCommand::Unknown("/attach requires a file path".to_string())
        }
        "/attach" | "/file" => ChatCommand::Attach(arg.to_string()),
        "/detach" => ChatCommand::Detach,
        "/history" => ChatCommand::History,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Start a new conversation"),
        ("/toggle", "Minimize or open the chat"),
        ("/attach <path>", "Attach a file to your next message"),
        ("/detach", "Remove the pending attachment"),
        ("/history", "Show the conversation"),
        ("/exit", "Leave the chat"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (command, description) in rows {
        println!("  {:<16} {}", style(command).cyan(), description);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}

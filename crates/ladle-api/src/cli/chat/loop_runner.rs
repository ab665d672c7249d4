//! Interactive chat loop.
//!
//! Mounts a [`ChatWidget`] against a running server, restores the saved
//! session from the data directory and drives one turn per input line.

use std::path::Path;
use std::sync::Arc;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use ladle_core::upload::FileUpload;
use ladle_core::widget::{ChatWidget, WidgetError, WidgetEvent};
use ladle_infra::storage::FileSessionStore;
use ladle_infra::transport::HttpChatTransport;
use ladle_types::upload::mime_for_extension;
use ladle_types::widget::WidgetState;

use crate::state::Settings;

use super::commands::{self, ChatCommand};
use super::renderer::TerminalRenderer;

type TerminalWidget = ChatWidget<HttpChatTransport, FileSessionStore, TerminalRenderer<std::io::Stdout>>;

/// Run the terminal widget until `/exit`, Ctrl+D or Ctrl+C.
pub async fn run_chat_loop(settings: &Settings, endpoint: Option<String>) -> anyhow::Result<()> {
    let endpoint = endpoint.unwrap_or_else(|| {
        format!(
            "http://{}:{}",
            settings.config.server.host, settings.config.server.port
        )
    });
    let transport = Arc::new(HttpChatTransport::new(&endpoint)?);
    let store = FileSessionStore::in_data_dir(&settings.data_dir);
    let widget_config = settings.config.widget.clone();
    let renderer = TerminalRenderer::stdout(widget_config.title.clone());

    println!();
    println!(
        "  {}  {}",
        style(&widget_config.title).cyan().bold(),
        style(&endpoint).dim()
    );
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());

    let mut widget: TerminalWidget = ChatWidget::mount(widget_config, transport, store, renderer).await;
    widget.toggle();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };

        if let Some(command) = commands::parse(&line) {
            match command {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => widget.clear().await,
                ChatCommand::Toggle => {
                    widget.toggle();
                }
                ChatCommand::Attach(path) => attach(&mut widget, Path::new(&path)).await,
                ChatCommand::Detach => match widget.detach_file() {
                    Some(file) => println!("  {} {}", style("Removed").dim(), file.name),
                    None => println!("  {}", style("No file attached").dim()),
                },
                ChatCommand::History => {
                    let messages = widget.session().messages.clone();
                    let mut printer = TerminalRenderer::stdout(String::new());
                    printer.print_transcript(&messages);
                }
                ChatCommand::Exit => break,
                ChatCommand::Unknown(cmd) => {
                    println!("  {} {cmd} (try /help)", style("Unknown command:").red());
                }
            }
            continue;
        }

        if widget.state() == WidgetState::Minimized {
            println!("  {}", style("Chat is minimized. Type /toggle to open it.").dim());
            continue;
        }

        match widget.submit(&line).await {
            Ok(_) => {}
            Err(WidgetError::Blank) => continue,
            Err(e) => {
                println!("  {} {e}", style("!").red());
                continue;
            }
        }

        let outcome = tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            outcome = widget.wait_for_turn() => outcome,
        };
        match outcome {
            Some(WidgetEvent::Failed { error, .. }) => {
                tracing::debug!(%error, "turn failed");
            }
            Some(WidgetEvent::Aborted) => println!(),
            _ => {}
        }
    }

    println!();
    println!("  {}", style("Bye!").dim());
    Ok(())
}

async fn attach(widget: &mut TerminalWidget, path: &Path) {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            println!("  {} could not read {}: {e}", style("!").red(), path.display());
            return;
        }
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime_type = path
        .extension()
        .and_then(|ext| mime_for_extension(&ext.to_string_lossy()))
        .unwrap_or("application/octet-stream");

    match widget.attach_file(FileUpload::new(name, mime_type, bytes)).await {
        Ok(file) => println!(
            "  {} {} ({} bytes) will be sent with your next message",
            style("Attached").green(),
            file.name,
            file.size
        ),
        Err(e) => println!("  {} {e}", style("!").red()),
    }
}

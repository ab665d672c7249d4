//! `ladle context` -- print the rendered knowledge context.

use console::style;

use ladle_core::knowledge::context::generate_context;

use crate::state::Settings;

pub async fn print_context(settings: &Settings) -> anyhow::Result<()> {
    let client = settings.cosmic_client()?;
    let context = generate_context(&client).await;

    eprintln!(
        "  {} bucket {}",
        style("Knowledge context for").dim(),
        style(client.bucket_slug()).cyan()
    );
    println!("{context}");
    Ok(())
}

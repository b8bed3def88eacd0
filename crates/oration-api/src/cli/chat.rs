//! `oration send`: run one chat turn from the terminal.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Send a message and print the assistant's reply.
///
/// The payload goes through the same normalizer as the HTTP endpoint.
pub async fn send(
    state: &AppState,
    content: String,
    session: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let payload = serde_json::json!({
        "sessionId": session,
        "content": content,
    });

    let output = state.chat_service.send_message(&payload).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if quiet {
        println!("{}", output.assistant.content);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("You:").cyan().bold(), output.user.content);
    println!();
    println!("  {}", style("Counsellor:").green().bold());
    for line in output.assistant.content.lines() {
        println!("  {line}");
    }
    println!();
    println!(
        "  {} {}",
        style("session").dim(),
        style(output.session_id).dim()
    );
    println!();

    Ok(())
}

//! Session management CLI commands: list, create, messages, delete.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use oration_types::llm::MessageRole;

use crate::state::AppState;

/// List sessions, newest first, one page at a time.
///
/// # Examples
///
/// ```bash
/// oration session list
/// oration session list --limit 5 --cursor <session-id>
/// ```
pub async fn list_sessions(
    state: &AppState,
    cursor: Option<&str>,
    limit: Option<u32>,
    json: bool,
) -> Result<()> {
    let page = state.chat_service.list_sessions(cursor, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.items.is_empty() {
        println!();
        println!(
            "  {} No sessions yet. Start one with: {}",
            style("i").blue().bold(),
            style("oration send \"How do I switch careers?\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for session in &page.items {
        table.add_row(vec![
            Cell::new(session.id).fg(Color::DarkGrey),
            Cell::new(&session.title).fg(Color::Cyan),
            Cell::new(session.created_at.format("%Y-%m-%d %H:%M")).fg(Color::White),
            Cell::new(session.updated_at.format("%Y-%m-%d %H:%M")).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(page.items.len()).bold(),
        if page.items.len() == 1 { "" } else { "s" }
    );
    if let Some(next) = page.next_cursor {
        println!(
            "  More: {}",
            style(format!("oration session list --cursor {next}")).yellow()
        );
    }
    println!();

    Ok(())
}

/// Create an empty session.
pub async fn create_session(state: &AppState, title: Option<String>, json: bool) -> Result<()> {
    let session = state.chat_service.create_session(title).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!(
            "  {} Created session '{}' ({})",
            style("✓").green().bold(),
            style(&session.title).cyan(),
            style(session.id).dim()
        );
    }

    Ok(())
}

/// Print a session's messages in chronological order.
pub async fn show_messages(state: &AppState, session_id: Uuid, json: bool) -> Result<()> {
    let session = state
        .chat_service
        .get_session(&session_id)
        .await?
        .with_context(|| format!("Session '{session_id}' not found"))?;

    let messages = state.chat_service.get_messages(&session_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&session.title).cyan().bold());
    println!();
    for message in &messages {
        let label = match message.role {
            MessageRole::User => style("You").cyan().bold(),
            MessageRole::Assistant => style("Counsellor").green().bold(),
            MessageRole::System => style("System").dim(),
        };
        println!(
            "  {} {}",
            label,
            style(message.created_at.format("%H:%M:%S")).dim()
        );
        for line in message.content.lines() {
            println!("    {line}");
        }
        println!();
    }

    Ok(())
}

/// Delete a session together with its messages.
pub async fn delete_session(state: &AppState, session_id: Uuid, json: bool) -> Result<()> {
    state
        .chat_service
        .delete_session(&session_id)
        .await
        .with_context(|| format!("Failed to delete session '{session_id}'"))?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "id": session_id, "deleted": true })
        );
    } else {
        println!(
            "  {} Deleted session {}",
            style("✓").green().bold(),
            style(session_id).dim()
        );
    }

    Ok(())
}

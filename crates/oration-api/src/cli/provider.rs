//! `oration providers`: show where the next reply would come from.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use oration_core::llm::selector::{ProviderChoice, select_provider};

use crate::state::AppState;

/// Print the provider selection and the configured models.
///
/// Keys are never printed, only whether they are present.
pub fn show(state: &AppState, json: bool) -> Result<()> {
    let settings = state.chat_service.settings();
    let choice = select_provider(settings);

    if json {
        let report = serde_json::json!({
            "selected": choice.to_string(),
            "mock": matches!(choice, ProviderChoice::Mock(_)),
            "force_mock": settings.force_mock,
            "gemini": {
                "configured": settings.has_gemini_key(),
                "model": settings.gemini_model,
            },
            "openai": {
                "configured": settings.has_openai_key(),
                "model": settings.openai_model,
            },
            "request_timeout_secs": settings.request_timeout_secs,
            "data_dir": state.data_dir.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Provider").fg(Color::White),
        Cell::new("Model").fg(Color::White),
        Cell::new("Key").fg(Color::White),
    ]);

    let key_cell = |present: bool| {
        if present {
            Cell::new("configured").fg(Color::Green)
        } else {
            Cell::new("missing").fg(Color::DarkGrey)
        }
    };

    table.add_row(vec![
        Cell::new("gemini").fg(Color::Cyan),
        Cell::new(&settings.gemini_model),
        key_cell(settings.has_gemini_key()),
    ]);
    table.add_row(vec![
        Cell::new("openai").fg(Color::Cyan),
        Cell::new(&settings.openai_model),
        key_cell(settings.has_openai_key()),
    ]);

    let selected = match choice {
        ProviderChoice::Mock(_) => style(choice.to_string()).yellow().bold(),
        ProviderChoice::Live(_) => style(choice.to_string()).green().bold(),
    };

    println!();
    println!("{table}");
    println!();
    println!("  Next reply: {selected}");
    println!(
        "  {} {}",
        style("data dir").dim(),
        style(state.data_dir.display()).dim()
    );
    println!();

    Ok(())
}

//! Topic listing command.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use intently_infra::bootstrap;
use intently_types::classification::NEGATIVE_LABEL;

use crate::state::AppState;

/// Print every topic and label the bank was trained on, with phrase counts.
///
/// `false` labels are listed as negatives; they train no classifier of
/// their own.
pub async fn list_topics(state: &AppState, json: bool) -> Result<()> {
    let collection = bootstrap::load_collection(&state.config, &state.sources).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&collection)?);
        return Ok(());
    }

    if collection.is_empty() {
        println!();
        println!("  {}", style("No topics. Add phrases with --phrases <PATH>.").dim());
        println!();
        return Ok(());
    }

    println!();
    println!(
        "  {} ({} topics, {} phrases)",
        style("Trained topics").bold(),
        collection.topic_count(),
        collection.phrase_count()
    );
    println!(
        "  {}",
        style(format!("data dir: {}", state.data_dir.display())).dim()
    );
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Topic").fg(Color::White),
        Cell::new("Label").fg(Color::White),
        Cell::new("Phrases").fg(Color::White),
        Cell::new("Example").fg(Color::White),
    ]);

    for (topic, labels) in collection.topics() {
        for (label, phrases) in labels {
            let label_cell = if label == NEGATIVE_LABEL {
                Cell::new("(negatives)").fg(Color::DarkGrey)
            } else {
                Cell::new(label).fg(Color::Cyan)
            };
            table.add_row(vec![
                Cell::new(topic),
                label_cell,
                Cell::new(phrases.len()),
                Cell::new(phrases.first().map(String::as_str).unwrap_or("-")),
            ]);
        }
    }

    println!("{table}");
    println!();

    Ok(())
}

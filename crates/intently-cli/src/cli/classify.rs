//! One-shot classification command.

use anyhow::Result;
use console::style;
use serde_json::json;

use intently_types::user::User;

use crate::state::AppState;

/// Run one message through the pipeline and print the decided intent.
pub async fn classify(state: &AppState, text: &str, json: bool, quiet: bool) -> Result<()> {
    let mut user = User::empty();
    let outcome = state.pipeline.process_in_place(&mut user, text).await?;

    if json {
        let report = json!({
            "text": text,
            "intent": user.intent,
            "skill": outcome.as_ref().map(|o| o.skill.as_str()),
            "reply": outcome.as_ref().map(|o| &o.output),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let intent = &user.intent;
    if quiet {
        println!(
            "{}",
            intent.action.as_deref().unwrap_or(intently_types::intent::UNKNOWN_ACTION)
        );
        return Ok(());
    }

    println!();
    if intent.is_unknown() {
        println!("  {} No confident intent", style("?").yellow().bold());
    } else {
        println!("  {} Intent resolved", style("✓").green().bold());
    }
    println!();
    println!(
        "  {}       {}",
        style("Topic:").bold(),
        style(intent.topic.as_deref().unwrap_or("-")).cyan()
    );
    println!(
        "  {}      {}",
        style("Action:").bold(),
        intent.action.as_deref().unwrap_or("-")
    );
    if let Some(confidence) = intent.confidence() {
        println!(
            "  {}  {}",
            style("Confidence:").bold(),
            format_confidence(confidence)
        );
    }
    if let Some(locations) = intent.details.locations.as_ref().filter(|l| !l.is_empty()) {
        println!(
            "  {}   {}",
            style("Locations:").bold(),
            locations.join(", ")
        );
    }
    for (key, value) in &intent.details.extra {
        println!("  {}  {}", style(format!("{key}:")).bold(), value);
    }

    if let Some(outcome) = outcome {
        println!();
        let reply = match &outcome.output {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        println!("  {} {}", style(format!("[{}]", outcome.skill)).dim(), reply);
    }
    println!();

    Ok(())
}

/// Render a confidence in `[0, 1]` as a percentage.
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

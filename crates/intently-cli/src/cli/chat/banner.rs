//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
///
/// Shows what the bank was trained on and the order skills are tried in.
pub fn print_welcome_banner(family: &str, topics: &[&str], pairs: usize, skills: &[&str]) {
    println!();
    println!("  {} {}", "*", style("intently chat").cyan().bold());
    println!(
        "  {}",
        style("Each line is classified, reduced, and handed to the skill chain.").dim()
    );
    println!();
    println!(
        "  {}   {} ({} classifiers)",
        style("Model:").bold(),
        style(family).dim(),
        pairs
    );
    println!(
        "  {}  {}",
        style("Topics:").bold(),
        style(if topics.is_empty() { "-".to_string() } else { topics.join(", ") }).dim()
    );
    println!(
        "  {}  {}",
        style("Skills:").bold(),
        style(skills.join(" -> ")).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

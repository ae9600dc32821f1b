//! Intently CLI entry point.
//!
//! Binary name: `intently`
//!
//! Parses CLI arguments, initializes tracing, trains the classifier bank from
//! the configured phrase sources, then dispatches to the command handler.

mod cli;
mod skills;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = intently_observe::verbosity_filter(cli.verbose, cli.quiet);
    intently_observe::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    // Shell completions don't need a trained pipeline
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "intently", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(&cli).await?;

    let result = match &cli.command {
        Commands::Classify { text } => {
            cli::classify::classify(&state, &text.join(" "), cli.json, cli.quiet).await
        }
        Commands::Topics => cli::topics::list_topics(&state, cli.json).await,
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(&state).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    intently_observe::shutdown_tracing();
    result
}

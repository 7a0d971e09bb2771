//! dynorm CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dynorm::cli::Cli;
use dynorm::commands;
use dynorm::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "dynorm=warn" } else { "dynorm=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config();

    #[cfg(feature = "dynamodb")]
    let state = AppState::with_dynamodb(config).await?;

    #[cfg(not(feature = "dynamodb"))]
    let state = AppState::with_demo_data(config).await?;

    let output = commands::run(cli.command, &state, cli.format, cli.quiet).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

//! Beacon CLI
//!
//! Sends one signed notification to a DingTalk or Lark bot webhook. Every
//! flag falls back to the environment variable a GitHub Actions step would
//! set for the matching input.

mod commands;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

/// Send a signed chat-bot notification.
#[derive(Parser, Debug)]
#[command(name = "beacon", version, about)]
struct Cli {
    #[command(flatten)]
    notify: commands::notify::NotifyArgs,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    commands::notify::run(cli.notify, &cli.format).await
}

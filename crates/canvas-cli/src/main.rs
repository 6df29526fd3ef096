//! stock-canvas - terminal front-end for the investment-analysis dashboard
//!
//! # Usage
//!
//! ```bash
//! # Load every section for a stock and print the dashboard
//! stock-canvas analyze 005930
//!
//! # Print the price chart for one period
//! stock-canvas chart 000660 --period W
//!
//! # Talk to the chat backend; detected stocks reload the dashboard
//! stock-canvas chat
//! ```

use anyhow::Result;
use canvas_stock::CanvasConfig;
use clap::Parser;
use tracing::debug;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = canvas_utils::Config::from_env();
    app.log.json |= cli.log_json;
    canvas_utils::init_tracing(&app.log);

    let mut builder = CanvasConfig::builder().with_env();
    if let Some(base) = cli.api_base {
        builder = builder.api_base(base);
    }
    let config = builder.build()?;
    debug!(api_base = %config.api_base, environment = %app.environment, "configuration loaded");

    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, config).await?,
        Commands::Chart(args) => commands::chart::execute(args, config).await?,
        Commands::Chat(args) => commands::chat::execute(args, config).await?,
    }

    Ok(())
}

//! CLI argument definitions

use clap::{Parser, Subcommand};

use crate::commands::{AnalyzeArgs, ChartArgs, ChatArgs};

/// Stock analysis dashboard with a conversational front-end
#[derive(Parser)]
#[command(name = "stock-canvas")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the analysis service (overrides CANVAS_API_BASE)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load all sections for a stock and print the dashboard
    Analyze(AnalyzeArgs),

    /// Print the price chart for one period
    Chart(ChartArgs),

    /// Interactive chat; detected stocks load the dashboard
    Chat(ChatArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_stock::ChartPeriod;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chart_period() {
        let cli = Cli::try_parse_from(["stock-canvas", "chart", "005930", "--period", "w"]).unwrap();
        match cli.command {
            Commands::Chart(args) => {
                assert_eq!(args.code.as_deref(), Some("005930"));
                assert_eq!(args.period, ChartPeriod::Weekly);
            }
            _ => panic!("expected chart command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stock-canvas",
            "analyze",
            "--json",
            "--api-base",
            "http://localhost:3000/api",
        ])
        .unwrap();
        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:3000/api"));
        match cli.command {
            Commands::Analyze(args) => {
                assert!(args.json);
                assert!(args.code.is_none());
            }
            _ => panic!("expected analyze command"),
        }
    }
}

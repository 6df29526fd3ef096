//! Analyze command: load every section and print the dashboard

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use canvas_stock::{AnalysisAggregator, CanvasConfig, ChartPeriod, InvestmentApiClient, export};
use clap::Args;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use super::report_event;
use crate::output;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Six-digit stock code (defaults to CANVAS_DEFAULT_STOCK)
    pub code: Option<String>,

    /// Print the view-model as JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// Also write the view-model as JSON into this directory
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Chart period shown in the dashboard
    #[arg(short, long, default_value = "M")]
    pub period: ChartPeriod,
}

pub async fn execute(args: AnalyzeArgs, config: CanvasConfig) -> Result<()> {
    let code = args
        .code
        .unwrap_or_else(|| config.default_stock_code.clone());
    let aggregator = AnalysisAggregator::new(Arc::new(InvestmentApiClient::new(config)?));

    let mut events = aggregator.events();
    let handle = aggregator.load_analysis(code);

    loop {
        match events.recv().await {
            Ok(event) => {
                if report_event(&event).is_some() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "missed aggregator events"),
            Err(RecvError::Closed) => break,
        }
    }

    let summary = handle.wait().await?;
    let state = aggregator.snapshot();

    if args.json {
        println!("{}", export::to_json(&state.view_model)?);
    } else {
        output::print_dashboard(&state, args.period);
    }

    if let Some(dir) = args.export {
        if summary.all_failed() {
            warn!(stock_code = %summary.stock_code, "nothing loaded, skipping export");
        } else {
            let path = export::write(&dir, &state.view_model).await?;
            println!("저장됨: {}", path.display());
        }
    }

    Ok(())
}

//! Chart command: fetch one chart period

use anyhow::Result;
use canvas_stock::{AnalysisBackend, CanvasConfig, ChartPeriod, InvestmentApiClient};
use clap::Args;

use crate::output;

#[derive(Args, Debug)]
pub struct ChartArgs {
    /// Six-digit stock code (defaults to CANVAS_DEFAULT_STOCK)
    pub code: Option<String>,

    /// D, W, M, or Y
    #[arg(short, long, default_value = "M")]
    pub period: ChartPeriod,

    /// Number of most recent points listed
    #[arg(short, long, default_value_t = 10)]
    pub bars: usize,
}

pub async fn execute(args: ChartArgs, config: CanvasConfig) -> Result<()> {
    let code = args
        .code
        .unwrap_or_else(|| config.default_stock_code.clone());
    let client = InvestmentApiClient::new(config)?;

    let chart = client.fetch_chart(&code, args.period).await?;
    println!("{code} · {}", args.period);
    output::print_chart(&chart, args.period, args.bars);
    Ok(())
}

//! Investment-analysis client
//!
//! This crate drives the "canvas" dashboard of a stock-analysis service. It
//! includes:
//!
//! - HTTP clients for the per-section analysis endpoint and the chat endpoint
//! - A partial-data aggregator that loads seven sections concurrently and
//!   publishes each one as soon as it arrives
//! - A chat session whose detected stocks drive the dashboard selection
//! - Display formatting for prices, financial statements, metrics, and risk
//! - JSON export of a loaded analysis
//!
//! # Architecture
//!
//! An [`AppStore`] holds the selected stock. A [`Dashboard`] listens to it and
//! starts an [`AnalysisAggregator`] load on every change. Each load has a
//! generation number; results that arrive for an older generation are
//! dropped, so a slow response can never overwrite a newer selection.
//!
//! # Example
//!
//! ```rust,no_run
//! use canvas_stock::{AnalysisAggregator, CanvasConfig, InvestmentApiClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> canvas_stock::Result<()> {
//!     let client = InvestmentApiClient::new(CanvasConfig::from_env()?)?;
//!     let aggregator = AnalysisAggregator::new(Arc::new(client));
//!
//!     let summary = aggregator.load_analysis("005930").wait().await?;
//!     println!("{} sections loaded", summary.succeeded.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chat;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod present;
pub mod store;

// Re-export main types for convenience
pub use api::{AnalysisBackend, ChatApiClient, ChatBackend, InvestmentApiClient};
pub use chat::{ChatSession, Command, SendOutcome};
pub use config::{CanvasConfig, CanvasConfigBuilder};
pub use engine::{
    AggregatorEvent, AnalysisAggregator, AnalysisViewModel, Dashboard, DashboardState,
    FailureKind, LoadHandle, LoadPhase, LoadSummary, PanelView, SectionOutcome,
};
pub use error::{CanvasError, Result};
pub use model::{ChartPeriod, Section, SectionData};
pub use store::{AppStore, StockSelection};

//! Analysis engine
//!
//! Concurrent section loading and the dashboard state it produces

pub mod aggregator;
pub mod dashboard;
pub mod view_model;

pub use aggregator::{AggregatorEvent, AnalysisAggregator, LoadHandle, LoadSummary};
pub use dashboard::Dashboard;
pub use view_model::{
    AnalysisViewModel, DashboardState, FailureKind, LoadPhase, PanelView, SectionLoadingState,
    SectionOutcome,
};

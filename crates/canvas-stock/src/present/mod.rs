//! Display logic for the dashboard panels
//!
//! Pure functions from view-model records to what a front-end shows:
//! formatted values, chart series, metric indicators, and risk labels.

pub mod chart;
pub mod financial;
pub mod format;
pub mod metrics;
pub mod risk;

pub use chart::{ChartSeries, ChartStats, PriceBar, VolumeDirection};
pub use financial::{IncomeSummary, StatementView};
pub use metrics::{Indicator, MetricCard, MetricKey, PeerRow};
pub use risk::AltmanZone;

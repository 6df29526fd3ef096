//! Domain model: sections, backend wire records, and chat payloads

pub mod analysis;
pub mod chat;
pub mod period;
pub mod section;

pub use analysis::{
    AnalysisPayload, AnalystNews, ChartData, CompanyInfo, DividendInfo, FinancialStatements,
    InvestmentMetrics, Level, MetricsBundle, PeerComparison, PerformanceConsensus, RiskAnalysis,
    SectionData, Sentiment, Volatility,
};
pub use chat::{ChatMessage, ChatRequest, ChatResponse, ChatRole, StockInfo};
pub use period::ChartPeriod;
pub use section::Section;

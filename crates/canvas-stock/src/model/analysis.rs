//! Wire records returned by the investment-analysis endpoint
//!
//! Every record is `Default` and deserialises with `#[serde(default)]`, so a
//! backend that omits fields (or returns `{}` for a section it could not
//! compute) still yields a well-typed value. Explicit nulls read as defaults
//! and unknown level or sentiment labels read as `Unknown`.

use super::section::Section;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Read `null` as the type's default
///
/// `#[serde(default)]` only covers missing fields; the backend also sends
/// explicit nulls for values it could not compute.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Three-step level used by the risk section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
    /// Any label the client does not know
    #[serde(other)]
    Unknown,
}

/// News sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    #[serde(other)]
    Unknown,
}

/// Chart section: raw broker rows plus optional precomputed indicators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartData {
    /// Daily rows, either `{ output: [...] }`, `{ output2: [...] }`, or a bare array
    pub daily_chart: Value,
    pub item_chart: Option<Value>,
    pub index_chart: Option<Value>,
    pub moving_averages: Option<MovingAverages>,
    pub technical_indicators: Option<TechnicalIndicators>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovingAverages {
    pub ma5: Option<Vec<f64>>,
    pub ma20: Option<Vec<f64>>,
    pub ma60: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalIndicators {
    pub rsi: Option<Vec<f64>>,
    pub macd: Option<Vec<f64>>,
    pub bollinger: Option<BollingerBands>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BollingerBands {
    #[serde(deserialize_with = "null_as_default")]
    pub upper: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub middle: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub lower: Vec<f64>,
}

/// Company profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub stock_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub industry: String,
    #[serde(deserialize_with = "null_as_default")]
    pub listing_date: String,
    /// Won
    pub market_cap: Option<f64>,
    pub shares_outstanding: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ceo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
}

/// Valuation and quality ratios
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvestmentMetrics {
    pub per: Option<f64>,
    pub pbr: Option<f64>,
    pub roe: Option<f64>,
    pub eps: Option<f64>,
    pub bps: Option<f64>,
    pub debt_ratio: Option<f64>,
    pub current_ratio: Option<f64>,
    pub operating_margin: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceConsensus {
    #[serde(deserialize_with = "null_as_default")]
    pub quarterly_results: Vec<PeriodResult>,
    #[serde(deserialize_with = "null_as_default")]
    pub annual_results: Vec<PeriodResult>,
    pub consensus: Option<Consensus>,
}

/// One quarter or year of results; annual rows name the period `year`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodResult {
    #[serde(alias = "year")]
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub operating_profit: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub net_profit: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub yoy_growth: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Consensus {
    #[serde(deserialize_with = "null_as_default")]
    pub target_price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number_of_analysts: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividendInfo {
    pub dividend_per_share: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub schedule: DividendSchedule,
    #[serde(deserialize_with = "null_as_default")]
    pub history: Vec<DividendHistory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividendSchedule {
    pub ex_dividend_date: Option<String>,
    pub record_date: Option<String>,
    pub payment_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividendHistory {
    #[serde(deserialize_with = "null_as_default")]
    pub year: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dividend_per_share: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub dividend_yield: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeerComparison {
    #[serde(deserialize_with = "null_as_default")]
    pub industry_averages: IndustryAverages,
    #[serde(deserialize_with = "null_as_default")]
    pub ranking: Ranking,
    #[serde(deserialize_with = "null_as_default")]
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndustryAverages {
    #[serde(deserialize_with = "null_as_default")]
    pub per: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub pbr: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub roe: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub dividend_yield: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ranking {
    #[serde(deserialize_with = "null_as_default")]
    pub by_market_cap: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub by_revenue: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub by_profit: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total_companies: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Competitor {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stock_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub market_cap: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub per: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub pbr: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub roe: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalystNews {
    #[serde(deserialize_with = "null_as_default")]
    pub analyst_reports: Vec<AnalystReport>,
    #[serde(deserialize_with = "null_as_default")]
    pub news: Vec<NewsItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub sentiment_analysis: SentimentBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalystReport {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub firm: String,
    #[serde(deserialize_with = "null_as_default")]
    pub analyst: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub target_price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendation: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsItem {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    pub sentiment: Option<Sentiment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentimentBreakdown {
    #[serde(deserialize_with = "null_as_default")]
    pub positive: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub neutral: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub negative: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub overall_sentiment: String,
}

/// Financial statements; backend values are in units of 억원
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialStatements {
    #[serde(deserialize_with = "null_as_default")]
    pub income_statement: Vec<IncomeRow>,
    #[serde(deserialize_with = "null_as_default")]
    pub balance_sheet: Vec<BalanceRow>,
    #[serde(deserialize_with = "null_as_default")]
    pub cash_flow: Vec<CashFlowRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeRow {
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub cost_of_goods_sold: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub gross_profit: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub operating_expenses: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub operating_income: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub net_income: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceRow {
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_assets: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub current_assets: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_liabilities: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub current_liabilities: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_equity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashFlowRow {
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
    #[serde(deserialize_with = "null_as_default")]
    pub operating_cash_flow: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub investing_cash_flow: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub financing_cash_flow: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub net_cash_flow: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub free_cash_flow: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskAnalysis {
    pub volatility: Option<Volatility>,
    pub financial_risk: Option<FinancialRisk>,
    #[serde(deserialize_with = "null_as_default")]
    pub risk_factors: Vec<RiskFactor>,
    pub ai_analysis: Option<AiAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volatility {
    #[serde(deserialize_with = "null_as_default")]
    pub daily: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub weekly: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub monthly: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub annual: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub beta: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialRisk {
    #[serde(deserialize_with = "null_as_default")]
    pub debt_to_equity: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub interest_coverage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub quick_ratio: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub altman_z_score: f64,
    pub risk_level: Option<Level>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskFactor {
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub impact: Option<Level>,
    pub probability: Option<Level>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

/// Partial response of one `investment-analysis` call
///
/// Only the sections named in the request's `sections` selector are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisPayload {
    pub stock_code: Option<String>,
    pub analysis_date: Option<String>,
    pub chart_data: Option<ChartData>,
    pub company_info: Option<CompanyInfo>,
    pub investment_metrics: Option<InvestmentMetrics>,
    pub performance_consensus: Option<PerformanceConsensus>,
    pub dividend_info: Option<DividendInfo>,
    pub peer_comparison: Option<PeerComparison>,
    pub analyst_news: Option<AnalystNews>,
    pub financial_statements: Option<FinancialStatements>,
    pub risk_analysis: Option<RiskAnalysis>,
}

/// The three records served by the `metrics,peer` selector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsBundle {
    pub investment_metrics: Option<InvestmentMetrics>,
    pub performance_consensus: Option<PerformanceConsensus>,
    pub peer_comparison: Option<PeerComparison>,
}

/// Data for exactly one section, tagged by section
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    Chart(ChartData),
    Company(CompanyInfo),
    Metrics(MetricsBundle),
    Financial(FinancialStatements),
    Dividend(DividendInfo),
    News(AnalystNews),
    Risk(RiskAnalysis),
}

impl SectionData {
    /// The section this data belongs to
    pub fn section(&self) -> Section {
        match self {
            Self::Chart(_) => Section::Chart,
            Self::Company(_) => Section::Company,
            Self::Metrics(_) => Section::Metrics,
            Self::Financial(_) => Section::Financial,
            Self::Dividend(_) => Section::Dividend,
            Self::News(_) => Section::News,
            Self::Risk(_) => Section::Risk,
        }
    }

    /// Pull the requested section out of a response
    ///
    /// Fields belonging to other sections are ignored. Returns `None` when the
    /// response does not carry the section at all.
    pub fn from_payload(section: Section, payload: AnalysisPayload) -> Option<Self> {
        match section {
            Section::Chart => payload.chart_data.map(Self::Chart),
            Section::Company => payload.company_info.map(Self::Company),
            Section::Metrics => {
                if payload.investment_metrics.is_none() && payload.peer_comparison.is_none() {
                    return None;
                }
                Some(Self::Metrics(MetricsBundle {
                    investment_metrics: payload.investment_metrics,
                    performance_consensus: payload.performance_consensus,
                    peer_comparison: payload.peer_comparison,
                }))
            }
            Section::Financial => payload.financial_statements.map(Self::Financial),
            Section::Dividend => payload.dividend_info.map(Self::Dividend),
            Section::News => payload.analyst_news.map(Self::News),
            Section::Risk => payload.risk_analysis.map(Self::Risk),
        }
    }

    /// Whether there is anything worth rendering
    ///
    /// The backend answers `{}` for sections it could not compute; those merge
    /// but render as "unavailable".
    pub fn has_content(&self) -> bool {
        match self {
            Self::Chart(chart) => match &chart.daily_chart {
                Value::Null => false,
                Value::Array(rows) => !rows.is_empty(),
                Value::Object(map) => !map.is_empty(),
                _ => true,
            },
            Self::Company(company) => *company != CompanyInfo::default(),
            Self::Metrics(bundle) => {
                bundle
                    .investment_metrics
                    .as_ref()
                    .is_some_and(|m| *m != InvestmentMetrics::default())
                    || bundle
                        .peer_comparison
                        .as_ref()
                        .is_some_and(|p| *p != PeerComparison::default())
            }
            Self::Financial(statements) => *statements != FinancialStatements::default(),
            Self::Dividend(dividend) => *dividend != DividendInfo::default(),
            Self::News(news) => *news != AnalystNews::default(),
            // The risk panel needs volatility figures to render at all
            Self::Risk(risk) => risk.volatility.is_some(),
        }
    }
}

//! View-models the dashboard renders from

use crate::error::CanvasError;
use crate::model::{
    AnalysisPayload, AnalystNews, ChartData, CompanyInfo, DividendInfo, FinancialStatements,
    MetricsBundle, RiskAnalysis, Section, SectionData,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Progressively completed analysis of one stock
///
/// Slots start empty and are filled one at a time by [`merge`](Self::merge).
/// The stock code never changes; selecting another stock means building a new
/// view-model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisViewModel {
    stock_code: String,
    analysis_date: DateTime<Utc>,
    chart: Option<ChartData>,
    company: Option<CompanyInfo>,
    metrics: Option<MetricsBundle>,
    financial: Option<FinancialStatements>,
    dividend: Option<DividendInfo>,
    news: Option<AnalystNews>,
    risk: Option<RiskAnalysis>,
}

impl AnalysisViewModel {
    /// Empty view-model for a stock
    pub fn new(stock_code: impl Into<String>) -> Self {
        Self {
            stock_code: stock_code.into(),
            analysis_date: Utc::now(),
            chart: None,
            company: None,
            metrics: None,
            financial: None,
            dividend: None,
            news: None,
            risk: None,
        }
    }

    pub fn stock_code(&self) -> &str {
        &self.stock_code
    }

    pub fn analysis_date(&self) -> DateTime<Utc> {
        self.analysis_date
    }

    /// Write one section's slot, leaving every other slot untouched
    pub fn merge(&mut self, data: SectionData) {
        match data {
            SectionData::Chart(chart) => self.chart = Some(chart),
            SectionData::Company(company) => self.company = Some(company),
            SectionData::Metrics(metrics) => self.metrics = Some(metrics),
            SectionData::Financial(financial) => self.financial = Some(financial),
            SectionData::Dividend(dividend) => self.dividend = Some(dividend),
            SectionData::News(news) => self.news = Some(news),
            SectionData::Risk(risk) => self.risk = Some(risk),
        }
    }

    /// Section data currently held for `section`
    pub fn section(&self, section: Section) -> Option<SectionData> {
        match section {
            Section::Chart => self.chart.clone().map(SectionData::Chart),
            Section::Company => self.company.clone().map(SectionData::Company),
            Section::Metrics => self.metrics.clone().map(SectionData::Metrics),
            Section::Financial => self.financial.clone().map(SectionData::Financial),
            Section::Dividend => self.dividend.clone().map(SectionData::Dividend),
            Section::News => self.news.clone().map(SectionData::News),
            Section::Risk => self.risk.clone().map(SectionData::Risk),
        }
    }

    /// Whether the slot for `section` has been filled
    pub fn is_populated(&self, section: Section) -> bool {
        match section {
            Section::Chart => self.chart.is_some(),
            Section::Company => self.company.is_some(),
            Section::Metrics => self.metrics.is_some(),
            Section::Financial => self.financial.is_some(),
            Section::Dividend => self.dividend.is_some(),
            Section::News => self.news.is_some(),
            Section::Risk => self.risk.is_some(),
        }
    }

    /// Whether the slot holds something worth rendering
    pub fn has_content(&self, section: Section) -> bool {
        self.section(section).is_some_and(|data| data.has_content())
    }

    pub fn populated_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.is_populated(*s))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.populated_sections().is_empty()
    }

    pub fn chart(&self) -> Option<&ChartData> {
        self.chart.as_ref()
    }

    pub fn company(&self) -> Option<&CompanyInfo> {
        self.company.as_ref()
    }

    pub fn metrics(&self) -> Option<&MetricsBundle> {
        self.metrics.as_ref()
    }

    pub fn financial(&self) -> Option<&FinancialStatements> {
        self.financial.as_ref()
    }

    pub fn dividend(&self) -> Option<&DividendInfo> {
        self.dividend.as_ref()
    }

    pub fn news(&self) -> Option<&AnalystNews> {
        self.news.as_ref()
    }

    pub fn risk(&self) -> Option<&RiskAnalysis> {
        self.risk.as_ref()
    }

    /// The view-model in the backend's response shape
    ///
    /// The metrics bundle is flattened back into `investmentMetrics`,
    /// `performanceConsensus`, and `peerComparison`.
    pub fn to_payload(&self) -> AnalysisPayload {
        let metrics = self.metrics.clone().unwrap_or_default();
        AnalysisPayload {
            stock_code: Some(self.stock_code.clone()),
            analysis_date: Some(
                self.analysis_date
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            chart_data: self.chart.clone(),
            company_info: self.company.clone(),
            investment_metrics: metrics.investment_metrics,
            performance_consensus: metrics.performance_consensus,
            dividend_info: self.dividend.clone(),
            peer_comparison: metrics.peer_comparison,
            analyst_news: self.news.clone(),
            financial_statements: self.financial.clone(),
            risk_analysis: self.risk.clone(),
        }
    }

    /// Display name: company name once known, else the code
    pub fn display_name(&self) -> &str {
        self.company
            .as_ref()
            .map(|c| c.company_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.stock_code)
    }
}

/// Per-section loading flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLoadingState(BTreeMap<Section, bool>);

impl SectionLoadingState {
    /// Every section loading, as at the start of a fetch
    pub fn all_loading() -> Self {
        Self(Section::ALL.iter().map(|s| (*s, true)).collect())
    }

    /// No section loading
    pub fn idle() -> Self {
        Self(Section::ALL.iter().map(|s| (*s, false)).collect())
    }

    pub fn is_loading(&self, section: Section) -> bool {
        self.0.get(&section).copied().unwrap_or(false)
    }

    pub fn set(&mut self, section: Section, loading: bool) {
        self.0.insert(section, loading);
    }

    /// Mark a section settled
    pub fn clear(&mut self, section: Section) {
        self.set(section, false);
    }

    pub fn any_loading(&self) -> bool {
        self.0.values().any(|loading| *loading)
    }

    pub fn loading_sections(&self) -> Vec<Section> {
        self.0
            .iter()
            .filter(|(_, loading)| **loading)
            .map(|(section, _)| *section)
            .collect()
    }
}

/// Why a section request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Timeout,
    Network,
    Status(u16),
    Decode,
    MissingSection,
    /// The task running the request died
    Aborted,
}

impl From<&CanvasError> for FailureKind {
    fn from(err: &CanvasError) -> Self {
        match err {
            CanvasError::Timeout { .. } => Self::Timeout,
            CanvasError::HttpStatus { status, .. } => Self::Status(*status),
            CanvasError::MissingSection { .. } => Self::MissingSection,
            CanvasError::JsonError(_) => Self::Decode,
            CanvasError::NetworkError(e) if e.is_timeout() => Self::Timeout,
            CanvasError::NetworkError(e) if e.is_decode() => Self::Decode,
            CanvasError::NetworkError(e) => match e.status() {
                Some(status) => Self::Status(status.as_u16()),
                None => Self::Network,
            },
            _ => Self::Network,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Network => write!(f, "network error"),
            Self::Status(status) => write!(f, "HTTP {status}"),
            Self::Decode => write!(f, "malformed response"),
            Self::MissingSection => write!(f, "section missing from response"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// How a section settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionOutcome {
    Pending,
    Ready,
    Failed(FailureKind),
}

impl SectionOutcome {
    pub fn is_failed(self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Page-level load phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadPhase {
    Idle,
    Loading,
    Complete,
    /// Every section failed
    Failed { message: String },
}

/// What a panel should show right now
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    Loading(&'static str),
    Ready(SectionData),
    Unavailable(&'static str),
}

/// Snapshot of the dashboard: view-model plus loading bookkeeping
///
/// Each update publishes a new snapshot. The view-model is shared between
/// snapshots and copied on write.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub generation: u64,
    pub view_model: Arc<AnalysisViewModel>,
    pub loading: SectionLoadingState,
    pub outcomes: BTreeMap<Section, SectionOutcome>,
    pub phase: LoadPhase,
}

impl DashboardState {
    /// Nothing selected
    pub fn idle(generation: u64) -> Self {
        Self {
            generation,
            view_model: Arc::new(AnalysisViewModel::new(String::new())),
            loading: SectionLoadingState::idle(),
            outcomes: BTreeMap::new(),
            phase: LoadPhase::Idle,
        }
    }

    /// Fresh state at the start of a load
    pub fn loading(generation: u64, stock_code: impl Into<String>) -> Self {
        Self {
            generation,
            view_model: Arc::new(AnalysisViewModel::new(stock_code)),
            loading: SectionLoadingState::all_loading(),
            outcomes: Section::ALL
                .iter()
                .map(|s| (*s, SectionOutcome::Pending))
                .collect(),
            phase: LoadPhase::Loading,
        }
    }

    pub fn stock_code(&self) -> &str {
        self.view_model.stock_code()
    }

    pub fn outcome(&self, section: Section) -> SectionOutcome {
        self.outcomes
            .get(&section)
            .copied()
            .unwrap_or(SectionOutcome::Pending)
    }

    pub fn failed_sections(&self) -> Vec<Section> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_failed())
            .map(|(section, _)| *section)
            .collect()
    }

    /// Page-level error, set only when every section failed
    pub fn page_error(&self) -> Option<&str> {
        match &self.phase {
            LoadPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// What the panel for `section` shows in this snapshot
    pub fn panel(&self, section: Section) -> PanelView {
        if self.loading.is_loading(section) {
            return PanelView::Loading(section.loading_text());
        }
        match self.view_model.section(section) {
            Some(data) if data.has_content() => PanelView::Ready(data),
            _ => PanelView::Unavailable(section.unavailable_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CompanyInfo, DividendInfo, Volatility};

    fn company(name: &str) -> SectionData {
        SectionData::Company(CompanyInfo {
            company_name: name.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_merge_writes_only_its_slot() {
        let mut vm = AnalysisViewModel::new("005930");
        assert!(vm.is_empty());

        vm.merge(company("삼성전자"));
        vm.merge(SectionData::Dividend(DividendInfo::default()));

        assert_eq!(vm.populated_sections(), vec![Section::Company, Section::Dividend]);
        assert!(!vm.is_populated(Section::Risk));
        assert_eq!(vm.display_name(), "삼성전자");
        assert!(vm.has_content(Section::Company));
        assert!(!vm.has_content(Section::Dividend));
    }

    #[test]
    fn test_merge_is_last_write_wins_per_section() {
        let mut vm = AnalysisViewModel::new("005930");
        vm.merge(company("old"));
        vm.merge(company("new"));
        assert_eq!(vm.company().unwrap().company_name, "new");
    }

    #[test]
    fn test_display_name_falls_back_to_code() {
        let vm = AnalysisViewModel::new("000660");
        assert_eq!(vm.display_name(), "000660");
    }

    #[test]
    fn test_loading_state() {
        let mut loading = SectionLoadingState::all_loading();
        assert!(loading.any_loading());
        for section in Section::ALL {
            assert!(loading.is_loading(section));
        }

        loading.clear(Section::Chart);
        assert!(!loading.is_loading(Section::Chart));
        assert_eq!(loading.loading_sections().len(), 6);

        for section in Section::ALL {
            loading.clear(section);
        }
        assert!(!loading.any_loading());
        assert_eq!(loading, SectionLoadingState::idle());
    }

    #[test]
    fn test_failure_kind_from_error() {
        let err = CanvasError::Timeout { section: Section::Risk };
        assert_eq!(FailureKind::from(&err), FailureKind::Timeout);

        let err = CanvasError::HttpStatus {
            endpoint: "/investment-analysis".to_string(),
            status: 503,
        };
        assert_eq!(FailureKind::from(&err), FailureKind::Status(503));
        assert_eq!(FailureKind::Status(503).to_string(), "HTTP 503");
    }

    #[test]
    fn test_panel_views() {
        let mut state = DashboardState::loading(1, "005930");
        assert!(matches!(state.panel(Section::Risk), PanelView::Loading(_)));

        state.loading.clear(Section::Risk);
        assert_eq!(
            state.panel(Section::Risk),
            PanelView::Unavailable(Section::Risk.unavailable_text())
        );

        Arc::make_mut(&mut state.view_model).merge(SectionData::Risk(crate::model::RiskAnalysis {
            volatility: Some(Volatility::default()),
            ..Default::default()
        }));
        assert!(matches!(state.panel(Section::Risk), PanelView::Ready(_)));
    }

    #[test]
    fn test_view_model_serializes_camel_case() {
        let mut vm = AnalysisViewModel::new("005930");
        vm.merge(company("삼성전자"));
        let value = serde_json::to_value(&vm).unwrap();
        assert_eq!(value["stockCode"], "005930");
        assert_eq!(value["company"]["companyName"], "삼성전자");
        assert!(value["risk"].is_null());
    }
}

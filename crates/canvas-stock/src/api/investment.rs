//! Investment-analysis endpoint client

use crate::config::CanvasConfig;
use crate::error::{CanvasError, Result};
use crate::model::{AnalysisPayload, ChartData, ChartPeriod, Section};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use url::Url;

const ANALYSIS_PATH: &str = "investment-analysis";

/// Source of per-section analysis data
///
/// Implementations make exactly one attempt per call; the aggregator never
/// retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Fetch a single section for a stock
    async fn fetch_section(&self, stock_code: &str, section: Section) -> Result<AnalysisPayload>;

    /// Fetch the chart section for a specific period
    async fn fetch_chart(&self, stock_code: &str, period: ChartPeriod) -> Result<ChartData>;
}

/// HTTP client for `GET /investment-analysis`
#[derive(Debug, Clone)]
pub struct InvestmentApiClient {
    client: Client,
    base: Url,
    token: Option<String>,
    config: CanvasConfig,
}

impl InvestmentApiClient {
    /// Create a client from a validated configuration
    pub fn new(config: CanvasConfig) -> Result<Self> {
        config.validate()?;
        let base = Url::parse(&config.api_base)?;
        Ok(Self {
            client: Client::new(),
            base,
            token: config.api_token.clone(),
            config,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(CanvasConfig::from_env()?)
    }

    /// Build the request URL for a stock, selector, and optional period
    pub fn analysis_url(
        &self,
        stock_code: &str,
        sections: Option<&str>,
        period: Option<ChartPeriod>,
    ) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CanvasError::ConfigError(format!("{} cannot be used as a base URL", self.base))
            })?
            .pop_if_empty()
            .push(ANALYSIS_PATH);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("stockCode", stock_code);
            if let Some(period) = period {
                query.append_pair("period", period.code());
            }
            if let Some(sections) = sections {
                query.append_pair("sections", sections);
            }
        }

        Ok(url)
    }

    /// Fetch a full analysis in one call
    ///
    /// `sections` narrows the response; `None` asks for everything.
    pub async fn get_analysis(
        &self,
        stock_code: &str,
        period: Option<ChartPeriod>,
        sections: Option<&[Section]>,
    ) -> Result<AnalysisPayload> {
        let selector = sections.map(|list| {
            list.iter()
                .map(|s| s.selector())
                .collect::<Vec<_>>()
                .join(",")
        });
        let url = self.analysis_url(stock_code, selector.as_deref(), period)?;
        let timeout = Section::ALL
            .iter()
            .map(|s| self.config.section_timeout(*s))
            .max()
            .unwrap_or(Duration::from_secs(60));

        self.get_json(url, timeout, None).await
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        timeout: Duration,
        section: Option<Section>,
    ) -> Result<T> {
        let endpoint = url.path().to_string();
        tracing::debug!(%url, ?timeout, "GET");

        let response = self
            .authorized(self.client.get(url).timeout(timeout))
            .send()
            .await
            .map_err(|e| match section {
                Some(section) if e.is_timeout() => CanvasError::Timeout { section },
                _ => CanvasError::NetworkError(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CanvasError::HttpStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AnalysisBackend for InvestmentApiClient {
    async fn fetch_section(&self, stock_code: &str, section: Section) -> Result<AnalysisPayload> {
        let url = self.analysis_url(stock_code, Some(section.selector()), None)?;
        self.get_json(url, self.config.section_timeout(section), Some(section))
            .await
    }

    async fn fetch_chart(&self, stock_code: &str, period: ChartPeriod) -> Result<ChartData> {
        let url = self.analysis_url(stock_code, Some(Section::Chart.selector()), Some(period))?;
        let payload: AnalysisPayload = self
            .get_json(url, self.config.chart_period_timeout, Some(Section::Chart))
            .await?;

        payload
            .chart_data
            .ok_or_else(|| CanvasError::MissingSection {
                stock_code: stock_code.to_string(),
                section: Section::Chart,
            })
    }
}

//! Configuration for the investment-analysis client

use crate::error::{CanvasError, Result};
use crate::model::Section;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "http://localhost:3000/api";

/// Per-section request timeouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTimeouts(BTreeMap<Section, Duration>);

impl Default for SectionTimeouts {
    fn default() -> Self {
        Self(
            Section::ALL
                .iter()
                .map(|s| (*s, s.default_timeout()))
                .collect(),
        )
    }
}

impl SectionTimeouts {
    /// Timeout for a section
    pub fn get(&self, section: Section) -> Duration {
        self.0
            .get(&section)
            .copied()
            .unwrap_or_else(|| section.default_timeout())
    }

    /// Override the timeout for a section
    pub fn set(&mut self, section: Section, timeout: Duration) {
        self.0.insert(section, timeout);
    }
}

/// Configuration for the API clients and the chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Base URL of the backend, e.g. `https://host/api`
    pub api_base: String,

    /// Bearer token attached to every request
    pub api_token: Option<String>,

    /// Request timeout per section
    pub section_timeouts: SectionTimeouts,

    /// Timeout for refetching the chart with another period
    pub chart_period_timeout: Duration,

    /// Timeout for a chat round trip
    pub chat_timeout: Duration,

    /// Maximum number of API history turns sent as chat context
    pub max_chat_history: usize,

    /// Stock shown when nothing else was selected
    pub default_stock_code: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_token: None,
            section_timeouts: SectionTimeouts::default(),
            chart_period_timeout: Duration::from_secs(30),
            chat_timeout: Duration::from_secs(600),
            max_chat_history: 50,
            default_stock_code: "005930".to_string(),
        }
    }
}

impl CanvasConfig {
    /// Create a new configuration builder
    pub fn builder() -> CanvasConfigBuilder {
        CanvasConfigBuilder::default()
    }

    /// Build from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api_base)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CanvasError::ConfigError(format!(
                "api_base must be http(s), got {}",
                url.scheme()
            )));
        }

        if Section::ALL
            .iter()
            .any(|s| self.section_timeouts.get(*s).is_zero())
        {
            return Err(CanvasError::ConfigError(
                "section timeouts must be greater than 0".to_string(),
            ));
        }

        if self.max_chat_history == 0 {
            return Err(CanvasError::ConfigError(
                "max_chat_history must be greater than 0".to_string(),
            ));
        }

        if self.default_stock_code.trim().is_empty() {
            return Err(CanvasError::ConfigError(
                "default_stock_code must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Timeout for one section request
    pub fn section_timeout(&self, section: Section) -> Duration {
        self.section_timeouts.get(section)
    }
}

/// Builder for CanvasConfig
#[derive(Debug, Default)]
pub struct CanvasConfigBuilder {
    api_base: Option<String>,
    api_token: Option<String>,
    section_timeouts: Option<SectionTimeouts>,
    chart_period_timeout: Option<Duration>,
    chat_timeout: Option<Duration>,
    max_chat_history: Option<usize>,
    default_stock_code: Option<String>,
}

impl CanvasConfigBuilder {
    /// Set the backend base URL
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Set the bearer token
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Override one section's timeout
    pub fn section_timeout(mut self, section: Section, timeout: Duration) -> Self {
        self.section_timeouts
            .get_or_insert_with(SectionTimeouts::default)
            .set(section, timeout);
        self
    }

    /// Set the chart period refetch timeout
    pub fn chart_period_timeout(mut self, timeout: Duration) -> Self {
        self.chart_period_timeout = Some(timeout);
        self
    }

    /// Set the chat timeout
    pub fn chat_timeout(mut self, timeout: Duration) -> Self {
        self.chat_timeout = Some(timeout);
        self
    }

    /// Set the chat history cap
    pub fn max_chat_history(mut self, max: usize) -> Self {
        self.max_chat_history = Some(max);
        self
    }

    /// Set the fallback stock code
    pub fn default_stock_code(mut self, code: impl Into<String>) -> Self {
        self.default_stock_code = Some(code.into());
        self
    }

    /// Read `CANVAS_API_BASE`, `CANVAS_API_TOKEN`, and `CANVAS_DEFAULT_STOCK`
    pub fn with_env(mut self) -> Self {
        if let Ok(base) = std::env::var("CANVAS_API_BASE") {
            self.api_base = Some(base);
        }
        if let Ok(token) = std::env::var("CANVAS_API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Ok(code) = std::env::var("CANVAS_DEFAULT_STOCK") {
            self.default_stock_code = Some(code);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<CanvasConfig> {
        let defaults = CanvasConfig::default();

        let config = CanvasConfig {
            api_base: self.api_base.unwrap_or(defaults.api_base),
            api_token: self.api_token.filter(|t| !t.is_empty()),
            section_timeouts: self.section_timeouts.unwrap_or(defaults.section_timeouts),
            chart_period_timeout: self
                .chart_period_timeout
                .unwrap_or(defaults.chart_period_timeout),
            chat_timeout: self.chat_timeout.unwrap_or(defaults.chat_timeout),
            max_chat_history: self.max_chat_history.unwrap_or(defaults.max_chat_history),
            default_stock_code: self
                .default_stock_code
                .unwrap_or(defaults.default_stock_code),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CanvasConfig::default();
        assert_eq!(config.default_stock_code, "005930");
        assert_eq!(config.section_timeout(Section::Risk), Duration::from_secs(60));
        assert_eq!(config.chat_timeout, Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = CanvasConfig::builder()
            .api_base("https://canvas.example.com/api")
            .api_token("secret")
            .section_timeout(Section::News, Duration::from_secs(90))
            .max_chat_history(10)
            .build()
            .unwrap();

        assert_eq!(config.api_base, "https://canvas.example.com/api");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.section_timeout(Section::News), Duration::from_secs(90));
        assert_eq!(config.section_timeout(Section::Chart), Duration::from_secs(30));
        assert_eq!(config.max_chat_history, 10);
    }

    #[test]
    fn test_empty_token_is_dropped() {
        let config = CanvasConfig::builder().api_token("").build().unwrap();
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_validation_rejects_bad_base() {
        let config = CanvasConfig {
            api_base: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CanvasError::UrlError(_))));

        let config = CanvasConfig {
            api_base: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CanvasError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let result = CanvasConfig::builder()
            .section_timeout(Section::Dividend, Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_history() {
        let config = CanvasConfig {
            max_chat_history: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Error types for the investment-analysis client

use crate::model::Section;
use thiserror::Error;

/// Errors raised by the API clients, the aggregator, and the chat session
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The backend answered with a non-success status
    #[error("HTTP {status} from {endpoint}")]
    HttpStatus {
        endpoint: String,
        status: u16,
    },

    /// A section request exceeded its timeout
    #[error("Timed out fetching {section} section")]
    Timeout {
        section: Section,
    },

    /// The backend response did not contain the requested section
    #[error("Response for {stock_code} is missing the {section} section")]
    MissingSection {
        stock_code: String,
        section: Section,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Malformed base URL
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Chat session error
    #[error("Chat error: {0}")]
    ChatError(String),

    /// REPL command could not be parsed
    #[error("Command error: {0}")]
    CommandError(String),

    /// Writing an export failed
    #[error("Export failed: {0}")]
    ExportError(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, CanvasError>;

impl CanvasError {
    /// Whether the error is a request timeout, at either layer
    pub fn is_timeout(&self) -> bool {
        match self {
            CanvasError::Timeout { .. } => true,
            CanvasError::NetworkError(e) => e.is_timeout(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CanvasError::HttpStatus {
            endpoint: "/investment-analysis".to_string(),
            status: 502,
        };
        assert_eq!(err.to_string(), "HTTP 502 from /investment-analysis");

        let err = CanvasError::MissingSection {
            stock_code: "005930".to_string(),
            section: Section::Risk,
        };
        assert_eq!(
            err.to_string(),
            "Response for 005930 is missing the risk section"
        );
    }

    #[test]
    fn test_timeout_detection() {
        assert!(CanvasError::Timeout { section: Section::News }.is_timeout());
        assert!(!CanvasError::Other("boom".to_string()).is_timeout());
    }
}

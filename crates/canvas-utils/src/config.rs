//! Application-level configuration

use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub default_directive: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directive: "warn,canvas_stock=info,stock_canvas=info".to_string(),
            json: false,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
    /// Logging settings
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "stock-canvas".to_string(),
            environment: "development".to_string(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load overrides from `CANVAS_ENV` and `CANVAS_LOG_JSON`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(env) = std::env::var("CANVAS_ENV") {
            config.environment = env;
        }
        if let Ok(json) = std::env::var("CANVAS_LOG_JSON") {
            config.log.json = parse_flag(&json);
        }
        config
    }

    /// Whether the application runs in production
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app_name, "stock-canvas");
        assert!(!config.is_production());
        assert!(!config.log.json);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("ON"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn test_config_serde() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.log, config.log);
    }
}

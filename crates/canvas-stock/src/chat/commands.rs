//! REPL command parsing
//!
//! Lines starting with `/` are commands; everything else is sent to the chat
//! backend as a question.

use crate::error::{CanvasError, Result};
use crate::model::ChartPeriod;
use std::path::PathBuf;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load the dashboard for a stock
    Analyze { stock_code: String },
    /// Reload the current stock
    Refresh,
    /// Switch the chart period
    Chart { period: ChartPeriod },
    /// Regenerate the last reply
    Regenerate,
    /// Delete a message by id
    Delete { message_id: String },
    /// Print the dashboard
    Canvas,
    /// Write the view-model as JSON
    Export { dir: Option<PathBuf> },
    /// Clear the conversation
    Clear,
    Help,
    Exit,
    /// Anything that is not a command
    Query { text: String },
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(CanvasError::CommandError("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Query {
                text: input.to_string(),
            });
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err(CanvasError::CommandError("Empty command".to_string()));
        };

        match cmd.to_lowercase().as_str() {
            "analyze" | "a" | "분석" => {
                let code = args.first().ok_or_else(|| {
                    CanvasError::CommandError("Missing stock code for analyze command".to_string())
                })?;
                Ok(Command::Analyze {
                    stock_code: (*code).to_string(),
                })
            }
            "refresh" | "r" | "새로고침" => Ok(Command::Refresh),
            "chart" | "c" | "차트" => {
                let period = match args.first() {
                    Some(code) => code.parse().map_err(CanvasError::CommandError)?,
                    None => ChartPeriod::default(),
                };
                Ok(Command::Chart { period })
            }
            "regenerate" | "regen" | "재생성" => Ok(Command::Regenerate),
            "delete" | "del" | "삭제" => {
                let id = args.first().ok_or_else(|| {
                    CanvasError::CommandError("Missing message id for delete command".to_string())
                })?;
                Ok(Command::Delete {
                    message_id: (*id).to_string(),
                })
            }
            "canvas" | "dashboard" | "캔버스" => Ok(Command::Canvas),
            "export" | "e" | "내보내기" => Ok(Command::Export {
                dir: args.first().map(PathBuf::from),
            }),
            "clear" | "cls" | "지우기" => Ok(Command::Clear),
            "help" | "h" | "?" | "도움말" => Ok(Command::Help),
            "exit" | "quit" | "q" | "종료" => Ok(Command::Exit),
            other => Err(CanvasError::CommandError(format!("Unknown command: {other}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r#"
Stock Canvas Commands
=====================

Dashboard:
  /analyze <code>     종목 분석 대시보드 로딩 (Load dashboard)
  /refresh            현재 종목 새로고침 (Reload current stock)
  /chart <D|W|M|Y>    차트 기간 변경 (Change chart period)
  /canvas             대시보드 출력 (Print dashboard)
  /export [dir]       JSON 내보내기 (Export as JSON)

Chat:
  /regenerate         마지막 답변 재생성 (Regenerate last reply)
  /delete <id>        메시지 삭제 (Delete message)
  /clear              대화 초기화 (Clear conversation)

Other:
  /help               도움말 (Show help)
  /exit               종료 (Exit)

Anything else is sent to the assistant, e.g. "삼성전자 분석해줘".
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        assert_eq!(
            Command::parse("/analyze 005930").unwrap(),
            Command::Analyze {
                stock_code: "005930".to_string()
            }
        );
        assert_eq!(
            Command::parse("/a 000660").unwrap(),
            Command::Analyze {
                stock_code: "000660".to_string()
            }
        );
        assert!(Command::parse("/analyze").is_err());
    }

    #[test]
    fn test_parse_chart_period() {
        assert_eq!(
            Command::parse("/chart w").unwrap(),
            Command::Chart {
                period: ChartPeriod::Weekly
            }
        );
        assert_eq!(
            Command::parse("/chart").unwrap(),
            Command::Chart {
                period: ChartPeriod::Monthly
            }
        );
        assert!(Command::parse("/chart X").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("/refresh").unwrap(), Command::Refresh);
        assert_eq!(Command::parse("/regenerate").unwrap(), Command::Regenerate);
        assert_eq!(Command::parse("/canvas").unwrap(), Command::Canvas);
        assert_eq!(Command::parse("/clear").unwrap(), Command::Clear);
        assert_eq!(Command::parse("/HELP").unwrap(), Command::Help);
        assert_eq!(Command::parse("/q").unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_export_and_delete() {
        assert_eq!(
            Command::parse("/export").unwrap(),
            Command::Export { dir: None }
        );
        assert_eq!(
            Command::parse("/export ./out").unwrap(),
            Command::Export {
                dir: Some(PathBuf::from("./out"))
            }
        );
        assert_eq!(
            Command::parse("/delete abc").unwrap(),
            Command::Delete {
                message_id: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(
            Command::parse("  삼성전자 어때?  ").unwrap(),
            Command::Query {
                text: "삼성전자 어때?".to_string()
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("/").is_err());
        assert!(Command::parse("/unknown").is_err());
    }
}

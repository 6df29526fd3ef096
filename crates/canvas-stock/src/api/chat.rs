//! Chat endpoint client

use crate::config::CanvasConfig;
use crate::error::{CanvasError, Result};
use crate::model::{ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const CHAT_PATH: [&str; 2] = ["agentica", "chat"];

/// Shown when the chat backend does not answer in time
pub const TIMEOUT_MESSAGE: &str =
    "응답 시간이 초과되었습니다. 더 간단한 질문으로 다시 시도해 주세요.";

/// Shown for every other transport failure
pub const SEND_FAILED_MESSAGE: &str = "메시지 전송 중 오류가 발생했습니다. 다시 시도해 주세요.";

/// Conversational backend
///
/// Transport failures are folded into a `success: false` response, so callers
/// only ever see a `ChatResponse`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_message(&self, message: &str, context: Vec<ChatMessage>) -> ChatResponse;
}

/// HTTP client for `POST /agentica/chat`
#[derive(Debug, Clone)]
pub struct ChatApiClient {
    client: Client,
    url: Url,
    token: Option<String>,
    timeout: Duration,
}

impl ChatApiClient {
    /// Create a client from a validated configuration
    pub fn new(config: &CanvasConfig) -> Result<Self> {
        config.validate()?;
        let mut url = Url::parse(&config.api_base)?;
        url.path_segments_mut()
            .map_err(|()| {
                CanvasError::ConfigError(format!("{} cannot be used as a base URL", config.api_base))
            })?
            .pop_if_empty()
            .extend(CHAT_PATH);

        Ok(Self {
            client: Client::new(),
            url,
            token: config.api_token.clone(),
            timeout: config.chat_timeout,
        })
    }

    /// Endpoint this client posts to
    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn post(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let mut builder = self
            .client
            .post(self.url.clone())
            .timeout(self.timeout)
            .json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CanvasError::HttpStatus {
                endpoint: self.url.path().to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatBackend for ChatApiClient {
    async fn send_message(&self, message: &str, context: Vec<ChatMessage>) -> ChatResponse {
        let request = ChatRequest {
            message: message.to_string(),
            context,
        };

        match self.post(&request).await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                tracing::warn!(error = %e, "chat request timed out");
                ChatResponse::failure(TIMEOUT_MESSAGE)
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                ChatResponse::failure(SEND_FAILED_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url() {
        let config = CanvasConfig::builder()
            .api_base("https://canvas.example.com/api/")
            .build()
            .unwrap();
        let client = ChatApiClient::new(&config).unwrap();
        assert_eq!(client.url().as_str(), "https://canvas.example.com/api/agentica/chat");
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_failed_response() {
        let config = CanvasConfig::builder()
            .api_base("http://127.0.0.1:9")
            .chat_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let client = ChatApiClient::new(&config).unwrap();

        let response = client.send_message("삼성전자 어때?", Vec::new()).await;
        assert!(!response.success);
        assert!(response.message == SEND_FAILED_MESSAGE || response.message == TIMEOUT_MESSAGE);
    }
}

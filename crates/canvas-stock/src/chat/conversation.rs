//! Chat session
//!
//! Owns the message list shown to the user and the API history sent as
//! context. The message list is published as immutable snapshots; every
//! mutation builds a new vector.

use crate::api::ChatBackend;
use crate::error::{CanvasError, Result};
use crate::model::{ChatMessage, ChatRole, StockInfo};
use crate::store::AppStore;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};
use uuid::Uuid;

/// Id of the typing indicator shown while a reply is pending
pub const TYPING_ID: &str = "ai-typing";

/// Id of the typing indicator shown while a reply is regenerated
pub const REGENERATE_TYPING_ID: &str = "ai-typing-regen";

/// Reply shown when the backend could not answer
pub const ERROR_REPLY: &str = "죄송합니다. 메시지 전송 중 오류가 발생했습니다. 다시 시도해 주세요.";

/// Identical user messages closer together than this are dropped
const DUPLICATE_WINDOW_MS: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    Sent,
    Error,
}

/// One entry of the displayed message list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    pub id: String,
    pub kind: MessageKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub status: Option<MessageStatus>,
    pub is_typing: bool,
    pub structured_data: Option<Value>,
}

impl ChatEntry {
    fn user(content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: MessageKind::User,
            content: content.to_string(),
            timestamp: Utc::now(),
            status: Some(MessageStatus::Sending),
            is_typing: false,
            structured_data: None,
        }
    }

    fn reply(content: &str, structured_data: Option<Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: MessageKind::Ai,
            content: content.to_string(),
            timestamp: Utc::now(),
            status: Some(MessageStatus::Sent),
            is_typing: false,
            structured_data,
        }
    }

    fn error_reply() -> Self {
        Self {
            status: Some(MessageStatus::Error),
            ..Self::reply(ERROR_REPLY, None)
        }
    }

    fn typing(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: MessageKind::Ai,
            content: String::new(),
            timestamp: Utc::now(),
            status: None,
            is_typing: true,
            structured_data: None,
        }
    }
}

/// Result of sending or regenerating a message
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The backend replied; `stock` is the stock it detected, if any
    Replied {
        message_id: String,
        stock: Option<StockInfo>,
    },
    /// The backend reported a failure
    Failed { reason: String },
    /// Same text was sent less than a second ago
    Duplicate,
}

/// Conversation with the chat backend
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    store: AppStore,
    messages: watch::Sender<Arc<Vec<ChatEntry>>>,
    history: Mutex<VecDeque<ChatMessage>>,
    max_history: usize,
}

impl ChatSession {
    /// Create a session that keeps at most `max_history` API turns
    pub fn new(backend: Arc<dyn ChatBackend>, store: AppStore, max_history: usize) -> Self {
        let (messages, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            backend,
            store,
            messages,
            history: Mutex::new(VecDeque::with_capacity(max_history)),
            max_history: max_history.max(1),
        }
    }

    /// Current message list
    pub fn messages(&self) -> Arc<Vec<ChatEntry>> {
        self.messages.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<ChatEntry>>> {
        self.messages.subscribe()
    }

    /// Whether a reply is pending
    pub fn is_typing(&self) -> bool {
        self.messages.borrow().iter().any(|m| m.is_typing)
    }

    /// API history as it will be sent with the next message
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.iter().cloned().collect()
    }

    /// Send a user message and wait for the reply
    pub async fn send_message(&self, content: &str) -> Result<SendOutcome> {
        let content = content.trim();
        if content.is_empty() {
            return Err(CanvasError::ChatError("message is empty".to_string()));
        }

        let user = ChatEntry::user(content);
        let user_id = user.id.clone();
        let sent_at = user.timestamp;
        let appended = self.update(|messages| {
            let window = TimeDelta::milliseconds(DUPLICATE_WINDOW_MS);
            let duplicate = messages.iter().any(|m| {
                m.kind == MessageKind::User
                    && m.content == content
                    && sent_at.signed_duration_since(m.timestamp) < window
            });
            if duplicate {
                return false;
            }
            messages.push(user);
            true
        });
        if !appended {
            debug!("dropping duplicate message");
            return Ok(SendOutcome::Duplicate);
        }

        self.update(|messages| {
            messages.push(ChatEntry::typing(TYPING_ID));
            set_status(messages, &user_id, MessageStatus::Sent);
            true
        });

        let context = {
            let mut history = self.history.lock().await;
            let context: Vec<ChatMessage> = history.iter().cloned().collect();
            push_capped(&mut history, ChatMessage::user(content), self.max_history);
            context
        };

        let response = self.backend.send_message(content, context).await;

        if !response.success {
            warn!(reason = %response.message, "chat reply failed");
            self.update(|messages| {
                set_status(messages, &user_id, MessageStatus::Error);
                messages.retain(|m| m.id != TYPING_ID);
                messages.push(ChatEntry::error_reply());
                true
            });
            return Ok(SendOutcome::Failed {
                reason: response.message,
            });
        }

        if let Some(stock) = &response.stock_info {
            debug!(code = %stock.code, "backend detected a stock");
            self.store.select_stock(stock.code.clone(), stock.name.clone());
            self.store.open_canvas();
        }

        {
            let mut history = self.history.lock().await;
            push_capped(
                &mut history,
                ChatMessage::assistant(response.message.clone()),
                self.max_history,
            );
        }

        let reply = ChatEntry::reply(&response.message, response.structured_data);
        let message_id = reply.id.clone();
        self.update(|messages| {
            messages.retain(|m| m.id != TYPING_ID);
            messages.push(reply);
            true
        });

        Ok(SendOutcome::Replied {
            message_id,
            stock: response.stock_info,
        })
    }

    /// Ask again for the reply with id `message_id`
    ///
    /// The old reply is removed. On success the last assistant turn of the
    /// API history is replaced with the new reply. The store selection is
    /// left alone.
    pub async fn regenerate_message(&self, message_id: &str) -> Result<SendOutcome> {
        let snapshot = self.messages();
        let index = snapshot
            .iter()
            .position(|m| m.id == message_id)
            .ok_or_else(|| CanvasError::ChatError(format!("no message with id {message_id}")))?;

        let target = &snapshot[index];
        if target.kind != MessageKind::Ai || target.is_typing {
            return Err(CanvasError::ChatError(
                "only replies can be regenerated".to_string(),
            ));
        }

        let prompt = snapshot[..index]
            .iter()
            .rev()
            .find(|m| m.kind == MessageKind::User)
            .map(|m| m.content.clone())
            .ok_or_else(|| CanvasError::ChatError("reply has no preceding question".to_string()))?;

        self.update(|messages| {
            messages.retain(|m| m.id != message_id);
            messages.push(ChatEntry::typing(REGENERATE_TYPING_ID));
            true
        });

        let context = self.history().await;
        let response = self.backend.send_message(&prompt, context).await;

        if !response.success {
            warn!(reason = %response.message, "regenerating reply failed");
            self.update(|messages| {
                messages.retain(|m| m.id != REGENERATE_TYPING_ID);
                true
            });
            return Ok(SendOutcome::Failed {
                reason: response.message,
            });
        }

        {
            let mut history = self.history.lock().await;
            if let Some(turn) = history
                .iter_mut()
                .rev()
                .find(|turn| turn.role == ChatRole::Assistant)
            {
                *turn = ChatMessage::assistant(response.message.clone());
            }
        }

        let reply = ChatEntry::reply(&response.message, response.structured_data);
        let message_id = reply.id.clone();
        self.update(|messages| {
            messages.retain(|m| m.id != REGENERATE_TYPING_ID);
            messages.push(reply);
            true
        });

        Ok(SendOutcome::Replied {
            message_id,
            stock: None,
        })
    }

    /// Remove one message from the list; the API history is kept
    pub fn delete_message(&self, message_id: &str) -> bool {
        self.update(|messages| {
            let before = messages.len();
            messages.retain(|m| m.id != message_id);
            messages.len() != before
        })
    }

    /// Drop every message and the API history
    pub async fn clear(&self) {
        self.update(|messages| {
            let had_messages = !messages.is_empty();
            messages.clear();
            had_messages
        });
        self.history.lock().await.clear();
    }

    fn update(&self, modify: impl FnOnce(&mut Vec<ChatEntry>) -> bool) -> bool {
        self.messages.send_if_modified(|current| {
            let mut next = current.as_ref().clone();
            if !modify(&mut next) {
                return false;
            }
            *current = Arc::new(next);
            true
        })
    }
}

fn set_status(messages: &mut [ChatEntry], id: &str, status: MessageStatus) {
    if let Some(entry) = messages.iter_mut().find(|m| m.id == id) {
        entry.status = Some(status);
    }
}

fn push_capped(history: &mut VecDeque<ChatMessage>, turn: ChatMessage, max: usize) {
    history.push_back(turn);
    while history.len() > max {
        history.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockChatBackend;
    use crate::model::ChatResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::oneshot;

    fn replied(message: &str) -> ChatResponse {
        ChatResponse {
            success: true,
            message: message.to_string(),
            ..Default::default()
        }
    }

    fn session(mock: MockChatBackend, max_history: usize) -> (ChatSession, AppStore) {
        let store = AppStore::new();
        (
            ChatSession::new(Arc::new(mock), store.clone(), max_history),
            store,
        )
    }

    #[tokio::test]
    async fn test_send_appends_user_and_reply() {
        let mut mock = MockChatBackend::new();
        mock.expect_send_message()
            .times(1)
            .withf(|message, context| message.contains("반도체") && context.is_empty())
            .returning(|_, _| ChatResponse {
                structured_data: Some(json!({ "type": "summary" })),
                ..replied("반도체 업황은 회복 중입니다.")
            });
        let (session, store) = session(mock, 50);

        let outcome = session.send_message("  반도체 업황 어때?  ").await.unwrap();
        assert!(matches!(outcome, SendOutcome::Replied { stock: None, .. }));

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].kind, MessageKind::User);
        assert_eq!(messages[0].content, "반도체 업황 어때?");
        assert_eq!(messages[0].status, Some(MessageStatus::Sent));
        assert_eq!(messages[1].kind, MessageKind::Ai);
        assert_eq!(messages[1].structured_data, Some(json!({ "type": "summary" })));
        assert!(!session.is_typing());

        let history = session.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::User);
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert!(store.selection().is_none());
    }

    #[tokio::test]
    async fn test_context_is_history_before_message() {
        let mut mock = MockChatBackend::new();
        mock.expect_send_message()
            .times(1)
            .withf(|_, context| context.is_empty())
            .returning(|_, _| replied("첫 답변"));
        mock.expect_send_message()
            .times(1)
            .withf(|message, context| {
                message.contains("두번째")
                    && context.len() == 2
                    && context[0].content == "첫 질문"
                    && context[1].content == "첫 답변"
            })
            .returning(|_, _| replied("두번째 답변"));
        let (session, _) = session(mock, 50);

        session.send_message("첫 질문").await.unwrap();
        session.send_message("두번째 질문").await.unwrap();
        assert_eq!(session.history().await.len(), 4);
    }

    #[tokio::test]
    async fn test_detected_stock_updates_store() {
        let mut mock = MockChatBackend::new();
        mock.expect_send_message().returning(|_, _| ChatResponse {
            stock_info: Some(StockInfo {
                code: "005930".to_string(),
                name: Some("삼성전자".to_string()),
                detected_from: "name".to_string(),
            }),
            ..replied("삼성전자 분석을 시작합니다.")
        });
        let (session, store) = session(mock, 50);

        let outcome = session.send_message("삼성전자 분석해줘").await.unwrap();
        let SendOutcome::Replied { stock, .. } = outcome else {
            panic!("expected a reply");
        };
        assert_eq!(stock.unwrap().code, "005930");

        let selection = store.selection().unwrap();
        assert_eq!(selection.code, "005930");
        assert_eq!(selection.name.as_deref(), Some("삼성전자"));
        assert!(store.layout().canvas_open);
    }

    #[tokio::test]
    async fn test_failure_marks_message_and_shows_error() {
        let mut mock = MockChatBackend::new();
        mock.expect_send_message()
            .returning(|_, _| ChatResponse::failure("timeout"));
        let (session, _) = session(mock, 50);

        let outcome = session.send_message("안녕").await.unwrap();
        assert_eq!(
            outcome,
            SendOutcome::Failed {
                reason: "timeout".to_string()
            }
        );

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].status, Some(MessageStatus::Error));
        assert_eq!(messages[1].content, ERROR_REPLY);
        assert_eq!(messages[1].status, Some(MessageStatus::Error));
        assert!(!session.is_typing());
    }

    #[tokio::test]
    async fn test_duplicate_within_a_second_is_dropped() {
        let mut mock = MockChatBackend::new();
        mock.expect_send_message()
            .times(1)
            .returning(|_, _| replied("네"));
        let (session, _) = session(mock, 50);

        session.send_message("같은 질문").await.unwrap();
        let outcome = session.send_message("같은 질문").await.unwrap();
        assert_eq!(outcome, SendOutcome::Duplicate);
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let (session, _) = session(MockChatBackend::new(), 50);
        assert!(matches!(
            session.send_message("   ").await,
            Err(CanvasError::ChatError(_))
        ));
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let mut mock = MockChatBackend::new();
        mock.expect_send_message().returning(|_, _| replied("ok"));
        let (session, _) = session(mock, 3);

        session.send_message("하나").await.unwrap();
        session.send_message("둘").await.unwrap();

        let history = session.history().await;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "ok");
        assert_eq!(history[1].content, "둘");
    }

    #[tokio::test]
    async fn test_regenerate_replaces_reply_and_history() {
        let mut mock = MockChatBackend::new();
        mock.expect_send_message()
            .times(1)
            .returning(|_, _| replied("첫 답변"));
        mock.expect_send_message()
            .times(1)
            .withf(|message, context| message.contains("질문") && context.len() == 2)
            .returning(|_, _| replied("새 답변"));
        let (session, _) = session(mock, 50);

        let SendOutcome::Replied { message_id, .. } = session.send_message("질문").await.unwrap()
        else {
            panic!("expected a reply");
        };

        let outcome = session.regenerate_message(&message_id).await.unwrap();
        assert!(matches!(outcome, SendOutcome::Replied { .. }));

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.id != message_id));
        assert_eq!(messages[1].content, "새 답변");

        let history = session.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, "새 답변");
    }

    #[tokio::test]
    async fn test_regenerate_failure_removes_indicator() {
        let mut mock = MockChatBackend::new();
        mock.expect_send_message()
            .times(1)
            .returning(|_, _| replied("첫 답변"));
        mock.expect_send_message()
            .times(1)
            .returning(|_, _| ChatResponse::failure("down"));
        let (session, _) = session(mock, 50);

        let SendOutcome::Replied { message_id, .. } = session.send_message("질문").await.unwrap()
        else {
            panic!("expected a reply");
        };
        let outcome = session.regenerate_message(&message_id).await.unwrap();
        assert!(matches!(outcome, SendOutcome::Failed { .. }));

        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert!(!session.is_typing());
        assert_eq!(session.history().await[1].content, "첫 답변");
    }

    #[tokio::test]
    async fn test_regenerate_rejects_user_message() {
        let mut mock = MockChatBackend::new();
        mock.expect_send_message().returning(|_, _| replied("답"));
        let (session, _) = session(mock, 50);

        session.send_message("질문").await.unwrap();
        let user_id = session.messages()[0].id.clone();
        assert!(session.regenerate_message(&user_id).await.is_err());
        assert!(session.regenerate_message("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let mut mock = MockChatBackend::new();
        mock.expect_send_message().returning(|_, _| replied("답"));
        let (session, _) = session(mock, 50);

        session.send_message("질문").await.unwrap();
        let first = session.messages()[0].id.clone();
        assert!(session.delete_message(&first));
        assert!(!session.delete_message(&first));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.history().await.len(), 2);

        session.clear().await;
        assert!(session.messages().is_empty());
        assert!(session.history().await.is_empty());
    }

    struct GatedChat {
        gate: Mutex<Option<oneshot::Receiver<ChatResponse>>>,
    }

    #[async_trait]
    impl ChatBackend for GatedChat {
        async fn send_message(&self, _message: &str, _context: Vec<ChatMessage>) -> ChatResponse {
            let gate = self.gate.lock().await.take();
            match gate {
                Some(rx) => rx.await.unwrap_or_else(|_| ChatResponse::failure("dropped")),
                None => ChatResponse::failure("no gate"),
            }
        }
    }

    #[tokio::test]
    async fn test_typing_indicator_while_pending() {
        let (tx, rx) = oneshot::channel();
        let backend = GatedChat {
            gate: Mutex::new(Some(rx)),
        };
        let session = Arc::new(ChatSession::new(Arc::new(backend), AppStore::new(), 50));
        let mut updates = session.subscribe();

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.send_message("질문").await }
        });

        updates
            .wait_for(|messages| messages.iter().any(|m| m.id == TYPING_ID))
            .await
            .unwrap();
        assert!(session.is_typing());

        tx.send(replied("답")).unwrap();
        pending.await.unwrap().unwrap();

        assert!(!session.is_typing());
        assert_eq!(session.messages().len(), 2);
    }
}

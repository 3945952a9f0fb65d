//! Messenger that records instead of sending.
//!
//! Lets handlers and the reminder loop run without network access.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use super::error::MessagingError;
use super::{Message, Messenger};

/// One recorded send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Reply {
        reply_token: String,
        messages: Vec<Message>,
    },
    Push {
        user_id: String,
        messages: Vec<Message>,
    },
}

/// Records every reply and push in order.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingMessenger {
    sent: Arc<Mutex<Vec<Sent>>>,
    fail_pushes: Arc<AtomicBool>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent pushes fail with a 500.
    pub fn fail_pushes(&self, fail: bool) {
        self.fail_pushes.store(fail, Ordering::SeqCst);
    }

    /// Everything sent so far.
    pub async fn sent(&self) -> Vec<Sent> {
        self.sent.lock().await.clone()
    }

    /// Messages of every reply, in order.
    pub async fn replies(&self) -> Vec<Vec<Message>> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|sent| match sent {
                Sent::Reply { messages, .. } => Some(messages.clone()),
                Sent::Push { .. } => None,
            })
            .collect()
    }

    /// `(user_id, messages)` of every push, in order.
    pub async fn pushes(&self) -> Vec<(String, Vec<Message>)> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|sent| match sent {
                Sent::Push { user_id, messages } => Some((user_id.clone(), messages.clone())),
                Sent::Reply { .. } => None,
            })
            .collect()
    }

    /// Text of the last reply's messages.
    pub async fn last_reply_texts(&self) -> Vec<String> {
        self.replies()
            .await
            .pop()
            .unwrap_or_default()
            .iter()
            .map(|m| m.body().to_string())
            .collect()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

impl Messenger for RecordingMessenger {
    async fn reply(&self, reply_token: &str, messages: Vec<Message>) -> Result<(), MessagingError> {
        self.sent.lock().await.push(Sent::Reply {
            reply_token: reply_token.to_string(),
            messages,
        });
        Ok(())
    }

    async fn push(&self, user_id: &str, messages: Vec<Message>) -> Result<(), MessagingError> {
        if self.fail_pushes.load(Ordering::SeqCst) {
            return Err(MessagingError::ApiError {
                status: 500,
                message: "push disabled".to_string(),
            });
        }
        self.sent.lock().await.push(Sent::Push {
            user_id: user_id.to_string(),
            messages,
        });
        Ok(())
    }
}

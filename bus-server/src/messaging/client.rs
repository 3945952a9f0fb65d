//! LINE Messaging API client.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

use super::error::MessagingError;
use super::{Message, Messenger};

/// Default base URL for the LINE Messaging API.
const DEFAULT_BASE_URL: &str = "https://api.line.me";

/// The API rejects requests carrying more than this many messages.
const MAX_MESSAGES_PER_REQUEST: usize = 5;

/// Configuration for the LINE client.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Channel access token
    pub channel_access_token: String,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LineConfig {
    pub fn new(channel_access_token: impl Into<String>) -> Self {
        Self {
            channel_access_token: channel_access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [Message],
}

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: &'a [Message],
}

/// Sends replies and pushes through the LINE Messaging API.
#[derive(Debug, Clone)]
pub struct LineClient {
    http: reqwest::Client,
    base_url: String,
}

impl LineClient {
    pub fn new(config: LineConfig) -> Result<Self, MessagingError> {
        let mut headers = HeaderMap::new();

        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.channel_access_token))
            .map_err(|_| {
                MessagingError::InvalidConfig("channel access token is not a valid header".into())
            })?;
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(), MessagingError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self.http.post(&url).json(body).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(MessagingError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MessagingError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MessagingError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        debug!(path, "message sent");
        Ok(())
    }
}

impl Messenger for LineClient {
    async fn reply(&self, reply_token: &str, messages: Vec<Message>) -> Result<(), MessagingError> {
        let messages = &messages[..messages.len().min(MAX_MESSAGES_PER_REQUEST)];
        self.post(
            "/v2/bot/message/reply",
            &ReplyRequest {
                reply_token,
                messages,
            },
        )
        .await
    }

    async fn push(&self, user_id: &str, messages: Vec<Message>) -> Result<(), MessagingError> {
        let messages = &messages[..messages.len().min(MAX_MESSAGES_PER_REQUEST)];
        self.post(
            "/v2/bot/message/push",
            &PushRequest {
                to: user_id,
                messages,
            },
        )
        .await
    }
}

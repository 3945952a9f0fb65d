//! Incoming webhook payloads.
//!
//! Only the fields the bot reads are modelled; everything else in the
//! payload is ignored.

use serde::Deserialize;

/// Body of a webhook POST.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WebhookEvent {
    /// The user added the bot as a friend.
    Follow(FollowEvent),
    Message(MessageEvent),
    Postback(PostbackEvent),
    /// Unfollow, join, beacon and other kinds the bot ignores.
    #[serde(other)]
    Other,
}

impl WebhookEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            WebhookEvent::Follow(_) => "follow",
            WebhookEvent::Message(_) => "message",
            WebhookEvent::Postback(_) => "postback",
            WebhookEvent::Other => "other",
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            WebhookEvent::Follow(e) => e.source.user_id.as_deref(),
            WebhookEvent::Message(e) => e.source.user_id.as_deref(),
            WebhookEvent::Postback(e) => e.source.user_id.as_deref(),
            WebhookEvent::Other => None,
        }
    }
}

/// Who sent an event. Group and room sources may lack a user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEvent {
    pub reply_token: String,
    #[serde(default)]
    pub source: EventSource,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub reply_token: String,
    #[serde(default)]
    pub source: EventSource,
    pub message: EventMessage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    Text { text: String },
    /// Stickers, images, locations and so on.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostbackEvent {
    pub reply_token: String,
    #[serde(default)]
    pub source: EventSource,
    pub postback: PostbackContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostbackContent {
    pub data: String,
    #[serde(default)]
    pub params: Option<PostbackParams>,
}

/// Values filled in by a picker button.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostbackParams {
    /// "YYYY-MM-DDTHH:MM" from a date-time picker.
    #[serde(default)]
    pub datetime: Option<String>,
}

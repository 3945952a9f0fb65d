//! Outgoing message payloads.
//!
//! Serialized in the shape the LINE Messaging API expects. Replies are
//! plain text; menus are offered as quick-reply buttons underneath.

use serde::Serialize;

/// Longest button label the platform accepts, in characters.
pub const MAX_LABEL_CHARS: usize = 20;

/// Most quick-reply buttons one message may carry.
pub const MAX_QUICK_REPLY_ITEMS: usize = 13;

/// A message sent to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text {
        text: String,
        #[serde(rename = "quickReply", skip_serializing_if = "Option::is_none")]
        quick_reply: Option<QuickReply>,
    },
}

impl Message {
    /// A plain text message.
    pub fn text(text: impl Into<String>) -> Self {
        Message::Text {
            text: text.into(),
            quick_reply: None,
        }
    }

    /// A text message with buttons underneath.
    ///
    /// Buttons beyond [`MAX_QUICK_REPLY_ITEMS`] are dropped.
    pub fn with_buttons(text: impl Into<String>, actions: Vec<Action>) -> Self {
        let items: Vec<QuickReplyItem> = actions
            .into_iter()
            .take(MAX_QUICK_REPLY_ITEMS)
            .map(|action| QuickReplyItem { action })
            .collect();

        Message::Text {
            text: text.into(),
            quick_reply: (!items.is_empty()).then_some(QuickReply { items }),
        }
    }

    /// The message body.
    pub fn body(&self) -> &str {
        match self {
            Message::Text { text, .. } => text,
        }
    }

    /// Buttons attached to the message, if any.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        let Message::Text { quick_reply, .. } = self;
        quick_reply
            .iter()
            .flat_map(|qr| qr.items.iter().map(|item| &item.action))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickReply {
    pub items: Vec<QuickReplyItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "action")]
pub struct QuickReplyItem {
    pub action: Action,
}

/// What a button does when tapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Sends `data` back as a postback event.
    Postback {
        label: String,
        data: String,
        #[serde(rename = "displayText", skip_serializing_if = "Option::is_none")]
        display_text: Option<String>,
    },

    /// Opens a date-time picker, then sends `data` with the chosen value.
    #[serde(rename = "datetimepicker")]
    DatetimePicker {
        label: String,
        data: String,
        mode: &'static str,
    },
}

impl Action {
    pub fn postback(label: &str, data: impl Into<String>) -> Self {
        Action::Postback {
            label: truncate_label(label),
            data: data.into(),
            display_text: None,
        }
    }

    /// A postback that also echoes `label` into the chat.
    pub fn postback_echo(label: &str, data: impl Into<String>) -> Self {
        Action::Postback {
            label: truncate_label(label),
            data: data.into(),
            display_text: Some(label.to_string()),
        }
    }

    pub fn datetime_picker(label: &str, data: impl Into<String>) -> Self {
        Action::DatetimePicker {
            label: truncate_label(label),
            data: data.into(),
            mode: "datetime",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Action::Postback { label, .. } | Action::DatetimePicker { label, .. } => label,
        }
    }

    pub fn data(&self) -> &str {
        match self {
            Action::Postback { data, .. } | Action::DatetimePicker { data, .. } => data,
        }
    }
}

fn truncate_label(label: &str) -> String {
    label.chars().take(MAX_LABEL_CHARS).collect()
}

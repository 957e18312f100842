use crate::config::DispatcherConfig;
use crate::event::Attachment;
use serde::{Deserialize, Serialize};

/// Body of `chat.postMessage`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub emoji: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Channel and display metadata shared by every batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub channel: String,
    pub text: String,
    pub alias: String,
    pub emoji: String,
    pub avatar: String,
}

impl MessageHeader {
    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self {
            channel: config.channel.clone(),
            text: config.display.header_text(),
            alias: config.display.alias.clone(),
            emoji: config.display.emoji.clone(),
            avatar: config.display.avatar.clone(),
        }
    }

    pub fn to_message(&self, attachments: &[Attachment]) -> PostMessage {
        PostMessage {
            channel: self.channel.clone(),
            text: self.text.clone(),
            alias: self.alias.clone(),
            emoji: self.emoji.clone(),
            avatar: self.avatar.clone(),
            attachments: attachments.to_vec(),
        }
    }
}

/// Authenticated REST session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub status: String,
    pub data: Option<LoginData>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginData {
    pub user_id: String,
    pub auth_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostMessageResponse {
    #[serde(default)]
    pub success: bool,
    pub error: Option<String>,
}

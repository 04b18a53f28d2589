#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChatKind {
    Chat,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub kind: ChatKind,
    pub text: String,
    pub username: Option<String>,
}

impl ChatMessage {
    pub fn chat(text: &str, username: Option<String>) -> ChatMessage {
        return ChatMessage {
            kind: ChatKind::Chat,
            text: text.to_string(),
            username,
        };
    }

    pub fn system(text: &str) -> ChatMessage {
        return ChatMessage {
            kind: ChatKind::System,
            text: text.to_string(),
            username: None,
        };
    }

    pub fn display_text(&self) -> String {
        if self.kind == ChatKind::System {
            return format!("[system] {}", self.text);
        }

        if let Some(username) = &self.username {
            return format!("{username}: {}", self.text);
        }

        return self.text.to_string();
    }

    /// The display text split the way the chat log renders it, one entry per
    /// line.
    pub fn display_lines(&self) -> Vec<String> {
        let lines = self
            .display_text()
            .lines()
            .map(|line| return line.to_string())
            .collect::<Vec<String>>();
        if lines.is_empty() {
            return vec!["".to_string()];
        }

        return lines;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Open,
    Closed,
}

/// Events raised by a channel connection. The generation identifies which
/// connection raised it, so events of a replaced connection can be dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    Opened(u64),
    Message(u64, ChatMessage),
    Closed(u64),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutboundFrame<'a> {
    ChatMessage { message: &'a str },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InboundFrame {
    ChatMessage {
        message: String,
        #[serde(default)]
        username: Option<String>,
    },
    System {
        #[serde(default)]
        message: Option<String>,
    },
}

pub fn encode_chat_frame(message: &str) -> Result<String> {
    return Ok(serde_json::to_string(&OutboundFrame::ChatMessage {
        message,
    })?);
}

/// Parses an inbound channel payload. Unknown kinds and malformed payloads
/// produce `None`.
pub fn parse_chat_frame(payload: &str) -> Option<ChatMessage> {
    let frame = match serde_json::from_str::<InboundFrame>(payload) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::debug!(error = ?err, payload, "Ignoring channel payload");
            return None;
        }
    };

    match frame {
        InboundFrame::ChatMessage { message, username } => {
            return Some(ChatMessage::chat(&message, username));
        }
        InboundFrame::System { message } => {
            return message
                .filter(|text| return !text.is_empty())
                .map(|text| return ChatMessage::system(&text));
        }
    }
}

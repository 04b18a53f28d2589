#[cfg(test)]
#[path = "chat_session_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::ChannelEvent;
use crate::domain::models::ChannelState;
use crate::domain::models::ChatChannelBox;
use crate::domain::models::ChatMessage;
use crate::domain::models::ChatSession;
use crate::domain::models::ChatUi;
use crate::domain::models::PageLocation;

/// Lifecycle of the problem's shared chat session: resumption from the page
/// address, session creation, the share step and the live channel.
pub struct ChatSessionManager {
    page: PageLocation,
    problem_id: String,
    state: ChatSession,
    creating: bool,
    channel: ChatChannelBox,
}

impl ChatSessionManager {
    pub fn new(page: PageLocation, problem_id: &str, channel: ChatChannelBox) -> ChatSessionManager {
        return ChatSessionManager {
            page,
            problem_id: problem_id.to_string(),
            state: ChatSession::NoSession,
            creating: false,
            channel,
        };
    }

    pub fn state(&self) -> &ChatSession {
        return &self.state;
    }

    pub fn share_url(&self) -> &str {
        return self.page.as_str();
    }

    pub fn channel_state(&self) -> ChannelState {
        return self.channel.state();
    }

    /// Picks up a session id carried by the page address. Returns whether the
    /// chat pane should be brought to front.
    pub fn resume(&mut self) -> bool {
        let Some(session_id) = self.page.session_id() else {
            return false;
        };

        tracing::info!(session_id = session_id.as_str(), "Resuming chat session");
        self.open_channel(&session_id);
        self.state = ChatSession::SessionKnown {
            session_id,
            ui: ChatUi::FullChat,
        };

        return true;
    }

    /// Claims the single in-flight creation request. `false` when a session
    /// already exists or a request is pending.
    pub fn begin_create(&mut self) -> bool {
        if self.state != ChatSession::NoSession || self.creating {
            tracing::debug!("Ignoring chat session creation");
            return false;
        }

        self.creating = true;
        return true;
    }

    pub fn handle_created(&mut self, result: Result<String>) {
        self.creating = false;

        let session_id = match result {
            Ok(session_id) => session_id,
            Err(err) => {
                tracing::error!(error = ?err, "Error creating chat session");
                return;
            }
        };

        if session_id.is_empty() || self.state != ChatSession::NoSession {
            tracing::warn!(session_id = session_id.as_str(), "Discarding chat session");
            return;
        }

        self.page.replace_session(&session_id);
        tracing::info!(url = self.page.as_str(), "Created chat session");
        self.state = ChatSession::SessionKnown {
            session_id,
            ui: ChatUi::UrlOnly,
        };
    }

    /// The address to put on the clipboard, only while the share step is
    /// pending.
    pub fn begin_copy(&self) -> Option<String> {
        if self.state.ui() != Some(ChatUi::UrlOnly) {
            return None;
        }

        return Some(self.page.as_str().to_string());
    }

    pub fn handle_copied(&mut self, result: Result<()>) {
        if let Err(err) = result {
            tracing::error!(error = ?err, "Failed to copy chat URL");
            return;
        }

        let session_id = match &self.state {
            ChatSession::SessionKnown {
                session_id,
                ui: ChatUi::UrlOnly,
            } => session_id.to_string(),
            _ => return,
        };

        self.open_channel(&session_id);
        self.state = ChatSession::SessionKnown {
            session_id,
            ui: ChatUi::FullChat,
        };
    }

    /// Sends the trimmed input. Returns whether the channel took it, which is
    /// the caller's cue to clear its input.
    pub fn send_message(&self, text: &str) -> bool {
        if self.state.ui() != Some(ChatUi::FullChat) {
            return false;
        }

        let message = text.trim();
        if message.is_empty() {
            return false;
        }

        return self.channel.send(message);
    }

    /// Filters channel events down to the chat entries to append.
    pub fn handle_channel_event(&mut self, event: ChannelEvent) -> Option<ChatMessage> {
        if !self.channel.accept(&event) {
            tracing::debug!("Ignoring event from a replaced channel");
            return None;
        }

        match event {
            ChannelEvent::Message(_, message) => return Some(message),
            ChannelEvent::Opened(_) => {
                tracing::info!("Chat channel open");
                return None;
            }
            ChannelEvent::Closed(_) => return None,
        }
    }

    /// Opens the channel again after it closed. Only ever user triggered.
    pub fn reconnect(&mut self) -> bool {
        let session_id = match &self.state {
            ChatSession::SessionKnown {
                session_id,
                ui: ChatUi::FullChat,
            } => session_id.to_string(),
            _ => return false,
        };

        if self.channel.state() != ChannelState::Closed {
            return false;
        }

        self.open_channel(&session_id);
        return true;
    }

    fn open_channel(&mut self, session_id: &str) {
        if self.problem_id.is_empty() {
            tracing::warn!(session_id, "No problem id, not opening chat channel");
            return;
        }

        if let Err(err) = self.channel.connect(session_id, &self.problem_id) {
            tracing::error!(error = ?err, session_id, "Failed to open chat channel");
        }
    }
}

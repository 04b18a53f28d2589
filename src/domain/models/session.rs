#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChatUi {
    /// Only the shareable URL is shown.
    UrlOnly,
    /// Chat log and input are shown.
    FullChat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatSession {
    NoSession,
    SessionKnown { session_id: String, ui: ChatUi },
}

impl ChatSession {
    pub fn session_id(&self) -> Option<&str> {
        match self {
            ChatSession::NoSession => return None,
            ChatSession::SessionKnown { session_id, .. } => return Some(session_id),
        }
    }

    pub fn ui(&self) -> Option<ChatUi> {
        match self {
            ChatSession::NoSession => return None,
            ChatSession::SessionKnown { ui, .. } => return Some(*ui),
        }
    }
}

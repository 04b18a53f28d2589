use anyhow::Result;

use super::ChannelEvent;
use super::ChannelState;

/// A single bidirectional chat channel. At most one connection is live at a
/// time; connecting again replaces it.
pub trait ChatChannel {
    fn connect(&mut self, session_id: &str, problem_id: &str) -> Result<()>;

    /// Returns whether the message was handed to an open connection.
    fn send(&self, message: &str) -> bool;

    fn close(&mut self);

    fn state(&self) -> ChannelState;

    /// Whether the event belongs to the live connection.
    fn accept(&mut self, event: &ChannelEvent) -> bool;
}

pub type ChatChannelBox = Box<dyn ChatChannel + Send>;

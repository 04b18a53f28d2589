use anyhow::Result;
use tui_textarea::Input;

use super::ChannelEvent;
use super::DispatchOutcome;

pub enum Event {
    ActionResolved(DispatchOutcome),
    Channel(ChannelEvent),
    ChatspaceCreated(Result<String>),
    KeyboardAltEnter(),
    KeyboardCharInput(Input),
    KeyboardCopyShareURL(),
    KeyboardCTRLC(),
    KeyboardCTRLEnter(),
    KeyboardCycleFocus(),
    KeyboardCycleLanguage(),
    KeyboardEnter(),
    KeyboardNewChatspace(),
    KeyboardPaste(String),
    KeyboardReconnect(),
    KeyboardTab(),
    KeyboardTestcase(),
    ShareURLCopied(Result<()>),
    UINextOutputTab(),
    UIPrevOutputTab(),
    UIResize(),
    UIScrollDown(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UIScrollUp(),
    UIShowChat(),
    UIShowProblem(),
    UITick(),
}

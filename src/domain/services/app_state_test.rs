use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use super::AppState;
use super::Focus;
use super::CHAT_TAB;
use super::PROBLEM_TAB;
use crate::domain::models::Action;
use crate::domain::models::ActionKind;
use crate::domain::models::ActionRequest;
use crate::domain::models::ActionResponse;
use crate::domain::models::ActionResult;
use crate::domain::models::Backend;
use crate::domain::models::ChannelEvent;
use crate::domain::models::ChannelState;
use crate::domain::models::ChatChannel;
use crate::domain::models::ChatMessage;
use crate::domain::models::DispatchOutcome;
use crate::domain::models::Event;
use crate::domain::models::OutputField;
use crate::domain::models::PageLocation;
use crate::domain::services::ActionDispatcher;
use crate::domain::services::ChatSessionManager;

struct UnusedBackend {}

#[async_trait]
impl Backend for UnusedBackend {
    #[allow(clippy::implicit_return)]
    async fn post_action(
        &self,
        _problem_id: &str,
        _request: &ActionRequest,
    ) -> Result<ActionResponse> {
        bail!("not reachable from app state");
    }

    #[allow(clippy::implicit_return)]
    async fn create_chatspace(&self) -> Result<String> {
        bail!("not reachable from app state");
    }
}

#[derive(Clone, Default)]
struct OpenChannel {
    sent: Arc<Mutex<Vec<String>>>,
    connected: Arc<Mutex<bool>>,
}

impl ChatChannel for OpenChannel {
    fn connect(&mut self, _session_id: &str, _problem_id: &str) -> Result<()> {
        *self.connected.lock().unwrap() = true;
        return Ok(());
    }

    fn send(&self, message: &str) -> bool {
        if !*self.connected.lock().unwrap() {
            return false;
        }
        self.sent.lock().unwrap().push(message.to_string());
        return true;
    }

    fn close(&mut self) {
        *self.connected.lock().unwrap() = false;
    }

    fn state(&self) -> ChannelState {
        if *self.connected.lock().unwrap() {
            return ChannelState::Open;
        }
        return ChannelState::Closed;
    }

    fn accept(&mut self, _event: &ChannelEvent) -> bool {
        return true;
    }
}

struct Harness<'a> {
    app_state: AppState<'a>,
    channel: OpenChannel,
    rx: mpsc::UnboundedReceiver<Action>,
}

fn harness(page_url: &str, language: &str) -> Result<Harness<'static>> {
    let (tx, rx) = mpsc::unbounded_channel::<Action>();
    let channel = OpenChannel::default();
    let chat = ChatSessionManager::new(
        PageLocation::parse(page_url)?,
        "12",
        Box::new(channel.clone()),
    );
    let dispatcher = ActionDispatcher::new(Arc::new(UnusedBackend {}), "12");
    let languages = vec!["py".to_string(), "cpp".to_string(), "c".to_string()];

    return Ok(Harness {
        app_state: AppState::new(dispatcher, chat, languages, language, tx),
        channel,
        rx,
    });
}

fn typed(c: char) -> Event {
    return Event::KeyboardCharInput(Input {
        key: Key::Char(c),
        ctrl: false,
        alt: false,
    });
}

fn expect_dispatch(rx: &mut mpsc::UnboundedReceiver<Action>) -> (u64, ActionRequest) {
    match rx.try_recv() {
        Ok(Action::Dispatch(prepared)) => return (prepared.seq, prepared.request),
        _ => panic!("expected a dispatch"),
    }
}

#[test]
fn it_starts_on_the_problem_tab() -> Result<()> {
    let h = harness("https://judge.example/problem/12/", "py")?;

    assert!(h.app_state.main_tabs.is_active(PROBLEM_TAB));
    assert!(!h.app_state.is_chat_shown());
    assert!(!h.app_state.output.is_visible());

    return Ok(());
}

#[test]
fn it_resumes_chat_from_the_page_url() -> Result<()> {
    let h = harness("https://judge.example/problem/12/?cs=abc123", "py")?;

    assert!(h.app_state.main_tabs.is_active(CHAT_TAB));
    assert!(h.app_state.is_chat_shown());
    assert_eq!(h.app_state.chat.state().session_id(), Some("abc123"));
    assert_eq!(h.channel.state(), ChannelState::Open);

    return Ok(());
}

#[test]
fn it_indents_the_editor_with_four_spaces() -> Result<()> {
    let mut h = harness("https://judge.example/problem/12/", "py")?;

    h.app_state.handle_event(Event::KeyboardTab())?;
    h.app_state.handle_event(typed('x'))?;
    assert_eq!(h.app_state.editor.lines(), ["    x"]);

    h.app_state.handle_event(Event::KeyboardCycleFocus())?;
    assert_eq!(h.app_state.focus, Focus::Stdin);
    h.app_state.handle_event(Event::KeyboardTab())?;
    assert_eq!(h.app_state.stdin.lines(), [""]);

    return Ok(());
}

#[test]
fn it_dispatches_the_current_editor_state() -> Result<()> {
    let mut h = harness("https://judge.example/problem/12/", "py")?;
    h.app_state.set_code("print(input())");
    h.app_state.handle_event(Event::KeyboardCycleFocus())?;
    h.app_state.handle_event(Event::KeyboardPaste("5\n6".to_string()))?;

    h.app_state.handle_event(Event::KeyboardAltEnter())?;
    let (seq, request) = expect_dispatch(&mut h.rx);

    assert_eq!(request.action, ActionKind::Run);
    assert_eq!(request.code, "print(input())");
    assert_eq!(request.language, "py");
    assert_eq!(request.cinput, "5\n6");
    assert_eq!(h.app_state.pending, Some((seq, ActionKind::Run)));

    h.app_state.handle_event(Event::KeyboardCTRLEnter())?;
    assert_eq!(expect_dispatch(&mut h.rx).1.action, ActionKind::Submit);
    h.app_state.handle_event(Event::KeyboardTestcase())?;
    assert_eq!(expect_dispatch(&mut h.rx).1.action, ActionKind::Testcase);

    return Ok(());
}

#[test]
fn it_discards_stale_responses() -> Result<()> {
    let mut h = harness("https://judge.example/problem/12/", "py")?;

    h.app_state.handle_event(Event::KeyboardAltEnter())?;
    let (first, _) = expect_dispatch(&mut h.rx);
    h.app_state.handle_event(Event::KeyboardAltEnter())?;
    let (second, _) = expect_dispatch(&mut h.rx);

    h.app_state
        .handle_event(Event::ActionResolved(DispatchOutcome {
            seq: second,
            action: ActionKind::Run,
            result: ActionResult {
                stdout: Some("2\n".to_string()),
                ..ActionResult::default()
            },
        }))?;
    h.app_state
        .handle_event(Event::ActionResolved(DispatchOutcome {
            seq: first,
            action: ActionKind::Run,
            result: ActionResult {
                stdout: Some("1\n".to_string()),
                ..ActionResult::default()
            },
        }))?;

    assert_eq!(h.app_state.output.text(OutputField::Stdout), "2\n");
    assert_eq!(h.app_state.output.active_field(), Some(OutputField::Stdout));
    assert_eq!(h.app_state.pending, None);

    return Ok(());
}

#[test]
fn it_cycles_languages() -> Result<()> {
    let mut h = harness("https://judge.example/problem/12/", "c")?;
    assert_eq!(h.app_state.language(), "c");

    h.app_state.handle_event(Event::KeyboardCycleLanguage())?;
    assert_eq!(h.app_state.language(), "py");

    let h = harness("https://judge.example/problem/12/", "java")?;
    assert_eq!(h.app_state.language(), "java");
    assert_eq!(h.app_state.languages.len(), 4);

    return Ok(());
}

#[test]
fn it_requests_one_chat_session_and_shares_it() -> Result<()> {
    let mut h = harness("https://judge.example/problem/12/", "py")?;

    h.app_state.handle_event(Event::KeyboardNewChatspace())?;
    h.app_state.handle_event(Event::KeyboardNewChatspace())?;
    assert!(matches!(h.rx.try_recv(), Ok(Action::CreateChatspace())));
    assert!(h.rx.try_recv().is_err());

    h.app_state
        .handle_event(Event::ChatspaceCreated(Ok("uuid-9".to_string())))?;
    h.app_state.handle_event(Event::KeyboardCopyShareURL())?;
    match h.rx.try_recv() {
        Ok(Action::CopyToClipboard(url)) => {
            assert_eq!(url, "https://judge.example/problem/12/?cs=uuid-9");
        }
        _ => panic!("expected a clipboard copy"),
    }

    h.app_state.handle_event(Event::ShareURLCopied(Ok(())))?;
    assert_eq!(h.channel.state(), ChannelState::Open);

    return Ok(());
}

#[test]
fn it_sends_chat_messages_and_clears_the_input() -> Result<()> {
    let mut h = harness("https://judge.example/problem/12/?cs=abc123", "py")?;

    for c in "hi there".chars() {
        h.app_state.handle_event(typed(c))?;
    }
    h.app_state.handle_event(Event::KeyboardEnter())?;

    assert_eq!(*h.channel.sent.lock().unwrap(), vec!["hi there".to_string()]);
    assert_eq!(h.app_state.chat_input.lines(), [""]);

    return Ok(());
}

#[test]
fn it_keeps_the_input_when_the_channel_is_closed() -> Result<()> {
    let mut h = harness("https://judge.example/problem/12/?cs=abc123", "py")?;
    h.app_state
        .handle_event(Event::Channel(ChannelEvent::Closed(1)))?;
    *h.channel.connected.lock().unwrap() = false;

    h.app_state.handle_event(typed('x'))?;
    h.app_state.handle_event(Event::KeyboardEnter())?;

    assert!(h.channel.sent.lock().unwrap().is_empty());
    assert_eq!(h.app_state.chat_input.lines(), ["x"]);

    return Ok(());
}

#[test]
fn it_appends_chat_messages_in_arrival_order() -> Result<()> {
    let mut h = harness("https://judge.example/problem/12/?cs=abc123", "py")?;

    h.app_state.handle_event(Event::Channel(ChannelEvent::Message(
        1,
        ChatMessage::chat("first", None),
    )))?;
    h.app_state.handle_event(Event::Channel(ChannelEvent::Message(
        1,
        ChatMessage::system("second"),
    )))?;

    assert_eq!(
        h.app_state.chat_log,
        vec![ChatMessage::chat("first", None), ChatMessage::system("second")]
    );

    return Ok(());
}

#[test]
fn it_follows_the_tail_of_multiline_messages() -> Result<()> {
    let mut h = harness("https://judge.example/problem/12/?cs=abc123", "py")?;
    // Five rows leave three for the log inside its borders.
    h.app_state.set_rect(Rect::new(0, 0, 40, 5));

    h.app_state.handle_event(Event::Channel(ChannelEvent::Message(
        1,
        ChatMessage::chat("a\nb\nc\nd\ne", None),
    )))?;
    h.app_state.handle_event(Event::Channel(ChannelEvent::Message(
        1,
        ChatMessage::system("f"),
    )))?;

    assert!(h.app_state.scroll.is_following());
    assert_eq!(h.app_state.scroll.position, 3);

    return Ok(());
}

#[test]
fn it_quits_on_ctrl_c() -> Result<()> {
    let mut h = harness("https://judge.example/problem/12/", "py")?;

    assert!(!h.app_state.handle_event(Event::UITick())?);
    assert!(h.app_state.handle_event(Event::KeyboardCTRLC())?);

    return Ok(());
}

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use super::ActionDispatcher;
use super::ChatSessionManager;
use super::OutputReconciler;
use super::Scroll;
use super::TabController;
use crate::domain::models::Action;
use crate::domain::models::ActionKind;
use crate::domain::models::ChatMessage;
use crate::domain::models::DispatchOutcome;
use crate::domain::models::Event;
use crate::domain::models::TabButton;
use crate::domain::models::TabContent;
use crate::domain::models::TabGroup;
use crate::domain::models::TextArea;

pub const PROBLEM_TAB: &str = "problem-tab";
pub const CHAT_TAB: &str = "chatspace-tab";
pub const PROBLEM_PANE: &str = "problem-pane";
pub const CHAT_PANE: &str = "chatspace-pane";

const INDENT: &str = "    ";

fn main_tab_group() -> TabGroup {
    return TabGroup::new("main-tab-selector")
        .button(TabButton::new(PROBLEM_TAB, "Problem", PROBLEM_PANE).preselected())
        .button(TabButton::new(CHAT_TAB, "Chat", CHAT_PANE))
        .content(TabContent::new("main-content", &[PROBLEM_PANE, CHAT_PANE]));
}

/// Feeds text into a text area key by key, the same path typing takes.
fn type_text(textarea: &mut tui_textarea::TextArea<'_>, text: &str) {
    for c in text.chars() {
        let key = match c {
            '\n' => Key::Enter,
            '\r' => continue,
            c => Key::Char(c),
        };
        textarea.input(Input {
            key,
            ctrl: false,
            alt: false,
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Stdin,
}

pub struct AppState<'a> {
    pub chat: ChatSessionManager,
    pub chat_input: tui_textarea::TextArea<'a>,
    pub chat_log: Vec<ChatMessage>,
    pub dispatcher: ActionDispatcher,
    pub editor: tui_textarea::TextArea<'a>,
    pub focus: Focus,
    pub language_idx: usize,
    pub languages: Vec<String>,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub main_tabs: TabController,
    pub output: OutputReconciler,
    pub pending: Option<(u64, ActionKind)>,
    pub scroll: Scroll,
    pub stdin: tui_textarea::TextArea<'a>,
    tx: mpsc::UnboundedSender<Action>,
}

impl<'a> AppState<'a> {
    pub fn new(
        dispatcher: ActionDispatcher,
        chat: ChatSessionManager,
        languages: Vec<String>,
        language: &str,
        tx: mpsc::UnboundedSender<Action>,
    ) -> AppState<'a> {
        let mut languages = languages;
        let language_idx = match languages.iter().position(|lang| return lang == language) {
            Some(idx) => idx,
            None => {
                languages.insert(0, language.to_string());
                0
            }
        };

        let mut app_state = AppState {
            chat,
            chat_input: TextArea::new("Message", ""),
            chat_log: vec![],
            dispatcher,
            editor: TextArea::new("", ""),
            focus: Focus::Editor,
            language_idx,
            languages,
            last_known_height: 0,
            last_known_width: 0,
            main_tabs: TabController::init(Some(main_tab_group())),
            output: OutputReconciler::default(),
            pending: None,
            scroll: Scroll::default(),
            stdin: TextArea::new("Custom input", ""),
            tx,
        };

        if app_state.chat.resume() {
            app_state.main_tabs.activate(CHAT_TAB);
        }
        app_state.sync_blocks();

        return app_state;
    }

    pub fn language(&self) -> &str {
        return self
            .languages
            .get(self.language_idx)
            .map(|lang| return lang.as_str())
            .unwrap_or("");
    }

    pub fn is_chat_shown(&self) -> bool {
        return self.main_tabs.is_pane_shown(CHAT_PANE);
    }

    pub fn set_code(&mut self, code: &str) {
        self.editor = TextArea::new("", code);
        self.sync_blocks();
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_scroll();
    }

    /// Applies one event to the state. Returns `true` once the app should
    /// quit.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::ActionResolved(outcome) => self.handle_outcome(outcome),
            Event::Channel(channel_event) => {
                if let Some(message) = self.chat.handle_channel_event(channel_event) {
                    self.add_chat_message(message);
                }
            }
            Event::ChatspaceCreated(res) => self.chat.handle_created(res),
            Event::ShareURLCopied(res) => self.chat.handle_copied(res),
            Event::KeyboardAltEnter() => self.dispatch(ActionKind::Run)?,
            Event::KeyboardCTRLEnter() => self.dispatch(ActionKind::Submit)?,
            Event::KeyboardTestcase() => self.dispatch(ActionKind::Testcase)?,
            Event::KeyboardCharInput(input) => self.handle_input(input),
            Event::KeyboardEnter() => {
                if self.is_chat_shown() {
                    self.send_chat_message();
                } else {
                    type_text(self.focused_textarea(), "\n");
                }
            }
            Event::KeyboardTab() => {
                if !self.is_chat_shown() && self.focus == Focus::Editor {
                    type_text(&mut self.editor, INDENT);
                }
            }
            Event::KeyboardPaste(text) => {
                if self.is_chat_shown() {
                    type_text(&mut self.chat_input, &text.replace('\n', " "));
                } else {
                    type_text(self.focused_textarea(), &text);
                }
            }
            Event::KeyboardCycleFocus() => {
                self.focus = match self.focus {
                    Focus::Editor => Focus::Stdin,
                    Focus::Stdin => Focus::Editor,
                };
                self.sync_blocks();
            }
            Event::KeyboardCycleLanguage() => {
                if !self.languages.is_empty() {
                    self.language_idx = (self.language_idx + 1) % self.languages.len();
                    self.sync_blocks();
                }
            }
            Event::KeyboardNewChatspace() => {
                if self.chat.begin_create() {
                    self.tx.send(Action::CreateChatspace())?;
                }
            }
            Event::KeyboardCopyShareURL() => {
                if let Some(url) = self.chat.begin_copy() {
                    self.tx.send(Action::CopyToClipboard(url))?;
                }
            }
            Event::KeyboardReconnect() => {
                self.chat.reconnect();
            }
            Event::KeyboardCTRLC() => return Ok(true),
            Event::UINextOutputTab() => {
                self.output.cycle(true);
            }
            Event::UIPrevOutputTab() => {
                self.output.cycle(false);
            }
            Event::UIScrollDown() => self.scroll.down(),
            Event::UIScrollUp() => self.scroll.up(),
            Event::UIScrollPageDown() => self.scroll.down_page(),
            Event::UIScrollPageUp() => self.scroll.up_page(),
            Event::UIShowChat() => {
                self.main_tabs.activate(CHAT_TAB);
            }
            Event::UIShowProblem() => {
                self.main_tabs.activate(PROBLEM_TAB);
            }
            Event::UIResize() | Event::UITick() => {}
        }

        return Ok(false);
    }

    fn dispatch(&mut self, action: ActionKind) -> Result<()> {
        let language = self.language().to_string();
        let prepared = self
            .dispatcher
            .prepare(action, &self.editor, &language, &self.stdin);

        tracing::debug!(seq = prepared.seq, action = %action, "Dispatching action");
        self.pending = Some((prepared.seq, action));
        self.tx.send(Action::Dispatch(prepared))?;

        return Ok(());
    }

    fn handle_outcome(&mut self, outcome: DispatchOutcome) {
        if !self.dispatcher.is_latest(outcome.seq) {
            tracing::debug!(
                seq = outcome.seq,
                action = %outcome.action,
                "Discarding stale action response"
            );
            return;
        }

        self.pending = None;
        self.output.reconcile(&outcome.result);
    }

    fn handle_input(&mut self, input: Input) {
        if self.is_chat_shown() {
            match input.key {
                Key::Up => self.scroll.up(),
                Key::Down => self.scroll.down(),
                _ => {
                    self.chat_input.input(input);
                }
            }
            return;
        }

        self.focused_textarea().input(input);
    }

    fn send_chat_message(&mut self) {
        let text = self.chat_input.lines().join(" ");
        if self.chat.send_message(&text) {
            self.chat_input = TextArea::new("Message", "");
        }
    }

    fn add_chat_message(&mut self, message: ChatMessage) {
        self.chat_log.push(message);
        self.sync_scroll();
    }

    fn focused_textarea(&mut self) -> &mut tui_textarea::TextArea<'a> {
        match self.focus {
            Focus::Editor => return &mut self.editor,
            Focus::Stdin => return &mut self.stdin,
        }
    }

    fn sync_scroll(&mut self) {
        let lines = self
            .chat_log
            .iter()
            .map(|message| return message.display_lines().len())
            .sum::<usize>()
            .min(u16::MAX as usize) as u16;
        self.scroll
            .set_state(lines, self.last_known_height.saturating_sub(2));
    }

    fn sync_blocks(&mut self) {
        let editor_title = format!("Code ({})", self.language());
        self.editor
            .set_block(TextArea::block(&editor_title, self.focus == Focus::Editor));
        self.stdin
            .set_block(TextArea::block("Custom input", self.focus == Focus::Stdin));
    }
}

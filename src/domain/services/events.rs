#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;

use crate::domain::models::Event;

fn map_key(keyevent: KeyEvent) -> Option<Event> {
    if keyevent.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = keyevent.modifiers.contains(KeyModifiers::CONTROL);
    let alt = keyevent.modifiers.contains(KeyModifiers::ALT);
    let cmd = keyevent.modifiers.contains(KeyModifiers::SUPER);

    match keyevent.code {
        KeyCode::Enter if ctrl || cmd => return Some(Event::KeyboardCTRLEnter()),
        // Terminals without keyboard enhancements report Ctrl+Enter as Ctrl+J.
        KeyCode::Char('j') if ctrl => return Some(Event::KeyboardCTRLEnter()),
        KeyCode::Enter if alt => return Some(Event::KeyboardAltEnter()),
        KeyCode::Enter => return Some(Event::KeyboardEnter()),
        KeyCode::Tab if keyevent.modifiers.is_empty() => return Some(Event::KeyboardTab()),
        KeyCode::F(1) => return Some(Event::UIShowProblem()),
        KeyCode::F(2) => return Some(Event::UIShowChat()),
        KeyCode::Left if alt => return Some(Event::UIPrevOutputTab()),
        KeyCode::Right if alt => return Some(Event::UINextOutputTab()),
        KeyCode::PageUp => return Some(Event::UIScrollPageUp()),
        KeyCode::PageDown => return Some(Event::UIScrollPageDown()),
        KeyCode::Char(c) if ctrl => match c {
            'c' | 'q' => return Some(Event::KeyboardCTRLC()),
            'o' => return Some(Event::KeyboardCycleFocus()),
            'l' => return Some(Event::KeyboardCycleLanguage()),
            't' => return Some(Event::KeyboardTestcase()),
            'n' => return Some(Event::KeyboardNewChatspace()),
            'y' => return Some(Event::KeyboardCopyShareURL()),
            'r' => return Some(Event::KeyboardReconnect()),
            _ => return Some(Event::KeyboardCharInput(Input::from(keyevent))),
        },
        _ => return Some(Event::KeyboardCharInput(Input::from(keyevent))),
    }
}

/// Translates a terminal event into an app event. Keys without a binding are
/// handed through as text input.
pub fn map_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Paste(text) => return Some(Event::KeyboardPaste(text)),
        CrosstermEvent::Resize(_, _) => return Some(Event::UIResize()),
        CrosstermEvent::Mouse(mouseevent) => match mouseevent.kind {
            MouseEventKind::ScrollUp => return Some(Event::UIScrollUp()),
            MouseEventKind::ScrollDown => return Some(Event::UIScrollDown()),
            _ => return None,
        },
        CrosstermEvent::Key(keyevent) => return map_key(keyevent),
        _ => return None,
    }
}

pub struct EventsService {
    crossterm_events: EventStream,
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            crossterm_events: EventStream::new(),
            events,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => event,
                event = self.crossterm_events.next() => match event {
                    Some(Ok(input)) => map_crossterm(input),
                    Some(Err(err)) => {
                        tracing::warn!(error = ?err, "Failed to read terminal event");
                        None
                    }
                    None => None
                },
                _ = time::sleep(time::Duration::from_millis(500)) => Some(Event::UITick())
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}

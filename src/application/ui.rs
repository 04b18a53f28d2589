use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::event::KeyboardEnhancementFlags;
use crossterm::event::PopKeyboardEnhancementFlags;
use crossterm::event::PushKeyboardEnhancementFlags;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::supports_keyboard_enhancement;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Margin;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Tabs;
use ratatui::widgets::Wrap;
use ratatui::Frame;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::domain::models::ChannelState;
use crate::domain::models::ChatKind;
use crate::domain::models::ChatMessage;
use crate::domain::models::ChatSession;
use crate::domain::models::ChatUi;
use crate::domain::models::Event;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::OutputReconciler;
use crate::domain::services::CHAT_TAB;

const HELP: &str = "Alt+Enter run | Ctrl+Enter submit | Ctrl+T testcase | Ctrl+L language | Ctrl+O focus | F1/F2 tabs | Ctrl+Q quit";
const CHAT_HELP: &str =
    "Enter send | Ctrl+N new chat | Ctrl+Y copy link | Ctrl+R reconnect | F1/F2 tabs | Ctrl+Q quit";

fn chat_lines(message: &ChatMessage) -> Vec<Line<'static>> {
    let mut style = Style::default();
    if message.kind == ChatKind::System {
        style = style.fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
    }

    return message
        .display_lines()
        .into_iter()
        .map(|line| return Line::from(Span::styled(line, style)))
        .collect();
}

fn render_main_tabs<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let titles = app_state
        .main_tabs
        .visible_buttons()
        .iter()
        .enumerate()
        .map(|(idx, button)| return Line::from(format!("F{} {}", idx + 1, button.title)))
        .collect::<Vec<Line>>();

    let selected = usize::from(app_state.main_tabs.is_active(CHAT_TAB));
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, rect);
}

fn render_output<B: Backend>(
    frame: &mut Frame<B>,
    rect: Rect,
    output: &OutputReconciler,
    pending: bool,
) {
    let mut title = "Output".to_string();
    if pending {
        title = format!("{title} (waiting for judge...)");
    }
    let block = Block::default().borders(Borders::ALL).title(title);

    if !output.is_visible() {
        frame.render_widget(
            Paragraph::new("Alt+Enter to run, Ctrl+Enter to submit, Ctrl+T to test with custom input.")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: false })
                .block(block),
            rect,
        );
        return;
    }

    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let fields = output.visible_fields();
    let active = output.active_field();
    let titles = fields
        .iter()
        .map(|field| return Line::from(field.title()))
        .collect::<Vec<Line>>();
    let selected = fields
        .iter()
        .position(|field| return Some(*field) == active)
        .unwrap_or(0);

    frame.render_widget(
        Tabs::new(titles).select(selected).highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        layout[0],
    );

    if let Some(field) = active {
        frame.render_widget(
            Paragraph::new(output.text(field).to_string()).wrap(Wrap { trim: false }),
            layout[1],
        );
    }
}

fn render_problem<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rect);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(8), Constraint::Min(3)])
        .split(columns[1]);

    frame.render_widget(app_state.editor.widget(), columns[0]);
    frame.render_widget(app_state.stdin.widget(), side[0]);
    render_output(
        frame,
        side[1],
        &app_state.output,
        app_state.pending.is_some(),
    );
}

fn render_chat<B: Backend>(frame: &mut Frame<B>, rect: Rect, app_state: &mut AppState) {
    let ui = match app_state.chat.state() {
        ChatSession::NoSession => {
            frame.render_widget(
                Paragraph::new("No chat session yet. Press Ctrl+N to create one for this problem.")
                    .wrap(Wrap { trim: false })
                    .block(Block::default().borders(Borders::ALL).title("Chat")),
                rect,
            );
            return;
        }
        ChatSession::SessionKnown { ui, .. } => *ui,
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(rect);

    frame.render_widget(
        Paragraph::new(app_state.chat.share_url().to_string())
            .block(Block::default().borders(Borders::ALL).title("Share link")),
        layout[0],
    );

    if ui == ChatUi::UrlOnly {
        frame.render_widget(
            Paragraph::new("Press Ctrl+Y to copy the link and join the chat.")
                .style(Style::default().fg(Color::DarkGray)),
            layout[1].inner(&Margin {
                vertical: 1,
                horizontal: 1,
            }),
        );
        return;
    }

    let mut log_title = match app_state.chat.channel_state() {
        ChannelState::Connecting => "Chat (connecting...)",
        ChannelState::Open => "Chat",
        ChannelState::Closed => "Chat (disconnected, Ctrl+R to reconnect)",
    }
    .to_string();
    if !app_state.scroll.is_following() {
        log_title = format!("{log_title} [scrolled]");
    }

    if layout[1].width != app_state.last_known_width
        || layout[1].height != app_state.last_known_height
    {
        app_state.set_rect(layout[1]);
    }

    let lines = app_state
        .chat_log
        .iter()
        .flat_map(chat_lines)
        .collect::<Vec<Line>>();

    frame.render_widget(
        Paragraph::new(lines)
            .scroll((app_state.scroll.position, 0))
            .block(Block::default().borders(Borders::ALL).title(log_title)),
        layout[1],
    );
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        layout[1].inner(&Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut app_state.scroll.scrollbar_state,
    );

    frame.render_widget(app_state.chat_input.widget(), layout[2]);
}

fn render<B: Backend>(frame: &mut Frame<B>, app_state: &mut AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_main_tabs(frame, layout[0], app_state);

    let mut help = HELP;
    if app_state.is_chat_shown() {
        render_chat(frame, layout[1], app_state);
        help = CHAT_HELP;
    } else {
        render_problem(frame, layout[1], app_state);
    }

    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        layout[2],
    );
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<'_>,
    events: &mut EventsService,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            render(frame, app_state);
        })?;

        let event = events.next().await?;
        if app_state.handle_event(event)? {
            break;
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        PopKeyboardEnhancementFlags,
        DisableBracketedPaste,
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    mut app_state: AppState<'_>,
    event_rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    // Needed to tell Ctrl+Enter apart from Enter.
    let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keys {
        crossterm::execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }

    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;
    let mut events = EventsService::new(event_rx);

    start_loop(&mut terminal, &mut app_state, &mut events).await?;

    if enhanced_keys {
        crossterm::execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return Ok(());
}

use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

pub struct TextArea {}

impl<'a> TextArea {
    pub fn new(title: &str, text: &str) -> tui_textarea::TextArea<'a> {
        let lines = text
            .split('\n')
            .map(|line| return line.to_string())
            .collect::<Vec<String>>();

        let mut textarea = tui_textarea::TextArea::new(lines);
        textarea.set_cursor_line_style(Style::default());
        textarea.set_block(TextArea::block(title, false));

        return textarea;
    }

    pub fn block(title: &str, focused: bool) -> Block<'a> {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .padding(Padding::new(1, 1, 0, 0));

        if focused {
            block = block
                .border_type(BorderType::Double)
                .title_style(Style::default().add_modifier(Modifier::BOLD));
        }

        return block;
    }
}

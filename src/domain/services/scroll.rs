#[cfg(test)]
#[path = "scroll_test.rs"]
mod tests;

use ratatui::widgets::ScrollbarState;

/// Scroll position of the chat log. Sticks to the newest line until the
/// user scrolls up, and picks it up again once they scroll back down.
pub struct Scroll {
    list_length: u16,
    viewport_length: u16,
    following: bool,
    pub position: u16,
    pub scrollbar_state: ScrollbarState,
}

impl Default for Scroll {
    fn default() -> Scroll {
        return Scroll {
            list_length: 0,
            viewport_length: 0,
            following: true,
            position: 0,
            scrollbar_state: ScrollbarState::default(),
        };
    }
}

impl Scroll {
    fn max_position(&self) -> u16 {
        return self.list_length.saturating_sub(self.viewport_length);
    }

    fn sync_scrollbar(&mut self) {
        self.scrollbar_state = self.scrollbar_state.position(self.position);
    }

    pub fn up(&mut self) {
        self.scroll_up_by(1);
    }

    pub fn up_page(&mut self) {
        self.scroll_up_by(self.viewport_length.max(1));
    }

    pub fn down(&mut self) {
        self.scroll_down_by(1);
    }

    pub fn down_page(&mut self) {
        self.scroll_down_by(self.viewport_length.max(1));
    }

    fn scroll_up_by(&mut self, lines: u16) {
        self.position = self.position.saturating_sub(lines);
        self.following = self.position >= self.max_position();
        self.sync_scrollbar();
    }

    fn scroll_down_by(&mut self, lines: u16) {
        self.position = self
            .position
            .saturating_add(lines)
            .min(self.max_position());
        self.following = self.position >= self.max_position();
        self.sync_scrollbar();
    }

    pub fn last(&mut self) {
        self.position = self.max_position();
        self.following = true;
        self.sync_scrollbar();
    }

    pub fn is_following(&self) -> bool {
        return self.following;
    }

    pub fn set_state(&mut self, list_length: u16, viewport_length: u16) {
        self.list_length = list_length;
        self.viewport_length = viewport_length;
        self.scrollbar_state = self
            .scrollbar_state
            .content_length(list_length)
            .viewport_content_length(viewport_length);

        if self.following {
            self.last();
        } else {
            self.position = self.position.min(self.max_position());
            self.sync_scrollbar();
        }
    }
}

#[cfg(test)]
#[path = "tabs_test.rs"]
mod tests;

use crate::domain::models::TabButton;
use crate::domain::models::TabContent;
use crate::domain::models::TabGroup;

struct ActiveGroup {
    buttons: Vec<TabButton>,
    content: TabContent,
    active: Option<usize>,
}

/// Keeps exactly one button and its pane active within a tab group. The
/// active pair lives in a single slot, so switching is atomic.
///
/// A controller built without a group or without a content container does
/// nothing: `activate` returns `false` and every query reports no state.
#[derive(Default)]
pub struct TabController {
    group: Option<ActiveGroup>,
}

impl TabController {
    pub fn init(group: Option<TabGroup>) -> TabController {
        let Some(group) = group else {
            return TabController::default();
        };
        let Some(content) = group.content else {
            tracing::debug!(group = group.id.as_str(), "Tab group has no content container");
            return TabController::default();
        };

        let mut controller = TabController {
            group: Some(ActiveGroup {
                buttons: group.buttons,
                content,
                active: None,
            }),
        };

        let initial = controller.group.as_ref().and_then(|g| {
            return g
                .buttons
                .iter()
                .find(|b| return b.preselected)
                .or_else(|| return g.buttons.iter().find(|b| return b.visible))
                .map(|b| return b.id.to_string());
        });
        if let Some(button_id) = initial {
            controller.activate(&button_id);
        }

        return controller;
    }

    pub fn is_noop(&self) -> bool {
        return self.group.is_none();
    }

    /// Deactivates every button and pane of the group, then activates the
    /// given button and the pane it targets.
    pub fn activate(&mut self, button_id: &str) -> bool {
        let Some(group) = self.group.as_mut() else {
            return false;
        };
        let Some(idx) = group.buttons.iter().position(|b| return b.id == button_id) else {
            tracing::debug!(button = button_id, "Unknown tab button");
            return false;
        };

        group.active = Some(idx);
        return true;
    }

    /// Hides and deactivates every button in the group.
    pub fn reset(&mut self) {
        if let Some(group) = self.group.as_mut() {
            group.active = None;
            for button in group.buttons.iter_mut() {
                button.visible = false;
            }
        }
    }

    pub fn set_visible(&mut self, button_id: &str, visible: bool) {
        if let Some(group) = self.group.as_mut() {
            if let Some(button) = group.buttons.iter_mut().find(|b| return b.id == button_id) {
                button.visible = visible;
            }
        }
    }

    pub fn buttons(&self) -> &[TabButton] {
        match &self.group {
            Some(group) => return &group.buttons,
            None => return &[],
        }
    }

    pub fn visible_buttons(&self) -> Vec<&TabButton> {
        return self
            .buttons()
            .iter()
            .filter(|b| return b.visible)
            .collect();
    }

    pub fn active_button(&self) -> Option<&TabButton> {
        let group = self.group.as_ref()?;
        return group.active.map(|idx| return &group.buttons[idx]);
    }

    pub fn is_active(&self, button_id: &str) -> bool {
        return self
            .active_button()
            .map(|b| return b.id == button_id)
            .unwrap_or(false);
    }

    /// The pane currently shown, if the active button targets a pane that
    /// exists in the content container.
    pub fn active_pane(&self) -> Option<&str> {
        let group = self.group.as_ref()?;
        let target = &self.active_button()?.target;

        return group
            .content
            .panes
            .iter()
            .find(|pane| return *pane == target)
            .map(|pane| return pane.as_str());
    }

    pub fn is_pane_shown(&self, pane_id: &str) -> bool {
        return self.active_pane() == Some(pane_id);
    }

    /// Activates the next (or previous) visible button, wrapping around.
    pub fn cycle(&mut self, forward: bool) -> bool {
        let visible = self
            .visible_buttons()
            .iter()
            .map(|b| return b.id.to_string())
            .collect::<Vec<String>>();
        if visible.is_empty() {
            return false;
        }

        let current = self
            .active_button()
            .and_then(|active| return visible.iter().position(|id| return *id == active.id));

        let next = match current {
            None => 0,
            Some(idx) if forward => (idx + 1) % visible.len(),
            Some(idx) => (idx + visible.len() - 1) % visible.len(),
        };

        return self.activate(&visible[next]);
    }
}

#[cfg(test)]
#[path = "output_test.rs"]
mod tests;

use std::collections::HashMap;

use strum::IntoEnumIterator;

use super::TabController;
use crate::domain::models::ActionResult;
use crate::domain::models::OutputField;
use crate::domain::models::TabButton;
use crate::domain::models::TabContent;
use crate::domain::models::TabGroup;

fn output_tab_group() -> TabGroup {
    let panes = OutputField::iter()
        .map(|field| return field.pane_id())
        .collect::<Vec<String>>();

    let mut group = TabGroup::new("output-tab-selector").content(TabContent::new(
        "output-content",
        &panes.iter().map(|p| return p.as_str()).collect::<Vec<&str>>(),
    ));

    for field in OutputField::iter() {
        group = group.button(
            TabButton::new(&field.button_id(), field.title(), &field.pane_id()).hidden(),
        );
    }

    return group;
}

/// View state of the results panel: which result tabs are visible, which one
/// is active, the text in each pane and whether the panel is shown at all.
pub struct OutputReconciler {
    tabs: TabController,
    slots: HashMap<OutputField, String>,
    visible: bool,
}

impl Default for OutputReconciler {
    fn default() -> OutputReconciler {
        return OutputReconciler {
            tabs: TabController::init(Some(output_tab_group())),
            slots: HashMap::new(),
            visible: false,
        };
    }
}

impl OutputReconciler {
    /// Replaces the whole panel state with what `result` carries. Returns the
    /// field whose tab ended up active.
    pub fn reconcile(&mut self, result: &ActionResult) -> Option<OutputField> {
        self.tabs.reset();
        self.slots.clear();

        let mut first: Option<OutputField> = None;
        for field in OutputField::iter() {
            if let Some(text) = result.field(field) {
                self.slots.insert(field, text.to_string());
                self.tabs.set_visible(&field.button_id(), true);
                if first.is_none() {
                    first = Some(field);
                }
            }
        }

        match first {
            Some(field) => {
                self.tabs.activate(&field.button_id());
                self.visible = true;
            }
            None => {
                self.visible = false;
            }
        }

        return first;
    }

    pub fn is_visible(&self) -> bool {
        return self.visible;
    }

    pub fn text(&self, field: OutputField) -> &str {
        return self
            .slots
            .get(&field)
            .map(|text| return text.as_str())
            .unwrap_or("");
    }

    pub fn visible_fields(&self) -> Vec<OutputField> {
        return OutputField::iter()
            .filter(|field| {
                return self
                    .tabs
                    .visible_buttons()
                    .iter()
                    .any(|b| return b.id == field.button_id());
            })
            .collect();
    }

    pub fn active_field(&self) -> Option<OutputField> {
        let active = self.tabs.active_button()?;
        return OutputField::iter().find(|field| return field.button_id() == active.id);
    }

    pub fn cycle(&mut self, forward: bool) -> bool {
        if !self.visible {
            return false;
        }

        return self.tabs.cycle(forward);
    }
}

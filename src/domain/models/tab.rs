#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabButton {
    pub id: String,
    pub title: String,
    /// Id of the pane this button shows.
    pub target: String,
    pub visible: bool,
    /// Marked active in the declaration, before any activation.
    pub preselected: bool,
}

impl TabButton {
    pub fn new(id: &str, title: &str, target: &str) -> TabButton {
        return TabButton {
            id: id.to_string(),
            title: title.to_string(),
            target: target.to_string(),
            visible: true,
            preselected: false,
        };
    }

    pub fn hidden(mut self) -> TabButton {
        self.visible = false;
        return self;
    }

    pub fn preselected(mut self) -> TabButton {
        self.preselected = true;
        return self;
    }
}

/// Container holding the panes a tab group switches between.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabContent {
    pub id: String,
    pub panes: Vec<String>,
}

impl TabContent {
    pub fn new(id: &str, panes: &[&str]) -> TabContent {
        return TabContent {
            id: id.to_string(),
            panes: panes.iter().map(|pane| return pane.to_string()).collect(),
        };
    }
}

/// Declaration of a group of tab buttons and the content container it
/// controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabGroup {
    pub id: String,
    pub buttons: Vec<TabButton>,
    pub content: Option<TabContent>,
}

impl TabGroup {
    pub fn new(id: &str) -> TabGroup {
        return TabGroup {
            id: id.to_string(),
            buttons: vec![],
            content: None,
        };
    }

    pub fn button(mut self, button: TabButton) -> TabGroup {
        self.buttons.push(button);
        return self;
    }

    pub fn content(mut self, content: TabContent) -> TabGroup {
        self.content = Some(content);
        return self;
    }
}

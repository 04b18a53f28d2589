#[cfg(test)]
#[path = "action_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

use super::ActionResult;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumIter, EnumVariantNames, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActionKind {
    Run,
    Submit,
    Testcase,
}

impl ActionKind {
    pub fn parse(text: &str) -> Option<ActionKind> {
        return ActionKind::iter().find(|e| return e.to_string() == text);
    }
}

/// Body of a single run/submit/testcase request. Built once from the editor
/// state at trigger time and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: ActionKind,
    pub code: String,
    pub language: String,
    pub cinput: String,
}

/// An action request tagged with its dispatch sequence number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedAction {
    pub seq: u64,
    pub request: ActionRequest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub seq: u64,
    pub action: ActionKind,
    pub result: ActionResult,
}

/// Work the UI hands off to the background actions service.
pub enum Action {
    CopyToClipboard(String),
    CreateChatspace(),
    Dispatch(PreparedAction),
}

#[cfg(test)]
#[path = "action_result_test.rs"]
mod tests;

use serde::Deserializer;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Value;
use strum::EnumIter;

pub const GENERIC_FAILURE: &str = "An error occurred while processing your request.";

/// Result tabs in the order they are considered for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum OutputField {
    Status,
    Stdout,
    Stderr,
    AiFeedback,
}

impl OutputField {
    pub fn title(&self) -> &'static str {
        match self {
            OutputField::Status => return "Status",
            OutputField::Stdout => return "Output",
            OutputField::Stderr => return "Error",
            OutputField::AiFeedback => return "AI Feedback",
        }
    }

    pub fn button_id(&self) -> String {
        return format!("{self}-tab");
    }

    pub fn pane_id(&self) -> String {
        return format!("{self}-pane");
    }
}

/// Values the judge sends back are not always strings. Falsy values are
/// treated as absent, anything else that isn't a string is kept as JSON text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = serde::Deserialize::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return Ok(None),
        Some(Value::String(text)) => return Ok(Some(text)),
        Some(other) => return Ok(Some(other.to_string())),
    }
}

/// Raw payload of the action endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub coutput: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cerror: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ai_feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionResult {
    pub status: Option<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub ai_feedback: Option<String>,
}

impl ActionResult {
    pub fn error(text: &str) -> ActionResult {
        return ActionResult {
            stderr: Some(text.to_string()),
            ..ActionResult::default()
        };
    }

    pub fn failure() -> ActionResult {
        return ActionResult::error(GENERIC_FAILURE);
    }

    /// Returns the text for a field, only when present and non-empty.
    pub fn field(&self, field: OutputField) -> Option<&str> {
        let value = match field {
            OutputField::Status => &self.status,
            OutputField::Stdout => &self.stdout,
            OutputField::Stderr => &self.stderr,
            OutputField::AiFeedback => &self.ai_feedback,
        };

        return value.as_deref().filter(|text| return !text.is_empty());
    }
}

impl From<ActionResponse> for ActionResult {
    fn from(res: ActionResponse) -> ActionResult {
        if let Some(error) = res.error.filter(|e| return !e.is_empty()) {
            return ActionResult::error(&error);
        }

        return ActionResult {
            status: res.status,
            stdout: res.coutput,
            stderr: res.cerror,
            ai_feedback: res.ai_feedback,
        };
    }
}

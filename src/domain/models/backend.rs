use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::ActionRequest;
use super::ActionResponse;

#[async_trait]
pub trait Backend {
    /// Sends a run/submit/testcase request for a problem. Implementations
    /// fail on any non-success status, leaving the body unparsed.
    async fn post_action(&self, problem_id: &str, request: &ActionRequest)
        -> Result<ActionResponse>;

    /// Asks the judge for a new chat session and returns its id.
    async fn create_chatspace(&self) -> Result<String>;
}

pub type BackendRef = Arc<dyn Backend + Send + Sync>;

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::domain::models::ActionKind;
use crate::domain::models::ActionRequest;
use crate::domain::models::ActionResult;
use crate::domain::models::BackendRef;
use crate::domain::models::DispatchOutcome;
use crate::domain::models::PreparedAction;

/// Anything the dispatcher can read the current text from at trigger time.
pub trait TextSource {
    fn read_text(&self) -> String;
}

impl TextSource for str {
    fn read_text(&self) -> String {
        return self.to_string();
    }
}

impl TextSource for String {
    fn read_text(&self) -> String {
        return self.to_string();
    }
}

impl TextSource for tui_textarea::TextArea<'_> {
    fn read_text(&self) -> String {
        return self.lines().join("\n");
    }
}

#[derive(Clone)]
pub struct ActionDispatcher {
    backend: BackendRef,
    problem_id: String,
    sequence: Arc<AtomicU64>,
}

impl ActionDispatcher {
    pub fn new(backend: BackendRef, problem_id: &str) -> ActionDispatcher {
        return ActionDispatcher {
            backend,
            problem_id: problem_id.to_string(),
            sequence: Arc::new(AtomicU64::new(0)),
        };
    }

    pub fn problem_id(&self) -> &str {
        return &self.problem_id;
    }

    /// Reads code, language and stdin right now and tags the request with the
    /// next sequence number.
    pub fn prepare<C, L, S>(
        &self,
        action: ActionKind,
        code: &C,
        language: &L,
        stdin: &S,
    ) -> PreparedAction
    where
        C: TextSource + ?Sized,
        L: TextSource + ?Sized,
        S: TextSource + ?Sized,
    {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        return PreparedAction {
            seq,
            request: ActionRequest {
                action,
                code: code.read_text(),
                language: language.read_text(),
                cinput: stdin.read_text(),
            },
        };
    }

    /// Sends a prepared request. Never fails: transport errors, non-success
    /// statuses and unreadable bodies all become the generic failure result.
    pub async fn send(&self, prepared: PreparedAction) -> DispatchOutcome {
        let action = prepared.request.action;
        let result = if self.problem_id.is_empty() {
            tracing::error!(action = %action, "No problem selected, unable to dispatch");
            ActionResult::failure()
        } else {
            match self
                .backend
                .post_action(&self.problem_id, &prepared.request)
                .await
            {
                Ok(res) => ActionResult::from(res),
                Err(err) => {
                    tracing::error!(error = ?err, action = %action, seq = prepared.seq, "Action request failed");
                    ActionResult::failure()
                }
            }
        };

        return DispatchOutcome {
            seq: prepared.seq,
            action,
            result,
        };
    }

    pub async fn dispatch<C, L, S>(
        &self,
        action: ActionKind,
        code: &C,
        language: &L,
        stdin: &S,
    ) -> DispatchOutcome
    where
        C: TextSource + ?Sized,
        L: TextSource + ?Sized,
        S: TextSource + ?Sized,
    {
        let prepared = self.prepare(action, code, language, stdin);
        return self.send(prepared).await;
    }

    /// Whether `seq` belongs to the most recently prepared dispatch.
    pub fn is_latest(&self, seq: u64) -> bool {
        return self.sequence.load(Ordering::SeqCst) == seq;
    }
}

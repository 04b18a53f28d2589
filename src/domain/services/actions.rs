#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use super::clipboard::ClipboardService;
use super::ActionDispatcher;
use crate::domain::models::Action;
use crate::domain::models::BackendRef;
use crate::domain::models::Event;

/// Runs the slow side of user actions off the UI loop. Every action is
/// spawned as its own task that reports back with a single event, so
/// responses can arrive in any order.
pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        backend: BackendRef,
        dispatcher: ActionDispatcher,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            let worker_tx = tx.clone();
            match action {
                Action::Dispatch(prepared) => {
                    let dispatcher = dispatcher.clone();
                    tokio::spawn(async move {
                        let outcome = dispatcher.send(prepared).await;
                        let _ = worker_tx.send(Event::ActionResolved(outcome));
                    });
                }
                Action::CreateChatspace() => {
                    let backend = backend.clone();
                    tokio::spawn(async move {
                        let res = backend.create_chatspace().await;
                        let _ = worker_tx.send(Event::ChatspaceCreated(res));
                    });
                }
                Action::CopyToClipboard(text) => {
                    tokio::spawn(async move {
                        let res = ClipboardService::set(text).await;
                        let _ = worker_tx.send(Event::ShareURLCopied(res));
                    });
                }
            }
        }

        return Ok(());
    }
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::ActionKind;
use crate::domain::models::ActionRequest;
use crate::domain::models::ActionResponse;
use crate::domain::models::Backend;
use crate::domain::models::BackendRef;
use crate::domain::models::Event;
use crate::domain::services::ActionDispatcher;

struct EchoBackend {}

#[async_trait]
impl Backend for EchoBackend {
    #[allow(clippy::implicit_return)]
    async fn post_action(
        &self,
        _problem_id: &str,
        request: &ActionRequest,
    ) -> Result<ActionResponse> {
        return Ok(ActionResponse {
            coutput: Some(request.code.to_string()),
            ..ActionResponse::default()
        });
    }

    #[allow(clippy::implicit_return)]
    async fn create_chatspace(&self) -> Result<String> {
        return Ok("uuid-9".to_string());
    }
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<Event>) -> Event {
    return time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no event within 5s")
        .expect("event channel closed");
}

#[tokio::test]
async fn it_reports_each_action_back_as_an_event() -> Result<()> {
    let backend: BackendRef = Arc::new(EchoBackend {});
    let dispatcher = ActionDispatcher::new(backend.clone(), "12");
    let prepared = dispatcher.prepare(ActionKind::Run, "print(1)", "py", "");

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    tokio::spawn(async move {
        return ActionsService::start(backend, dispatcher, event_tx, &mut action_rx).await;
    });

    action_tx.send(Action::Dispatch(prepared.clone()))?;
    match next_event(&mut event_rx).await {
        Event::ActionResolved(outcome) => {
            assert_eq!(outcome.seq, prepared.seq);
            assert_eq!(outcome.result.stdout, Some("print(1)".to_string()));
        }
        _ => panic!("expected a resolved action"),
    }

    action_tx.send(Action::CreateChatspace())?;
    match next_event(&mut event_rx).await {
        Event::ChatspaceCreated(Ok(session_id)) => assert_eq!(session_id, "uuid-9"),
        _ => panic!("expected a created chat session"),
    }

    return Ok(());
}

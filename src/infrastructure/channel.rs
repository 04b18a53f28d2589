#[cfg(test)]
#[path = "channel_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use futures::SinkExt;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::time;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use url::Url;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::channel_url;
use crate::domain::models::encode_chat_frame;
use crate::domain::models::parse_chat_frame;
use crate::domain::models::ChannelEvent;
use crate::domain::models::ChannelState;
use crate::domain::models::ChatChannel;
use crate::domain::models::Event;

struct Connection {
    session_id: String,
    generation: u64,
    state: watch::Receiver<ChannelState>,
    outbound: mpsc::UnboundedSender<String>,
}

/// Owns the single live chat channel. Connection work runs on a spawned task
/// that reports back through `Event::Channel`, tagged with the generation of
/// the connection that raised it.
pub struct ChannelClient {
    base_url: Url,
    cookie: String,
    connect_timeout: Duration,
    tx: mpsc::UnboundedSender<Event>,
    generation: u64,
    connection: Option<Connection>,
}

impl ChannelClient {
    pub fn new(
        base_url: Url,
        cookie: &str,
        connect_timeout: Duration,
        tx: mpsc::UnboundedSender<Event>,
    ) -> ChannelClient {
        return ChannelClient {
            base_url,
            cookie: cookie.to_string(),
            connect_timeout,
            tx,
            generation: 0,
            connection: None,
        };
    }

    pub fn from_config(base_url: Url, tx: mpsc::UnboundedSender<Event>) -> Result<ChannelClient> {
        let timeout = Config::get(ConfigKey::ConnectTimeout).parse::<u64>()?;

        return Ok(ChannelClient::new(
            base_url,
            &Config::get(ConfigKey::Cookie),
            Duration::from_millis(timeout),
            tx,
        ));
    }
}

impl ChatChannel for ChannelClient {
    fn state(&self) -> ChannelState {
        match &self.connection {
            Some(conn) => return *conn.state.borrow(),
            None => return ChannelState::Closed,
        }
    }

    /// Opens a channel for the session, closing whatever connection existed
    /// before. Returns once the connection task is spawned.
    fn connect(&mut self, session_id: &str, problem_id: &str) -> Result<()> {
        self.close();

        let url = channel_url(&self.base_url, problem_id, session_id)?;
        let mut request = url.as_str().into_client_request()?;
        if !self.cookie.is_empty() {
            request
                .headers_mut()
                .insert("cookie", HeaderValue::from_str(&self.cookie)?);
        }

        self.generation += 1;
        let generation = self.generation;
        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<String>();

        tracing::info!(url = url.as_str(), generation, "Connecting chat channel");
        tokio::spawn(run_connection(
            request,
            self.connect_timeout,
            generation,
            state_tx,
            outbound_rx,
            self.tx.clone(),
        ));

        self.connection = Some(Connection {
            session_id: session_id.to_string(),
            generation,
            state: state_rx,
            outbound: outbound_tx,
        });

        return Ok(());
    }

    /// Hands a chat message to the open connection. Returns `false`, and drops
    /// the message, when the channel is not open.
    fn send(&self, message: &str) -> bool {
        let Some(conn) = &self.connection else {
            return false;
        };
        if *conn.state.borrow() != ChannelState::Open {
            tracing::debug!(generation = conn.generation, "Dropping chat message, channel not open");
            return false;
        }

        let frame = match encode_chat_frame(message) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(error = ?err, "Failed to encode chat message");
                return false;
            }
        };

        return conn.outbound.send(frame).is_ok();
    }

    /// Drops the current connection. Its task sends a close frame and exits
    /// once it sees the outbound side is gone.
    fn close(&mut self) {
        if let Some(conn) = self.connection.take() {
            tracing::info!(
                session_id = conn.session_id.as_str(),
                generation = conn.generation,
                "Closing chat channel"
            );
        }
    }

    /// Filters events of replaced connections. A close of the current
    /// connection clears it; nothing reconnects on its own.
    fn accept(&mut self, event: &ChannelEvent) -> bool {
        let generation = match event {
            ChannelEvent::Opened(generation) => *generation,
            ChannelEvent::Message(generation, _) => *generation,
            ChannelEvent::Closed(generation) => *generation,
        };

        let current = self
            .connection
            .as_ref()
            .map(|conn| return conn.generation == generation)
            .unwrap_or(false);
        if !current {
            return false;
        }

        if let ChannelEvent::Closed(_) = event {
            tracing::warn!(generation, "Chat channel closed");
            self.connection = None;
        }

        return true;
    }
}

async fn run_connection(
    request: tokio_tungstenite::tungstenite::handshake::client::Request,
    connect_timeout: Duration,
    generation: u64,
    state: watch::Sender<ChannelState>,
    mut outbound: mpsc::UnboundedReceiver<String>,
    tx: mpsc::UnboundedSender<Event>,
) {
    let stream = match time::timeout(connect_timeout, connect_async(request)).await {
        Ok(Ok((stream, _response))) => stream,
        Ok(Err(err)) => {
            tracing::warn!(error = ?err, generation, "Chat channel failed to connect");
            state.send_replace(ChannelState::Closed);
            let _ = tx.send(Event::Channel(ChannelEvent::Closed(generation)));
            return;
        }
        Err(_) => {
            tracing::warn!(timeout = ?connect_timeout, generation, "Chat channel connect timed out");
            state.send_replace(ChannelState::Closed);
            let _ = tx.send(Event::Channel(ChannelEvent::Closed(generation)));
            return;
        }
    };

    state.send_replace(ChannelState::Open);
    let _ = tx.send(Event::Channel(ChannelEvent::Opened(generation)));

    let (mut writer, mut reader) = stream.split();
    loop {
        tokio::select! {
            frame = reader.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    if let Some(message) = parse_chat_frame(&text) {
                        if tx.send(Event::Channel(ChannelEvent::Message(generation, message))).is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::warn!(error = ?err, generation, "Chat channel read error");
                    break;
                }
            },
            frame = outbound.recv() => match frame {
                Some(text) => {
                    if let Err(err) = writer.send(WsMessage::Text(text)).await {
                        tracing::warn!(error = ?err, generation, "Chat channel write error");
                        break;
                    }
                }
                None => {
                    state.send_replace(ChannelState::Closed);
                    let _ = writer.send(WsMessage::Close(None)).await;
                    break;
                }
            },
        }
    }

    state.send_replace(ChannelState::Closed);
    let _ = tx.send(Event::Channel(ChannelEvent::Closed(generation)));
}

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use futures::SinkExt;
use futures::StreamExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::ErrorResponse;
use tokio_tungstenite::tungstenite::handshake::server::Request;
use tokio_tungstenite::tungstenite::handshake::server::Response;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

pub fn insta_snapshot<F: FnOnce()>(f: F) {
    let mut settings = insta::Settings::clone_current();
    let snapshot_path = env::current_dir().unwrap().join("./test/snapshots");
    settings.set_snapshot_path(snapshot_path);
    settings.bind(f);
}

/// Local websocket endpoint standing in for the judge's chat channel.
pub struct ChannelServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl ChannelServer {
    pub async fn start() -> ChannelServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        return ChannelServer { listener, addr };
    }

    /// Site root to hand to the client, as an http URL like the judge's.
    pub fn base_url(&self) -> String {
        return format!("http://{}/", self.addr);
    }

    pub async fn accept(&self) -> ChannelPeer {
        let (stream, _) = time::timeout(Duration::from_secs(5), self.listener.accept())
            .await
            .expect("no channel connection within 5s")
            .unwrap();

        let seen: Arc<Mutex<(String, Option<String>)>> = Arc::new(Mutex::new((String::new(), None)));
        let captured = seen.clone();
        let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            let cookie = req
                .headers()
                .get("cookie")
                .and_then(|value| return value.to_str().ok())
                .map(|value| return value.to_string());
            *captured.lock().unwrap() = (req.uri().path().to_string(), cookie);
            return Ok(resp);
        };

        let socket = accept_hdr_async(stream, callback).await.unwrap();
        let (path, cookie) = seen.lock().unwrap().clone();

        return ChannelPeer {
            path,
            cookie,
            socket,
        };
    }
}

pub struct ChannelPeer {
    pub path: String,
    pub cookie: Option<String>,
    socket: WebSocketStream<TcpStream>,
}

impl ChannelPeer {
    /// Next text frame from the client. `None` once the client closed.
    pub async fn recv_text(&mut self) -> Option<String> {
        loop {
            let frame = time::timeout(Duration::from_secs(5), self.socket.next())
                .await
                .expect("no channel frame within 5s");

            match frame {
                Some(Ok(Message::Text(text))) => return Some(text),
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return None,
                Some(Ok(_)) => continue,
            }
        }
    }

    pub async fn send_text(&mut self, text: &str) {
        self.socket.send(Message::Text(text.to_string())).await.unwrap();
    }

    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }
}

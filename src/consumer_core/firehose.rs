//! Websocket firehose client

use super::feed::{FeedClose, FeedError, FeedSource};
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// `FeedSource` over a websocket connection. Text frames are forwarded as-is;
/// pings are answered at the protocol layer and a close frame ends the
/// session cleanly.
pub struct FirehoseFeed {
    url: String,
    token: Option<String>,
    conn: Option<WsStream>,
}

impl FirehoseFeed {
    pub fn new(url: String, token: Option<String>) -> Self {
        Self {
            url,
            token,
            conn: None,
        }
    }
}

#[async_trait]
impl FeedSource for FirehoseFeed {
    async fn connect(&mut self) -> Result<(), FeedError> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| FeedError::Handshake(e.to_string()))?;

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Token token={}", token))
                .map_err(|e| FeedError::Handshake(e.to_string()))?;
            request.headers_mut().insert("Authorization", value);
        }

        let (stream, _response) = connect_async(request)
            .await
            .map_err(|e| FeedError::Handshake(e.to_string()))?;

        log::info!("🔌 connected to {}", self.url);
        self.conn = Some(stream);
        Ok(())
    }

    async fn run(&mut self, frames: mpsc::Sender<String>) -> FeedClose {
        let mut stream = match self.conn.take() {
            Some(stream) => stream,
            None => return FeedClose::Error("run() called without a connection".to_string()),
        };

        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if frames.send(text).await.is_err() {
                        // receiver dropped: local shutdown, not a feed error
                        return FeedClose::Clean;
                    }
                }
                Ok(Message::Close(_)) => return FeedClose::Clean,
                Ok(_) => {}
                Err(e) => return FeedClose::Error(e.to_string()),
            }
        }

        FeedClose::Clean
    }
}

//! Transport seam for the firehose connection

use async_trait::async_trait;
use tokio::sync::mpsc;

/// How a streaming session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedClose {
    /// The feed closed the connection without an error condition.
    Clean,
    /// Transport error or abnormal close.
    Error(String),
}

#[derive(Debug)]
pub enum FeedError {
    Handshake(String),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Handshake(msg) => write!(f, "Handshake failed: {}", msg),
        }
    }
}

impl std::error::Error for FeedError {}

/// A live connection to the firehose.
///
/// `connect` performs the handshake; `run` then streams raw frames into
/// `frames` until the connection reaches a terminal state, holding the sender
/// for the whole session so the receiver observes channel closure exactly at
/// end of stream.
#[async_trait]
pub trait FeedSource: Send {
    async fn connect(&mut self) -> Result<(), FeedError>;

    async fn run(&mut self, frames: mpsc::Sender<String>) -> FeedClose;
}

//! Connection supervision state machine
//!
//! Drives the feed lifecycle: connect, stream until a terminal close,
//! classify it, then retry or stop. Clean closes never retry; errored closes
//! retry immediately, and only while the reconnect flag is set.

use super::feed::{FeedClose, FeedSource};
use crate::correlator_core::CorrelationEngine;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Connecting,
    Streaming,
    ClosedClean,
    ClosedError,
    Terminated,
}

impl ConsumerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumerState::Connecting => "CONNECTING",
            ConsumerState::Streaming => "STREAMING",
            ConsumerState::ClosedClean => "CLOSED_CLEAN",
            ConsumerState::ClosedError => "CLOSED_ERROR",
            ConsumerState::Terminated => "TERMINATED",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsumerOptions {
    pub reconnect: bool,
}

/// What the loop did before terminating. `error_close` reports an errored
/// close that was not retried, so the process can exit non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub reconnects: u32,
    pub error_close: bool,
}

/// Supervise the feed until it terminates. Every frame is fully processed
/// through the engine before the next one is accepted.
pub async fn run_loop<F: FeedSource>(
    feed: &mut F,
    engine: &mut CorrelationEngine,
    opts: &ConsumerOptions,
) -> LoopSummary {
    let mut reconnects = 0u32;

    let summary = loop {
        log::debug!("state: {}", ConsumerState::Connecting.as_str());

        let mut state = match feed.connect().await {
            Ok(()) => ConsumerState::Streaming,
            Err(e) => {
                log::error!("❌ connection failed: {}", e);
                ConsumerState::ClosedError
            }
        };

        if state == ConsumerState::Streaming {
            log::debug!("state: {}", state.as_str());

            state = match stream_session(feed, engine).await {
                FeedClose::Clean => ConsumerState::ClosedClean,
                FeedClose::Error(msg) => {
                    log::error!("❌ stream error: {}", msg);
                    ConsumerState::ClosedError
                }
            };
        }

        log::debug!("state: {}", state.as_str());

        match state {
            ConsumerState::ClosedClean => {
                log::info!("feed closed cleanly");
                break LoopSummary {
                    reconnects,
                    error_close: false,
                };
            }
            ConsumerState::ClosedError if opts.reconnect => {
                // the error condition dies with the old session; the next
                // attempt starts clean and immediately
                reconnects += 1;
                log::info!("re-connecting.. (attempt {})", reconnects);
            }
            _ => {
                break LoopSummary {
                    reconnects,
                    error_close: true,
                };
            }
        }
    };

    log::debug!("state: {}", ConsumerState::Terminated.as_str());
    summary
}

/// Drain one streaming session. Frames queued at close time are still
/// processed before the close outcome is acted on.
async fn stream_session<F: FeedSource>(
    feed: &mut F,
    engine: &mut CorrelationEngine,
) -> FeedClose {
    let (tx, mut rx) = mpsc::channel::<String>(1024);
    let stream = feed.run(tx);
    tokio::pin!(stream);

    loop {
        tokio::select! {
            biased;
            maybe = rx.recv() => match maybe {
                Some(raw) => engine.handle_frame(&raw).await,
                // sender dropped early: the session is winding down
                None => break stream.await,
            },
            close = &mut stream => {
                while let Some(raw) = rx.recv().await {
                    engine.handle_frame(&raw).await;
                }
                break close;
            }
        }
    }
}

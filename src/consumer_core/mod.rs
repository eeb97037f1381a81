//! Consumer Core - feed connection lifecycle and submission hand-off
//!
//! `FeedSource` is the seam to the transport: implementations connect, push
//! raw frames into a bounded channel, and report how the connection closed.
//! `run_loop` supervises that lifecycle - retrying errored closes when the
//! reconnect flag is set, never retrying clean ones - while draining every
//! frame through the correlation engine sequentially.

pub mod feed;
pub mod firehose;
pub mod reconnect;
pub mod submit;

pub use feed::{FeedClose, FeedError, FeedSource};
pub use firehose::FirehoseFeed;
pub use reconnect::{run_loop, ConsumerOptions, ConsumerState, LoopSummary};
pub use submit::{HttpSubmissionClient, Submission, SubmissionClient, SubmitError};

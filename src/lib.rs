//! intelflow - threat-intel firehose correlator
//!
//! Consumes a live firehose of indicator observations, accumulates evidence
//! per indicator over the current day, and re-publishes any indicator that
//! enough distinct providers have reported.
//!
//! ```text
//! Firehose (websocket) → Reconnect Loop → MessageDecoder
//!     ↓
//! CorrelationStore.upsert (per-indicator provider/tag sets, daily window)
//!     ↓
//! TriggerEvaluator (distinct-provider threshold)
//!     ↓
//! SubmissionClient → collection API
//! ```

pub mod config;
pub mod consumer_core;
pub mod correlator_core;

pub use config::Config;
pub use consumer_core::{
    run_loop, ConsumerOptions, ConsumerState, FeedClose, FeedError, FeedSource, FirehoseFeed,
    HttpSubmissionClient, LoopSummary, Submission, SubmissionClient, SubmitError,
};
pub use correlator_core::{
    CorrelatedEvent, CorrelationEngine, CorrelationStore, Decoded, IndicatorRecord,
    MessageDecoder, RawEvent, TriggerEvaluator,
};

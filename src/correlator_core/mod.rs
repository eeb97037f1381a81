//! Correlator Core - Stateful Indicator Correlation Engine
//!
//! Accumulates evidence for each indicator seen on the firehose and decides
//! when enough distinct providers have confirmed it.
//!
//! # Architecture
//!
//! ```text
//! Raw frame → MessageDecoder (Admin | Data | Malformed)
//!     ↓
//! CorrelationStore.upsert (provider/tag sets, first-seen lasttime, daily window)
//!     ↓
//! TriggerEvaluator (distinct-provider threshold → CorrelatedEvent)
//!     ↓
//! SubmissionClient hand-off
//! ```
//!
//! The store is cleared whenever the processing day changes, so evidence never
//! carries across days. Checkpointing snapshots the store's mapping to a JSON
//! file between restarts.

pub mod checkpoint;
pub mod decoder;
pub mod engine;
pub mod store;
pub mod trigger;

pub use checkpoint::{load_checkpoint, save_checkpoint};
pub use decoder::{Decoded, MessageDecoder, RawEvent};
pub use engine::CorrelationEngine;
pub use store::{CorrelationStore, IndicatorRecord};
pub use trigger::{CorrelatedEvent, TriggerEvaluator};

//! Per-frame processing: decode, accumulate, evaluate, submit

use super::decoder::{Decoded, MessageDecoder};
use super::store::{CorrelationStore, IndicatorRecord};
use super::trigger::TriggerEvaluator;
use crate::consumer_core::submit::SubmissionClient;
use chrono::Utc;
use std::collections::HashMap;

/// All correlation state behind one struct, constructed once and threaded by
/// reference through the message-handling path.
pub struct CorrelationEngine {
    decoder: MessageDecoder,
    store: CorrelationStore,
    trigger: TriggerEvaluator,
    client: Box<dyn SubmissionClient>,
}

impl CorrelationEngine {
    pub fn new(user: &str, feed: &str, threshold: usize, client: Box<dyn SubmissionClient>) -> Self {
        Self::with_records(user, feed, threshold, client, HashMap::new())
    }

    /// Construct with a restored checkpoint mapping. The day window starts at
    /// the current wall-clock day regardless of what was restored.
    pub fn with_records(
        user: &str,
        feed: &str,
        threshold: usize,
        client: Box<dyn SubmissionClient>,
        records: HashMap<String, IndicatorRecord>,
    ) -> Self {
        Self {
            decoder: MessageDecoder::new(format!("{}/{}", user, feed)),
            store: CorrelationStore::with_records(records, Utc::now().date_naive()),
            trigger: TriggerEvaluator::new(threshold, user.to_string(), feed.to_string()),
            client,
        }
    }

    /// Process one raw frame end to end. Submission failures are logged and
    /// swallowed; they never stop the stream or touch store state.
    pub async fn handle_frame(&mut self, raw: &str) {
        let event = match self.decoder.decode(raw) {
            Decoded::Admin => return,
            Decoded::Malformed => {
                log::warn!("discarding malformed frame");
                return;
            }
            Decoded::Data(event) => event,
        };

        let record = self.store.upsert(&event, Utc::now());

        if let Some(correlated) = self.trigger.evaluate(&event.indicator, record) {
            match self.client.submit(&correlated).await {
                Ok(submission) => log::info!("posted: {}", submission.location),
                Err(e) => log::warn!("submission failed for {}: {}", correlated.indicator, e),
            }
        }
    }

    pub fn store(&self) -> &CorrelationStore {
        &self.store
    }
}

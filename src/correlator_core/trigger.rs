//! Threshold evaluation and correlated-event synthesis

use super::store::IndicatorRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Synthesized record asserting that an indicator was independently confirmed
/// by at least `trigger` distinct providers. Ephemeral - produced for the
/// submission hand-off, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelatedEvent {
    pub description: String,
    pub indicator: String,
    pub tags: String,
    pub feed: String,
    pub user: String,
    pub lasttime: DateTime<Utc>,
}

pub struct TriggerEvaluator {
    threshold: usize,
    user: String,
    feed: String,
}

impl TriggerEvaluator {
    pub fn new(threshold: usize, user: String, feed: String) -> Self {
        Self {
            threshold,
            user,
            feed,
        }
    }

    /// Fires iff the record has reached the distinct-provider threshold.
    ///
    /// There is no fired-once suppression: every qualifying event at or above
    /// the threshold synthesizes a fresh CorrelatedEvent. The tag join is
    /// sorted, so output is stable for a given tag set.
    pub fn evaluate(&self, indicator: &str, record: &IndicatorRecord) -> Option<CorrelatedEvent> {
        if record.providers.len() < self.threshold {
            return None;
        }

        let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();

        Some(CorrelatedEvent {
            description: "correlated".to_string(),
            indicator: indicator.to_string(),
            tags: tags.join(","),
            feed: self.feed.clone(),
            user: self.user.clone(),
            lasttime: record.lasttime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlator_core::decoder::RawEvent;
    use crate::correlator_core::store::CorrelationStore;
    use chrono::TimeZone;

    fn evaluator() -> TriggerEvaluator {
        TriggerEvaluator::new(3, "wes".to_string(), "correlated".to_string())
    }

    fn make_event(provider: &str, indicator: &str, tags: &str) -> RawEvent {
        RawEvent {
            provider: provider.to_string(),
            indicator: indicator.to_string(),
            tags: tags.to_string(),
            lasttime: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fires_at_threshold_with_joined_tags() {
        let mut store = CorrelationStore::new(now().date_naive());
        let evaluator = evaluator();

        store.upsert(&make_event("A", "1.2.3.0/24", "x"), now());
        let record = store.get("1.2.3.0/24").unwrap();
        assert!(evaluator.evaluate("1.2.3.0/24", record).is_none());

        store.upsert(&make_event("B", "1.2.3.0/24", "y"), now());
        let record = store.get("1.2.3.0/24").unwrap();
        assert!(evaluator.evaluate("1.2.3.0/24", record).is_none());

        store.upsert(&make_event("C", "1.2.3.0/24", "x,z"), now());
        let record = store.get("1.2.3.0/24").unwrap();
        let event = evaluator.evaluate("1.2.3.0/24", record).unwrap();

        assert_eq!(event.description, "correlated");
        assert_eq!(event.indicator, "1.2.3.0/24");
        assert_eq!(event.tags, "x,y,z");
        assert_eq!(event.user, "wes");
        assert_eq!(event.feed, "correlated");
    }

    #[test]
    fn test_refires_on_every_qualifying_event() {
        let mut store = CorrelationStore::new(now().date_naive());
        let evaluator = evaluator();

        for provider in ["A", "B", "C", "D"] {
            store.upsert(&make_event(provider, "1.2.3.4", "scanner"), now());
        }

        let record = store.get("1.2.3.4").unwrap();
        assert!(evaluator.evaluate("1.2.3.4", record).is_some());
        assert!(evaluator.evaluate("1.2.3.4", record).is_some());
    }

    #[test]
    fn test_lasttime_copied_from_record() {
        let mut store = CorrelationStore::new(now().date_naive());
        let evaluator = TriggerEvaluator::new(1, "wes".to_string(), "correlated".to_string());

        let mut event = make_event("A", "1.2.3.4", "scanner");
        event.lasttime = Some(Utc.with_ymd_and_hms(2026, 8, 6, 1, 2, 3).unwrap());
        store.upsert(&event, now());

        let record = store.get("1.2.3.4").unwrap();
        let correlated = evaluator.evaluate("1.2.3.4", record).unwrap();
        assert_eq!(correlated.lasttime, event.lasttime.unwrap());
    }

    #[test]
    fn test_below_threshold_is_silent() {
        let mut store = CorrelationStore::new(now().date_naive());
        let evaluator = evaluator();

        store.upsert(&make_event("A", "1.2.3.4", "scanner"), now());
        store.upsert(&make_event("B", "1.2.3.4", "scanner"), now());

        let record = store.get("1.2.3.4").unwrap();
        assert!(evaluator.evaluate("1.2.3.4", record).is_none());
    }
}

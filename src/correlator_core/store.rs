//! Per-indicator evidence accumulation over a rolling daily window

use super::decoder::RawEvent;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Evidence gathered for one indicator within the current day window.
///
/// `lasttime` is fixed at first sight; later events for the same indicator
/// never overwrite it. Ordered sets keep the tag join deterministic and the
/// checkpoint serialization stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub providers: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub lasttime: DateTime<Utc>,
}

/// Mapping from indicator to its accumulated evidence, scoped to one
/// calendar day of wall-clock processing time.
pub struct CorrelationStore {
    records: HashMap<String, IndicatorRecord>,
    window_day: NaiveDate,
}

impl CorrelationStore {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            records: HashMap::new(),
            window_day: today,
        }
    }

    /// Restore from a checkpoint. The day marker is not persisted; it is
    /// revalidated against the wall clock here, and any stale records are
    /// swept by the day check on the next upsert.
    pub fn with_records(records: HashMap<String, IndicatorRecord>, today: NaiveDate) -> Self {
        Self {
            records,
            window_day: today,
        }
    }

    /// Fold one observation into the store and return the updated record.
    ///
    /// Crossing into a new processing day clears the entire mapping first, so
    /// evidence never survives the day it was gathered in. Re-applying an
    /// identical event changes nothing observable.
    pub fn upsert(&mut self, event: &RawEvent, now: DateTime<Utc>) -> &IndicatorRecord {
        let today = now.date_naive();
        if today != self.window_day {
            log::info!(
                "day window rolled {} -> {}, clearing {} indicator(s)",
                self.window_day,
                today,
                self.records.len()
            );
            self.records.clear();
            self.window_day = today;
        }

        let record = self
            .records
            .entry(event.indicator.clone())
            .or_insert_with(|| IndicatorRecord {
                providers: BTreeSet::new(),
                tags: BTreeSet::new(),
                lasttime: event.lasttime.unwrap_or(now),
            });

        record.providers.insert(event.provider.clone());

        for tag in event.tags.split(',') {
            let tag = tag.trim();
            if !tag.is_empty() {
                record.tags.insert(tag.to_string());
            }
        }

        record
    }

    pub fn get(&self, indicator: &str) -> Option<&IndicatorRecord> {
        self.records.get(indicator)
    }

    pub fn records(&self) -> &HashMap<String, IndicatorRecord> {
        &self.records
    }

    pub fn window_day(&self) -> NaiveDate {
        self.window_day
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

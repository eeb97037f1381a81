//! Checkpoint persistence for the correlation store

use super::store::{CorrelationStore, IndicatorRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// On-disk snapshot of the store's indicator mapping.
///
/// The day marker is intentionally not part of the snapshot; the store
/// revalidates the current day against the wall clock on restore.
#[derive(Debug, Serialize, Deserialize)]
struct CheckpointSnapshot {
    records: HashMap<String, IndicatorRecord>,
    saved_at: DateTime<Utc>,
}

/// Save the full indicator mapping to `path`. Provider/tag sets and
/// timestamps round-trip exactly through `load_checkpoint`.
pub fn save_checkpoint(
    path: &str,
    store: &CorrelationStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = CheckpointSnapshot {
        records: store.records().clone(),
        saved_at: Utc::now(),
    };

    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, json)?;

    log::info!("saved {} indicator(s) to {}", store.len(), path);
    Ok(())
}

/// Load a previously saved indicator mapping.
///
/// A missing file is not an error - correlation simply starts from an empty
/// context. An unreadable or corrupt file is returned as `Err`; the caller
/// decides whether that is fatal.
pub fn load_checkpoint(
    path: &str,
) -> Result<HashMap<String, IndicatorRecord>, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        log::info!("no existing checkpoint at {}", path);
        return Ok(HashMap::new());
    }

    let json = fs::read_to_string(path)?;
    let snapshot: CheckpointSnapshot = serde_json::from_str(&json)?;

    log::info!(
        "loaded {} indicator(s) from {} (saved {})",
        snapshot.records.len(),
        path,
        snapshot.saved_at
    );
    Ok(snapshot.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlator_core::decoder::RawEvent;
    use chrono::TimeZone;

    fn make_event(provider: &str, indicator: &str, tags: &str) -> RawEvent {
        RawEvent {
            provider: provider.to_string(),
            indicator: indicator.to_string(),
            tags: tags.to_string(),
            lasttime: Some(Utc.with_ymd_and_hms(2026, 8, 6, 9, 30, 0).unwrap()),
        }
    }

    #[test]
    fn test_save_then_load_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("correlator.json");
        let path = path.to_str().unwrap();

        let now = Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap();
        let mut store = CorrelationStore::new(now.date_naive());
        store.upsert(&make_event("a/feed", "1.2.3.0/24", "scanner,ssh"), now);
        store.upsert(&make_event("b/feed", "1.2.3.0/24", "bruteforce"), now);
        store.upsert(&make_event("c/feed", "evil.example.com", "phishing"), now);

        save_checkpoint(path, &store).unwrap();
        let restored = load_checkpoint(path).unwrap();

        assert_eq!(restored.len(), 2);

        let record = &restored["1.2.3.0/24"];
        assert_eq!(record.providers, store.get("1.2.3.0/24").unwrap().providers);
        assert_eq!(record.tags, store.get("1.2.3.0/24").unwrap().tags);
        assert_eq!(record.lasttime, store.get("1.2.3.0/24").unwrap().lasttime);
    }

    #[test]
    fn test_missing_checkpoint_is_empty_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.json");

        let restored = load_checkpoint(path.to_str().unwrap()).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_corrupt_checkpoint_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("correlator.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load_checkpoint(path.to_str().unwrap()).is_err());
    }
}

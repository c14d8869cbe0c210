use crate::errors::StorageError;
use crate::models::{Category, Entry, Store};
use crate::storage::KeyValueStore;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};

pub const STORAGE_KEY: &str = "slice-v1";

/// Reads the persisted store. Anything short of a readable document yields
/// an empty store; the reason is logged.
pub fn load(storage: &impl KeyValueStore) -> Store {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Store::default(),
        Err(err) => {
            warn!("failed to load state: {err}");
            return Store::default();
        }
    };

    match serde_json::from_str::<Store>(&raw) {
        Ok(store) => {
            debug!(entries = store.entries.len(), "loaded state");
            store
        }
        Err(err) => {
            warn!("failed to parse state: {err}");
            Store::default()
        }
    }
}

pub fn append(store: &Store, category: Category, storage: &impl KeyValueStore) -> Store {
    append_at(store, category, Utc::now(), storage)
}

/// Returns `store` with one more entry stamped at `now`, written through to
/// `storage`. A failed write is logged; the returned store is still the
/// session's truth.
pub fn append_at(
    store: &Store,
    category: Category,
    now: DateTime<Utc>,
    storage: &impl KeyValueStore,
) -> Store {
    let mut entries = Vec::with_capacity(store.entries.len() + 1);
    entries.extend_from_slice(&store.entries);
    entries.push(Entry {
        date: day_key(now),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        category,
    });
    let updated = Store { entries };

    if let Err(err) = persist(&updated, storage) {
        warn!("failed to save state: {err}");
    }

    updated
}

pub fn persist(store: &Store, storage: &impl KeyValueStore) -> Result<(), StorageError> {
    let payload = serde_json::to_string(store)?;
    storage.set(STORAGE_KEY, &payload)
}

/// Calendar day of `now` in UTC, `YYYY-MM-DD`.
pub fn day_key(now: DateTime<Utc>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}

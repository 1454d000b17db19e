use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

use crate::*;

/// Names the storage slot a persisted type lives in.
pub trait StorageKey {
    const KEY: &'static str;
}

/// Single local key-value store holding raw records.
pub trait RecordStore {
    fn read(&self, key: &str) -> Option<String>;

    fn write(&mut self, key: &str, record: &str) -> Result<()>;
}

/// Loads a value from `store`, falling back to `default` when it is absent or does not parse.
pub fn load_or_else<T, S, F>(store: &S, default: F) -> T
where
    T: StorageKey + DeserializeOwned,
    S: RecordStore + ?Sized,
    F: FnOnce() -> T,
{
    let Some(record) = store.read(T::KEY) else {
        log::debug!("no record under {}", T::KEY);
        return default();
    };
    match serde_json::from_str(&record) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("discarding malformed record under {}: {}", T::KEY, err);
            default()
        }
    }
}

pub fn save_value<T, S>(store: &mut S, value: &T) -> Result<()>
where
    T: StorageKey + Serialize,
    S: RecordStore + ?Sized,
{
    let record = serde_json::to_string(value).map_err(|err| {
        log::error!("could not serialize {}: {}", T::KEY, err);
        GameError::Storage
    })?;
    store.write(T::KEY, &record)
}

/// In-process store, backs tests and non-browser hosts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.records.get(key).cloned()
    }

    fn write(&mut self, key: &str, record: &str) -> Result<()> {
        self.records.insert(key.to_string(), record.to_string());
        Ok(())
    }
}

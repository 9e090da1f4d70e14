use super::kv::{KeyValueStore, StoreError};
use crate::domain::{Task, TimerSettings};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Key holding the task array
pub const TASKS_KEY: &str = "tasks";
/// Key holding the timer settings
pub const TIMER_KEY: &str = "timerSettings";
/// Key holding the dark mode flag
pub const DARK_MODE_KEY: &str = "darkMode";

/// Load a record, falling back to `default` when the key is absent.
/// A record that fails to decode is also replaced by the default.
#[tracing::instrument(skip(store, default))]
pub fn load_record<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    default: T,
) -> Result<T, StoreError> {
    let Some(raw) = store.get(key)? else {
        debug!(key, "record absent, using default");
        return Ok(default);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(key, error = %err, "record could not be decoded, using default");
            Ok(default)
        }
    }
}

/// Load an array record one element at a time. Elements that fail to
/// decode are skipped, and the raw record is copied to `<key>.corrupt`
/// before the next write-back can replace it.
#[tracing::instrument(skip(store))]
pub fn load_list<T: DeserializeOwned>(
    store: &mut dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        debug!(key, "record absent, using default");
        return Ok(Vec::new());
    };

    let elements: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(elements) => elements,
        Err(err) => {
            warn!(key, error = %err, "record could not be decoded, using default");
            keep_corrupt(store, key, &raw);
            return Ok(Vec::new());
        }
    };

    let total = elements.len();
    let mut items = Vec::with_capacity(total);
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value(element) {
            Ok(item) => items.push(item),
            Err(err) => {
                warn!(key, index, error = %err, "skipping element that could not be decoded")
            }
        }
    }
    if items.len() < total {
        keep_corrupt(store, key, &raw);
    }
    Ok(items)
}

/// Key the raw text of an undecodable record is copied to
pub fn corrupt_key(key: &str) -> String {
    format!("{}.corrupt", key)
}

fn keep_corrupt(store: &mut dyn KeyValueStore, key: &str, raw: &str) {
    let backup = corrupt_key(key);
    match store.set(&backup, raw) {
        Ok(()) => warn!(key, backup = %backup, "kept a copy of the undecodable record"),
        Err(err) => warn!(key, error = %err, "could not keep a copy of the undecodable record"),
    }
}

/// Serialize and write a record
#[tracing::instrument(skip(store, value))]
pub fn save_record<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

/// Everything the session hydrates from the store on start
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedState {
    pub tasks: Vec<Task>,
    pub timer: TimerSettings,
    pub dark_mode: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            timer: TimerSettings::default(),
            dark_mode: false,
        }
    }
}

impl PersistedState {
    pub fn load(store: &mut dyn KeyValueStore) -> Result<Self, StoreError> {
        Ok(Self {
            tasks: load_list(store, TASKS_KEY)?,
            timer: load_record(&*store, TIMER_KEY, TimerSettings::default())?,
            dark_mode: load_record(&*store, DARK_MODE_KEY, false)?,
        })
    }
}

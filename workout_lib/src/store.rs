use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::workout::Workout;

/// Flat string key-value storage, e.g. the browser's `localStorage`.
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize workouts: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("stored workouts are not a list: {0}")]
    Corrupt(#[source] serde_json::Error),
}

#[derive(Debug, Default, PartialEq)]
pub struct LoadReport {
    pub workouts: Vec<Workout>,
    /// Records that could not be read back as a workout.
    pub skipped: usize,
}

pub fn save_workouts(store: &mut impl Store, key: &str, workouts: &[Workout]) -> Result<(), StoreError> {
    let blob = serde_json::to_string(workouts).map_err(StoreError::Serialize)?;
    store.set(key, &blob);
    Ok(())
}

/// A missing key is an empty list, not an error.
pub fn load_workouts(store: &impl Store, key: &str) -> Result<LoadReport, StoreError> {
    let Some(blob) = store.get(key) else {
        return Ok(LoadReport::default());
    };

    let records: Option<Vec<Value>> = serde_json::from_str(&blob).map_err(StoreError::Corrupt)?;

    let mut report = LoadReport::default();
    for record in records.unwrap_or_default() {
        match serde_json::from_value::<Workout>(record) {
            Ok(workout) => report.workouts.push(workout),
            Err(_) => report.skipped += 1,
        }
    }

    Ok(report)
}

pub fn clear_workouts(store: &mut impl Store, key: &str) {
    store.remove(key);
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::workout::Coords;

    fn sample() -> Vec<Workout> {
        let created = Local.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap();
        vec![
            Workout::running(Coords(40.0, -75.0), 5., 25., 178., created),
            Workout::cycling(Coords(40.1, -75.2), 20., 60., 300., created + chrono::Duration::minutes(1)),
        ]
    }

    #[test]
    fn test_missing_key_is_empty() {
        let store = MemoryStore::new();
        let report = load_workouts(&store, "workouts").unwrap();
        assert!(report.workouts.is_empty());
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_null_blob_is_empty() {
        let mut store = MemoryStore::new();
        store.set("workouts", "null");
        assert!(load_workouts(&store, "workouts").unwrap().workouts.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let workouts = sample();

        save_workouts(&mut store, "workouts", &workouts).unwrap();
        let report = load_workouts(&store, "workouts").unwrap();

        assert_eq!(report.workouts, workouts);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_corrupt_blob() {
        let mut store = MemoryStore::new();
        store.set("workouts", "{not json");
        assert!(matches!(load_workouts(&store, "workouts"), Err(StoreError::Corrupt(_))));

        store.set("workouts", r#"{"id": "1"}"#);
        assert!(matches!(load_workouts(&store, "workouts"), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_malformed_records_skipped() {
        let mut store = MemoryStore::new();
        let mut records = serde_json::to_value(sample()).unwrap();
        records.as_array_mut().unwrap().push(serde_json::json!({ "type": "swimming", "distance": 1 }));
        store.set("workouts", &records.to_string());

        let report = load_workouts(&store, "workouts").unwrap();
        assert_eq!(report.workouts.len(), 2);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_clear() {
        let mut store = MemoryStore::new();
        save_workouts(&mut store, "workouts", &sample()).unwrap();
        store.set("other", "kept");

        clear_workouts(&mut store, "workouts");

        assert_eq!(store.get("workouts"), None);
        assert_eq!(store.get("other").as_deref(), Some("kept"));
    }
}

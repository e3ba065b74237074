//! In-memory adapter: Implementation of `EpisodeStore`.
//!
//! Backs the CLI and tests. Readings are kept sorted by visit date so
//! `load_readings` always returns a chronologically ordered snapshot.
//!
//! # Mutex Behavior
//!
//! State is protected by `Mutex`. A poisoned mutex (from panic in another
//! thread) surfaces as a storage error rather than propagating the panic.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{PregnancyEpisode, VisitReading};
use crate::ports::EpisodeStore;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate reading for episode {episode_id} on {visit_date}")]
    DuplicateReading {
        episode_id: String,
        visit_date: chrono::NaiveDate,
    },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Default)]
struct EpisodeRecord {
    episode: Option<PregnancyEpisode>,
    readings: Vec<VisitReading>,
}

/// In-memory episode store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, EpisodeRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-loaded with one episode and its readings.
    ///
    /// # Errors
    /// Returns error on duplicate reading dates.
    pub fn with_snapshot(
        episode: PregnancyEpisode,
        readings: Vec<VisitReading>,
    ) -> Result<Self, StorageError> {
        let store = Self::new();
        let id = episode.id.clone();
        store.save_episode(&episode)?;
        for reading in &readings {
            store.insert_reading(&id, reading)?;
        }
        Ok(store)
    }
}

impl EpisodeStore for MemoryStore {
    type Error = StorageError;

    fn load_episode(&self, episode_id: &str) -> Result<Option<PregnancyEpisode>, Self::Error> {
        let records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records
            .get(episode_id)
            .and_then(|record| record.episode.clone()))
    }

    fn save_episode(&self, episode: &PregnancyEpisode) -> Result<(), Self::Error> {
        let mut records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        records
            .entry(episode.id.clone())
            .or_default()
            .episode = Some(episode.clone());
        Ok(())
    }

    fn load_readings(&self, episode_id: &str) -> Result<Vec<VisitReading>, Self::Error> {
        let records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records
            .get(episode_id)
            .map(|record| record.readings.clone())
            .unwrap_or_default())
    }

    fn insert_reading(
        &self,
        episode_id: &str,
        reading: &VisitReading,
    ) -> Result<(), Self::Error> {
        let mut records = self.records.lock().map_err(|_| StorageError::LockPoisoned)?;
        let record = records
            .get_mut(episode_id)
            .ok_or_else(|| StorageError::NotFound(format!("episode {episode_id}")))?;

        if record
            .readings
            .iter()
            .any(|r| r.visit_date == reading.visit_date)
        {
            return Err(StorageError::DuplicateReading {
                episode_id: episode_id.to_string(),
                visit_date: reading.visit_date,
            });
        }

        record.readings.push(reading.clone());
        record.readings.sort_by_key(|r| r.visit_date);
        Ok(())
    }
}

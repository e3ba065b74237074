//! Episode store port: snapshot source for episodes and their readings.
//!
//! The engine consumes a consistent, read-only snapshot handed to it by the
//! caller; concurrent-write handling and caching belong to the implementing
//! storage layer.

use crate::domain::{PregnancyEpisode, VisitReading};

/// Trait for episode and reading persistence.
pub trait EpisodeStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load one episode by id.
    ///
    /// # Returns
    /// `None` if no such episode exists.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn load_episode(&self, episode_id: &str) -> Result<Option<PregnancyEpisode>, Self::Error>;

    /// Save a new episode or replace an existing one.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn save_episode(&self, episode: &PregnancyEpisode) -> Result<(), Self::Error>;

    /// Load the episode's readings in chronological order (oldest first).
    ///
    /// The returned snapshot is owned by the caller; the engine never writes
    /// through it.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn load_readings(&self, episode_id: &str) -> Result<Vec<VisitReading>, Self::Error>;

    /// Insert one reading for the episode.
    ///
    /// Readings for an episode are totally ordered by visit date; an insert
    /// with a date already on file must be rejected, not merged silently.
    ///
    /// # Errors
    /// Returns error on a duplicate visit date or if the storage operation
    /// fails.
    fn insert_reading(&self, episode_id: &str, reading: &VisitReading)
        -> Result<(), Self::Error>;
}

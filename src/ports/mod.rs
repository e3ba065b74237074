//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the engine and the excluded surrounding application (record
//! persistence, episode-lifecycle notification).

mod notify;
mod store;

pub use notify::RiskNotifier;
pub use store::EpisodeStore;

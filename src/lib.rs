//! # Delvegen
//!
//! Procedural content generation for text-adventure RPGs.
//!
//! ## Architecture Overview
//!
//! Delvegen fabricates weapons, armour, enemies, rooms and whole dungeon maps
//! with internally consistent stats and flavor names. The crate is organised
//! leaves first:
//!
//! - **Utilities**: randomization primitives (skew jitter, bounded draws and the
//!   cubic level sampler) threaded through an explicit seeded RNG
//! - **Game model**: plain value types for items, creatures, rooms and maps,
//!   all serde-serializable so a save layer can round-trip them
//! - **Generation**: the item, creature, allocator, room and map generators,
//!   each behind the common [`Generator`] trait
//!
//! Nothing in the library performs I/O except the explicit snapshot helpers in
//! [`game::state`]. Chat transports, image export and session handling are left
//! to callers.

pub mod game;
pub mod generation;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use utils::*;

/// Core error type for the Delvegen engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A name did not match any variant of an enumerated set
    #[error("Invalid {kind}: '{value}'")]
    InvalidEnum { kind: &'static str, value: String },

    /// Loaded or assembled state is inconsistent
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Generated content broke one of its invariants
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl DelveError {
    /// Builds an [`DelveError::InvalidEnum`] for the given kind and offending value.
    pub fn invalid_enum(kind: &'static str, value: impl Into<String>) -> Self {
        DelveError::InvalidEnum {
            kind,
            value: value.into(),
        }
    }
}

/// Result type used throughout the Delvegen codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed game constants that are not worth exposing as tunables.
pub mod config {
    /// Number of armour slots on a humanoid
    pub const ARMOUR_SLOT_COUNT: usize = 5;

    /// Probability that a generated humanoid is right-handed
    pub const RIGHT_HANDED_CHANCE: f64 = 0.9;

    /// Probability of equipping a second one-handed weapon in the off hand
    pub const OFF_HAND_CHANCE: f64 = 0.2;

    /// Constant action point cost of wearing any armour piece
    pub const ARMOUR_AP: u32 = 10;

    /// Multiplier applied to template max AP for enemies
    pub const ENEMY_AP_MODIFIER: f64 = 5.0;

    /// Fantasy name length used for creature names
    pub const CREATURE_NAME_LENGTH: usize = 2;

    /// Rarity above which items may earn an epic title
    pub const EPIC_TITLE_MIN_RARITY: f64 = 2.5;
}

//! # Generation Module
//!
//! Procedural content generation for items, creatures, rooms and maps.
//!
//! Every generator is a small builder struct holding its optional inputs and
//! implementing [`Generator`]. Unset inputs are rolled from the RNG handed to
//! `generate`, so one seeded stream reproduces a whole run.

pub mod allocation;
pub mod dungeon;
pub mod encounters;
pub mod items;
pub mod naming;

pub use allocation::*;
pub use dungeon::*;
pub use encounters::*;
pub use items::*;
pub use naming::*;

use crate::{DelveError, DelveResult};
use log::warn;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for procedural generation.
///
/// Holds every tunable the generators read. Missing fields in a config file
/// fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Percent spread of the jitter applied to every stat
    pub stat_skew_percent: f64,
    /// Floor for rarity and level inputs
    pub min_rarity: f64,
    /// Iteration ceiling of the loot and enemy allocators
    pub allocator_retry_limit: u32,
    /// How much the allocator distribution shrinks after a rejected draw
    pub distribution_decay: f64,
    /// Lowest value the allocator distribution decays to
    pub min_distribution: f64,
    /// Chance that a chest is formed regardless of loot count
    pub chest_trigger_chance: f64,
    /// Most chests a room can hold
    pub max_chests: usize,
    /// Loose item count above which loot is packed into chests
    pub loose_item_threshold: usize,
    /// Smallest room side
    pub min_room_size: i32,
    /// Largest room side
    pub max_room_size: i32,
    /// Largest side of the seed room of a map
    pub seed_room_max_size: i32,
    /// Candidate rooms tried per map slot
    pub placement_attempts: u32,
    /// Deepest single rollback after a failed slot
    pub max_rollback_steps: usize,
    /// Rollbacks allowed over a whole map before stopping early
    pub max_total_rollbacks: u32,
    /// Level added per room grown away from the seed
    pub level_step: u32,
    /// Chance that each non-entrance door of a map room is open
    pub default_connectivity: f64,
}

impl GenerationConfig {
    /// Creates the standard configuration with the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use delvegen::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            stat_skew_percent: 10.0,
            min_rarity: 0.1,
            allocator_retry_limit: 100,
            distribution_decay: 0.1,
            min_distribution: 0.1,
            chest_trigger_chance: 0.1,
            max_chests: 3,
            loose_item_threshold: 5,
            min_room_size: 2,
            max_room_size: 20,
            seed_room_max_size: 8,
            placement_attempts: 100,
            max_rollback_steps: 5,
            max_total_rollbacks: 50,
            level_step: 2,
            default_connectivity: 0.5,
        }
    }

    /// Creates a configuration for testing with smaller rooms and a lower
    /// allocator ceiling.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            allocator_retry_limit: 30,
            max_room_size: 8,
            seed_room_max_size: 5,
            ..Self::new(seed)
        }
    }

    /// Checks that the tunables make sense together.
    pub fn validate(&self) -> DelveResult<()> {
        let probabilities = [
            ("chest_trigger_chance", self.chest_trigger_chance),
            ("default_connectivity", self.default_connectivity),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(DelveError::InvalidState(format!(
                    "{name} must lie in [0, 1], got {value}"
                )));
            }
        }
        if self.min_room_size < 1 || self.max_room_size < self.min_room_size {
            return Err(DelveError::InvalidState(format!(
                "room sizes must satisfy 1 <= min ({}) <= max ({})",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.seed_room_max_size < self.min_room_size {
            return Err(DelveError::InvalidState(format!(
                "seed room max size {} is below the min room size {}",
                self.seed_room_max_size, self.min_room_size
            )));
        }
        if self.min_rarity <= 0.0 || self.min_distribution <= 0.0 {
            return Err(DelveError::InvalidState(
                "min_rarity and min_distribution must be positive".to_string(),
            ));
        }
        if self.stat_skew_percent < 0.0 || self.stat_skew_percent >= 100.0 {
            return Err(DelveError::InvalidState(format!(
                "stat_skew_percent must lie in [0, 100), got {}",
                self.stat_skew_percent
            )));
        }
        Ok(())
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> DelveResult<Self> {
        let json = fs::read_to_string(path)?;
        let config: GenerationConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration to a JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> DelveResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Raises a rarity or level below the configured floor to the floor.
    pub fn clamp_rarity(&self, value: f64, what: &str) -> f64 {
        if value >= self.min_rarity {
            value
        } else {
            warn!(
                "{what} {value} is below the minimum, using {}",
                self.min_rarity
            );
            self.min_rarity
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for content generators.
///
/// All generation systems in Delvegen implement this trait, so callers can
/// drive and check any of them the same way.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.allocator_retry_limit, 100);
        assert_eq!(config.placement_attempts, 100);
        assert_eq!(config.max_rollback_steps, 5);
        assert!(config.validate().is_ok());

        let testing = GenerationConfig::for_testing(1);
        assert!(testing.max_room_size < config.max_room_size);
        assert!(testing.validate().is_ok());
        assert_eq!(GenerationConfig::default().seed, 42);
    }

    #[test]
    fn test_config_validation_rejects_nonsense() {
        let mut config = GenerationConfig::new(1);
        config.max_room_size = 1;
        assert!(matches!(config.validate(), Err(DelveError::InvalidState(_))));

        let mut config = GenerationConfig::new(1);
        config.default_connectivity = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut config = GenerationConfig::new(9);
        config.level_step = 3;
        config.to_json_file(&path).unwrap();
        assert_eq!(GenerationConfig::from_json_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GenerationConfig = serde_json::from_str(r#"{"seed": 5, "max_chests": 1}"#).unwrap();
        assert_eq!(config.seed, 5);
        assert_eq!(config.max_chests, 1);
        assert_eq!(config.min_room_size, 2);
    }

    #[test]
    fn test_clamp_rarity() {
        let config = GenerationConfig::default();
        assert_eq!(config.clamp_rarity(0.05, "rarity"), 0.1);
        assert_eq!(config.clamp_rarity(-3.0, "rarity"), 0.1);
        assert_eq!(config.clamp_rarity(4.2, "rarity"), 4.2);
    }
}

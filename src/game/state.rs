//! # Saved World State
//!
//! Whole-file JSON snapshots of players and generated rooms. Saving overwrites
//! the previous snapshot; the last writer wins.

use super::creatures::{Creature, CreatureKind};
use super::world::Room;
use crate::{DelveError, DelveResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Everything persisted between sessions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SaveData {
    pub players: Vec<Creature>,
    pub dead_players: Vec<Creature>,
    pub rooms: Vec<Room>,
    /// Free-form state owned by the caller
    #[serde(default)]
    pub game_state: BTreeMap<String, serde_json::Value>,
}

impl SaveData {
    /// Creates an empty save.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new player.
    ///
    /// Fails when the creature is not a player or the name is already taken.
    pub fn add_player(&mut self, player: Creature) -> DelveResult<()> {
        if !matches!(player.kind, CreatureKind::Player(_)) {
            return Err(DelveError::InvalidState(format!(
                "{} is not a player",
                player.name
            )));
        }
        if self.find_player(&player.name).is_some() {
            return Err(DelveError::InvalidState(format!(
                "a player named {} already exists",
                player.name
            )));
        }
        self.players.push(player);
        Ok(())
    }

    pub fn find_player(&self, name: &str) -> Option<&Creature> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn find_player_mut(&mut self, name: &str) -> Option<&mut Creature> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// Moves players with no hp left to the dead list. Returns how many moved.
    pub fn bury_dead_players(&mut self) -> usize {
        let (alive, dead): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.players).into_iter().partition(Creature::is_alive);
        let moved = dead.len();
        self.players = alive;
        self.dead_players.extend(dead);
        moved
    }

    /// Checks that loaded content is consistent.
    pub fn validate(&self) -> DelveResult<()> {
        for player in self.players.iter().chain(&self.dead_players) {
            if !matches!(player.kind, CreatureKind::Player(_)) {
                return Err(DelveError::InvalidState(format!(
                    "{} is stored as a player but is not one",
                    player.name
                )));
            }
        }
        for (index, room) in self.rooms.iter().enumerate() {
            if room.size.width < 1 || room.size.height < 1 {
                return Err(DelveError::InvalidState(format!(
                    "room {index} has an empty size"
                )));
            }
            if !room.placements_in_bounds() {
                return Err(DelveError::InvalidState(format!(
                    "room {index} has contents outside its bounds"
                )));
            }
        }
        Ok(())
    }

    /// Serializes the snapshot to pretty JSON.
    pub fn save_to_json(&self) -> DelveResult<String> {
        serde_json::to_string_pretty(self).map_err(DelveError::from)
    }

    /// Deserializes and validates a snapshot.
    pub fn load_from_json(json: &str) -> DelveResult<Self> {
        let data: SaveData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    /// Writes the snapshot to `path`, replacing any previous file.
    pub fn save(&self, path: impl AsRef<Path>) -> DelveResult<()> {
        let path = path.as_ref();
        fs::write(path, self.save_to_json()?)?;
        info!("Game saved to {}", path.display());
        debug!(
            "{} players, {} dead players, {} rooms",
            self.players.len(),
            self.dead_players.len(),
            self.rooms.len()
        );
        Ok(())
    }

    /// Reads a snapshot from `path`.
    ///
    /// A missing or empty file yields a blank save.
    pub fn load(path: impl AsRef<Path>) -> DelveResult<Self> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };
        if json.trim().is_empty() {
            warn!("No save data found at {}. Created blank save.", path.display());
            return Ok(Self::new());
        }
        let data = Self::load_from_json(&json)?;
        info!("Loaded save from {}", path.display());
        Ok(data)
    }
}

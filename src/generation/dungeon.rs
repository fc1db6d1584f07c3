//! # Dungeon Generation
//!
//! Single rooms filled from loot and enemy budgets, and maps grown room by room
//! from a seed room with bounded backtracking.

use super::allocation::{generate_enemies, generate_loot};
use super::{GenerationConfig, Generator};
use crate::game::{
    Biome, Chest, ChestMaterial, Creature, Direction, Doors, Item, ItemProperties, Map, Named,
    Placed, Position, Rect, Room, Size,
};
use crate::utils::{pick, sample_level, zero_to_range};
use crate::{DelveError, DelveResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;

/// Generates one populated room.
///
/// Every input is optional. Unset inputs are rolled:
/// 1. Doors open on coin flips and size is uniform over the configured range
/// 2. Level comes from [`sample_level`] times ten
/// 3. Enemy and loot budgets scale with the level squared
/// 4. Loot is allocated, then packed into chests when there is a lot of it
/// 5. Enemies are allocated and placed strongest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomGenerator {
    pub doors: Option<Doors>,
    pub size: Option<Size>,
    pub level: Option<f64>,
    pub enemy_budget: Option<f64>,
    pub loot_budget: Option<f64>,
    pub biome: Option<Biome>,
    pub enemy_distribution: Option<f64>,
    pub loot_distribution: Option<f64>,
    pub position: Option<Position>,
    pub entrance: Option<Direction>,
    pub exits: Option<Vec<Direction>>,
}

impl RoomGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doors(mut self, doors: Doors) -> Self {
        self.doors = Some(doors);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_level(mut self, level: f64) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_enemy_budget(mut self, budget: f64) -> Self {
        self.enemy_budget = Some(budget);
        self
    }

    pub fn with_loot_budget(mut self, budget: f64) -> Self {
        self.loot_budget = Some(budget);
        self
    }

    pub fn with_biome(mut self, biome: Biome) -> Self {
        self.biome = Some(biome);
        self
    }

    pub fn with_enemy_distribution(mut self, distribution: f64) -> Self {
        self.enemy_distribution = Some(distribution);
        self
    }

    pub fn with_loot_distribution(mut self, distribution: f64) -> Self {
        self.loot_distribution = Some(distribution);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_entrance(mut self, entrance: Direction) -> Self {
        self.entrance = Some(entrance);
        self
    }

    pub fn with_exits(mut self, exits: Vec<Direction>) -> Self {
        self.exits = Some(exits);
        self
    }

    /// Packs loot from the tail of `loot` into chests.
    ///
    /// Each chest takes a third of the loot budget in value. Chests only form
    /// on a lucky roll or while too many loose items remain.
    fn pack_chests(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
        loot: &mut Vec<Item>,
        loot_budget: f64,
    ) -> Vec<Chest> {
        let share = (loot_budget.max(0.0) / 3.0).floor() as i64;
        let mut chests = Vec::new();

        for _ in 0..config.max_chests {
            let triggered = rng.gen_bool(config.chest_trigger_chance)
                || loot.len() > config.loose_item_threshold;
            if !triggered {
                continue;
            }

            let mut left = share;
            let mut contents = Vec::new();
            while left > 0 {
                let Some(item) = loot.pop() else { break };
                left -= i64::from(item.total_value());
                contents.push(item);
            }
            if contents.is_empty() {
                continue;
            }

            contents.sort_by(|a, b| b.total_value().cmp(&a.total_value()));
            chests.push(Chest::new(*pick(rng, ChestMaterial::ALL), contents));
        }
        chests
    }
}

impl Generator<Room> for RoomGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Room> {
        let mut doors = match self.doors {
            Some(doors) => doors,
            None => Doors::random(rng, 0.5),
        };
        if let Some(entrance) = self.entrance {
            doors.set(entrance, true);
        }
        let size = match self.size {
            Some(size) => size,
            None => Size::random(rng, config.min_room_size, config.max_room_size),
        };
        if size.width < 1 || size.height < 1 {
            return Err(DelveError::InvalidState(format!(
                "room size {}x{} is empty",
                size.width, size.height
            )));
        }

        let level = match self.level {
            Some(level) => level,
            None => sample_level(rng) * 10.0,
        };
        let level = (config.clamp_rarity(level / 10.0, "room level") * 10.0).trunc();
        let area = f64::from(size.area());

        let enemy_budget = match self.enemy_budget {
            Some(budget) => budget,
            None => level.powi(2) * sample_level(rng) - rng.gen_range(-5.0..=13.0),
        };
        let loot_budget = match self.loot_budget {
            Some(budget) => budget,
            None => {
                let squared = level.powi(2);
                sample_level(rng) * (area / 500.0) * (squared - zero_to_range(rng, squared))
            }
        };
        let biome = self.biome.unwrap_or_default();
        let enemy_distribution = match self.enemy_distribution {
            Some(distribution) => distribution,
            None => rng.gen_range(0.5..=2.0),
        };
        let loot_distribution = match self.loot_distribution {
            Some(distribution) => distribution,
            None => rng.gen_range(0.5..=2.0),
        };
        let position = self.position.unwrap_or_default();
        let exits = match &self.exits {
            Some(exits) => exits.clone(),
            None => doors
                .open_directions()
                .into_iter()
                .filter(|d| Some(*d) != self.entrance)
                .collect(),
        };

        let mut room = Room::new(level as u32, size, position, doors, biome);
        room.entrance = self.entrance;
        room.exits = exits;
        let rect = room.rect();

        let mut loot = generate_loot(rng, config, level, loot_budget, loot_distribution)?;
        let chests = self.pack_chests(config, rng, &mut loot, loot_budget);
        room.items = loot
            .into_iter()
            .chain(chests.into_iter().map(Item::Chest))
            .map(|item| Placed::new(rect.random_cell(rng), item))
            .collect();

        let mut enemies = generate_enemies(rng, config, level, enemy_budget, enemy_distribution)?;
        enemies.sort_by(Creature::compare_power_desc);
        room.enemies = enemies
            .into_iter()
            .map(|enemy| Placed::new(rect.random_cell(rng), enemy))
            .collect();

        debug!(
            "Generated level {} room {}x{} with {} items worth {} and {} enemies",
            room.level,
            size.width,
            size.height,
            room.items.len(),
            room.total_loot_value(),
            room.enemies.len()
        );
        Ok(room)
    }

    fn validate(&self, room: &Room, _config: &GenerationConfig) -> DelveResult<()> {
        if !room.placements_in_bounds() {
            return Err(DelveError::GenerationFailed(
                "room contents lie outside the room".to_string(),
            ));
        }
        let empty_chest = room
            .chests()
            .any(|chest| chest.inventory().is_some_and(<[Item]>::is_empty));
        if empty_chest {
            return Err(DelveError::GenerationFailed(
                "room holds an empty chest".to_string(),
            ));
        }
        if let Some(entrance) = room.entrance {
            if !room.doors.is_open(entrance) || room.exits.contains(&entrance) {
                return Err(DelveError::GenerationFailed(format!(
                    "entrance {entrance} is closed or listed as an exit"
                )));
            }
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomGenerator"
    }
}

/// Grows a chain of non-overlapping rooms out of a seed room.
///
/// This generator creates maps by:
/// 1. Placing a seed room at the origin with a single north exit
/// 2. Attaching each new room flush against an exit of the last room
/// 3. Rolling back recent rooms when a slot cannot be filled
/// 4. Populating every room with loot and enemies once the layout is fixed
#[derive(Debug, Clone, PartialEq)]
pub struct MapGenerator {
    /// Rooms wanted, seed room included
    pub room_count: usize,
    pub connectivity: Option<f64>,
    pub biome: Option<Biome>,
    pub start_level: Option<u32>,
    pub level_step: Option<u32>,
}

impl MapGenerator {
    /// Creates a map generator for `room_count` rooms.
    ///
    /// # Examples
    ///
    /// ```
    /// use delvegen::{create_rng, GenerationConfig, Generator, MapGenerator};
    ///
    /// let config = GenerationConfig::for_testing(3);
    /// let map = MapGenerator::new(4).generate(&config, &mut create_rng(3)).unwrap();
    /// assert!(map.room_count() <= 4);
    /// assert!(map.check_integrity().is_ok());
    /// ```
    pub fn new(room_count: usize) -> Self {
        Self {
            room_count,
            connectivity: None,
            biome: None,
            start_level: None,
            level_step: None,
        }
    }

    pub fn with_connectivity(mut self, connectivity: f64) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    pub fn with_biome(mut self, biome: Biome) -> Self {
        self.biome = Some(biome);
        self
    }

    pub fn with_start_level(mut self, level: u32) -> Self {
        self.start_level = Some(level);
        self
    }

    pub fn with_level_step(mut self, step: u32) -> Self {
        self.level_step = Some(step);
        self
    }

    fn seed_room(&self, config: &GenerationConfig, rng: &mut StdRng, level: u32, biome: Biome) -> Room {
        let size = Size::random(rng, config.min_room_size, config.seed_room_max_size);
        let mut doors = Doors::closed();
        doors.set(Direction::North, true);
        let mut room = Room::new(level, size, Position::origin(), doors, biome);
        room.exits = vec![Direction::North];
        room
    }

    /// Tries to attach one more room to the last room of `layout`.
    fn try_place_room(
        &self,
        layout: &[Room],
        config: &GenerationConfig,
        rng: &mut StdRng,
        connectivity: f64,
        level_step: u32,
    ) -> Option<Room> {
        let anchor = layout.last()?;
        if anchor.exits.is_empty() {
            return None;
        }
        let anchor_rect = anchor.rect();
        let level = anchor.level + level_step;

        for _ in 0..config.placement_attempts {
            let exit = *pick(rng, &anchor.exits);
            let entrance = exit.opposite();

            let mut doors = Doors::random(rng, connectivity);
            doors.set(entrance, true);
            let exits: Vec<Direction> = doors
                .open_directions()
                .into_iter()
                .filter(|d| *d != entrance)
                .collect();
            if exits.is_empty() {
                continue;
            }

            let size = Size::random(rng, config.min_room_size, config.max_room_size);
            let position = adjacent_position(rng, &anchor_rect, size, exit);
            let rect = Rect::new(position, size);

            // Check for overlap with every placed room
            if layout.iter().any(|existing| existing.rect().overlaps(&rect)) {
                continue;
            }

            let mut room = Room::new(level, size, position, doors, anchor.biome);
            room.entrance = Some(entrance);
            room.exits = exits;
            return Some(room);
        }

        None // Failed to place room after all attempts
    }

    /// Grows the unpopulated layout.
    fn place_rooms(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
        connectivity: f64,
        level_step: u32,
        seed: Room,
    ) -> Vec<Room> {
        let mut layout = vec![seed];
        let mut consecutive_failures = 0usize;
        let mut total_rollbacks = 0u32;

        while layout.len() < self.room_count {
            if let Some(room) = self.try_place_room(&layout, config, rng, connectivity, level_step) {
                debug!(
                    "Placed room {} at ({}, {})",
                    layout.len(),
                    room.position.x,
                    room.position.y
                );
                layout.push(room);
                consecutive_failures = 0;
                continue;
            }

            if total_rollbacks >= config.max_total_rollbacks {
                warn!(
                    "Rollback budget spent, stopping with {} of {} rooms",
                    layout.len(),
                    self.room_count
                );
                break;
            }
            consecutive_failures += 1;
            total_rollbacks += 1;

            // The seed room always stays
            let depth = consecutive_failures
                .min(config.max_rollback_steps)
                .min(layout.len() - 1);
            layout.truncate(layout.len() - depth);
            warn!(
                "Could not place room {}, rolled back {depth} rooms",
                layout.len() + depth
            );
        }
        layout
    }
}

/// Top-left corner for a room of `size` placed flush against `side` of `prev`.
///
/// The lateral offset is random but always leaves at least one cell of shared
/// edge.
fn adjacent_position(rng: &mut StdRng, prev: &Rect, size: Size, side: Direction) -> Position {
    let (min, max) = (prev.min(), prev.max());
    match side {
        Direction::North | Direction::South => {
            let x = rng.gen_range(min.x - size.width + 1..max.x);
            let y = if side == Direction::North {
                min.y - size.height
            } else {
                max.y
            };
            Position::new(x, y)
        }
        Direction::East | Direction::West => {
            let y = rng.gen_range(min.y - size.height + 1..max.y);
            let x = if side == Direction::West {
                min.x - size.width
            } else {
                max.x
            };
            Position::new(x, y)
        }
    }
}

impl Generator<Map> for MapGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Map> {
        config.validate()?;
        if self.room_count == 0 {
            return Err(DelveError::InvalidState(
                "a map needs at least one room".to_string(),
            ));
        }
        let connectivity = self.connectivity.unwrap_or(config.default_connectivity);
        if !(0.0..=1.0).contains(&connectivity) {
            return Err(DelveError::InvalidState(format!(
                "connectivity must lie in [0, 1], got {connectivity}"
            )));
        }
        let level_step = self.level_step.unwrap_or(config.level_step);
        let start_level = self.start_level.unwrap_or(1);
        let biome = self.biome.unwrap_or_default();

        info!(
            "Generating {biome} map of {} rooms from level {start_level}",
            self.room_count
        );
        let seed = self.seed_room(config, rng, start_level, biome);
        let mut rooms = self.place_rooms(config, rng, connectivity, level_step, seed);
        info!("Placed {} rooms, populating", rooms.len());

        let mut order: Vec<usize> = (0..rooms.len()).collect();
        order.sort_by_key(|&index| rooms[index].level);
        for index in order {
            let shell = &rooms[index];
            let mut generator = RoomGenerator::new()
                .with_doors(shell.doors)
                .with_size(shell.size)
                .with_level(f64::from(shell.level))
                .with_biome(shell.biome)
                .with_position(shell.position)
                .with_exits(shell.exits.clone());
            generator.entrance = shell.entrance;
            rooms[index] = generator.generate(config, rng)?;
        }

        let map = Map::new(rooms, start_level, biome);
        info!(
            "Finished map with {} rooms, {} enemies",
            map.room_count(),
            map.rooms.iter().map(|room| room.enemies.len()).sum::<usize>()
        );
        Ok(map)
    }

    fn validate(&self, map: &Map, _config: &GenerationConfig) -> DelveResult<()> {
        if map.rooms.is_empty() || map.room_count() > self.room_count {
            return Err(DelveError::GenerationFailed(format!(
                "map has {} rooms, wanted at most {}",
                map.room_count(),
                self.room_count
            )));
        }
        map.check_integrity()
    }

    fn generator_type(&self) -> &'static str {
        "MapGenerator"
    }
}

impl Default for MapGenerator {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::is_flush_against;
    use crate::utils::create_rng;

    #[test]
    fn test_room_uses_fixed_inputs() {
        let config = GenerationConfig::for_testing(1);
        let mut doors = Doors::closed();
        doors.set(Direction::East, true);
        let generator = RoomGenerator::new()
            .with_doors(doors)
            .with_size(Size::new(6, 4))
            .with_level(30.0)
            .with_position(Position::new(-3, 7))
            .with_entrance(Direction::West);
        let room = generator.generate(&config, &mut create_rng(1)).unwrap();

        assert_eq!(room.level, 30);
        assert_eq!(room.size, Size::new(6, 4));
        assert_eq!(room.position, Position::new(-3, 7));
        assert!(room.doors.is_open(Direction::West));
        assert_eq!(room.exits, vec![Direction::East]);
        assert!(room.placements_in_bounds());
        assert!(generator.validate(&room, &config).is_ok());
    }

    #[test]
    fn test_room_orderings() {
        let config = GenerationConfig::for_testing(2);
        let mut rng = create_rng(2);
        for _ in 0..5 {
            let room = RoomGenerator::new()
                .with_level(25.0)
                .with_loot_budget(3000.0)
                .with_enemy_budget(4000.0)
                .generate(&config, &mut rng)
                .unwrap();
            let powers: Vec<u32> = room.enemies.iter().map(|e| e.entity.power_level()).collect();
            assert!(powers.windows(2).all(|w| w[0] >= w[1]));

            // Chests come after every loose item
            let first_chest = room
                .items
                .iter()
                .position(|i| matches!(i.entity, Item::Chest(_)))
                .unwrap_or(room.items.len());
            assert!(room.items[first_chest..]
                .iter()
                .all(|i| matches!(i.entity, Item::Chest(_))));
            assert!(room.total_loot_value() <= 3000);
        }
    }

    #[test]
    fn test_pack_chests_by_count() {
        let config = GenerationConfig::for_testing(5);
        let mut rng = create_rng(5);
        let mut loot = generate_loot(&mut rng, &config, 30.0, 2000.0, 0.5).unwrap();
        let before = loot.len();
        let total_before: u32 = loot.iter().map(|i| i.total_value()).sum();

        let chests = RoomGenerator::new().pack_chests(&config, &mut rng, &mut loot, 2000.0);
        assert!(chests.len() <= config.max_chests);
        assert!(chests.iter().all(|c| !c.inventory.is_empty()));
        for chest in &chests {
            let values: Vec<u32> = chest.inventory.iter().map(|i| i.total_value()).collect();
            assert!(values.windows(2).all(|w| w[0] >= w[1]));
        }

        let packed: usize = chests.iter().map(|c| c.inventory.len()).sum();
        assert_eq!(packed + loot.len(), before);
        let total_after: u32 = loot.iter().map(|i| i.total_value()).sum::<u32>()
            + chests.iter().map(|c| c.total_value()).sum::<u32>();
        assert_eq!(total_after, total_before);
    }

    #[test]
    fn test_adjacent_position_touches() {
        let mut rng = create_rng(8);
        let prev = Rect::new(Position::new(0, 0), Size::new(5, 3));
        for side in Direction::ALL.iter().copied() {
            for _ in 0..50 {
                let size = Size::random(&mut rng, 1, 9);
                let next = Rect::new(adjacent_position(&mut rng, &prev, size, side), size);
                assert!(!prev.overlaps(&next));
                assert!(is_flush_against(&prev, &next, side), "{side} {next:?}");
            }
        }
    }

    #[test]
    fn test_map_layout_invariants() {
        let config = GenerationConfig::for_testing(11);
        let generator = MapGenerator::new(8);
        let map = generator.generate(&config, &mut create_rng(11)).unwrap();

        assert!(map.room_count() >= 1 && map.room_count() <= 8);
        assert!(generator.validate(&map, &config).is_ok());
        assert_eq!(map.rooms[0].position, Position::origin());
        assert_eq!(map.rooms[0].level, 1);
        for pair in map.rooms.windows(2) {
            assert_eq!(pair[1].level, pair[0].level + 2);
        }
    }

    #[test]
    fn test_map_rejects_bad_inputs() {
        let config = GenerationConfig::for_testing(1);
        let mut rng = create_rng(1);
        assert!(MapGenerator::new(0).generate(&config, &mut rng).is_err());
        assert!(MapGenerator::new(3)
            .with_connectivity(1.5)
            .generate(&config, &mut rng)
            .is_err());
    }

    #[test]
    fn test_closed_map_stops_at_seed_room() {
        let mut config = GenerationConfig::for_testing(4);
        config.placement_attempts = 5;
        config.max_total_rollbacks = 3;
        let map = MapGenerator::new(5)
            .with_connectivity(0.0)
            .generate(&config, &mut create_rng(4))
            .unwrap();
        // Every candidate is a dead end, so nothing attaches to the seed room
        assert_eq!(map.room_count(), 1);
        assert_eq!(map.rooms[0].exits, vec![Direction::North]);
        assert!(map.check_integrity().is_ok());
    }
}

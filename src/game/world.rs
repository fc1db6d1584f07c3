//! # World Layout
//!
//! Rooms, the entities placed inside them, and maps of connected rooms.

use super::creatures::Creature;
use super::items::{named_from_str, Item, ItemProperties};
use super::{Direction, Doors, Named, Position, Rect, Size};
use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment theme of a room or map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    #[default]
    Dungeon,
}

impl Biome {
    /// Words that describe the feel of the biome.
    pub fn adjectives(&self) -> &'static [&'static str] {
        match self {
            Biome::Dungeon => &["cold", "dark", "stone", "wet", "mossy", "moldy"],
        }
    }
}

impl Named for Biome {
    const ALL: &'static [Self] = &[Biome::Dungeon];
    const KIND: &'static str = "biome";

    fn name(&self) -> &'static str {
        match self {
            Biome::Dungeon => "dungeon",
        }
    }
}

named_from_str!(Biome);

/// An entity with an absolute position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placed<T> {
    pub position: Position,
    pub entity: T,
}

impl<T> Placed<T> {
    pub fn new(position: Position, entity: T) -> Self {
        Self { position, entity }
    }
}

/// A rectangular room with its doors, loot and enemies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub level: u32,
    pub size: Size,
    /// Absolute position of the top-left cell
    pub position: Position,
    pub doors: Doors,
    pub biome: Biome,
    /// Side the room was entered from, `None` for a seed room
    pub entrance: Option<Direction>,
    pub exits: Vec<Direction>,
    /// Loose items and chests, chests last
    pub items: Vec<Placed<Item>>,
    /// Enemies, strongest first
    pub enemies: Vec<Placed<Creature>>,
}

impl Room {
    /// Creates an empty room shell.
    pub fn new(level: u32, size: Size, position: Position, doors: Doors, biome: Biome) -> Self {
        Self {
            level,
            size,
            position,
            doors,
            biome,
            entrance: None,
            exits: Vec::new(),
            items: Vec::new(),
            enemies: Vec::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.rect().contains(pos)
    }

    pub fn area(&self) -> i32 {
        self.size.area()
    }

    pub fn total_enemy_power(&self) -> u32 {
        self.enemies.iter().map(|e| e.entity.power_level()).sum()
    }

    /// Value of everything in the room, chest contents included.
    pub fn total_loot_value(&self) -> u32 {
        self.items.iter().map(|i| i.entity.total_value()).sum()
    }

    pub fn loose_items(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .map(|placed| &placed.entity)
            .filter(|item| !matches!(item, Item::Chest(_)))
    }

    pub fn chests(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .map(|placed| &placed.entity)
            .filter(|item| matches!(item, Item::Chest(_)))
    }

    /// Every item and enemy lies inside the room bounds.
    pub fn placements_in_bounds(&self) -> bool {
        let rect = self.rect();
        self.items.iter().all(|i| rect.contains(i.position))
            && self.enemies.iter().all(|e| rect.contains(e.position))
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "---------------";

        writeln!(f, "Room level: {}", self.level)?;
        writeln!(
            f,
            "Size: {}x{} at ({}, {}) in the {}",
            self.size.width, self.size.height, self.position.x, self.position.y, self.biome
        )?;
        let open: Vec<&str> = self.doors.open_directions().iter().map(|d| d.name()).collect();
        writeln!(f, "Open doors: {}", if open.is_empty() { "none".to_string() } else { open.join(", ") })?;
        writeln!(f, "Number of items: {}", self.items.len())?;
        writeln!(f, "{RULE}")?;
        for item in self.loose_items() {
            writeln!(f, "Value {} -- {}", item.total_value(), item)?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(f, "Chests:")?;
        for chest in self.chests() {
            writeln!(f, "{chest}")?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(f, "Total enemy power: {}", self.total_enemy_power())?;
        writeln!(f, "Enemies:")?;
        write!(f, "{RULE}")?;
        for enemy in &self.enemies {
            let creature = &enemy.entity;
            write!(
                f,
                "\nPower level {} -- Level {} {}",
                creature.power_level(),
                creature.level,
                creature.title()
            )?;
        }
        Ok(())
    }
}

/// Whether two rooms' rectangles overlap. Touching edges do not count.
///
/// # Examples
///
/// ```
/// use delvegen::{check_collision, Biome, Doors, Position, Room, Size};
///
/// let a = Room::new(1, Size::new(15, 5), Position::new(-10, 10), Doors::closed(), Biome::Dungeon);
/// let b = Room::new(1, Size::new(15, 5), Position::new(-11, 14), Doors::closed(), Biome::Dungeon);
/// let c = Room::new(1, Size::new(15, 5), Position::new(-11, 15), Doors::closed(), Biome::Dungeon);
/// assert!(check_collision(&a, &b));
/// assert!(!check_collision(&a, &c));
/// ```
pub fn check_collision(a: &Room, b: &Room) -> bool {
    a.rect().overlaps(&b.rect())
}

/// An ordered chain of rooms grown from a seed room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub rooms: Vec<Room>,
    /// Level of the seed room
    pub level: u32,
    pub biome: Biome,
}

impl Map {
    pub fn new(rooms: Vec<Room>, level: u32, biome: Biome) -> Self {
        Self { rooms, level, biome }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Smallest rectangle covering every room.
    pub fn bounds(&self) -> Option<Rect> {
        let first = self.rooms.first()?.rect();
        let (mut min, mut max) = (first.min(), first.max());
        for rect in self.rooms.iter().map(Room::rect) {
            min = Position::new(min.x.min(rect.min().x), min.y.min(rect.min().y));
            max = Position::new(max.x.max(rect.max().x), max.y.max(rect.max().y));
        }
        Some(Rect::new(min, Size::new(max.x - min.x, max.y - min.y)))
    }

    /// Checks the layout invariants.
    ///
    /// No two rooms overlap, and every room after the first sits flush against
    /// its predecessor on the side of an open exit, entered through an open door.
    pub fn check_integrity(&self) -> DelveResult<()> {
        for (i, a) in self.rooms.iter().enumerate() {
            for (j, b) in self.rooms.iter().enumerate().skip(i + 1) {
                if check_collision(a, b) {
                    return Err(DelveError::GenerationFailed(format!(
                        "rooms {i} and {j} overlap"
                    )));
                }
            }
        }

        for (i, pair) in self.rooms.windows(2).enumerate() {
            let (prev, room) = (&pair[0], &pair[1]);
            let index = i + 1;
            let entrance = room.entrance.ok_or_else(|| {
                DelveError::GenerationFailed(format!("room {index} has no entrance"))
            })?;
            let exit = entrance.opposite();

            if !room.doors.is_open(entrance) {
                return Err(DelveError::GenerationFailed(format!(
                    "room {index} entrance door {entrance} is closed"
                )));
            }
            if !prev.exits.contains(&exit) || !prev.doors.is_open(exit) {
                return Err(DelveError::GenerationFailed(format!(
                    "room {} has no open {exit} exit into room {index}",
                    index - 1
                )));
            }
            if !is_flush_against(&prev.rect(), &room.rect(), exit) {
                return Err(DelveError::GenerationFailed(format!(
                    "room {index} is not adjacent to room {} along {exit}",
                    index - 1
                )));
            }
        }
        Ok(())
    }

    /// Text preview of the layout, one character per cell.
    ///
    /// Each room is filled with its own glyph, cycling through digits and
    /// letters. Empty space is a blank.
    pub fn to_ascii(&self) -> String {
        const GLYPHS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

        let Some(bounds) = self.bounds() else {
            return String::new();
        };
        let width = bounds.size.width as usize;
        let height = bounds.size.height as usize;
        let mut grid = vec![vec![b' '; width]; height];

        for (index, room) in self.rooms.iter().enumerate() {
            let glyph = GLYPHS[index % GLYPHS.len()];
            let rect = room.rect();
            for y in rect.min().y..rect.max().y {
                for x in rect.min().x..rect.max().x {
                    let row = (y - bounds.min().y) as usize;
                    let col = (x - bounds.min().x) as usize;
                    grid[row][col] = glyph;
                }
            }
        }

        grid.into_iter()
            .map(|row| String::from_utf8_lossy(&row).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Whether `next` touches `prev` on the `side` face with at least one shared cell of edge.
pub fn is_flush_against(prev: &Rect, next: &Rect, side: Direction) -> bool {
    let touching = match side {
        Direction::North => next.max().y == prev.min().y,
        Direction::South => next.min().y == prev.max().y,
        Direction::East => next.min().x == prev.max().x,
        Direction::West => next.max().x == prev.min().x,
    };
    touching && prev.shares_edge_with(next)
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} map of {} rooms starting at level {}",
            self.biome,
            self.room_count(),
            self.level
        )?;
        for (index, room) in self.rooms.iter().enumerate() {
            write!(
                f,
                "\n{index}: level {} {}x{} at ({}, {}), {} items, {} enemies",
                room.level,
                room.size.width,
                room.size.height,
                room.position.x,
                room.position.y,
                room.items.len(),
                room.enemies.len()
            )?;
        }
        Ok(())
    }
}

//! # Game Module
//!
//! The value types that generators produce and callers persist:
//! - Geometry (positions, sizes, rectangles, compass directions, doors)
//! - Items (weapons, armour, chests)
//! - Creatures (players and enemy humanoids)
//! - World structure (rooms and maps)
//! - Save snapshots

pub mod creatures;
pub mod items;
pub mod state;
pub mod world;

pub use creatures::*;
pub use items::*;
pub use state::*;
pub use world::*;

use crate::{DelveError, DelveResult};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An enumerated set whose variants have stable human-readable names.
///
/// Names are what callers type and what flavor text prints, so parsing is
/// forgiving about case and word separators.
pub trait Named: Sized + Copy + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];
    /// Label used in error messages.
    const KIND: &'static str;

    /// Display name of this variant.
    fn name(&self) -> &'static str;

    /// Parses a variant by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use delvegen::{Named, WeaponType};
    ///
    /// assert_eq!(WeaponType::parse("Wizard_Staff").unwrap(), WeaponType::WizardStaff);
    /// assert!(WeaponType::parse("banana").is_err());
    /// ```
    fn parse(value: &str) -> DelveResult<Self> {
        let wanted = normalize_name(value);
        Self::ALL
            .iter()
            .copied()
            .find(|variant| normalize_name(variant.name()) == wanted)
            .ok_or_else(|| DelveError::invalid_enum(Self::KIND, value))
    }
}

fn normalize_name(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '_' | '-' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Represents a 2D coordinate in the game world.
///
/// North is towards negative `y`.
///
/// # Examples
///
/// ```
/// use delvegen::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Width and height of a rectangular area, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Creates a new size.
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Rolls a random size with both sides in `[min, max]`.
    pub fn random(rng: &mut StdRng, min: i32, max: i32) -> Self {
        let (low, high) = (min.min(max), min.max(max));
        Self::new(rng.gen_range(low..=high), rng.gen_range(low..=high))
    }

    /// Number of cells covered.
    pub fn area(&self) -> i32 {
        self.width * self.height
    }
}

/// Axis-aligned rectangle covering the half-open cell range
/// `[position, position + size)` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub position: Position,
    pub size: Size,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    /// Inclusive top-left corner.
    pub fn min(&self) -> Position {
        self.position
    }

    /// Exclusive bottom-right corner.
    pub fn max(&self) -> Position {
        Position::new(
            self.position.x + self.size.width,
            self.position.y + self.size.height,
        )
    }

    /// Half-open overlap test. Rectangles that only share an edge do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use delvegen::{Position, Rect, Size};
    ///
    /// let a = Rect::new(Position::new(-10, 10), Size::new(15, 5));
    /// let b = Rect::new(Position::new(-11, 14), Size::new(15, 5));
    /// let c = Rect::new(Position::new(-11, 15), Size::new(15, 5));
    /// assert!(a.overlaps(&b));
    /// assert!(!a.overlaps(&c));
    /// ```
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    /// Checks if a position lies inside the rectangle.
    pub fn contains(&self, pos: Position) -> bool {
        let max = self.max();
        pos.x >= self.position.x && pos.y >= self.position.y && pos.x < max.x && pos.y < max.y
    }

    /// True when the rectangles share a stretch of edge (at least one cell long)
    /// without overlapping.
    pub fn shares_edge_with(&self, other: &Rect) -> bool {
        if self.overlaps(other) {
            return false;
        }
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        let x_span = a_min.x < b_max.x && a_max.x > b_min.x;
        let y_span = a_min.y < b_max.y && a_max.y > b_min.y;
        let touch_y = a_max.y == b_min.y || b_max.y == a_min.y;
        let touch_x = a_max.x == b_min.x || b_max.x == a_min.x;
        (x_span && touch_y) || (y_span && touch_x)
    }

    /// Uniformly random cell inside the rectangle.
    pub fn random_cell(&self, rng: &mut StdRng) -> Position {
        let max = self.max();
        Position::new(
            rng.gen_range(self.position.x..max.x.max(self.position.x + 1)),
            rng.gen_range(self.position.y..max.y.max(self.position.y + 1)),
        )
    }
}

/// Compass directions used for doors, entrances and exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Returns the direction pointing the other way.
    ///
    /// # Examples
    ///
    /// ```
    /// use delvegen::Direction;
    ///
    /// assert_eq!(Direction::North.opposite(), Direction::South);
    /// assert_eq!(Direction::East.opposite(), Direction::West);
    /// ```
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Converts a direction to a unit position delta.
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }
}

impl Named for Direction {
    const ALL: &'static [Self] = &[
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];
    const KIND: &'static str = "direction";

    fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Direction {
    type Err = DelveError;

    fn from_str(s: &str) -> DelveResult<Self> {
        Self::parse(s)
    }
}

/// Open/closed flag for the door on each side of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Doors {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Doors {
    /// All doors closed.
    pub fn closed() -> Self {
        Self::default()
    }

    /// Opens each door independently with the given probability.
    pub fn random(rng: &mut StdRng, open_chance: f64) -> Self {
        let chance = open_chance.clamp(0.0, 1.0);
        Self {
            north: rng.gen_bool(chance),
            south: rng.gen_bool(chance),
            east: rng.gen_bool(chance),
            west: rng.gen_bool(chance),
        }
    }

    /// Whether the door in `direction` is open.
    pub fn is_open(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    /// Opens or closes the door in `direction`.
    pub fn set(&mut self, direction: Direction, open: bool) {
        match direction {
            Direction::North => self.north = open,
            Direction::South => self.south = open,
            Direction::East => self.east = open,
            Direction::West => self.west = open,
        }
    }

    /// Open directions in compass order.
    pub fn open_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .iter()
            .copied()
            .filter(|d| self.is_open(*d))
            .collect()
    }
}

//! # Creatures
//!
//! Humanoid players and enemies share one record: a common stat core, weapon
//! and armour slots, and an inventory. What differs between them lives in the
//! [`CreatureKind`] payload.

use super::items::{named_from_str, Armour, ArmourType, Item, ItemProperties, Weapon};
use super::Named;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Enemy races.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyType {
    Goblin,
    Ork,
    Outlaw,
    Skeleton,
    Undead,
    BatPerson,
}

impl Named for EnemyType {
    const ALL: &'static [Self] = &[
        EnemyType::Goblin,
        EnemyType::Ork,
        EnemyType::Outlaw,
        EnemyType::Skeleton,
        EnemyType::Undead,
        EnemyType::BatPerson,
    ];
    const KIND: &'static str = "enemy type";

    fn name(&self) -> &'static str {
        match self {
            EnemyType::Goblin => "goblin",
            EnemyType::Ork => "ork",
            EnemyType::Outlaw => "outlaw",
            EnemyType::Skeleton => "skeleton",
            EnemyType::Undead => "undead",
            EnemyType::BatPerson => "bat person",
        }
    }
}

named_from_str!(EnemyType);

/// Fighting style shared by enemy classes and player classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatClass {
    Assassin,
    Archer,
    Knight,
    Samurai,
    Thug,
    Mage,
    Brawler,
    Viking,
}

impl Named for CombatClass {
    const ALL: &'static [Self] = &[
        CombatClass::Assassin,
        CombatClass::Archer,
        CombatClass::Knight,
        CombatClass::Samurai,
        CombatClass::Thug,
        CombatClass::Mage,
        CombatClass::Brawler,
        CombatClass::Viking,
    ];
    const KIND: &'static str = "class";

    fn name(&self) -> &'static str {
        match self {
            CombatClass::Assassin => "assassin",
            CombatClass::Archer => "archer",
            CombatClass::Knight => "knight",
            CombatClass::Samurai => "samurai",
            CombatClass::Thug => "thug",
            CombatClass::Mage => "mage",
            CombatClass::Brawler => "brawler",
            CombatClass::Viking => "viking",
        }
    }
}

named_from_str!(CombatClass);

/// Which hand holds a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn other(self) -> Hand {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }
}

/// Physical attributes common to every humanoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatureStats {
    pub hp: i32,
    pub max_hp: i32,
    pub height: f64,
    pub weight: f64,
    pub arm_length: f64,
    pub carry_capacity: u32,
    pub speed: f64,
    pub ap: u32,
    pub max_ap: u32,
}

/// Two hands, each holding at most one weapon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeaponSlots {
    pub left_hand: Option<Weapon>,
    pub right_hand: Option<Weapon>,
}

impl WeaponSlots {
    pub fn get(&self, hand: Hand) -> Option<&Weapon> {
        match hand {
            Hand::Left => self.left_hand.as_ref(),
            Hand::Right => self.right_hand.as_ref(),
        }
    }

    fn slot_mut(&mut self, hand: Hand) -> &mut Option<Weapon> {
        match hand {
            Hand::Left => &mut self.left_hand,
            Hand::Right => &mut self.right_hand,
        }
    }

    /// Equipped weapons, right hand first.
    pub fn iter(&self) -> impl Iterator<Item = &Weapon> {
        self.right_hand.iter().chain(self.left_hand.iter())
    }
}

/// One optional armour piece per body slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArmourSlots {
    pub helmet: Option<Armour>,
    pub chestpiece: Option<Armour>,
    pub arm_guards: Option<Armour>,
    pub gloves: Option<Armour>,
    pub leggings: Option<Armour>,
}

impl ArmourSlots {
    pub fn get(&self, slot: ArmourType) -> Option<&Armour> {
        match slot {
            ArmourType::Helmet => self.helmet.as_ref(),
            ArmourType::Chestpiece => self.chestpiece.as_ref(),
            ArmourType::ArmGuards => self.arm_guards.as_ref(),
            ArmourType::Gloves => self.gloves.as_ref(),
            ArmourType::Leggings => self.leggings.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: ArmourType) -> &mut Option<Armour> {
        match slot {
            ArmourType::Helmet => &mut self.helmet,
            ArmourType::Chestpiece => &mut self.chestpiece,
            ArmourType::ArmGuards => &mut self.arm_guards,
            ArmourType::Gloves => &mut self.gloves,
            ArmourType::Leggings => &mut self.leggings,
        }
    }

    /// Worn pieces in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Armour> {
        ArmourType::ALL.iter().filter_map(move |slot| self.get(*slot))
    }

    pub fn worn_count(&self) -> usize {
        self.iter().count()
    }
}

/// Player-only attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_class: CombatClass,
    pub skills: Vec<String>,
}

/// Enemy-only attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub enemy_type: EnemyType,
    pub enemy_class: CombatClass,
    pub skill: u32,
    pub aggression: u32,
    pub courage: u32,
}

/// What sort of humanoid a [`Creature`] is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreatureKind {
    Player(PlayerProfile),
    Enemy(EnemyProfile),
}

/// A living humanoid, player or enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    /// Displayed level, generator level times ten
    pub level: u32,
    pub stats: CreatureStats,
    pub weapon_slots: WeaponSlots,
    pub armour_slots: ArmourSlots,
    pub inventory: Vec<Item>,
    pub kind: CreatureKind,
}

impl Creature {
    pub fn new(name: impl Into<String>, level: u32, stats: CreatureStats, kind: CreatureKind) -> Self {
        Self {
            name: name.into(),
            level,
            stats,
            weapon_slots: WeaponSlots::default(),
            armour_slots: ArmourSlots::default(),
            inventory: Vec::new(),
            kind,
        }
    }

    pub fn enemy_profile(&self) -> Option<&EnemyProfile> {
        match &self.kind {
            CreatureKind::Enemy(profile) => Some(profile),
            CreatureKind::Player(_) => None,
        }
    }

    pub fn player_profile(&self) -> Option<&PlayerProfile> {
        match &self.kind {
            CreatureKind::Player(profile) => Some(profile),
            CreatureKind::Enemy(_) => None,
        }
    }

    /// Full title, e.g. "goblin knight Grakah".
    pub fn title(&self) -> String {
        match &self.kind {
            CreatureKind::Enemy(profile) => format!(
                "{} {} {}",
                profile.enemy_type, profile.enemy_class, self.name
            ),
            CreatureKind::Player(profile) => format!("{} {}", profile.player_class, self.name),
        }
    }

    pub fn inventory_value(&self) -> u32 {
        self.inventory.iter().map(|item| item.total_value()).sum()
    }

    pub fn inventory_weight(&self) -> f64 {
        self.inventory.iter().map(|item| item.weight()).sum()
    }

    pub fn combined_armour_value(&self) -> u32 {
        self.armour_slots.iter().map(|piece| piece.total_value()).sum()
    }

    pub fn combined_weapon_value(&self) -> u32 {
        self.weapon_slots.iter().map(|weapon| weapon.total_value()).sum()
    }

    /// Weighted strength estimate used to fill enemy budgets.
    ///
    /// `hp + level + inventory + armour + weapons + max_ap + arm_length + 2 * speed`,
    /// truncated.
    pub fn power_level(&self) -> u32 {
        let power = self.stats.hp as f64
            + self.level as f64
            + self.inventory_value() as f64
            + self.combined_armour_value() as f64
            + self.combined_weapon_value() as f64
            + self.stats.max_ap as f64
            + self.stats.arm_length
            + self.stats.speed * 2.0;
        power.max(0.0) as u32
    }

    /// Sort key for descending-power ordering.
    pub fn compare_power_desc(a: &Creature, b: &Creature) -> std::cmp::Ordering {
        b.power_level().cmp(&a.power_level())
    }

    /// Stores an item if it fits within the remaining carry capacity.
    ///
    /// An item that does not fit is handed back unchanged.
    pub fn add_to_inventory(&mut self, item: Item) -> Result<(), Item> {
        let free = self.stats.carry_capacity as f64 - self.inventory_weight();
        if item.weight() <= free {
            self.inventory.push(item);
            Ok(())
        } else {
            debug!("{} cannot hold {}", self.name, item.name());
            Err(item)
        }
    }

    /// Puts a piece in its slot, returning whatever was worn there before.
    pub fn equip_armour(&mut self, armour: Armour) -> Option<Armour> {
        self.armour_slots.slot_mut(armour.armour_type).replace(armour)
    }

    /// Wears every piece of a set.
    pub fn equip_armour_set(&mut self, set: Vec<Armour>) {
        for piece in set {
            self.equip_armour(piece);
        }
    }

    /// Puts a weapon in a hand, returning whatever was held there before.
    pub fn equip_weapon(&mut self, hand: Hand, weapon: Weapon) -> Option<Weapon> {
        self.weapon_slots.slot_mut(hand).replace(weapon)
    }

    /// Reduces hp and returns what is left. Hp may go negative.
    pub fn take_damage(&mut self, amount: u32) -> i32 {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.stats.hp = self.stats.hp.saturating_sub(amount);
        self.stats.hp
    }

    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    fn fmt_weapons(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.weapon_slots.right_hand, &self.weapon_slots.left_hand) {
            (Some(right), Some(left)) => {
                writeln!(f, "Dual wielding {}s:", right.weapon_type)?;
                writeln!(f, "{}", right.name)?;
                writeln!(f, "{}", left.name)
            }
            (Some(weapon), None) => fmt_wielding(f, weapon, Hand::Right),
            (None, Some(weapon)) => fmt_wielding(f, weapon, Hand::Left),
            (None, None) => writeln!(f, "Unarmed"),
        }
    }
}

fn fmt_wielding(f: &mut fmt::Formatter<'_>, weapon: &Weapon, hand: Hand) -> fmt::Result {
    let article = match weapon.name.chars().next() {
        Some(c) if "aeiouAEIOU".contains(c) => "an",
        _ => "a",
    };
    write!(f, "Wielding {} {}", article, weapon.name)?;
    if weapon.stats.one_handed {
        write!(f, " in their {} hand", hand.name())?;
    }
    writeln!(f)
}

impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Level {} {}", self.level, self.title())?;
        self.fmt_weapons(f)?;

        writeln!(f, "\nWearing:")?;
        for piece in self.armour_slots.iter() {
            writeln!(f, "Level {} {},", piece.level(), piece.name)?;
        }
        writeln!(f)?;

        let stats = &self.stats;
        writeln!(f, "hp -- {}/{}", stats.hp, stats.max_hp)?;
        writeln!(f, "ap -- {}/{}", stats.ap, stats.max_ap)?;
        writeln!(f, "speed -- {}", stats.speed)?;
        writeln!(f, "height -- {}", stats.height)?;
        writeln!(f, "weight -- {}", stats.weight)?;
        writeln!(f, "arm_length -- {}", stats.arm_length)?;
        writeln!(f, "carry_capacity -- {}", stats.carry_capacity)?;
        match &self.kind {
            CreatureKind::Enemy(profile) => {
                writeln!(f, "skill -- {}", profile.skill)?;
                writeln!(f, "aggression -- {}", profile.aggression)?;
                writeln!(f, "courage -- {}", profile.courage)?;
            }
            CreatureKind::Player(profile) if !profile.skills.is_empty() => {
                writeln!(f, "skills -- {}", profile.skills.join(", "))?;
            }
            CreatureKind::Player(_) => {}
        }
        write!(f, "power -- {}", self.power_level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::items::{
        ArmourMaterial, ArmourStats, DamageStats, Multipliers, Resistances, WeaponStats, WeaponType,
    };

    fn stats() -> CreatureStats {
        CreatureStats {
            hp: 100,
            max_hp: 100,
            height: 1.7,
            weight: 135.0,
            arm_length: 0.6,
            carry_capacity: 10,
            speed: 0.2,
            ap: 90,
            max_ap: 90,
        }
    }

    fn goblin() -> Creature {
        Creature::new(
            "Grakah",
            20,
            stats(),
            CreatureKind::Enemy(EnemyProfile {
                enemy_type: EnemyType::Goblin,
                enemy_class: CombatClass::Knight,
                skill: 22,
                aggression: 58,
                courage: 60,
            }),
        )
    }

    fn dagger(weight: f64) -> Weapon {
        Weapon {
            name: "dagger".to_string(),
            weapon_type: WeaponType::Dagger,
            rarity: 2.0,
            stats: WeaponStats {
                ap: 10,
                range: 0.3,
                weight,
                one_handed: true,
                damage: DamageStats {
                    puncture: 50,
                    ..DamageStats::default()
                },
            },
        }
    }

    fn helmet() -> Armour {
        Armour {
            name: "iron helmet".to_string(),
            armour_type: ArmourType::Helmet,
            material: ArmourMaterial::Iron,
            rarity: 1.0,
            stats: ArmourStats {
                ap: 10,
                weight: 5.0,
                resistances: Resistances {
                    general: 10,
                    ..Resistances::default()
                },
                multipliers: Multipliers::default(),
            },
        }
    }

    #[test]
    fn test_power_level_formula() {
        let mut creature = goblin();
        // 100 + 20 + 0 + 0 + 0 + 90 + 0.6 + 0.4
        assert_eq!(creature.power_level(), 211);

        creature.equip_weapon(Hand::Right, dagger(1.0));
        // dagger value: (50 / 10) * 2 * 4
        assert_eq!(creature.combined_weapon_value(), 40);
        creature.equip_armour(helmet());
        assert_eq!(creature.combined_armour_value(), 40);
        assert_eq!(creature.power_level(), 291);
    }

    #[test]
    fn test_inventory_respects_carry_capacity() {
        let mut creature = goblin();
        assert!(creature.add_to_inventory(Item::from(dagger(6.0))).is_ok());
        let rejected = creature.add_to_inventory(Item::from(dagger(5.0)));
        assert!(matches!(rejected, Err(Item::Weapon(_))));
        assert!(creature.add_to_inventory(Item::from(dagger(4.0))).is_ok());
        assert_eq!(creature.inventory.len(), 2);
        assert_eq!(creature.inventory_weight(), 10.0);
        assert_eq!(creature.inventory_value(), 80);
    }

    #[test]
    fn test_equip_replaces_slot() {
        let mut creature = goblin();
        assert!(creature.equip_armour(helmet()).is_none());
        assert!(creature.equip_armour(helmet()).is_some());
        assert_eq!(creature.armour_slots.worn_count(), 1);

        assert!(creature.equip_weapon(Hand::Left, dagger(1.0)).is_none());
        assert_eq!(creature.weapon_slots.iter().count(), 1);
        assert!(creature.weapon_slots.get(Hand::Left).is_some());
        assert!(creature.weapon_slots.get(Hand::Left.other()).is_none());
    }

    #[test]
    fn test_take_damage() {
        let mut creature = goblin();
        assert_eq!(creature.take_damage(40), 60);
        assert!(creature.is_alive());
        assert_eq!(creature.take_damage(80), -20);
        assert!(!creature.is_alive());
    }

    #[test]
    fn test_display_mentions_weapons_and_armour() {
        let mut creature = goblin();
        creature.equip_weapon(Hand::Right, dagger(1.0));
        creature.equip_armour(helmet());
        let text = creature.to_string();
        assert!(text.starts_with("Level 20 goblin knight Grakah"));
        assert!(text.contains("Wielding a dagger in their right hand"));
        assert!(text.contains("Level 10 iron helmet,"));

        creature.equip_weapon(Hand::Left, dagger(1.0));
        assert!(creature.to_string().contains("Dual wielding daggers:"));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Bat_Person".parse::<EnemyType>().unwrap(), EnemyType::BatPerson);
        assert_eq!("SAMURAI".parse::<CombatClass>().unwrap(), CombatClass::Samurai);
        assert!("dragon".parse::<EnemyType>().is_err());
    }
}

//! # Items
//!
//! Weapons, armour and chests as immutable value records.
//!
//! Aggregates such as total damage, protection and value are derived from the
//! stored stat blocks rather than stored themselves, so a deserialized item can
//! never disagree with its own stats.

use super::Named;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! named_from_str {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::game::Named::name(self))
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::DelveError;

            fn from_str(s: &str) -> $crate::DelveResult<Self> {
                <$ty as $crate::game::Named>::parse(s)
            }
        }
    };
}

pub(crate) use named_from_str;

/// Kinds of weapon the item generator knows how to forge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    Sword,
    Axe,
    Mace,
    Spear,
    Halberd,
    Rapier,
    Greatsword,
    Dagger,
    Caestus,
    Bow,
    Glaive,
    Katana,
    Nodachi,
    Quarterstaff,
    Wand,
    WizardStaff,
}

impl WeaponType {
    /// The everyday weapons any armed humanoid may carry.
    pub const COMMON: &'static [WeaponType] = &[
        WeaponType::Sword,
        WeaponType::Axe,
        WeaponType::Mace,
        WeaponType::Spear,
        WeaponType::Halberd,
        WeaponType::Rapier,
        WeaponType::Greatsword,
        WeaponType::Dagger,
        WeaponType::Caestus,
        WeaponType::Bow,
        WeaponType::Glaive,
    ];
}

impl Named for WeaponType {
    const ALL: &'static [Self] = &[
        WeaponType::Sword,
        WeaponType::Axe,
        WeaponType::Mace,
        WeaponType::Spear,
        WeaponType::Halberd,
        WeaponType::Rapier,
        WeaponType::Greatsword,
        WeaponType::Dagger,
        WeaponType::Caestus,
        WeaponType::Bow,
        WeaponType::Glaive,
        WeaponType::Katana,
        WeaponType::Nodachi,
        WeaponType::Quarterstaff,
        WeaponType::Wand,
        WeaponType::WizardStaff,
    ];
    const KIND: &'static str = "weapon type";

    fn name(&self) -> &'static str {
        match self {
            WeaponType::Sword => "sword",
            WeaponType::Axe => "axe",
            WeaponType::Mace => "mace",
            WeaponType::Spear => "spear",
            WeaponType::Halberd => "halberd",
            WeaponType::Rapier => "rapier",
            WeaponType::Greatsword => "greatsword",
            WeaponType::Dagger => "dagger",
            WeaponType::Caestus => "caestus",
            WeaponType::Bow => "bow",
            WeaponType::Glaive => "glaive",
            WeaponType::Katana => "katana",
            WeaponType::Nodachi => "nodachi",
            WeaponType::Quarterstaff => "quarterstaff",
            WeaponType::Wand => "wand",
            WeaponType::WizardStaff => "wizard staff",
        }
    }
}

named_from_str!(WeaponType);

/// Body slot an armour piece covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmourType {
    Helmet,
    Chestpiece,
    ArmGuards,
    Gloves,
    Leggings,
}

impl Named for ArmourType {
    const ALL: &'static [Self] = &[
        ArmourType::Helmet,
        ArmourType::Chestpiece,
        ArmourType::ArmGuards,
        ArmourType::Gloves,
        ArmourType::Leggings,
    ];
    const KIND: &'static str = "armour type";

    fn name(&self) -> &'static str {
        match self {
            ArmourType::Helmet => "helmet",
            ArmourType::Chestpiece => "chestpiece",
            ArmourType::ArmGuards => "arm guards",
            ArmourType::Gloves => "gloves",
            ArmourType::Leggings => "leggings",
        }
    }
}

named_from_str!(ArmourType);

/// What an armour piece is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmourMaterial {
    Cloth,
    Leather,
    Chainmail,
    Wooden,
    Bronze,
    Iron,
    Steel,
}

impl Named for ArmourMaterial {
    const ALL: &'static [Self] = &[
        ArmourMaterial::Cloth,
        ArmourMaterial::Leather,
        ArmourMaterial::Chainmail,
        ArmourMaterial::Wooden,
        ArmourMaterial::Bronze,
        ArmourMaterial::Iron,
        ArmourMaterial::Steel,
    ];
    const KIND: &'static str = "armour material";

    fn name(&self) -> &'static str {
        match self {
            ArmourMaterial::Cloth => "cloth",
            ArmourMaterial::Leather => "leather",
            ArmourMaterial::Chainmail => "chainmail",
            ArmourMaterial::Wooden => "wooden",
            ArmourMaterial::Bronze => "bronze",
            ArmourMaterial::Iron => "iron",
            ArmourMaterial::Steel => "steel",
        }
    }
}

named_from_str!(ArmourMaterial);

/// What a chest is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChestMaterial {
    Wooden,
    Iron,
    Gilded,
}

impl ChestMaterial {
    /// Empty weight of the chest itself.
    pub fn base_weight(&self) -> f64 {
        match self {
            ChestMaterial::Wooden => 15.0,
            ChestMaterial::Iron => 40.0,
            ChestMaterial::Gilded => 30.0,
        }
    }

    /// Display name of a chest made of this material.
    pub fn label(&self) -> &'static str {
        match self {
            ChestMaterial::Wooden => "wooden chest",
            ChestMaterial::Iron => "iron chest",
            ChestMaterial::Gilded => "gilded chest",
        }
    }
}

impl Named for ChestMaterial {
    const ALL: &'static [Self] = &[ChestMaterial::Wooden, ChestMaterial::Iron, ChestMaterial::Gilded];
    const KIND: &'static str = "chest material";

    fn name(&self) -> &'static str {
        match self {
            ChestMaterial::Wooden => "wooden",
            ChestMaterial::Iron => "iron",
            ChestMaterial::Gilded => "gilded",
        }
    }
}

named_from_str!(ChestMaterial);

/// Damage components a weapon deals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageKind {
    Blunt,
    Slash,
    Puncture,
    Electric,
    Fire,
    Magic,
    True,
}

impl DamageKind {
    pub const ALL: [DamageKind; 7] = [
        DamageKind::Blunt,
        DamageKind::Slash,
        DamageKind::Puncture,
        DamageKind::Electric,
        DamageKind::Fire,
        DamageKind::Magic,
        DamageKind::True,
    ];
}

/// Protection components armour offers. Multipliers use the same keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectionKind {
    General,
    Blunt,
    Slash,
    Puncture,
    Electric,
    Fire,
    Magic,
}

impl ProtectionKind {
    pub const ALL: [ProtectionKind; 7] = [
        ProtectionKind::General,
        ProtectionKind::Blunt,
        ProtectionKind::Slash,
        ProtectionKind::Puncture,
        ProtectionKind::Electric,
        ProtectionKind::Fire,
        ProtectionKind::Magic,
    ];
}

/// Per-component weapon damage. Never negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageStats {
    pub blunt: u32,
    pub slash: u32,
    pub puncture: u32,
    pub electric: u32,
    pub fire: u32,
    pub magic: u32,
    #[serde(rename = "true")]
    pub true_dmg: u32,
}

impl DamageStats {
    /// Builds the block from values in [`DamageKind::ALL`] order.
    pub fn from_array(values: [u32; 7]) -> Self {
        let [blunt, slash, puncture, electric, fire, magic, true_dmg] = values;
        Self {
            blunt,
            slash,
            puncture,
            electric,
            fire,
            magic,
            true_dmg,
        }
    }

    pub fn get(&self, kind: DamageKind) -> u32 {
        match kind {
            DamageKind::Blunt => self.blunt,
            DamageKind::Slash => self.slash,
            DamageKind::Puncture => self.puncture,
            DamageKind::Electric => self.electric,
            DamageKind::Fire => self.fire,
            DamageKind::Magic => self.magic,
            DamageKind::True => self.true_dmg,
        }
    }

    pub fn total(&self) -> u32 {
        DamageKind::ALL.iter().map(|k| self.get(*k)).sum()
    }
}

/// Per-component armour resistance. Never negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resistances {
    pub general: u32,
    pub blunt: u32,
    pub slash: u32,
    pub puncture: u32,
    pub electric: u32,
    pub fire: u32,
    pub magic: u32,
}

impl Resistances {
    /// Builds the block from values in [`ProtectionKind::ALL`] order.
    pub fn from_array(values: [u32; 7]) -> Self {
        let [general, blunt, slash, puncture, electric, fire, magic] = values;
        Self {
            general,
            blunt,
            slash,
            puncture,
            electric,
            fire,
            magic,
        }
    }

    pub fn get(&self, kind: ProtectionKind) -> u32 {
        match kind {
            ProtectionKind::General => self.general,
            ProtectionKind::Blunt => self.blunt,
            ProtectionKind::Slash => self.slash,
            ProtectionKind::Puncture => self.puncture,
            ProtectionKind::Electric => self.electric,
            ProtectionKind::Fire => self.fire,
            ProtectionKind::Magic => self.magic,
        }
    }

    pub fn total(&self) -> u32 {
        ProtectionKind::ALL.iter().map(|k| self.get(*k)).sum()
    }
}

/// Incoming damage multipliers. Each is at least 1; higher means more vulnerable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    pub general: f64,
    pub blunt: f64,
    pub slash: f64,
    pub puncture: f64,
    pub electric: f64,
    pub fire: f64,
    pub magic: f64,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self::from_array([1.0; 7])
    }
}

impl Multipliers {
    /// Builds the block from values in [`ProtectionKind::ALL`] order.
    pub fn from_array(values: [f64; 7]) -> Self {
        let [general, blunt, slash, puncture, electric, fire, magic] = values;
        Self {
            general,
            blunt,
            slash,
            puncture,
            electric,
            fire,
            magic,
        }
    }

    pub fn get(&self, kind: ProtectionKind) -> f64 {
        match kind {
            ProtectionKind::General => self.general,
            ProtectionKind::Blunt => self.blunt,
            ProtectionKind::Slash => self.slash,
            ProtectionKind::Puncture => self.puncture,
            ProtectionKind::Electric => self.electric,
            ProtectionKind::Fire => self.fire,
            ProtectionKind::Magic => self.magic,
        }
    }

    /// Combined multiplier: the product of every component.
    pub fn total(&self) -> f64 {
        ProtectionKind::ALL.iter().map(|k| self.get(*k)).product()
    }
}

/// Stat block of a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Action points per swing, at least 1
    pub ap: u32,
    pub range: f64,
    pub weight: f64,
    pub one_handed: bool,
    pub damage: DamageStats,
}

/// Stat block of an armour piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmourStats {
    pub ap: u32,
    pub weight: f64,
    pub resistances: Resistances,
    pub multipliers: Multipliers,
}

/// Accessors shared by every kind of item.
pub trait ItemProperties {
    fn name(&self) -> &str;

    /// Continuous rarity, roughly in (0, 10].
    fn rarity(&self) -> f64;

    fn weight(&self) -> f64;

    /// Derived worth of the item, at least 1 for weapons and armour.
    fn total_value(&self) -> u32;

    /// Displayed level: rarity times ten, rounded.
    fn level(&self) -> u32 {
        (self.rarity() * 10.0).round().max(0.0) as u32
    }
}

/// A generated weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub weapon_type: WeaponType,
    pub rarity: f64,
    pub stats: WeaponStats,
}

impl Weapon {
    pub fn total_damage(&self) -> u32 {
        self.stats.damage.total()
    }

    pub fn damage_per_ap(&self) -> f64 {
        self.total_damage() as f64 / self.stats.ap.max(1) as f64
    }
}

impl ItemProperties for Weapon {
    fn name(&self) -> &str {
        &self.name
    }

    fn rarity(&self) -> f64 {
        self.rarity
    }

    fn weight(&self) -> f64 {
        self.stats.weight
    }

    /// `max(1, int(damage_per_ap * rarity * 4))`
    fn total_value(&self) -> u32 {
        ((self.damage_per_ap() * self.rarity * 4.0) as u32).max(1)
    }
}

/// A generated armour piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armour {
    pub name: String,
    pub armour_type: ArmourType,
    pub material: ArmourMaterial,
    pub rarity: f64,
    pub stats: ArmourStats,
}

impl Armour {
    pub fn total_protection(&self) -> u32 {
        self.stats.resistances.total()
    }

    pub fn total_multiplier(&self) -> f64 {
        self.stats.multipliers.total()
    }
}

impl ItemProperties for Armour {
    fn name(&self) -> &str {
        &self.name
    }

    fn rarity(&self) -> f64 {
        self.rarity
    }

    fn weight(&self) -> f64 {
        self.stats.weight
    }

    /// `max(1, int(protection / (multiplier / 2) * 2))`
    fn total_value(&self) -> u32 {
        let multiplier = self.total_multiplier().max(1.0);
        ((self.total_protection() as f64 / (multiplier / 2.0) * 2.0) as u32).max(1)
    }
}

/// A container of loot found in rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chest {
    pub material: ChestMaterial,
    pub inventory: Vec<Item>,
}

impl Chest {
    pub fn new(material: ChestMaterial, inventory: Vec<Item>) -> Self {
        Self {
            material,
            inventory,
        }
    }

    /// Display name, e.g. "iron chest".
    pub fn label(&self) -> &'static str {
        self.material.label()
    }
}

impl ItemProperties for Chest {
    fn name(&self) -> &str {
        self.label()
    }

    /// Rarity of the rarest thing inside.
    fn rarity(&self) -> f64 {
        self.inventory
            .iter()
            .map(|item| item.rarity())
            .fold(0.0, f64::max)
    }

    fn weight(&self) -> f64 {
        self.material.base_weight() + self.inventory.iter().map(|item| item.weight()).sum::<f64>()
    }

    fn total_value(&self) -> u32 {
        self.inventory.iter().map(|item| item.total_value()).sum()
    }
}

/// Any item that can lie in a room, sit in a chest or fill an inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum Item {
    Weapon(Weapon),
    Armour(Armour),
    Chest(Chest),
}

impl Item {
    fn properties(&self) -> &dyn ItemProperties {
        match self {
            Item::Weapon(weapon) => weapon,
            Item::Armour(armour) => armour,
            Item::Chest(chest) => chest,
        }
    }

    /// Nested contents, for items that hold other items.
    pub fn inventory(&self) -> Option<&[Item]> {
        match self {
            Item::Chest(chest) => Some(&chest.inventory),
            _ => None,
        }
    }

    /// Whether a humanoid can wear or wield this item.
    pub fn is_equippable(&self) -> bool {
        matches!(self, Item::Weapon(_) | Item::Armour(_))
    }

    /// Sort key for descending-rarity ordering.
    pub fn compare_rarity_desc(a: &Item, b: &Item) -> std::cmp::Ordering {
        b.rarity().total_cmp(&a.rarity())
    }
}

impl ItemProperties for Item {
    fn name(&self) -> &str {
        self.properties().name()
    }

    fn rarity(&self) -> f64 {
        self.properties().rarity()
    }

    fn weight(&self) -> f64 {
        self.properties().weight()
    }

    fn total_value(&self) -> u32 {
        self.properties().total_value()
    }
}

impl From<Weapon> for Item {
    fn from(weapon: Weapon) -> Self {
        Item::Weapon(weapon)
    }
}

impl From<Armour> for Item {
    fn from(armour: Armour) -> Self {
        Item::Armour(armour)
    }
}

impl From<Chest> for Item {
    fn from(chest: Chest) -> Self {
        Item::Chest(chest)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Chest(chest) => {
                write!(f, "{} holding", chest.label())?;
                for item in &chest.inventory {
                    write!(f, "\n  Value {} -- {}", item.total_value(), item)?;
                }
                Ok(())
            }
            other => write!(f, "Level {} {}", other.level(), other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DelveError;

    pub(crate) fn sample_weapon(rarity: f64, ap: u32, slash: u32) -> Weapon {
        Weapon {
            name: "sword".to_string(),
            weapon_type: WeaponType::Sword,
            rarity,
            stats: WeaponStats {
                ap,
                range: 0.8,
                weight: 3.0,
                one_handed: true,
                damage: DamageStats {
                    slash,
                    ..DamageStats::default()
                },
            },
        }
    }

    fn sample_armour(general: u32, fire_multiplier: f64) -> Armour {
        Armour {
            name: "iron helmet".to_string(),
            armour_type: ArmourType::Helmet,
            material: ArmourMaterial::Iron,
            rarity: 3.0,
            stats: ArmourStats {
                ap: 10,
                weight: 5.0,
                resistances: Resistances {
                    general,
                    ..Resistances::default()
                },
                multipliers: Multipliers {
                    fire: fire_multiplier,
                    ..Multipliers::default()
                },
            },
        }
    }

    #[test]
    fn test_weapon_value_formula() {
        // (100 / 10) * 5 * 4
        let weapon = sample_weapon(5.0, 10, 100);
        assert_eq!(weapon.total_damage(), 100);
        assert_eq!(weapon.total_value(), 200);
        assert_eq!(weapon.level(), 50);

        let useless = sample_weapon(0.1, 10, 0);
        assert_eq!(useless.total_value(), 1);
    }

    #[test]
    fn test_armour_value_uses_multiplier_product() {
        // 10 / (1 / 2) * 2
        assert_eq!(sample_armour(10, 1.0).total_value(), 40);
        // 10 / (2 / 2) * 2
        let vulnerable = sample_armour(10, 2.0);
        assert_eq!(vulnerable.total_multiplier(), 2.0);
        assert_eq!(vulnerable.total_value(), 20);
        assert_eq!(sample_armour(0, 1.0).total_value(), 1);
    }

    #[test]
    fn test_chest_aggregates_contents() {
        let chest = Chest::new(
            ChestMaterial::Iron,
            vec![
                Item::from(sample_weapon(5.0, 10, 100)),
                Item::from(sample_armour(10, 1.0)),
            ],
        );
        assert_eq!(chest.total_value(), 240);
        assert_eq!(chest.rarity(), 5.0);
        assert_eq!(chest.weight(), 40.0 + 3.0 + 5.0);

        let item = Item::from(chest);
        assert_eq!(item.inventory().map(|inv| inv.len()), Some(2));
        assert!(!item.is_equippable());
        assert_eq!(item.name(), "iron chest");
    }

    #[test]
    fn test_rarity_ordering() {
        let mut items = vec![
            Item::from(sample_weapon(1.0, 10, 10)),
            Item::from(sample_weapon(7.0, 10, 10)),
            Item::from(sample_weapon(3.0, 10, 10)),
        ];
        items.sort_by(Item::compare_rarity_desc);
        let rarities: Vec<f64> = items.iter().map(|i| i.rarity()).collect();
        assert_eq!(rarities, vec![7.0, 3.0, 1.0]);
    }

    #[test]
    fn test_enum_names_parse_back() {
        for weapon_type in WeaponType::ALL {
            assert_eq!(weapon_type.name().parse::<WeaponType>().unwrap(), *weapon_type);
        }
        for armour_type in ArmourType::ALL {
            assert_eq!(ArmourType::parse(armour_type.name()).unwrap(), *armour_type);
        }
        assert_eq!("arm_guards".parse::<ArmourType>().unwrap(), ArmourType::ArmGuards);
        assert!(matches!(
            "mithril".parse::<ArmourMaterial>(),
            Err(DelveError::InvalidEnum { kind: "armour material", .. })
        ));
    }

    #[test]
    fn test_chest_name_matches_label() {
        for &material in ChestMaterial::ALL {
            let chest = Chest::new(material, Vec::new());
            assert_eq!(chest.name(), chest.label());
            assert!(chest.label().starts_with(material.name()));
        }
        assert_eq!(Chest::new(ChestMaterial::Iron, Vec::new()).name(), "iron chest");
    }
}

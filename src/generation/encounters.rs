//! # Encounter Generation
//!
//! Armed and armoured humanoids: enemies built from a race template and a
//! class override, and freshly created level-one players.

use super::allocation::generate_armour_set;
use super::items::WeaponGenerator;
use super::naming::{fantasy_name, PhonemePool};
use super::{GenerationConfig, Generator};
use crate::config::{CREATURE_NAME_LENGTH, ENEMY_AP_MODIFIER, OFF_HAND_CHANCE, RIGHT_HANDED_CHANCE};
use crate::game::{
    ArmourMaterial, CombatClass, Creature, CreatureKind, CreatureStats, EnemyProfile, EnemyType,
    Hand, Named, PlayerProfile, WeaponType,
};
use crate::utils::{pick, round_to, sample_level, skew_multiplier};
use crate::{DelveError, DelveResult};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Base stats and equipment pools of an enemy race.
#[derive(Debug, Clone)]
struct EnemyTemplate {
    hp_coeff: f64,
    /// Base height and its percent spread
    height: (f64, f64),
    /// Base weight and its percent spread
    weight: (f64, f64),
    speed: f64,
    skill: f64,
    aggression: f64,
    courage: f64,
    max_ap: f64,
    carry_coeff: f64,
    phonemes: PhonemePool,
    armour_consistency: f64,
    weapons: Vec<WeaponType>,
    materials: Vec<ArmourMaterial>,
}

impl EnemyTemplate {
    fn for_type(enemy_type: EnemyType) -> Self {
        let common = WeaponType::COMMON.to_vec();
        let all_materials = ArmourMaterial::ALL.to_vec();

        match enemy_type {
            EnemyType::Goblin => Self {
                hp_coeff: 75.0,
                height: (1.05, 10.0),
                weight: (80.0, 20.0),
                speed: 0.25,
                skill: 20.0,
                aggression: 65.0,
                courage: 50.0,
                max_ap: 80.0,
                carry_coeff: 50.0,
                phonemes: PhonemePool::ORCISH,
                armour_consistency: 0.5,
                weapons: vec![
                    WeaponType::Axe,
                    WeaponType::Sword,
                    WeaponType::Dagger,
                    WeaponType::Rapier,
                    WeaponType::Spear,
                ],
                materials: vec![
                    ArmourMaterial::Cloth,
                    ArmourMaterial::Leather,
                    ArmourMaterial::Chainmail,
                    ArmourMaterial::Wooden,
                ],
            },
            EnemyType::Ork => Self {
                hp_coeff: 150.0,
                height: (2.2, 20.0),
                weight: (175.0, 20.0),
                speed: 0.15,
                skill: 30.0,
                aggression: 65.0,
                courage: 70.0,
                max_ap: 100.0,
                carry_coeff: 150.0,
                phonemes: PhonemePool::ORCISH,
                armour_consistency: 0.6,
                weapons: vec![
                    WeaponType::Axe,
                    WeaponType::Sword,
                    WeaponType::Mace,
                    WeaponType::Greatsword,
                    WeaponType::Spear,
                    WeaponType::Glaive,
                    WeaponType::Halberd,
                ],
                materials: all_materials,
            },
            EnemyType::Outlaw => Self {
                hp_coeff: 100.0,
                height: (1.7, 20.0),
                weight: (135.0, 20.0),
                speed: 0.2,
                skill: 50.0,
                aggression: 50.0,
                courage: 65.0,
                max_ap: 90.0,
                carry_coeff: 100.0,
                phonemes: PhonemePool::DEFAULT,
                armour_consistency: 0.8,
                weapons: common,
                materials: all_materials,
            },
            EnemyType::Undead => Self {
                hp_coeff: 120.0,
                height: (1.7, 20.0),
                weight: (100.0, 20.0),
                speed: 0.1,
                skill: 20.0,
                aggression: 80.0,
                courage: 90.0,
                max_ap: 50.0,
                carry_coeff: 80.0,
                phonemes: PhonemePool::UNDEAD,
                armour_consistency: 0.7,
                weapons: common,
                materials: all_materials,
            },
            EnemyType::Skeleton => Self {
                hp_coeff: 80.0,
                height: (1.7, 20.0),
                weight: (80.0, 20.0),
                speed: 0.2,
                skill: 60.0,
                aggression: 50.0,
                courage: 80.0,
                max_ap: 65.0,
                carry_coeff: 65.0,
                phonemes: PhonemePool::SKELETAL,
                armour_consistency: 0.7,
                weapons: common,
                materials: all_materials,
            },
            EnemyType::BatPerson => Self {
                hp_coeff: 90.0,
                height: (1.8, 20.0),
                weight: (140.0, 20.0),
                speed: 0.4,
                skill: 60.0,
                aggression: 40.0,
                courage: 40.0,
                max_ap: 110.0,
                carry_coeff: 10.0,
                phonemes: PhonemePool::BAT,
                armour_consistency: 0.7,
                weapons: common,
                materials: all_materials,
            },
        }
    }

    /// Applies a class's pools and stat scaling.
    fn apply_class(&mut self, class: CombatClass) {
        use ArmourMaterial as M;
        use WeaponType as W;

        match class {
            CombatClass::Assassin => {
                self.weapons = vec![W::Dagger];
                self.materials = vec![M::Cloth, M::Leather, M::Chainmail];
                self.skill *= 1.2;
            }
            CombatClass::Archer => {
                self.weapons = vec![W::Bow];
                self.materials = vec![M::Cloth, M::Leather];
                self.aggression *= 0.8;
            }
            CombatClass::Knight => {
                extend_unique(
                    &mut self.weapons,
                    &[
                        W::Sword,
                        W::Axe,
                        W::Mace,
                        W::Greatsword,
                        W::Halberd,
                        W::Spear,
                        W::Glaive,
                        W::Katana,
                        W::Nodachi,
                    ],
                );
                self.materials = M::ALL.to_vec();
                self.courage *= 1.2;
                self.aggression *= 0.9;
                self.skill *= 1.1;
                self.armour_consistency *= 1.2;
            }
            CombatClass::Samurai => {
                self.phonemes = PhonemePool::JAPANESE;
                self.weapons = vec![W::Katana, W::Nodachi, W::Quarterstaff, W::Glaive];
                self.materials = M::ALL.to_vec();
                self.courage *= 1.1;
                self.aggression *= 0.9;
                self.skill *= 1.2;
                self.armour_consistency *= 1.2;
            }
            CombatClass::Thug => {
                extend_unique(&mut self.weapons, &[W::Axe, W::Dagger]);
                self.materials = vec![M::Cloth, M::Leather, M::Chainmail, M::Bronze];
                self.courage *= 0.8;
                self.aggression *= 1.3;
                self.skill *= 0.8;
                self.armour_consistency *= 0.9;
            }
            CombatClass::Mage => {
                self.weapons = vec![W::Wand, W::WizardStaff];
                self.materials = vec![M::Cloth, M::Leather];
            }
            CombatClass::Brawler => {
                self.weapons = vec![W::Caestus];
                self.materials = vec![M::Cloth, M::Leather];
                self.aggression *= 1.3;
            }
            CombatClass::Viking => {
                extend_unique(&mut self.weapons, &[W::Axe]);
                self.materials = vec![M::Leather, M::Chainmail, M::Wooden, M::Iron];
                self.courage *= 1.1;
                self.aggression *= 1.1;
                self.skill *= 0.9;
                self.armour_consistency *= 0.7;
            }
        }
        self.armour_consistency = self.armour_consistency.min(1.0);
    }
}

/// Set union that keeps first-seen order.
fn extend_unique<T: PartialEq + Copy>(pool: &mut Vec<T>, extra: &[T]) {
    for value in extra {
        if !pool.contains(value) {
            pool.push(*value);
        }
    }
}

/// Generates a single enemy humanoid.
///
/// # Examples
///
/// ```
/// use delvegen::{create_rng, CombatClass, EnemyGenerator, EnemyType, GenerationConfig, Generator};
///
/// let enemy = EnemyGenerator::new()
///     .with_level(2.0)
///     .with_type(EnemyType::Goblin)
///     .with_class(CombatClass::Archer)
///     .generate(&GenerationConfig::default(), &mut create_rng(4))
///     .unwrap();
/// assert_eq!(enemy.level, 20);
/// assert!(enemy.power_level() > 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemyGenerator {
    pub level: Option<f64>,
    pub enemy_type: Option<EnemyType>,
    pub enemy_class: Option<CombatClass>,
}

impl EnemyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: f64) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_type(mut self, enemy_type: EnemyType) -> Self {
        self.enemy_type = Some(enemy_type);
        self
    }

    pub fn with_class(mut self, enemy_class: CombatClass) -> Self {
        self.enemy_class = Some(enemy_class);
        self
    }
}

impl Generator<Creature> for EnemyGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Creature> {
        let level = match self.level {
            Some(level) => level,
            None => sample_level(rng),
        };
        let level = config.clamp_rarity(level, "enemy level");
        let enemy_type = match self.enemy_type {
            Some(enemy_type) => enemy_type,
            None => *pick(rng, EnemyType::ALL),
        };
        let enemy_class = match self.enemy_class {
            Some(enemy_class) => enemy_class,
            None => *pick(rng, CombatClass::ALL),
        };

        let mut template = EnemyTemplate::for_type(enemy_type);
        template.apply_class(enemy_class);

        let hp = (template.hp_coeff * level.powi(2) + 10.0) as i32;
        let height = round_to(template.height.0 * skew_multiplier(rng, template.height.1), 2);
        let weight = round_to(template.weight.0 * skew_multiplier(rng, template.weight.1), 1);
        let arm_length = round_to(height * 0.4 * skew_multiplier(rng, 10.0), 2);
        let max_ap = (template.max_ap * ENEMY_AP_MODIFIER * level / 10.0 + 10.0) as u32;
        let stats = CreatureStats {
            hp,
            max_hp: hp,
            height,
            weight,
            arm_length,
            carry_capacity: (template.carry_coeff * level + 5.0) as u32,
            speed: template.speed,
            ap: max_ap,
            max_ap,
        };

        let right_handed = rng.gen_bool(RIGHT_HANDED_CHANCE);
        let main_material = *pick(rng, &template.materials);
        let armour_rarity = level * skew_multiplier(rng, config.stat_skew_percent);
        let armour = generate_armour_set(
            rng,
            config,
            armour_rarity,
            main_material,
            &template.materials,
            template.armour_consistency,
        )?;

        let weapon_type = *pick(rng, &template.weapons);
        let weapon = WeaponGenerator::new()
            .with_rarity(level * skew_multiplier(rng, config.stat_skew_percent))
            .with_type(weapon_type)
            .generate(config, rng)?;

        let name = fantasy_name(rng, CREATURE_NAME_LENGTH, &template.phonemes);
        let profile = EnemyProfile {
            enemy_type,
            enemy_class,
            skill: template.skill as u32,
            aggression: template.aggression as u32,
            courage: template.courage as u32,
        };
        let mut enemy = Creature::new(
            name,
            (level * 10.0) as u32,
            stats,
            CreatureKind::Enemy(profile),
        );
        enemy.equip_armour_set(armour);

        let main_hand = if right_handed { Hand::Right } else { Hand::Left };
        let one_handed = weapon.stats.one_handed;
        enemy.equip_weapon(main_hand, weapon);

        if one_handed && rng.gen_bool(OFF_HAND_CHANCE) {
            let off_hand = WeaponGenerator::new()
                .with_rarity(level * skew_multiplier(rng, config.stat_skew_percent))
                .with_type(weapon_type)
                .generate(config, rng)?;
            enemy.equip_weapon(main_hand.other(), off_hand);
        }

        debug!(
            "Generated level {} {} with power {}",
            enemy.level,
            enemy.title(),
            enemy.power_level()
        );
        Ok(enemy)
    }

    fn validate(&self, enemy: &Creature, _config: &GenerationConfig) -> DelveResult<()> {
        let profile = enemy.enemy_profile().ok_or_else(|| {
            DelveError::GenerationFailed(format!("{} is not an enemy", enemy.name))
        })?;
        if self.enemy_type.is_some_and(|t| t != profile.enemy_type)
            || self.enemy_class.is_some_and(|c| c != profile.enemy_class)
        {
            return Err(DelveError::GenerationFailed(format!(
                "{} does not match the requested type or class",
                enemy.name
            )));
        }
        if enemy.stats.hp <= 0 || enemy.weapon_slots.iter().next().is_none() {
            return Err(DelveError::GenerationFailed(format!(
                "{} was generated dead or unarmed",
                enemy.name
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "EnemyGenerator"
    }
}

/// Starting kit of a player class.
#[derive(Debug, Clone, Copy)]
struct ClassKit {
    hp_multiplier: f64,
    weapon: WeaponType,
    main_material: ArmourMaterial,
    materials: &'static [ArmourMaterial],
    armour_consistency: f64,
}

fn class_kit(class: CombatClass) -> ClassKit {
    use ArmourMaterial as M;

    let (hp_multiplier, weapon, main_material, materials, armour_consistency): (
        f64,
        WeaponType,
        ArmourMaterial,
        &'static [ArmourMaterial],
        f64,
    ) = match class {
        CombatClass::Assassin => (
            0.9,
            WeaponType::Dagger,
            M::Leather,
            &[M::Cloth, M::Leather, M::Chainmail],
            0.6,
        ),
        CombatClass::Archer => (1.0, WeaponType::Bow, M::Leather, &[M::Cloth], 0.7),
        CombatClass::Knight => (
            1.2,
            WeaponType::Sword,
            M::Iron,
            &[M::Leather, M::Chainmail, M::Bronze, M::Steel],
            0.9,
        ),
        CombatClass::Samurai => (
            1.1,
            WeaponType::Katana,
            M::Wooden,
            &[M::Leather, M::Chainmail, M::Iron, M::Bronze, M::Steel],
            0.7,
        ),
        CombatClass::Thug => (
            1.0,
            WeaponType::Axe,
            M::Leather,
            &[M::Chainmail, M::Iron, M::Bronze, M::Steel],
            0.5,
        ),
        CombatClass::Mage => (
            0.9,
            WeaponType::Wand,
            M::Cloth,
            &[M::Leather, M::Chainmail, M::Iron, M::Bronze, M::Steel],
            0.8,
        ),
        CombatClass::Brawler => (
            1.0,
            WeaponType::Caestus,
            M::Leather,
            &[M::Chainmail, M::Iron, M::Bronze, M::Steel],
            0.7,
        ),
        CombatClass::Viking => (
            1.2,
            WeaponType::Axe,
            M::Leather,
            &[M::Chainmail, M::Iron, M::Wooden],
            0.7,
        ),
    };
    ClassKit {
        hp_multiplier,
        weapon,
        main_material,
        materials,
        armour_consistency,
    }
}

/// Creates a new level-one player with class starting gear.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerGenerator {
    pub name: String,
    pub class: CombatClass,
}

impl PlayerGenerator {
    pub fn new(name: impl Into<String>, class: CombatClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }
}

impl Generator<Creature> for PlayerGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Creature> {
        if self.name.trim().is_empty() {
            return Err(DelveError::InvalidState(
                "player name must not be empty".to_string(),
            ));
        }
        let kit = class_kit(self.class);

        let hp = (100.0 * kit.hp_multiplier) as i32;
        let stats = CreatureStats {
            hp,
            max_hp: hp,
            height: round_to(rng.gen_range(1.6..=1.9), 2),
            weight: round_to(rng.gen_range(120.0..=200.0), 1),
            arm_length: round_to(rng.gen_range(0.55..=0.65), 2),
            carry_capacity: 100,
            speed: 0.2,
            ap: 100,
            max_ap: 100,
        };

        let weapon = WeaponGenerator::new()
            .with_rarity(rng.gen_range(0.1..=0.15))
            .with_type(kit.weapon)
            .generate(config, rng)?;
        let armour_rarity = rng.gen_range(0.1..=0.15);
        let armour = generate_armour_set(
            rng,
            config,
            armour_rarity,
            kit.main_material,
            kit.materials,
            kit.armour_consistency,
        )?;

        let mut player = Creature::new(
            self.name.trim(),
            1,
            stats,
            CreatureKind::Player(PlayerProfile {
                player_class: self.class,
                skills: Vec::new(),
            }),
        );
        player.equip_weapon(Hand::Right, weapon);
        player.equip_armour_set(armour);

        debug!("Created {} with {} armour pieces", player.title(), player.armour_slots.worn_count());
        Ok(player)
    }

    fn validate(&self, player: &Creature, _config: &GenerationConfig) -> DelveResult<()> {
        match player.player_profile() {
            Some(profile) if profile.player_class == self.class => Ok(()),
            _ => Err(DelveError::GenerationFailed(format!(
                "{} is not a {} player",
                player.name, self.class
            ))),
        }
    }

    fn generator_type(&self) -> &'static str {
        "PlayerGenerator"
    }
}

//! # Budget Allocation
//!
//! Greedy stochastic filling of a value or power budget with individually
//! generated items and enemies, plus the armour set roll shared by every
//! humanoid.
//!
//! Each iteration draws a target rarity of
//! `(level / 10) * (distribution - uniform(0, distribution / 2))`, generates
//! one entry and keeps it only if the budget can pay for it. A rejected entry
//! shrinks the distribution so later draws aim lower.

use super::encounters::EnemyGenerator;
use super::items::{ArmourGenerator, WeaponGenerator};
use super::{GenerationConfig, Generator};
use crate::config::ARMOUR_SLOT_COUNT;
use crate::game::{Armour, ArmourMaterial, ArmourType, Creature, Item, ItemProperties, Named};
use crate::utils::{coin_flip, skew_multiplier, zero_to_range};
use crate::DelveResult;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::Rng;

/// Rolls one piece per armour slot.
///
/// With probability `consistency` a slot uses `main_material`. Otherwise it
/// picks uniformly from `material_pool` plus "nothing", and "nothing" leaves
/// the slot empty. Each piece gets its own jitter on `rarity`.
pub fn generate_armour_set(
    rng: &mut StdRng,
    config: &GenerationConfig,
    rarity: f64,
    main_material: ArmourMaterial,
    material_pool: &[ArmourMaterial],
    consistency: f64,
) -> DelveResult<Vec<Armour>> {
    let consistency = consistency.clamp(0.0, 1.0);
    let mut set = Vec::with_capacity(ARMOUR_SLOT_COUNT);

    for &slot in ArmourType::ALL {
        let material = if rng.gen_bool(consistency) {
            main_material
        } else {
            // One extra index stands for an empty slot
            let index = rng.gen_range(0..=material_pool.len());
            match material_pool.get(index) {
                Some(&material) => material,
                None => continue,
            }
        };

        let piece_rarity = rarity * skew_multiplier(rng, config.stat_skew_percent);
        let piece = ArmourGenerator::new()
            .with_rarity(piece_rarity)
            .with_type(slot)
            .with_material(material)
            .generate(config, rng)?;
        set.push(piece);
    }
    Ok(set)
}

/// Target rarity for the next allocator draw.
fn target_rarity(rng: &mut StdRng, config: &GenerationConfig, level: f64, distribution: f64) -> f64 {
    let target = (level / 10.0) * (distribution - zero_to_range(rng, distribution / 2.0));
    if target < config.min_rarity {
        debug!("Allocator target {target:.3} raised to {}", config.min_rarity);
        config.min_rarity
    } else {
        target
    }
}

fn decay(config: &GenerationConfig, distribution: f64) -> f64 {
    (distribution - config.distribution_decay).max(config.min_distribution)
}

/// Fills `budget` worth of loot, sorted by descending rarity.
///
/// Every kept item fits in what is left of the budget, so the summed value
/// never exceeds it. Running into the retry ceiling returns what was found.
///
/// # Examples
///
/// ```
/// use delvegen::{create_rng, generate_loot, GenerationConfig, ItemProperties};
///
/// let config = GenerationConfig::default();
/// let loot = generate_loot(&mut create_rng(1), &config, 50.0, 1000.0, 1.0).unwrap();
/// let total: u32 = loot.iter().map(|item| item.total_value()).sum();
/// assert!(total <= 1000);
/// ```
pub fn generate_loot(
    rng: &mut StdRng,
    config: &GenerationConfig,
    level: f64,
    budget: f64,
    distribution: f64,
) -> DelveResult<Vec<Item>> {
    let mut remaining = budget;
    let mut distribution = distribution.max(config.min_distribution);
    let mut loot: Vec<Item> = Vec::new();
    let mut tries = 0;

    while remaining > 0.0 && tries < config.allocator_retry_limit {
        tries += 1;
        let rarity = target_rarity(rng, config, level, distribution);
        let item: Item = if coin_flip(rng) {
            WeaponGenerator::new().with_rarity(rarity).generate(config, rng)?.into()
        } else {
            ArmourGenerator::new().with_rarity(rarity).generate(config, rng)?.into()
        };

        let after = remaining - item.total_value() as f64;
        // Spending the budget exactly is allowed
        if after >= 0.0 {
            remaining = after;
            loot.push(item);
        } else {
            distribution = decay(config, distribution);
        }
    }

    if remaining > 0.0 && tries >= config.allocator_retry_limit {
        warn!(
            "Loot allocator hit its retry limit with {remaining:.0} of {budget:.0} unspent"
        );
    }
    debug!("Allocated {} items for a budget of {budget:.0}", loot.len());

    loot.sort_by(Item::compare_rarity_desc);
    Ok(loot)
}

/// Fills `budget` worth of enemy power.
///
/// Stops once the remaining budget drops to `level` or below. An enemy is
/// only kept while the budget left after it still exceeds `level`.
pub fn generate_enemies(
    rng: &mut StdRng,
    config: &GenerationConfig,
    level: f64,
    budget: f64,
    distribution: f64,
) -> DelveResult<Vec<Creature>> {
    let mut remaining = budget;
    let mut distribution = distribution.max(config.min_distribution);
    let mut enemies = Vec::new();
    let mut tries = 0;

    while remaining > level && tries < config.allocator_retry_limit {
        tries += 1;
        let target = target_rarity(rng, config, level, distribution);
        let enemy = EnemyGenerator::new().with_level(target).generate(config, rng)?;

        let after = remaining - enemy.power_level() as f64;
        if after > level {
            remaining = after;
            enemies.push(enemy);
        } else {
            distribution = decay(config, distribution);
        }
    }

    if remaining > level && tries >= config.allocator_retry_limit {
        warn!(
            "Enemy allocator hit its retry limit with {remaining:.0} of {budget:.0} power unspent"
        );
    }
    debug!("Allocated {} enemies for a budget of {budget:.0}", enemies.len());
    Ok(enemies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::create_rng;

    #[test]
    fn test_full_consistency_uses_main_material_everywhere() {
        let config = GenerationConfig::default();
        let set = generate_armour_set(
            &mut create_rng(3),
            &config,
            2.0,
            ArmourMaterial::Steel,
            &[ArmourMaterial::Cloth],
            1.0,
        )
        .unwrap();
        assert_eq!(set.len(), ARMOUR_SLOT_COUNT);
        assert!(set.iter().all(|piece| piece.material == ArmourMaterial::Steel));
        let slots: Vec<_> = set.iter().map(|piece| piece.armour_type).collect();
        assert_eq!(slots, ArmourType::ALL.to_vec());
    }

    #[test]
    fn test_zero_consistency_with_empty_pool_wears_nothing() {
        let config = GenerationConfig::default();
        let set = generate_armour_set(
            &mut create_rng(3),
            &config,
            2.0,
            ArmourMaterial::Steel,
            &[],
            0.0,
        )
        .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_loot_never_overdraws_budget() {
        let config = GenerationConfig::default();
        let mut rng = create_rng(12);
        for budget in [0.0, 5.0, 150.0, 1000.0] {
            let loot = generate_loot(&mut rng, &config, 50.0, budget, 1.0).unwrap();
            let total: f64 = loot.iter().map(|item| item.total_value() as f64).sum();
            assert!(total <= budget);
            for pair in loot.windows(2) {
                assert!(pair[0].rarity() >= pair[1].rarity());
            }
        }
    }

    #[test]
    fn test_loot_with_nothing_to_spend_is_empty() {
        let config = GenerationConfig::default();
        let loot = generate_loot(&mut create_rng(1), &config, 20.0, -4.0, 1.0).unwrap();
        assert!(loot.is_empty());
    }

    #[test]
    fn test_enemies_respect_budget_and_floor() {
        let config = GenerationConfig::for_testing(4);
        let mut rng = create_rng(4);
        let enemies = generate_enemies(&mut rng, &config, 20.0, 2000.0, 1.0).unwrap();
        let power: u32 = enemies.iter().map(Creature::power_level).sum();
        assert!(2000.0 - (power as f64) > 20.0);

        // Budget at or below the level means no draws at all
        let none = generate_enemies(&mut rng, &config, 20.0, 20.0, 1.0).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_target_rarity_floor() {
        let config = GenerationConfig::default();
        let mut rng = create_rng(9);
        for _ in 0..50 {
            assert!(target_rarity(&mut rng, &config, 0.5, 0.2) >= config.min_rarity);
        }
        assert_eq!(decay(&config, 0.15), config.min_distribution);
        assert!((decay(&config, 1.0) - 0.9).abs() < 1e-9);
    }
}

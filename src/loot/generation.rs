use rand::Rng;

use crate::core::config::LootConfig;
use crate::core::geometry::rand_weighted;
use crate::equipment::{EquipmentInfo, EquipmentKind, UpgradeStat, EQUIPMENT_CATALOG};

/// Equipment choices presented after one level-up.
#[derive(Debug, Clone, PartialEq)]
pub struct LootOffer {
    /// Level the player reached.
    pub level: u32,
    pub options: Vec<EquipmentInfo>,
}

/// Number of upgrade picks for one offered item. Index `i` of `weights` is the
/// weight of rolling `i + 1`; the result is never below one.
pub fn roll_upgrade_count(weights: &[f64], rng: &mut impl Rng) -> usize {
    rand_weighted(weights, rng).map_or(1, |index| index + 1)
}

/// `count` upgrade tags drawn with replacement from the variant's legal set.
pub fn roll_upgrades(kind: EquipmentKind, count: usize, rng: &mut impl Rng) -> Vec<UpgradeStat> {
    let legal = kind.legal_upgrades();
    if legal.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| legal[rng.gen_range(0..legal.len())])
        .collect()
}

/// Roll the options for one level-up.
///
/// Slot one reinforces a type the player already holds; every later slot is a
/// uniform pick from what is left of the catalog. Types never repeat within
/// one offer, so a small catalog yields fewer options.
pub fn generate_loot(
    held: &[EquipmentKind],
    held_levels: impl Fn(EquipmentKind) -> Option<u32>,
    config: &LootConfig,
    rng: &mut impl Rng,
) -> Vec<EquipmentInfo> {
    let mut pool: Vec<EquipmentKind> = EQUIPMENT_CATALOG.to_vec();
    let mut picks: Vec<EquipmentKind> = Vec::with_capacity(config.slots);

    let owned: Vec<EquipmentKind> = held
        .iter()
        .copied()
        .filter(|kind| pool.contains(kind))
        .collect();
    if !owned.is_empty() && config.slots > 0 {
        let favourite = owned[rng.gen_range(0..owned.len())];
        pool.retain(|kind| *kind != favourite);
        picks.push(favourite);
    }

    while picks.len() < config.slots && !pool.is_empty() {
        let index = rng.gen_range(0..pool.len());
        picks.push(pool.swap_remove(index));
    }

    picks
        .into_iter()
        .map(|kind| {
            let count = roll_upgrade_count(&config.upgrade_count_weights, rng);
            let mut info = kind.info();
            info.level = held_levels(kind).map_or(0, |level| level + 1);
            info.scaling = roll_upgrades(kind, count, rng);
            info
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn no_levels(_: EquipmentKind) -> Option<u32> {
        None
    }

    #[test]
    fn test_upgrade_count_is_at_least_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let count = roll_upgrade_count(&[60.0, 30.0, 10.0], &mut rng);
            assert!((1..=3).contains(&count));
        }
        assert_eq!(roll_upgrade_count(&[], &mut rng), 1);
    }

    #[test]
    fn test_upgrade_count_favours_small_counts() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut histogram = [0usize; 3];
        for _ in 0..3000 {
            histogram[roll_upgrade_count(&[60.0, 30.0, 10.0], &mut rng) - 1] += 1;
        }
        assert!(histogram[0] > histogram[1]);
        assert!(histogram[1] > histogram[2]);
    }

    #[test]
    fn test_upgrades_come_from_legal_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for kind in EQUIPMENT_CATALOG {
            let picks = roll_upgrades(kind, 20, &mut rng);
            assert_eq!(picks.len(), 20);
            assert!(picks.iter().all(|stat| kind.legal_upgrades().contains(stat)));
        }
    }

    #[test]
    fn test_first_slot_is_a_held_type() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let held = [EquipmentKind::Dart];
        for _ in 0..50 {
            let offer = generate_loot(&held, |_| Some(2), &LootConfig::default(), &mut rng);
            assert_eq!(offer[0].kind, EquipmentKind::Dart);
            assert_eq!(offer[0].level, 3);
        }
    }

    #[test]
    fn test_no_duplicates_within_one_offer() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            let offer = generate_loot(
                &[EquipmentKind::Dagger, EquipmentKind::Fan],
                no_levels,
                &LootConfig::default(),
                &mut rng,
            );
            assert_eq!(offer.len(), 3);
            let kinds: HashSet<EquipmentKind> = offer.iter().map(|info| info.kind).collect();
            assert_eq!(kinds.len(), 3);
            assert!(offer.iter().all(|info| !info.scaling.is_empty()));
        }
    }

    #[test]
    fn test_more_slots_than_catalog_degrades_gracefully() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let config = LootConfig {
            slots: 10,
            ..LootConfig::default()
        };
        let offer = generate_loot(&[], no_levels, &config, &mut rng);
        assert_eq!(offer.len(), EQUIPMENT_CATALOG.len());
        let kinds: HashSet<EquipmentKind> = offer.iter().map(|info| info.kind).collect();
        assert_eq!(kinds.len(), EQUIPMENT_CATALOG.len());
    }
}

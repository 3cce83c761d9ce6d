//! # Experience Calculator
//!
//! **Deterministic Reward Composition**
//!
//! This module implements the gathering XP formula with the following
//! constraints:
//!
//! - Pure function of its inputs - no I/O, no logging, no RNG
//! - Bounded output: every non-gated award lands in `[MIN_XP, MAX_XP]`
//! - Monotonic in the zone multiplier (within clamp bounds)
//! - Never panics, for any input combination
//!
//! ## The Formula
//!
//! ```text
//! raw = base_xp
//!     * skill_factor      (discrete tier table; fishing: tier + progress)
//!     * level_penalty     (symmetric band penalty, floor 0.4)
//!     * rarity_multiplier (Common 1.0 / Uncommon 1.25 / Rare 1.5)
//!     * zone_scale        (stored multiplier, halved in city zones)
//!
//! final = clamp(round(raw), MIN_XP, MAX_XP)
//! ```
//!
//! A character at or past [`MAX_GATHER_LEVEL`] earns nothing; that is the
//! only zero this function produces. The profession gate and the
//! "not a gathering item" short-circuit are the caller's responsibility.

use crate::types::{GatheringDefinition, Profession};

/// Character level at which gathering stops paying XP.
pub const MAX_GATHER_LEVEL: u32 = 80;

/// Floor for any non-gated award.
pub const MIN_XP: u32 = 10;

/// Single global ceiling for any award. Historical tuning drifted between
/// 300 and 25000; this codebase uses exactly one value everywhere.
pub const MAX_XP: u32 = 2500;

/// Width of one full skill tier. Tier boundaries inside a tier sit at
/// thirds of this (25-point bands).
pub const TIER_SIZE: u16 = 75;

/// Required-skill ceiling for the basic-material carve-out: trivial
/// gathering of low-end materials keeps the "easy" rate instead of
/// dropping to the trivial one.
const BASIC_MATERIAL_SKILL_CAP: u16 = 150;

/// Band table for inferring a material's natural character level from its
/// base XP. Descending, first match wins.
const LEVEL_BANDS: [(u32, u32); 6] = [
    (600, 70), // Northrend
    (500, 60), // Outland
    (400, 50), // high vanilla
    (300, 40), // mid-high vanilla
    (200, 30), // mid vanilla
    (100, 20), // low vanilla
];

/// Recommended level for materials below every band threshold.
const BEGINNER_LEVEL: u32 = 10;

/// Reward loss per level of distance from the material's band.
const LEVEL_PENALTY_RATE: f64 = 0.03;

/// Floor of the band penalty.
const LEVEL_PENALTY_FLOOR: f64 = 0.4;

/// Cap of the continuous fishing tier multiplier.
const FISHING_TIER_CAP: f64 = 1.4;

/// Per-tier step of the continuous fishing multiplier.
const FISHING_TIER_STEP: f64 = 0.1;

/// Cap of the additive fishing progress bonus.
const FISHING_PROGRESS_CAP: f64 = 0.3;

/// Skill divisor for the fishing progress bonus.
const FISHING_PROGRESS_DIVISOR: f64 = 450.0;

/// Skill-relative difficulty band for non-fishing professions.
///
/// Mirrors the in-game gathering-node colors, which is how operators talk
/// about these bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillTier {
    /// Skill below the requirement - minimal reward, never zero.
    TooLow,
    /// Within the first third past the requirement - best reward.
    Challenging,
    /// Second third - normal reward.
    Moderate,
    /// Final third - reduced reward.
    Easy,
    /// A full tier or more past the requirement.
    Trivial,
}

impl SkillTier {
    /// Classifies `current_skill` against `required_skill`.
    #[must_use]
    pub fn classify(current_skill: u16, required_skill: u16) -> Self {
        if current_skill < required_skill {
            return Self::TooLow;
        }
        let third = TIER_SIZE / 3;
        let over = current_skill - required_skill;
        if over < third {
            Self::Challenging
        } else if over < third * 2 {
            Self::Moderate
        } else if over < TIER_SIZE {
            Self::Easy
        } else {
            Self::Trivial
        }
    }

    /// Reward multiplier for this band.
    ///
    /// `required_skill` feeds the basic-material carve-out: trivial
    /// gathering of materials requiring 150 skill or less pays the easy
    /// rate, so fresh characters levelling a second profession are not
    /// starved on starter ores and herbs.
    #[must_use]
    pub fn multiplier(self, required_skill: u16) -> f64 {
        match self {
            Self::TooLow => 0.1,
            Self::Challenging => 1.2,
            Self::Moderate => 1.0,
            Self::Easy => 0.8,
            Self::Trivial => {
                if required_skill <= BASIC_MATERIAL_SKILL_CAP {
                    0.8
                } else {
                    0.5
                }
            }
        }
    }

}

/// Infers the character level a material is tuned for from its base XP.
///
/// Descending threshold table, first match wins; thresholds are inclusive.
#[must_use]
pub fn recommended_level(base_xp: u32) -> u32 {
    for (threshold, level) in LEVEL_BANDS {
        if base_xp >= threshold {
            return level;
        }
    }
    BEGINNER_LEVEL
}

/// Symmetric band penalty: 3% per level of distance from the material's
/// recommended level, floored at 0.4. Applies in both directions.
#[must_use]
pub fn level_penalty(character_level: u32, recommended: u32) -> f64 {
    let diff = f64::from(character_level.abs_diff(recommended));
    (1.0 - LEVEL_PENALTY_RATE * diff).max(LEVEL_PENALTY_FLOOR)
}

/// Continuous fishing tier multiplier: +0.1 per 75 skill, capped at 1.4.
///
/// Fishing catches carry no meaningful required skill, so the discrete
/// tier table does not apply.
#[must_use]
pub fn fishing_tier_multiplier(current_skill: u16) -> f64 {
    let tier = f64::from(current_skill / TIER_SIZE);
    (1.0 + FISHING_TIER_STEP * tier).min(FISHING_TIER_CAP)
}

/// Additive fishing progress bonus: `min(0.3, skill / 450)`.
#[must_use]
pub fn fishing_progress_bonus(current_skill: u16) -> f64 {
    (f64::from(current_skill) / FISHING_PROGRESS_DIVISOR).min(FISHING_PROGRESS_CAP)
}

/// Computes the XP award for one gather.
///
/// `zone_scale` is the effective zone factor - the stored multiplier with
/// the city penalty already folded in (see `Catalog::zone_scale`).
///
/// Returns `0` only when `character_level >= MAX_GATHER_LEVEL`; every
/// other input lands in `[MIN_XP, MAX_XP]`. The caller is responsible for
/// the profession gate and for rejecting unknown items; this function
/// assumes `def` came out of a loaded catalog (`base_xp > 0`).
#[must_use]
pub fn calculate(
    def: &GatheringDefinition,
    current_skill: u16,
    character_level: u32,
    zone_scale: f32,
) -> u32 {
    if character_level >= MAX_GATHER_LEVEL {
        return 0;
    }

    let skill_factor = if def.profession == Profession::Fishing {
        fishing_tier_multiplier(current_skill) + fishing_progress_bonus(current_skill)
    } else {
        SkillTier::classify(current_skill, def.required_skill).multiplier(def.required_skill)
    };

    let penalty = level_penalty(character_level, recommended_level(def.base_xp));

    let raw = f64::from(def.base_xp)
        * skill_factor
        * penalty
        * f64::from(def.rarity.multiplier())
        * f64::from(zone_scale);

    // Round-to-nearest before clamping; truncation would make boundary
    // values depend on float representation noise.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = raw.round().max(0.0) as u32;
    rounded.clamp(MIN_XP, MAX_XP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RarityTier;

    fn mining_def(base_xp: u32, required_skill: u16) -> GatheringDefinition {
        GatheringDefinition {
            base_xp,
            required_skill,
            profession: Profession::Mining,
            name: "Test Ore".to_string(),
            rarity: RarityTier::Common,
        }
    }

    fn fishing_def(base_xp: u32) -> GatheringDefinition {
        GatheringDefinition {
            base_xp,
            required_skill: 1,
            profession: Profession::Fishing,
            name: "Test Fish".to_string(),
            rarity: RarityTier::Common,
        }
    }

    #[test]
    fn test_level_cap_pays_nothing() {
        let def = mining_def(400, 200);
        assert_eq!(calculate(&def, 225, MAX_GATHER_LEVEL, 1.0), 0);
        assert_eq!(calculate(&def, 225, MAX_GATHER_LEVEL + 5, 1.0), 0);
        assert_ne!(calculate(&def, 225, MAX_GATHER_LEVEL - 1, 1.0), 0);
    }

    #[test]
    fn test_output_always_bounded() {
        // Sweep a coarse grid of inputs; everything below the level cap
        // must land inside the clamp bounds.
        for base_xp in [1u32, 50, 400, 1125, 100_000] {
            for skill in [0u16, 1, 150, 225, 450] {
                for level in [1u32, 10, 40, 79] {
                    for zone in [0.1f32, 1.0, 2.0, 10.0] {
                        let def = mining_def(base_xp, 200);
                        let xp = calculate(&def, skill, level, zone);
                        assert!(
                            (MIN_XP..=MAX_XP).contains(&xp),
                            "xp {xp} out of bounds for base={base_xp} skill={skill} level={level} zone={zone}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_skill_tier_boundaries() {
        // required = 200, thirds at 225 / 250 / 275.
        assert_eq!(SkillTier::classify(199, 200), SkillTier::TooLow);
        assert_eq!(SkillTier::classify(200, 200), SkillTier::Challenging);
        assert_eq!(SkillTier::classify(224, 200), SkillTier::Challenging);
        assert_eq!(SkillTier::classify(225, 200), SkillTier::Moderate);
        assert_eq!(SkillTier::classify(249, 200), SkillTier::Moderate);
        assert_eq!(SkillTier::classify(250, 200), SkillTier::Easy);
        assert_eq!(SkillTier::classify(274, 200), SkillTier::Easy);
        assert_eq!(SkillTier::classify(275, 200), SkillTier::Trivial);
    }

    #[test]
    fn test_sub_required_skill_pays_minimum_not_zero() {
        let def = mining_def(400, 200);
        let xp = calculate(&def, 50, 50, 1.0);
        // 400 * 0.1, level on-band, neutral zone.
        assert_eq!(xp, 40, "gray gathering pays a tenth, not zero");
    }

    #[test]
    fn test_trivial_carve_out_for_basic_materials() {
        // Copper-grade requirement: trivial pays the easy rate.
        assert!((SkillTier::Trivial.multiplier(1) - 0.8).abs() < f64::EPSILON);
        assert!((SkillTier::Trivial.multiplier(150) - 0.8).abs() < f64::EPSILON);
        // Past the carve-out cap, trivial drops to half rate.
        assert!((SkillTier::Trivial.multiplier(151) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_level_band_inference() {
        assert_eq!(recommended_level(600), 70);
        assert_eq!(recommended_level(599), 60);
        assert_eq!(recommended_level(500), 60);
        assert_eq!(recommended_level(400), 50);
        assert_eq!(recommended_level(300), 40);
        assert_eq!(recommended_level(200), 30);
        assert_eq!(recommended_level(100), 20);
        assert_eq!(recommended_level(99), 10);
        assert_eq!(recommended_level(1), 10);
    }

    #[test]
    fn test_level_penalty_symmetric_with_floor() {
        assert!((level_penalty(50, 50) - 1.0).abs() < 1e-9);
        // 10 levels either side: 0.7.
        assert!((level_penalty(60, 50) - 0.7).abs() < 1e-9);
        assert!((level_penalty(40, 50) - 0.7).abs() < 1e-9);
        // Far out: floored at 0.4.
        assert!((level_penalty(1, 70) - 0.4).abs() < 1e-9);
        assert!((level_penalty(79, 10) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_fishing_tier_and_progress() {
        assert!((fishing_tier_multiplier(0) - 1.0).abs() < 1e-9);
        assert!((fishing_tier_multiplier(74) - 1.0).abs() < 1e-9);
        assert!((fishing_tier_multiplier(75) - 1.1).abs() < 1e-9);
        assert!((fishing_tier_multiplier(300) - 1.4).abs() < 1e-9);
        // Cap holds past 300.
        assert!((fishing_tier_multiplier(450) - 1.4).abs() < 1e-9);

        assert!((fishing_progress_bonus(0) - 0.0).abs() < 1e-9);
        assert!((fishing_progress_bonus(90) - 0.2).abs() < 1e-9);
        assert!((fishing_progress_bonus(135) - 0.3).abs() < 1e-9);
        // Cap holds past 135.
        assert!((fishing_progress_bonus(450) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_zone_multiplier_monotonic() {
        let def = mining_def(400, 200);
        let mut last = 0;
        for zone in [0.5f32, 1.0, 1.5, 2.0, 3.0] {
            let xp = calculate(&def, 210, 50, zone);
            assert!(xp >= last, "zone {zone} decreased the award");
            last = xp;
        }
    }

    #[test]
    fn test_rarity_weights_reward() {
        let mut def = mining_def(400, 200);
        let common = calculate(&def, 210, 50, 1.0);
        def.rarity = RarityTier::Uncommon;
        let uncommon = calculate(&def, 210, 50, 1.0);
        def.rarity = RarityTier::Rare;
        let rare = calculate(&def, 210, 50, 1.0);
        assert!(common < uncommon && uncommon < rare);
        assert_eq!(uncommon, common + common / 4);
    }

    #[test]
    fn test_scenario_mining_moderate_tier() {
        // base 400 / required 200, skill 225 (moderate tier, x1.0),
        // level 60 vs recommended 50 (diff 10, penalty 0.7),
        // common rarity, neutral non-city zone.
        let def = mining_def(400, 200);
        let xp = calculate(&def, 225, 60, 1.0);
        assert_eq!(xp, 280);
    }

    #[test]
    fn test_scenario_fishing_city_zone() {
        // base 600 (Northrend band), skill 300: tier 1.4 + progress 0.3.
        // City with stored multiplier 2.0 scales to 2.0 * 0.5 = 1.0.
        // Level 70 matches the band, no penalty.
        let def = fishing_def(600);
        let city_scale = 2.0 * 0.5;
        let xp = calculate(&def, 300, 70, city_scale);
        assert_eq!(xp, 1020);
    }

    #[test]
    fn test_city_never_beats_equal_open_zone() {
        let def = mining_def(400, 200);
        for mult in [0.5f32, 1.0, 2.0, 4.0] {
            let open = calculate(&def, 210, 50, mult);
            let city = calculate(&def, 210, 50, mult * 0.5);
            assert!(city <= open);
        }
    }

    #[test]
    fn test_clamp_floors_tiny_awards() {
        // 1 base XP in a punishing zone still pays the minimum.
        let def = mining_def(1, 1);
        assert_eq!(calculate(&def, 450, 79, 0.1), MIN_XP);
    }

    #[test]
    fn test_clamp_caps_huge_awards() {
        let mut def = mining_def(100_000, 1);
        def.rarity = RarityTier::Rare;
        assert_eq!(calculate(&def, 1, 10, 10.0), MAX_XP);
    }
}

//! # Domain Types
//!
//! The static reference-data records everything else computes from.
//!
//! Storage encodes professions and rarity tiers as small integers; the
//! `from_u8` constructors here are the single place those encodings are
//! interpreted.

use serde::{Deserialize, Serialize};

/// Item identifier as the host engine knows it.
pub type ItemId = u32;

/// Zone identifier as the host engine knows it.
pub type ZoneId = u32;

/// Gathering profession family.
///
/// Discriminants match the storage encoding (`1..=4`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Profession {
    /// Ore, stone, and gems.
    Mining = 1,
    /// Herbs and plants.
    Herbalism = 2,
    /// Leather, hides, and scales.
    Skinning = 3,
    /// Fish and other catches.
    Fishing = 4,
}

/// All professions, in storage-id order.
pub const ALL_PROFESSIONS: [Profession; 4] = [
    Profession::Mining,
    Profession::Herbalism,
    Profession::Skinning,
    Profession::Fishing,
];

impl Profession {
    /// Converts the storage encoding to a profession.
    ///
    /// Returns `None` for ids outside `1..=4`; the loader treats such rows
    /// as invalid rather than guessing.
    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Mining),
            2 => Some(Self::Herbalism),
            3 => Some(Self::Skinning),
            4 => Some(Self::Fishing),
            _ => None,
        }
    }

    /// Display name, as used in the settings table and admin output.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mining => "Mining",
            Self::Herbalism => "Herbalism",
            Self::Skinning => "Skinning",
            Self::Fishing => "Fishing",
        }
    }

    /// Parses a profession from admin input, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mining" => Some(Self::Mining),
            "herbalism" => Some(Self::Herbalism),
            "skinning" => Some(Self::Skinning),
            "fishing" => Some(Self::Fishing),
            _ => None,
        }
    }

    /// Index into per-profession flag arrays (`0..=3`).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

/// Rarity tier for gathered materials.
///
/// Discriminants match the storage encoding (`0..=2`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RarityTier {
    /// Common materials - no reward weighting.
    #[default]
    Common = 0,
    /// Uncommon materials - +25% reward.
    Uncommon = 1,
    /// Rare materials - +50% reward.
    Rare = 2,
}

impl RarityTier {
    /// Converts the storage encoding to a tier.
    ///
    /// Anything outside `0..=2` falls back to `Common`, the same default
    /// applied when the column is absent entirely.
    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Uncommon,
            2 => Self::Rare,
            _ => Self::Common,
        }
    }

    /// Reward multiplier for this tier.
    #[inline]
    #[must_use]
    pub const fn multiplier(self) -> f32 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 1.25,
            Self::Rare => 1.5,
        }
    }

    /// Display name for admin output.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
        }
    }

    /// Parses a tier from admin input: a name or the storage id.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "common" | "0" => Some(Self::Common),
            "uncommon" | "1" => Some(Self::Uncommon),
            "rare" | "2" => Some(Self::Rare),
            _ => None,
        }
    }
}

/// The static reward/requirement record for one gatherable item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GatheringDefinition {
    /// Tuning constant - source of truth for reward magnitude. Always `> 0`
    /// in a loaded catalog; the loader rejects zero rows.
    pub base_xp: u32,
    /// Skill value at which the material is "appropriate".
    pub required_skill: u16,
    /// Owning profession family.
    pub profession: Profession,
    /// Display name, non-authoritative.
    pub name: String,
    /// Rarity weighting; `Common` when absent from storage.
    #[serde(default)]
    pub rarity: RarityTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profession_storage_round_trip() {
        for prof in ALL_PROFESSIONS {
            assert_eq!(Profession::from_u8(prof as u8), Some(prof));
        }
        assert_eq!(Profession::from_u8(0), None);
        assert_eq!(Profession::from_u8(5), None);
    }

    #[test]
    fn test_profession_parse_case_insensitive() {
        assert_eq!(Profession::parse("mining"), Some(Profession::Mining));
        assert_eq!(Profession::parse("FISHING"), Some(Profession::Fishing));
        assert_eq!(Profession::parse("Herbalism"), Some(Profession::Herbalism));
        assert_eq!(Profession::parse("smelting"), None);
    }

    #[test]
    fn test_rarity_defaults_to_common() {
        assert_eq!(RarityTier::from_u8(0), RarityTier::Common);
        assert_eq!(RarityTier::from_u8(7), RarityTier::Common);
        assert_eq!(RarityTier::default(), RarityTier::Common);
    }

    #[test]
    fn test_rarity_multipliers_ascend() {
        assert!(RarityTier::Common.multiplier() < RarityTier::Uncommon.multiplier());
        assert!(RarityTier::Uncommon.multiplier() < RarityTier::Rare.multiplier());
    }

    #[test]
    fn test_definition_rarity_absent_in_serialized_form() {
        // Rows written before the rarity column existed must still parse.
        let row = r#"
            base_xp = 400
            required_skill = 200
            profession = "Mining"
            name = "Thorium Ore"
        "#;
        let def: GatheringDefinition = toml::from_str(row).unwrap();
        assert_eq!(def.rarity, RarityTier::Common);
    }
}

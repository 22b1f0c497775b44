use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::typing::ElementType;

/// Closed set of status and volatile conditions. Monster-scoped unless noted;
/// side- and field-scoped conditions share the same lifecycle but are ticked
/// once per full turn by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    // Primary statuses, mutually exclusive.
    Poison,
    Toxic,
    Burn,
    Freeze,
    Paralysis,
    Sleep,

    // Damaging or healing volatiles.
    Confusion,
    Curse,
    Nightmare,
    LeechSeed,
    Ingrain,
    AquaRing,
    Octolock,
    SaltCure,

    // Action gates.
    Flinch,
    Infatuation,
    Drowsy,
    Taunt,
    Embargo,
    Torment,
    Disable,
    Encore,
    HealBlock,
    Imprison,

    // Trapping.
    Trapped,
    MeanLook,
    Block,
    FairyLock,

    // Countdowns and banked effects.
    PerishSong,
    Wish,
    /// Side-scoped: a sacrificed monster's full heal, paid to the next
    /// monster its side sends out.
    HealingWish,
    Stockpile,
    Yawn,

    // Single-turn protections.
    Protect,
    Detect,
    Endure,
    MaxGuard,
    Obstruct,
    SilkTrap,
    SpikyShield,
    BanefulBunker,
    BurningBulwark,
    MagicCoat,
    Snatch,
    Powder,
    FollowMe,
    RagePowder,
    Spotlight,

    // Self-targeted setups.
    Charge,
    LaserFocus,
    LockOn,
    MindReader,
    DestinyBond,
    Grudge,
    Substitute,
    MagnetRise,
    Telekinesis,
    Electrify,
    TarShot,
    GastroAcid,
    Foresight,
    OdorSleuth,
    MiracleEye,
    HelpingHand,
    Quash,
    TrickOrTreat,
    ForestsCurse,
    MagicPowder,

    // Team/side-scoped screens and guards.
    Reflect,
    LightScreen,
    AuroraVeil,
    Safeguard,
    Mist,
    Tailwind,
    LuckyChant,
    CraftyShield,
    QuickGuard,
    WideGuard,
    MatBlock,

    // Entry hazards, side-scoped, stacking where noted.
    Spikes,
    ToxicSpikes,
    StealthRock,
    StickyWeb,

    // Battle-scoped room/field toggles.
    TrickRoom,
    MagicRoom,
    WonderRoom,
    Gravity,
    MudSport,
    WaterSport,
    IonDeluge,
    HappyHour,
}

/// Probability model for an act-prevention check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prevention {
    /// Always prevents the action (sleep, freeze, flinch); `escape_chance`
    /// is the per-turn roll to shake the condition off early.
    Hard { escape_chance: f64 },
    /// Prevents with the given probability each attempt.
    Roll { fail_chance: f64 },
}

impl StatusEffect {
    pub fn parse(name: &str) -> Option<StatusEffect> {
        serde_json::from_value(serde_json::Value::String(name.trim().to_ascii_lowercase())).ok()
    }

    pub fn name(&self) -> String {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(s)) => s,
            _ => format!("{self:?}").to_ascii_lowercase(),
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            StatusEffect::Poison => "poisoned",
            StatusEffect::Toxic => "badly poisoned",
            StatusEffect::Burn => "burned",
            StatusEffect::Freeze => "frozen",
            StatusEffect::Paralysis => "paralyzed",
            StatusEffect::Sleep => "asleep",
            StatusEffect::Confusion => "confused",
            StatusEffect::Curse => "cursed",
            StatusEffect::Nightmare => "trapped in a nightmare",
            StatusEffect::LeechSeed => "seeded",
            StatusEffect::Infatuation => "infatuated",
            StatusEffect::Flinch => "flinching",
            StatusEffect::Drowsy => "drowsy",
            StatusEffect::Taunt => "taunted",
            StatusEffect::Embargo => "under embargo",
            StatusEffect::Torment => "tormented",
            StatusEffect::Trapped => "trapped",
            StatusEffect::PerishSong => "doomed by Perish Song",
            _ => "affected",
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(
            self,
            StatusEffect::Poison
                | StatusEffect::Toxic
                | StatusEffect::Burn
                | StatusEffect::Freeze
                | StatusEffect::Paralysis
                | StatusEffect::Sleep
        )
    }

    /// Damage-over-time divisor against max HP, where applicable.
    /// Nightmare only ticks while the owner is asleep; leech seed drains to
    /// the seeder. Both are handled by the engine's processing pass.
    pub fn dot_divisor(&self) -> Option<u32> {
        match self {
            StatusEffect::Poison => Some(8),
            StatusEffect::Toxic => Some(16),
            StatusEffect::Burn => Some(16),
            StatusEffect::Curse => Some(4),
            StatusEffect::Nightmare => Some(4),
            StatusEffect::LeechSeed => Some(8),
            StatusEffect::SaltCure => Some(8),
            _ => None,
        }
    }

    /// Healing-over-time divisor against max HP.
    pub fn heal_divisor(&self) -> Option<u32> {
        match self {
            StatusEffect::Ingrain => Some(16),
            StatusEffect::AquaRing => Some(16),
            _ => None,
        }
    }

    pub fn prevention(&self) -> Option<Prevention> {
        match self {
            StatusEffect::Paralysis => Some(Prevention::Roll { fail_chance: 0.25 }),
            StatusEffect::Sleep => Some(Prevention::Hard { escape_chance: 0.33 }),
            StatusEffect::Freeze => Some(Prevention::Hard { escape_chance: 0.20 }),
            StatusEffect::Flinch => Some(Prevention::Hard { escape_chance: 0.0 }),
            StatusEffect::Infatuation => Some(Prevention::Roll { fail_chance: 0.5 }),
            _ => None,
        }
    }

    /// Default duration in turns when the applier does not override it.
    /// -1 means indefinite (removed only by an explicit trigger or cure).
    pub fn default_duration(&self) -> i32 {
        match self {
            StatusEffect::Poison | StatusEffect::Burn | StatusEffect::Paralysis => 3,
            StatusEffect::Toxic => 4,
            StatusEffect::Sleep | StatusEffect::Freeze => 2,
            StatusEffect::Confusion => 3,
            StatusEffect::Flinch => 1,
            StatusEffect::Infatuation => 3,
            StatusEffect::Drowsy | StatusEffect::Yawn => 1,
            StatusEffect::PerishSong => 3,
            StatusEffect::Wish => 1,
            StatusEffect::Taunt => 3,
            StatusEffect::Encore => 3,
            StatusEffect::Disable => 4,
            StatusEffect::Embargo
            | StatusEffect::Torment
            | StatusEffect::HealBlock
            | StatusEffect::Trapped
            | StatusEffect::MagnetRise => 5,
            StatusEffect::Telekinesis => 3,
            StatusEffect::Reflect
            | StatusEffect::LightScreen
            | StatusEffect::AuroraVeil
            | StatusEffect::Safeguard
            | StatusEffect::Mist
            | StatusEffect::LuckyChant
            | StatusEffect::TrickRoom
            | StatusEffect::MagicRoom
            | StatusEffect::WonderRoom
            | StatusEffect::Gravity
            | StatusEffect::MudSport
            | StatusEffect::WaterSport => 5,
            StatusEffect::Tailwind => 4,
            StatusEffect::Protect
            | StatusEffect::Detect
            | StatusEffect::Endure
            | StatusEffect::MaxGuard
            | StatusEffect::Obstruct
            | StatusEffect::SilkTrap
            | StatusEffect::SpikyShield
            | StatusEffect::BanefulBunker
            | StatusEffect::BurningBulwark
            | StatusEffect::MagicCoat
            | StatusEffect::Snatch
            | StatusEffect::Powder
            | StatusEffect::FollowMe
            | StatusEffect::RagePowder
            | StatusEffect::Spotlight
            | StatusEffect::Charge
            | StatusEffect::LaserFocus
            | StatusEffect::LockOn
            | StatusEffect::MindReader
            | StatusEffect::DestinyBond
            | StatusEffect::Grudge
            | StatusEffect::Quash
            | StatusEffect::HelpingHand
            | StatusEffect::CraftyShield
            | StatusEffect::QuickGuard
            | StatusEffect::WideGuard
            | StatusEffect::MatBlock
            | StatusEffect::FairyLock
            | StatusEffect::IonDeluge => 1,
            _ => -1,
        }
    }

    /// Stack cap for stackable conditions; 1 for everything else.
    pub fn max_stacks(&self) -> u8 {
        match self {
            StatusEffect::Stockpile => 3,
            StatusEffect::Spikes => 3,
            StatusEffect::ToxicSpikes => 2,
            _ => 1,
        }
    }

    pub fn is_stackable(&self) -> bool {
        self.max_stacks() > 1
    }

    /// Single-turn protections that block incoming moves.
    pub fn is_protection(&self) -> bool {
        matches!(
            self,
            StatusEffect::Protect
                | StatusEffect::Detect
                | StatusEffect::Endure
                | StatusEffect::MaxGuard
                | StatusEffect::Obstruct
                | StatusEffect::SilkTrap
                | StatusEffect::SpikyShield
                | StatusEffect::BanefulBunker
                | StatusEffect::BurningBulwark
        )
    }

    /// Conditions owned by a team side rather than one monster.
    pub fn is_side_scoped(&self) -> bool {
        matches!(
            self,
            StatusEffect::Reflect
                | StatusEffect::LightScreen
                | StatusEffect::AuroraVeil
                | StatusEffect::Safeguard
                | StatusEffect::Mist
                | StatusEffect::Tailwind
                | StatusEffect::LuckyChant
                | StatusEffect::CraftyShield
                | StatusEffect::QuickGuard
                | StatusEffect::WideGuard
                | StatusEffect::MatBlock
                | StatusEffect::Spikes
                | StatusEffect::ToxicSpikes
                | StatusEffect::StealthRock
                | StatusEffect::StickyWeb
                | StatusEffect::HealingWish
        )
    }

    /// Conditions owned by the battle as a whole.
    pub fn is_battle_scoped(&self) -> bool {
        matches!(
            self,
            StatusEffect::TrickRoom
                | StatusEffect::MagicRoom
                | StatusEffect::WonderRoom
                | StatusEffect::Gravity
                | StatusEffect::MudSport
                | StatusEffect::WaterSport
                | StatusEffect::IonDeluge
                | StatusEffect::FairyLock
                | StatusEffect::HappyHour
        )
    }

    pub fn prevents_switch(&self) -> bool {
        matches!(
            self,
            StatusEffect::Trapped
                | StatusEffect::MeanLook
                | StatusEffect::Block
                | StatusEffect::Ingrain
                | StatusEffect::Octolock
                | StatusEffect::FairyLock
        )
    }
}

/// One live condition on a monster, side, or the battle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusInstance {
    pub effect: StatusEffect,
    /// -1 is the "until condition" sentinel and never decrements.
    pub turns_remaining: i32,
    pub stacks: u8,
    /// Banked heal amount for delayed healing (Wish).
    #[serde(default)]
    pub banked_heal: u32,
    /// Beneficiary of drained HP (Leech Seed).
    #[serde(default)]
    pub source: Option<Uuid>,
}

impl StatusInstance {
    pub fn new(effect: StatusEffect, turns: i32) -> Self {
        StatusInstance {
            effect,
            turns_remaining: turns,
            stacks: 1,
            banked_heal: 0,
            source: None,
        }
    }
}

/// On-hit status chance keyed by the attacking move's type. Skipped when the
/// defender shares the attacking type.
pub fn type_status_chance(move_type: ElementType) -> Option<(StatusEffect, f64, i32)> {
    match move_type {
        ElementType::Fire => Some((StatusEffect::Burn, 0.10, 3)),
        ElementType::Poison => Some((StatusEffect::Poison, 0.10, 3)),
        ElementType::Ice => Some((StatusEffect::Freeze, 0.10, 2)),
        ElementType::Electric => Some((StatusEffect::Paralysis, 0.10, 3)),
        ElementType::Psychic | ElementType::Ghost => Some((StatusEffect::Confusion, 0.10, 3)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_round_trips_snake_case_names() {
        assert_eq!(StatusEffect::parse("leech_seed"), Some(StatusEffect::LeechSeed));
        assert_eq!(StatusEffect::parse("toxic"), Some(StatusEffect::Toxic));
        assert_eq!(StatusEffect::parse("perish_song"), Some(StatusEffect::PerishSong));
        assert_eq!(StatusEffect::parse("definitely_not_real"), None);
        assert_eq!(StatusEffect::Stockpile.name(), "stockpile");
    }

    #[test]
    fn primary_set_is_exactly_six() {
        let all_primary = [
            StatusEffect::Poison,
            StatusEffect::Toxic,
            StatusEffect::Burn,
            StatusEffect::Freeze,
            StatusEffect::Paralysis,
            StatusEffect::Sleep,
        ];
        for effect in all_primary {
            assert!(effect.is_primary());
        }
        assert!(!StatusEffect::Confusion.is_primary());
        assert!(!StatusEffect::Flinch.is_primary());
    }

    #[test]
    fn stack_caps_match_declared_limits() {
        assert_eq!(StatusEffect::Stockpile.max_stacks(), 3);
        assert_eq!(StatusEffect::Spikes.max_stacks(), 3);
        assert_eq!(StatusEffect::ToxicSpikes.max_stacks(), 2);
        assert_eq!(StatusEffect::Burn.max_stacks(), 1);
    }

    #[test]
    fn protection_set_membership() {
        assert!(StatusEffect::SpikyShield.is_protection());
        assert!(StatusEffect::BanefulBunker.is_protection());
        assert!(!StatusEffect::Reflect.is_protection());
    }
}

use crate::combat::state::{Terrain, Weather};
use crate::stats::StatName;
use crate::status::StatusEffect;

/// Who a status move's effect lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    User,
    Target,
    AllOpponents,
}

/// Extra behavior attached to some stat moves that plain stage deltas can't
/// express.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatSpecial {
    /// Halve the user's HP, maximize Attack.
    BellyDrum,
    /// Reset every monster's stages.
    Haze,
    /// Invert the target's stages.
    TopsyTurvy,
    /// Swap stage sets between user and target.
    HeartSwap,
    /// Copy the target's stages onto the user.
    PsychUp,
    /// Raise one random stat by two stages.
    Acupressure,
    /// The user leaves the field after the boost lands.
    SwitchOut,
    /// The user faints after the debuff lands.
    UserFaints,
    /// The boost costs this fraction of the user's max HP.
    HpCost(f64),
    /// Attach a condition to the target alongside the stage change.
    AfflictTarget { effect: StatusEffect, turns: i32 },
    /// Attach a condition to the user alongside the stage change.
    AfflictUser { effect: StatusEffect, turns: i32 },
}

/// A pure stat-stage move.
#[derive(Debug, Clone, Copy)]
pub struct StatMove {
    pub target: MoveTarget,
    pub changes: &'static [(StatName, i8)],
    pub message: &'static str,
    pub special: Option<StatSpecial>,
}

/// Precondition gating an affliction move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfflictionGate {
    /// Attract only works across genders; treated as a coin flip here since
    /// snapshots carry no gender.
    OppositeGender,
    /// Dream Eater style moves need a sleeping target.
    TargetAsleep,
    /// Psycho Shift moves the user's primary status onto the target.
    TransferPrimary,
}

/// A move whose whole point is applying a status condition.
#[derive(Debug, Clone, Copy)]
pub struct AfflictionMove {
    pub status: StatusEffect,
    pub target: MoveTarget,
    pub turns: i32,
    pub message: &'static str,
    pub gate: Option<AfflictionGate>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealAmount {
    /// Fraction of the beneficiary's max HP.
    Ratio(f64),
    Full,
    /// Synthesis family: 66% in sun, 50% under clear skies, 25% otherwise.
    WeatherScaled,
    /// Banked as a Wish; lands after the listed delay.
    Delayed { ratio: f64, turns: i32 },
    /// Swallow: 25% per consumed Stockpile stack, 100% at three.
    StockpileScaled,
}

#[derive(Debug, Clone, Copy)]
pub struct HealingMove {
    pub amount: HealAmount,
    pub target: MoveTarget,
    pub cures_primary: bool,
    /// Rest: the user sleeps for the listed turns after healing.
    pub self_sleep_turns: Option<i32>,
    /// Healing Wish, Lunar Dance: the user faints to heal its replacement.
    pub user_faints: bool,
    pub message: &'static str,
}

/// Everything in the grab-bag family: weather, terrain, screens, hazards,
/// protections, traps, and one-off effects.
#[derive(Debug, Clone, Copy)]
pub enum FieldAction {
    Weather(Weather),
    Terrain(Terrain),
    /// Screens, guards, Tailwind; lands on the user's side.
    TeamEffect { effect: StatusEffect, turns: i32 },
    /// Entry hazard on the opposing side.
    Hazard(StatusEffect),
    /// Trick Room and friends; battle-scoped.
    RoomEffect { effect: StatusEffect, turns: i32 },
    /// Single-turn protection on the user.
    Protection(StatusEffect),
    /// Attach a condition to the user or the target.
    Condition {
        effect: StatusEffect,
        turns: i32,
        on_user: bool,
    },
    /// Whirlwind, Roar.
    ForceSwitch,
    /// Defog: clear both sides' hazards and lower the target's evasion.
    ClearHazards,
    /// Pain Split handled as a healing special in execution.
    PainSplit,
    /// Perish Song marks every active monster.
    PerishSong,
    /// Substitute costs a quarter of max HP.
    Substitute,
    /// Splash, Celebrate.
    Nothing,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldMove {
    pub action: FieldAction,
    pub message: &'static str,
}

/// Modifiers for damaging moves with riders.
#[derive(Debug, Clone, Copy)]
pub enum SpecialDamageEffect {
    /// Heal the user for this fraction of damage dealt.
    Drain(f64),
    /// Roll a hit count in [min, max].
    MultiHit { min: u32, max: u32 },
    /// Chance to flinch the target on hit.
    FlinchChance(f64),
    /// First use charges; the hit lands on the next action.
    TwoTurn { charge_message: &'static str },
    /// Recoil to the user as a fraction of damage dealt.
    Recoil(f64),
}

#[derive(Debug, Clone, Copy)]
pub struct SpecialDamageMove {
    pub effect: SpecialDamageEffect,
}

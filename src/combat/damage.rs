//! Damage pipeline for attacking moves.

use rand::Rng;
use tracing::debug;

use crate::combat::state::{BattleMonster, FieldState, SideState, Terrain, Weather};
use crate::moves::{Move, MoveCategory};
use crate::stats::{effective_stat, StatName};
use crate::status::StatusEffect;
use crate::typing::{type_effectiveness, ElementType};

const CRIT_CHANCE: f64 = 1.0 / 16.0;
const CRIT_MULTIPLIER: f64 = 1.5;
const STAB_MULTIPLIER: f64 = 1.5;
const TERRAIN_MULTIPLIER: f64 = 1.3;

#[derive(Debug, Clone, Default)]
pub struct DamageOutcome {
    pub hit: bool,
    pub damage: u32,
    pub effectiveness: f64,
    pub critical: bool,
}

/// Core damage formula before multipliers: scales with level, the relevant
/// attack/defense pair, and move power.
pub fn base_damage(level: u32, power: u32, attack: u32, defense: u32) -> u32 {
    let level_factor = (2 * level) / 5 + 2;
    let raw = (level_factor as u64 * attack as u64 * power as u64) / (defense.max(1) as u64);
    (raw / 50) as u32 + 2
}

pub fn weather_accuracy_multiplier(weather: Option<Weather>) -> f64 {
    match weather {
        Some(Weather::Sandstorm) => 0.8,
        Some(Weather::Hail) => 0.9,
        Some(Weather::Fog) => 0.6,
        _ => 1.0,
    }
}

pub fn weather_damage_multiplier(weather: Option<Weather>, move_type: ElementType) -> f64 {
    match (weather, move_type) {
        (Some(Weather::Rain), ElementType::Water) => 1.5,
        (Some(Weather::Rain), ElementType::Fire) => 0.5,
        (Some(Weather::Sunny), ElementType::Fire) => 1.5,
        (Some(Weather::Sunny), ElementType::Water) => 0.5,
        (Some(Weather::Snow), ElementType::Ice) => 1.2,
        _ => 1.0,
    }
}

pub fn terrain_damage_multiplier(terrain: Option<Terrain>, move_type: ElementType) -> f64 {
    match terrain {
        Some(t) if t.boosted_type() == move_type => TERRAIN_MULTIPLIER,
        _ => 1.0,
    }
}

/// End-of-round chip damage from harsh weather. Types native to the weather
/// are spared.
pub fn weather_chip_damage(weather: Option<Weather>, monster: &BattleMonster) -> Option<u32> {
    let exempt: &[ElementType] = match weather? {
        Weather::Sandstorm => &[ElementType::Rock, ElementType::Ground, ElementType::Steel],
        Weather::Hail => &[ElementType::Ice],
        _ => return None,
    };
    if monster.types.iter().any(|t| exempt.contains(t)) {
        return None;
    }
    Some((monster.max_hp / 16).max(1))
}

/// Explicit status effect stated in a move's description. Rolled against
/// the move's `effect_chance` after a damaging hit.
pub fn described_status(attack_move: &Move) -> Option<(StatusEffect, i32)> {
    let text = attack_move.description.as_deref()?.to_ascii_lowercase();
    let table: [(&str, StatusEffect, i32); 7] = [
        ("burn", StatusEffect::Burn, 3),
        ("paraly", StatusEffect::Paralysis, 3),
        ("poison", StatusEffect::Poison, 3),
        ("confus", StatusEffect::Confusion, 3),
        ("sleep", StatusEffect::Sleep, 2),
        ("freeze", StatusEffect::Freeze, 2),
        ("flinch", StatusEffect::Flinch, 1),
    ];
    table
        .iter()
        .find(|(keyword, _, _)| text.contains(keyword))
        .map(|&(_, effect, turns)| (effect, turns))
}

/// Screen halving on the defender's side for the matching category.
fn screen_multiplier(defender_side: &SideState, category: MoveCategory) -> f64 {
    let veiled = defender_side.has(StatusEffect::AuroraVeil);
    match category {
        MoveCategory::Physical if veiled || defender_side.has(StatusEffect::Reflect) => 0.5,
        MoveCategory::Special if veiled || defender_side.has(StatusEffect::LightScreen) => 0.5,
        _ => 1.0,
    }
}

/// Full pipeline: accuracy roll, category selection, base formula, then
/// crit, effectiveness, STAB, weather, terrain, screens, and a random
/// factor in [0.85, 1.0]. A hit never deals less than 1.
pub fn calculate_damage<R: Rng>(
    attacker: &BattleMonster,
    defender: &BattleMonster,
    attack_move: &Move,
    field: &FieldState,
    defender_side: &SideState,
    rng: &mut R,
) -> DamageOutcome {
    let mut outcome = DamageOutcome::default();

    let accuracy = attack_move.accuracy.unwrap_or(100) as f64
        * attacker.stat_stages.multiplier(StatName::Accuracy)
        / defender.stat_stages.multiplier(StatName::Evasion)
        * weather_accuracy_multiplier(field.weather);
    if rng.gen::<f64>() * 100.0 > accuracy {
        return outcome;
    }
    outcome.hit = true;

    // Moves without a category split randomly rather than guessing from the
    // type, matching how unclassified homebrew moves have always behaved.
    let category = match attack_move.category {
        Some(MoveCategory::Status) | None => {
            if rng.gen_bool(0.5) {
                MoveCategory::Physical
            } else {
                MoveCategory::Special
            }
        }
        Some(c) => c,
    };
    let (attack_stat, defense_stat) = match category {
        MoveCategory::Special => (StatName::SpecialAttack, StatName::SpecialDefense),
        _ => (StatName::Attack, StatName::Defense),
    };

    let attack = effective_stat(
        attacker.stats.get(attack_stat),
        attack_stat,
        attacker.stat_stages.get(attack_stat),
    );
    let defense = effective_stat(
        defender.stats.get(defense_stat),
        defense_stat,
        defender.stat_stages.get(defense_stat),
    );

    let power = attack_move.power.unwrap_or(0);
    if power == 0 {
        return outcome;
    }

    let effectiveness = type_effectiveness(attack_move.move_type, &defender.types);
    outcome.effectiveness = effectiveness;
    if effectiveness == 0.0 {
        return outcome;
    }

    let mut damage = base_damage(attacker.level, power, attack, defense) as f64;

    if rng.gen::<f64>() < CRIT_CHANCE {
        outcome.critical = true;
        damage *= CRIT_MULTIPLIER;
    }
    damage *= effectiveness;
    if attacker.types.contains(&attack_move.move_type) {
        damage *= STAB_MULTIPLIER;
    }
    damage *= weather_damage_multiplier(field.weather, attack_move.move_type);
    damage *= terrain_damage_multiplier(field.terrain, attack_move.move_type);
    damage *= screen_multiplier(defender_side, category);
    damage *= rng.gen_range(0.85..=1.0);

    outcome.damage = (damage.floor() as u32).max(1);
    debug!(
        attacker = %attacker.name,
        defender = %defender.name,
        move_name = %attack_move.name,
        damage = outcome.damage,
        effectiveness,
        critical = outcome.critical,
        "Damage computed"
    );
    outcome
}

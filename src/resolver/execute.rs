use rand::Rng;
use tracing::debug;

use crate::combat::messages::render_template;
use crate::combat::state::{BattleMonster, FieldState, SideState, Weather};
use crate::stats::StatName;
use crate::status::engine::{self, ApplyOutcome};
use crate::status::StatusEffect;
use crate::typing::ElementType;

use super::descriptor::{
    AfflictionGate, FieldAction, HealAmount, MoveTarget, StatSpecial,
};
use super::{field_moves, healing_moves, normalize, stat_moves, status_moves};

/// Outcome of a resolved status move.
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    pub messages: Vec<String>,
    /// The user leaves the field voluntarily (Parting Shot).
    pub user_switches_out: bool,
    /// The target is blown out (Whirlwind, Roar).
    pub target_forced_out: bool,
    /// The user sacrificed itself (Memento, Healing Wish).
    pub user_fainted: bool,
}

impl Resolved {
    fn say(mut self, message: String) -> Self {
        self.messages.push(message);
        self
    }
}

/// Resolve a status move by name. `None` means the name is not in any table
/// and the caller should fall back to a generic damaging attack.
#[allow(clippy::too_many_arguments)]
pub fn resolve_status_move<R: Rng>(
    move_name: &str,
    attacker: &mut BattleMonster,
    target: &mut BattleMonster,
    field: &mut FieldState,
    user_side: &mut SideState,
    opposing_side: &mut SideState,
    rng: &mut R,
) -> Option<Resolved> {
    let name = normalize(move_name);

    // Curse branches on the user's typing and fits no single family.
    if name == "curse" {
        return Some(resolve_curse(attacker, target));
    }

    if let Some(entry) = stat_moves::lookup(&name) {
        return Some(resolve_stat_move(&entry, attacker, target, opposing_side, rng));
    }
    if let Some(entry) = status_moves::lookup(&name) {
        return Some(resolve_affliction(&entry, attacker, target, opposing_side, rng));
    }
    if let Some(entry) = healing_moves::lookup(&name) {
        return Some(resolve_healing(&entry, attacker, target, field, user_side));
    }
    if let Some(entry) = field_moves::lookup(&name) {
        return Some(resolve_field_move(
            &entry,
            attacker,
            target,
            field,
            user_side,
            opposing_side,
        ));
    }

    debug!(move_name = %move_name, "No status descriptor; degrading to a plain attack");
    None
}

fn resolve_curse(attacker: &mut BattleMonster, target: &mut BattleMonster) -> Resolved {
    let mut out = Resolved::default();
    if attacker.types.contains(&ElementType::Ghost) {
        let cost = attacker.max_hp / 2;
        attacker.take_damage(cost);
        if attacker.is_fainted {
            out.user_fainted = true;
        }
        engine::apply(target, StatusEffect::Curse, Some(-1), Some(attacker.id));
        out.messages.push(format!(
            "{} cut its own HP and laid a curse on {}!",
            attacker.name, target.name
        ));
    } else {
        attacker.stat_stages.shift(StatName::Attack, 1);
        attacker.stat_stages.shift(StatName::Defense, 1);
        attacker.stat_stages.shift(StatName::Speed, -1);
        out.messages.push(format!(
            "{}'s Attack and Defense rose, but Speed fell!",
            attacker.name
        ));
    }
    out
}

fn resolve_stat_move<R: Rng>(
    entry: &super::StatMove,
    attacker: &mut BattleMonster,
    target: &mut BattleMonster,
    opposing_side: &mut SideState,
    rng: &mut R,
) -> Resolved {
    let mut out = Resolved::default();
    let lowers_target = entry.target == MoveTarget::Target
        && entry.changes.iter().any(|(_, delta)| *delta < 0);
    if lowers_target && opposing_side.has(StatusEffect::Mist) {
        return out.say(format!("{} is protected by the mist!", target.name));
    }

    match entry.special {
        Some(StatSpecial::BellyDrum) => {
            let cost = attacker.max_hp / 2;
            if attacker.current_hp <= cost {
                return out.say("But it failed!".to_string());
            }
            attacker.take_damage(cost);
            attacker.stat_stages.set(StatName::Attack, 6);
            return out.say(render_template(entry.message, &attacker.name, &target.name));
        }
        Some(StatSpecial::HpCost(ratio)) => {
            let cost = ((attacker.max_hp as f64) * ratio).floor() as u32;
            if attacker.current_hp <= cost {
                return out.say("But it failed!".to_string());
            }
            attacker.take_damage(cost);
        }
        Some(StatSpecial::Haze) => {
            attacker.stat_stages.reset();
            target.stat_stages.reset();
            return out.say(render_template(entry.message, &attacker.name, &target.name));
        }
        Some(StatSpecial::TopsyTurvy) => {
            target.stat_stages.invert();
            return out.say(render_template(entry.message, &attacker.name, &target.name));
        }
        Some(StatSpecial::HeartSwap) => {
            std::mem::swap(&mut attacker.stat_stages, &mut target.stat_stages);
            return out.say(render_template(entry.message, &attacker.name, &target.name));
        }
        Some(StatSpecial::PsychUp) => {
            attacker.stat_stages = target.stat_stages;
            return out.say(render_template(entry.message, &attacker.name, &target.name));
        }
        Some(StatSpecial::Acupressure) => {
            const CANDIDATES: [StatName; 7] = [
                StatName::Attack,
                StatName::Defense,
                StatName::SpecialAttack,
                StatName::SpecialDefense,
                StatName::Speed,
                StatName::Accuracy,
                StatName::Evasion,
            ];
            let stat = CANDIDATES[rng.gen_range(0..CANDIDATES.len())];
            attacker.stat_stages.shift(stat, 2);
            return out.say(format!(
                "{} used Acupressure! {}'s {} rose sharply!",
                attacker.name,
                attacker.name,
                stat.display()
            ));
        }
        _ => {}
    }

    let recipient = match entry.target {
        MoveTarget::User => &mut *attacker,
        _ => &mut *target,
    };
    for (stat, delta) in entry.changes {
        recipient.stat_stages.shift(*stat, *delta);
    }
    out.messages
        .push(render_template(entry.message, &attacker.name, &target.name));

    match entry.special {
        Some(StatSpecial::AfflictTarget { effect, turns }) => {
            engine::apply(target, effect, Some(turns), Some(attacker.id));
        }
        Some(StatSpecial::AfflictUser { effect, turns }) => {
            engine::apply(attacker, effect, Some(turns), None);
        }
        Some(StatSpecial::SwitchOut) => out.user_switches_out = true,
        Some(StatSpecial::UserFaints) => {
            attacker.take_damage(attacker.current_hp);
            out.user_fainted = true;
        }
        _ => {}
    }
    out
}

fn resolve_affliction<R: Rng>(
    entry: &super::AfflictionMove,
    attacker: &mut BattleMonster,
    target: &mut BattleMonster,
    opposing_side: &mut SideState,
    rng: &mut R,
) -> Resolved {
    let mut out = Resolved::default();

    if entry.status.is_primary() && opposing_side.has(StatusEffect::Safeguard) {
        return out.say(format!("{} is protected by Safeguard!", target.name));
    }

    match entry.gate {
        Some(AfflictionGate::OppositeGender) => {
            // Snapshots carry no gender; model the cross-gender requirement
            // as a coin flip.
            if rng.gen_bool(0.5) {
                return out.say("But it failed!".to_string());
            }
        }
        Some(AfflictionGate::TargetAsleep) => {
            if !engine::has(target, StatusEffect::Sleep) {
                return out.say("But it failed!".to_string());
            }
        }
        Some(AfflictionGate::TransferPrimary) => {
            let carried = target_primary(attacker);
            let Some(effect) = carried else {
                return out.say("But it failed!".to_string());
            };
            engine::remove(attacker, effect);
            return match engine::apply(target, effect, None, Some(attacker.id)) {
                ApplyOutcome::Applied => {
                    out.say(render_template(entry.message, &attacker.name, &target.name))
                }
                _ => out.say("But it failed!".to_string()),
            };
        }
        None => {}
    }

    match engine::apply(target, entry.status, Some(entry.turns), Some(attacker.id)) {
        ApplyOutcome::Applied => {
            out.say(render_template(entry.message, &attacker.name, &target.name))
        }
        ApplyOutcome::Refreshed => out.say(format!(
            "{} is already {}!",
            target.name,
            entry.status.display()
        )),
        ApplyOutcome::Blocked => out.say(format!("It doesn't affect {}...", target.name)),
        ApplyOutcome::Unknown => out.say("But nothing happened...".to_string()),
    }
}

fn target_primary(monster: &BattleMonster) -> Option<StatusEffect> {
    monster
        .statuses
        .iter()
        .find(|s| s.effect.is_primary())
        .map(|s| s.effect)
}

fn resolve_healing(
    entry: &super::HealingMove,
    attacker: &mut BattleMonster,
    target: &mut BattleMonster,
    field: &FieldState,
    user_side: &mut SideState,
) -> Resolved {
    let mut out = Resolved::default();

    // Healing Wish, Lunar Dance: nothing lands now; the full heal is banked
    // on the user's side and paid to the next monster sent out.
    if entry.user_faints {
        user_side.add(StatusEffect::HealingWish, -1);
        attacker.take_damage(attacker.current_hp);
        out.user_fainted = true;
        return out.say(render_template(entry.message, &attacker.name, &target.name));
    }

    let beneficiary = match entry.target {
        MoveTarget::User => &mut *attacker,
        _ => &mut *target,
    };
    if engine::has(beneficiary, StatusEffect::HealBlock) {
        return out.say(format!("{} is prevented from healing!", beneficiary.name));
    }

    let heal = match entry.amount {
        HealAmount::Ratio(ratio) => ((beneficiary.max_hp as f64) * ratio).floor() as u32,
        HealAmount::Full => beneficiary.max_hp,
        HealAmount::WeatherScaled => {
            let ratio = match field.weather {
                Some(Weather::Sunny) => 0.66,
                None => 0.5,
                Some(_) => 0.25,
            };
            ((beneficiary.max_hp as f64) * ratio).floor() as u32
        }
        HealAmount::Delayed { ratio, turns } => {
            let banked = ((beneficiary.max_hp as f64) * ratio).floor() as u32;
            engine::apply(beneficiary, StatusEffect::Wish, Some(turns), None);
            if let Some(wish) = beneficiary
                .statuses
                .iter_mut()
                .find(|s| s.effect == StatusEffect::Wish)
            {
                wish.banked_heal = banked;
            }
            return out.say(render_template(entry.message, &attacker.name, &target.name));
        }
        HealAmount::StockpileScaled => {
            let stacks = beneficiary
                .statuses
                .iter()
                .find(|s| s.effect == StatusEffect::Stockpile)
                .map(|s| s.stacks)
                .unwrap_or(0);
            if stacks == 0 {
                return out.say("But it failed!".to_string());
            }
            engine::remove(beneficiary, StatusEffect::Stockpile);
            let ratio = match stacks {
                1 => 0.25,
                2 => 0.5,
                _ => 1.0,
            };
            ((beneficiary.max_hp as f64) * ratio).floor() as u32
        }
    };

    if heal > 0 {
        if beneficiary.current_hp == beneficiary.max_hp {
            return out.say(format!("{}'s HP is already full!", beneficiary.name));
        }
        beneficiary.heal(heal);
    }
    if entry.cures_primary {
        engine::cure_primary(beneficiary);
    }
    if let Some(turns) = entry.self_sleep_turns {
        engine::remove(attacker, StatusEffect::Sleep);
        engine::apply(attacker, StatusEffect::Sleep, Some(turns), None);
    }
    out.say(render_template(entry.message, &attacker.name, &target.name))
}

fn resolve_field_move(
    entry: &super::FieldMove,
    attacker: &mut BattleMonster,
    target: &mut BattleMonster,
    field: &mut FieldState,
    user_side: &mut SideState,
    opposing_side: &mut SideState,
) -> Resolved {
    let mut out = Resolved::default();
    let message = render_template(entry.message, &attacker.name, &target.name);

    match entry.action {
        FieldAction::Weather(weather) => field.set_weather(weather, 5),
        FieldAction::Terrain(terrain) => field.set_terrain(terrain, 5),
        FieldAction::TeamEffect { effect, turns } => {
            user_side.add(effect, turns);
        }
        FieldAction::Hazard(effect) => {
            let layers = opposing_side.add(effect, -1);
            out.messages.push(message);
            if effect.is_stackable() && layers > 1 {
                out.messages
                    .push(format!("({} layers now)", layers));
            }
            return out;
        }
        FieldAction::RoomEffect { effect, turns } => {
            if let Some(existing) = field.effects.iter().position(|s| s.effect == effect) {
                // Rooms toggle off when set again.
                field.effects.remove(existing);
                return out.say(format!("The {} effect dissipated!", effect.name()));
            }
            field
                .effects
                .push(crate::status::StatusInstance::new(effect, turns));
        }
        FieldAction::Protection(effect) => {
            engine::apply(attacker, effect, Some(1), None);
        }
        FieldAction::Condition { effect, turns, on_user } => {
            let source = Some(attacker.id);
            let recipient = if on_user { &mut *attacker } else { &mut *target };
            match engine::apply(recipient, effect, Some(turns), source) {
                ApplyOutcome::Refreshed => {
                    return out.say(format!("{} is already {}!", recipient.name, effect.display()));
                }
                ApplyOutcome::Blocked => {
                    return out.say(format!("It doesn't affect {}...", recipient.name));
                }
                _ => {}
            }
        }
        FieldAction::ForceSwitch => {
            out.target_forced_out = true;
        }
        FieldAction::ClearHazards => {
            user_side.clear_hazards();
            opposing_side.clear_hazards();
            target.stat_stages.shift(StatName::Evasion, -1);
        }
        FieldAction::PainSplit => {
            let average = (attacker.current_hp + target.current_hp) / 2;
            attacker.current_hp = average.min(attacker.max_hp);
            target.current_hp = average.min(target.max_hp);
        }
        FieldAction::PerishSong => {
            engine::apply(attacker, StatusEffect::PerishSong, Some(3), None);
            engine::apply(target, StatusEffect::PerishSong, Some(3), None);
        }
        FieldAction::Substitute => {
            let cost = attacker.max_hp / 4;
            if attacker.current_hp <= cost {
                return out.say("But it failed!".to_string());
            }
            attacker.take_damage(cost);
            engine::apply(attacker, StatusEffect::Substitute, Some(-1), None);
        }
        FieldAction::Nothing => {}
    }
    out.say(message)
}

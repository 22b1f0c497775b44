use rand::Rng;
use tracing::warn;
use uuid::Uuid;

use crate::combat::state::BattleMonster;
use crate::stats::StatName;
use crate::status::catalog::{Prevention, StatusEffect, StatusInstance};

/// Result of attempting to attach a condition to a monster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Already present; duration refreshed (or a stack added, up to the cap).
    Refreshed,
    /// Rejected because a conflicting primary status is in place.
    Blocked,
    /// The effect name did not resolve to anything in the catalog.
    Unknown,
}

/// What the start-of-action and end-of-turn passes did to one monster.
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub can_act: bool,
    pub damage: u32,
    pub healing: u32,
    /// HP drained to another monster, keyed by the beneficiary's battle id.
    pub drained: Option<(Uuid, u32)>,
    /// Perish count reached zero this turn.
    pub fainted_by_countdown: bool,
    pub messages: Vec<String>,
}

pub fn apply(
    monster: &mut BattleMonster,
    effect: StatusEffect,
    turns: Option<i32>,
    source: Option<Uuid>,
) -> ApplyOutcome {
    let turns = turns.unwrap_or_else(|| effect.default_duration());

    if effect.is_primary() {
        if let Some(existing) = monster
            .statuses
            .iter_mut()
            .find(|s| s.effect.is_primary())
        {
            if existing.effect == effect {
                existing.turns_remaining = turns;
                return ApplyOutcome::Refreshed;
            }
            return ApplyOutcome::Blocked;
        }
    }

    if let Some(existing) = monster.statuses.iter_mut().find(|s| s.effect == effect) {
        if effect.is_stackable() && existing.stacks < effect.max_stacks() {
            existing.stacks += 1;
        }
        existing.turns_remaining = turns;
        return ApplyOutcome::Refreshed;
    }

    let mut instance = StatusInstance::new(effect, turns);
    instance.source = source;
    monster.statuses.push(instance);
    ApplyOutcome::Applied
}

/// Name-keyed entry point used by move descriptors. Unrecognized names are
/// logged and reported as `Unknown` rather than failing the whole action.
pub fn apply_named(
    monster: &mut BattleMonster,
    name: &str,
    turns: Option<i32>,
    source: Option<Uuid>,
) -> ApplyOutcome {
    match StatusEffect::parse(name) {
        Some(effect) => apply(monster, effect, turns, source),
        None => {
            warn!(monster = %monster.name, effect = name, "Ignoring unrecognized status effect");
            ApplyOutcome::Unknown
        }
    }
}

pub fn remove(monster: &mut BattleMonster, effect: StatusEffect) -> bool {
    let before = monster.statuses.len();
    monster.statuses.retain(|s| s.effect != effect);
    monster.statuses.len() != before
}

/// Strip every primary status (Full Restore, Purify).
pub fn cure_primary(monster: &mut BattleMonster) -> bool {
    let before = monster.statuses.len();
    monster.statuses.retain(|s| !s.effect.is_primary());
    monster.statuses.len() != before
}

pub fn has(monster: &BattleMonster, effect: StatusEffect) -> bool {
    monster.statuses.iter().any(|s| s.effect == effect)
}

pub fn has_primary(monster: &BattleMonster) -> bool {
    monster.statuses.iter().any(|s| s.effect.is_primary())
}

pub fn has_protection(monster: &BattleMonster) -> Option<StatusEffect> {
    monster
        .statuses
        .iter()
        .find(|s| s.effect.is_protection())
        .map(|s| s.effect)
}

pub fn can_use_status_moves(monster: &BattleMonster) -> bool {
    !has(monster, StatusEffect::Taunt)
}

pub fn can_use_items(monster: &BattleMonster) -> bool {
    !has(monster, StatusEffect::Embargo)
}

pub fn can_repeat_move(monster: &BattleMonster) -> bool {
    !has(monster, StatusEffect::Torment)
}

pub fn is_trapped(monster: &BattleMonster) -> bool {
    monster.statuses.iter().any(|s| s.effect.prevents_switch())
}

/// Punish an attacker who made contact with a reactive protection.
/// Returns the messages produced; mutates the attacker in place.
pub fn punish_contact(
    protection: StatusEffect,
    attacker: &mut BattleMonster,
) -> Vec<String> {
    let mut messages = Vec::new();
    match protection {
        StatusEffect::SpikyShield => {
            let recoil = (attacker.max_hp / 8).max(1);
            attacker.take_damage(recoil);
            messages.push(format!("{} was hurt by the spiky shield!", attacker.name));
        }
        StatusEffect::BurningBulwark => {
            if apply(attacker, StatusEffect::Burn, Some(4), None) == ApplyOutcome::Applied {
                messages.push(format!("{} was burned!", attacker.name));
            }
        }
        StatusEffect::BanefulBunker => {
            if apply(attacker, StatusEffect::Poison, Some(4), None) == ApplyOutcome::Applied {
                messages.push(format!("{} was poisoned!", attacker.name));
            }
        }
        StatusEffect::SilkTrap => {
            attacker.stat_stages.shift(StatName::Speed, -1);
            messages.push(format!("{}'s Speed fell!", attacker.name));
        }
        StatusEffect::Obstruct => {
            attacker.stat_stages.shift(StatName::Defense, -2);
            messages.push(format!("{}'s Defense harshly fell!", attacker.name));
        }
        _ => {}
    }
    messages
}

/// Pre-action gate. Rolls each act-preventing condition in order; the first
/// one that fires stops the action. Confusion self-hits are resolved here.
pub fn check_can_act<R: Rng>(monster: &mut BattleMonster, rng: &mut R) -> TickOutcome {
    let mut outcome = TickOutcome {
        can_act: true,
        ..Default::default()
    };

    // Flinch always fires and is consumed.
    if remove(monster, StatusEffect::Flinch) {
        outcome.can_act = false;
        outcome.messages.push(format!("{} flinched and couldn't move!", monster.name));
        return outcome;
    }

    let gated: Vec<StatusEffect> = monster
        .statuses
        .iter()
        .filter(|s| s.effect.prevention().is_some())
        .map(|s| s.effect)
        .collect();

    for effect in gated {
        match effect.prevention() {
            Some(Prevention::Hard { escape_chance }) => {
                if rng.gen::<f64>() < escape_chance {
                    remove(monster, effect);
                    let freed = match effect {
                        StatusEffect::Sleep => format!("{} woke up!", monster.name),
                        StatusEffect::Freeze => format!("{} thawed out!", monster.name),
                        _ => format!("{} shook it off!", monster.name),
                    };
                    outcome.messages.push(freed);
                } else {
                    outcome.can_act = false;
                    let held = match effect {
                        StatusEffect::Sleep => format!("{} is fast asleep.", monster.name),
                        StatusEffect::Freeze => format!("{} is frozen solid!", monster.name),
                        _ => format!("{} can't move!", monster.name),
                    };
                    outcome.messages.push(held);
                    return outcome;
                }
            }
            Some(Prevention::Roll { fail_chance }) => {
                if rng.gen::<f64>() < fail_chance {
                    outcome.can_act = false;
                    let held = match effect {
                        StatusEffect::Paralysis => {
                            format!("{} is paralyzed! It can't move!", monster.name)
                        }
                        StatusEffect::Infatuation => {
                            format!("{} is immobilized by love!", monster.name)
                        }
                        _ => format!("{} can't move!", monster.name),
                    };
                    outcome.messages.push(held);
                    return outcome;
                }
            }
            None => {}
        }
    }

    // Confusion: 33% chance to hit itself instead of acting.
    if has(monster, StatusEffect::Confusion) {
        outcome
            .messages
            .push(format!("{} is confused!", monster.name));
        if rng.gen::<f64>() < 0.33 {
            let self_hit = (monster.max_hp / 16).max(1);
            monster.take_damage(self_hit);
            outcome.can_act = false;
            outcome.damage += self_hit;
            outcome
                .messages
                .push(format!("{} hurt itself in its confusion!", monster.name));
        }
    }

    outcome
}

/// End-of-turn pass for one monster: damage-over-time, healing-over-time,
/// countdowns, and duration bookkeeping.
pub fn process_end_of_turn(monster: &mut BattleMonster) -> TickOutcome {
    let mut outcome = TickOutcome {
        can_act: true,
        ..Default::default()
    };
    let max_hp = monster.max_hp;
    let asleep = has(monster, StatusEffect::Sleep);

    let mut expired: Vec<StatusEffect> = Vec::new();
    let mut fell_asleep = false;
    let mut wish_heal: u32 = 0;

    for instance in monster.statuses.iter_mut() {
        let effect = instance.effect;
        if effect.is_side_scoped() || effect.is_battle_scoped() {
            continue;
        }

        if let Some(divisor) = effect.dot_divisor() {
            if effect == StatusEffect::Nightmare && !asleep {
                // Nightmares only bite sleeping monsters.
            } else {
                let tick = (max_hp / divisor).max(1);
                outcome.damage += tick;
                if effect == StatusEffect::LeechSeed {
                    if let Some(source) = instance.source {
                        outcome.drained = Some((source, tick));
                    }
                    outcome
                        .messages
                        .push(format!("{}'s health is sapped by Leech Seed!", monster.name));
                } else {
                    outcome
                        .messages
                        .push(format!("{} is hurt by being {}!", monster.name, effect.display()));
                }
            }
        }

        if let Some(divisor) = effect.heal_divisor() {
            let tick = (max_hp / divisor).max(1);
            outcome.healing += tick;
            outcome
                .messages
                .push(format!("{} restored a little HP!", monster.name));
        }

        if effect == StatusEffect::Octolock {
            outcome
                .messages
                .push(format!("Octolock is squeezing {}!", monster.name));
        }

        if instance.turns_remaining > 0 {
            instance.turns_remaining -= 1;
            if instance.turns_remaining == 0 {
                match effect {
                    StatusEffect::Drowsy | StatusEffect::Yawn => {
                        fell_asleep = true;
                        expired.push(effect);
                    }
                    StatusEffect::PerishSong => {
                        outcome.fainted_by_countdown = true;
                        outcome
                            .messages
                            .push(format!("{}'s perish count hit zero!", monster.name));
                        expired.push(effect);
                    }
                    StatusEffect::Wish => {
                        wish_heal = instance.banked_heal.max(max_hp / 2);
                        expired.push(effect);
                    }
                    _ => {
                        outcome.messages.push(format!(
                            "{} is no longer {}.",
                            monster.name,
                            effect.display()
                        ));
                        expired.push(effect);
                    }
                }
            } else if effect == StatusEffect::PerishSong {
                outcome.messages.push(format!(
                    "{}'s perish count fell to {}!",
                    monster.name, instance.turns_remaining
                ));
            }
        }
    }

    for effect in expired {
        remove(monster, effect);
    }

    if fell_asleep {
        apply(monster, StatusEffect::Sleep, Some(3), None);
        outcome
            .messages
            .push(format!("{} fell asleep!", monster.name));
    }

    if wish_heal > 0 {
        outcome.healing += wish_heal;
        outcome
            .messages
            .push(format!("{}'s wish came true!", monster.name));
    }

    // Octolock lowers Defense and Sp. Def each turn it holds.
    if has(monster, StatusEffect::Octolock) {
        monster.stat_stages.shift(StatName::Defense, -1);
        monster.stat_stages.shift(StatName::SpecialDefense, -1);
    }

    if outcome.damage > 0 {
        monster.take_damage(outcome.damage);
    }
    if outcome.healing > 0 && !monster.is_fainted {
        monster.heal(outcome.healing);
    }
    if outcome.fainted_by_countdown {
        monster.current_hp = 0;
        monster.is_fainted = true;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::state::BattleMonster;
    use crate::typing::ElementType;
    use pretty_assertions::assert_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn monster(hp: u32) -> BattleMonster {
        BattleMonster::test_monster("Sprigatito", 20, hp, vec![ElementType::Grass])
    }

    #[test]
    fn poison_ticks_an_eighth_of_max_hp() {
        let mut m = monster(100);
        apply(&mut m, StatusEffect::Poison, Some(3), None);
        let outcome = process_end_of_turn(&mut m);
        assert_eq!(outcome.damage, 12);
        assert_eq!(m.current_hp, 88);
    }

    #[test]
    fn dot_is_at_least_one_on_tiny_monsters() {
        let mut m = monster(4);
        apply(&mut m, StatusEffect::Toxic, Some(4), None);
        let outcome = process_end_of_turn(&mut m);
        assert_eq!(outcome.damage, 1);
    }

    #[test]
    fn primary_statuses_are_mutually_exclusive() {
        let mut m = monster(100);
        assert_eq!(apply(&mut m, StatusEffect::Burn, None, None), ApplyOutcome::Applied);
        assert_eq!(apply(&mut m, StatusEffect::Poison, None, None), ApplyOutcome::Blocked);
        assert_eq!(apply(&mut m, StatusEffect::Burn, None, None), ApplyOutcome::Refreshed);
        assert_eq!(apply(&mut m, StatusEffect::Confusion, None, None), ApplyOutcome::Applied);
    }

    #[test]
    fn stacks_cap_at_the_catalog_limit() {
        let mut m = monster(100);
        apply(&mut m, StatusEffect::Stockpile, None, None);
        apply(&mut m, StatusEffect::Stockpile, None, None);
        apply(&mut m, StatusEffect::Stockpile, None, None);
        apply(&mut m, StatusEffect::Stockpile, None, None);
        let stacks = m
            .statuses
            .iter()
            .find(|s| s.effect == StatusEffect::Stockpile)
            .map(|s| s.stacks);
        assert_eq!(stacks, Some(3));
    }

    #[test]
    fn unknown_effect_name_is_reported_not_fatal() {
        let mut m = monster(100);
        assert_eq!(apply_named(&mut m, "hyper_doom", None, None), ApplyOutcome::Unknown);
        assert!(m.statuses.is_empty());
    }

    #[test]
    fn condition_wears_off_at_zero_turns() {
        let mut m = monster(100);
        apply(&mut m, StatusEffect::Taunt, Some(1), None);
        let outcome = process_end_of_turn(&mut m);
        assert!(!has(&m, StatusEffect::Taunt));
        assert!(outcome.messages.iter().any(|msg| msg.contains("no longer")));
    }

    #[test]
    fn indefinite_conditions_never_decrement() {
        let mut m = monster(100);
        apply(&mut m, StatusEffect::LeechSeed, Some(-1), None);
        for _ in 0..5 {
            process_end_of_turn(&mut m);
        }
        assert!(has(&m, StatusEffect::LeechSeed));
    }

    #[test]
    fn drowsy_converts_to_sleep() {
        let mut m = monster(100);
        apply(&mut m, StatusEffect::Drowsy, Some(1), None);
        process_end_of_turn(&mut m);
        assert!(has(&m, StatusEffect::Sleep));
        assert!(!has(&m, StatusEffect::Drowsy));
    }

    #[test]
    fn perish_count_faints_at_zero() {
        let mut m = monster(100);
        apply(&mut m, StatusEffect::PerishSong, Some(3), None);
        process_end_of_turn(&mut m);
        process_end_of_turn(&mut m);
        let outcome = process_end_of_turn(&mut m);
        assert!(outcome.fainted_by_countdown);
        assert!(m.is_fainted);
    }

    #[test]
    fn leech_seed_reports_the_drain_target() {
        let mut m = monster(80);
        let seeder = Uuid::new_v4();
        apply(&mut m, StatusEffect::LeechSeed, Some(-1), Some(seeder));
        let outcome = process_end_of_turn(&mut m);
        assert_eq!(outcome.drained, Some((seeder, 10)));
    }

    #[test]
    fn flinch_consumes_the_turn_once() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut m = monster(100);
        apply(&mut m, StatusEffect::Flinch, Some(1), None);
        let first = check_can_act(&mut m, &mut rng);
        assert!(!first.can_act);
        let second = check_can_act(&mut m, &mut rng);
        assert!(second.can_act);
    }

    #[test]
    fn nightmare_only_ticks_while_asleep() {
        let mut m = monster(100);
        apply(&mut m, StatusEffect::Nightmare, Some(-1), None);
        let awake = process_end_of_turn(&mut m);
        assert_eq!(awake.damage, 0);
        apply(&mut m, StatusEffect::Sleep, Some(3), None);
        let asleep = process_end_of_turn(&mut m);
        assert_eq!(asleep.damage, 25);
    }

    #[test]
    fn spiky_shield_contact_costs_an_eighth() {
        let mut attacker = monster(80);
        let messages = punish_contact(StatusEffect::SpikyShield, &mut attacker);
        assert_eq!(attacker.current_hp, 70);
        assert!(!messages.is_empty());
    }

    #[test]
    fn cure_primary_leaves_volatiles() {
        let mut m = monster(100);
        apply(&mut m, StatusEffect::Burn, None, None);
        apply(&mut m, StatusEffect::Confusion, None, None);
        assert!(cure_primary(&mut m));
        assert!(!has_primary(&m));
        assert!(has(&m, StatusEffect::Confusion));
    }
}

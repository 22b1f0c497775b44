//! Participant-facing actions: attacking, items, and switching. Validation
//! happens before any state mutation; a returned error leaves the battle
//! untouched.

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use uuid::Uuid;

use crate::combat::damage::calculate_damage;
use crate::combat::manager::BattleManager;
use crate::combat::messages::{effectiveness_text, health_bar, render_template};
use crate::combat::state::{
    BattleEvent, BattleMonster, BattleState, BattleStatus, Participant, TeamSide, TurnRecord,
};
use crate::error::{BattleError, Result};
use crate::moves::{Move, MoveCategory};
use crate::resolver::{self, SpecialDamageEffect};
use crate::status::engine;
use crate::status::{type_status_chance, StatusEffect};

/// Healing items usable mid-battle. `None` heals to full.
const HEALING_ITEMS: [(&str, Option<u32>, bool); 5] = [
    ("potion", Some(20), false),
    ("super potion", Some(50), false),
    ("hyper potion", Some(200), false),
    ("max potion", None, false),
    ("full restore", None, true),
];

/// Capture items. The throw is recorded and narrated; capture mechanics are
/// handled outside the battle engine.
const CAPTURE_ITEMS: [&str; 3] = ["monster ball", "great ball", "ultra ball"];

impl BattleManager {
    /// A participant attacks with one of their monster's moves.
    pub async fn execute_attack(
        &self,
        battle_id: Uuid,
        external_id: &str,
        attacker_name: Option<&str>,
        move_name: &str,
        target_spec: Option<&str>,
        message_words: u64,
    ) -> Result<Vec<String>> {
        let handle = self.battle_handle(battle_id)?;
        let mut messages = {
            let mut state = handle.lock().await;
            let participant = self.validate_actor(&state, external_id)?;

            let attacker_index = state
                .active_monster_index(participant.id)
                .ok_or(BattleError::NoActiveMonster)?;
            if let Some(name) = attacker_name {
                let active = &state.monsters[attacker_index];
                if !active.name.to_lowercase().contains(&name.trim().to_lowercase()) {
                    return Err(BattleError::MonsterNotFound(name.to_string()));
                }
            }
            if !state.monsters[attacker_index].knows_move(move_name) {
                return Err(BattleError::UnknownMove {
                    monster: state.monsters[attacker_index].name.clone(),
                    move_name: move_name.to_string(),
                });
            }
            let target_index = resolve_target(&state, attacker_index, target_spec)?;

            let mut rng = SmallRng::from_entropy();
            let participant_id = participant.id;
            let mut messages = self
                .perform_attack(&mut state, participant_id, move_name, target_index, &mut rng)
                .await?;

            self.record_turn(&mut state, participant_id, move_name, message_words);
            messages.extend(self.advance_turn(&mut state).await);
            self.check_victory(&mut state).await?;
            self.store.save(&state).await?;
            self.sink
                .publish(BattleEvent::ActionResolved {
                    battle_id,
                    participant_id,
                    messages: messages.clone(),
                })
                .await;
            messages
        };
        messages.extend(self.process_npc_turns(battle_id).await?);
        Ok(messages)
    }

    /// Core attack path, shared by humans and NPCs. The caller has already
    /// validated turn order and move knowledge.
    pub(crate) async fn perform_attack<R: Rng>(
        &self,
        state: &mut BattleState,
        participant_id: Uuid,
        move_name: &str,
        target_index: usize,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        let attacker_index = state
            .active_monster_index(participant_id)
            .ok_or(BattleError::NoActiveMonster)?;
        let target_was_fainted = state.monsters[target_index].is_fainted;
        let mut messages = Vec::new();

        // Conditions may consume the turn before the move happens.
        let gate = engine::check_can_act(&mut state.monsters[attacker_index], rng);
        messages.extend(gate.messages);
        if !gate.can_act {
            messages.extend(
                self.finish_action(state, attacker_index, target_index, target_was_fainted)
                    .await?,
            );
            return Ok(messages);
        }

        let catalog_move = self.catalog.get_move(move_name).await?;
        let is_status = resolver::is_status_move(move_name)
            || matches!(
                catalog_move.as_ref().and_then(|m| m.category),
                Some(MoveCategory::Status)
            );

        if is_status {
            if !engine::can_use_status_moves(&state.monsters[attacker_index]) {
                messages.push(format!(
                    "{} can't use status moves after the taunt!",
                    state.monsters[attacker_index].name
                ));
                messages.extend(
                    self.finish_action(state, attacker_index, target_index, target_was_fainted)
                        .await?,
                );
                return Ok(messages);
            }
            let resolved = {
                let BattleState {
                    monsters,
                    field,
                    player_side,
                    opponent_side,
                    ..
                } = &mut *state;
                let (attacker, target) = two_mut(monsters, attacker_index, target_index);
                let (user_side, opposing_side) = match attacker.side {
                    TeamSide::Players => (player_side, opponent_side),
                    TeamSide::Opponents => (opponent_side, player_side),
                };
                resolver::resolve_status_move(
                    move_name, attacker, target, field, user_side, opposing_side, rng,
                )
            };

            match resolved {
                Some(outcome) => {
                    messages.extend(outcome.messages);
                    if outcome.target_forced_out {
                        messages.extend(self.force_out(state, target_index));
                    }
                    if outcome.user_switches_out {
                        if let Some(owner) = state.monsters[attacker_index].owner {
                            let owner_is_npc = state
                                .participant(owner)
                                .map(|p| p.is_npc)
                                .unwrap_or(true);
                            if owner_is_npc {
                                if let Some(&bench) = state.bench_of(owner).first() {
                                    messages.extend(self.perform_switch(state, owner, bench));
                                }
                            } else if !state.bench_of(owner).is_empty() {
                                // Humans pick their own replacement.
                                let display = participant_name(state, owner);
                                state.battle.pending_switch =
                                    Some(crate::combat::state::PendingSwitch {
                                        participant_id: owner,
                                    });
                                messages
                                    .push(format!("{} must choose a replacement!", display));
                            }
                        }
                    }
                    messages.extend(
                        self.finish_action(state, attacker_index, target_index, target_was_fainted)
                            .await?,
                    );
                    return Ok(messages);
                }
                None => {
                    // Unrecognized status move: degrade to a plain attack.
                    let move_type = catalog_move
                        .as_ref()
                        .map(|m| m.move_type)
                        .unwrap_or(crate::typing::ElementType::Normal);
                    let fallback = Move::fallback_attack(move_name, move_type);
                    messages.extend(
                        self.deal_damage(state, attacker_index, target_index, &fallback, rng),
                    );
                    messages.extend(
                        self.finish_action(state, attacker_index, target_index, target_was_fainted)
                            .await?,
                    );
                    return Ok(messages);
                }
            }
        }

        // Moves the catalogue doesn't carry (including the AI's last-resort
        // flail) land as a minimal generic attack.
        let attack_move = catalog_move.unwrap_or_else(|| {
            Move::fallback_attack(move_name, crate::typing::ElementType::Normal)
        });
        messages.extend(self.deal_damage(state, attacker_index, target_index, &attack_move, rng));
        messages.extend(
            self.finish_action(state, attacker_index, target_index, target_was_fainted)
                .await?,
        );
        Ok(messages)
    }

    /// Damage application including protections, riders, and on-hit status.
    fn deal_damage<R: Rng>(
        &self,
        state: &mut BattleState,
        attacker_index: usize,
        target_index: usize,
        attack_move: &Move,
        rng: &mut R,
    ) -> Vec<String> {
        let mut messages = Vec::new();
        messages.push(format!(
            "{} used {}!",
            state.monsters[attacker_index].name, attack_move.name
        ));

        // Two-turn moves spend the first use charging.
        let rider = resolver::damage_rider(&attack_move.name);
        if let Some(SpecialDamageEffect::TwoTurn { charge_message }) =
            rider.as_ref().map(|r| r.effect)
        {
            let attacker = &mut state.monsters[attacker_index];
            if !engine::remove(attacker, StatusEffect::Charge) {
                // Two turns so the end-of-turn tick doesn't expire it early.
                engine::apply(attacker, StatusEffect::Charge, Some(2), None);
                messages.pop();
                messages.push(render_template(charge_message, &attacker.name, ""));
                return messages;
            }
        }

        if let Some(protection) = engine::has_protection(&state.monsters[target_index]) {
            let target_name = state.monsters[target_index].name.clone();
            messages.push(format!("{} protected itself!", target_name));
            if attack_move.category != Some(MoveCategory::Special) {
                messages.extend(engine::punish_contact(
                    protection,
                    &mut state.monsters[attacker_index],
                ));
            }
            return messages;
        }

        let hits = match rider.as_ref().map(|r| r.effect) {
            Some(SpecialDamageEffect::MultiHit { min, max }) => rng.gen_range(min..=max),
            _ => 1,
        };

        let mut total_damage = 0u32;
        let mut last_effectiveness = 1.0;
        let mut any_crit = false;
        let mut hit = false;
        let mut landed = 0u32;
        for _ in 0..hits {
            let outcome = {
                let defender_side = state.side(state.monsters[target_index].side).clone();
                calculate_damage(
                    &state.monsters[attacker_index],
                    &state.monsters[target_index],
                    attack_move,
                    &state.field,
                    &defender_side,
                    rng,
                )
            };
            if !outcome.hit {
                break;
            }
            hit = true;
            landed += 1;
            last_effectiveness = outcome.effectiveness;
            any_crit |= outcome.critical;
            total_damage += outcome.damage;
            if outcome.effectiveness == 0.0 {
                break;
            }
        }

        if !hit {
            messages.push(format!(
                "{}'s attack missed!",
                state.monsters[attacker_index].name
            ));
            return messages;
        }

        state.monsters[target_index].take_damage(total_damage);
        if landed > 1 {
            messages.push(format!("Hit {} time(s)!", landed));
        }
        if any_crit {
            messages.push("A critical hit!".to_string());
        }
        if let Some(commentary) = effectiveness_text(last_effectiveness) {
            messages.push(commentary.to_string());
        }
        if total_damage > 0 {
            let target = &state.monsters[target_index];
            messages.push(format!(
                "{} took {} damage! {}",
                target.name,
                total_damage,
                health_bar(target.current_hp, target.max_hp)
            ));
        }

        match rider.as_ref().map(|r| r.effect) {
            Some(SpecialDamageEffect::Drain(ratio)) if total_damage > 0 => {
                let healed = ((total_damage as f64) * ratio).floor() as u32;
                let attacker = &mut state.monsters[attacker_index];
                attacker.heal(healed);
                messages.push(format!("{} recovered {} HP!", attacker.name, healed));
            }
            Some(SpecialDamageEffect::Recoil(ratio)) if total_damage > 0 => {
                let recoil = ((total_damage as f64) * ratio).floor() as u32;
                let attacker = &mut state.monsters[attacker_index];
                attacker.take_damage(recoil);
                messages.push(format!("{} was hurt by recoil!", attacker.name));
            }
            Some(SpecialDamageEffect::FlinchChance(chance)) if total_damage > 0 => {
                if rng.gen::<f64>() < chance {
                    let target = &mut state.monsters[target_index];
                    if !target.is_fainted {
                        engine::apply(target, StatusEffect::Flinch, Some(1), None);
                        messages.push(format!("{} flinched!", target.name));
                    }
                }
            }
            _ => {}
        }

        // A status spelled out in the move's description rolls against the
        // move's own effect chance.
        if total_damage > 0 && !state.monsters[target_index].is_fainted {
            if let (Some(chance), Some((effect, turns))) = (
                attack_move.effect_chance,
                crate::combat::damage::described_status(attack_move),
            ) {
                if rng.gen_range(0..100) < chance {
                    let target = &mut state.monsters[target_index];
                    if engine::apply(target, effect, Some(turns), None)
                        == engine::ApplyOutcome::Applied
                    {
                        messages.push(format!("{} is {}!", target.name, effect.display()));
                    }
                }
            }
        }

        // Elemental moves carry a small chance of their signature condition,
        // unless the defender shares the attacking type.
        if total_damage > 0 && !state.monsters[target_index].is_fainted {
            if let Some((effect, chance, turns)) = type_status_chance(attack_move.move_type) {
                let target = &mut state.monsters[target_index];
                if !target.types.contains(&attack_move.move_type) && rng.gen::<f64>() < chance {
                    if engine::apply(target, effect, Some(turns), None)
                        == engine::ApplyOutcome::Applied
                    {
                        messages.push(format!("{} is {}!", target.name, effect.display()));
                    }
                }
            }
        }
        messages
    }

    /// End-of-action pass: the actor's conditions tick, leech transfers
    /// land, and any faints caused by this action are processed.
    async fn finish_action(
        &self,
        state: &mut BattleState,
        attacker_index: usize,
        target_index: usize,
        target_was_fainted: bool,
    ) -> Result<Vec<String>> {
        // Faints during the pass are handled inside it; faints from the move
        // itself (recoil, sacrifice) are picked up afterwards.
        let attacker_was_fainted = state.monsters[attacker_index].is_fainted;
        let mut messages = self.run_status_pass(state, attacker_index).await?;
        if state.monsters[target_index].is_fainted
            && !target_was_fainted
            && target_index != attacker_index
        {
            messages.extend(self.handle_knockout(state, target_index).await?);
        }
        if attacker_was_fainted {
            messages.extend(self.handle_knockout(state, attacker_index).await?);
        }
        Ok(messages)
    }

    fn force_out(&self, state: &mut BattleState, target_index: usize) -> Vec<String> {
        let Some(owner) = state.monsters[target_index].owner else {
            return Vec::new();
        };
        if engine::is_trapped(&state.monsters[target_index]) {
            return vec![format!(
                "{} is trapped and can't be forced out!",
                state.monsters[target_index].name
            )];
        }
        match state.bench_of(owner).first().copied() {
            Some(bench) => self.perform_switch(state, owner, bench),
            None => Vec::new(),
        }
    }

    /// Use a healing item from the participant's inventory.
    pub async fn use_item(
        &self,
        battle_id: Uuid,
        external_id: &str,
        item_name: &str,
        message_words: u64,
    ) -> Result<Vec<String>> {
        let handle = self.battle_handle(battle_id)?;
        let mut messages = {
            let mut state = handle.lock().await;
            let participant = self.validate_actor(&state, external_id)?;
            let participant_id = participant.id;

            let active_index = state
                .active_monster_index(participant_id)
                .ok_or(BattleError::NoActiveMonster)?;
            if !engine::can_use_items(&state.monsters[active_index]) {
                return Err(BattleError::IllegalSwitch(
                    "items are blocked by the embargo".to_string(),
                ));
            }

            let key = item_name.trim().to_lowercase();
            let is_capture = CAPTURE_ITEMS.contains(&key.as_str());
            if is_capture && state.battle.kind != crate::combat::state::BattleKind::Wild {
                return Err(BattleError::IllegalSwitch(
                    "you can't throw a ball at a trainer's monster".to_string(),
                ));
            }
            if !is_capture && !HEALING_ITEMS.iter().any(|(name, _, _)| *name == key) {
                return Err(BattleError::UnknownItem(item_name.to_string()));
            }
            if self.inventory.count(external_id, &key).await? == 0 {
                return Err(BattleError::InsufficientInventory(item_name.to_string()));
            }
            self.inventory.consume(external_id, &key, 1).await?;

            let mut messages = if is_capture {
                vec![format!(
                    "{} threw a {}!",
                    participant_name(&state, participant_id),
                    item_name.trim()
                )]
            } else {
                let &(_, amount, cures) = HEALING_ITEMS
                    .iter()
                    .find(|(name, _, _)| *name == key)
                    .ok_or_else(|| BattleError::UnknownItem(item_name.to_string()))?;
                let monster = &mut state.monsters[active_index];
                let healed = match amount {
                    Some(fixed) => fixed,
                    None => monster.max_hp - monster.current_hp,
                };
                monster.heal(healed);
                let mut messages = vec![format!(
                    "{} used a {}! {} recovered HP! {}",
                    participant_name(&state, participant_id),
                    item_name.trim(),
                    state.monsters[active_index].name,
                    health_bar(
                        state.monsters[active_index].current_hp,
                        state.monsters[active_index].max_hp
                    )
                )];
                if cures && engine::cure_primary(&mut state.monsters[active_index]) {
                    messages.push(format!(
                        "{} was cured of its status condition!",
                        state.monsters[active_index].name
                    ));
                }
                messages
            };

            // The turn is spent either way, so the actor's conditions tick.
            messages.extend(self.run_status_pass(&mut state, active_index).await?);
            self.record_turn(&mut state, participant_id, &format!("item:{key}"), message_words);
            messages.extend(self.advance_turn(&mut state).await);
            self.check_victory(&mut state).await?;
            self.store.save(&state).await?;
            messages
        };
        messages.extend(self.process_npc_turns(battle_id).await?);
        Ok(messages)
    }

    /// Send a benched monster in, either to complete a forced switch after
    /// a faint or as this turn's action.
    pub async fn release_monster(
        &self,
        battle_id: Uuid,
        external_id: &str,
        monster_name: &str,
        message_words: u64,
    ) -> Result<Vec<String>> {
        let handle = self.battle_handle(battle_id)?;
        let mut messages = {
            let mut state = handle.lock().await;
            if state.battle.status != BattleStatus::Active {
                return Err(BattleError::BattleCompleted);
            }
            let participant = state
                .participant_by_external(external_id)
                .cloned()
                .ok_or(BattleError::ParticipantNotFound)?;

            let pending_for_actor = state
                .battle
                .pending_switch
                .as_ref()
                .is_some_and(|p| p.participant_id == participant.id);
            if !pending_for_actor {
                let current = state.current_participant().ok_or(BattleError::NotYourTurn)?;
                if current.id != participant.id {
                    return Err(BattleError::NotYourTurn);
                }
            }

            let key = monster_name.trim().to_lowercase();
            let bench_index = state
                .monsters
                .iter()
                .position(|m| {
                    m.owner == Some(participant.id)
                        && !m.is_active
                        && m.name.to_lowercase().contains(&key)
                })
                .ok_or_else(|| BattleError::MonsterNotFound(monster_name.to_string()))?;
            if state.monsters[bench_index].is_fainted {
                return Err(BattleError::IllegalSwitch(format!(
                    "{} has fainted and can't battle",
                    state.monsters[bench_index].name
                )));
            }

            let mut messages = self.perform_switch(&mut state, participant.id, bench_index);
            self.sink
                .publish(crate::combat::state::BattleEvent::MonsterSwitched {
                    battle_id,
                    participant_id: participant.id,
                    monster: state.monsters[bench_index].name.clone(),
                })
                .await;

            if pending_for_actor {
                state.battle.pending_switch = None;
            }
            let action = format!("switch:{}", state.monsters[bench_index].name);
            self.record_turn(&mut state, participant.id, &action, message_words);
            messages.extend(self.run_status_pass(&mut state, bench_index).await?);
            messages.extend(self.advance_turn(&mut state).await);
            self.check_victory(&mut state).await?;
            self.store.save(&state).await?;
            messages
        };
        messages.extend(self.process_npc_turns(battle_id).await?);
        Ok(messages)
    }

    /// Pull the active monster back without naming a replacement. The last
    /// able monster can't be withdrawn.
    pub async fn withdraw_monster(
        &self,
        battle_id: Uuid,
        external_id: &str,
        message_words: u64,
    ) -> Result<Vec<String>> {
        let handle = self.battle_handle(battle_id)?;
        let mut state = handle.lock().await;
        let participant = self.validate_actor(&state, external_id)?;
        let participant_id = participant.id;

        let active_index = state
            .active_monster_index(participant_id)
            .ok_or(BattleError::NoActiveMonster)?;
        if engine::is_trapped(&state.monsters[active_index]) {
            return Err(BattleError::IllegalSwitch(format!(
                "{} is trapped and can't be withdrawn",
                state.monsters[active_index].name
            )));
        }
        if state.bench_of(participant_id).is_empty() {
            return Err(BattleError::IllegalSwitch(
                "the last able monster can't be withdrawn".to_string(),
            ));
        }

        state.monsters[active_index].is_active = false;
        state.monsters[active_index].stat_stages.reset();
        state.battle.pending_switch = Some(crate::combat::state::PendingSwitch { participant_id });
        let name = state.monsters[active_index].name.clone();
        // The turn is spent at the release that follows; only the record
        // lands here.
        self.record_turn(&mut state, participant_id, "withdraw", message_words);
        self.store.save(&state).await?;
        info!(battle_id = %battle_id, monster = %name, "Monster withdrawn");
        Ok(vec![format!("{} was withdrawn! Choose a replacement.", name)])
    }

    fn validate_actor(&self, state: &BattleState, external_id: &str) -> Result<Participant> {
        if state.battle.status != BattleStatus::Active {
            return Err(BattleError::BattleCompleted);
        }
        let participant = state
            .participant_by_external(external_id)
            .cloned()
            .ok_or(BattleError::ParticipantNotFound)?;
        if let Some(pending) = &state.battle.pending_switch {
            if pending.participant_id == participant.id {
                return Err(BattleError::IllegalSwitch(
                    "a replacement monster must be sent out first".to_string(),
                ));
            }
        }
        let current = state.current_participant().ok_or(BattleError::NotYourTurn)?;
        if current.id != participant.id {
            return Err(BattleError::NotYourTurn);
        }
        Ok(participant)
    }

    fn record_turn(
        &self,
        state: &mut BattleState,
        participant_id: Uuid,
        action: &str,
        message_words: u64,
    ) {
        let turn = state.battle.current_turn;
        state.history.push(TurnRecord {
            turn,
            participant_id,
            action: action.to_string(),
            message_words,
            timestamp: Utc::now(),
        });
        if let Some(participant) = state
            .participants
            .iter_mut()
            .find(|p| p.id == participant_id)
        {
            participant.words_typed += message_words;
        }
    }
}

fn participant_name(state: &BattleState, participant_id: Uuid) -> String {
    state
        .participant(participant_id)
        .map(|p| p.display_name.clone())
        .unwrap_or_else(|| "Someone".to_string())
}

/// Resolve a target by 1-based index, exact name, or partial name; with no
/// spec the sole opposing active is chosen.
fn resolve_target(
    state: &BattleState,
    attacker_index: usize,
    target_spec: Option<&str>,
) -> Result<usize> {
    let side = state.monsters[attacker_index].side;
    let candidates = state.active_opponents_of(side);
    if candidates.is_empty() {
        return Err(BattleError::NoValidTarget);
    }
    let Some(spec) = target_spec.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(candidates[0]);
    };

    if let Ok(index) = spec.parse::<usize>() {
        return candidates
            .get(index.wrapping_sub(1))
            .copied()
            .ok_or_else(|| BattleError::UnknownTarget(spec.to_string()));
    }
    let lowered = spec.to_lowercase();
    if let Some(&exact) = candidates
        .iter()
        .find(|&&i| state.monsters[i].name.to_lowercase() == lowered)
    {
        return Ok(exact);
    }
    candidates
        .iter()
        .find(|&&i| state.monsters[i].name.to_lowercase().contains(&lowered))
        .copied()
        .ok_or_else(|| BattleError::UnknownTarget(spec.to_string()))
}

/// Disjoint mutable borrows of two monsters.
fn two_mut(
    monsters: &mut [BattleMonster],
    a: usize,
    b: usize,
) -> (&mut BattleMonster, &mut BattleMonster) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = monsters.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = monsters.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

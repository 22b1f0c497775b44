//! Battle lifecycle: creation, turn order, NPC turns, knockouts, victory,
//! and rewards. Actions taken by participants live in `actions.rs`.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::combat::ai::{self, AiDecision};
use crate::combat::damage::weather_chip_damage;
use crate::combat::state::{
    Battle, BattleEvent, BattleKind, BattleMonster, BattleState, BattleStatus, FieldState,
    Participant, PendingSwitch, SideState, TeamSide,
};
use crate::config::{AiDifficulty, Config};
use crate::error::{BattleError, Result};
use crate::moves::Move;
use crate::ports::{BattleStore, InventoryProvider, MonsterLedger, MoveCatalog, NotificationSink};
use crate::stats::CombatStats;
use crate::status::{engine, StatusEffect};
use crate::typing::ElementType;

/// Input snapshot for one monster entering a battle.
#[derive(Debug, Clone)]
pub struct MonsterEntry {
    pub persistent_id: Option<String>,
    pub name: String,
    pub level: u32,
    pub types: Vec<ElementType>,
    pub stats: CombatStats,
    /// 0 means "derive from level" (wild and NPC opponents).
    pub max_hp: u32,
    pub current_hp: Option<u32>,
    pub moves: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TrainerEntry {
    pub external_id: String,
    pub display_name: String,
    pub is_npc: bool,
    pub monsters: Vec<MonsterEntry>,
    /// Consumables an NPC trainer carries into the battle.
    pub items: Vec<String>,
}

/// Everything needed to open a battle.
#[derive(Debug, Clone)]
pub struct EncounterSpec {
    pub kind: BattleKind,
    pub players: Vec<TrainerEntry>,
    pub opponents: Vec<TrainerEntry>,
    /// External ids allowed to join the opposing side of a PvP battle.
    pub invited: Vec<String>,
    pub difficulty: AiDifficulty,
}

pub struct BattleManager {
    pub(crate) config: Config,
    pub(crate) battles: DashMap<Uuid, Arc<Mutex<BattleState>>>,
    pub(crate) store: Arc<dyn BattleStore>,
    pub(crate) sink: Arc<dyn NotificationSink>,
    pub(crate) catalog: Arc<dyn MoveCatalog>,
    pub(crate) inventory: Arc<dyn InventoryProvider>,
    pub(crate) ledger: Arc<dyn MonsterLedger>,
    pub(crate) difficulty: DashMap<Uuid, AiDifficulty>,
}

impl BattleManager {
    pub fn new(
        config: Config,
        store: Arc<dyn BattleStore>,
        sink: Arc<dyn NotificationSink>,
        catalog: Arc<dyn MoveCatalog>,
        inventory: Arc<dyn InventoryProvider>,
        ledger: Arc<dyn MonsterLedger>,
    ) -> Self {
        BattleManager {
            config,
            battles: DashMap::new(),
            store,
            sink,
            catalog,
            inventory,
            ledger,
            difficulty: DashMap::new(),
        }
    }

    /// Open a battle from an encounter spec and persist the initial state.
    pub async fn initialize_battle(&self, spec: EncounterSpec) -> Result<Uuid> {
        let battle_id = Uuid::new_v4();
        let mut participants = Vec::new();
        let mut monsters = Vec::new();

        for (side, trainers) in [
            (TeamSide::Players, &spec.players),
            (TeamSide::Opponents, &spec.opponents),
        ] {
            for trainer in trainers {
                let participant_id = Uuid::new_v4();
                participants.push(Participant {
                    id: participant_id,
                    external_id: trainer.external_id.clone(),
                    display_name: trainer.display_name.clone(),
                    side,
                    is_npc: trainer.is_npc,
                    words_typed: 0,
                    items: trainer.items.clone(),
                });
                for (position, entry) in trainer.monsters.iter().enumerate() {
                    monsters.push(build_monster(entry, participant_id, side, position));
                }
            }
        }

        let status = if spec.kind == BattleKind::Pvp && spec.opponents.is_empty() {
            BattleStatus::Pending
        } else {
            BattleStatus::Active
        };

        let state = BattleState {
            battle: Battle {
                id: battle_id,
                kind: spec.kind,
                status,
                current_turn: 1,
                current_participant_index: 0,
                winner: None,
                pending_switch: None,
                created_at: Utc::now(),
            },
            participants,
            monsters,
            field: FieldState::default(),
            player_side: SideState::default(),
            opponent_side: SideState::default(),
            history: Vec::new(),
        };

        self.store.save(&state).await?;
        self.sink
            .publish(BattleEvent::BattleStarted {
                battle_id,
                kind: spec.kind,
            })
            .await;
        info!(battle_id = %battle_id, kind = ?spec.kind, "Battle initialized");
        self.difficulty.insert(battle_id, spec.difficulty);
        self.battles
            .insert(battle_id, Arc::new(Mutex::new(state)));
        Ok(battle_id)
    }

    /// PvP join. The challenger owns the player side; anyone on the invite
    /// list lands on the opposing side; everyone else is turned away.
    pub async fn add_player(
        &self,
        battle_id: Uuid,
        invited: &[String],
        trainer: TrainerEntry,
    ) -> Result<()> {
        let handle = self.battle_handle(battle_id)?;
        let mut state = handle.lock().await;
        if state.battle.kind != BattleKind::Pvp {
            return Err(BattleError::IllegalSwitch(
                "only PvP battles accept joining trainers".to_string(),
            ));
        }
        if state.battle.status == BattleStatus::Completed {
            return Err(BattleError::BattleCompleted);
        }
        let side = if state.participants.is_empty() {
            TeamSide::Players
        } else if invited.iter().any(|i| *i == trainer.external_id) {
            TeamSide::Opponents
        } else {
            return Err(BattleError::NotInvited(trainer.display_name));
        };

        let participant_id = Uuid::new_v4();
        state.participants.push(Participant {
            id: participant_id,
            external_id: trainer.external_id.clone(),
            display_name: trainer.display_name.clone(),
            side,
            is_npc: false,
            words_typed: 0,
            items: Vec::new(),
        });
        for (position, entry) in trainer.monsters.iter().enumerate() {
            let monster = build_monster(entry, participant_id, side, position);
            state.monsters.push(monster);
        }
        if side == TeamSide::Opponents {
            state.battle.status = BattleStatus::Active;
        }
        self.store.save(&state).await?;
        Ok(())
    }

    pub(crate) fn battle_handle(&self, battle_id: Uuid) -> Result<Arc<Mutex<BattleState>>> {
        self.battles
            .get(&battle_id)
            .map(|entry| entry.clone())
            .ok_or(BattleError::BattleNotFound(battle_id))
    }

    /// Snapshot of the full state, for rendering. Live battles come from the
    /// registry; completed ones are read back from the store.
    pub async fn battle_state(&self, battle_id: Uuid) -> Result<BattleState> {
        if let Some(handle) = self.battles.get(&battle_id).map(|entry| entry.clone()) {
            let state = handle.lock().await;
            return Ok(state.clone());
        }
        self.store
            .load(battle_id)
            .await?
            .ok_or(BattleError::BattleNotFound(battle_id))
    }

    /// Advance to the next participant. On wraparound the round counter
    /// ticks along with field, side, and weather chip effects.
    pub(crate) async fn advance_turn(&self, state: &mut BattleState) -> Vec<String> {
        let mut messages = Vec::new();
        if state.participants.is_empty() {
            return messages;
        }
        let next = (state.battle.current_participant_index + 1) % state.participants.len();
        let wrapped = next <= state.battle.current_participant_index;
        state.battle.current_participant_index = next;
        if wrapped {
            state.battle.current_turn += 1;
            messages.extend(state.field.tick());
            messages.extend(state.player_side.tick());
            messages.extend(state.opponent_side.tick());
            let weather = state.field.weather;
            for monster in state
                .monsters
                .iter_mut()
                .filter(|m| m.is_active && !m.is_fainted)
            {
                if let Some(chip) = weather_chip_damage(weather, monster) {
                    monster.take_damage(chip);
                    messages.push(format!("{} is buffeted by the weather!", monster.name));
                }
            }
        }
        if let Some(current) = state.current_participant() {
            self.sink
                .publish(BattleEvent::TurnAdvanced {
                    battle_id: state.battle.id,
                    turn: state.battle.current_turn,
                    participant_id: current.id,
                })
                .await;
        }
        messages
    }

    /// Condition pass for the monster whose turn was just spent: damage and
    /// healing over time, duration ticks, leech transfers, and any faint
    /// that falls out of them. Runs whatever the action was.
    pub(crate) async fn run_status_pass(
        &self,
        state: &mut BattleState,
        monster_index: usize,
    ) -> Result<Vec<String>> {
        let mut messages = Vec::new();
        if state.monsters[monster_index].is_fainted {
            return Ok(messages);
        }
        let tick = engine::process_end_of_turn(&mut state.monsters[monster_index]);
        messages.extend(tick.messages);
        if let Some((beneficiary, amount)) = tick.drained {
            if let Some(seeder) = state
                .monsters
                .iter_mut()
                .find(|m| m.id == beneficiary && !m.is_fainted)
            {
                seeder.heal(amount);
            }
        }
        if state.monsters[monster_index].is_fainted {
            messages.extend(self.handle_knockout(state, monster_index).await?);
        }
        Ok(messages)
    }

    /// Run NPC turns until a human participant is up, the battle ends, or
    /// the iteration cap trips. The cap guards against mutual-skip loops.
    pub async fn process_npc_turns(&self, battle_id: Uuid) -> Result<Vec<String>> {
        let mut all_messages = Vec::new();
        let mut iterations = 0;
        while iterations < self.config.limits.ai_drain_cap {
            iterations += 1;
            // A finished battle has already left the registry.
            let Ok(handle) = self.battle_handle(battle_id) else {
                break;
            };
            let mut state = handle.lock().await;
            if state.battle.status != BattleStatus::Active {
                break;
            }
            let Some(current) = state.current_participant().cloned() else {
                break;
            };
            if !current.is_npc {
                break;
            }

            let messages = self.run_npc_action(&mut state, &current).await?;
            all_messages.extend(messages);
            all_messages.extend(self.advance_turn(&mut state).await);
            let completed = self.check_victory(&mut state).await?;
            self.store.save(&state).await?;
            if completed {
                break;
            }
        }
        if iterations >= self.config.limits.ai_drain_cap {
            warn!(battle_id = %battle_id, "NPC turn drain hit its cap");
        }
        Ok(all_messages)
    }

    async fn run_npc_action(
        &self,
        state: &mut BattleState,
        npc: &Participant,
    ) -> Result<Vec<String>> {
        let difficulty = self
            .difficulty
            .get(&state.battle.id)
            .map(|d| *d)
            .unwrap_or(AiDifficulty::Medium);
        let profile = self.config.ai.profile(difficulty);

        let known_moves = match state.active_monster(npc.id) {
            Some(active) => {
                let mut resolved: Vec<Move> = Vec::new();
                for name in &active.moves {
                    if let Some(mv) = self.catalog.get_move(name).await? {
                        resolved.push(mv);
                    }
                }
                resolved
            }
            None => Vec::new(),
        };

        let mut rng = SmallRng::from_entropy();
        let decision =
            ai::decide_action(state, npc.id, &profile, &known_moves, &npc.items, &mut rng);
        match decision {
            AiDecision::Attack { move_name, target_index } => {
                self.perform_attack(state, npc.id, &move_name, target_index, &mut rng)
                    .await
            }
            AiDecision::Switch { bench_index } => {
                let mut messages = self.perform_switch(state, npc.id, bench_index);
                if let Some(index) = state.active_monster_index(npc.id) {
                    messages.extend(self.run_status_pass(state, index).await?);
                }
                Ok(messages)
            }
            AiDecision::UseItem { item } => {
                let mut messages = self.apply_npc_item(state, npc, &item);
                if let Some(index) = state.active_monster_index(npc.id) {
                    messages.extend(self.run_status_pass(state, index).await?);
                }
                Ok(messages)
            }
            AiDecision::Wait => {
                let mut messages = vec![format!("{} is waiting...", npc.display_name)];
                if let Some(index) = state.active_monster_index(npc.id) {
                    messages.extend(self.run_status_pass(state, index).await?);
                }
                Ok(messages)
            }
        }
    }

    /// Spend one of an NPC's carried healing items on its active monster.
    fn apply_npc_item(
        &self,
        state: &mut BattleState,
        npc: &Participant,
        item: &str,
    ) -> Vec<String> {
        let Some(index) = state.active_monster_index(npc.id) else {
            return Vec::new();
        };
        let Some(&(_, amount)) = ai::HEAL_LADDER
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(item))
        else {
            return vec![format!("{} fumbled with a {}!", npc.display_name, item)];
        };
        if let Some(holder) = state.participants.iter_mut().find(|p| p.id == npc.id) {
            if let Some(slot) = holder
                .items
                .iter()
                .position(|held| held.eq_ignore_ascii_case(item))
            {
                holder.items.remove(slot);
            }
        }
        let monster = &mut state.monsters[index];
        monster.heal(amount);
        vec![format!(
            "{} used a {}! {} recovered HP!",
            npc.display_name, item, monster.name
        )]
    }

    pub(crate) fn perform_switch(
        &self,
        state: &mut BattleState,
        participant_id: Uuid,
        bench_index: usize,
    ) -> Vec<String> {
        let mut messages = Vec::new();
        if let Some(active) = state.active_monster_index(participant_id) {
            state.monsters[active].is_active = false;
            state.monsters[active].stat_stages.reset();
            messages.push(format!("{} withdrew!", state.monsters[active].name));
        }
        if let Some(monster) = state.monsters.get_mut(bench_index) {
            monster.is_active = true;
            messages.push(format!("{} was sent out!", monster.name));
            let name = monster.name.clone();
            let side = monster.side;
            // A teammate's parting sacrifice pays out to the newcomer.
            let banked = state
                .side_mut(side)
                .effects
                .iter()
                .position(|s| s.effect == StatusEffect::HealingWish);
            if let Some(slot) = banked {
                state.side_mut(side).effects.remove(slot);
                let monster = &mut state.monsters[bench_index];
                monster.current_hp = monster.max_hp;
                engine::cure_primary(monster);
                messages.push(format!(
                    "The parting wish came true! {} was fully restored!",
                    name
                ));
            }
            messages.extend(self.apply_entry_hazards(state, bench_index, side, &name));
        }
        messages
    }

    /// Hazards on the entering monster's own side trigger on switch-in.
    fn apply_entry_hazards(
        &self,
        state: &mut BattleState,
        monster_index: usize,
        side: TeamSide,
        name: &str,
    ) -> Vec<String> {
        let mut messages = Vec::new();
        let hazards: Vec<(StatusEffect, u8)> = state
            .side(side)
            .effects
            .iter()
            .filter(|s| {
                matches!(
                    s.effect,
                    StatusEffect::Spikes | StatusEffect::ToxicSpikes | StatusEffect::StealthRock
                )
            })
            .map(|s| (s.effect, s.stacks))
            .collect();
        for (hazard, stacks) in hazards {
            let monster = &mut state.monsters[monster_index];
            match hazard {
                StatusEffect::Spikes => {
                    let damage =
                        ((monster.max_hp as f64) * 0.125 * f64::from(stacks)).floor() as u32;
                    monster.take_damage(damage.max(1));
                    messages.push(format!("{} was hurt by the spikes!", name));
                }
                StatusEffect::StealthRock => {
                    let damage = (monster.max_hp / 8).max(1);
                    monster.take_damage(damage);
                    messages.push(format!("Pointed stones dug into {}!", name));
                }
                StatusEffect::ToxicSpikes => {
                    let effect = if stacks >= 2 {
                        StatusEffect::Toxic
                    } else {
                        StatusEffect::Poison
                    };
                    if engine::apply(monster, effect, None, None)
                        == engine::ApplyOutcome::Applied
                    {
                        messages.push(format!("{} was poisoned by the toxic spikes!", name));
                    }
                }
                _ => {}
            }
        }
        messages
    }

    /// Faint bookkeeping: level grants to the opposing side's surviving
    /// owned monsters, NPC auto-switch, and a switch prompt for humans.
    pub(crate) async fn handle_knockout(
        &self,
        state: &mut BattleState,
        fainted_index: usize,
    ) -> Result<Vec<String>> {
        let fainted = state.monsters[fainted_index].clone();
        let mut messages = vec![format!("{} fainted!", fainted.name)];
        self.sink
            .publish(BattleEvent::MonsterFainted {
                battle_id: state.battle.id,
                monster: fainted.name.clone(),
            })
            .await;

        // Only humans' owned monsters collect experience levels.
        let levels = 1 + fainted.level / 10;
        let beneficiaries: Vec<String> = state
            .monsters
            .iter()
            .filter(|m| m.side == fainted.side.opposite() && !m.is_fainted)
            .filter(|m| {
                m.owner
                    .and_then(|owner| state.participant(owner))
                    .is_some_and(|p| !p.is_npc)
            })
            .filter_map(|m| m.persistent_id.clone())
            .collect();
        for persistent_id in beneficiaries {
            if let Err(e) = self.ledger.grant_levels(&persistent_id, levels).await {
                error!(error = %e, persistent_id, "Level grant failed");
            } else {
                messages.push(format!("A monster grew {} level(s)!", levels));
            }
        }

        if let Some(owner_id) = fainted.owner {
            let owner = state.participant(owner_id).cloned();
            if let Some(owner) = owner {
                let bench = state.bench_of(owner_id);
                if let Some(&replacement) = bench.first() {
                    if owner.is_npc {
                        messages.extend(self.perform_switch(state, owner_id, replacement));
                    } else {
                        state.battle.pending_switch = Some(PendingSwitch {
                            participant_id: owner_id,
                        });
                        messages.push(format!(
                            "{} must send out another monster!",
                            owner.display_name
                        ));
                    }
                }
            }
        }
        Ok(messages)
    }

    /// Victory check: a side loses when it has no able monster left or its
    /// faint count reaches the knockout limit.
    pub(crate) async fn check_victory(&self, state: &mut BattleState) -> Result<bool> {
        if state.battle.status != BattleStatus::Active {
            return Ok(true);
        }
        for side in [TeamSide::Players, TeamSide::Opponents] {
            let has_able = state
                .monsters
                .iter()
                .any(|m| m.side == side && !m.is_fainted);
            let limit = (self.config.limits.default_knockout_limit as usize)
                .min(state.owned_count(side));
            let knocked_out = limit > 0 && state.fainted_count(side) >= limit;
            if !has_able || knocked_out {
                let winner = side.opposite();
                self.finish_battle(state, Some(winner)).await?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn finish_battle(
        &self,
        state: &mut BattleState,
        winner: Option<TeamSide>,
    ) -> Result<()> {
        state.battle.status = BattleStatus::Completed;
        state.battle.winner = winner;
        info!(battle_id = %state.battle.id, ?winner, "Battle completed");
        self.grant_rewards(state, winner).await;
        self.sink
            .publish(BattleEvent::BattleEnded {
                battle_id: state.battle.id,
                winner,
            })
            .await;
        self.store.save(state).await?;
        // The registry only carries live battles; the saved record remains
        // readable through `battle_state`.
        self.battles.remove(&state.battle.id);
        self.difficulty.remove(&state.battle.id);
        Ok(())
    }

    /// Experience and coins for every human participant. Winners earn a
    /// premium, and typing more words in the battle chat adds up to 50%.
    async fn grant_rewards(&self, state: &BattleState, winner: Option<TeamSide>) {
        for participant in state.participants.iter().filter(|p| !p.is_npc) {
            let won = Some(participant.side) == winner;
            let (exp_mult, coin_mult) = if won { (1.5, 1.2) } else { (1.0, 1.0) };
            let word_bonus = 1.0 + (participant.words_typed as f64 / 1000.0).min(0.5);
            let experience = (self.config.rewards.base_experience as f64 * exp_mult * word_bonus)
                .floor() as u64;
            let coins = (self.config.rewards.base_coins as f64 * coin_mult * word_bonus)
                .floor() as u64;
            if let Err(e) = self
                .ledger
                .grant_rewards(&participant.external_id, experience, coins)
                .await
            {
                error!(error = %e, trainer = %participant.external_id, "Reward grant failed");
                continue;
            }
            self.sink
                .publish(BattleEvent::RewardsGranted {
                    battle_id: state.battle.id,
                    participant_id: participant.id,
                    experience,
                    coins,
                })
                .await;
        }
    }

    /// Forcibly end a battle, optionally declaring a winner (forfeits,
    /// timeouts); `None` ends it with no winner at all.
    pub async fn force_end(&self, battle_id: Uuid, winner: Option<TeamSide>) -> Result<()> {
        let handle = self.battle_handle(battle_id)?;
        let mut state = handle.lock().await;
        self.finish_battle(&mut state, winner).await
    }
}

fn build_monster(
    entry: &MonsterEntry,
    owner: Uuid,
    side: TeamSide,
    position: usize,
) -> BattleMonster {
    let max_hp = if entry.max_hp > 0 {
        entry.max_hp
    } else {
        derived_hp(entry.level)
    };
    BattleMonster {
        id: Uuid::new_v4(),
        persistent_id: entry.persistent_id.clone(),
        owner: Some(owner),
        side,
        name: entry.name.clone(),
        level: entry.level,
        types: entry.types.clone(),
        stats: entry.stats,
        stat_stages: Default::default(),
        current_hp: entry.current_hp.unwrap_or(max_hp).min(max_hp),
        max_hp,
        moves: entry.moves.clone(),
        is_active: position == 0,
        is_fainted: entry.current_hp == Some(0),
        position,
        statuses: Vec::new(),
    }
}

/// HP for monsters that exist only inside this battle.
pub(crate) fn derived_hp(level: u32) -> u32 {
    (50 + level * 2).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{
        InMemoryBattleStore, InMemoryInventory, InMemoryLedger, InMemoryMoveCatalog, LoggingSink,
    };
    use pretty_assertions::assert_eq;

    pub(crate) fn manager() -> BattleManager {
        manager_with_catalog(InMemoryMoveCatalog::default())
    }

    pub(crate) fn manager_with_catalog(catalog: InMemoryMoveCatalog) -> BattleManager {
        BattleManager::new(
            Config::default(),
            Arc::new(InMemoryBattleStore::default()),
            Arc::new(LoggingSink),
            Arc::new(catalog),
            Arc::new(InMemoryInventory::default()),
            Arc::new(InMemoryLedger::default()),
        )
    }

    pub(crate) fn entry(name: &str, level: u32, ty: ElementType, moves: &[&str]) -> MonsterEntry {
        MonsterEntry {
            persistent_id: Some(format!("mon-{name}")),
            name: name.to_string(),
            level,
            types: vec![ty],
            stats: CombatStats {
                attack: 60,
                defense: 50,
                special_attack: 60,
                special_defense: 50,
                speed: 55,
            },
            max_hp: 100,
            current_hp: None,
            moves: moves.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub(crate) fn trainer(external_id: &str, name: &str, monsters: Vec<MonsterEntry>) -> TrainerEntry {
        TrainerEntry {
            external_id: external_id.to_string(),
            display_name: name.to_string(),
            is_npc: false,
            monsters,
            items: Vec::new(),
        }
    }

    fn wild_spec() -> EncounterSpec {
        let mut wild = entry("Zubat", 12, ElementType::Poison, &["Bite"]);
        wild.persistent_id = None;
        wild.max_hp = 0;
        EncounterSpec {
            kind: BattleKind::Wild,
            players: vec![trainer(
                "user#1",
                "Ash",
                vec![entry("Pikachu", 20, ElementType::Electric, &["Thunder Shock"])],
            )],
            opponents: vec![TrainerEntry {
                external_id: "wild".to_string(),
                display_name: "Wild Zubat".to_string(),
                is_npc: true,
                monsters: vec![wild],
                items: Vec::new(),
            }],
            invited: Vec::new(),
            difficulty: AiDifficulty::Easy,
        }
    }

    #[test]
    fn derived_hp_scales_with_level() {
        assert_eq!(derived_hp(0), 50);
        assert_eq!(derived_hp(25), 100);
    }

    #[tokio::test]
    async fn wild_battle_starts_active_with_derived_opponent_hp() {
        let manager = manager();
        let id = manager.initialize_battle(wild_spec()).await.unwrap();
        let state = manager.battle_state(id).await.unwrap();
        assert_eq!(state.battle.status, BattleStatus::Active);
        let zubat = state.monsters.iter().find(|m| m.name == "Zubat").unwrap();
        assert_eq!(zubat.max_hp, 50 + 12 * 2);
        assert!(state.monsters.iter().all(|m| m.is_active));
    }

    #[tokio::test]
    async fn pvp_without_opponent_is_pending_until_invite_accepted() {
        let manager = manager();
        let spec = EncounterSpec {
            kind: BattleKind::Pvp,
            players: vec![trainer(
                "user#1",
                "Ash",
                vec![entry("Pikachu", 20, ElementType::Electric, &["Thunder Shock"])],
            )],
            opponents: Vec::new(),
            invited: vec!["user#2".to_string()],
            difficulty: AiDifficulty::Medium,
        };
        let invited = spec.invited.clone();
        let id = manager.initialize_battle(spec).await.unwrap();
        let state = manager.battle_state(id).await.unwrap();
        assert_eq!(state.battle.status, BattleStatus::Pending);

        let uninvited = trainer(
            "user#3",
            "Gary",
            vec![entry("Eevee", 20, ElementType::Normal, &["Tackle"])],
        );
        let err = manager.add_player(id, &invited, uninvited).await;
        assert!(matches!(err, Err(BattleError::NotInvited(_))));

        let rival = trainer(
            "user#2",
            "Misty",
            vec![entry("Staryu", 20, ElementType::Water, &["Water Gun"])],
        );
        manager.add_player(id, &invited, rival).await.unwrap();
        let state = manager.battle_state(id).await.unwrap();
        assert_eq!(state.battle.status, BattleStatus::Active);
        let misty = state.participant_by_external("user#2").unwrap();
        assert_eq!(misty.side, TeamSide::Opponents);
    }

    #[tokio::test]
    async fn advance_turn_wraps_and_ticks_the_field() {
        let manager = manager();
        let id = manager.initialize_battle(wild_spec()).await.unwrap();
        let handle = manager.battle_handle(id).unwrap();
        let mut state = handle.lock().await;
        state.field.set_weather(crate::combat::state::Weather::Rain, 1);
        manager.advance_turn(&mut state).await;
        assert_eq!(state.battle.current_participant_index, 1);
        assert_eq!(state.battle.current_turn, 1);
        let messages = manager.advance_turn(&mut state).await;
        assert_eq!(state.battle.current_participant_index, 0);
        assert_eq!(state.battle.current_turn, 2);
        assert!(messages.iter().any(|m| m.contains("faded")));
    }

    #[derive(Default)]
    struct RecordingSink {
        events: std::sync::Mutex<Vec<BattleEvent>>,
    }

    #[async_trait::async_trait]
    impl crate::ports::NotificationSink for RecordingSink {
        async fn publish(&self, event: BattleEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[tokio::test]
    async fn turn_changes_reach_the_notification_sink() {
        let sink = Arc::new(RecordingSink::default());
        let manager = BattleManager::new(
            Config::default(),
            Arc::new(InMemoryBattleStore::default()),
            sink.clone(),
            Arc::new(InMemoryMoveCatalog::default()),
            Arc::new(InMemoryInventory::default()),
            Arc::new(InMemoryLedger::default()),
        );
        let id = manager.initialize_battle(wild_spec()).await.unwrap();
        let handle = manager.battle_handle(id).unwrap();
        let mut state = handle.lock().await;
        manager.advance_turn(&mut state).await;
        let events = sink.events.lock().unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            BattleEvent::TurnAdvanced { battle_id, .. } if *battle_id == id
        )));
    }

    #[tokio::test]
    async fn knockout_grants_levels_to_surviving_opponents() {
        let manager = manager();
        let id = manager.initialize_battle(wild_spec()).await.unwrap();
        let handle = manager.battle_handle(id).unwrap();
        let mut state = handle.lock().await;
        let zubat_index = state.monsters.iter().position(|m| m.name == "Zubat").unwrap();
        state.monsters[zubat_index].take_damage(u32::MAX);
        let messages = manager.handle_knockout(&mut state, zubat_index).await.unwrap();
        assert!(messages[0].contains("fainted"));
        // Level 12 grants 1 + 12/10 = 2 levels to Pikachu's ledger entry.
        assert!(messages.iter().any(|m| m.contains("2 level")));
    }

    #[tokio::test]
    async fn wiping_a_side_completes_the_battle_and_evicts_it() {
        let manager = manager();
        let id = manager.initialize_battle(wild_spec()).await.unwrap();
        let handle = manager.battle_handle(id).unwrap();
        let mut state = handle.lock().await;
        let zubat_index = state.monsters.iter().position(|m| m.name == "Zubat").unwrap();
        state.monsters[zubat_index].take_damage(u32::MAX);
        let done = manager.check_victory(&mut state).await.unwrap();
        assert!(done);
        assert_eq!(state.battle.status, BattleStatus::Completed);
        assert_eq!(state.battle.winner, Some(TeamSide::Players));
        drop(state);

        // The registry sheds the battle; the stored record stays readable.
        assert!(manager.battles.get(&id).is_none());
        assert!(manager.difficulty.get(&id).is_none());
        let reloaded = manager.battle_state(id).await.unwrap();
        assert_eq!(reloaded.battle.status, BattleStatus::Completed);
    }

    #[tokio::test]
    async fn force_end_records_the_declared_winner() {
        let manager = manager();
        let id = manager.initialize_battle(wild_spec()).await.unwrap();
        manager.force_end(id, None).await.unwrap();
        let state = manager.battle_state(id).await.unwrap();
        assert_eq!(state.battle.status, BattleStatus::Completed);
        assert_eq!(state.battle.winner, None);

        let id = manager.initialize_battle(wild_spec()).await.unwrap();
        manager
            .force_end(id, Some(TeamSide::Opponents))
            .await
            .unwrap();
        let state = manager.battle_state(id).await.unwrap();
        assert_eq!(state.battle.winner, Some(TeamSide::Opponents));
    }

    #[tokio::test]
    async fn npc_owned_monsters_collect_no_levels() {
        let manager = manager();
        let mut rival = trainer(
            "npc#rival",
            "Rival",
            vec![entry("Gible", 20, ElementType::Dragon, &["Tackle"])],
        );
        rival.is_npc = true;
        let spec = EncounterSpec {
            kind: BattleKind::Trainer,
            players: vec![trainer(
                "user#1",
                "Ash",
                vec![entry("Pikachu", 20, ElementType::Electric, &["Thunder Shock"])],
            )],
            opponents: vec![rival],
            invited: Vec::new(),
            difficulty: AiDifficulty::Medium,
        };
        let id = manager.initialize_battle(spec).await.unwrap();
        let handle = manager.battle_handle(id).unwrap();
        let mut state = handle.lock().await;
        let pikachu_index = state
            .monsters
            .iter()
            .position(|m| m.name == "Pikachu")
            .unwrap();
        state.monsters[pikachu_index].take_damage(u32::MAX);
        let messages = manager
            .handle_knockout(&mut state, pikachu_index)
            .await
            .unwrap();
        assert!(
            !messages.iter().any(|m| m.contains("level")),
            "{messages:?}"
        );
    }

    #[tokio::test]
    async fn item_turns_still_tick_the_users_conditions() {
        use crate::ports::InventoryProvider;

        let inventory = Arc::new(InMemoryInventory::default());
        let manager = BattleManager::new(
            Config::default(),
            Arc::new(InMemoryBattleStore::default()),
            Arc::new(LoggingSink),
            Arc::new(InMemoryMoveCatalog::with_moves(vec![Move::new(
                "Tackle",
                Some(40),
                ElementType::Normal,
            )])),
            inventory.clone(),
            Arc::new(InMemoryLedger::default()),
        );
        let id = manager.initialize_battle(wild_spec()).await.unwrap();
        inventory.grant("user#1", "potion", 1);
        {
            let handle = manager.battle_handle(id).unwrap();
            let mut state = handle.lock().await;
            let pikachu = state
                .monsters
                .iter_mut()
                .find(|m| m.name == "Pikachu")
                .unwrap();
            pikachu.current_hp = 54;
            engine::apply(pikachu, StatusEffect::Poison, Some(3), None);
            // Wipe the wild side so no NPC turn muddies the arithmetic.
            let zubat = state
                .monsters
                .iter_mut()
                .find(|m| m.name == "Zubat")
                .unwrap();
            zubat.take_damage(u32::MAX);
        }

        manager.use_item(id, "user#1", "Potion", 0).await.unwrap();

        let state = manager.battle_state(id).await.unwrap();
        let pikachu = state.monsters.iter().find(|m| m.name == "Pikachu").unwrap();
        // 54 + 20 from the potion, minus 100 / 8 poison damage.
        assert_eq!(pikachu.current_hp, 62);
        let poison = pikachu
            .statuses
            .iter()
            .find(|s| s.effect == StatusEffect::Poison)
            .unwrap();
        assert_eq!(poison.turns_remaining, 2);
        assert_eq!(inventory.count("user#1", "potion").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn npc_items_heal_and_are_spent() {
        let manager = manager();
        let mut spec = wild_spec();
        spec.opponents[0].items = vec!["Super Potion".to_string()];
        let id = manager.initialize_battle(spec).await.unwrap();
        let handle = manager.battle_handle(id).unwrap();
        let mut state = handle.lock().await;
        let npc = state
            .participants
            .iter()
            .find(|p| p.is_npc)
            .cloned()
            .unwrap();
        let zubat_index = state.monsters.iter().position(|m| m.name == "Zubat").unwrap();
        state.monsters[zubat_index].current_hp = 10;

        let messages = manager.apply_npc_item(&mut state, &npc, "Super Potion");
        assert!(messages[0].contains("recovered HP"), "{messages:?}");
        assert_eq!(state.monsters[zubat_index].current_hp, 60);
        let holder = state.participant(npc.id).unwrap();
        assert!(holder.items.is_empty());
    }

    #[tokio::test]
    async fn a_parting_wish_restores_the_replacement() {
        let manager = manager();
        let mut spec = wild_spec();
        spec.players[0]
            .monsters
            .push(entry("Snivy", 20, ElementType::Grass, &["Vine Whip"]));
        let id = manager.initialize_battle(spec).await.unwrap();
        let handle = manager.battle_handle(id).unwrap();
        let mut state = handle.lock().await;
        let ash = state
            .participants
            .iter()
            .find(|p| p.external_id == "user#1")
            .cloned()
            .unwrap();
        let snivy_index = state.monsters.iter().position(|m| m.name == "Snivy").unwrap();
        state.monsters[snivy_index].current_hp = 5;
        engine::apply(
            &mut state.monsters[snivy_index],
            StatusEffect::Burn,
            Some(3),
            None,
        );
        state.player_side.add(StatusEffect::HealingWish, -1);

        let messages = manager.perform_switch(&mut state, ash.id, snivy_index);
        assert!(
            messages.iter().any(|m| m.contains("parting wish")),
            "{messages:?}"
        );
        let snivy = &state.monsters[snivy_index];
        assert_eq!(snivy.current_hp, snivy.max_hp);
        assert!(!engine::has(snivy, StatusEffect::Burn));
        assert!(!state.player_side.has(StatusEffect::HealingWish));
    }
}

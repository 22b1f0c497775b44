//! Opponent decision making. Difficulty profiles trade randomness for
//! type-aware move selection and more disciplined item and switch use.

use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::combat::state::BattleState;
use crate::config::DifficultyProfile;
use crate::moves::Move;
use crate::typing::type_effectiveness;

const TARGET_HP_WEIGHT: f64 = 50.0;
const TARGET_TYPE_WEIGHT: f64 = 30.0;
const DEFAULT_MOVE_POWER: f64 = 40.0;
const HEAL_ROLL: f64 = 0.7;
const SWITCH_ROLL: f64 = 0.5;
const HEAL_OVERSHOOT: f64 = 1.2;

/// Healing items the AI knows how to weigh, smallest first.
pub const HEAL_LADDER: [(&str, u32); 3] = [("Potion", 20), ("Super Potion", 50), ("Hyper Potion", 200)];

/// Last-resort attack when none of the monster's moves resolve.
pub const FALLBACK_MOVE: &str = "Struggle";

#[derive(Debug, Clone, PartialEq)]
pub enum AiDecision {
    Attack {
        move_name: String,
        /// Index into `state.monsters`.
        target_index: usize,
    },
    UseItem {
        item: String,
    },
    Switch {
        /// Index into `state.monsters`.
        bench_index: usize,
    },
    Wait,
}

/// Pick an action for an NPC participant. `known_moves` carries catalogue
/// data for the active monster's moves; `held_items` is what the NPC can
/// spend this battle.
pub fn decide_action<R: Rng>(
    state: &BattleState,
    participant_id: Uuid,
    profile: &DifficultyProfile,
    known_moves: &[Move],
    held_items: &[String],
    rng: &mut R,
) -> AiDecision {
    let Some(active_index) = state.active_monster_index(participant_id) else {
        return AiDecision::Wait;
    };
    let active = &state.monsters[active_index];

    // Low HP: consider a heal, then a switch, before attacking.
    if active.hp_ratio() < profile.heal_threshold && rng.gen::<f64>() < HEAL_ROLL {
        if let Some(item) = pick_heal(active.max_hp - active.current_hp, held_items) {
            return AiDecision::UseItem { item };
        }
    }
    if active.hp_ratio() < profile.switch_threshold && rng.gen::<f64>() < SWITCH_ROLL {
        let bench = state.bench_of(participant_id);
        if let Some(best) = bench
            .into_iter()
            .max_by_key(|&i| state.monsters[i].current_hp)
        {
            return AiDecision::Switch { bench_index: best };
        }
    }

    let targets = state.active_opponents_of(active.side);
    let Some(target_index) = pick_target(state, &targets, known_moves) else {
        return AiDecision::Wait;
    };
    let target = &state.monsters[target_index];

    // Nothing resolvable: flail with a minimal generic attack rather than
    // stand idle while a target is up.
    if known_moves.is_empty() {
        return AiDecision::Attack {
            move_name: FALLBACK_MOVE.to_string(),
            target_index,
        };
    }

    // Easy opponents often just mash.
    if rng.gen::<f64>() < profile.random_chance {
        let pick = &known_moves[rng.gen_range(0..known_moves.len())];
        return AiDecision::Attack {
            move_name: pick.name.clone(),
            target_index,
        };
    }

    let mut best = &known_moves[0];
    let mut best_score = f64::MIN;
    for mv in known_moves {
        let effectiveness = type_effectiveness(mv.move_type, &target.types);
        let stab = if active.types.contains(&mv.move_type) { 1.5 } else { 1.0 };
        let power = mv.power.map(f64::from).unwrap_or(DEFAULT_MOVE_POWER);
        let accuracy = mv.accuracy.unwrap_or(100) as f64 / 100.0;
        let score = power * effectiveness * profile.type_advantage_weight * stab * accuracy;
        if score > best_score {
            best_score = score;
            best = mv;
        }
    }
    debug!(
        participant = %participant_id,
        move_name = %best.name,
        score = best_score,
        "AI selected move"
    );
    AiDecision::Attack {
        move_name: best.name.clone(),
        target_index,
    }
}

/// Score opposing actives by missing HP and aggregate type advantage.
fn pick_target(state: &BattleState, targets: &[usize], known_moves: &[Move]) -> Option<usize> {
    targets
        .iter()
        .copied()
        .max_by(|&a, &b| {
            let score = |i: usize| {
                let m = &state.monsters[i];
                let mut s = (1.0 - m.hp_ratio()) * TARGET_HP_WEIGHT;
                for mv in known_moves {
                    s += (type_effectiveness(mv.move_type, &m.types) - 1.0) * TARGET_TYPE_WEIGHT;
                }
                s
            };
            score(a)
                .partial_cmp(&score(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Smallest heal that covers the deficit with some slack; otherwise the
/// biggest one held.
fn pick_heal(missing_hp: u32, held_items: &[String]) -> Option<String> {
    let held: Vec<&(&str, u32)> = HEAL_LADDER
        .iter()
        .filter(|(name, _)| held_items.iter().any(|i| i.eq_ignore_ascii_case(name)))
        .collect();
    if held.is_empty() {
        return None;
    }
    held.iter()
        .find(|(_, amount)| f64::from(*amount) >= f64::from(missing_hp) / HEAL_OVERSHOOT)
        .or_else(|| held.last())
        .map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::state::{
        Battle, BattleKind, BattleMonster, BattleStatus, FieldState, Participant, SideState,
        TeamSide,
    };
    use crate::moves::MoveCategory;
    use crate::typing::ElementType;
    use chrono::Utc;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn deterministic() -> DifficultyProfile {
        DifficultyProfile {
            random_chance: 0.0,
            heal_threshold: 0.0,
            switch_threshold: 0.0,
            type_advantage_weight: 0.9,
        }
    }

    fn battle_with(monsters: Vec<BattleMonster>, participants: Vec<Participant>) -> BattleState {
        BattleState {
            battle: Battle {
                id: Uuid::new_v4(),
                kind: BattleKind::Wild,
                status: BattleStatus::Active,
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
        }
    }

    fn npc(id: Uuid) -> Participant {
        Participant {
            id,
            external_id: "npc".into(),
            display_name: "Rival".into(),
            side: TeamSide::Opponents,
            is_npc: true,
            words_typed: 0,
            items: Vec::new(),
        }
    }

    #[test]
    fn prefers_the_super_effective_move() {
        let npc_id = Uuid::new_v4();
        let mut attacker =
            BattleMonster::test_monster("Quaxly", 20, 60, vec![ElementType::Water]);
        attacker.owner = Some(npc_id);
        attacker.side = TeamSide::Opponents;
        attacker.moves = vec!["Water Gun".into(), "Peck".into()];
        let target = BattleMonster::test_monster("Charcadet", 20, 55, vec![ElementType::Fire]);
        let state = battle_with(vec![attacker, target], vec![npc(npc_id)]);

        let moves = vec![
            Move::new("Water Gun", Some(40), ElementType::Water)
                .with_category(MoveCategory::Special),
            Move::new("Peck", Some(35), ElementType::Flying),
        ];
        let mut rng = SmallRng::seed_from_u64(11);
        let decision = decide_action(&state, npc_id, &deterministic(), &moves, &[], &mut rng);
        assert!(
            matches!(decision, AiDecision::Attack { ref move_name, .. } if move_name == "Water Gun")
        );
    }

    #[test]
    fn heals_when_hurt_and_holding_a_potion() {
        let npc_id = Uuid::new_v4();
        let mut attacker = BattleMonster::test_monster("Gible", 20, 100, vec![ElementType::Dragon]);
        attacker.owner = Some(npc_id);
        attacker.side = TeamSide::Opponents;
        attacker.current_hp = 10;
        let target = BattleMonster::test_monster("Pichu", 20, 40, vec![ElementType::Electric]);
        let state = battle_with(vec![attacker, target], vec![npc(npc_id)]);

        let profile = DifficultyProfile {
            heal_threshold: 0.4,
            ..deterministic()
        };
        let moves = vec![Move::new("Tackle", Some(40), ElementType::Normal)];
        // Seeds where the 0.7 heal roll passes.
        let mut healed = false;
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            if let AiDecision::UseItem { .. } = decide_action(
                &state,
                npc_id,
                &profile,
                &moves,
                &["Super Potion".to_string()],
                &mut rng,
            ) {
                healed = true;
                break;
            }
        }
        assert!(healed);
    }

    #[test]
    fn heal_ladder_picks_the_smallest_sufficient_item() {
        let held = vec![
            "Potion".to_string(),
            "Super Potion".to_string(),
            "Hyper Potion".to_string(),
        ];
        assert_eq!(pick_heal(15, &held), Some("Potion".to_string()));
        assert_eq!(pick_heal(55, &held), Some("Super Potion".to_string()));
        assert_eq!(pick_heal(180, &held), Some("Hyper Potion".to_string()));
        // Nothing covers it: take the biggest held.
        assert_eq!(pick_heal(500, &held), Some("Hyper Potion".to_string()));
        assert_eq!(pick_heal(10, &[]), None);
    }

    #[test]
    fn waits_without_moves_or_targets() {
        let npc_id = Uuid::new_v4();
        let mut attacker = BattleMonster::test_monster("Ditto", 20, 48, vec![ElementType::Normal]);
        attacker.owner = Some(npc_id);
        attacker.side = TeamSide::Opponents;
        let state = battle_with(vec![attacker], vec![npc(npc_id)]);
        let mut rng = SmallRng::seed_from_u64(5);
        let decision = decide_action(&state, npc_id, &deterministic(), &[], &[], &mut rng);
        assert_eq!(decision, AiDecision::Wait);
    }

    #[test]
    fn flails_when_no_move_resolves_but_a_target_stands() {
        let npc_id = Uuid::new_v4();
        let mut attacker = BattleMonster::test_monster("Ditto", 20, 48, vec![ElementType::Normal]);
        attacker.owner = Some(npc_id);
        attacker.side = TeamSide::Opponents;
        let target = BattleMonster::test_monster("Pichu", 20, 40, vec![ElementType::Electric]);
        let state = battle_with(vec![attacker, target], vec![npc(npc_id)]);
        let mut rng = SmallRng::seed_from_u64(5);
        let decision = decide_action(&state, npc_id, &deterministic(), &[], &[], &mut rng);
        assert!(
            matches!(decision, AiDecision::Attack { ref move_name, .. } if move_name == FALLBACK_MOVE)
        );
    }

    #[test]
    fn type_advantage_outweighs_raw_power() {
        let npc_id = Uuid::new_v4();
        let mut attacker =
            BattleMonster::test_monster("Goomy", 20, 45, vec![ElementType::Dragon]);
        attacker.owner = Some(npc_id);
        attacker.side = TeamSide::Opponents;
        let target = BattleMonster::test_monster("Charcadet", 20, 55, vec![ElementType::Fire]);
        let state = battle_with(vec![attacker, target], vec![npc(npc_id)]);

        let profile = DifficultyProfile {
            type_advantage_weight: 0.3,
            ..deterministic()
        };
        // Neither move gets STAB: 60 * 1.0 * 0.3 = 18 versus 40 * 2.0 * 0.3 = 24.
        let moves = vec![
            Move::new("Slam", Some(60), ElementType::Normal),
            Move::new("Water Gun", Some(40), ElementType::Water)
                .with_category(MoveCategory::Special),
        ];
        let mut rng = SmallRng::seed_from_u64(3);
        let decision = decide_action(&state, npc_id, &profile, &moves, &[], &mut rng);
        assert!(
            matches!(decision, AiDecision::Attack { ref move_name, .. } if move_name == "Water Gun")
        );
    }

    #[test]
    fn targets_the_weakest_opponent() {
        let npc_id = Uuid::new_v4();
        let mut attacker = BattleMonster::test_monster("Luxray", 30, 90, vec![ElementType::Electric]);
        attacker.owner = Some(npc_id);
        attacker.side = TeamSide::Opponents;
        let healthy = BattleMonster::test_monster("Azumarill", 30, 100, vec![ElementType::Water]);
        let mut hurt = BattleMonster::test_monster("Floatzel", 30, 100, vec![ElementType::Water]);
        hurt.current_hp = 20;
        let state = battle_with(vec![attacker, healthy, hurt], vec![npc(npc_id)]);
        let moves = vec![Move::new("Spark", Some(65), ElementType::Electric)];
        let mut rng = SmallRng::seed_from_u64(2);
        let decision = decide_action(&state, npc_id, &deterministic(), &moves, &[], &mut rng);
        assert!(matches!(decision, AiDecision::Attack { target_index: 2, .. }));
    }
}

//! End-to-end battle flows through the public API, backed by the in-memory
//! collaborators.

use std::sync::Arc;

use battle_engine::combat::state::BattleStatus;
use battle_engine::combat::{BattleKind, TeamSide};
use battle_engine::moves::{Move, MoveCategory};
use battle_engine::ports::{
    InMemoryBattleStore, InMemoryInventory, InMemoryLedger, InMemoryMoveCatalog, LoggingSink,
};
use battle_engine::stats::CombatStats;
use battle_engine::status::StatusEffect;
use battle_engine::typing::ElementType;
use battle_engine::{
    AiDifficulty, BattleError, BattleManager, Config, EncounterSpec, MonsterEntry, TrainerEntry,
};

struct Harness {
    manager: BattleManager,
    ledger: Arc<InMemoryLedger>,
    inventory: Arc<InMemoryInventory>,
}

fn harness(moves: Vec<Move>) -> Harness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let ledger = Arc::new(InMemoryLedger::default());
    let inventory = Arc::new(InMemoryInventory::default());
    let manager = BattleManager::new(
        Config::default(),
        Arc::new(InMemoryBattleStore::default()),
        Arc::new(LoggingSink),
        Arc::new(InMemoryMoveCatalog::with_moves(moves)),
        inventory.clone(),
        ledger.clone(),
    );
    Harness {
        manager,
        ledger,
        inventory,
    }
}

fn monster(name: &str, level: u32, ty: ElementType, moves: &[&str]) -> MonsterEntry {
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

fn wild_encounter(player: MonsterEntry, mut wild: MonsterEntry) -> EncounterSpec {
    wild.persistent_id = None;
    EncounterSpec {
        kind: BattleKind::Wild,
        players: vec![TrainerEntry {
            external_id: "user#1".to_string(),
            display_name: "Ash".to_string(),
            is_npc: false,
            monsters: vec![player],
            items: Vec::new(),
        }],
        opponents: vec![TrainerEntry {
            external_id: "wild".to_string(),
            display_name: "Wild Monster".to_string(),
            is_npc: true,
            monsters: vec![wild],
            items: Vec::new(),
        }],
        invited: Vec::new(),
        difficulty: AiDifficulty::Easy,
    }
}

#[tokio::test]
async fn one_shot_knockout_completes_the_battle_and_pays_out() {
    let h = harness(vec![
        Move::new("Hyper Beam", Some(150), ElementType::Normal),
        Move::new("Tackle", Some(40), ElementType::Normal),
    ]);
    let mut player = monster("Snorlax", 50, ElementType::Normal, &["Hyper Beam"]);
    player.stats.attack = 200;
    let mut wild = monster("Zubat", 12, ElementType::Poison, &["Tackle"]);
    wild.stats.defense = 1;
    wild.max_hp = 30;

    let id = h
        .manager
        .initialize_battle(wild_encounter(player, wild))
        .await
        .unwrap();
    let messages = h
        .manager
        .execute_attack(id, "user#1", None, "Hyper Beam", None, 0)
        .await
        .unwrap();
    assert!(messages.iter().any(|m| m.contains("fainted")), "{messages:?}");

    let state = h.manager.battle_state(id).await.unwrap();
    assert_eq!(state.battle.status, BattleStatus::Completed);
    assert_eq!(state.battle.winner, Some(TeamSide::Players));

    // Level 12 knockout grants 1 + 12/10 = 2 levels to the survivor.
    assert_eq!(
        h.ledger.level_grants.get("mon-Snorlax").map(|v| *v),
        Some(2)
    );
    // Winner rewards with no word bonus: 100 * 1.5 exp, 50 * 1.2 coins.
    assert_eq!(
        h.ledger.reward_grants.get("user#1").map(|v| *v),
        Some((150, 60))
    );
}

#[tokio::test]
async fn chatty_winners_earn_the_capped_word_bonus() {
    let h = harness(vec![
        Move::new("Hyper Beam", Some(150), ElementType::Normal),
        Move::new("Tackle", Some(40), ElementType::Normal),
    ]);
    let mut player = monster("Snorlax", 50, ElementType::Normal, &["Hyper Beam"]);
    player.stats.attack = 200;
    let mut wild = monster("Zubat", 12, ElementType::Poison, &["Tackle"]);
    wild.stats.defense = 1;
    wild.max_hp = 30;

    let id = h
        .manager
        .initialize_battle(wild_encounter(player, wild))
        .await
        .unwrap();
    h.manager
        .execute_attack(id, "user#1", None, "Hyper Beam", None, 1000)
        .await
        .unwrap();

    // floor(100 * 1.5 * 1.5) exp and floor(50 * 1.2 * 1.5) coins.
    assert_eq!(
        h.ledger.reward_grants.get("user#1").map(|v| *v),
        Some((225, 90))
    );
}

#[tokio::test]
async fn high_level_knockout_grants_more_levels() {
    let h = harness(vec![
        Move::new("Hyper Beam", Some(150), ElementType::Normal),
        Move::new("Tackle", Some(40), ElementType::Normal),
    ]);
    let mut player = monster("Garchomp", 60, ElementType::Dragon, &["Hyper Beam"]);
    player.stats.attack = 250;
    let mut wild = monster("Onix", 40, ElementType::Rock, &["Tackle"]);
    wild.stats.defense = 1;
    wild.max_hp = 20;

    let id = h
        .manager
        .initialize_battle(wild_encounter(player, wild))
        .await
        .unwrap();
    h.manager
        .execute_attack(id, "user#1", None, "Hyper Beam", None, 0)
        .await
        .unwrap();

    // 1 + 40/10 = 5 levels.
    assert_eq!(
        h.ledger.level_grants.get("mon-Garchomp").map(|v| *v),
        Some(5)
    );
}

#[tokio::test]
async fn toxic_sticks_to_the_target() {
    let h = harness(vec![Move::new("Tackle", Some(40), ElementType::Normal)]);
    let player = monster("Venomoth", 30, ElementType::Poison, &["Toxic"]);
    let wild = monster("Bidoof", 30, ElementType::Normal, &["Tackle"]);

    let id = h
        .manager
        .initialize_battle(wild_encounter(player, wild))
        .await
        .unwrap();
    let messages = h
        .manager
        .execute_attack(id, "user#1", None, "Toxic", None, 0)
        .await
        .unwrap();
    assert!(
        messages.iter().any(|m| m.contains("badly poisoned")),
        "{messages:?}"
    );

    let state = h.manager.battle_state(id).await.unwrap();
    let bidoof = state.monsters.iter().find(|m| m.name == "Bidoof").unwrap();
    assert!(bidoof
        .statuses
        .iter()
        .any(|s| s.effect == StatusEffect::Toxic));
}

#[tokio::test]
async fn unrecognized_status_move_degrades_to_a_plain_attack() {
    let h = harness(vec![
        Move::new("Mystic Jig", None, ElementType::Fairy).with_category(MoveCategory::Status),
        Move::new("Tackle", Some(40), ElementType::Normal),
    ]);
    let player = monster("Clefairy", 30, ElementType::Fairy, &["Mystic Jig"]);
    let mut wild = monster("Bidoof", 30, ElementType::Normal, &["Tackle"]);
    wild.max_hp = 200;

    let id = h
        .manager
        .initialize_battle(wild_encounter(player, wild))
        .await
        .unwrap();
    h.manager
        .execute_attack(id, "user#1", None, "Mystic Jig", None, 0)
        .await
        .unwrap();

    let state = h.manager.battle_state(id).await.unwrap();
    let bidoof = state.monsters.iter().find(|m| m.name == "Bidoof").unwrap();
    assert!(
        bidoof.current_hp < bidoof.max_hp,
        "fallback attack should have dealt damage"
    );
}

#[tokio::test]
async fn items_heal_and_draw_down_inventory() {
    let h = harness(vec![Move::new("Tackle", Some(40), ElementType::Normal)]);
    let mut player = monster("Pikachu", 25, ElementType::Electric, &["Tackle"]);
    player.current_hp = Some(40);
    let wild = monster("Bidoof", 25, ElementType::Normal, &["Tackle"]);

    let id = h
        .manager
        .initialize_battle(wild_encounter(player, wild))
        .await
        .unwrap();
    h.inventory.grant("user#1", "Potion", 1);

    let messages = h
        .manager
        .use_item(id, "user#1", "Potion", 0)
        .await
        .unwrap();
    assert!(
        messages.iter().any(|m| m.contains("recovered HP")),
        "{messages:?}"
    );
    use battle_engine::ports::InventoryProvider;
    assert_eq!(h.inventory.count("user#1", "potion").await.unwrap(), 0);

    let err = h.manager.use_item(id, "user#1", "Potion", 0).await;
    assert!(matches!(err, Err(BattleError::InsufficientInventory(_))));
}

#[tokio::test]
async fn withdraw_then_release_swaps_the_active_monster() {
    let h = harness(vec![Move::new("Tackle", Some(40), ElementType::Normal)]);
    let lead = monster("Oshawott", 20, ElementType::Water, &["Tackle"]);
    let bench = monster("Snivy", 20, ElementType::Grass, &["Tackle"]);
    let wild = monster("Bidoof", 20, ElementType::Normal, &["Tackle"]);

    let mut spec = wild_encounter(lead, wild);
    spec.players[0].monsters.push(bench);
    let id = h.manager.initialize_battle(spec).await.unwrap();

    let messages = h.manager.withdraw_monster(id, "user#1", 4).await.unwrap();
    assert!(messages[0].contains("withdrawn"), "{messages:?}");

    // The pending switch blocks attacking until a replacement is out.
    let err = h
        .manager
        .execute_attack(id, "user#1", None, "Tackle", None, 0)
        .await;
    assert!(matches!(err, Err(BattleError::IllegalSwitch(_))));

    h.manager
        .release_monster(id, "user#1", "Snivy", 3)
        .await
        .unwrap();
    let state = h.manager.battle_state(id).await.unwrap();
    let snivy = state.monsters.iter().find(|m| m.name == "Snivy").unwrap();
    assert!(snivy.is_active);
    let oshawott = state
        .monsters
        .iter()
        .find(|m| m.name == "Oshawott")
        .unwrap();
    assert!(!oshawott.is_active);

    // Both actions land in the history with their word counts.
    assert!(state.history.iter().any(|r| r.action == "withdraw"));
    assert!(state.history.iter().any(|r| r.action == "switch:Snivy"));
    let ash = state.participant_by_external("user#1").unwrap();
    assert_eq!(ash.words_typed, 7);
}

#[tokio::test]
async fn parting_shot_waits_for_the_trainer_to_pick_a_replacement() {
    let h = harness(vec![Move::new("Tackle", Some(40), ElementType::Normal)]);
    let lead = monster("Meowscarada", 30, ElementType::Grass, &["Parting Shot"]);
    let bench = monster("Skeledirge", 30, ElementType::Fire, &["Tackle"]);
    let wild = monster("Bidoof", 20, ElementType::Normal, &["Tackle"]);

    let mut spec = wild_encounter(lead, wild);
    spec.players[0].monsters.push(bench);
    let id = h.manager.initialize_battle(spec).await.unwrap();

    let messages = h
        .manager
        .execute_attack(id, "user#1", None, "Parting Shot", None, 0)
        .await
        .unwrap();
    assert!(
        messages.iter().any(|m| m.contains("choose a replacement")),
        "{messages:?}"
    );

    let err = h
        .manager
        .execute_attack(id, "user#1", None, "Tackle", None, 0)
        .await;
    assert!(matches!(err, Err(BattleError::IllegalSwitch(_))));

    h.manager
        .release_monster(id, "user#1", "Skeledirge", 0)
        .await
        .unwrap();
    let state = h.manager.battle_state(id).await.unwrap();
    let replacement = state
        .monsters
        .iter()
        .find(|m| m.name == "Skeledirge")
        .unwrap();
    assert!(replacement.is_active);
    assert!(state.battle.pending_switch.is_none());
}

#[tokio::test]
async fn outsiders_cannot_act_in_a_battle() {
    let h = harness(vec![Move::new("Tackle", Some(40), ElementType::Normal)]);
    let player = monster("Pikachu", 25, ElementType::Electric, &["Tackle"]);
    let wild = monster("Bidoof", 25, ElementType::Normal, &["Tackle"]);

    let id = h
        .manager
        .initialize_battle(wild_encounter(player, wild))
        .await
        .unwrap();
    let err = h
        .manager
        .execute_attack(id, "user#999", None, "Tackle", None, 0)
        .await;
    assert!(matches!(err, Err(BattleError::ParticipantNotFound)));

    let err = h
        .manager
        .execute_attack(id, "user#1", None, "Splash Kick", None, 0)
        .await;
    assert!(matches!(err, Err(BattleError::UnknownMove { .. })));
}

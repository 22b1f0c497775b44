//! Battle orchestration: state, the damage pipeline, opponent AI, and the
//! manager that drives turns end to end.

pub mod actions;
pub mod ai;
pub mod damage;
pub mod manager;
pub mod messages;
pub mod state;

pub use manager::{BattleManager, EncounterSpec, MonsterEntry, TrainerEntry};
pub use state::{BattleEvent, BattleKind, BattleState, BattleStatus, TeamSide};

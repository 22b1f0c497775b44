//! Turn-based monster battle engine.
//!
//! The [`combat::BattleManager`] owns every live battle and exposes the
//! operations a delivery layer needs: open a battle, take attack, item, and
//! switch actions, and let NPC opponents play their turns. Persistence,
//! notifications, move data, inventory, and the long-lived monster ledger
//! are supplied through the traits in [`ports`].

pub mod combat;
pub mod config;
pub mod error;
pub mod moves;
pub mod ports;
pub mod resolver;
pub mod stats;
pub mod status;
pub mod typing;

pub use combat::{BattleManager, EncounterSpec, MonsterEntry, TrainerEntry};
pub use config::{AiDifficulty, Config};
pub use error::{BattleError, Result};

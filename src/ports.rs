//! Collaborator interfaces the engine is parameterized over. The delivery
//! layer supplies real implementations; the in-memory ones here back tests
//! and local play.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::combat::state::{BattleEvent, BattleState};
use crate::error::{BattleError, Result};
use crate::moves::Move;

/// Durable battle persistence. The whole state serializes as one document.
#[async_trait]
pub trait BattleStore: Send + Sync {
    async fn save(&self, state: &BattleState) -> Result<()>;
    async fn load(&self, id: Uuid) -> Result<Option<BattleState>>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Outbound battle events. Failures here must never abort a battle; callers
/// log and continue.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: BattleEvent);
}

/// Read-only move reference data.
#[async_trait]
pub trait MoveCatalog: Send + Sync {
    async fn get_move(&self, name: &str) -> Result<Option<Move>>;
}

/// Item ownership, keyed by the participant's external id.
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    async fn count(&self, owner: &str, item: &str) -> Result<u32>;
    async fn consume(&self, owner: &str, item: &str, quantity: u32) -> Result<()>;
}

/// Long-lived monster and trainer records outside any battle.
#[async_trait]
pub trait MonsterLedger: Send + Sync {
    async fn grant_levels(&self, persistent_id: &str, levels: u32) -> Result<()>;
    async fn grant_rewards(&self, external_id: &str, experience: u64, coins: u64) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryBattleStore {
    battles: DashMap<Uuid, String>,
}

#[async_trait]
impl BattleStore for InMemoryBattleStore {
    async fn save(&self, state: &BattleState) -> Result<()> {
        let payload =
            serde_json::to_string(state).map_err(|e| BattleError::Store(e.to_string()))?;
        self.battles.insert(state.battle.id, payload);
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Option<BattleState>> {
        match self.battles.get(&id) {
            Some(payload) => serde_json::from_str(&payload)
                .map(Some)
                .map_err(|e| BattleError::Store(e.to_string())),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.battles.remove(&id);
        Ok(())
    }
}

/// Sink that just logs; the default when no chat surface is wired up.
#[derive(Default)]
pub struct LoggingSink;

#[async_trait]
impl NotificationSink for LoggingSink {
    async fn publish(&self, event: BattleEvent) {
        info!(?event, "Battle event");
    }
}

#[derive(Default)]
pub struct InMemoryMoveCatalog {
    moves: DashMap<String, Move>,
}

impl InMemoryMoveCatalog {
    pub fn with_moves(moves: impl IntoIterator<Item = Move>) -> Self {
        let catalog = Self::default();
        for mv in moves {
            catalog.moves.insert(mv.name.to_ascii_lowercase(), mv);
        }
        catalog
    }
}

#[async_trait]
impl MoveCatalog for InMemoryMoveCatalog {
    async fn get_move(&self, name: &str) -> Result<Option<Move>> {
        Ok(self
            .moves
            .get(&name.trim().to_ascii_lowercase())
            .map(|m| m.clone()))
    }
}

#[derive(Default)]
pub struct InMemoryInventory {
    items: DashMap<(String, String), u32>,
}

impl InMemoryInventory {
    pub fn grant(&self, owner: &str, item: &str, quantity: u32) {
        *self
            .items
            .entry((owner.to_string(), item.to_ascii_lowercase()))
            .or_insert(0) += quantity;
    }
}

#[async_trait]
impl InventoryProvider for InMemoryInventory {
    async fn count(&self, owner: &str, item: &str) -> Result<u32> {
        Ok(self
            .items
            .get(&(owner.to_string(), item.to_ascii_lowercase()))
            .map(|c| *c)
            .unwrap_or(0))
    }

    async fn consume(&self, owner: &str, item: &str, quantity: u32) -> Result<()> {
        let key = (owner.to_string(), item.to_ascii_lowercase());
        let mut entry = self
            .items
            .get_mut(&key)
            .ok_or_else(|| BattleError::InsufficientInventory(item.to_string()))?;
        if *entry < quantity {
            return Err(BattleError::InsufficientInventory(item.to_string()));
        }
        *entry -= quantity;
        Ok(())
    }
}

/// Ledger that records grants in memory; tests assert against it.
#[derive(Default)]
pub struct InMemoryLedger {
    pub level_grants: DashMap<String, u32>,
    pub reward_grants: DashMap<String, (u64, u64)>,
}

#[async_trait]
impl MonsterLedger for InMemoryLedger {
    async fn grant_levels(&self, persistent_id: &str, levels: u32) -> Result<()> {
        *self
            .level_grants
            .entry(persistent_id.to_string())
            .or_insert(0) += levels;
        Ok(())
    }

    async fn grant_rewards(&self, external_id: &str, experience: u64, coins: u64) -> Result<()> {
        let mut entry = self
            .reward_grants
            .entry(external_id.to_string())
            .or_insert((0, 0));
        entry.0 += experience;
        entry.1 += coins;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::ElementType;

    #[tokio::test]
    async fn inventory_consumes_down_to_zero() {
        let inventory = InMemoryInventory::default();
        inventory.grant("trainer#1", "Potion", 2);
        assert_eq!(inventory.count("trainer#1", "potion").await.unwrap(), 2);
        inventory.consume("trainer#1", "Potion", 2).await.unwrap();
        assert!(inventory.consume("trainer#1", "Potion", 1).await.is_err());
    }

    #[tokio::test]
    async fn catalog_lookups_ignore_case() {
        let catalog = InMemoryMoveCatalog::with_moves([Move::new(
            "Ember",
            Some(40),
            ElementType::Fire,
        )]);
        assert!(catalog.get_move("ember").await.unwrap().is_some());
        assert!(catalog.get_move(" EMBER ").await.unwrap().is_some());
        assert!(catalog.get_move("blizzard").await.unwrap().is_none());
    }
}

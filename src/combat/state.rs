use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::{CombatStats, StatStages};
use crate::status::{StatusEffect, StatusInstance};
use crate::typing::ElementType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    Pending,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleKind {
    /// One trainer against an ownerless encounter monster.
    Wild,
    /// Trainer versus trainer; the invited side joins on acceptance.
    Pvp,
    /// Trainer versus a scripted NPC team.
    Trainer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Players,
    Opponents,
}

impl TeamSide {
    pub fn opposite(&self) -> TeamSide {
        match self {
            TeamSide::Players => TeamSide::Opponents,
            TeamSide::Opponents => TeamSide::Players,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    /// External identity (chat user id or NPC tag); empty for wild encounters.
    pub external_id: String,
    pub display_name: String,
    pub side: TeamSide,
    pub is_npc: bool,
    /// Words typed across the battle, fed into the reward bonus.
    pub words_typed: u64,
    /// Items an NPC trainer brought along. Humans draw from the inventory
    /// provider instead.
    #[serde(default)]
    pub items: Vec<String>,
}

/// A monster's frozen battle snapshot. Base stats and types are copied in at
/// entry time; only HP, stages, and statuses change during the battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleMonster {
    pub id: Uuid,
    /// Ledger id of the owned monster this snapshot was taken from, when the
    /// monster exists outside the battle. Wild and NPC monsters have none.
    pub persistent_id: Option<String>,
    pub owner: Option<Uuid>,
    pub side: TeamSide,
    pub name: String,
    pub level: u32,
    pub types: Vec<ElementType>,
    pub stats: CombatStats,
    pub stat_stages: StatStages,
    pub current_hp: u32,
    pub max_hp: u32,
    pub moves: Vec<String>,
    pub is_active: bool,
    pub is_fainted: bool,
    /// Slot within the owner's party, used for switch bookkeeping.
    pub position: usize,
    pub statuses: Vec<StatusInstance>,
}

impl BattleMonster {
    pub fn take_damage(&mut self, amount: u32) {
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.current_hp == 0 {
            self.is_fainted = true;
            self.is_active = false;
        }
    }

    pub fn heal(&mut self, amount: u32) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp as f64
    }

    pub fn knows_move(&self, name: &str) -> bool {
        self.moves.iter().any(|m| m.eq_ignore_ascii_case(name))
    }

    #[cfg(test)]
    pub fn test_monster(name: &str, level: u32, hp: u32, types: Vec<ElementType>) -> Self {
        BattleMonster {
            id: Uuid::new_v4(),
            persistent_id: None,
            owner: None,
            side: TeamSide::Players,
            name: name.to_string(),
            level,
            types,
            stats: CombatStats {
                attack: 50,
                defense: 50,
                special_attack: 50,
                special_defense: 50,
                speed: 50,
            },
            stat_stages: StatStages::default(),
            current_hp: hp,
            max_hp: hp,
            moves: Vec::new(),
            is_active: true,
            is_fainted: false,
            position: 0,
            statuses: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Rain,
    Sunny,
    Sandstorm,
    Hail,
    Snow,
    Fog,
}

impl Weather {
    pub fn parse(name: &str) -> Option<Weather> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rain" | "rain_dance" => Some(Weather::Rain),
            "sunny" | "sunny_day" | "sun" => Some(Weather::Sunny),
            "sandstorm" => Some(Weather::Sandstorm),
            "hail" => Some(Weather::Hail),
            "snow" | "snowscape" | "chilly_reception" => Some(Weather::Snow),
            "fog" => Some(Weather::Fog),
            _ => None,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            Weather::Rain => "rain",
            Weather::Sunny => "harsh sunlight",
            Weather::Sandstorm => "a sandstorm",
            Weather::Hail => "hail",
            Weather::Snow => "snow",
            Weather::Fog => "fog",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

impl Terrain {
    pub fn parse(name: &str) -> Option<Terrain> {
        match name.trim().to_ascii_lowercase().as_str() {
            "electric" | "electric_terrain" => Some(Terrain::Electric),
            "grassy" | "grassy_terrain" => Some(Terrain::Grassy),
            "misty" | "misty_terrain" => Some(Terrain::Misty),
            "psychic" | "psychic_terrain" => Some(Terrain::Psychic),
            _ => None,
        }
    }

    pub fn boosted_type(&self) -> ElementType {
        match self {
            Terrain::Electric => ElementType::Electric,
            Terrain::Grassy => ElementType::Grass,
            Terrain::Misty => ElementType::Fairy,
            Terrain::Psychic => ElementType::Psychic,
        }
    }
}

/// Battle-wide conditions: weather, terrain, and room-style toggles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldState {
    pub weather: Option<Weather>,
    pub weather_turns: i32,
    pub terrain: Option<Terrain>,
    pub terrain_turns: i32,
    pub effects: Vec<StatusInstance>,
}

impl FieldState {
    pub fn set_weather(&mut self, weather: Weather, turns: i32) {
        self.weather = Some(weather);
        self.weather_turns = turns;
    }

    pub fn set_terrain(&mut self, terrain: Terrain, turns: i32) {
        self.terrain = Some(terrain);
        self.terrain_turns = turns;
    }

    /// Ticks weather, terrain, and room counters once per full battle round.
    /// Returns expiry messages.
    pub fn tick(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        if self.weather.is_some() && self.weather_turns > 0 {
            self.weather_turns -= 1;
            if self.weather_turns == 0 {
                if let Some(weather) = self.weather.take() {
                    messages.push(format!("The {} faded.", weather.display()));
                }
            }
        }
        if self.terrain.is_some() && self.terrain_turns > 0 {
            self.terrain_turns -= 1;
            if self.terrain_turns == 0 && self.terrain.take().is_some() {
                messages.push("The terrain returned to normal.".to_string());
            }
        }
        self.effects.retain_mut(|effect| {
            if effect.turns_remaining > 0 {
                effect.turns_remaining -= 1;
                if effect.turns_remaining == 0 {
                    messages.push(format!("The {} effect wore off.", effect.effect.name()));
                    return false;
                }
            }
            true
        });
        messages
    }
}

/// Conditions owned by one team: screens, guards, and entry hazards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SideState {
    pub effects: Vec<StatusInstance>,
}

impl SideState {
    pub fn has(&self, effect: StatusEffect) -> bool {
        self.effects.iter().any(|s| s.effect == effect)
    }

    pub fn add(&mut self, effect: StatusEffect, turns: i32) -> u8 {
        if let Some(existing) = self.effects.iter_mut().find(|s| s.effect == effect) {
            if effect.is_stackable() && existing.stacks < effect.max_stacks() {
                existing.stacks += 1;
            }
            existing.turns_remaining = turns;
            existing.stacks
        } else {
            self.effects.push(StatusInstance::new(effect, turns));
            1
        }
    }

    pub fn clear_hazards(&mut self) -> bool {
        let before = self.effects.len();
        self.effects.retain(|s| {
            !matches!(
                s.effect,
                StatusEffect::Spikes
                    | StatusEffect::ToxicSpikes
                    | StatusEffect::StealthRock
                    | StatusEffect::StickyWeb
            )
        });
        self.effects.len() != before
    }

    pub fn tick(&mut self) -> Vec<String> {
        let mut messages = Vec::new();
        self.effects.retain_mut(|effect| {
            if effect.turns_remaining > 0 {
                effect.turns_remaining -= 1;
                if effect.turns_remaining == 0 {
                    messages.push(format!("The team's {} wore off.", effect.effect.name()));
                    return false;
                }
            }
            true
        });
        messages
    }
}

/// A switch that must resolve before the turn order can advance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingSwitch {
    pub participant_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battle {
    pub id: Uuid,
    pub kind: BattleKind,
    pub status: BattleStatus,
    pub current_turn: u32,
    pub current_participant_index: usize,
    pub winner: Option<TeamSide>,
    pub pending_switch: Option<PendingSwitch>,
    pub created_at: DateTime<Utc>,
}

/// One executed action, kept for history and the word-count reward bonus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub participant_id: Uuid,
    pub action: String,
    pub message_words: u64,
    pub timestamp: DateTime<Utc>,
}

/// Everything the engine knows about one battle. Serializable as a unit so a
/// store can persist and reload battles wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub battle: Battle,
    pub participants: Vec<Participant>,
    pub monsters: Vec<BattleMonster>,
    pub field: FieldState,
    pub player_side: SideState,
    pub opponent_side: SideState,
    pub history: Vec<TurnRecord>,
}

impl BattleState {
    pub fn side_mut(&mut self, side: TeamSide) -> &mut SideState {
        match side {
            TeamSide::Players => &mut self.player_side,
            TeamSide::Opponents => &mut self.opponent_side,
        }
    }

    pub fn side(&self, side: TeamSide) -> &SideState {
        match side {
            TeamSide::Players => &self.player_side,
            TeamSide::Opponents => &self.opponent_side,
        }
    }

    pub fn participant(&self, id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_by_external(&self, external_id: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.external_id == external_id)
    }

    pub fn current_participant(&self) -> Option<&Participant> {
        self.participants.get(self.battle.current_participant_index)
    }

    pub fn active_monster(&self, participant_id: Uuid) -> Option<&BattleMonster> {
        self.monsters
            .iter()
            .find(|m| m.owner == Some(participant_id) && m.is_active && !m.is_fainted)
    }

    pub fn active_monster_index(&self, participant_id: Uuid) -> Option<usize> {
        self.monsters
            .iter()
            .position(|m| m.owner == Some(participant_id) && m.is_active && !m.is_fainted)
    }

    pub fn bench_of(&self, participant_id: Uuid) -> Vec<usize> {
        self.monsters
            .iter()
            .enumerate()
            .filter(|(_, m)| m.owner == Some(participant_id) && !m.is_active && !m.is_fainted)
            .map(|(i, _)| i)
            .collect()
    }

    /// Active, unfainted monsters on the side opposing `side`.
    pub fn active_opponents_of(&self, side: TeamSide) -> Vec<usize> {
        self.monsters
            .iter()
            .enumerate()
            .filter(|(_, m)| m.side == side.opposite() && m.is_active && !m.is_fainted)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn side_has_active(&self, side: TeamSide) -> bool {
        self.monsters
            .iter()
            .any(|m| m.side == side && m.is_active && !m.is_fainted)
    }

    pub fn fainted_count(&self, side: TeamSide) -> usize {
        self.monsters
            .iter()
            .filter(|m| m.side == side && m.is_fainted)
            .count()
    }

    pub fn owned_count(&self, side: TeamSide) -> usize {
        self.monsters.iter().filter(|m| m.side == side).count()
    }
}

/// Events published to the notification sink as the battle evolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BattleEvent {
    BattleStarted {
        battle_id: Uuid,
        kind: BattleKind,
    },
    TurnAdvanced {
        battle_id: Uuid,
        turn: u32,
        participant_id: Uuid,
    },
    ActionResolved {
        battle_id: Uuid,
        participant_id: Uuid,
        messages: Vec<String>,
    },
    MonsterFainted {
        battle_id: Uuid,
        monster: String,
    },
    MonsterSwitched {
        battle_id: Uuid,
        participant_id: Uuid,
        monster: String,
    },
    BattleEnded {
        battle_id: Uuid,
        winner: Option<TeamSide>,
    },
    RewardsGranted {
        battle_id: Uuid,
        participant_id: Uuid,
        experience: u64,
        coins: u64,
    },
}

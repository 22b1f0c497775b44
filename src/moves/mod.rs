use serde::{Deserialize, Serialize};

use crate::typing::ElementType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Read-only move reference data, looked up through the move catalogue
/// collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Move {
    pub name: String,
    /// 0 or absent means a pure status move.
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    pub move_type: ElementType,
    /// Absent category falls back to a random physical/special split in the
    /// damage calculator.
    pub category: Option<MoveCategory>,
    pub effect_chance: Option<u32>,
    pub description: Option<String>,
}

impl Move {
    pub fn new(name: &str, power: Option<u32>, move_type: ElementType) -> Self {
        Move {
            name: name.to_string(),
            power,
            accuracy: Some(100),
            move_type,
            category: Some(MoveCategory::Physical),
            effect_chance: None,
            description: None,
        }
    }

    pub fn with_category(mut self, category: MoveCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_accuracy(mut self, accuracy: u32) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// The generic move substituted when a status move descriptor is
    /// unrecognized or malformed: 50 power, same type, full accuracy.
    pub fn fallback_attack(name: &str, move_type: ElementType) -> Self {
        Move {
            name: name.to_string(),
            power: Some(50),
            accuracy: Some(100),
            move_type,
            category: None,
            effect_chance: None,
            description: None,
        }
    }
}

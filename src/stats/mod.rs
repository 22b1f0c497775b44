use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatName {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl StatName {
    pub fn display(&self) -> &'static str {
        match self {
            StatName::Attack => "Attack",
            StatName::Defense => "Defense",
            StatName::SpecialAttack => "Special Attack",
            StatName::SpecialDefense => "Special Defense",
            StatName::Speed => "Speed",
            StatName::Accuracy => "Accuracy",
            StatName::Evasion => "Evasion",
        }
    }
}

/// Frozen combat stats taken as a snapshot when a monster enters battle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CombatStats {
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl CombatStats {
    pub fn get(&self, stat: StatName) -> u32 {
        match stat {
            StatName::Attack => self.attack,
            StatName::Defense => self.defense,
            StatName::SpecialAttack => self.special_attack,
            StatName::SpecialDefense => self.special_defense,
            StatName::Speed => self.speed,
            // Accuracy/evasion have no base stat; stages apply to a 100 base.
            StatName::Accuracy | StatName::Evasion => 100,
        }
    }
}

/// Per-stat battle stages, each clamped to [-6, 6].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StatStages {
    pub attack: i8,
    pub defense: i8,
    pub special_attack: i8,
    pub special_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub fn get(&self, stat: StatName) -> i8 {
        match stat {
            StatName::Attack => self.attack,
            StatName::Defense => self.defense,
            StatName::SpecialAttack => self.special_attack,
            StatName::SpecialDefense => self.special_defense,
            StatName::Speed => self.speed,
            StatName::Accuracy => self.accuracy,
            StatName::Evasion => self.evasion,
        }
    }

    fn slot(&mut self, stat: StatName) -> &mut i8 {
        match stat {
            StatName::Attack => &mut self.attack,
            StatName::Defense => &mut self.defense,
            StatName::SpecialAttack => &mut self.special_attack,
            StatName::SpecialDefense => &mut self.special_defense,
            StatName::Speed => &mut self.speed,
            StatName::Accuracy => &mut self.accuracy,
            StatName::Evasion => &mut self.evasion,
        }
    }

    /// Shift a stage by `delta`, clamped. Returns `(new_stage, at_limit)`
    /// where `at_limit` means the stage did not move.
    pub fn shift(&mut self, stat: StatName, delta: i8) -> (i8, bool) {
        let slot = self.slot(stat);
        let current = *slot;
        let new_stage = (current as i16 + delta as i16).clamp(-6, 6) as i8;
        *slot = new_stage;
        (new_stage, new_stage == current)
    }

    pub fn set(&mut self, stat: StatName, stage: i8) {
        *self.slot(stat) = stage.clamp(-6, 6);
    }

    pub fn reset(&mut self) {
        *self = StatStages::default();
    }

    /// Invert every stage in place (Topsy-Turvy).
    pub fn invert(&mut self) {
        self.attack = -self.attack;
        self.defense = -self.defense;
        self.special_attack = -self.special_attack;
        self.special_defense = -self.special_defense;
        self.speed = -self.speed;
        self.accuracy = -self.accuracy;
        self.evasion = -self.evasion;
    }

    pub fn multiplier(&self, stat: StatName) -> f64 {
        stage_multiplier(stat, self.get(stat))
    }
}

/// Map a stage to its multiplier. Combat stats use the 2-based formula;
/// accuracy and evasion use the 3-based one.
pub fn stage_multiplier(stat: StatName, stage: i8) -> f64 {
    let stage = stage.clamp(-6, 6) as f64;
    match stat {
        StatName::Accuracy | StatName::Evasion => {
            if stage >= 0.0 {
                (3.0 + stage) / 3.0
            } else {
                3.0 / (3.0 - stage)
            }
        }
        _ => {
            if stage >= 0.0 {
                (2.0 + stage) / 2.0
            } else {
                2.0 / (2.0 - stage)
            }
        }
    }
}

/// Base stat adjusted by its battle stage, never below 1.
pub fn effective_stat(base: u32, stat: StatName, stage: i8) -> u32 {
    let adjusted = (base as f64 * stage_multiplier(stat, stage)).floor() as u32;
    adjusted.max(1)
}

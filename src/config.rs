use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub ai: AiConfig,
    pub limits: LimitsConfig,
    pub rewards: RewardsConfig,
}

/// Per-difficulty AI tuning.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct DifficultyProfile {
    /// Probability of acting at random instead of scoring options.
    pub random_chance: f64,
    /// HP ratio below which the AI prefers a healing item.
    pub heal_threshold: f64,
    /// HP ratio below which the AI considers switching out.
    pub switch_threshold: f64,
    /// Weight applied to type advantage in move scoring.
    pub type_advantage_weight: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AiConfig {
    pub easy: DifficultyProfile,
    pub medium: DifficultyProfile,
    pub hard: DifficultyProfile,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LimitsConfig {
    /// Hard cap on consecutive AI turns drained after a player action.
    pub ai_drain_cap: u32,
    /// Per-side knockout limit when the encounter does not override it.
    pub default_knockout_limit: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RewardsConfig {
    pub base_experience: u32,
    pub base_coins: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ai: AiConfig {
                easy: DifficultyProfile {
                    random_chance: 0.4,
                    heal_threshold: 0.2,
                    switch_threshold: 0.1,
                    type_advantage_weight: 0.3,
                },
                medium: DifficultyProfile {
                    random_chance: 0.2,
                    heal_threshold: 0.3,
                    switch_threshold: 0.2,
                    type_advantage_weight: 0.6,
                },
                hard: DifficultyProfile {
                    random_chance: 0.1,
                    heal_threshold: 0.4,
                    switch_threshold: 0.3,
                    type_advantage_weight: 0.9,
                },
            },
            limits: LimitsConfig {
                ai_drain_cap: 10,
                default_knockout_limit: 6,
            },
            rewards: RewardsConfig {
                base_experience: 100,
                base_coins: 50,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env file if available
        dotenv::dotenv().ok();

        let mut config = Config::default();

        if let Ok(cap) = env::var("AI_DRAIN_CAP") {
            if let Ok(cap) = cap.parse::<u32>() {
                config.limits.ai_drain_cap = cap;
            }
        }

        if let Ok(limit) = env::var("KNOCKOUT_LIMIT") {
            if let Ok(limit) = limit.parse::<u32>() {
                config.limits.default_knockout_limit = limit;
            }
        }

        if let Ok(exp) = env::var("BASE_EXPERIENCE") {
            if let Ok(exp) = exp.parse::<u32>() {
                config.rewards.base_experience = exp;
            }
        }

        if let Ok(coins) = env::var("BASE_COINS") {
            if let Ok(coins) = coins.parse::<u32>() {
                config.rewards.base_coins = coins;
            }
        }

        info!("Configuration loaded: {:?}", config);
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiDifficulty {
    Easy,
    Medium,
    Hard,
}

impl AiConfig {
    pub fn profile(&self, difficulty: AiDifficulty) -> DifficultyProfile {
        match difficulty {
            AiDifficulty::Easy => self.easy,
            AiDifficulty::Medium => self.medium,
            AiDifficulty::Hard => self.hard,
        }
    }
}

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the battle engine.
///
/// Validation errors are reported before any state mutation. Failures of the
/// notification sink are never wrapped here; they are logged and swallowed at
/// the call site so a battle can continue without its chat surface.
#[derive(Debug, Error)]
pub enum BattleError {
    #[error("battle {0} not found")]
    BattleNotFound(Uuid),

    #[error("you are not participating in this battle")]
    ParticipantNotFound,

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("battle is no longer active")]
    BattleCompleted,

    #[error("{monster} doesn't know the move \"{move_name}\"")]
    UnknownMove { monster: String, move_name: String },

    #[error("target \"{0}\" not found")]
    UnknownTarget(String),

    #[error("no valid target available")]
    NoValidTarget,

    #[error("no active monster to act with")]
    NoActiveMonster,

    #[error("unknown item \"{0}\"")]
    UnknownItem(String),

    #[error("not enough \"{0}\" in inventory")]
    InsufficientInventory(String),

    #[error("{0}")]
    IllegalSwitch(String),

    #[error("monster \"{0}\" not found")]
    MonsterNotFound(String),

    #[error("trainer \"{0}\" was not invited to this battle")]
    NotInvited(String),

    #[error("persistence failure: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, BattleError>;

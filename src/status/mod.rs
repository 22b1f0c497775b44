pub mod catalog;
pub mod engine;

pub use catalog::{type_status_chance, Prevention, StatusEffect, StatusInstance};
pub use engine::{ApplyOutcome, TickOutcome};

//! Status-move resolution. Move names map to declarative descriptors in one
//! of four families; a damaging move may additionally carry a rider from the
//! special-damage table. Names missing from every table resolve to `None`
//! and the caller degrades the move to a generic 50-power attack.

pub mod descriptor;
mod execute;
mod field_moves;
mod healing_moves;
mod special_damage;
mod stat_moves;
mod status_moves;

pub use descriptor::{
    AfflictionGate, AfflictionMove, FieldAction, FieldMove, HealAmount, HealingMove, MoveTarget,
    SpecialDamageEffect, SpecialDamageMove, StatMove, StatSpecial,
};
pub use execute::{resolve_status_move, Resolved};

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// True when the name resolves in any of the four status-move families.
pub fn is_status_move(name: &str) -> bool {
    let name = normalize(name);
    stat_moves::lookup(&name).is_some()
        || status_moves::lookup(&name).is_some()
        || healing_moves::lookup(&name).is_some()
        || field_moves::lookup(&name).is_some()
        || name == "curse"
}

/// Rider attached to a damaging move, if any.
pub fn damage_rider(name: &str) -> Option<SpecialDamageMove> {
    special_damage::lookup(&normalize(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_are_checked_in_order() {
        assert!(is_status_move("Swords Dance"));
        assert!(is_status_move("toxic"));
        assert!(is_status_move("Recover"));
        assert!(is_status_move("Rain Dance"));
        assert!(is_status_move("Curse"));
        assert!(!is_status_move("Flamethrower"));
    }

    #[test]
    fn riders_do_not_make_a_move_a_status_move() {
        assert!(!is_status_move("Bite"));
        assert!(damage_rider("Bite").is_some());
    }
}

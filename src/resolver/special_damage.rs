//! Damaging moves that carry a rider: drain, multi-hit, flinch, two-turn.

use super::descriptor::{SpecialDamageEffect, SpecialDamageMove};

pub fn lookup(name: &str) -> Option<SpecialDamageMove> {
    use SpecialDamageEffect::*;
    let effect = match name {
        "leech life" | "absorb" | "mega drain" | "giga drain" | "drain punch" | "horn leech" => {
            Drain(0.5)
        }
        "bullet seed" | "rock blast" | "icicle spear" | "pin missile" | "fury swipes" => {
            MultiHit { min: 2, max: 5 }
        }
        "bite" | "headbutt" | "air slash" | "iron head" | "rock slide" => FlinchChance(0.30),
        "crunch" | "waterfall" | "zen headbutt" => FlinchChance(0.20),
        "dig" => TwoTurn {
            charge_message: "{user} burrowed underground!",
        },
        "bounce" => TwoTurn {
            charge_message: "{user} bounced high into the air!",
        },
        "fly" => TwoTurn {
            charge_message: "{user} flew high into the sky!",
        },
        "take down" | "wild charge" => Recoil(0.25),
        "double-edge" | "brave bird" | "flare blitz" => Recoil(0.33),
        _ => return None,
    };
    Some(SpecialDamageMove { effect })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leech_life_drains_half_the_damage() {
        let entry = lookup("leech life").unwrap();
        assert!(matches!(entry.effect, SpecialDamageEffect::Drain(r) if r == 0.5));
    }

    #[test]
    fn bullet_seed_hits_two_to_five_times() {
        let entry = lookup("bullet seed").unwrap();
        assert!(matches!(
            entry.effect,
            SpecialDamageEffect::MultiHit { min: 2, max: 5 }
        ));
    }

    #[test]
    fn crunch_flinches_less_often_than_bite() {
        let bite = lookup("bite").unwrap();
        let crunch = lookup("crunch").unwrap();
        let chance = |m: SpecialDamageMove| match m.effect {
            SpecialDamageEffect::FlinchChance(c) => c,
            _ => panic!("not a flinch move"),
        };
        assert!(chance(bite) > chance(crunch));
    }

    #[test]
    fn plain_moves_have_no_rider() {
        assert!(lookup("tackle").is_none());
    }
}

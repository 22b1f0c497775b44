//! Moves whose primary effect is inflicting a status condition.

use crate::status::StatusEffect;

use super::descriptor::{AfflictionGate, AfflictionMove, MoveTarget};

const fn afflict(
    status: StatusEffect,
    turns: i32,
    message: &'static str,
) -> AfflictionMove {
    AfflictionMove {
        status,
        target: MoveTarget::Target,
        turns,
        message,
        gate: None,
    }
}

pub fn lookup(name: &str) -> Option<AfflictionMove> {
    let entry = match name {
        "toxic" => afflict(StatusEffect::Toxic, 5, "{user} used Toxic! {target} was badly poisoned!"),
        "poison powder" => afflict(
            StatusEffect::Poison,
            4,
            "{user} used Poison Powder! {target} was poisoned!",
        ),
        "poison gas" => afflict(
            StatusEffect::Poison,
            4,
            "{user} used Poison Gas! {target} was poisoned!",
        ),
        "will-o-wisp" => afflict(
            StatusEffect::Burn,
            4,
            "{user} used Will-O-Wisp! {target} was burned!",
        ),
        "thunder wave" => afflict(
            StatusEffect::Paralysis,
            4,
            "{user} used Thunder Wave! {target} is paralyzed and may not be able to attack!",
        ),
        "stun spore" => afflict(
            StatusEffect::Paralysis,
            4,
            "{user} used Stun Spore! {target} is paralyzed and may not be able to attack!",
        ),
        "glare" => afflict(
            StatusEffect::Paralysis,
            4,
            "{user} used Glare! {target} is paralyzed and may not be able to attack!",
        ),
        "sleep powder" => afflict(
            StatusEffect::Sleep,
            3,
            "{user} used Sleep Powder! {target} fell asleep!",
        ),
        "spore" => afflict(StatusEffect::Sleep, 3, "{user} used Spore! {target} fell asleep!"),
        "grass whistle" => afflict(
            StatusEffect::Sleep,
            3,
            "{user} used Grass Whistle! {target} fell asleep!",
        ),
        "sing" => afflict(
            StatusEffect::Sleep,
            3,
            "{user} used Sing! {target} fell asleep to the soothing melody!",
        ),
        "lovely kiss" => afflict(
            StatusEffect::Sleep,
            3,
            "{user} used Lovely Kiss! {target} fell asleep!",
        ),
        "hypnosis" => afflict(
            StatusEffect::Sleep,
            3,
            "{user} used Hypnosis! {target} fell into a deep sleep!",
        ),
        "dark void" => afflict(
            StatusEffect::Sleep,
            3,
            "{user} used Dark Void! {target} fell into a deep sleep!",
        ),
        "sweet kiss" => afflict(
            StatusEffect::Confusion,
            3,
            "{user} used Sweet Kiss! {target} became confused!",
        ),
        "confuse ray" => afflict(
            StatusEffect::Confusion,
            3,
            "{user} used Confuse Ray! {target} became confused!",
        ),
        "supersonic" => afflict(
            StatusEffect::Confusion,
            3,
            "{user} used Supersonic! {target} became confused!",
        ),
        "teeter dance" => afflict(
            StatusEffect::Confusion,
            3,
            "{user} used Teeter Dance! {target} became confused!",
        ),
        "yawn" => afflict(
            StatusEffect::Drowsy,
            1,
            "{user} used Yawn! {target} grew drowsy and will fall asleep next turn!",
        ),
        "attract" => AfflictionMove {
            status: StatusEffect::Infatuation,
            target: MoveTarget::Target,
            turns: -1,
            message: "{user} used Attract! {target} fell in love!",
            gate: Some(AfflictionGate::OppositeGender),
        },
        "nightmare" => AfflictionMove {
            status: StatusEffect::Nightmare,
            target: MoveTarget::Target,
            turns: -1,
            message: "{user} used Nightmare! {target} fell into a nightmare!",
            gate: Some(AfflictionGate::TargetAsleep),
        },
        "psycho shift" => AfflictionMove {
            status: StatusEffect::Poison,
            target: MoveTarget::Target,
            turns: -1,
            message: "{user} used Psycho Shift! {user} transferred its status condition to {target}!",
            gate: Some(AfflictionGate::TransferPrimary),
        },
        _ => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toxic_applies_the_escalating_poison() {
        let entry = lookup("toxic").unwrap();
        assert_eq!(entry.status, StatusEffect::Toxic);
        assert_eq!(entry.turns, 5);
    }

    #[test]
    fn nightmare_requires_a_sleeping_target() {
        let entry = lookup("nightmare").unwrap();
        assert_eq!(entry.gate, Some(AfflictionGate::TargetAsleep));
        assert_eq!(entry.turns, -1);
    }

    #[test]
    fn damage_moves_are_not_afflictions() {
        assert!(lookup("sludge bomb").is_none());
    }
}

//! Stage-changing moves, keyed by normalized move name.

use crate::stats::StatName::*;
use crate::status::StatusEffect;

use super::descriptor::{MoveTarget, StatMove, StatSpecial};

const fn buff(changes: &'static [(crate::stats::StatName, i8)], message: &'static str) -> StatMove {
    StatMove {
        target: MoveTarget::User,
        changes,
        message,
        special: None,
    }
}

const fn debuff(changes: &'static [(crate::stats::StatName, i8)], message: &'static str) -> StatMove {
    StatMove {
        target: MoveTarget::Target,
        changes,
        message,
        special: None,
    }
}

pub fn lookup(name: &str) -> Option<StatMove> {
    let entry = match name {
        "growl" => debuff(&[(Attack, -1)], "{user}'s Growl lowered {target}'s Attack!"),
        "tail whip" => debuff(&[(Defense, -1)], "{user} used Tail Whip! {target}'s Defense fell!"),
        "leer" => debuff(&[(Defense, -1)], "{user} used Leer! {target}'s Defense fell!"),
        "screech" => debuff(
            &[(Defense, -2)],
            "{user}'s Screech harshly lowered {target}'s Defense!",
        ),
        "sand attack" => debuff(
            &[(Accuracy, -1)],
            "{user} kicked up sand! {target}'s accuracy fell!",
        ),
        "smokescreen" => debuff(
            &[(Accuracy, -1)],
            "{user} used Smokescreen! {target}'s accuracy fell!",
        ),
        "flash" => debuff(&[(Accuracy, -1)], "{user} used Flash! {target}'s accuracy fell!"),
        "kinesis" => debuff(&[(Accuracy, -1)], "{user} used Kinesis! {target}'s accuracy fell!"),
        "string shot" => debuff(
            &[(Speed, -2)],
            "{user} used String Shot! {target}'s Speed harshly fell!",
        ),
        "scary face" => debuff(
            &[(Speed, -2)],
            "{user} used Scary Face! {target}'s Speed harshly fell!",
        ),
        "cotton spore" => debuff(
            &[(Speed, -2)],
            "{user} used Cotton Spore! {target}'s Speed harshly fell!",
        ),
        "sweet scent" => debuff(
            &[(Evasion, -2)],
            "{user} used Sweet Scent! {target}'s evasion harshly fell!",
        ),
        "charm" => debuff(&[(Attack, -2)], "{user} used Charm! {target}'s Attack harshly fell!"),
        "feather dance" => debuff(
            &[(Attack, -2)],
            "{user} used Feather Dance! {target}'s Attack harshly fell!",
        ),
        "play nice" => debuff(&[(Attack, -1)], "{user} used Play Nice! {target}'s Attack fell!"),
        "baby-doll eyes" => debuff(
            &[(Attack, -1)],
            "{user} used Baby-Doll Eyes! {target}'s Attack fell!",
        ),
        "strength sap" => debuff(
            &[(Attack, -1)],
            "{user} used Strength Sap! {target}'s Attack fell and {user} recovered HP!",
        ),
        "confide" => debuff(
            &[(SpecialAttack, -1)],
            "{user} used Confide! {target}'s Special Attack fell!",
        ),
        "eerie impulse" => debuff(
            &[(SpecialAttack, -2)],
            "{user} used Eerie Impulse! {target}'s Special Attack harshly fell!",
        ),
        "captivate" => debuff(
            &[(SpecialAttack, -2)],
            "{user} used Captivate! {target}'s Special Attack harshly fell!",
        ),
        "fake tears" => debuff(
            &[(SpecialDefense, -2)],
            "{user} used Fake Tears! {target}'s Special Defense harshly fell!",
        ),
        "metal sound" => debuff(
            &[(SpecialDefense, -2)],
            "{user} used Metal Sound! {target}'s Special Defense harshly fell!",
        ),
        "noble roar" => debuff(
            &[(Attack, -1), (SpecialAttack, -1)],
            "{user} used Noble Roar! {target}'s Attack and Special Attack fell!",
        ),
        "tearful look" => debuff(
            &[(Attack, -1), (SpecialAttack, -1)],
            "{user} used Tearful Look! {target}'s Attack and Special Attack fell!",
        ),
        "tickle" => debuff(
            &[(Attack, -1), (Defense, -1)],
            "{user} used Tickle! {target}'s Attack and Defense fell!",
        ),
        "venom drench" => debuff(
            &[(Attack, -1), (SpecialAttack, -1), (Speed, -1)],
            "{user} used Venom Drench! {target}'s Attack, Special Attack, and Speed fell!",
        ),
        "spicy extract" => debuff(
            &[(Attack, -2), (SpecialAttack, 2)],
            "{user} used Spicy Extract! {target}'s Attack harshly fell, but Special Attack rose sharply!",
        ),

        "howl" => buff(&[(Attack, 1)], "{user} used Howl! {user}'s Attack rose!"),
        "sharpen" => buff(&[(Attack, 1)], "{user} used Sharpen! {user}'s Attack rose!"),
        "meditate" => buff(&[(Attack, 1)], "{user} used Meditate! {user}'s Attack rose!"),
        "swords dance" => buff(
            &[(Attack, 2)],
            "{user} used Swords Dance! {user}'s Attack rose sharply!",
        ),
        "growth" => buff(
            &[(Attack, 1), (SpecialAttack, 1)],
            "{user} used Growth! {user}'s Attack and Special Attack rose!",
        ),
        "work up" => buff(
            &[(Attack, 1), (SpecialAttack, 1)],
            "{user} used Work Up! {user}'s Attack and Special Attack rose!",
        ),
        "hone claws" => buff(
            &[(Attack, 1), (Accuracy, 1)],
            "{user} used Hone Claws! {user}'s Attack and accuracy rose!",
        ),
        "bulk up" => buff(
            &[(Attack, 1), (Defense, 1)],
            "{user} used Bulk Up! {user}'s Attack and Defense rose!",
        ),
        "coil" => buff(
            &[(Attack, 1), (Defense, 1), (Accuracy, 1)],
            "{user} used Coil! {user}'s Attack, Defense, and accuracy rose!",
        ),
        "dragon dance" => buff(
            &[(Attack, 1), (Speed, 1)],
            "{user} used Dragon Dance! {user}'s Attack and Speed rose!",
        ),
        "harden" => buff(&[(Defense, 1)], "{user} used Harden! {user}'s Defense rose!"),
        "withdraw" => buff(&[(Defense, 1)], "{user} used Withdraw! {user}'s Defense rose!"),
        "defense curl" => buff(&[(Defense, 1)], "{user} used Defense Curl! {user}'s Defense rose!"),
        "acid armor" => buff(
            &[(Defense, 2)],
            "{user} used Acid Armor! {user}'s Defense rose sharply!",
        ),
        "barrier" => buff(&[(Defense, 2)], "{user} used Barrier! {user}'s Defense rose sharply!"),
        "iron defense" => buff(
            &[(Defense, 2)],
            "{user} used Iron Defense! {user}'s Defense rose sharply!",
        ),
        "cotton guard" => buff(
            &[(Defense, 3)],
            "{user} used Cotton Guard! {user}'s Defense rose drastically!",
        ),
        "amnesia" => buff(
            &[(SpecialDefense, 2)],
            "{user} used Amnesia! {user}'s Special Defense rose sharply!",
        ),
        "cosmic power" => buff(
            &[(Defense, 1), (SpecialDefense, 1)],
            "{user} used Cosmic Power! {user}'s Defense and Special Defense rose!",
        ),
        "defend order" => buff(
            &[(Defense, 1), (SpecialDefense, 1)],
            "{user} used Defend Order! {user}'s Defense and Special Defense rose!",
        ),
        "stockpile" => StatMove {
            target: MoveTarget::User,
            changes: &[(Defense, 1), (SpecialDefense, 1)],
            message: "{user} used Stockpile! {user} stockpiled power and raised its defenses!",
            special: Some(StatSpecial::AfflictUser {
                effect: StatusEffect::Stockpile,
                turns: -1,
            }),
        },
        "calm mind" => buff(
            &[(SpecialAttack, 1), (SpecialDefense, 1)],
            "{user} used Calm Mind! {user}'s Special Attack and Special Defense rose!",
        ),
        "take heart" => buff(
            &[(SpecialAttack, 1), (SpecialDefense, 1)],
            "{user} used Take Heart! {user}'s Special Attack and Special Defense rose!",
        ),
        "quiver dance" => buff(
            &[(SpecialAttack, 1), (SpecialDefense, 1), (Speed, 1)],
            "{user} used Quiver Dance! {user}'s Special Attack, Special Defense, and Speed rose!",
        ),
        "nasty plot" => buff(
            &[(SpecialAttack, 2)],
            "{user} used Nasty Plot! {user}'s Special Attack rose sharply!",
        ),
        "tail glow" => buff(
            &[(SpecialAttack, 3)],
            "{user} used Tail Glow! {user}'s Special Attack rose drastically!",
        ),
        "agility" => buff(&[(Speed, 2)], "{user} used Agility! {user}'s Speed rose sharply!"),
        "rock polish" => buff(
            &[(Speed, 2)],
            "{user} used Rock Polish! {user}'s Speed rose sharply!",
        ),
        "autotomize" => buff(
            &[(Speed, 2)],
            "{user} used Autotomize! {user}'s Speed rose sharply!",
        ),
        "double team" => buff(
            &[(Evasion, 1)],
            "{user} used Double Team! {user}'s evasiveness rose!",
        ),
        "minimize" => buff(
            &[(Evasion, 2)],
            "{user} used Minimize! {user}'s evasion rose sharply!",
        ),
        "shell smash" => buff(
            &[(Defense, -1), (SpecialDefense, -1), (Attack, 2), (SpecialAttack, 2), (Speed, 2)],
            "{user} used Shell Smash! {user}'s Defense and Special Defense fell, but Attack, Special Attack, and Speed rose sharply!",
        ),
        "victory dance" => buff(
            &[(Attack, 1), (Defense, 1), (SpecialAttack, 1), (SpecialDefense, 1), (Speed, 1)],
            "{user} used Victory Dance! All of {user}'s stats rose!",
        ),
        "decorate" => debuff(
            &[(Attack, 2), (SpecialAttack, 2)],
            "{user} used Decorate! {target}'s Attack and Special Attack rose sharply!",
        ),
        "coaching" => debuff(
            &[(Attack, 1), (Defense, 1)],
            "{user} used Coaching! {target}'s Attack and Defense rose!",
        ),
        "aromatic mist" => debuff(
            &[(SpecialDefense, 1)],
            "{user} used Aromatic Mist! {target}'s Special Defense rose!",
        ),

        "belly drum" => StatMove {
            target: MoveTarget::User,
            changes: &[(Attack, 6)],
            message: "{user} used Belly Drum! {user} cut its HP in half and maximized its Attack!",
            special: Some(StatSpecial::BellyDrum),
        },
        "clangorous soul" => StatMove {
            target: MoveTarget::User,
            changes: &[(Attack, 1), (Defense, 1), (SpecialAttack, 1), (SpecialDefense, 1), (Speed, 1)],
            message: "{user} used Clangorous Soul! {user} lost some HP and all stats rose!",
            special: Some(StatSpecial::HpCost(0.33)),
        },
        "fillet away" => StatMove {
            target: MoveTarget::User,
            changes: &[(Attack, 2), (SpecialAttack, 2), (Speed, 2)],
            message: "{user} used Fillet Away! {user} lost half its HP, but Attack, Special Attack, and Speed rose sharply!",
            special: Some(StatSpecial::HpCost(0.5)),
        },
        "no retreat" => StatMove {
            target: MoveTarget::User,
            changes: &[(Attack, 1), (Defense, 1), (SpecialAttack, 1), (SpecialDefense, 1), (Speed, 1)],
            message: "{user} used No Retreat! All of {user}'s stats rose, but {user} can no longer escape!",
            special: Some(StatSpecial::AfflictUser {
                effect: StatusEffect::Trapped,
                turns: -1,
            }),
        },
        "haze" => StatMove {
            target: MoveTarget::Target,
            changes: &[],
            message: "{user} used Haze! All stat changes were eliminated!",
            special: Some(StatSpecial::Haze),
        },
        "topsy-turvy" => StatMove {
            target: MoveTarget::Target,
            changes: &[],
            message: "{user} used Topsy-Turvy! {target}'s stat changes were turned upside down!",
            special: Some(StatSpecial::TopsyTurvy),
        },
        "heart swap" => StatMove {
            target: MoveTarget::Target,
            changes: &[],
            message: "{user} used Heart Swap! {user} and {target} switched all stat changes!",
            special: Some(StatSpecial::HeartSwap),
        },
        "psych up" => StatMove {
            target: MoveTarget::Target,
            changes: &[],
            message: "{user} used Psych Up and copied {target}'s stat changes!",
            special: Some(StatSpecial::PsychUp),
        },
        "acupressure" => StatMove {
            target: MoveTarget::User,
            changes: &[],
            message: "{user} used Acupressure!",
            special: Some(StatSpecial::Acupressure),
        },
        "stuff cheeks" => buff(
            &[(Defense, 2)],
            "{user} used Stuff Cheeks! {user} ate its berry and its Defense rose sharply!",
        ),
        "swagger" => StatMove {
            target: MoveTarget::Target,
            changes: &[(Attack, 2)],
            message: "{user} used Swagger! {target}'s Attack rose sharply, but it became confused!",
            special: Some(StatSpecial::AfflictTarget {
                effect: StatusEffect::Confusion,
                turns: 3,
            }),
        },
        "flatter" => StatMove {
            target: MoveTarget::Target,
            changes: &[(SpecialAttack, 1)],
            message: "{user} used Flatter! {target}'s Special Attack rose, but {target} became confused!",
            special: Some(StatSpecial::AfflictTarget {
                effect: StatusEffect::Confusion,
                turns: 3,
            }),
        },
        "toxic thread" => StatMove {
            target: MoveTarget::Target,
            changes: &[(Speed, -1)],
            message: "{user} used Toxic Thread! {target}'s Speed fell and {target} was poisoned!",
            special: Some(StatSpecial::AfflictTarget {
                effect: StatusEffect::Poison,
                turns: 4,
            }),
        },
        "octolock" => StatMove {
            target: MoveTarget::Target,
            changes: &[(Defense, -1), (SpecialDefense, -1)],
            message: "{user} used Octolock! {target} is trapped and its Defense and Special Defense fell!",
            special: Some(StatSpecial::AfflictTarget {
                effect: StatusEffect::Octolock,
                turns: 5,
            }),
        },
        "parting shot" => StatMove {
            target: MoveTarget::Target,
            changes: &[(Attack, -1), (SpecialAttack, -1)],
            message: "{user} used Parting Shot! {target}'s Attack and Special Attack fell! {user} switched out!",
            special: Some(StatSpecial::SwitchOut),
        },
        "memento" => StatMove {
            target: MoveTarget::Target,
            changes: &[(Attack, -2), (SpecialAttack, -2)],
            message: "{user} used Memento! {target}'s Attack and Special Attack harshly fell! {user} fainted!",
            special: Some(StatSpecial::UserFaints),
        },
        _ => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatName;

    #[test]
    fn swords_dance_raises_attack_two_stages() {
        let entry = lookup("swords dance").unwrap();
        assert_eq!(entry.target, MoveTarget::User);
        assert_eq!(entry.changes, &[(StatName::Attack, 2)]);
    }

    #[test]
    fn growl_targets_the_opponent() {
        let entry = lookup("growl").unwrap();
        assert_eq!(entry.target, MoveTarget::Target);
        assert_eq!(entry.changes, &[(StatName::Attack, -1)]);
    }

    #[test]
    fn unknown_names_miss() {
        assert!(lookup("hyper beam").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn memento_sacrifices_the_user() {
        let entry = lookup("memento").unwrap();
        assert!(matches!(entry.special, Some(StatSpecial::UserFaints)));
    }
}

//! Restorative moves.

use super::descriptor::{HealAmount, HealingMove, MoveTarget};

const fn self_heal(ratio: f64, message: &'static str) -> HealingMove {
    HealingMove {
        amount: HealAmount::Ratio(ratio),
        target: MoveTarget::User,
        cures_primary: false,
        self_sleep_turns: None,
        user_faints: false,
        message,
    }
}

/// Synthesis family: the sky decides how much comes back.
const fn sun_heal(message: &'static str) -> HealingMove {
    HealingMove {
        amount: HealAmount::WeatherScaled,
        target: MoveTarget::User,
        cures_primary: false,
        self_sleep_turns: None,
        user_faints: false,
        message,
    }
}

pub fn lookup(name: &str) -> Option<HealingMove> {
    let entry = match name {
        "recover" => self_heal(0.5, "{user} used Recover and restored its health!"),
        "synthesis" => sun_heal("{user} used Synthesis and restored its health!"),
        "milk drink" => self_heal(0.5, "{user} used Milk Drink and restored its health!"),
        "heal order" => self_heal(0.5, "{user} used Heal Order and restored its health!"),
        "soft-boiled" => self_heal(0.5, "{user} used Soft-Boiled and restored its health!"),
        "slack off" => self_heal(0.5, "{user} used Slack Off and restored its health!"),
        "roost" => self_heal(0.5, "{user} used Roost and restored its health!"),
        "moonlight" => sun_heal("{user} used Moonlight and restored its health!"),
        "shore up" => self_heal(0.5, "{user} used Shore Up and restored its health!"),
        "morning sun" => sun_heal(
            "{user} used Morning Sun and restored its health with the power of sunlight!",
        ),
        "wish" => HealingMove {
            amount: HealAmount::Delayed { ratio: 0.5, turns: 2 },
            target: MoveTarget::User,
            cures_primary: false,
            self_sleep_turns: None,
            user_faints: false,
            message: "{user} used Wish! A wish will come true in 2 turns!",
        },
        "swallow" => HealingMove {
            amount: HealAmount::StockpileScaled,
            target: MoveTarget::User,
            cures_primary: false,
            self_sleep_turns: None,
            user_faints: false,
            message: "{user} used Swallow and consumed its stockpiled power!",
        },
        "refresh" => HealingMove {
            amount: HealAmount::Ratio(0.0),
            target: MoveTarget::User,
            cures_primary: true,
            self_sleep_turns: None,
            user_faints: false,
            message: "{user} used Refresh and cured all status conditions!",
        },
        "heal bell" => HealingMove {
            amount: HealAmount::Ratio(0.0),
            target: MoveTarget::User,
            cures_primary: true,
            self_sleep_turns: None,
            user_faints: false,
            message: "{user} used Heal Bell! The team was cured of all status conditions!",
        },
        "jungle healing" => HealingMove {
            amount: HealAmount::Ratio(0.25),
            target: MoveTarget::User,
            cures_primary: true,
            self_sleep_turns: None,
            user_faints: false,
            message: "{user} used Jungle Healing! The team recovered HP and was cured of status conditions!",
        },
        "lunar blessing" => HealingMove {
            amount: HealAmount::Ratio(0.25),
            target: MoveTarget::User,
            cures_primary: true,
            self_sleep_turns: None,
            user_faints: false,
            message: "{user} used Lunar Blessing! {user} and its ally were healed and cured of status conditions!",
        },
        "purify" => HealingMove {
            amount: HealAmount::Ratio(0.5),
            target: MoveTarget::Target,
            cures_primary: true,
            self_sleep_turns: None,
            user_faints: false,
            message: "{user} used Purify! {target} was cured and restored health!",
        },
        "heal pulse" => HealingMove {
            amount: HealAmount::Ratio(0.5),
            target: MoveTarget::Target,
            cures_primary: false,
            self_sleep_turns: None,
            user_faints: false,
            message: "{user} used Heal Pulse! {target} recovered health!",
        },
        "floral healing" => HealingMove {
            amount: HealAmount::Ratio(0.5),
            target: MoveTarget::Target,
            cures_primary: false,
            self_sleep_turns: None,
            user_faints: false,
            message: "{user} used Floral Healing! {target} restored its health!",
        },
        "rest" => HealingMove {
            amount: HealAmount::Full,
            target: MoveTarget::User,
            cures_primary: true,
            self_sleep_turns: Some(2),
            user_faints: false,
            message: "{user} used Rest! {user} restored its health and fell asleep!",
        },
        "lunar dance" => HealingMove {
            amount: HealAmount::Full,
            target: MoveTarget::User,
            cures_primary: false,
            self_sleep_turns: None,
            user_faints: true,
            message: "{user} used Lunar Dance! {user} fainted to restore the next monster to full health!",
        },
        "healing wish" => HealingMove {
            amount: HealAmount::Full,
            target: MoveTarget::User,
            cures_primary: true,
            self_sleep_turns: None,
            user_faints: true,
            message: "{user} used Healing Wish! {user} fainted to restore the next monster to full health and cure its status!",
        },
        _ => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recover_restores_half() {
        let entry = lookup("recover").unwrap();
        assert_eq!(entry.amount, HealAmount::Ratio(0.5));
        assert_eq!(entry.target, MoveTarget::User);
    }

    #[test]
    fn rest_heals_fully_and_sleeps() {
        let entry = lookup("rest").unwrap();
        assert_eq!(entry.amount, HealAmount::Full);
        assert!(entry.cures_primary);
        assert_eq!(entry.self_sleep_turns, Some(2));
    }

    #[test]
    fn healing_wish_is_a_sacrifice() {
        let entry = lookup("healing wish").unwrap();
        assert!(entry.user_faints);
    }

    #[test]
    fn synthesis_family_scales_with_the_sky() {
        for name in ["synthesis", "moonlight", "morning sun"] {
            let entry = lookup(name).unwrap();
            assert_eq!(entry.amount, HealAmount::WeatherScaled, "{name}");
        }
    }
}

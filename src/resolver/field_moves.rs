//! Weather, terrain, screens, hazards, protections, traps, and one-off
//! status moves that don't fit the other families.

use crate::combat::state;
use crate::status::StatusEffect;

use super::descriptor::{FieldAction, FieldMove};

const fn field(action: FieldAction, message: &'static str) -> FieldMove {
    FieldMove { action, message }
}

pub fn lookup(name: &str) -> Option<FieldMove> {
    use FieldAction::*;
    let entry = match name {
        // Weather.
        "rain dance" => field(Weather(state::Weather::Rain), "{user} used Rain Dance! It started to rain!"),
        "sunny day" => field(Weather(state::Weather::Sunny), "{user} used Sunny Day! The sunlight turned harsh!"),
        "sandstorm" => field(Weather(state::Weather::Sandstorm), "{user} whipped up a sandstorm!"),
        "hail" => field(Weather(state::Weather::Hail), "{user} used Hail! It started to hail!"),
        "snowscape" => field(Weather(state::Weather::Snow), "{user} used Snowscape! It started to snow!"),
        "chilly reception" => field(Weather(state::Weather::Snow), "{user} told a chilly joke! It started to snow!"),

        // Terrain.
        "electric terrain" => field(
            Terrain(state::Terrain::Electric),
            "{user} electrified the battlefield!",
        ),
        "grassy terrain" => field(Terrain(state::Terrain::Grassy), "Grass grew to cover the battlefield!"),
        "misty terrain" => field(Terrain(state::Terrain::Misty), "Mist swirled around the battlefield!"),
        "psychic terrain" => field(Terrain(state::Terrain::Psychic), "The battlefield got weird!"),

        // Screens and team effects.
        "reflect" => field(
            TeamEffect { effect: StatusEffect::Reflect, turns: 5 },
            "{user} used Reflect! A barrier softened physical attacks!",
        ),
        "light screen" => field(
            TeamEffect { effect: StatusEffect::LightScreen, turns: 5 },
            "{user} used Light Screen! A barrier softened special attacks!",
        ),
        "aurora veil" => field(
            TeamEffect { effect: StatusEffect::AuroraVeil, turns: 5 },
            "{user} used Aurora Veil! The team is shielded from attacks!",
        ),
        "safeguard" => field(
            TeamEffect { effect: StatusEffect::Safeguard, turns: 5 },
            "{user} used Safeguard! The team is protected from status conditions!",
        ),
        "mist" => field(
            TeamEffect { effect: StatusEffect::Mist, turns: 5 },
            "{user} used Mist! The team's stats are protected!",
        ),
        "lucky chant" => field(
            TeamEffect { effect: StatusEffect::LuckyChant, turns: 5 },
            "{user} used Lucky Chant! The team is shielded from critical hits!",
        ),
        "tailwind" => field(
            TeamEffect { effect: StatusEffect::Tailwind, turns: 4 },
            "{user} used Tailwind! A tailwind blew from behind the team!",
        ),
        "crafty shield" => field(
            TeamEffect { effect: StatusEffect::CraftyShield, turns: 1 },
            "{user} used Crafty Shield! The team is protected from status moves!",
        ),
        "quick guard" => field(
            TeamEffect { effect: StatusEffect::QuickGuard, turns: 1 },
            "{user} used Quick Guard! The team is protected from priority moves!",
        ),
        "wide guard" => field(
            TeamEffect { effect: StatusEffect::WideGuard, turns: 1 },
            "{user} used Wide Guard! The team is protected from wide attacks!",
        ),
        "mat block" => field(
            TeamEffect { effect: StatusEffect::MatBlock, turns: 1 },
            "{user} flipped up a mat to block attacks!",
        ),

        // Entry hazards, laid on the opposing side.
        "spikes" => field(Hazard(StatusEffect::Spikes), "{user} scattered spikes around the opposing team!"),
        "toxic spikes" => field(
            Hazard(StatusEffect::ToxicSpikes),
            "{user} laid poisonous spikes around the opposing team!",
        ),
        "stealth rock" => field(
            Hazard(StatusEffect::StealthRock),
            "{user} set floating stones around the opposing team!",
        ),
        "sticky web" => field(
            Hazard(StatusEffect::StickyWeb),
            "{user} wove a sticky web around the opposing team!",
        ),

        // Battle-scoped rooms and toggles.
        "trick room" => field(
            RoomEffect { effect: StatusEffect::TrickRoom, turns: 5 },
            "{user} twisted the dimensions!",
        ),
        "magic room" => field(
            RoomEffect { effect: StatusEffect::MagicRoom, turns: 5 },
            "{user} created a bizarre area where held items lose their effects!",
        ),
        "wonder room" => field(
            RoomEffect { effect: StatusEffect::WonderRoom, turns: 5 },
            "{user} created a bizarre area where defensive stats are swapped!",
        ),
        "gravity" => field(
            RoomEffect { effect: StatusEffect::Gravity, turns: 5 },
            "{user} intensified gravity!",
        ),
        "mud sport" => field(
            RoomEffect { effect: StatusEffect::MudSport, turns: 5 },
            "{user} covered the field in mud, weakening Electric moves!",
        ),
        "water sport" => field(
            RoomEffect { effect: StatusEffect::WaterSport, turns: 5 },
            "{user} soaked the field, weakening Fire moves!",
        ),
        "ion deluge" => field(
            RoomEffect { effect: StatusEffect::IonDeluge, turns: 1 },
            "{user} showered the field with electrically charged particles!",
        ),
        "fairy lock" => field(
            RoomEffect { effect: StatusEffect::FairyLock, turns: 1 },
            "{user} locked down the battlefield! No one can escape next turn!",
        ),
        "happy hour" => field(
            RoomEffect { effect: StatusEffect::HappyHour, turns: -1 },
            "{user} used Happy Hour! Everyone is caught up in the happy atmosphere!",
        ),

        // Single-turn protections.
        "protect" => field(Protection(StatusEffect::Protect), "{user} protected itself!"),
        "detect" => field(Protection(StatusEffect::Detect), "{user} braced itself!"),
        "endure" => field(Protection(StatusEffect::Endure), "{user} braced itself to endure the next hit!"),
        "max guard" => field(Protection(StatusEffect::MaxGuard), "{user} protected itself with Max Guard!"),
        "obstruct" => field(Protection(StatusEffect::Obstruct), "{user} obstructed the way!"),
        "silk trap" => field(Protection(StatusEffect::SilkTrap), "{user} spun a silken trap!"),
        "spiky shield" => field(Protection(StatusEffect::SpikyShield), "{user} raised a spiky shield!"),
        "baneful bunker" => field(
            Protection(StatusEffect::BanefulBunker),
            "{user} bunkered down behind a baneful barrier!",
        ),
        "burning bulwark" => field(
            Protection(StatusEffect::BurningBulwark),
            "{user} raised a burning bulwark!",
        ),

        // Traps.
        "spider web" => field(
            Condition { effect: StatusEffect::Trapped, turns: 5, on_user: false },
            "{user} used Spider Web! {target} can no longer escape!",
        ),
        "block" => field(
            Condition { effect: StatusEffect::Block, turns: -1, on_user: false },
            "{user} used Block! {target}'s escape route was cut off!",
        ),
        "mean look" => field(
            Condition { effect: StatusEffect::MeanLook, turns: -1, on_user: false },
            "{user} used Mean Look! {target} can no longer escape!",
        ),

        // Conditions with dedicated engine handling.
        "leech seed" => field(
            Condition { effect: StatusEffect::LeechSeed, turns: -1, on_user: false },
            "{user} planted a seed on {target}!",
        ),
        "ingrain" => field(
            Condition { effect: StatusEffect::Ingrain, turns: -1, on_user: true },
            "{user} planted its roots! {user} will absorb nutrients each turn!",
        ),
        "aqua ring" => field(
            Condition { effect: StatusEffect::AquaRing, turns: -1, on_user: true },
            "{user} surrounded itself with a veil of water!",
        ),
        "taunt" => field(
            Condition { effect: StatusEffect::Taunt, turns: 3, on_user: false },
            "{user} used Taunt! {target} fell for the taunt!",
        ),
        "embargo" => field(
            Condition { effect: StatusEffect::Embargo, turns: 5, on_user: false },
            "{user} used Embargo! {target} can't use items anymore!",
        ),
        "torment" => field(
            Condition { effect: StatusEffect::Torment, turns: 5, on_user: false },
            "{user} used Torment! {target} was subjected to torment!",
        ),
        "disable" => field(
            Condition { effect: StatusEffect::Disable, turns: 4, on_user: false },
            "{user} used Disable! {target}'s last move was disabled!",
        ),
        "encore" => field(
            Condition { effect: StatusEffect::Encore, turns: 3, on_user: false },
            "{user} used Encore! {target} must repeat its last move!",
        ),
        "heal block" => field(
            Condition { effect: StatusEffect::HealBlock, turns: 5, on_user: false },
            "{user} used Heal Block! {target} was prevented from healing!",
        ),
        "imprison" => field(
            Condition { effect: StatusEffect::Imprison, turns: -1, on_user: false },
            "{user} sealed the moves it shares with {target}!",
        ),
        "telekinesis" => field(
            Condition { effect: StatusEffect::Telekinesis, turns: 3, on_user: false },
            "{user} hurled {target} into the air!",
        ),
        "magnet rise" => field(
            Condition { effect: StatusEffect::MagnetRise, turns: 5, on_user: true },
            "{user} levitated with electromagnetism!",
        ),
        "charge" => field(
            Condition { effect: StatusEffect::Charge, turns: 1, on_user: true },
            "{user} began charging power!",
        ),
        "laser focus" => field(
            Condition { effect: StatusEffect::LaserFocus, turns: 1, on_user: true },
            "{user} concentrated intensely!",
        ),
        "focus energy" => field(
            Condition { effect: StatusEffect::LaserFocus, turns: 5, on_user: true },
            "{user} is getting pumped!",
        ),
        "lock on" => field(
            Condition { effect: StatusEffect::LockOn, turns: 1, on_user: true },
            "{user} took aim at {target}!",
        ),
        "mind reader" => field(
            Condition { effect: StatusEffect::MindReader, turns: 1, on_user: true },
            "{user} sensed {target}'s movements!",
        ),
        "destiny bond" => field(
            Condition { effect: StatusEffect::DestinyBond, turns: 1, on_user: true },
            "{user} is hoping to take its attacker down with it!",
        ),
        "grudge" => field(
            Condition { effect: StatusEffect::Grudge, turns: 1, on_user: true },
            "{user} wants its attacker to bear a grudge!",
        ),
        "follow me" => field(
            Condition { effect: StatusEffect::FollowMe, turns: 1, on_user: true },
            "{user} became the center of attention!",
        ),
        "rage powder" => field(
            Condition { effect: StatusEffect::RagePowder, turns: 1, on_user: true },
            "{user} scattered rage powder and became the center of attention!",
        ),
        "spotlight" => field(
            Condition { effect: StatusEffect::Spotlight, turns: 1, on_user: false },
            "{user} shone a spotlight on {target}!",
        ),
        "powder" => field(
            Condition { effect: StatusEffect::Powder, turns: 1, on_user: false },
            "{user} covered {target} in powder!",
        ),
        "snatch" => field(
            Condition { effect: StatusEffect::Snatch, turns: 1, on_user: true },
            "{user} waits for a target to make a move!",
        ),
        "magic coat" => field(
            Condition { effect: StatusEffect::MagicCoat, turns: 1, on_user: true },
            "{user} shrouded itself with Magic Coat!",
        ),
        "quash" => field(
            Condition { effect: StatusEffect::Quash, turns: 1, on_user: false },
            "{user} used Quash! {target}'s move was postponed!",
        ),
        "helping hand" => field(
            Condition { effect: StatusEffect::HelpingHand, turns: 1, on_user: true },
            "{user} is ready to help!",
        ),
        "gastro acid" => field(
            Condition { effect: StatusEffect::GastroAcid, turns: -1, on_user: false },
            "{user} drenched {target} in gastric acid!",
        ),
        "tar shot" => field(
            Condition { effect: StatusEffect::TarShot, turns: -1, on_user: false },
            "{user} poured sticky tar over {target}!",
        ),
        "foresight" => field(
            Condition { effect: StatusEffect::Foresight, turns: -1, on_user: false },
            "{user} identified {target}!",
        ),
        "odor sleuth" => field(
            Condition { effect: StatusEffect::OdorSleuth, turns: -1, on_user: false },
            "{user} sniffed out {target}!",
        ),
        "miracle eye" => field(
            Condition { effect: StatusEffect::MiracleEye, turns: -1, on_user: false },
            "{user} saw through {target}'s defenses!",
        ),
        "electrify" => field(
            Condition { effect: StatusEffect::Electrify, turns: 1, on_user: false },
            "{user} electrified {target}'s next move!",
        ),
        "trick-or-treat" => field(
            Condition { effect: StatusEffect::TrickOrTreat, turns: -1, on_user: false },
            "{user} took {target} trick-or-treating!",
        ),
        "forest's curse" => field(
            Condition { effect: StatusEffect::ForestsCurse, turns: -1, on_user: false },
            "{user} put a forest curse on {target}!",
        ),
        "magic powder" => field(
            Condition { effect: StatusEffect::MagicPowder, turns: -1, on_user: false },
            "{user} sprinkled magic powder on {target}!",
        ),

        // One-offs.
        "whirlwind" => field(ForceSwitch, "{user} used Whirlwind! {target} was blown away!"),
        "roar" => field(ForceSwitch, "{user} roared! {target} fled back to its trainer!"),
        "defog" => field(ClearHazards, "{user} blew away the fog and hazards! {target}'s evasion fell!"),
        "tidy up" => field(ClearHazards, "{user} tidied up the battlefield!"),
        "pain split" => field(PainSplit, "{user} used Pain Split! The battlers shared their pain!"),
        "perish song" => field(
            PerishSong,
            "{user} sang a perish song! All monsters that heard it will faint in three turns!",
        ),
        "substitute" => field(
            Substitute,
            "{user} put in a substitute at the cost of some of its HP!",
        ),
        "splash" => field(Nothing, "{user} used Splash! But nothing happened!"),
        "celebrate" => field(Nothing, "{user} is celebrating!"),
        "hold hands" => field(Nothing, "{user} held hands with its ally. It's heartwarming!"),
        "teatime" => field(Nothing, "{user} invited everyone to teatime!"),
        _ => return None,
    };
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusEffect;

    #[test]
    fn rain_dance_sets_rain() {
        let entry = lookup("rain dance").unwrap();
        assert!(matches!(
            entry.action,
            FieldAction::Weather(state::Weather::Rain)
        ));
    }

    #[test]
    fn weather_and_terrain_entries_all_resolve() {
        for (name, expected) in [
            ("sunny day", state::Weather::Sunny),
            ("sandstorm", state::Weather::Sandstorm),
            ("hail", state::Weather::Hail),
            ("snowscape", state::Weather::Snow),
            ("chilly reception", state::Weather::Snow),
        ] {
            let entry = lookup(name).unwrap();
            assert!(
                matches!(entry.action, FieldAction::Weather(w) if w == expected),
                "{name}"
            );
        }
        for (name, expected) in [
            ("electric terrain", state::Terrain::Electric),
            ("grassy terrain", state::Terrain::Grassy),
            ("misty terrain", state::Terrain::Misty),
            ("psychic terrain", state::Terrain::Psychic),
        ] {
            let entry = lookup(name).unwrap();
            assert!(
                matches!(entry.action, FieldAction::Terrain(t) if t == expected),
                "{name}"
            );
        }
    }

    #[test]
    fn spikes_is_a_hazard_on_the_other_side() {
        let entry = lookup("spikes").unwrap();
        assert!(matches!(entry.action, FieldAction::Hazard(StatusEffect::Spikes)));
    }

    #[test]
    fn protect_is_a_single_turn_protection() {
        let entry = lookup("protect").unwrap();
        assert!(matches!(
            entry.action,
            FieldAction::Protection(StatusEffect::Protect)
        ));
    }

    #[test]
    fn splash_does_nothing() {
        let entry = lookup("splash").unwrap();
        assert!(matches!(entry.action, FieldAction::Nothing));
    }
}

use serde::{Deserialize, Serialize};

/// Elemental types carried by monsters and moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl ElementType {
    pub fn display(&self) -> &'static str {
        match self {
            ElementType::Normal => "Normal",
            ElementType::Fire => "Fire",
            ElementType::Water => "Water",
            ElementType::Electric => "Electric",
            ElementType::Grass => "Grass",
            ElementType::Ice => "Ice",
            ElementType::Fighting => "Fighting",
            ElementType::Poison => "Poison",
            ElementType::Ground => "Ground",
            ElementType::Flying => "Flying",
            ElementType::Psychic => "Psychic",
            ElementType::Bug => "Bug",
            ElementType::Rock => "Rock",
            ElementType::Ghost => "Ghost",
            ElementType::Dragon => "Dragon",
            ElementType::Dark => "Dark",
            ElementType::Steel => "Steel",
            ElementType::Fairy => "Fairy",
        }
    }

    /// Case-insensitive parse of a type name.
    pub fn parse(name: &str) -> Option<ElementType> {
        let normalized = name.trim().to_ascii_lowercase();
        let ty = match normalized.as_str() {
            "normal" => ElementType::Normal,
            "fire" => ElementType::Fire,
            "water" => ElementType::Water,
            "electric" => ElementType::Electric,
            "grass" => ElementType::Grass,
            "ice" => ElementType::Ice,
            "fighting" => ElementType::Fighting,
            "poison" => ElementType::Poison,
            "ground" => ElementType::Ground,
            "flying" => ElementType::Flying,
            "psychic" => ElementType::Psychic,
            "bug" => ElementType::Bug,
            "rock" => ElementType::Rock,
            "ghost" => ElementType::Ghost,
            "dragon" => ElementType::Dragon,
            "dark" => ElementType::Dark,
            "steel" => ElementType::Steel,
            "fairy" => ElementType::Fairy,
            _ => return None,
        };
        Some(ty)
    }
}

/// Single type-pair lookup from the built-in chart. Pairs absent from the
/// chart are neutral (1.0).
pub fn pair_effectiveness(attack: ElementType, defend: ElementType) -> f64 {
    use ElementType::*;
    match (attack, defend) {
        (Normal, Rock) | (Normal, Steel) => 0.5,
        (Normal, Ghost) => 0.0,

        (Fire, Fire) | (Fire, Water) | (Fire, Rock) | (Fire, Dragon) => 0.5,
        (Fire, Grass) | (Fire, Ice) | (Fire, Bug) | (Fire, Steel) => 2.0,

        (Water, Water) | (Water, Grass) | (Water, Dragon) => 0.5,
        (Water, Fire) | (Water, Ground) | (Water, Rock) => 2.0,

        (Electric, Electric) | (Electric, Grass) | (Electric, Dragon) => 0.5,
        (Electric, Water) | (Electric, Flying) => 2.0,
        (Electric, Ground) => 0.0,

        (Grass, Fire) | (Grass, Grass) | (Grass, Poison) | (Grass, Flying)
        | (Grass, Bug) | (Grass, Dragon) | (Grass, Steel) => 0.5,
        (Grass, Water) | (Grass, Ground) | (Grass, Rock) => 2.0,

        (Ice, Fire) | (Ice, Water) | (Ice, Ice) | (Ice, Steel) => 0.5,
        (Ice, Grass) | (Ice, Ground) | (Ice, Flying) | (Ice, Dragon) => 2.0,

        (Fighting, Poison) | (Fighting, Flying) | (Fighting, Psychic)
        | (Fighting, Bug) | (Fighting, Fairy) => 0.5,
        (Fighting, Normal) | (Fighting, Ice) | (Fighting, Rock)
        | (Fighting, Dark) | (Fighting, Steel) => 2.0,
        (Fighting, Ghost) => 0.0,

        (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => 0.5,
        (Poison, Grass) | (Poison, Fairy) => 2.0,
        (Poison, Steel) => 0.0,

        (Ground, Grass) | (Ground, Bug) => 0.5,
        (Ground, Fire) | (Ground, Electric) | (Ground, Poison)
        | (Ground, Rock) | (Ground, Steel) => 2.0,
        (Ground, Flying) => 0.0,

        (Flying, Electric) | (Flying, Rock) | (Flying, Steel) => 0.5,
        (Flying, Grass) | (Flying, Fighting) | (Flying, Bug) => 2.0,

        (Psychic, Psychic) | (Psychic, Steel) => 0.5,
        (Psychic, Fighting) | (Psychic, Poison) => 2.0,
        (Psychic, Dark) => 0.0,

        (Bug, Fire) | (Bug, Fighting) | (Bug, Poison) | (Bug, Flying)
        | (Bug, Ghost) | (Bug, Steel) | (Bug, Fairy) => 0.5,
        (Bug, Grass) | (Bug, Psychic) | (Bug, Dark) => 2.0,

        (Rock, Fighting) | (Rock, Ground) | (Rock, Steel) => 0.5,
        (Rock, Fire) | (Rock, Ice) | (Rock, Flying) | (Rock, Bug) => 2.0,

        (Ghost, Dark) => 0.5,
        (Ghost, Psychic) | (Ghost, Ghost) => 2.0,
        (Ghost, Normal) => 0.0,

        (Dragon, Steel) => 0.5,
        (Dragon, Dragon) => 2.0,
        (Dragon, Fairy) => 0.0,

        (Dark, Fighting) | (Dark, Dark) | (Dark, Fairy) => 0.5,
        (Dark, Psychic) | (Dark, Ghost) => 2.0,

        (Steel, Fire) | (Steel, Water) | (Steel, Electric) | (Steel, Steel) => 0.5,
        (Steel, Ice) | (Steel, Rock) | (Steel, Fairy) => 2.0,

        (Fairy, Fire) | (Fairy, Poison) | (Fairy, Steel) => 0.5,
        (Fairy, Fighting) | (Fairy, Dragon) | (Fairy, Dark) => 2.0,

        _ => 1.0,
    }
}

/// Combined effectiveness of an attack type against up to five defender
/// types: the product of per-type lookups. An empty list is neutral.
pub fn type_effectiveness(attack: ElementType, defender_types: &[ElementType]) -> f64 {
    defender_types
        .iter()
        .fold(1.0, |acc, defend| acc * pair_effectiveness(attack, *defend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_defender_list_is_neutral() {
        assert_eq!(type_effectiveness(ElementType::Fire, &[]), 1.0);
    }

    #[rstest]
    #[case(ElementType::Fire, vec![ElementType::Grass], 2.0)]
    #[case(ElementType::Fire, vec![ElementType::Grass, ElementType::Bug], 4.0)]
    #[case(ElementType::Water, vec![ElementType::Grass, ElementType::Dragon], 0.25)]
    #[case(ElementType::Electric, vec![ElementType::Ground], 0.0)]
    #[case(ElementType::Normal, vec![ElementType::Fairy], 1.0)]
    fn products_stay_in_expected_set(
        #[case] attack: ElementType,
        #[case] defenders: Vec<ElementType>,
        #[case] expected: f64,
    ) {
        assert_eq!(type_effectiveness(attack, &defenders), expected);
    }

    #[test]
    fn every_pair_is_in_the_closed_set() {
        use ElementType::*;
        let all = [
            Normal, Fire, Water, Electric, Grass, Ice, Fighting, Poison, Ground, Flying,
            Psychic, Bug, Rock, Ghost, Dragon, Dark, Steel, Fairy,
        ];
        for a in all {
            for d in all {
                let e = pair_effectiveness(a, d);
                assert!(
                    e == 0.0 || e == 0.5 || e == 1.0 || e == 2.0,
                    "{a:?} vs {d:?} = {e}"
                );
            }
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(ElementType::parse("FIRE"), Some(ElementType::Fire));
        assert_eq!(ElementType::parse(" water "), Some(ElementType::Water));
        assert_eq!(ElementType::parse("shadow"), None);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatType {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpecialAttack => "Special Attack",
            StatType::SpecialDefense => "Special Defense",
            StatType::Speed => "Speed",
            StatType::Accuracy => "accuracy",
            StatType::Evasion => "evasiveness",
        };
        write!(f, "{}", display_name)
    }
}

/// Non-volatile status. Survives switching out.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCondition {
    Poison,
    Burn,
    Paralysis,
}

impl StatusCondition {
    /// Fraction of max HP lost at the end of each turn, as a divisor.
    pub fn residual_divisor(self) -> Option<u16> {
        match self {
            StatusCondition::Poison => Some(8),
            StatusCondition::Burn => Some(16),
            StatusCondition::Paralysis => None,
        }
    }
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatusCondition::Poison => "poison",
            StatusCondition::Burn => "burn",
            StatusCondition::Paralysis => "paralysis",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Weather {
    #[default]
    Clear,
    Sun,
    Rain,
    Sandstorm,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Weather::Clear => "clear skies",
            Weather::Sun => "harsh sunlight",
            Weather::Rain => "rain",
            Weather::Sandstorm => "sandstorm",
        };
        write!(f, "{}", display_name)
    }
}

/// Which side of the field a combatant fights for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

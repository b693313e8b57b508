use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Hash,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl PokemonType {
    /// Calculate type effectiveness multiplier for attacking type vs defending type
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective, 0.0 = No Effect
    pub fn type_effectiveness(attacking: PokemonType, defending: PokemonType) -> f32 {
        use PokemonType::*;

        match (attacking, defending) {
            (Normal, Ghost) | (Fighting, Ghost) | (Ghost, Normal) => 0.0,
            (Electric, Ground) | (Ground, Flying) | (Psychic, Dark) => 0.0,
            (Poison, Steel) | (Dragon, Fairy) => 0.0,

            (Normal, Rock) | (Normal, Steel) => 0.5,

            (Fire, Grass) | (Fire, Ice) | (Fire, Bug) | (Fire, Steel) => 2.0,
            (Fire, Fire) | (Fire, Water) | (Fire, Rock) | (Fire, Dragon) => 0.5,

            (Water, Fire) | (Water, Ground) | (Water, Rock) => 2.0,
            (Water, Water) | (Water, Grass) | (Water, Dragon) => 0.5,

            (Grass, Water) | (Grass, Ground) | (Grass, Rock) => 2.0,
            (Grass, Fire) | (Grass, Grass) | (Grass, Poison) | (Grass, Flying) => 0.5,
            (Grass, Bug) | (Grass, Dragon) | (Grass, Steel) => 0.5,

            (Electric, Water) | (Electric, Flying) => 2.0,
            (Electric, Electric) | (Electric, Grass) | (Electric, Dragon) => 0.5,

            (Ice, Grass) | (Ice, Ground) | (Ice, Flying) | (Ice, Dragon) => 2.0,
            (Ice, Fire) | (Ice, Water) | (Ice, Ice) | (Ice, Steel) => 0.5,

            (Fighting, Normal) | (Fighting, Ice) | (Fighting, Rock) => 2.0,
            (Fighting, Dark) | (Fighting, Steel) => 2.0,
            (Fighting, Poison) | (Fighting, Flying) | (Fighting, Psychic) => 0.5,
            (Fighting, Bug) | (Fighting, Fairy) => 0.5,

            (Ground, Fire) | (Ground, Electric) | (Ground, Poison) => 2.0,
            (Ground, Rock) | (Ground, Steel) => 2.0,
            (Ground, Grass) | (Ground, Bug) => 0.5,

            (Flying, Grass) | (Flying, Fighting) | (Flying, Bug) => 2.0,
            (Flying, Electric) | (Flying, Rock) | (Flying, Steel) => 0.5,

            (Psychic, Fighting) | (Psychic, Poison) => 2.0,
            (Psychic, Psychic) | (Psychic, Steel) => 0.5,

            (Rock, Fire) | (Rock, Ice) | (Rock, Flying) | (Rock, Bug) => 2.0,
            (Rock, Fighting) | (Rock, Ground) | (Rock, Steel) => 0.5,

            (Dragon, Dragon) => 2.0,
            (Dragon, Steel) => 0.5,

            (Dark, Psychic) | (Dark, Ghost) => 2.0,
            (Dark, Fighting) | (Dark, Dark) | (Dark, Fairy) => 0.5,

            (Fairy, Fighting) | (Fairy, Dragon) | (Fairy, Dark) => 2.0,
            (Fairy, Fire) | (Fairy, Poison) | (Fairy, Steel) => 0.5,

            (Steel, Ice) | (Steel, Rock) | (Steel, Fairy) => 2.0,
            (Steel, Fire) | (Steel, Water) | (Steel, Electric) | (Steel, Steel) => 0.5,

            (Ghost, Ghost) | (Ghost, Psychic) => 2.0,
            (Ghost, Dark) => 0.5,

            (Poison, Grass) | (Poison, Fairy) => 2.0,
            (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => 0.5,

            (Bug, Grass) | (Bug, Psychic) | (Bug, Dark) => 2.0,
            (Bug, Fire) | (Bug, Fighting) | (Bug, Poison) | (Bug, Flying) => 0.5,
            (Bug, Ghost) | (Bug, Steel) | (Bug, Fairy) => 0.5,

            _ => 1.0,
        }
    }

    /// Combined multiplier against every type of a defender.
    pub fn effectiveness_against(self, defending: &[PokemonType]) -> f32 {
        defending
            .iter()
            .map(|defender| Self::type_effectiveness(self, *defender))
            .product()
    }
}

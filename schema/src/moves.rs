use crate::battle_data::{StatType, Weather};
use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, EnumString, IntoStaticStr,
)]
pub enum Move {
    Tackle,
    Scratch,
    QuickAttack,
    Swift,
    Ember,
    Flamethrower,
    WaterGun,
    VineWhip,
    Thunderbolt,
    RockSlide,
    // Two-turn moves
    SolarBeam,
    SkullBash,
    RazorWind,
    SkyAttack,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Convert CamelCase to Title Case: "SolarBeam" -> "Solar Beam"
        let name: &'static str = self.into();
        for (i, c) in name.chars().enumerate() {
            if i > 0 && c.is_uppercase() {
                write!(f, " ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Extra data carried by moves that spend a turn charging before they hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChargeData {
    /// Weather in which the charge turn is skipped.
    #[serde(default)]
    pub instant_weather: Vec<Weather>,
    /// Stat stage changes applied to the user when it begins charging.
    #[serde(default)]
    pub on_charge: Vec<(StatType, i8)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: Move,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u16,
    /// `None` never misses.
    pub accuracy: Option<u8>,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub charge: Option<ChargeData>,
}

impl MoveData {
    pub fn is_charging_move(&self) -> bool {
        self.charge.is_some()
    }

    pub fn instant_charge_in(&self, weather: Weather) -> bool {
        self.charge
            .as_ref()
            .is_some_and(|charge| charge.instant_weather.contains(&weather))
    }
}

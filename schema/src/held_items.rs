use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Identifier of a held item (stackable effect).
///
/// The numeric value groups items by family in the high byte. Every ordered
/// walk over held items uses the numeric value, never the declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString, IntoStaticStr,
)]
#[repr(u16)]
pub enum HeldItemId {
    // Berries
    SitrusBerry = 0x0101,
    LumBerry = 0x0102,
    LiechiBerry = 0x0104,
    GanlonBerry = 0x0105,
    PetayaBerry = 0x0106,
    ApicotBerry = 0x0107,
    SalacBerry = 0x0108,

    // Other consumables
    PowerHerb = 0x0203,

    // Type boosters
    SilkScarf = 0x0301,
    BlackBelt = 0x0302,
    SharpBeak = 0x0303,
    PoisonBarb = 0x0304,
    SoftSand = 0x0305,
    HardStone = 0x0306,
    SilverPowder = 0x0307,
    SpellTag = 0x0308,
    MetalCoat = 0x0309,
    Charcoal = 0x030A,
    MysticWater = 0x030B,
    MiracleSeed = 0x030C,
    Magnet = 0x030D,
    TwistedSpoon = 0x030E,
    NeverMeltIce = 0x030F,
    DragonFang = 0x0310,
    BlackGlasses = 0x0311,
    FairyFeather = 0x0312,

    // Gain boosters
    LuckyEgg = 0x0601,
    GoldenEgg = 0x0602,
    SootheBell = 0x0603,

    // Unique items
    Leftovers = 0x0704,
    WideLens = 0x0707,
    ToxicOrb = 0x070B,
    FlameOrb = 0x070C,
    SoulDew = 0x070D,
}

impl HeldItemId {
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// The type booster that powers up moves of `move_type`.
    pub fn attack_type_booster(move_type: PokemonType) -> HeldItemId {
        match move_type {
            PokemonType::Normal => HeldItemId::SilkScarf,
            PokemonType::Fighting => HeldItemId::BlackBelt,
            PokemonType::Flying => HeldItemId::SharpBeak,
            PokemonType::Poison => HeldItemId::PoisonBarb,
            PokemonType::Ground => HeldItemId::SoftSand,
            PokemonType::Rock => HeldItemId::HardStone,
            PokemonType::Bug => HeldItemId::SilverPowder,
            PokemonType::Ghost => HeldItemId::SpellTag,
            PokemonType::Steel => HeldItemId::MetalCoat,
            PokemonType::Fire => HeldItemId::Charcoal,
            PokemonType::Water => HeldItemId::MysticWater,
            PokemonType::Grass => HeldItemId::MiracleSeed,
            PokemonType::Electric => HeldItemId::Magnet,
            PokemonType::Psychic => HeldItemId::TwistedSpoon,
            PokemonType::Ice => HeldItemId::NeverMeltIce,
            PokemonType::Dragon => HeldItemId::DragonFang,
            PokemonType::Dark => HeldItemId::BlackGlasses,
            PokemonType::Fairy => HeldItemId::FairyFeather,
        }
    }

    pub fn is_berry(self) -> bool {
        self.as_u16() >> 8 == 0x01
    }
}

impl PartialOrd for HeldItemId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeldItemId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_u16().cmp(&other.as_u16())
    }
}

impl fmt::Display for HeldItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Split CamelCase into words: "SitrusBerry" -> "Sitrus Berry"
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

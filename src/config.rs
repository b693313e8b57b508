//! Engine configuration.
//!
//! Everything the engine needs before a battle starts is loaded here: the
//! held-item table, the move table and a handful of engine options. The
//! built-in tables are embedded from `data/` at compile time; a full config
//! can also be read from a RON file on disk.

use crate::errors::{ConfigResult, ConfigurationError};
use crate::items::{BerryKind, TriggerPoint};
use schema::{HeldItemId, MoveData, PokemonType, StatusCondition};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_EFFECTS: &str = include_str!("../data/effects.ron");
const BUILTIN_MOVES: &str = include_str!("../data/moves.ron");

/// One row of the held-item table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectEntry {
    pub id: HeldItemId,
    pub trigger: TriggerPoint,
    pub max_stack: u32,
    #[serde(default)]
    pub consumable: bool,
    #[serde(default = "default_true")]
    pub transferable: bool,
    #[serde(default = "default_true")]
    pub stealable: bool,
    /// Whether an item-suppressing condition on the holder silences it.
    #[serde(default = "default_true")]
    pub suppressable: bool,
    /// An entry without a behavior is rejected when the registry is built.
    #[serde(default)]
    pub behavior: Option<BehaviorConfig>,
}

/// Behavior parameters as written in config. Ratios are plain fractions
/// (`0.2` is +20% per stack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BehaviorConfig {
    AttackTypeBooster { move_type: PokemonType, ratio: f64 },
    AccuracyBooster { amount: u32 },
    ExperienceBooster { ratio: f64 },
    FriendshipBooster { ratio: f64 },
    Berry(BerryKind),
    Leftovers { divisor: u16 },
    StatusOrb(StatusCondition),
    PowerHerb,
    /// Pushes a nature multiplier further from neutral by `step` per stack.
    NatureWeightBooster { step: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Panic on invariant violations instead of logging them. Unset means
    /// "on in debug builds".
    pub strict_invariants: Option<bool>,
    /// Upper bound on phases executed in one turn before the scheduler is
    /// halted.
    pub max_phases_per_turn: usize,
    /// Duration of weather set up at battle start, in turns.
    pub default_weather_turns: u8,
    /// Friendship gained by each opposing actor on the field when an actor faints.
    pub friendship_per_knockout: u8,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict_invariants: None,
            max_phases_per_turn: 512,
            default_weather_turns: 5,
            friendship_per_knockout: 4,
        }
    }
}

impl EngineOptions {
    pub fn strict(&self) -> bool {
        self.strict_invariants.unwrap_or(cfg!(debug_assertions))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub effects: Vec<EffectEntry>,
    pub moves: Vec<MoveData>,
    #[serde(default)]
    pub options: EngineOptions,
}

impl EngineConfig {
    /// The tables shipped with the crate.
    pub fn builtin() -> ConfigResult<Self> {
        Ok(Self {
            effects: ron::from_str(BUILTIN_EFFECTS)?,
            moves: ron::from_str(BUILTIN_MOVES)?,
            options: EngineOptions::default(),
        })
    }

    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }
}

fn default_true() -> bool {
    true
}

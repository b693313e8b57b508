// Battle Schema - Shared type definitions
// Identifiers and plain data records shared between the battle engine and the
// configuration tables it is built from. Nothing in here carries behavior that
// depends on battle state.

pub use battle_data::*;
pub use held_items::*;
pub use moves::*;
pub use pokemon_types::*;

pub mod battle_data;
pub mod held_items;
pub mod moves;
pub mod pokemon_types;

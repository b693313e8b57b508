use crate::errors::{ConfigResult, ConfigurationError};
use schema::{Move, MoveData};
use std::collections::HashMap;
use tracing::debug;

/// Read-only lookup of static move data.
pub trait MoveSource: Send + Sync {
    fn move_data(&self, move_id: Move) -> Option<&MoveData>;
}

/// Move table built from configuration. Shared behind an `Arc` by every
/// battle using it.
#[derive(Debug, Clone, Default)]
pub struct MoveTable {
    moves: HashMap<Move, MoveData>,
}

impl MoveTable {
    pub fn from_config(entries: &[MoveData]) -> ConfigResult<Self> {
        let mut moves = HashMap::with_capacity(entries.len());
        for data in entries {
            if moves.insert(data.id, data.clone()).is_some() {
                return Err(ConfigurationError::DuplicateMove(data.id));
            }
        }
        debug!(moves = moves.len(), "move table built");
        Ok(Self { moves })
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl MoveSource for MoveTable {
    fn move_data(&self, move_id: Move) -> Option<&MoveData> {
        self.moves.get(&move_id)
    }
}

use crate::actor::ActorId;
use crate::errors::{ConfigResult, ConfigurationError};
use crate::items::{EffectDescriptor, EffectRegistry};
use schema::HeldItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

type Holdings = BTreeMap<HeldItemId, u32>;

/// Serializable copy of every actor's held stacks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub stacks: BTreeMap<ActorId, Holdings>,
}

/// Per-actor held item stacks.
///
/// A present entry always holds between 1 and the item's max stack; zero is
/// represented by absence. The map is private so that only `grant`,
/// `consume`, `transfer` and `steal` can change it.
#[derive(Debug, Clone)]
pub struct StackLedger {
    registry: Arc<EffectRegistry>,
    stacks: BTreeMap<ActorId, Holdings>,
}

impl StackLedger {
    pub fn new(registry: Arc<EffectRegistry>) -> Self {
        Self {
            registry,
            stacks: BTreeMap::new(),
        }
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn get_stack(&self, actor: ActorId, id: HeldItemId) -> u32 {
        self.stacks
            .get(&actor)
            .and_then(|held| held.get(&id))
            .copied()
            .unwrap_or(0)
    }

    pub fn has(&self, actor: ActorId, id: HeldItemId) -> bool {
        self.get_stack(actor, id) > 0
    }

    /// Held items in ascending id order.
    pub fn held_items(&self, actor: ActorId) -> Vec<(HeldItemId, u32)> {
        self.stacks
            .get(&actor)
            .map(|held| held.iter().map(|(id, count)| (*id, *count)).collect())
            .unwrap_or_default()
    }

    /// Adds up to `delta` stacks, clamped to the max. Returns how many were
    /// actually added; unregistered ids add nothing.
    pub fn grant(&mut self, actor: ActorId, id: HeldItemId, delta: u32) -> u32 {
        let Some(max_stack) = self.registry.descriptor(id).map(|d| d.max_stack) else {
            debug!(%actor, item = %id, "grant of unregistered item ignored");
            return 0;
        };
        let current = self.get_stack(actor, id);
        let applied = delta.min(max_stack.saturating_sub(current));
        if applied > 0 {
            self.stacks
                .entry(actor)
                .or_default()
                .insert(id, current + applied);
        }
        applied
    }

    /// Removes up to `amount` stacks, never going below zero. Returns how
    /// many were removed. An entry that reaches zero is dropped.
    pub fn consume(&mut self, actor: ActorId, id: HeldItemId, amount: u32) -> u32 {
        let Some(held) = self.stacks.get_mut(&actor) else {
            return 0;
        };
        let Some(count) = held.get_mut(&id) else {
            return 0;
        };
        let removed = amount.min(*count);
        *count -= removed;
        if *count == 0 {
            held.remove(&id);
            if held.is_empty() {
                self.stacks.remove(&actor);
            }
        }
        removed
    }

    /// Moves `amount` stacks between actors, all or nothing.
    ///
    /// Fails without touching either actor when the item is not
    /// transferable, the giver holds too few, or the receiver cannot absorb
    /// the full amount under its max stack.
    pub fn transfer(&mut self, from: ActorId, to: ActorId, id: HeldItemId, amount: u32) -> bool {
        match self.registry.descriptor(id) {
            Some(descriptor) if descriptor.transferable => {
                let descriptor = descriptor.clone();
                self.move_stacks(&descriptor, from, to, amount)
            }
            _ => false,
        }
    }

    /// Like [`transfer`](Self::transfer), gated on the item being stealable.
    pub fn steal(&mut self, thief: ActorId, victim: ActorId, id: HeldItemId, amount: u32) -> bool {
        match self.registry.descriptor(id) {
            Some(descriptor) if descriptor.stealable => {
                let descriptor = descriptor.clone();
                self.move_stacks(&descriptor, victim, thief, amount)
            }
            _ => false,
        }
    }

    fn move_stacks(&mut self, descriptor: &EffectDescriptor, from: ActorId, to: ActorId, amount: u32) -> bool {
        if amount == 0 || from == to {
            return false;
        }
        let id = descriptor.id;
        if self.get_stack(from, id) < amount {
            return false;
        }
        if self.get_stack(to, id).saturating_add(amount) > descriptor.max_stack {
            return false;
        }
        self.consume(from, id, amount);
        self.grant(to, id, amount);
        debug!(%from, %to, item = %id, amount, "stacks moved");
        true
    }

    /// Drops everything an actor holds.
    pub fn clear_actor(&mut self, actor: ActorId) {
        self.stacks.remove(&actor);
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            stacks: self.stacks.clone(),
        }
    }

    /// Rebuilds a ledger from a snapshot, rejecting entries the registry
    /// would never have allowed.
    pub fn restore(registry: Arc<EffectRegistry>, snapshot: LedgerSnapshot) -> ConfigResult<Self> {
        for held in snapshot.stacks.values() {
            for (id, count) in held {
                let descriptor = registry.require(*id)?.descriptor.clone();
                if *count == 0 || *count > descriptor.max_stack {
                    return Err(ConfigurationError::InvalidSetup(format!(
                        "snapshot holds {count} of {id}, allowed 1..={}",
                        descriptor.max_stack
                    )));
                }
            }
        }
        Ok(Self {
            registry,
            stacks: snapshot.stacks,
        })
    }
}

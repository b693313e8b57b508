use std::collections::VecDeque;

use crate::battle::phase::{Phase, PhaseId, PhaseKind, PhaseKindTag, PhaseState, SuspendReason};
use crate::errors::PhaseError;
use serde::Serialize;

/// A phase that has run to the end, kept for inspection.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PhaseRecord {
    pub id: PhaseId,
    pub kind: PhaseKind,
}

impl PhaseRecord {
    pub fn tag(&self) -> PhaseKindTag {
        self.kind.tag()
    }
}

/// Ordered queue of pending phases plus the one currently running.
///
/// Phases pushed to the front are buffered in call order and spliced onto the
/// head of the queue when the running phase ends, or before the next phase
/// starts when nothing is running. The result behaves like a stack relative
/// to "now": work scheduled by a later phase runs before work scheduled by an
/// already finished one.
#[derive(Debug, Default)]
pub struct PhaseScheduler {
    queue: VecDeque<Phase>,
    front_buffer: Vec<Phase>,
    current: Option<Phase>,
    suspended: Option<SuspendReason>,
    next_id: u64,
    completed: Vec<PhaseRecord>,
}

impl PhaseScheduler {
    /// Creates a new, empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    fn make_phase(&mut self, kind: PhaseKind) -> Phase {
        self.next_id += 1;
        Phase::new(PhaseId(self.next_id), kind)
    }

    /// Adds a phase to the end of the queue.
    pub fn push_back(&mut self, kind: PhaseKind) -> PhaseId {
        let phase = self.make_phase(kind);
        let id = phase.id();
        self.queue.push_back(phase);
        id
    }

    /// Schedules a phase to run right after the current one (or next, when
    /// idle), ahead of anything already queued. Repeated calls run in call
    /// order.
    pub fn push_front(&mut self, kind: PhaseKind) -> PhaseId {
        let phase = self.make_phase(kind);
        let id = phase.id();
        self.front_buffer.push(phase);
        id
    }

    fn splice_front_buffer(&mut self) {
        for buffered in self.front_buffer.drain(..).rev() {
            self.queue.push_front(buffered);
        }
    }

    /// Drops every pending phase matching `predicate`. The running phase is
    /// never touched. Returns how many were removed.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Phase) -> bool) -> usize {
        let before = self.len();
        self.front_buffer.retain(|phase| !predicate(phase));
        self.queue.retain(|phase| !predicate(phase));
        before - self.len()
    }

    /// Drops every pending phase.
    pub fn clear_pending(&mut self) -> usize {
        self.remove_where(|_| true)
    }

    /// Pending phases in the order they will run.
    pub fn pending(&self) -> impl Iterator<Item = &Phase> {
        self.front_buffer.iter().chain(self.queue.iter())
    }

    pub fn peek(&self) -> Option<&Phase> {
        self.pending().next()
    }

    pub fn len(&self) -> usize {
        self.front_buffer.len() + self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current(&self) -> Option<&Phase> {
        self.current.as_ref()
    }

    /// Pops the next phase and marks it running. Returns a copy for the
    /// caller to dispatch on.
    pub fn start_next(&mut self) -> Result<Option<Phase>, PhaseError> {
        if let Some(running) = &self.current {
            return Err(PhaseError::InvalidTransition {
                phase: running.id(),
                from: running.state(),
                to: PhaseState::Running,
            });
        }
        self.splice_front_buffer();
        let Some(mut phase) = self.queue.pop_front() else {
            return Ok(None);
        };
        phase.transition(PhaseState::Running)?;
        self.current = Some(phase.clone());
        Ok(Some(phase))
    }

    /// Ends the running phase and splices its front insertions onto the
    /// queue head. The phase is retired even if its transition is illegal.
    pub fn finish_current(&mut self) -> Result<Option<PhaseId>, PhaseError> {
        let Some(mut phase) = self.current.take() else {
            return Ok(None);
        };
        let result = phase.transition(PhaseState::Ended);

        self.splice_front_buffer();
        self.suspended = None;

        let id = phase.id();
        self.completed.push(PhaseRecord {
            id,
            kind: phase.kind().clone(),
        });
        result.map(|_| Some(id))
    }

    pub fn suspend(&mut self, reason: SuspendReason) {
        self.suspended = Some(reason);
    }

    /// Clears the suspension without ending the running phase.
    pub fn take_suspension(&mut self) -> Option<SuspendReason> {
        self.suspended.take()
    }

    pub fn suspension(&self) -> Option<&SuspendReason> {
        self.suspended.as_ref()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// Phases that have ended, oldest first.
    pub fn completed(&self) -> &[PhaseRecord] {
        &self.completed
    }

    pub fn take_completed(&mut self) -> Vec<PhaseRecord> {
        std::mem::take(&mut self.completed)
    }
}

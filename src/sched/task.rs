//! Effect tasks and their suspension points.

use std::collections::VecDeque;
use std::time::Duration;

use smallvec::SmallVec;

use crate::core::EntityId;
use crate::host::CombatServices;

/// Why a task gave up control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Suspension {
    /// Resume once this much clock time has passed.
    Wait(Duration),
    /// Resume after the host trigger queue has been drained.
    DrainTriggerQueue,
    /// Resume on the next pass.
    Yield,
}

/// Result of resuming a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Suspend(Suspension),
    Done,
}

/// A multi-step effect that runs across scheduler passes.
///
/// Between steps the board may change. The scheduler checks every entity in
/// [`watched`](EffectTask::watched) before each resumption and cancels the
/// task if any of them is gone.
pub trait EffectTask {
    /// Run until the next suspension point or completion.
    fn resume(&mut self, services: &mut dyn CombatServices) -> Step;

    /// Entities the task's remaining steps depend on.
    fn watched(&self) -> &[EntityId] {
        &[]
    }

    /// Name for logs.
    fn name(&self) -> &str {
        "effect"
    }
}

type Action = Box<dyn FnMut(&mut dyn CombatServices)>;

enum Entry {
    Run(Action),
    Suspend(Suspension),
}

/// An [`EffectTask`] built from an ordered list of steps.
///
/// ```
/// use std::time::Duration;
/// use combat_extend::sched::{EffectTask, Sequence, Step, Suspension};
/// use combat_extend::host::MemoryCombat;
///
/// let mut host = MemoryCombat::new(1);
/// let mut task = Sequence::new("volley")
///     .then(|_| {})
///     .wait(Duration::from_millis(300))
///     .then(|_| {});
///
/// assert_eq!(task.resume(&mut host), Step::Suspend(Suspension::Wait(Duration::from_millis(300))));
/// assert_eq!(task.resume(&mut host), Step::Done);
/// ```
pub struct Sequence {
    name: String,
    entries: VecDeque<Entry>,
    watched: SmallVec<[EntityId; 2]>,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: VecDeque::new(),
            watched: SmallVec::new(),
        }
    }

    /// Append an action (builder pattern).
    #[must_use]
    pub fn then(mut self, action: impl FnMut(&mut dyn CombatServices) + 'static) -> Self {
        self.entries.push_back(Entry::Run(Box::new(action)));
        self
    }

    #[must_use]
    pub fn wait(mut self, duration: Duration) -> Self {
        self.entries.push_back(Entry::Suspend(Suspension::Wait(duration)));
        self
    }

    #[must_use]
    pub fn drain(mut self) -> Self {
        self.entries.push_back(Entry::Suspend(Suspension::DrainTriggerQueue));
        self
    }

    #[must_use]
    pub fn yield_now(mut self) -> Self {
        self.entries.push_back(Entry::Suspend(Suspension::Yield));
        self
    }

    /// Cancel the sequence if `entity` leaves the board (builder pattern).
    #[must_use]
    pub fn watching(mut self, entity: EntityId) -> Self {
        if !self.watched.contains(&entity) {
            self.watched.push(entity);
        }
        self
    }

    /// Steps not yet run, suspension points included.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }
}

impl EffectTask for Sequence {
    fn resume(&mut self, services: &mut dyn CombatServices) -> Step {
        while let Some(entry) = self.entries.pop_front() {
            match entry {
                Entry::Run(mut action) => action(services),
                Entry::Suspend(suspension) => return Step::Suspend(suspension),
            }
        }
        Step::Done
    }

    fn watched(&self) -> &[EntityId] {
        &self.watched
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("name", &self.name)
            .field("remaining", &self.entries.len())
            .field("watched", &self.watched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryCombat, NewCharacter};
    use crate::triggers::{QueueTriggerParams, TriggerId};

    #[test]
    fn test_runs_actions_between_suspensions() {
        let mut host = MemoryCombat::new(1);
        let target = host.add_character(NewCharacter::monster(0));
        let mut task = Sequence::new("double tap")
            .then(move |s| s.push_trigger(target, TriggerId::new(70), QueueTriggerParams::default()))
            .drain()
            .then(move |s| s.push_trigger(target, TriggerId::new(71), QueueTriggerParams::default()))
            .watching(target)
            .watching(target);

        assert_eq!(task.watched(), &[target]);
        assert_eq!(task.resume(&mut host), Step::Suspend(Suspension::DrainTriggerQueue));
        assert_eq!(host.queued(), 1);
        assert_eq!(task.resume(&mut host), Step::Done);
        assert_eq!(host.queued(), 2);
        assert_eq!(task.remaining(), 0);
        assert_eq!(task.resume(&mut host), Step::Done);
    }

    #[test]
    fn test_empty_sequence_is_done() {
        let mut host = MemoryCombat::new(1);
        let mut task = Sequence::new("nothing");
        assert_eq!(task.resume(&mut host), Step::Done);
        assert_eq!(task.name(), "nothing");
    }
}

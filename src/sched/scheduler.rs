//! Cooperative scheduler for effect tasks.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::contain;
use crate::host::CombatServices;

use super::clock::Clock;
use super::task::{EffectTask, Step, Suspension};

/// Handle to a spawned task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Wake {
    Ready,
    At(Duration),
}

struct Slot {
    id: TaskId,
    /// Order the task last suspended in. Ready tasks resume lowest first.
    seq: u64,
    wake: Wake,
    task: Box<dyn EffectTask>,
}

impl Slot {
    fn is_ready(&self, now: Duration) -> bool {
        match self.wake {
            Wake::Ready => true,
            Wake::At(at) => at <= now,
        }
    }
}

/// Runs effect tasks across passes.
///
/// ## Behavior
///
/// - `spawn()`: Task is ready on the next pass
/// - `run()`: One pass; every ready task resumes once, in suspension order
/// - Watched entities are checked before each resumption
/// - `cancel_all()`: Drop everything, e.g. when combat ends
pub struct Scheduler<C: Clock> {
    clock: C,
    slots: Vec<Slot>,
    next_id: u64,
    next_seq: u64,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            slots: Vec::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Add a task. It first runs on the next pass.
    pub fn spawn(&mut self, task: impl EffectTask + 'static) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        tracing::debug!(task = %id, name = task.name(), "task spawned");
        self.slots.push(Slot {
            id,
            seq,
            wake: Wake::Ready,
            task: Box::new(task),
        });
        id
    }

    /// Resume every ready task once. Returns how many were resumed.
    pub fn run(&mut self, services: &mut dyn CombatServices) -> usize {
        let now = self.clock.now();
        let (mut ready, waiting): (Vec<Slot>, Vec<Slot>) =
            std::mem::take(&mut self.slots).into_iter().partition(|s| s.is_ready(now));
        self.slots = waiting;
        ready.sort_by_key(|s| s.seq);

        let mut resumed = 0;
        for mut slot in ready {
            if let Some(gone) = slot.task.watched().iter().copied().find(|&id| !services.is_alive(id)) {
                tracing::debug!(task = %slot.id, name = slot.task.name(), entity = %gone, "watched entity gone, cancelling task");
                continue;
            }
            resumed += 1;
            let step = contain("effect task", || slot.task.resume(services));
            match step {
                None | Some(Step::Done) => {}
                Some(Step::Suspend(suspension)) => {
                    slot.wake = match suspension {
                        Suspension::Wait(duration) => Wake::At(now + duration),
                        Suspension::DrainTriggerQueue => {
                            services.run_trigger_queue();
                            Wake::Ready
                        }
                        Suspension::Yield => Wake::Ready,
                    };
                    slot.seq = self.bump_seq();
                    self.slots.push(slot);
                }
            }
        }
        resumed
    }

    /// Drop one task. False if it already finished or was never spawned.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.id != id);
        self.slots.len() != before
    }

    /// Drop every task. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.slots.len();
        if dropped > 0 {
            tracing::debug!(dropped, "cancelling all tasks");
        }
        self.slots.clear();
        dropped
    }

    /// Earliest time a waiting task becomes ready, if any.
    #[must_use]
    pub fn next_wake(&self) -> Option<Duration> {
        self.slots
            .iter()
            .map(|s| match s.wake {
                Wake::Ready => Duration::ZERO,
                Wake::At(at) => at,
            })
            .min()
    }

    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<C: Clock> std::fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.slots.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

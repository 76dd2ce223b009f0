//! Effect sequencing.
//!
//! Some effects play out over time: hit, wait for the animation, drain the
//! triggers that caused, hit again. An [`EffectTask`] expresses that as
//! explicit suspension points, and a [`Scheduler`] resumes tasks when their
//! suspension is over. Time comes from an injectable [`Clock`], so tests drive
//! it with a [`ManualClock`].
//!
//! ## Example Usage
//!
//! ```
//! use std::time::Duration;
//! use combat_extend::host::{MemoryCombat, NewCharacter};
//! use combat_extend::sched::{ManualClock, Scheduler, Sequence};
//!
//! let mut host = MemoryCombat::new(1);
//! let caster = host.add_character(NewCharacter::monster(0).hp(3));
//!
//! let clock = ManualClock::new();
//! let mut scheduler = Scheduler::new(&clock);
//! scheduler.spawn(
//!     Sequence::new("barrage")
//!         .then(|_| {})
//!         .wait(Duration::from_millis(500))
//!         .then(|_| {})
//!         .watching(caster),
//! );
//!
//! scheduler.run(&mut host);
//! assert_eq!(scheduler.len(), 1);
//!
//! clock.advance(Duration::from_millis(500));
//! scheduler.run(&mut host);
//! assert!(scheduler.is_empty());
//! ```

mod clock;
mod scheduler;
mod task;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use scheduler::{Scheduler, TaskId};
pub use task::{EffectTask, Sequence, Step, Suspension};

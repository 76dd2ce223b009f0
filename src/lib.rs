//! # combat-extend
//!
//! Trigger and target-mode extension core for a closed turn-based card
//! combat host.
//!
//! The host cannot be modified, so new behavior is spliced into its
//! lifecycle methods at pattern-matched sites. At each site an interceptor
//! asks the registered predicates which custom triggers fire, queues them
//! through the host's own trigger queue, and drains it. Custom target modes
//! run through one pipeline for both the aiming preview and the committing
//! pass, so the two always agree.
//!
//! ## Design Principles
//!
//! 1. **Never break the host**: A site that cannot be located disables its
//!    feature; a faulty predicate or selector is skipped and logged.
//!
//! 2. **Register once, read forever**: All registries are filled on an
//!    [`ExtensionBuilder`] and frozen into a [`CombatExtension`].
//!
//! 3. **Typed contexts**: Each trigger category has its own event type, so a
//!    predicate cannot read data its category does not carry.
//!
//! ## Modules
//!
//! - `core`: Identifiers, configuration, errors, list pool
//! - `instrument`: Instruction patterns and splice planning
//! - `host`: The host seams and an in-memory reference host
//! - `triggers`: Trigger registry, event contexts, aliases, built-ins
//! - `targeting`: Target modes, selectors and the resolution pipeline
//! - `status`: Status capabilities such as stack propagation
//! - `interceptors`: Hook points and per-category handlers
//! - `sched`: Suspendable effect tasks
//! - `extension`: Startup builder and the running extension

pub mod core;
pub mod extension;
pub mod host;
pub mod instrument;
pub mod interceptors;
pub mod sched;
pub mod status;
pub mod targeting;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{
    CardId, EntityId, ExtensionConfig, RegistrationError, RoomIndex, StatusId, SubtypeId, Team, TeamFilter,
};

pub use crate::extension::{CombatExtension, ExtensionBuilder};

pub use crate::host::{CombatServices, HookDispatch, HookFrame, MemoryCombat, MethodSource};

pub use crate::instrument::{AttachError, HookId, Instrumentation, Pattern};

pub use crate::triggers::{FireTriggersData, QueueTriggerParams, TriggerCategory, TriggerEvent, TriggerId, TriggerRegistry};

pub use crate::targeting::{
    CardSelector, EntitySelector, TargetModeFlags, TargetModeId, TargetPipeline, TargetSelector, TargetingContext,
};

pub use crate::status::{Capability, Propagation, StackReactor, StatusBehaviors};

pub use crate::sched::{Clock, EffectTask, ManualClock, Scheduler, Sequence};

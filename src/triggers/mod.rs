//! Custom triggers for host characters.
//!
//! Triggers let content react to host lifecycle points the host itself never
//! exposes as character triggers. The host only knows how to fire trigger
//! ids; this module decides *when* a custom id fires and *with what*.
//!
//! ## Key Components
//!
//! - [`TriggerId`]: Opaque trigger identifier (host ids are reserved)
//! - [`TriggerEvent`]: One event context type per [`TriggerCategory`]
//! - [`TriggerRegistry`]: Predicates per category plus the alias graph
//! - [`QueueTriggerParams`]: What a predicate hands to the host queue
//! - [`builtin`]: The stock predicates content packs map ids onto
//!
//! ## Example Usage
//!
//! ```
//! use combat_extend::core::{EntityId, RoomIndex, StatusId};
//! use combat_extend::host::{MemoryCombat, StatusDisplay};
//! use combat_extend::triggers::{
//!     FireTriggersData, QueueTriggerParams, StatusAddedEvent, TriggerId, TriggerRegistry,
//! };
//!
//! const ON_BUFFED: TriggerId = TriggerId::new(100);
//!
//! let mut registry = TriggerRegistry::with_reserved_max(64);
//! registry
//!     .register_predicate(ON_BUFFED, |ev: &StatusAddedEvent, _: &dyn combat_extend::host::CombatServices| {
//!         (ev.display == StatusDisplay::Positive)
//!             .then(|| QueueTriggerParams::fire(FireTriggersData::new(ev.stacks_added, 0)))
//!     })
//!     .unwrap();
//!
//! let host = MemoryCombat::new(1);
//! let event = StatusAddedEvent {
//!     character: EntityId(1),
//!     status: StatusId(2),
//!     display: StatusDisplay::Positive,
//!     stacks_added: 3,
//!     stack_total: 3,
//!     room: RoomIndex(0),
//! };
//! let fired = registry.evaluate(&event, &host);
//! assert_eq!(fired[0].0, ON_BUFFED);
//! assert_eq!(fired[0].1.param_int(), 3);
//! ```

mod alias;
pub mod builtin;
mod event;
mod params;
mod registry;

pub use alias::{AliasGraph, AliasOutcome, AliasRefusal};
pub use builtin::BUILTIN_TRIGGER_NAMES;
pub use event::{
    CardDiscardedEvent, CardPlayedEvent, CharacterHitEvent, CharacterSpawnedEvent, Predicate,
    PredicateTable, PredicateTables, ResourceDamageEvent, StatusAddedEvent, StatusRemovedEvent,
    TriggerCategory, TriggerEvent,
};
pub use params::{FireTriggersData, QueueTriggerParams, TriggerInstanceId};
pub use registry::{Firing, TriggerId, TriggerRegistry};

//! Status effect behaviors.
//!
//! The host owns status effects; this module lets content attach extra
//! capabilities to a status id. The only capability so far is
//! [`Capability::StackReactor`]: a held status that rewrites the stack count
//! of another status while it is being applied to the same character.
//!
//! ```
//! use combat_extend::core::{EntityId, StatusId};
//! use combat_extend::host::{MemoryCombat, NewCharacter, StatusDisplay, StatusInfo};
//! use combat_extend::status::{Capability, Propagation, StatusBehaviors};
//!
//! const HEX: StatusId = StatusId(10);
//! const POISON: StatusId = StatusId(11);
//!
//! let mut behaviors = StatusBehaviors::new();
//! behaviors
//!     .register(HEX, Capability::stack_reactor(Propagation::multiply(HEX, 2)))
//!     .unwrap();
//!
//! let mut host = MemoryCombat::new(1);
//! host.define_status(StatusInfo::new(POISON, "poison", StatusDisplay::Negative).propagatable());
//! let target = host.add_character(NewCharacter::hero(0));
//! host.give_status(target, HEX, 1);
//!
//! assert_eq!(behaviors.modify_incoming(target, POISON, 4, true, &host), 8);
//! assert_eq!(behaviors.modify_incoming(target, POISON, 4, false, &host), 4);
//! ```

mod propagation;

pub use propagation::{Propagation, PropagationMode};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{contain, EntityId, RegistrationError, StatusId};
use crate::host::CombatServices;

/// Reacts to another status being added to its holder.
pub trait StackReactor {
    /// Rewrite `pending`, the count of `incoming` about to be applied.
    ///
    /// `own_stacks` is how many stacks of the reacting status the holder has.
    /// Called after the host's own modifiers and every earlier reactor.
    fn on_other_status_added(
        &self,
        own_stacks: i64,
        incoming: StatusId,
        pending: i64,
        services: &dyn CombatServices,
    ) -> i64;
}

/// Something a status can do beyond what the host gives it.
pub enum Capability {
    StackReactor(Box<dyn StackReactor>),
}

impl Capability {
    pub fn stack_reactor(reactor: impl StackReactor + 'static) -> Self {
        Capability::StackReactor(Box::new(reactor))
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Capability::StackReactor(_) => "stack-reactor",
        }
    }

    fn same_kind(&self, other: &Capability) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Capabilities per status id.
#[derive(Debug, Default)]
pub struct StatusBehaviors {
    entries: FxHashMap<StatusId, SmallVec<[Capability; 1]>>,
}

impl StatusBehaviors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `status` a capability. Each capability kind may be given once.
    pub fn register(&mut self, status: StatusId, capability: Capability) -> Result<(), RegistrationError> {
        let held = self.entries.entry(status).or_default();
        if held.iter().any(|c| c.same_kind(&capability)) {
            let err = RegistrationError::DuplicateStatusBehavior { status };
            tracing::error!(error = %err, capability = capability.name(), "duplicate status behavior");
            return Err(err);
        }
        tracing::debug!(%status, capability = capability.name(), "status behavior registered");
        held.push(capability);
        Ok(())
    }

    /// The stack reactor registered for `status`, if any.
    #[must_use]
    pub fn stack_reactor(&self, status: StatusId) -> Option<&dyn StackReactor> {
        self.entries.get(&status)?.iter().find_map(|c| match c {
            Capability::StackReactor(reactor) => Some(reactor.as_ref()),
        })
    }

    #[must_use]
    pub fn has_stack_reactors(&self) -> bool {
        self.entries
            .values()
            .flatten()
            .any(|c| matches!(c, Capability::StackReactor(_)))
    }

    /// Run `target`'s stack reactors over an incoming application.
    ///
    /// Reactors run in the order the holder gained their statuses, each
    /// seeing the running total. Nothing runs unless the host allowed
    /// modification for this application.
    pub fn modify_incoming(
        &self,
        target: EntityId,
        incoming: StatusId,
        stacks: i64,
        allow_modification: bool,
        services: &dyn CombatServices,
    ) -> i64 {
        if !allow_modification {
            return stacks;
        }
        let mut pending = stacks;
        for held in services.statuses(target) {
            let Some(reactor) = self.stack_reactor(held.status) else {
                continue;
            };
            let before = pending;
            match contain("stack reactor", || {
                reactor.on_other_status_added(held.count, incoming, before, services)
            }) {
                Some(after) => pending = after,
                None => continue,
            }
            if pending != before {
                tracing::debug!(%target, reactor = %held.status, %incoming, before, after = pending, "incoming stacks rewritten");
            }
        }
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryCombat, NewCharacter};

    const A: StatusId = StatusId(1);
    const B: StatusId = StatusId(2);
    const INCOMING: StatusId = StatusId(3);

    struct AddOne;
    impl StackReactor for AddOne {
        fn on_other_status_added(&self, _: i64, _: StatusId, pending: i64, _: &dyn CombatServices) -> i64 {
            pending + 1
        }
    }

    struct Double;
    impl StackReactor for Double {
        fn on_other_status_added(&self, _: i64, _: StatusId, pending: i64, _: &dyn CombatServices) -> i64 {
            pending * 2
        }
    }

    struct Faulty;
    impl StackReactor for Faulty {
        fn on_other_status_added(&self, _: i64, _: StatusId, _: i64, _: &dyn CombatServices) -> i64 {
            panic!("reactor bug")
        }
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut behaviors = StatusBehaviors::new();
        behaviors.register(A, Capability::stack_reactor(AddOne)).unwrap();
        let err = behaviors.register(A, Capability::stack_reactor(Double)).unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateStatusBehavior { status: A });
        assert!(behaviors.has_stack_reactors());
    }

    #[test]
    fn test_reactors_chain_in_holding_order() {
        let mut behaviors = StatusBehaviors::new();
        behaviors.register(A, Capability::stack_reactor(AddOne)).unwrap();
        behaviors.register(B, Capability::stack_reactor(Double)).unwrap();

        let mut host = MemoryCombat::new(1);
        let first_a = host.add_character(NewCharacter::monster(0));
        host.give_status(first_a, A, 1);
        host.give_status(first_a, B, 1);
        // (3 + 1) * 2
        assert_eq!(behaviors.modify_incoming(first_a, INCOMING, 3, true, &host), 8);

        let first_b = host.add_character(NewCharacter::monster(0));
        host.give_status(first_b, B, 1);
        host.give_status(first_b, A, 1);
        // 3 * 2 + 1
        assert_eq!(behaviors.modify_incoming(first_b, INCOMING, 3, true, &host), 7);
    }

    #[test]
    fn test_faulty_reactor_skipped() {
        let mut behaviors = StatusBehaviors::new();
        behaviors.register(A, Capability::stack_reactor(Faulty)).unwrap();
        behaviors.register(B, Capability::stack_reactor(AddOne)).unwrap();

        let mut host = MemoryCombat::new(1);
        let target = host.add_character(NewCharacter::monster(0));
        host.give_status(target, A, 1);
        host.give_status(target, B, 1);
        assert_eq!(behaviors.modify_incoming(target, INCOMING, 3, true, &host), 4);
    }
}

//! Error types and callback containment.
//!
//! Nothing in this crate is allowed to unwind into the host's combat loop.
//! Registration problems come back as [`RegistrationError`] (and are logged
//! where they happen); user callbacks run under [`contain`].

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::core::StatusId;
use crate::targeting::{SelectorKind, TargetModeId};
use crate::triggers::{TriggerCategory, TriggerId};

/// A startup registration that was refused.
///
/// The registry is left exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("{trigger} is reserved by the host (reserved ids end at {reserved_max})")]
    ReservedTrigger { trigger: TriggerId, reserved_max: u32 },

    #[error("{trigger} already has a {category} predicate")]
    DuplicatePredicate {
        trigger: TriggerId,
        category: TriggerCategory,
    },

    #[error("{trigger} cannot alias itself")]
    SelfAlias { trigger: TriggerId },

    #[error("aliasing {custom} to {target} would create a cycle")]
    AliasCycle { custom: TriggerId, target: TriggerId },

    #[error("{mode} is reserved by the host (reserved ids end at {reserved_max})")]
    ReservedTargetMode { mode: TargetModeId, reserved_max: u16 },

    #[error("{mode} already has a selector bound")]
    DuplicateSelector { mode: TargetModeId },

    #[error("{mode} expects a {expected} selector, got {found}")]
    IncompatibleSelector {
        mode: TargetModeId,
        expected: SelectorKind,
        found: SelectorKind,
    },

    #[error("{status} already has a registered behavior")]
    DuplicateStatusBehavior { status: StatusId },
}

/// Run a user callback, turning a panic into a logged `None`.
///
/// Predicates and selectors are third-party code. A fault in one of them
/// must only skip that callback, never the rest of the pass.
pub fn contain<R>(callback: &'static str, f: impl FnOnce() -> R) -> Option<R> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            tracing::error!(callback, %message, "callback panicked, skipping it");
            None
        }
    }
}

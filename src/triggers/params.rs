//! Parameters threaded through to the host's trigger queue.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;

/// Typed parameter block a fired trigger can read.
///
/// What each slot means is defined per trigger; see the built-in predicates
/// for the conventions they use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireTriggersData {
    pub param_int: i64,
    pub param_int2: i64,
    pub param_string: Option<String>,
    /// Character the trigger's effects should target instead of their default.
    pub override_target: Option<EntityId>,
}

impl FireTriggersData {
    #[must_use]
    pub fn new(param_int: i64, param_int2: i64) -> Self {
        Self {
            param_int,
            param_int2,
            ..Self::default()
        }
    }

    /// Set the override target (builder pattern).
    #[must_use]
    pub fn targeting(mut self, target: Option<EntityId>) -> Self {
        self.override_target = target;
        self
    }

    /// Set the string parameter (builder pattern).
    #[must_use]
    pub fn with_string(mut self, value: impl Into<String>) -> Self {
        self.param_string = Some(value.into());
        self
    }
}

/// Identifies one queued trigger instance on the host side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerInstanceId(pub u32);

/// Overrides for a single trigger enqueue.
///
/// Produced by a predicate when it decides to fire. Read-only afterwards:
/// alias expansion clones it verbatim for every alias.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueTriggerParams {
    /// Character that is dying as part of this trigger.
    pub dying: Option<EntityId>,
    pub can_attack_or_heal: bool,
    /// Whether effects run by this trigger may fire further triggers.
    pub can_fire_triggers: bool,
    pub fire_data: Option<FireTriggersData>,
    /// How many times to fire.
    pub trigger_count: u32,
    /// Only fire if this exact trigger instance is still pending.
    pub exclusive: Option<TriggerInstanceId>,
}

impl Default for QueueTriggerParams {
    fn default() -> Self {
        Self {
            dying: None,
            can_attack_or_heal: true,
            can_fire_triggers: true,
            fire_data: None,
            trigger_count: 1,
            exclusive: None,
        }
    }
}

impl QueueTriggerParams {
    /// Parameters carrying only a fire-data block.
    #[must_use]
    pub fn fire(data: FireTriggersData) -> Self {
        Self {
            fire_data: Some(data),
            ..Self::default()
        }
    }

    /// Set the repeat count (builder pattern).
    #[must_use]
    pub fn repeated(mut self, count: u32) -> Self {
        self.trigger_count = count;
        self
    }

    /// Set the dying character (builder pattern).
    #[must_use]
    pub fn with_dying(mut self, dying: EntityId) -> Self {
        self.dying = Some(dying);
        self
    }

    /// Shortcut for `fire_data.param_int`, zero when absent.
    #[must_use]
    pub fn param_int(&self) -> i64 {
        self.fire_data.as_ref().map_or(0, |d| d.param_int)
    }

    /// Shortcut for `fire_data.param_int2`, zero when absent.
    #[must_use]
    pub fn param_int2(&self) -> i64 {
        self.fire_data.as_ref().map_or(0, |d| d.param_int2)
    }

    /// Shortcut for `fire_data.override_target`.
    #[must_use]
    pub fn override_target(&self) -> Option<EntityId> {
        self.fire_data.as_ref().and_then(|d| d.override_target)
    }
}

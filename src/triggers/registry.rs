//! Trigger registry.
//!
//! Maps custom trigger identifiers to the predicates that decide when they
//! fire, one table per host lifecycle point, and owns the alias graph. The
//! registry is filled once at startup and only read afterwards.
//!
//! Registration never panics. A refused registration is logged at error
//! severity, returned as a [`RegistrationError`], and leaves the registry
//! untouched.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{contain, ExtensionConfig, RegistrationError};
use crate::host::CombatServices;

use super::alias::{AliasGraph, AliasOutcome, AliasRefusal};
use super::event::{PredicateTable, PredicateTables, TriggerEvent};
use super::params::QueueTriggerParams;

/// Identifier of a character trigger.
///
/// Values at or below the configured reserved maximum are the host's own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

impl TriggerId {
    /// Create a new trigger ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Trigger({})", self.0)
    }
}

/// A trigger a predicate decided to fire, with its parameters.
pub type Firing = (TriggerId, QueueTriggerParams);

/// Registry for custom triggers.
#[derive(Debug)]
pub struct TriggerRegistry {
    reserved_max: u32,
    tables: PredicateTables,
    aliases: AliasGraph,
    /// Triggers allowed to run the host's pre-character-trigger status stage.
    pre_trigger_stage: FxHashSet<TriggerId>,
}

impl TriggerRegistry {
    /// Create an empty registry using the reserved range from `config`.
    pub fn new(config: &ExtensionConfig) -> Self {
        Self::with_reserved_max(config.reserved_trigger_max)
    }

    /// Create an empty registry that reserves ids `0..=reserved_max`.
    pub fn with_reserved_max(reserved_max: u32) -> Self {
        Self {
            reserved_max,
            tables: PredicateTables::default(),
            aliases: AliasGraph::new(),
            pre_trigger_stage: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn is_reserved(&self, trigger: TriggerId) -> bool {
        trigger.0 <= self.reserved_max
    }

    fn check_custom(&self, trigger: TriggerId) -> Result<(), RegistrationError> {
        if self.is_reserved(trigger) {
            let err = RegistrationError::ReservedTrigger {
                trigger,
                reserved_max: self.reserved_max,
            };
            tracing::error!(error = %err, "refusing to redefine a host trigger");
            return Err(err);
        }
        Ok(())
    }

    /// Register `predicate` as the `E`-category condition for `trigger`.
    ///
    /// A trigger may have one predicate per category. A second predicate for
    /// the same pair is refused and the first stays active.
    pub fn register_predicate<E, F>(
        &mut self,
        trigger: TriggerId,
        predicate: F,
    ) -> Result<(), RegistrationError>
    where
        E: TriggerEvent,
        F: Fn(&E, &dyn CombatServices) -> Option<QueueTriggerParams> + 'static,
    {
        self.check_custom(trigger)?;
        let table = E::table_mut(&mut self.tables);
        if table.contains(trigger) {
            let err = RegistrationError::DuplicatePredicate {
                trigger,
                category: E::CATEGORY,
            };
            tracing::error!(error = %err, "duplicate trigger predicate");
            return Err(err);
        }
        table.push(trigger, Box::new(predicate));
        tracing::debug!(%trigger, category = %E::CATEGORY, "trigger predicate registered");
        Ok(())
    }

    /// Does `trigger` have an `E`-category predicate?
    #[must_use]
    pub fn has_predicate<E: TriggerEvent>(&self, trigger: TriggerId) -> bool {
        E::table(&self.tables).contains(trigger)
    }

    /// The `E`-category predicates, in registration order.
    #[must_use]
    pub fn predicates<E: TriggerEvent>(&self) -> &PredicateTable<E> {
        E::table(&self.tables)
    }

    /// Run every `E`-category predicate against `event`, in registration order.
    ///
    /// A predicate that panics is logged and skipped; the rest still run.
    pub fn evaluate<E: TriggerEvent>(
        &self,
        event: &E,
        services: &dyn CombatServices,
    ) -> SmallVec<[Firing; 4]> {
        let mut fired = SmallVec::new();
        for (trigger, predicate) in E::table(&self.tables).iter() {
            if let Some(Some(params)) = contain("trigger predicate", || predicate(event, services)) {
                fired.push((trigger, params));
            }
        }
        fired
    }

    /// Make `custom` fire whenever `target` fires.
    pub fn register_alias(
        &mut self,
        custom: TriggerId,
        target: TriggerId,
    ) -> Result<(), RegistrationError> {
        self.check_custom(custom)?;
        match self.aliases.register(custom, target) {
            Ok(AliasOutcome::Added) => {
                tracing::debug!(%custom, %target, "trigger alias registered");
                Ok(())
            }
            Ok(AliasOutcome::Extended) => {
                tracing::warn!(%custom, %target, "trigger is already an alias, adding target to its set");
                Ok(())
            }
            Ok(AliasOutcome::Flattened) => {
                tracing::warn!(
                    %custom,
                    %target,
                    finals = ?self.aliases.resolve(custom),
                    "alias target is itself an alias, flattening onto its targets"
                );
                Ok(())
            }
            Err(refusal) => {
                let err = match refusal {
                    AliasRefusal::SelfAlias => RegistrationError::SelfAlias { trigger: custom },
                    AliasRefusal::Cycle => RegistrationError::AliasCycle { custom, target },
                };
                tracing::error!(error = %err, "trigger alias refused");
                Err(err)
            }
        }
    }

    /// Flat final targets of an alias, empty if `trigger` is not one.
    #[must_use]
    pub fn resolve(&self, trigger: TriggerId) -> &[TriggerId] {
        self.aliases.resolve(trigger)
    }

    /// Aliases to enqueue right after `fired`.
    #[must_use]
    pub fn expand(&self, fired: TriggerId) -> &[TriggerId] {
        self.aliases.expand(fired)
    }

    #[must_use]
    pub fn has_aliases(&self) -> bool {
        !self.aliases.is_empty()
    }

    /// Let `trigger` run the host's pre-character-trigger status stage.
    pub fn allow_pre_trigger_stage(&mut self, trigger: TriggerId) -> Result<(), RegistrationError> {
        self.check_custom(trigger)?;
        self.pre_trigger_stage.insert(trigger);
        Ok(())
    }

    #[must_use]
    pub fn fires_pre_trigger_stage(&self, trigger: TriggerId) -> bool {
        self.pre_trigger_stage.contains(&trigger)
    }
}

//! Startup builder and the frozen extension.
//!
//! Everything is registered on an [`ExtensionBuilder`] while the host is
//! loading. [`ExtensionBuilder::build`] attaches the interceptors against the
//! host's method listings and freezes the registries into a
//! [`CombatExtension`], which the host then calls at every spliced site.
//!
//! ```
//! use combat_extend::core::{ExtensionConfig, StatusId};
//! use combat_extend::extension::ExtensionBuilder;
//! use combat_extend::host::{MemoryCombat, NewCharacter, StatusDisplay, StatusInfo};
//! use combat_extend::triggers::TriggerId;
//!
//! let config = ExtensionConfig::new().with_trigger("on_buffed", 100);
//! let mut host = MemoryCombat::new(1);
//! let extension = ExtensionBuilder::new(config).with_builtins().build(&host);
//! host.install_hooks(extension.clone());
//!
//! let armor = StatusId(1);
//! host.define_status(StatusInfo::new(armor, "armor", StatusDisplay::Positive));
//! let unit = host.add_character(NewCharacter::monster(0).hp(5));
//! host.add_status(unit, armor, 2, true);
//!
//! assert_eq!(host.fired_of(TriggerId::new(100)).len(), 1);
//! ```

use std::rc::Rc;

use crate::core::{CardId, EntityId, ExtensionConfig, RegistrationError, RoomIndex, StatusId};
use crate::host::{CombatServices, HookDispatch, HookFrame, MethodSource};
use crate::instrument::{HookId, Instrumentation, MethodBody, Step};
use crate::interceptors::{self, HitGuard, Interceptors};
use crate::status::{Capability, StatusBehaviors};
use crate::targeting::{
    self, SelectorKind, TargetModeId, TargetPipeline, TargetSelector, TargetSelectorRegistry, TargetingContext,
};
use crate::triggers::{self, QueueTriggerParams, TriggerEvent, TriggerId, TriggerRegistry};

/// Collects registrations during startup.
#[derive(Debug)]
pub struct ExtensionBuilder {
    config: ExtensionConfig,
    triggers: TriggerRegistry,
    selectors: TargetSelectorRegistry,
    statuses: StatusBehaviors,
}

impl ExtensionBuilder {
    pub fn new(config: ExtensionConfig) -> Self {
        Self {
            triggers: TriggerRegistry::new(&config),
            selectors: TargetSelectorRegistry::new(&config),
            statuses: StatusBehaviors::new(),
            config,
        }
    }

    /// Install every built-in trigger and target mode the config maps.
    #[must_use]
    pub fn with_builtins(mut self) -> Self {
        let triggers = triggers::builtin::install(&mut self.triggers, &self.config);
        let modes = targeting::builtin::install(&mut self.selectors, &self.config);
        tracing::debug!(triggers, modes, "built-ins installed");
        self
    }

    pub fn register_predicate<E, F>(&mut self, trigger: TriggerId, predicate: F) -> Result<(), RegistrationError>
    where
        E: TriggerEvent,
        F: Fn(&E, &dyn CombatServices) -> Option<QueueTriggerParams> + 'static,
    {
        self.triggers.register_predicate(trigger, predicate)
    }

    pub fn register_alias(&mut self, custom: TriggerId, target: TriggerId) -> Result<(), RegistrationError> {
        self.triggers.register_alias(custom, target)
    }

    pub fn allow_pre_trigger_stage(&mut self, trigger: TriggerId) -> Result<(), RegistrationError> {
        self.triggers.allow_pre_trigger_stage(trigger)
    }

    /// Declare which kind of selector `mode` takes before one is bound.
    pub fn declare_selector_kind(&mut self, mode: TargetModeId, kind: SelectorKind) -> Result<(), RegistrationError> {
        self.selectors.declare_kind(mode, kind)
    }

    pub fn bind_selector(&mut self, mode: TargetModeId, selector: TargetSelector) -> Result<(), RegistrationError> {
        self.selectors.bind_selector(mode, selector)
    }

    pub fn register_status_behavior(
        &mut self,
        status: StatusId,
        capability: Capability,
    ) -> Result<(), RegistrationError> {
        self.statuses.register(status, capability)
    }

    /// Attach the interceptors against `source` and freeze the registries.
    pub fn build(self, source: &dyn MethodSource) -> Rc<CombatExtension> {
        let mut instrumentation = Instrumentation::new();
        let placed = interceptors::attach_all(&mut instrumentation, source);
        tracing::debug!(placed, modes = self.selectors.len(), "combat extension built");
        Rc::new(CombatExtension {
            pipeline: TargetPipeline::new(self.selectors, &self.config),
            triggers: self.triggers,
            statuses: self.statuses,
            instrumentation,
            hit_guard: HitGuard::new(),
            config: self.config,
        })
    }
}

/// The running extension. Read-only apart from per-call bookkeeping.
#[derive(Debug)]
pub struct CombatExtension {
    config: ExtensionConfig,
    triggers: TriggerRegistry,
    pipeline: TargetPipeline,
    statuses: StatusBehaviors,
    instrumentation: Instrumentation,
    hit_guard: HitGuard,
}

impl CombatExtension {
    #[must_use]
    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    #[must_use]
    pub fn triggers(&self) -> &TriggerRegistry {
        &self.triggers
    }

    #[must_use]
    pub fn pipeline(&self) -> &TargetPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn statuses(&self) -> &StatusBehaviors {
        &self.statuses
    }

    #[must_use]
    pub fn instrumentation(&self) -> &Instrumentation {
        &self.instrumentation
    }

    /// Is the interceptor `feature` attached and live?
    #[must_use]
    pub fn is_feature_active(&self, feature: &str) -> bool {
        self.instrumentation.is_active(feature)
    }

    #[must_use]
    pub fn fires_pre_trigger_stage(&self, trigger: TriggerId) -> bool {
        self.triggers.fires_pre_trigger_stage(trigger)
    }

    /// Fire `trigger` for everyone in `room`: monsters first, then heroes.
    pub fn fire_for_room(
        &self,
        trigger: TriggerId,
        room: RoomIndex,
        params: &QueueTriggerParams,
        services: &mut dyn CombatServices,
    ) {
        interceptors::fire_for_room(trigger, room, params, services);
    }

    /// Committing resolution of an entity-targeting mode.
    pub fn resolve_targets(
        &self,
        ctx: &TargetingContext,
        services: &dyn CombatServices,
        out: &mut Vec<EntityId>,
    ) -> bool {
        self.pipeline.resolve(ctx, services, out)
    }

    /// Non-committing resolution, as shown while aiming.
    pub fn preview_targets(
        &self,
        ctx: &TargetingContext,
        services: &dyn CombatServices,
        out: &mut Vec<EntityId>,
    ) -> bool {
        self.pipeline.preview(ctx, services, out)
    }

    pub fn preview_candidates(
        &self,
        ctx: &TargetingContext,
        services: &dyn CombatServices,
        out: &mut Vec<EntityId>,
    ) -> bool {
        self.pipeline.preview_candidates(ctx, services, out)
    }

    pub fn resolve_cards(&self, ctx: &TargetingContext, services: &dyn CombatServices, out: &mut Vec<CardId>) -> bool {
        self.pipeline.resolve_cards(ctx, services, out)
    }

    #[must_use]
    pub fn last_targeted(&self) -> Vec<EntityId> {
        self.pipeline.last_targeted()
    }

    fn interceptors(&self) -> Interceptors<'_> {
        Interceptors {
            triggers: &self.triggers,
            statuses: &self.statuses,
            hit_guard: &self.hit_guard,
        }
    }
}

impl HookDispatch for CombatExtension {
    fn plan(&self, body: &MethodBody) -> Vec<Step> {
        self.instrumentation.plan(body)
    }

    fn dispatch(&self, hook: HookId, frame: &mut HookFrame, services: &mut dyn CombatServices) {
        self.interceptors().dispatch(hook, frame, services);
    }

    fn runs_pre_trigger_stage(&self, trigger: TriggerId) -> bool {
        self.triggers.fires_pre_trigger_stage(trigger)
    }
}

//! The filter stage every entity mode shares.

use crate::core::{EntityId, ExtensionConfig, StatusId};
use crate::host::{CharacterView, CombatServices};

use super::{HealthFilter, TargetingContext};

/// Health, status, subtype, boss, resource, dead, skip and untouchable rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SharedFilter {
    untouchable: Option<StatusId>,
}

impl SharedFilter {
    pub fn new(untouchable: Option<StatusId>) -> Self {
        Self { untouchable }
    }

    pub fn from_config(config: &ExtensionConfig) -> Self {
        Self::new(config.untouchable_status)
    }

    /// Drop from `targets` every character `ctx` does not admit.
    ///
    /// A limited-range request aimed more than one room below the resource
    /// room clears the list outright.
    pub fn apply(&self, ctx: &TargetingContext, services: &dyn CombatServices, targets: &mut Vec<EntityId>) {
        if ctx.limited_range && !Self::in_range(ctx, services) {
            targets.clear();
            return;
        }
        targets.retain(|&id| {
            services
                .character(id)
                .is_some_and(|view| self.admits(ctx, services, &view))
        });
    }

    fn in_range(ctx: &TargetingContext, services: &dyn CombatServices) -> bool {
        u16::from(ctx.room.0) + 1 >= u16::from(services.resource_room().0)
    }

    /// Does `ctx` admit `view`?
    #[must_use]
    pub fn admits(&self, ctx: &TargetingContext, services: &dyn CombatServices, view: &CharacterView) -> bool {
        if !ctx.teams.includes(view.team) {
            return false;
        }
        if (ctx.ignore_dead && !view.alive)
            || (ctx.ignore_resource && view.resource)
            || (ctx.ignore_bosses && view.boss)
            || ctx.skip.contains(&view.id)
        {
            return false;
        }
        let health_ok = match ctx.health {
            HealthFilter::Any => true,
            HealthFilter::Damaged => view.is_damaged(),
            HealthFilter::Undamaged => !view.is_damaged(),
        };
        if !health_ok {
            return false;
        }
        if !ctx.status_filter.is_empty()
            && !ctx
                .status_filter
                .iter()
                .any(|&status| services.status_count(view.id, status) > 0)
        {
            return false;
        }
        if ctx.subtype.is_some_and(|s| !view.has_subtype(s)) {
            return false;
        }
        if ctx.excluded_subtypes.iter().any(|&s| view.has_subtype(s)) {
            return false;
        }
        // Untouchable only protects during combat.
        match self.untouchable {
            Some(status) if ctx.in_combat && !ctx.include_untouchable => {
                services.status_count(view.id, status) <= 0
            }
            _ => true,
        }
    }
}

//! Selector traits.
//!
//! A target mode is bound to exactly one selector, either an
//! [`EntitySelector`] (characters) or a [`CardSelector`] (cards). Every
//! method has a default so a selector only overrides the stage it cares
//! about.

use crate::core::{CardId, EntityId, TeamFilter};
use crate::host::CombatServices;

use super::filter::SharedFilter;
use super::{SelectorKind, TargetModeFlags, TargetingContext};

/// Selects characters.
///
/// Resolution calls, in order: [`pre_collect`](Self::pre_collect), then
/// [`collect_targets`](Self::collect_targets), then (only if neither
/// handled the request) [`filter_targets`](Self::filter_targets) on the
/// shared-filtered room population.
pub trait EntitySelector {
    fn flags(&self) -> TargetModeFlags {
        TargetModeFlags::new()
    }

    /// Runs before anything else. Return `true` if `out` is final.
    fn pre_collect(
        &self,
        _ctx: &TargetingContext,
        _services: &dyn CombatServices,
        _out: &mut Vec<EntityId>,
    ) -> bool {
        false
    }

    /// Pick targets without the room population. Return `true` if `out` is final.
    ///
    /// Selectors that gather their own candidates should run them through
    /// `filter` so the usual health, status and subtype rules still apply.
    fn collect_targets(
        &self,
        _ctx: &TargetingContext,
        _services: &dyn CombatServices,
        _filter: &SharedFilter,
        _out: &mut Vec<EntityId>,
    ) -> bool {
        false
    }

    /// Choose from `valid`, the room population after shared filtering.
    ///
    /// `valid` is a pooled list; do not keep it.
    fn filter_targets(
        &self,
        _ctx: &TargetingContext,
        _services: &dyn CombatServices,
        _valid: &[EntityId],
        _chosen: &mut Vec<EntityId>,
    ) {
    }

    /// Everyone the UI should highlight while this mode is being aimed.
    ///
    /// The default lists only `ctx.room` and ignores
    /// [`TargetModeFlags::targets_multiple_rooms`]; a mode that reaches other
    /// rooms must override this to highlight them.
    fn collect_preview_targets(
        &self,
        ctx: &TargetingContext,
        services: &dyn CombatServices,
        out: &mut Vec<EntityId>,
    ) {
        services.characters_in_room(ctx.room, TeamFilter::Both, out);
    }
}

/// Selects cards.
pub trait CardSelector {
    fn flags(&self) -> TargetModeFlags {
        TargetModeFlags::new()
    }

    /// Runs before anything else. Return `true` if `out` is final.
    fn pre_collect(
        &self,
        _ctx: &TargetingContext,
        _services: &dyn CombatServices,
        _out: &mut Vec<CardId>,
    ) -> bool {
        false
    }

    fn collect_target_cards(
        &self,
        ctx: &TargetingContext,
        services: &dyn CombatServices,
        out: &mut Vec<CardId>,
    );
}

/// A selector bound to a target mode.
pub enum TargetSelector {
    Entity(Box<dyn EntitySelector>),
    Card(Box<dyn CardSelector>),
}

impl TargetSelector {
    pub fn entity(selector: impl EntitySelector + 'static) -> Self {
        TargetSelector::Entity(Box::new(selector))
    }

    pub fn card(selector: impl CardSelector + 'static) -> Self {
        TargetSelector::Card(Box::new(selector))
    }

    #[must_use]
    pub fn kind(&self) -> SelectorKind {
        match self {
            TargetSelector::Entity(_) => SelectorKind::Entity,
            TargetSelector::Card(_) => SelectorKind::Card,
        }
    }

    #[must_use]
    pub fn flags(&self) -> TargetModeFlags {
        match self {
            TargetSelector::Entity(s) => s.flags(),
            TargetSelector::Card(s) => s.flags(),
        }
    }
}

impl std::fmt::Debug for TargetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetSelector")
            .field("kind", &self.kind())
            .field("flags", &self.flags())
            .finish()
    }
}

//! Target resolution.
//!
//! Preview and commit go through one routine, [`TargetPipeline::run`]. The
//! only thing the preview flag changes is whether the last-targeted memo is
//! written, so a preview shows exactly what the committing pass will hit.

use std::cell::RefCell;

use rustc_hash::FxHashSet;

use crate::core::{contain, CardId, EntityId, ExtensionConfig, ListPool, Pooled, RoomIndex, TeamFilter};
use crate::host::CombatServices;

use super::filter::SharedFilter;
use super::{TargetModeFlags, TargetSelector, TargetSelectorRegistry, TargetingContext};

/// Resolves targeting requests for custom modes.
#[derive(Debug)]
pub struct TargetPipeline {
    registry: TargetSelectorRegistry,
    filter: SharedFilter,
    pool: ListPool<EntityId>,
    last_targeted: RefCell<Vec<EntityId>>,
}

impl TargetPipeline {
    pub fn new(registry: TargetSelectorRegistry, config: &ExtensionConfig) -> Self {
        Self {
            registry,
            filter: SharedFilter::from_config(config),
            pool: ListPool::new(),
            last_targeted: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &TargetSelectorRegistry {
        &self.registry
    }

    #[must_use]
    pub fn filter(&self) -> &SharedFilter {
        &self.filter
    }

    /// Borrow a scratch list from the pipeline's pool.
    pub fn scratch(&self) -> Pooled<'_, EntityId> {
        self.pool.take()
    }

    /// Committing resolution.
    ///
    /// Returns `false` when `ctx.mode` has no entity selector; the host's own
    /// targeting applies and `out` is left empty.
    pub fn resolve(&self, ctx: &TargetingContext, services: &dyn CombatServices, out: &mut Vec<EntityId>) -> bool {
        self.run(ctx, services, out)
    }

    /// Non-committing resolution. Same result as [`resolve`](Self::resolve).
    pub fn preview(&self, ctx: &TargetingContext, services: &dyn CombatServices, out: &mut Vec<EntityId>) -> bool {
        if ctx.preview {
            return self.run(ctx, services, out);
        }
        let ctx = ctx.clone().as_preview();
        self.run(&ctx, services, out)
    }

    /// Characters to highlight while the mode is being aimed.
    pub fn preview_candidates(
        &self,
        ctx: &TargetingContext,
        services: &dyn CombatServices,
        out: &mut Vec<EntityId>,
    ) -> bool {
        out.clear();
        let Some(TargetSelector::Entity(selector)) = self.registry.get(ctx.mode) else {
            return false;
        };
        if contain("collect_preview_targets", || selector.collect_preview_targets(ctx, services, out)).is_none() {
            out.clear();
        }
        true
    }

    /// Resolve a card-targeting mode.
    pub fn resolve_cards(&self, ctx: &TargetingContext, services: &dyn CombatServices, out: &mut Vec<CardId>) -> bool {
        out.clear();
        let Some(TargetSelector::Card(selector)) = self.registry.get(ctx.mode) else {
            return false;
        };
        let done = contain("pre_collect", || selector.pre_collect(ctx, services, out));
        match done {
            Some(true) => {}
            Some(false) => {
                out.clear();
                if contain("collect_target_cards", || selector.collect_target_cards(ctx, services, out)).is_none() {
                    out.clear();
                }
            }
            None => out.clear(),
        }
        true
    }

    /// Targets the last committed first effect of a played card hit.
    #[must_use]
    pub fn last_targeted(&self) -> Vec<EntityId> {
        self.last_targeted.borrow().clone()
    }

    fn run(&self, ctx: &TargetingContext, services: &dyn CombatServices, out: &mut Vec<EntityId>) -> bool {
        out.clear();
        let Some(TargetSelector::Entity(selector)) = self.registry.get(ctx.mode) else {
            return false;
        };
        let flags = selector.flags();

        let handled = match contain("pre_collect", || selector.pre_collect(ctx, services, out)) {
            Some(true) => true,
            Some(false) => {
                out.clear();
                match contain("collect_targets", || {
                    selector.collect_targets(ctx, services, &self.filter, out)
                }) {
                    Some(handled) => handled,
                    None => {
                        // A faulted selector resolves to nothing.
                        out.clear();
                        true
                    }
                }
            }
            None => {
                out.clear();
                true
            }
        };

        if !handled {
            out.clear();
            let mut population = self.pool.take();
            room_population(services, ctx.room, ctx.teams, &mut population);
            self.filter.apply(ctx, services, &mut population);
            if contain("filter_targets", || selector.filter_targets(ctx, services, &population, out)).is_none() {
                out.clear();
            }
        }

        self.finish(ctx, services, flags, out);
        true
    }

    fn finish(&self, ctx: &TargetingContext, services: &dyn CombatServices, flags: TargetModeFlags, out: &mut Vec<EntityId>) {
        if ctx.damage_effect {
            Self::drop_bosses_across_rooms(services, out);
        }
        if flags.resolves_to_single_target && out.len() > 1 {
            tracing::warn!(
                mode = %ctx.mode,
                count = out.len(),
                "single-target mode produced several targets, keeping the first"
            );
            out.truncate(1);
        }
        if ctx.first_effect_in_played_card && !ctx.preview {
            let mut memo = self.last_targeted.borrow_mut();
            memo.clear();
            memo.extend_from_slice(out);
        }
    }

    /// Bosses only take damage from effects aimed at their own room.
    fn drop_bosses_across_rooms(services: &dyn CombatServices, out: &mut Vec<EntityId>) {
        let rooms: FxHashSet<_> = out
            .iter()
            .filter_map(|&id| services.character(id))
            .map(|c| c.room)
            .collect();
        if rooms.len() > 1 {
            out.retain(|&id| services.character(id).is_some_and(|c| !c.boss));
        }
    }
}

/// Everyone in `room` admitted by `teams`, heroes before monsters.
pub(crate) fn room_population(services: &dyn CombatServices, room: RoomIndex, teams: TeamFilter, out: &mut Vec<EntityId>) {
    for &team in teams.targeting_order() {
        services.characters_in_room(room, team.into(), out);
    }
}

/// Every character in every room admitted by `teams`, top room first.
pub(crate) fn whole_floor(services: &dyn CombatServices, teams: TeamFilter, out: &mut Vec<EntityId>) {
    for index in (0..services.room_count()).rev() {
        if let Ok(room) = u8::try_from(index) {
            room_population(services, RoomIndex(room), teams, out);
        }
    }
}

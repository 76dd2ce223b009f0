//! Event interceptors.
//!
//! One interceptor per host lifecycle point. Each runs after the host's own
//! handling of the event, captures an event context, asks the trigger
//! registry which custom triggers fire for each participant, queues them
//! through the host and drains the queue before handing control back.
//!
//! The queue interceptor is the exception: it sits inside the host's
//! queuing method and appends alias firings directly behind the original.
//!
//! ## Key Components
//!
//! - [`hook_points`] / [`attach_all`]: Where each interceptor is spliced
//! - [`Interceptors`]: Routes a hook call-out to its handler
//! - [`fire_for`]: Evaluate one category for a list of participants
//! - [`HitGuard`]: Fire-once token for the hit interceptor

mod points;

pub use points::{attach_all, features, hook_points, hooks};

use std::cell::RefCell;

use rustc_hash::FxHashSet;

use crate::core::{EntityId, RoomIndex, StatusId, Team, TeamFilter};
use crate::host::{CallId, CombatServices, DamageInfo, DiscardInfo, HookFrame, StatusDisplay};
use crate::instrument::HookId;
use crate::status::StatusBehaviors;
use crate::triggers::{
    CardDiscardedEvent, CardPlayedEvent, CharacterHitEvent, CharacterSpawnedEvent, QueueTriggerParams,
    ResourceDamageEvent, StatusAddedEvent, StatusRemovedEvent, TriggerEvent, TriggerId, TriggerRegistry,
};

/// Outer host calls the hit interceptor already fired for.
///
/// The host may loop back over the spliced site within one `ApplyDamage`,
/// and a drained trigger may start a nested `ApplyDamage` before the outer
/// one ends. Each in-flight call fires once; its entry is released by the
/// postfix splice when that call returns.
#[derive(Debug, Default)]
pub struct HitGuard {
    fired: RefCell<FxHashSet<CallId>>,
}

impl HitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `call`. False if it already fired and has not been released.
    pub fn claim(&self, call: CallId) -> bool {
        self.fired.borrow_mut().insert(call)
    }

    /// Forget `call` once its host call has returned.
    pub fn release(&self, call: CallId) {
        self.fired.borrow_mut().remove(&call);
    }

    /// Calls currently holding a claim.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.fired.borrow().len()
    }
}

/// Evaluate `E`'s predicates for each participant and queue what fires.
///
/// Returns how many triggers were queued. Does not drain.
pub fn fire_for<E: TriggerEvent>(
    registry: &TriggerRegistry,
    event: &E,
    participants: &[EntityId],
    services: &mut dyn CombatServices,
) -> usize {
    if registry.predicates::<E>().is_empty() {
        return 0;
    }
    let mut queued = 0;
    for &participant in participants {
        let scoped = event.for_participant(participant);
        for (trigger, params) in registry.evaluate(&scoped, &*services) {
            tracing::debug!(%trigger, character = %participant, category = %E::CATEGORY, "custom trigger fired");
            services.queue_trigger(participant, trigger, params);
            queued += 1;
        }
    }
    queued
}

/// Queue `trigger` for every monster in `room`, drain, then every hero, drain.
pub fn fire_for_room(
    trigger: TriggerId,
    room: RoomIndex,
    params: &QueueTriggerParams,
    services: &mut dyn CombatServices,
) {
    let mut members = Vec::new();
    for team in [Team::Monsters, Team::Heroes] {
        members.clear();
        services.characters_in_room(room, team.into(), &mut members);
        for &character in &members {
            services.queue_trigger(character, trigger, params.clone());
        }
        services.run_trigger_queue();
    }
}

/// Hook handlers over a frozen set of registries.
#[derive(Clone, Copy, Debug)]
pub struct Interceptors<'a> {
    pub triggers: &'a TriggerRegistry,
    pub statuses: &'a StatusBehaviors,
    pub hit_guard: &'a HitGuard,
}

impl Interceptors<'_> {
    /// Route one call-out.
    pub fn dispatch(&self, hook: HookId, frame: &mut HookFrame, services: &mut dyn CombatServices) {
        match (hook, frame) {
            (
                hooks::STACK_MODIFIER,
                HookFrame::StatusAdded {
                    target,
                    status,
                    stacks,
                    allow_modification,
                },
            ) => {
                *stacks = self
                    .statuses
                    .modify_incoming(*target, *status, *stacks, *allow_modification, &*services);
            }
            (hooks::STATUS_ADDED, HookFrame::StatusAdded { target, status, stacks, .. }) => {
                self.status_added(*target, *status, *stacks, services);
            }
            (hooks::STATUS_REMOVED, HookFrame::StatusRemoved { target, status, removed, .. }) => {
                self.status_removed(*target, *status, *removed, services);
            }
            (hooks::CARD_PLAYED, HookFrame::CardPlayed { card, room, activated_by }) => {
                let Some(card) = services.card(*card) else {
                    tracing::warn!(card = %card, "played card unknown to host");
                    return;
                };
                let event = CardPlayedEvent {
                    character: EntityId(0),
                    card,
                    room: *room,
                    activated_by: *activated_by,
                };
                let mut present = Vec::new();
                services.characters_in_room(*room, TeamFilter::Both, &mut present);
                present.retain(|&id| services.is_alive(id));
                fire_for(self.triggers, &event, &present, services);
                services.run_trigger_queue();
            }
            (hooks::CARD_DISCARDED, HookFrame::CardDiscarded { discard }) => {
                self.card_discarded(*discard, services);
            }
            (hooks::CHARACTER_SPAWNED, HookFrame::OtherCharacterSpawned { observer, spawned }) => {
                self.character_spawned(*observer, *spawned, services);
            }
            (hooks::CHARACTER_HIT, HookFrame::Damage { call, target, damage, info }) => {
                if !self.hit_guard.claim(*call) {
                    tracing::debug!(call = call.0, "hit already handled for this call");
                    return;
                }
                self.character_hit(*target, *damage, *info, services);
            }
            (hooks::HIT_RELEASE, HookFrame::Damage { call, .. }) => {
                self.hit_guard.release(*call);
            }
            (hooks::RESOURCE_DAMAGE, HookFrame::ResourceDamage { resource, damage, info }) => {
                let event = ResourceDamageEvent {
                    character: *resource,
                    resource: *resource,
                    damage: *damage,
                    info: *info,
                };
                let mut everyone = Vec::new();
                services.team_characters(Team::Monsters, &mut everyone);
                services.team_characters(Team::Heroes, &mut everyone);
                fire_for(self.triggers, &event, &everyone, services);
                services.run_trigger_queue();
            }
            (hooks::TRIGGER_ALIASES, HookFrame::QueueTrigger { character, trigger, params }) => {
                for &alias in self.triggers.expand(*trigger) {
                    tracing::debug!(%alias, fired = %trigger, character = %character, "queueing alias");
                    services.push_trigger(*character, alias, params.clone());
                }
            }
            (hook, frame) => {
                tracing::warn!(%hook, frame = frame.kind(), "hook called with an unexpected frame");
            }
        }
    }

    fn status_added(
        &self,
        target: EntityId,
        status: StatusId,
        applied: i64,
        services: &mut dyn CombatServices,
    ) {
        if applied <= 0 {
            return;
        }
        let Some(room) = services.character(target).map(|c| c.room) else {
            return;
        };
        let event = StatusAddedEvent {
            character: target,
            status,
            display: display_of(status, &*services),
            stacks_added: applied,
            stack_total: services.status_count(target, status),
            room,
        };
        if fire_for(self.triggers, &event, &[target], services) > 0 {
            services.run_trigger_queue();
        }
    }

    fn status_removed(
        &self,
        target: EntityId,
        status: StatusId,
        removed: i64,
        services: &mut dyn CombatServices,
    ) {
        if removed <= 0 {
            return;
        }
        let Some(room) = services.character(target).map(|c| c.room) else {
            return;
        };
        let event = StatusRemovedEvent {
            character: target,
            status,
            display: display_of(status, &*services),
            stacks_removed: removed,
            stack_total: services.status_count(target, status),
            room,
        };
        if fire_for(self.triggers, &event, &[target], services) > 0 {
            services.run_trigger_queue();
        }
    }

    fn card_discarded(&self, discard: DiscardInfo, services: &mut dyn CombatServices) {
        if discard.end_of_turn || self.triggers.predicates::<CardDiscardedEvent>().is_empty() {
            return;
        }
        // Cards the host refuses to track cannot be discarded.
        let Some(card) = services.card(discard.card) else {
            return;
        };
        let room = services.selected_room();
        let event = CardDiscardedEvent {
            character: EntityId(0),
            card,
            discard,
            room,
        };
        let mut members = Vec::new();
        for team in [Team::Monsters, Team::Heroes] {
            members.clear();
            services.characters_in_room(room, team.into(), &mut members);
            fire_for(self.triggers, &event, &members, services);
            services.run_trigger_queue();
        }
    }

    fn character_spawned(&self, observer: EntityId, spawned: EntityId, services: &mut dyn CombatServices) {
        let (Some(me), Some(new)) = (services.character(observer), services.character(spawned)) else {
            return;
        };
        if !new.alive || new.room != me.room {
            return;
        }
        let mut allies = Vec::new();
        services.characters_in_room(me.room, me.team.into(), &mut allies);
        let allies_in_room = allies.iter().filter(|&&id| services.is_alive(id)).count();
        let event = CharacterSpawnedEvent {
            character: observer,
            spawned,
            room: me.room,
            allies_in_room,
        };
        if fire_for(self.triggers, &event, &[observer], services) > 0 {
            services.run_trigger_queue();
        }
    }

    fn character_hit(&self, damaged: EntityId, damage: i64, info: DamageInfo, services: &mut dyn CombatServices) {
        let Some(room) = services.character(damaged).map(|c| c.room) else {
            return;
        };
        let event = CharacterHitEvent {
            character: damaged,
            damaged,
            original_damage: damage,
            damage: info,
            room,
        };
        let mut present = Vec::new();
        services.characters_in_room(room, TeamFilter::Both, &mut present);
        if fire_for(self.triggers, &event, &present, services) > 0 {
            services.run_trigger_queue();
        }
    }
}

fn display_of(status: StatusId, services: &dyn CombatServices) -> StatusDisplay {
    services.status_info(status).map_or_else(
        || {
            tracing::debug!(%status, "status missing from host catalog, treating as hidden");
            StatusDisplay::Hidden
        },
        |info| info.display,
    )
}

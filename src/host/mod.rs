//! The host combat engine, as seen from this crate.
//!
//! Three seams connect the extension to the host:
//!
//! - [`CombatServices`]: everything the extension may ask of or tell the host
//!   (queries, trigger queuing, queue draining).
//! - [`HookDispatch`]: what the host calls at spliced sites.
//! - [`MethodSource`]: where the instrumentation adapter reads the host's
//!   method listings from.
//!
//! [`MemoryCombat`] is an in-memory host implementing all three host-side
//! roles. It executes its lifecycle methods from the instruction fixtures in
//! [`fixtures`], so the extension is exercised exactly as it would be against
//! a patched host.

pub mod fixtures;
mod frame;
mod memory;
mod view;

pub use frame::{CallId, HookFrame};
pub use memory::{FiredTrigger, MemoryCombat, NewCharacter};
pub use view::{
    CardPile, CardType, CardView, CharacterView, DamageInfo, DamageType, DiscardInfo, StatusDisplay,
    StatusInfo, StatusStack,
};

use crate::core::{CardId, EntityId, RoomIndex, StatusId, Team, TeamFilter};
use crate::instrument::{HookId, MethodBody, Step};
use crate::triggers::{QueueTriggerParams, TriggerId};

/// Host trigger queued for a character whenever it takes damage.
pub const HOST_TRIGGER_ON_HIT: TriggerId = TriggerId::new(3);

/// Host trigger queued for a character when an ally spawns next to it.
pub const HOST_TRIGGER_ON_ALLY_SPAWNED: TriggerId = TriggerId::new(12);

/// Host trigger queued for a character that loses its abilities.
///
/// The only trigger the host itself runs the pre-character-trigger status
/// stage for.
pub const HOST_TRIGGER_ON_SILENCED: TriggerId = TriggerId::new(20);

/// Services the host exposes to the extension.
///
/// Query methods take `&self` and may be called from predicates and
/// selectors. The queue methods mutate host state and are only called by
/// interceptors.
pub trait CombatServices {
    fn room_count(&self) -> usize;

    /// Room the player currently has selected.
    fn selected_room(&self) -> RoomIndex;

    /// Room holding the resource entity.
    fn resource_room(&self) -> RoomIndex;

    fn resource_entity(&self) -> Option<EntityId>;

    /// Characters in `room` admitted by `teams`, front to back, monsters first.
    fn characters_in_room(&self, room: RoomIndex, teams: TeamFilter, out: &mut Vec<EntityId>);

    /// Every character on `team`, bottom room first.
    fn team_characters(&self, team: Team, out: &mut Vec<EntityId>);

    fn character(&self, id: EntityId) -> Option<CharacterView>;

    /// Status stacks held by a character, in the order they were gained.
    fn statuses(&self, id: EntityId) -> &[StatusStack];

    fn status_info(&self, status: StatusId) -> Option<&StatusInfo>;

    fn card(&self, id: CardId) -> Option<CardView>;

    fn cards_in_pile(&self, pile: CardPile, out: &mut Vec<CardId>);

    fn hand_size(&self) -> usize;

    fn max_hand_size(&self) -> usize;

    /// Queue a trigger through the host's own queuing method.
    ///
    /// Goes through every splice on that method, so aliases expand.
    fn queue_trigger(&mut self, character: EntityId, trigger: TriggerId, params: QueueTriggerParams);

    /// Append directly to the host trigger queue, bypassing splices.
    fn push_trigger(&mut self, character: EntityId, trigger: TriggerId, params: QueueTriggerParams);

    /// Fire everything queued, in order.
    fn run_trigger_queue(&mut self);

    /// Is the character present and not dead?
    fn is_alive(&self, id: EntityId) -> bool {
        self.character(id).is_some_and(|c| c.alive)
    }

    /// Stacks of `status` held by `id`.
    fn status_count(&self, id: EntityId, status: StatusId) -> i64 {
        self.statuses(id)
            .iter()
            .find(|s| s.status == status)
            .map_or(0, |s| s.count)
    }

    /// Number of distinct statuses of a display category held by `id`.
    fn distinct_statuses(&self, id: EntityId, display: StatusDisplay) -> usize {
        self.statuses(id)
            .iter()
            .filter(|s| s.count > 0)
            .filter(|s| self.status_info(s.status).is_some_and(|i| i.display == display))
            .count()
    }
}

/// Call-outs the host makes at spliced sites.
pub trait HookDispatch {
    /// Execution plan for one host method.
    fn plan(&self, body: &MethodBody) -> Vec<Step>;

    /// Run the call-out `hook` with the current method's frame.
    fn dispatch(&self, hook: HookId, frame: &mut HookFrame, services: &mut dyn CombatServices);

    /// Should firing `trigger` run the pre-character-trigger status stage?
    ///
    /// Asked only when the host's own rule says no.
    fn runs_pre_trigger_stage(&self, _trigger: TriggerId) -> bool {
        false
    }
}

/// Source of host method listings.
pub trait MethodSource {
    fn method(&self, name: &str) -> Option<&MethodBody>;
}

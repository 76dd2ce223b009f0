//! Hook frames: the parameters a spliced call-out can see.
//!
//! A frame carries the native arguments of the host method being executed.
//! Hooks receive it mutably; the stack-modifier hook rewrites `stacks` before
//! the host applies them, every other hook only reads.

use crate::core::{CardId, EntityId, RoomIndex, StatusId};
use crate::triggers::{QueueTriggerParams, TriggerId};

use super::view::{DamageInfo, DiscardInfo};

/// Sequence number of an outermost host call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HookFrame {
    /// `CharacterState::AddStatusEffect`.
    StatusAdded {
        target: EntityId,
        status: StatusId,
        /// Pending stack count. Rewritten by stack modifiers.
        stacks: i64,
        /// Host flag: may held effects modify the incoming count?
        allow_modification: bool,
    },
    /// `CharacterState::RemoveStatusEffect`.
    StatusRemoved {
        target: EntityId,
        status: StatusId,
        stacks: i64,
        /// Stacks actually removed; set by the host.
        removed: i64,
    },
    /// `CardManager::FireUnitTriggersForCardPlayed`.
    CardPlayed {
        card: CardId,
        room: RoomIndex,
        activated_by: Option<EntityId>,
    },
    /// `CardManager::DiscardCard`.
    CardDiscarded { discard: DiscardInfo },
    /// `CharacterState::OnOtherCharacterSpawned`, once per observer.
    OtherCharacterSpawned { observer: EntityId, spawned: EntityId },
    /// `CharacterState::ApplyDamage`.
    Damage {
        call: CallId,
        target: EntityId,
        damage: i64,
        info: DamageInfo,
    },
    /// `RelicManager::ApplyTowerDamageTakenRelicEffects`.
    ResourceDamage {
        resource: EntityId,
        damage: i64,
        info: DamageInfo,
    },
    /// `CombatManager::QueueTrigger`.
    QueueTrigger {
        character: EntityId,
        trigger: TriggerId,
        params: QueueTriggerParams,
    },
}

impl HookFrame {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            HookFrame::StatusAdded { .. } => "status-added",
            HookFrame::StatusRemoved { .. } => "status-removed",
            HookFrame::CardPlayed { .. } => "card-played",
            HookFrame::CardDiscarded { .. } => "card-discarded",
            HookFrame::OtherCharacterSpawned { .. } => "other-character-spawned",
            HookFrame::Damage { .. } => "damage",
            HookFrame::ResourceDamage { .. } => "resource-damage",
            HookFrame::QueueTrigger { .. } => "queue-trigger",
        }
    }
}

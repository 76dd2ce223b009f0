//! Event contexts handed to trigger predicates.
//!
//! Each category captures what the host knew at the moment its default
//! handling finished. A context is built once per interceptor pass and then
//! re-stamped with each participating character in turn; predicates never
//! see a context that changes under them.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, RoomIndex, StatusId};
use crate::host::{CardView, CombatServices, DamageInfo, DiscardInfo, StatusDisplay};

use super::params::QueueTriggerParams;
use super::TriggerId;

/// Host lifecycle point a predicate is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerCategory {
    StatusAdded,
    StatusRemoved,
    CardPlayed,
    CardDiscarded,
    CharacterSpawned,
    CharacterHit,
    ResourceDamage,
}

impl TriggerCategory {
    pub const ALL: [TriggerCategory; 7] = [
        TriggerCategory::StatusAdded,
        TriggerCategory::StatusRemoved,
        TriggerCategory::CardPlayed,
        TriggerCategory::CardDiscarded,
        TriggerCategory::CharacterSpawned,
        TriggerCategory::CharacterHit,
        TriggerCategory::ResourceDamage,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TriggerCategory::StatusAdded => "status-added",
            TriggerCategory::StatusRemoved => "status-removed",
            TriggerCategory::CardPlayed => "card-played",
            TriggerCategory::CardDiscarded => "card-discarded",
            TriggerCategory::CharacterSpawned => "character-spawned",
            TriggerCategory::CharacterHit => "character-hit",
            TriggerCategory::ResourceDamage => "resource-damage",
        }
    }
}

impl std::fmt::Display for TriggerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A status effect was added to `character`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusAddedEvent {
    pub character: EntityId,
    pub status: StatusId,
    pub display: StatusDisplay,
    /// Stacks added by this application (after stack modifiers).
    pub stacks_added: i64,
    /// Stacks held after the application.
    pub stack_total: i64,
    pub room: RoomIndex,
}

/// A status effect was removed (fully or partly) from `character`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusRemovedEvent {
    pub character: EntityId,
    pub status: StatusId,
    pub display: StatusDisplay,
    pub stacks_removed: i64,
    /// Stacks left after the removal.
    pub stack_total: i64,
    pub room: RoomIndex,
}

/// A card was played into the room `character` stands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardPlayedEvent {
    pub character: EntityId,
    pub card: CardView,
    pub room: RoomIndex,
    /// Unit whose ability this card is, if any.
    pub activated_by: Option<EntityId>,
}

/// A card was discarded while `character` stood in the selected room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardDiscardedEvent {
    pub character: EntityId,
    pub card: CardView,
    pub discard: DiscardInfo,
    pub room: RoomIndex,
}

/// Another character spawned in the room `character` observes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterSpawnedEvent {
    pub character: EntityId,
    pub spawned: EntityId,
    pub room: RoomIndex,
    /// Characters on the observer's team in the room, spawned one included.
    pub allies_in_room: usize,
}

/// A character in `character`'s room took damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterHitEvent {
    pub character: EntityId,
    pub damaged: EntityId,
    /// Damage before shields and other reductions.
    pub original_damage: i64,
    pub damage: DamageInfo,
    pub room: RoomIndex,
}

/// The resource entity took damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceDamageEvent {
    pub character: EntityId,
    pub resource: EntityId,
    pub damage: i64,
    pub info: DamageInfo,
}

/// A predicate decides whether its trigger fires for one participant.
pub type Predicate<E> = Box<dyn Fn(&E, &dyn CombatServices) -> Option<QueueTriggerParams>>;

/// Predicates for one category, in registration order.
pub struct PredicateTable<E> {
    entries: Vec<(TriggerId, Predicate<E>)>,
}

impl<E> Default for PredicateTable<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> PredicateTable<E> {
    #[must_use]
    pub fn contains(&self, trigger: TriggerId) -> bool {
        self.entries.iter().any(|(id, _)| *id == trigger)
    }

    pub(crate) fn push(&mut self, trigger: TriggerId, predicate: Predicate<E>) {
        self.entries.push((trigger, predicate));
    }

    pub fn iter(&self) -> impl Iterator<Item = (TriggerId, &Predicate<E>)> {
        self.entries.iter().map(|(id, p)| (*id, p))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> std::fmt::Debug for PredicateTable<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(id, _)| id))
            .finish()
    }
}

/// One table per category.
#[derive(Debug, Default)]
pub struct PredicateTables {
    status_added: PredicateTable<StatusAddedEvent>,
    status_removed: PredicateTable<StatusRemovedEvent>,
    card_played: PredicateTable<CardPlayedEvent>,
    card_discarded: PredicateTable<CardDiscardedEvent>,
    character_spawned: PredicateTable<CharacterSpawnedEvent>,
    character_hit: PredicateTable<CharacterHitEvent>,
    resource_damage: PredicateTable<ResourceDamageEvent>,
}

/// An event context type. Ties the context to its category and table.
pub trait TriggerEvent: Clone + 'static {
    const CATEGORY: TriggerCategory;

    /// Character whose triggers are being considered.
    fn participant(&self) -> EntityId;

    /// The same context, considered for another participant.
    #[must_use]
    fn for_participant(&self, character: EntityId) -> Self;

    #[doc(hidden)]
    fn table(tables: &PredicateTables) -> &PredicateTable<Self>;

    #[doc(hidden)]
    fn table_mut(tables: &mut PredicateTables) -> &mut PredicateTable<Self>;
}

macro_rules! trigger_event {
    ($event:ty, $category:ident, $field:ident) => {
        impl TriggerEvent for $event {
            const CATEGORY: TriggerCategory = TriggerCategory::$category;

            fn participant(&self) -> EntityId {
                self.character
            }

            fn for_participant(&self, character: EntityId) -> Self {
                Self {
                    character,
                    ..*self
                }
            }

            fn table(tables: &PredicateTables) -> &PredicateTable<Self> {
                &tables.$field
            }

            fn table_mut(tables: &mut PredicateTables) -> &mut PredicateTable<Self> {
                &mut tables.$field
            }
        }
    };
}

trigger_event!(StatusAddedEvent, StatusAdded, status_added);
trigger_event!(StatusRemovedEvent, StatusRemoved, status_removed);
trigger_event!(CardPlayedEvent, CardPlayed, card_played);
trigger_event!(CardDiscardedEvent, CardDiscarded, card_discarded);
trigger_event!(CharacterSpawnedEvent, CharacterSpawned, character_spawned);
trigger_event!(CharacterHitEvent, CharacterHit, character_hit);
trigger_event!(ResourceDamageEvent, ResourceDamage, resource_damage);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{CardType, DamageType};

    #[test]
    fn test_category_names() {
        assert_eq!(TriggerCategory::CharacterHit.to_string(), "character-hit");
        assert_eq!(TriggerCategory::ALL.len(), 7);
        assert_eq!(StatusAddedEvent::CATEGORY, TriggerCategory::StatusAdded);
        assert_eq!(ResourceDamageEvent::CATEGORY, TriggerCategory::ResourceDamage);
    }

    #[test]
    fn test_for_participant_keeps_payload() {
        let base = CharacterHitEvent {
            character: EntityId(1),
            damaged: EntityId(2),
            original_damage: 6,
            damage: DamageInfo::new(DamageType::DirectAttack).from_attacker(EntityId(3)),
            room: RoomIndex(1),
        };
        let other = base.for_participant(EntityId(4));
        assert_eq!(other.participant(), EntityId(4));
        assert_eq!(other.damaged, EntityId(2));
        assert_eq!(other.original_damage, 6);
        assert_eq!(base.participant(), EntityId(1));
    }

    #[test]
    fn test_card_event_copy() {
        let played = CardPlayedEvent {
            character: EntityId(1),
            card: CardView::new(crate::core::CardId(5), CardType::Spell),
            room: RoomIndex(0),
            activated_by: None,
        };
        assert_eq!(played.for_participant(EntityId(8)).card.id, crate::core::CardId(5));
    }
}

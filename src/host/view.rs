//! Read-only views of host state.
//!
//! These are value snapshots. Nothing here holds a reference back into the
//! host, so they can be copied into event contexts freely.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CardId, EntityId, RoomIndex, StatusId, SubtypeId, Team};

/// How the host files a status effect in its UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusDisplay {
    Positive,
    Negative,
    Persistent,
    Hidden,
}

/// Static data about a status effect kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub id: StatusId,
    pub name: String,
    pub display: StatusDisplay,
    /// Whether stack-propagation reactors may amplify this status.
    pub propagatable: bool,
}

impl StatusInfo {
    pub fn new(id: StatusId, name: impl Into<String>, display: StatusDisplay) -> Self {
        Self {
            id,
            name: name.into(),
            display,
            propagatable: false,
        }
    }

    /// Mark as propagatable (builder pattern).
    #[must_use]
    pub fn propagatable(mut self) -> Self {
        self.propagatable = true;
        self
    }
}

/// A held status and its stack count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStack {
    pub status: StatusId,
    pub count: i64,
}

/// Snapshot of a character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterView {
    pub id: EntityId,
    pub team: Team,
    pub room: RoomIndex,
    pub attack: i64,
    pub hp: i64,
    pub max_hp: i64,
    pub alive: bool,
    pub boss: bool,
    /// The resource entity (tower core) the heroes are trying to reach.
    pub resource: bool,
    pub subtypes: SmallVec<[SubtypeId; 4]>,
    /// Last attacker, never the resource entity.
    pub last_attacker: Option<EntityId>,
}

impl CharacterView {
    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.hp < self.max_hp
    }

    #[must_use]
    pub fn has_subtype(&self, subtype: SubtypeId) -> bool {
        self.subtypes.contains(&subtype)
    }
}

/// Card type as the host classifies it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Spell,
    Monster,
    Blight,
    /// Scourge cards.
    Junk,
    Equipment,
    Room,
}

impl CardType {
    /// Integer code used in trigger parameter blocks.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            CardType::Spell => 0,
            CardType::Monster => 1,
            CardType::Blight => 2,
            CardType::Junk => 3,
            CardType::Equipment => 4,
            CardType::Room => 5,
        }
    }
}

/// Snapshot of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub card_type: CardType,
    /// Ability card belonging to a unit on the board.
    pub unit_ability: bool,
    pub treasure: bool,
}

impl CardView {
    #[must_use]
    pub const fn new(id: CardId, card_type: CardType) -> Self {
        Self {
            id,
            card_type,
            unit_ability: false,
            treasure: false,
        }
    }

    /// Mark as a unit ability (builder pattern).
    #[must_use]
    pub const fn unit_ability(mut self) -> Self {
        self.unit_ability = true;
        self
    }

    /// Mark as treasure (builder pattern).
    #[must_use]
    pub const fn treasure(mut self) -> Self {
        self.treasure = true;
        self
    }

    /// Blight or scourge.
    #[must_use]
    pub const fn is_curse(&self) -> bool {
        matches!(self.card_type, CardType::Blight | CardType::Junk)
    }
}

/// Card piles the host keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardPile {
    Hand,
    Draw,
    Discard,
    Exhaust,
}

/// Why a card is being discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardInfo {
    pub card: CardId,
    /// The card went to discard after being played.
    pub was_played: bool,
    /// A card effect caused the discard.
    pub triggered_by_card: bool,
    /// The whole hand is being discarded at end of turn.
    pub end_of_turn: bool,
}

impl DiscardInfo {
    /// A discard forced by a card effect.
    #[must_use]
    pub const fn by_effect(card: CardId) -> Self {
        Self {
            card,
            was_played: false,
            triggered_by_card: true,
            end_of_turn: false,
        }
    }

    /// The end-of-turn hand discard.
    #[must_use]
    pub const fn end_of_turn(card: CardId) -> Self {
        Self {
            card,
            was_played: false,
            triggered_by_card: false,
            end_of_turn: true,
        }
    }

    /// Discard after being played.
    #[must_use]
    pub const fn after_play(card: CardId) -> Self {
        Self {
            card,
            was_played: true,
            triggered_by_card: false,
            end_of_turn: false,
        }
    }
}

/// Source of damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    DirectAttack,
    Trample,
    Splash,
    Spell,
    StatusEffect,
}

impl DamageType {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            DamageType::DirectAttack => 0,
            DamageType::Trample => 1,
            DamageType::Splash => 2,
            DamageType::Spell => 3,
            DamageType::StatusEffect => 4,
        }
    }
}

/// Damage parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageInfo {
    pub damage_type: DamageType,
    pub attacker: Option<EntityId>,
    /// Damage dealt by a unit ability card.
    pub from_unit_ability: bool,
}

impl DamageInfo {
    #[must_use]
    pub const fn new(damage_type: DamageType) -> Self {
        Self {
            damage_type,
            attacker: None,
            from_unit_ability: false,
        }
    }

    /// Set the attacker (builder pattern).
    #[must_use]
    pub const fn from_attacker(mut self, attacker: EntityId) -> Self {
        self.attacker = Some(attacker);
        self
    }

    /// Mark as unit-ability damage (builder pattern).
    #[must_use]
    pub const fn via_unit_ability(mut self) -> Self {
        self.from_unit_ability = true;
        self
    }

    /// Damage a unit dealt by attacking, trampling, splashing or using its ability.
    #[must_use]
    pub const fn is_unit_strike(&self) -> bool {
        matches!(
            self.damage_type,
            DamageType::DirectAttack | DamageType::Trample | DamageType::Splash
        ) || self.from_unit_ability
    }
}

//! Identifiers for everything the host hands us.
//!
//! The host owns all combat objects. This crate only ever sees opaque handles
//! to them: characters, cards, rooms, status effects and subtypes. Every
//! handle is a `Copy` newtype so it can be captured into event contexts and
//! candidate lists without borrowing host state.
//!
//! ```
//! use combat_extend::core::{EntityId, Team, TeamFilter};
//!
//! let hero = EntityId(3);
//! assert_eq!(hero.raw(), 3);
//!
//! assert!(TeamFilter::Both.includes(Team::Heroes));
//! assert!(!TeamFilter::Monsters.includes(Team::Heroes));
//! assert_eq!(Team::Heroes.opposite(), Team::Monsters);
//! ```

use serde::{Deserialize, Serialize};

/// Handle to a character (unit, champion, boss or the resource entity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Handle to a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Index of a room (floor). Room 0 is the bottom floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct RoomIndex(pub u8);

impl RoomIndex {
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Index usable for slicing host room tables.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for RoomIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Room({})", self.0)
    }
}

/// Identifier of a status effect kind (armor, frostbite, rage, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatusId(pub u32);

impl std::fmt::Display for StatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Status({})", self.0)
    }
}

/// Identifier of a character subtype (clan tag, "imp", "morsel", ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubtypeId(pub u16);

/// Which side a character fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Player-controlled units.
    Monsters,
    /// Invaders.
    Heroes,
}

impl Team {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Team::Monsters => Team::Heroes,
            Team::Heroes => Team::Monsters,
        }
    }
}

/// Team restriction carried by a targeting request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TeamFilter {
    Monsters,
    Heroes,
    #[default]
    Both,
}

impl TeamFilter {
    /// Does this filter admit characters of `team`?
    #[must_use]
    pub const fn includes(self, team: Team) -> bool {
        matches!(
            (self, team),
            (TeamFilter::Both, _)
                | (TeamFilter::Monsters, Team::Monsters)
                | (TeamFilter::Heroes, Team::Heroes)
        )
    }

    /// Teams in the order the host walks them when broadcasting.
    #[must_use]
    pub fn teams(self) -> &'static [Team] {
        match self {
            TeamFilter::Monsters => &[Team::Monsters],
            TeamFilter::Heroes => &[Team::Heroes],
            TeamFilter::Both => &[Team::Monsters, Team::Heroes],
        }
    }

    /// Teams in the order target collection gathers a room: heroes first.
    #[must_use]
    pub fn targeting_order(self) -> &'static [Team] {
        match self {
            TeamFilter::Monsters => &[Team::Monsters],
            TeamFilter::Heroes => &[Team::Heroes],
            TeamFilter::Both => &[Team::Heroes, Team::Monsters],
        }
    }
}

impl From<Team> for TeamFilter {
    fn from(team: Team) -> Self {
        match team {
            Team::Monsters => TeamFilter::Monsters,
            Team::Heroes => TeamFilter::Heroes,
        }
    }
}

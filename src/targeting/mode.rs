//! Target mode identifiers and the flags a mode declares.

use serde::{Deserialize, Serialize};

/// Identifier of a target mode.
///
/// Values at or below the configured reserved maximum are the host's own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetModeId(pub u16);

impl TargetModeId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for TargetModeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TargetMode({})", self.0)
    }
}

/// What a selector produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorKind {
    /// Characters on the board.
    Entity,
    /// Cards in piles.
    Card,
}

impl std::fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SelectorKind::Entity => "entity",
            SelectorKind::Card => "card",
        })
    }
}

/// Category the host's upgrade masks filter cards by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardTargetCategory {
    /// The card needs no target from the player.
    #[default]
    Targetless,
    /// The player picks a room.
    Room,
    /// The player picks a character.
    Character,
    Other,
}

/// Static properties of a target mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetModeFlags {
    pub targets_room: bool,
    pub targets_multiple_rooms: bool,
    /// More than one resolved target is a selector bug; extras are dropped.
    pub resolves_to_single_target: bool,
    /// Card modes only: the mode reads a whole pile.
    pub targets_card_pile: bool,
    pub card_category: CardTargetCategory,
}

impl TargetModeFlags {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            targets_room: false,
            targets_multiple_rooms: false,
            resolves_to_single_target: false,
            targets_card_pile: false,
            card_category: CardTargetCategory::Targetless,
        }
    }

    #[must_use]
    pub const fn room(mut self) -> Self {
        self.targets_room = true;
        self
    }

    #[must_use]
    pub const fn multiple_rooms(mut self) -> Self {
        self.targets_multiple_rooms = true;
        self
    }

    #[must_use]
    pub const fn single(mut self) -> Self {
        self.resolves_to_single_target = true;
        self
    }

    #[must_use]
    pub const fn card_pile(mut self) -> Self {
        self.targets_card_pile = true;
        self
    }

    #[must_use]
    pub const fn with_category(mut self, category: CardTargetCategory) -> Self {
        self.card_category = category;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TargetModeId::new(40).to_string(), "TargetMode(40)");
        assert_eq!(SelectorKind::Card.to_string(), "card");
    }

    #[test]
    fn test_flag_builders() {
        let flags = TargetModeFlags::new().room().single();
        assert!(flags.targets_room);
        assert!(flags.resolves_to_single_target);
        assert!(!flags.targets_multiple_rooms);
        assert_eq!(flags.card_category, CardTargetCategory::Targetless);
        assert_eq!(TargetModeFlags::default(), TargetModeFlags::new());
    }
}

//! Targeting requests.

use smallvec::SmallVec;

use crate::core::{CardId, EntityId, RoomIndex, StatusId, SubtypeId, TeamFilter};

use super::TargetModeId;

/// Health condition a target must meet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HealthFilter {
    #[default]
    Any,
    Damaged,
    Undamaged,
}

/// Everything a card effect tells the pipeline about one targeting request.
///
/// Built with [`TargetingContext::new`] and the `with_*` builders. The
/// defaults match an ordinary in-combat effect: both teams, dead characters
/// and the resource entity excluded, nothing else filtered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetingContext {
    pub mode: TargetModeId,
    pub teams: TeamFilter,
    pub room: RoomIndex,
    /// Character whose trigger runs the effect.
    pub self_target: Option<EntityId>,
    /// Target a trigger handed down through its parameter block.
    pub override_target: Option<EntityId>,
    pub in_combat: bool,
    /// Non-committing pass. Never writes the last-targeted memo.
    pub preview: bool,
    pub health: HealthFilter,
    /// If non-empty, a target must hold at least one of these.
    pub status_filter: SmallVec<[StatusId; 2]>,
    pub subtype: Option<SubtypeId>,
    pub excluded_subtypes: SmallVec<[SubtypeId; 2]>,
    pub ignore_bosses: bool,
    pub ignore_resource: bool,
    pub ignore_dead: bool,
    pub include_untouchable: bool,
    pub skip: SmallVec<[EntityId; 4]>,
    /// The effect deals damage.
    pub damage_effect: bool,
    /// The effect only reaches rooms next to the resource room.
    pub limited_range: bool,
    pub played_card: Option<CardId>,
    /// This is the first effect of a played card; committing passes record their targets.
    pub first_effect_in_played_card: bool,
}

impl TargetingContext {
    pub fn new(mode: TargetModeId, room: RoomIndex) -> Self {
        Self {
            mode,
            teams: TeamFilter::Both,
            room,
            self_target: None,
            override_target: None,
            in_combat: true,
            preview: false,
            health: HealthFilter::Any,
            status_filter: SmallVec::new(),
            subtype: None,
            excluded_subtypes: SmallVec::new(),
            ignore_bosses: false,
            ignore_resource: true,
            ignore_dead: true,
            include_untouchable: false,
            skip: SmallVec::new(),
            damage_effect: false,
            limited_range: false,
            played_card: None,
            first_effect_in_played_card: false,
        }
    }

    #[must_use]
    pub fn with_teams(mut self, teams: impl Into<TeamFilter>) -> Self {
        self.teams = teams.into();
        self
    }

    #[must_use]
    pub fn with_self(mut self, character: EntityId) -> Self {
        self.self_target = Some(character);
        self
    }

    #[must_use]
    pub fn with_override(mut self, target: Option<EntityId>) -> Self {
        self.override_target = target;
        self
    }

    #[must_use]
    pub fn with_health(mut self, health: HealthFilter) -> Self {
        self.health = health;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusId) -> Self {
        self.status_filter.push(status);
        self
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: SubtypeId) -> Self {
        self.subtype = Some(subtype);
        self
    }

    #[must_use]
    pub fn excluding_subtype(mut self, subtype: SubtypeId) -> Self {
        self.excluded_subtypes.push(subtype);
        self
    }

    #[must_use]
    pub fn ignoring_bosses(mut self) -> Self {
        self.ignore_bosses = true;
        self
    }

    #[must_use]
    pub fn including_resource(mut self) -> Self {
        self.ignore_resource = false;
        self
    }

    #[must_use]
    pub fn including_dead(mut self) -> Self {
        self.ignore_dead = false;
        self
    }

    #[must_use]
    pub fn including_untouchable(mut self) -> Self {
        self.include_untouchable = true;
        self
    }

    #[must_use]
    pub fn skipping(mut self, character: EntityId) -> Self {
        self.skip.push(character);
        self
    }

    #[must_use]
    pub fn damage(mut self) -> Self {
        self.damage_effect = true;
        self
    }

    #[must_use]
    pub fn limited_range(mut self) -> Self {
        self.limited_range = true;
        self
    }

    #[must_use]
    pub fn out_of_combat(mut self) -> Self {
        self.in_combat = false;
        self
    }

    /// Mark as the first effect of `card` being played.
    #[must_use]
    pub fn from_played_card(mut self, card: CardId) -> Self {
        self.played_card = Some(card);
        self.first_effect_in_played_card = true;
        self
    }

    /// The same request as a preview pass.
    #[must_use]
    pub fn as_preview(mut self) -> Self {
        self.preview = true;
        self
    }
}

//! Built-in target modes.
//!
//! Modes that pick one character by a stat resolve ties to the front-most
//! candidate, which is the first one in collection order: heroes before
//! monsters, and for floor modes the top room before the rooms below it.

use crate::core::{CardId, EntityId, ExtensionConfig, RoomIndex, TeamFilter};
use crate::host::{CharacterView, CombatServices};

use super::filter::SharedFilter;
use super::pipeline::whole_floor;
use super::{
    CardSelector, EntitySelector, TargetModeFlags, TargetModeId, TargetSelector,
    TargetSelectorRegistry, TargetingContext,
};

/// Names accepted in `ExtensionConfig::target_modes`.
pub const BUILTIN_MODE_NAMES: &[&str] = &[
    "played_card",
    "override_target",
    "in_front_of_self",
    "behind_self",
    "around_self",
    "strongest",
    "highest_attack",
    "lowest_attack",
    "highest_attack_excluding_self",
    "highest_attack_all_rooms",
    "lowest_attack_all_rooms",
];

/// Which end of a stat to pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extreme {
    Highest,
    Lowest,
}

impl Extreme {
    fn beats(self, candidate: i64, best: i64) -> bool {
        match self {
            Extreme::Highest => candidate > best,
            Extreme::Lowest => candidate < best,
        }
    }
}

/// Front-most candidate with the most extreme `stat`.
fn pick_by(
    services: &dyn CombatServices,
    candidates: &[EntityId],
    extreme: Extreme,
    stat: impl Fn(&CharacterView) -> i64,
) -> Option<EntityId> {
    let mut best: Option<(EntityId, i64)> = None;
    for view in candidates.iter().filter_map(|&id| services.character(id)) {
        let value = stat(&view);
        if best.map_or(true, |(_, b)| extreme.beats(value, b)) {
            best = Some((view.id, value));
        }
    }
    best.map(|(id, _)| id)
}

fn self_index(ctx: &TargetingContext, valid: &[EntityId], mode: &'static str) -> Option<usize> {
    let Some(me) = ctx.self_target else {
        tracing::warn!(mode, "target mode needs a self target but the effect has none");
        return None;
    };
    valid.iter().position(|&id| id == me)
}

/// The card being played.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayedCard;

impl CardSelector for PlayedCard {
    fn flags(&self) -> TargetModeFlags {
        TargetModeFlags::new().single()
    }

    fn collect_target_cards(&self, ctx: &TargetingContext, _: &dyn CombatServices, out: &mut Vec<CardId>) {
        out.extend(ctx.played_card);
    }
}

/// The override target a trigger passed down, if any.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverrideTarget;

impl EntitySelector for OverrideTarget {
    fn flags(&self) -> TargetModeFlags {
        TargetModeFlags::new().single()
    }

    fn collect_targets(
        &self,
        ctx: &TargetingContext,
        _: &dyn CombatServices,
        _: &SharedFilter,
        out: &mut Vec<EntityId>,
    ) -> bool {
        out.extend(ctx.override_target);
        true
    }
}

/// The character directly in front of self.
#[derive(Clone, Copy, Debug, Default)]
pub struct InFrontOfSelf;

impl EntitySelector for InFrontOfSelf {
    fn flags(&self) -> TargetModeFlags {
        TargetModeFlags::new().room().single()
    }

    fn filter_targets(&self, ctx: &TargetingContext, _: &dyn CombatServices, valid: &[EntityId], chosen: &mut Vec<EntityId>) {
        if let Some(index) = self_index(ctx, valid, "in_front_of_self").filter(|&i| i > 0) {
            chosen.push(valid[index - 1]);
        }
    }
}

/// The character directly behind self.
#[derive(Clone, Copy, Debug, Default)]
pub struct BehindSelf;

impl EntitySelector for BehindSelf {
    fn flags(&self) -> TargetModeFlags {
        TargetModeFlags::new().single()
    }

    fn filter_targets(&self, ctx: &TargetingContext, _: &dyn CombatServices, valid: &[EntityId], chosen: &mut Vec<EntityId>) {
        if let Some(&behind) = self_index(ctx, valid, "behind_self").and_then(|i| valid.get(i + 1)) {
            chosen.push(behind);
        }
    }
}

/// Self and its neighbours on both sides.
#[derive(Clone, Copy, Debug, Default)]
pub struct AroundSelf;

impl EntitySelector for AroundSelf {
    fn filter_targets(&self, ctx: &TargetingContext, _: &dyn CombatServices, valid: &[EntityId], chosen: &mut Vec<EntityId>) {
        let Some(index) = self_index(ctx, valid, "around_self") else {
            return;
        };
        chosen.push(valid[index]);
        if index > 0 {
            chosen.push(valid[index - 1]);
        }
        if let Some(&behind) = valid.get(index + 1) {
            chosen.push(behind);
        }
    }
}

/// The character with the most health in the room.
#[derive(Clone, Copy, Debug, Default)]
pub struct Strongest;

impl EntitySelector for Strongest {
    fn flags(&self) -> TargetModeFlags {
        TargetModeFlags::new().room().single()
    }

    fn filter_targets(&self, _: &TargetingContext, services: &dyn CombatServices, valid: &[EntityId], chosen: &mut Vec<EntityId>) {
        chosen.extend(pick_by(services, valid, Extreme::Highest, |c| c.hp));
    }
}

/// The character with the highest or lowest attack in the room.
#[derive(Clone, Copy, Debug)]
pub struct ByAttack {
    pub extreme: Extreme,
    /// Never pick the effect's own character.
    pub exclude_self: bool,
}

impl ByAttack {
    #[must_use]
    pub const fn highest() -> Self {
        Self {
            extreme: Extreme::Highest,
            exclude_self: false,
        }
    }

    #[must_use]
    pub const fn lowest() -> Self {
        Self {
            extreme: Extreme::Lowest,
            exclude_self: false,
        }
    }

    #[must_use]
    pub const fn excluding_self(mut self) -> Self {
        self.exclude_self = true;
        self
    }
}

impl EntitySelector for ByAttack {
    fn flags(&self) -> TargetModeFlags {
        TargetModeFlags::new().room().single()
    }

    fn filter_targets(&self, ctx: &TargetingContext, services: &dyn CombatServices, valid: &[EntityId], chosen: &mut Vec<EntityId>) {
        let me = ctx.self_target.filter(|_| self.exclude_self);
        let candidates: Vec<EntityId> = valid.iter().copied().filter(|&id| Some(id) != me).collect();
        chosen.extend(pick_by(services, &candidates, self.extreme, |c| c.attack));
    }
}

/// Highest or lowest attack anywhere on the floor.
#[derive(Clone, Copy, Debug)]
pub struct FloorByAttack {
    pub extreme: Extreme,
}

impl EntitySelector for FloorByAttack {
    fn flags(&self) -> TargetModeFlags {
        TargetModeFlags::new().multiple_rooms().single()
    }

    fn collect_targets(
        &self,
        ctx: &TargetingContext,
        services: &dyn CombatServices,
        filter: &SharedFilter,
        out: &mut Vec<EntityId>,
    ) -> bool {
        let mut floor = Vec::new();
        whole_floor(services, ctx.teams, &mut floor);
        filter.apply(ctx, services, &mut floor);
        out.extend(pick_by(services, &floor, self.extreme, |c| c.attack));
        true
    }

    /// Highlights the floor bottom room first.
    fn collect_preview_targets(&self, _: &TargetingContext, services: &dyn CombatServices, out: &mut Vec<EntityId>) {
        for index in 0..services.room_count() {
            if let Ok(room) = u8::try_from(index) {
                services.characters_in_room(RoomIndex(room), TeamFilter::Both, out);
            }
        }
    }
}

/// The stock selector registered under `name`.
#[must_use]
pub fn selector_for(name: &str) -> Option<TargetSelector> {
    let selector = match name {
        "played_card" => TargetSelector::card(PlayedCard),
        "override_target" => TargetSelector::entity(OverrideTarget),
        "in_front_of_self" => TargetSelector::entity(InFrontOfSelf),
        "behind_self" => TargetSelector::entity(BehindSelf),
        "around_self" => TargetSelector::entity(AroundSelf),
        "strongest" => TargetSelector::entity(Strongest),
        "highest_attack" => TargetSelector::entity(ByAttack::highest()),
        "lowest_attack" => TargetSelector::entity(ByAttack::lowest()),
        "highest_attack_excluding_self" => TargetSelector::entity(ByAttack::highest().excluding_self()),
        "highest_attack_all_rooms" => TargetSelector::entity(FloorByAttack {
            extreme: Extreme::Highest,
        }),
        "lowest_attack_all_rooms" => TargetSelector::entity(FloorByAttack {
            extreme: Extreme::Lowest,
        }),
        _ => return None,
    };
    Some(selector)
}

/// Bind every built-in mode the config maps to an id.
///
/// Returns how many were bound. Refusals are logged by the registry.
pub fn install(registry: &mut TargetSelectorRegistry, config: &ExtensionConfig) -> usize {
    let mut installed = 0;
    for (name, &raw) in &config.target_modes {
        let Some(selector) = selector_for(name) else {
            tracing::warn!(mode = name.as_str(), "unknown built-in target mode");
            continue;
        };
        if registry.bind_selector(TargetModeId::new(raw), selector).is_ok() {
            installed += 1;
        }
    }
    installed
}

//! Built-in trigger predicates.
//!
//! Content packs map these names to custom trigger ids in the extension
//! config; [`install`] registers whichever ones are mapped. Each predicate
//! documents the parameter block it fills in.

use crate::core::{ExtensionConfig, StatusId, Team};
use crate::host::{CardType, CombatServices, StatusDisplay};

use super::event::{
    CardDiscardedEvent, CardPlayedEvent, CharacterHitEvent, CharacterSpawnedEvent, ResourceDamageEvent,
    StatusAddedEvent, StatusRemovedEvent,
};
use super::params::{FireTriggersData, QueueTriggerParams};
use super::{TriggerId, TriggerRegistry};

/// Names accepted in `ExtensionConfig::triggers`.
pub const BUILTIN_TRIGGER_NAMES: &[&str] = &[
    "vengeance",
    "follow_up",
    "junk",
    "penance",
    "accursed",
    "evoke",
    "on_buffed",
    "on_debuffed",
    "on_growth_gained",
    "on_growth_lost",
    "resonance",
    "mobilize",
    "encounter",
];

/// An allied unit took damage from any source.
///
/// `param_int`: damage before reductions. `param_int2`: damage type code.
/// Override target: the damaged unit's last attacker.
pub fn vengeance(ev: &CharacterHitEvent, services: &dyn CombatServices) -> Option<QueueTriggerParams> {
    let me = services.character(ev.character)?;
    let damaged = services.character(ev.damaged)?;
    (damaged.team == me.team).then(|| {
        QueueTriggerParams::fire(
            FireTriggersData::new(ev.original_damage, ev.damage.damage_type.code())
                .targeting(damaged.last_attacker),
        )
    })
}

/// Another allied unit struck an opposing unit with an attack or ability.
///
/// Spells and status damage do not count. Parameters as [`vengeance`].
pub fn follow_up(ev: &CharacterHitEvent, services: &dyn CombatServices) -> Option<QueueTriggerParams> {
    let me = services.character(ev.character)?;
    let damaged = services.character(ev.damaged)?;
    let attacker = services.character(ev.damage.attacker?)?;
    let fires = damaged.team != me.team
        && attacker.team == me.team
        && attacker.id != me.id
        && ev.damage.is_unit_strike();
    fires.then(|| {
        QueueTriggerParams::fire(
            FireTriggersData::new(ev.original_damage, ev.damage.damage_type.code())
                .targeting(damaged.last_attacker),
        )
    })
}

/// A card was discarded by an effect (or a treasure by a card).
///
/// `param_int`: free hand slots. `param_int2`: card type code.
pub fn junk(ev: &CardDiscardedEvent, services: &dyn CombatServices) -> Option<QueueTriggerParams> {
    let discard = &ev.discard;
    let fires = !discard.was_played || (discard.triggered_by_card && ev.card.treasure);
    fires.then(|| {
        let free = services.max_hand_size().saturating_sub(services.hand_size());
        QueueTriggerParams::fire(FireTriggersData::new(free as i64, ev.card.card_type.code()))
    })
}

fn curse_code(card_type: CardType) -> i64 {
    i64::from(card_type == CardType::Junk)
}

/// A blight or scourge was played.
///
/// `param_int`: 1 for a scourge, 0 for a blight. `param_int2`: 1 (played).
pub fn penance(ev: &CardPlayedEvent, _: &dyn CombatServices) -> Option<QueueTriggerParams> {
    ev.card
        .is_curse()
        .then(|| QueueTriggerParams::fire(FireTriggersData::new(curse_code(ev.card.card_type), 1)))
}

/// A blight or scourge was discarded by a card effect.
///
/// Registered for `accursed` alongside [`penance`]. `param_int2`: 0 (discarded).
pub fn accursed_discarded(ev: &CardDiscardedEvent, _: &dyn CombatServices) -> Option<QueueTriggerParams> {
    (ev.discard.triggered_by_card && ev.card.is_curse())
        .then(|| QueueTriggerParams::fire(FireTriggersData::new(curse_code(ev.card.card_type), 0)))
}

/// A unit ability was used on the floor.
///
/// `param_int`: 1 if this unit used it. Override target: the user.
pub fn evoke(ev: &CardPlayedEvent, _: &dyn CombatServices) -> Option<QueueTriggerParams> {
    ev.card.unit_ability.then(|| {
        let mine = ev.activated_by == Some(ev.character);
        QueueTriggerParams::fire(FireTriggersData::new(i64::from(mine), 0).targeting(ev.activated_by))
    })
}

fn on_gained(
    display: StatusDisplay,
    ev: &StatusAddedEvent,
    services: &dyn CombatServices,
) -> Option<QueueTriggerParams> {
    if ev.display != display {
        return None;
    }
    let name = services
        .status_info(ev.status)
        .map_or_else(|| ev.status.to_string(), |info| info.name.clone());
    let distinct = services.distinct_statuses(ev.character, display) as i64;
    Some(QueueTriggerParams::fire(
        FireTriggersData::new(distinct, ev.stack_total).with_string(name),
    ))
}

/// A buff was applied.
///
/// `param_string`: status name. `param_int`: distinct buffs held.
/// `param_int2`: stacks of this status now held.
pub fn on_buffed(ev: &StatusAddedEvent, services: &dyn CombatServices) -> Option<QueueTriggerParams> {
    on_gained(StatusDisplay::Positive, ev, services)
}

/// A debuff was applied. Parameters as [`on_buffed`].
pub fn on_debuffed(ev: &StatusAddedEvent, services: &dyn CombatServices) -> Option<QueueTriggerParams> {
    on_gained(StatusDisplay::Negative, ev, services)
}

/// Stacks of `status` were gained.
///
/// `param_int`: stacks gained. `param_int2`: stacks now held.
pub fn status_gained(
    status: StatusId,
) -> impl Fn(&StatusAddedEvent, &dyn CombatServices) -> Option<QueueTriggerParams> {
    move |ev, _| {
        (ev.status == status)
            .then(|| QueueTriggerParams::fire(FireTriggersData::new(ev.stacks_added, ev.stack_total)))
    }
}

/// Stacks of `status` were lost.
///
/// `param_int`: stacks lost. `param_int2`: stacks left.
pub fn status_lost(
    status: StatusId,
) -> impl Fn(&StatusRemovedEvent, &dyn CombatServices) -> Option<QueueTriggerParams> {
    move |ev, _| {
        (ev.status == status && ev.stacks_removed > 0)
            .then(|| QueueTriggerParams::fire(FireTriggersData::new(ev.stacks_removed, ev.stack_total)))
    }
}

/// The resource entity took damage. Fires for living monsters.
///
/// `param_int`: damage taken. `param_int2`: damage type code.
pub fn resonance(ev: &ResourceDamageEvent, services: &dyn CombatServices) -> Option<QueueTriggerParams> {
    let me = services.character(ev.character)?;
    (me.team == Team::Monsters && me.alive && !me.resource).then(|| {
        QueueTriggerParams::fire(FireTriggersData::new(ev.damage, ev.info.damage_type.code()))
    })
}

/// An allied monster spawned in this unit's room.
///
/// `param_int`: allies in the room. Override target: the new unit.
pub fn mobilize(ev: &CharacterSpawnedEvent, services: &dyn CombatServices) -> Option<QueueTriggerParams> {
    let me = services.character(ev.character)?;
    (me.team == Team::Monsters).then(|| {
        QueueTriggerParams::fire(FireTriggersData::new(ev.allies_in_room as i64, 0).targeting(Some(ev.spawned)))
    })
}

/// This unit met a newly spawned ally.
///
/// `param_int`: allies in the room. `param_int2`: 0 (met by spawning).
/// Override target: the new unit.
pub fn encounter(ev: &CharacterSpawnedEvent, _: &dyn CombatServices) -> Option<QueueTriggerParams> {
    Some(QueueTriggerParams::fire(
        FireTriggersData::new(ev.allies_in_room as i64, 0).targeting(Some(ev.spawned)),
    ))
}

/// Register every built-in trigger the config maps to an id.
///
/// Returns how many were installed. Refusals are logged by the registry.
pub fn install(registry: &mut TriggerRegistry, config: &ExtensionConfig) -> usize {
    let mut installed = 0;
    for (name, &raw) in &config.triggers {
        let id = TriggerId::new(raw);
        let result = match name.as_str() {
            "vengeance" => registry.register_predicate(id, vengeance),
            "follow_up" => registry.register_predicate(id, follow_up),
            "junk" => registry.register_predicate(id, junk),
            "penance" => registry.register_predicate(id, penance),
            "accursed" => registry
                .register_predicate(id, penance)
                .and_then(|()| registry.register_predicate(id, accursed_discarded)),
            "evoke" => registry.register_predicate(id, evoke),
            "on_buffed" => registry
                .register_predicate(id, on_buffed)
                .and_then(|()| registry.allow_pre_trigger_stage(id)),
            "on_debuffed" => registry
                .register_predicate(id, on_debuffed)
                .and_then(|()| registry.allow_pre_trigger_stage(id)),
            "on_growth_gained" | "on_growth_lost" => {
                let Some(growth) = config.growth_status else {
                    tracing::warn!(trigger = name.as_str(), "no growth status configured, skipping");
                    continue;
                };
                let registered = if name == "on_growth_gained" {
                    registry.register_predicate(id, status_gained(growth))
                } else {
                    registry.register_predicate(id, status_lost(growth))
                };
                registered.and_then(|()| registry.allow_pre_trigger_stage(id))
            }
            "resonance" => registry.register_predicate(id, resonance),
            "mobilize" => registry.register_predicate(id, mobilize),
            "encounter" => registry.register_predicate(id, encounter),
            other => {
                tracing::warn!(trigger = other, "unknown built-in trigger");
                continue;
            }
        };
        if result.is_ok() {
            installed += 1;
        }
    }
    installed
}

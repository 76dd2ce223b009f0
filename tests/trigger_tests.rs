//! Trigger integration tests.
//!
//! These drive the full extension against the in-memory host: the host runs
//! its lifecycle listings, the interceptors fire custom triggers, and the
//! host's trigger queue records what fired in which order.

use std::rc::Rc;

use combat_extend::core::{CardId, EntityId, ExtensionConfig, RegistrationError, RoomIndex, StatusId};
use combat_extend::extension::{CombatExtension, ExtensionBuilder};
use combat_extend::host::{
    CardPile, CardType, CardView, CombatServices, DamageInfo, DamageType, DiscardInfo, FiredTrigger, MemoryCombat,
    NewCharacter, StatusDisplay, StatusInfo, HOST_TRIGGER_ON_HIT, HOST_TRIGGER_ON_SILENCED,
};
use combat_extend::triggers::{
    CardDiscardedEvent, CharacterHitEvent, FireTriggersData, QueueTriggerParams, ResourceDamageEvent,
    StatusAddedEvent, TriggerCategory, TriggerId,
};

const ON_BUFFED: TriggerId = TriggerId::new(100);
const CUSTOM: TriggerId = TriggerId::new(101);
const ALIAS: TriggerId = TriggerId::new(102);

const ARMOR: StatusId = StatusId(1);
const RAGE: StatusId = StatusId(2);

fn install(builder: ExtensionBuilder, host: &mut MemoryCombat) -> Rc<CombatExtension> {
    let extension = builder.build(host);
    host.install_hooks(extension.clone());
    extension
}

fn characters(fired: &[FiredTrigger]) -> Vec<EntityId> {
    fired.iter().map(|f| f.character).collect()
}

/// A buff on a unit that already has another buff fires once with the
/// distinct-buff count and the new stack total.
#[test]
fn test_on_buffed_scenario() {
    let mut host = MemoryCombat::new(1);
    host.define_status(StatusInfo::new(ARMOR, "armor", StatusDisplay::Positive));
    host.define_status(StatusInfo::new(RAGE, "rage", StatusDisplay::Positive));
    let unit = host.add_character(NewCharacter::monster(0).hp(10));
    host.give_status(unit, ARMOR, 1);

    let config = ExtensionConfig::new().with_trigger("on_buffed", ON_BUFFED.raw());
    let extension = install(ExtensionBuilder::new(config).with_builtins(), &mut host);
    assert!(extension.fires_pre_trigger_stage(ON_BUFFED));

    assert_eq!(host.add_status(unit, RAGE, 3, true), 3);

    let fired = host.fired_of(ON_BUFFED);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].character, unit);
    assert_eq!(fired[0].params.param_int(), 2, "distinct buff count");
    assert_eq!(fired[0].params.param_int2(), 3, "stack count");
    assert_eq!(
        fired[0].params.fire_data.as_ref().and_then(|d| d.param_string.as_deref()),
        Some("rage")
    );
    assert_eq!(host.pre_stage_runs(), vec![(unit, ON_BUFFED)]);
}

/// Only triggers allowed at registration run the pre-character-trigger
/// stage, next to the host's own silence trigger.
#[test]
fn test_pre_trigger_stage_follows_registration() {
    let mut host = MemoryCombat::new(1);
    let unit = host.add_character(NewCharacter::monster(0).hp(10));
    let mut builder = ExtensionBuilder::new(ExtensionConfig::new());
    builder.allow_pre_trigger_stage(ON_BUFFED).unwrap();
    install(builder, &mut host);

    host.queue_trigger(unit, CUSTOM, QueueTriggerParams::default());
    host.queue_trigger(unit, ON_BUFFED, QueueTriggerParams::default());
    host.queue_trigger(unit, HOST_TRIGGER_ON_SILENCED, QueueTriggerParams::default());
    host.run_trigger_queue();

    assert_eq!(host.fired().len(), 3);
    assert_eq!(
        host.pre_stage_runs(),
        vec![(unit, ON_BUFFED), (unit, HOST_TRIGGER_ON_SILENCED)]
    );
}

/// A debuff does not fire the buff trigger.
#[test]
fn test_on_buffed_ignores_debuffs() {
    let mut host = MemoryCombat::new(1);
    let frost = StatusId(9);
    host.define_status(StatusInfo::new(frost, "frostbite", StatusDisplay::Negative));
    let unit = host.add_character(NewCharacter::hero(0).hp(10));

    let config = ExtensionConfig::new().with_trigger("on_buffed", ON_BUFFED.raw());
    install(ExtensionBuilder::new(config).with_builtins(), &mut host);

    host.add_status(unit, frost, 2, true);
    assert!(host.fired().is_empty());
}

/// Discarding with nothing registered for card-discarded changes nothing
/// beyond the host's own bookkeeping.
#[test]
fn test_discard_without_predicates_is_noop() {
    let mut host = MemoryCombat::new(1);
    host.add_character(NewCharacter::monster(0));
    host.add_card(CardView::new(CardId(1), CardType::Spell), CardPile::Hand);
    install(ExtensionBuilder::new(ExtensionConfig::new()), &mut host);

    host.discard_card(DiscardInfo::by_effect(CardId(1)));

    assert!(host.fired().is_empty());
    assert_eq!(host.queued(), 0);
    assert_eq!(host.hand_size(), 0);
}

/// Junk fires for every unit in the selected room, monsters first.
#[test]
fn test_junk_fires_monsters_then_heroes() {
    let mut host = MemoryCombat::new(2);
    let hero = host.add_character(NewCharacter::hero(0));
    let monster = host.add_character(NewCharacter::monster(0));
    host.add_character(NewCharacter::monster(1));
    host.add_card(CardView::new(CardId(1), CardType::Spell), CardPile::Hand);
    host.add_card(CardView::new(CardId(2), CardType::Spell), CardPile::Hand);

    let config = ExtensionConfig::new().with_trigger("junk", CUSTOM.raw());
    install(ExtensionBuilder::new(config).with_builtins(), &mut host);

    host.discard_card(DiscardInfo::by_effect(CardId(1)));

    let fired = host.fired_of(CUSTOM);
    assert_eq!(characters(&fired), vec![monster, hero]);
    // One card left in a ten-card hand.
    assert_eq!(fired[0].params.param_int(), 9);
}

/// A panicking predicate is skipped; later predicates still fire.
#[test]
fn test_panicking_predicate_is_contained() {
    let mut host = MemoryCombat::new(1);
    let unit = host.add_character(NewCharacter::monster(0).hp(10));

    let mut builder = ExtensionBuilder::new(ExtensionConfig::new());
    builder
        .register_predicate::<StatusAddedEvent, _>(ALIAS, |_, _| panic!("broken content"))
        .unwrap();
    builder
        .register_predicate::<StatusAddedEvent, _>(CUSTOM, |ev, _| {
            Some(QueueTriggerParams::fire(FireTriggersData::new(ev.stacks_added, 0)))
        })
        .unwrap();
    install(builder, &mut host);

    assert_eq!(host.add_status(unit, ARMOR, 2, true), 2);
    let fired = host.fired();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].trigger, CUSTOM);
    assert_eq!(fired[0].params.param_int(), 2);
}

/// The second predicate for a (trigger, category) pair is refused and the
/// first stays in force.
#[test]
fn test_duplicate_predicate_keeps_first() {
    let mut host = MemoryCombat::new(1);
    let unit = host.add_character(NewCharacter::monster(0).hp(10));

    let mut builder = ExtensionBuilder::new(ExtensionConfig::new());
    builder
        .register_predicate::<StatusAddedEvent, _>(CUSTOM, |_, _| {
            Some(QueueTriggerParams::fire(FireTriggersData::new(1, 0)))
        })
        .unwrap();
    let err = builder
        .register_predicate::<StatusAddedEvent, _>(CUSTOM, |_, _| {
            Some(QueueTriggerParams::fire(FireTriggersData::new(2, 0)))
        })
        .unwrap_err();
    assert_eq!(
        err,
        RegistrationError::DuplicatePredicate {
            trigger: CUSTOM,
            category: TriggerCategory::StatusAdded,
        }
    );
    install(builder, &mut host);

    host.add_status(unit, ARMOR, 1, true);
    let fired = host.fired_of(CUSTOM);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].params.param_int(), 1);
}

/// Host ids cannot be given predicates.
#[test]
fn test_reserved_trigger_refused() {
    let mut builder = ExtensionBuilder::new(ExtensionConfig::new().with_reserved_trigger_max(50));
    let err = builder
        .register_predicate::<CardDiscardedEvent, _>(TriggerId::new(50), |_, _| None)
        .unwrap_err();
    assert!(matches!(err, RegistrationError::ReservedTrigger { reserved_max: 50, .. }));
}

/// An alias of a host trigger is queued right behind it, for the same
/// character, with the same parameters.
#[test]
fn test_alias_queued_after_original() {
    let mut host = MemoryCombat::new(1);
    let target = host.add_character(NewCharacter::monster(0).hp(10));
    let attacker = host.add_character(NewCharacter::hero(0).attack(3));

    let mut builder = ExtensionBuilder::new(ExtensionConfig::new());
    builder.register_alias(ALIAS, HOST_TRIGGER_ON_HIT).unwrap();
    install(builder, &mut host);

    host.apply_damage(target, 3, DamageInfo::new(DamageType::DirectAttack).from_attacker(attacker));

    let fired = host.fired();
    let order: Vec<(EntityId, TriggerId)> = fired.iter().map(|f| (f.character, f.trigger)).collect();
    assert_eq!(order, vec![(target, HOST_TRIGGER_ON_HIT), (target, ALIAS)]);
    assert_eq!(fired[0].params, fired[1].params);
}

/// Vengeance fires for allies of the damaged unit only, once per hit.
#[test]
fn test_vengeance_on_hit() {
    let mut host = MemoryCombat::new(2);
    let victim = host.add_character(NewCharacter::monster(0).hp(10));
    let ally = host.add_character(NewCharacter::monster(0).hp(10));
    let attacker = host.add_character(NewCharacter::hero(0).attack(4));
    host.add_character(NewCharacter::monster(1).hp(10));

    let config = ExtensionConfig::new().with_trigger("vengeance", CUSTOM.raw());
    install(ExtensionBuilder::new(config).with_builtins(), &mut host);

    host.apply_damage(victim, 4, DamageInfo::new(DamageType::DirectAttack).from_attacker(attacker));

    let fired = host.fired_of(CUSTOM);
    assert_eq!(characters(&fired), vec![victim, ally]);
    assert_eq!(fired[0].params.param_int(), 4);
    assert_eq!(fired[0].params.override_target(), Some(attacker));

    host.clear_fired();
    host.apply_damage(ally, 1, DamageInfo::new(DamageType::Spell));
    assert_eq!(host.fired_of(CUSTOM).len(), 2);
}

/// Hit predicates see the raw damage and the damaged character.
#[test]
fn test_hit_context() {
    let mut host = MemoryCombat::new(1);
    let victim = host.add_character(NewCharacter::monster(0).hp(10));

    let mut builder = ExtensionBuilder::new(ExtensionConfig::new());
    builder
        .register_predicate::<CharacterHitEvent, _>(CUSTOM, move |ev, _| {
            (ev.character == ev.damaged).then(|| QueueTriggerParams::fire(FireTriggersData::new(ev.original_damage, 0)))
        })
        .unwrap();
    install(builder, &mut host);

    host.apply_damage(victim, 7, DamageInfo::new(DamageType::Spell));
    let fired = host.fired_of(CUSTOM);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].params.param_int(), 7);
}

/// Resource damage reaches every monster, then every hero.
#[test]
fn test_resource_damage_order() {
    let mut host = MemoryCombat::new(3);
    let hero = host.add_character(NewCharacter::hero(0));
    let low = host.add_character(NewCharacter::monster(0));
    let high = host.add_character(NewCharacter::monster(1));
    let resource = host.add_resource(30);

    let mut builder = ExtensionBuilder::new(ExtensionConfig::new());
    builder
        .register_predicate::<ResourceDamageEvent, _>(CUSTOM, |ev, _| {
            Some(QueueTriggerParams::fire(FireTriggersData::new(ev.damage, 0)))
        })
        .unwrap();
    install(builder, &mut host);

    host.apply_damage(resource, 5, DamageInfo::new(DamageType::DirectAttack).from_attacker(hero));

    let fired = host.fired_of(CUSTOM);
    assert_eq!(characters(&fired), vec![low, high, resource, hero]);
    assert!(fired.iter().all(|f| f.params.param_int() == 5));
}

/// Resonance only answers for living monsters.
#[test]
fn test_resonance_builtin() {
    let mut host = MemoryCombat::new(2);
    host.add_character(NewCharacter::hero(0));
    let monster = host.add_character(NewCharacter::monster(0));
    let resource = host.add_resource(30);

    let config = ExtensionConfig::new().with_trigger("resonance", CUSTOM.raw());
    install(ExtensionBuilder::new(config).with_builtins(), &mut host);

    host.apply_damage(resource, 2, DamageInfo::new(DamageType::Spell));
    assert_eq!(characters(&host.fired_of(CUSTOM)), vec![monster]);
}

/// Mobilize fires for allied monsters already in the room of a new spawn.
#[test]
fn test_mobilize_on_spawn() {
    let mut host = MemoryCombat::new(2);
    let veteran = host.add_character(NewCharacter::monster(0));
    host.add_character(NewCharacter::monster(1));

    let config = ExtensionConfig::new().with_trigger("mobilize", CUSTOM.raw());
    install(ExtensionBuilder::new(config).with_builtins(), &mut host);

    let recruit = host.spawn_character(NewCharacter::monster(0));

    let fired = host.fired_of(CUSTOM);
    assert_eq!(characters(&fired), vec![veteran]);
    assert_eq!(fired[0].params.param_int(), 2);
    assert_eq!(fired[0].params.override_target(), Some(recruit));
}

/// Penance fires for live units in the room a curse is played into.
#[test]
fn test_penance_on_play() {
    let mut host = MemoryCombat::new(2);
    let here = host.add_character(NewCharacter::monster(1));
    let fallen = host.add_character(NewCharacter::monster(1));
    host.add_character(NewCharacter::monster(0));
    host.kill(fallen);
    host.add_card(CardView::new(CardId(5), CardType::Junk), CardPile::Hand);
    host.add_card(CardView::new(CardId(6), CardType::Spell), CardPile::Hand);

    let config = ExtensionConfig::new().with_trigger("penance", CUSTOM.raw());
    install(ExtensionBuilder::new(config).with_builtins(), &mut host);

    host.play_card(CardId(6), RoomIndex(1), None);
    assert!(host.fired_of(CUSTOM).is_empty());

    host.play_card(CardId(5), RoomIndex(1), None);
    let fired = host.fired_of(CUSTOM);
    assert_eq!(characters(&fired), vec![here]);
    assert_eq!((fired[0].params.param_int(), fired[0].params.param_int2()), (1, 1));
}

/// Room broadcast: monsters first, then heroes.
#[test]
fn test_fire_for_room() {
    let mut host = MemoryCombat::new(1);
    let hero = host.add_character(NewCharacter::hero(0));
    let monster = host.add_character(NewCharacter::monster(0));
    let mut builder = ExtensionBuilder::new(ExtensionConfig::new());
    builder.register_alias(ALIAS, CUSTOM).unwrap();
    let extension = install(builder, &mut host);

    extension.fire_for_room(CUSTOM, RoomIndex(0), &QueueTriggerParams::default(), &mut host);

    let order: Vec<(EntityId, TriggerId)> = host.fired().iter().map(|f| (f.character, f.trigger)).collect();
    assert_eq!(
        order,
        vec![(monster, CUSTOM), (monster, ALIAS), (hero, CUSTOM), (hero, ALIAS)]
    );
}

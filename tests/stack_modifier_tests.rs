//! Stack modifier tests.
//!
//! Status behaviors registered on the builder rewrite incoming stack counts
//! inside the host's own status application, after the host's room
//! modifiers and before the stacks land.

use std::rc::Rc;

use combat_extend::core::{EntityId, ExtensionConfig, StatusId};
use combat_extend::extension::{CombatExtension, ExtensionBuilder};
use combat_extend::host::{CombatServices, MemoryCombat, NewCharacter, StatusDisplay, StatusInfo};
use combat_extend::status::{Capability, Propagation, StackReactor};
use combat_extend::triggers::{FireTriggersData, QueueTriggerParams, StatusAddedEvent, TriggerId};

const HEX: StatusId = StatusId(10);
const POISON: StatusId = StatusId(11);
const FROST: StatusId = StatusId(12);
const ARMOR: StatusId = StatusId(13);
const SEEN: TriggerId = TriggerId::new(100);

fn board() -> (MemoryCombat, EntityId) {
    let mut host = MemoryCombat::new(1);
    host.define_status(StatusInfo::new(HEX, "hex", StatusDisplay::Negative));
    host.define_status(StatusInfo::new(POISON, "poison", StatusDisplay::Negative).propagatable());
    host.define_status(StatusInfo::new(FROST, "frostbite", StatusDisplay::Negative));
    host.define_status(StatusInfo::new(ARMOR, "armor", StatusDisplay::Positive).propagatable());
    let target = host.add_character(NewCharacter::hero(0).hp(20));
    (host, target)
}

fn install(builder: ExtensionBuilder, host: &mut MemoryCombat) -> Rc<CombatExtension> {
    let extension = builder.build(host);
    host.install_hooks(extension.clone());
    extension
}

fn multiplying_hex() -> ExtensionBuilder {
    let mut builder = ExtensionBuilder::new(ExtensionConfig::new());
    builder
        .register_status_behavior(HEX, Capability::stack_reactor(Propagation::multiply(HEX, 2)))
        .unwrap();
    builder
}

/// A holder of a x2 propagation status gets double poison.
#[test]
fn test_propagation_doubles_poison() {
    let (mut host, target) = board();
    install(multiplying_hex(), &mut host);
    host.give_status(target, HEX, 1);

    assert_eq!(host.add_status(target, POISON, 4, true), 8);
    assert_eq!(host.status_count(target, POISON), 8);
}

/// Non-propagatable and positive statuses pass through unchanged.
#[test]
fn test_only_negative_propagatable_amplified() {
    let (mut host, target) = board();
    install(multiplying_hex(), &mut host);
    host.give_status(target, HEX, 1);

    assert_eq!(host.add_status(target, FROST, 4, true), 4);
    assert_eq!(host.add_status(target, ARMOR, 4, true), 4);
}

/// An application that forbids modification is left alone.
#[test]
fn test_unmodifiable_application() {
    let (mut host, target) = board();
    install(multiplying_hex(), &mut host);
    host.give_status(target, HEX, 1);

    assert_eq!(host.add_status(target, POISON, 4, false), 4);
}

/// Without the propagation status held, nothing changes.
#[test]
fn test_requires_holding_the_status() {
    let (mut host, target) = board();
    install(multiplying_hex(), &mut host);

    assert_eq!(host.add_status(target, POISON, 4, true), 4);
    // Gaining the status itself is never amplified.
    assert_eq!(host.add_status(target, HEX, 3, true), 3);
    assert_eq!(host.add_status(target, POISON, 1, true), 2);
}

/// Additive propagation adds the holder's own stacks.
#[test]
fn test_add_own_stacks() {
    let (mut host, target) = board();
    let mut builder = ExtensionBuilder::new(ExtensionConfig::new());
    builder
        .register_status_behavior(HEX, Capability::stack_reactor(Propagation::add_own_stacks(HEX)))
        .unwrap();
    install(builder, &mut host);
    host.give_status(target, HEX, 3);

    assert_eq!(host.add_status(target, POISON, 2, true), 5);
}

/// Triggers fired for the application see the rewritten count.
#[test]
fn test_status_added_sees_rewritten_count() {
    let (mut host, target) = board();
    let mut builder = multiplying_hex();
    builder
        .register_predicate::<StatusAddedEvent, _>(SEEN, |ev, _| {
            (ev.status == POISON).then(|| QueueTriggerParams::fire(FireTriggersData::new(ev.stacks_added, ev.stack_total)))
        })
        .unwrap();
    install(builder, &mut host);
    host.give_status(target, HEX, 1);
    host.give_status(target, POISON, 1);

    host.add_status(target, POISON, 3, true);
    let fired = host.fired_of(SEEN);
    assert_eq!(fired.len(), 1);
    assert_eq!((fired[0].params.param_int(), fired[0].params.param_int2()), (6, 7));
}

struct Plus(i64);

impl StackReactor for Plus {
    fn on_other_status_added(&self, _: i64, _: StatusId, pending: i64, _: &dyn CombatServices) -> i64 {
        pending + self.0
    }
}

/// Reactors run in the order the holder gained their statuses.
#[test]
fn test_reactor_order_follows_holder() {
    let plus = StatusId(20);
    let (mut host, target) = board();
    let mut builder = multiplying_hex();
    builder.register_status_behavior(plus, Capability::stack_reactor(Plus(1))).unwrap();
    install(builder, &mut host);

    host.give_status(target, plus, 1);
    host.give_status(target, HEX, 1);
    assert_eq!(host.add_status(target, POISON, 3, true), 8);
}

/// A second behavior of the same kind for one status is refused.
#[test]
fn test_duplicate_behavior_refused() {
    let mut builder = multiplying_hex();
    assert!(builder
        .register_status_behavior(HEX, Capability::stack_reactor(Propagation::add_own_stacks(HEX)))
        .is_err());
}

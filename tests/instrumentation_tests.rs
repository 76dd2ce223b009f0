//! Instrumentation tests.
//!
//! Hook points are located in the host's method listings by pattern. A
//! listing that changed in a host update must disable only the affected
//! feature, and the host must keep running its own code unchanged.

use std::rc::Rc;

use tracing_subscriber::filter::EnvFilter;

use combat_extend::core::{ExtensionConfig, StatusId};
use combat_extend::extension::{CombatExtension, ExtensionBuilder};
use combat_extend::host::{
    fixtures, CombatServices, DamageInfo, DamageType, MemoryCombat, NewCharacter, HOST_TRIGGER_ON_HIT,
};
use combat_extend::instrument::{AttachError, HookId, Instruction, Instrumentation, MethodBody, Pattern, Step};
use combat_extend::interceptors::features;
use combat_extend::status::{Capability, Propagation};
use combat_extend::triggers::{
    CharacterHitEvent, FireTriggersData, QueueTriggerParams, ResourceDamageEvent, StatusAddedEvent, TriggerId,
};

const HIT: TriggerId = TriggerId::new(100);
const ADDED: TriggerId = TriggerId::new(101);
const TOWER: TriggerId = TriggerId::new(102);
const HEX: StatusId = StatusId(10);

/// Attach failures are logged at error level; `RUST_LOG=combat_extend=debug`
/// shows every splice.
fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_test_writer()
        .try_init();
}

fn builder() -> ExtensionBuilder {
    let mut builder = ExtensionBuilder::new(ExtensionConfig::new());
    builder
        .register_predicate::<CharacterHitEvent, _>(HIT, |_, _| Some(QueueTriggerParams::default()))
        .unwrap();
    builder
        .register_predicate::<StatusAddedEvent, _>(ADDED, |ev, _| {
            Some(QueueTriggerParams::fire(FireTriggersData::new(ev.stacks_added, 0)))
        })
        .unwrap();
    builder
        .register_predicate::<ResourceDamageEvent, _>(TOWER, |_, _| Some(QueueTriggerParams::default()))
        .unwrap();
    builder
        .register_status_behavior(HEX, Capability::stack_reactor(Propagation::multiply(HEX, 2)))
        .unwrap();
    builder
}

fn install(host: &mut MemoryCombat) -> Rc<CombatExtension> {
    init_logs();
    let extension = builder().build(host);
    host.install_hooks(extension.clone());
    extension
}

/// A renamed stack call disables the stack modifier only; status
/// application and the status-added triggers keep working.
#[test]
fn test_renamed_stack_call_disables_modifier() {
    let mut host = MemoryCombat::new(1);
    host.replace_method(fixtures::add_status_effect_renamed());
    let extension = install(&mut host);

    assert!(extension.instrumentation().is_inert(features::STACK_MODIFIER));
    assert!(extension.is_feature_active(features::STATUS_ADDED));

    let unit = host.add_character(NewCharacter::monster(0).hp(5));
    host.give_status(unit, HEX, 1);
    assert_eq!(host.add_status(unit, StatusId(3), 4, true), 4);
    assert_eq!(host.status_count(unit, StatusId(3)), 4);
    assert_eq!(host.fired_of(ADDED).len(), 1);
}

/// A listing with two on-hit sites is ambiguous for the unique hit splice:
/// the hit feature is disabled, damage and host triggers are untouched.
#[test]
fn test_ambiguous_hit_site_disables_hit_feature() {
    let mut host = MemoryCombat::new(1);
    host.replace_method(fixtures::apply_damage_twice_queued());
    let extension = install(&mut host);

    assert!(!extension.is_feature_active(features::CHARACTER_HIT));
    assert!(extension.is_feature_active(features::TRIGGER_ALIASES));

    let unit = host.add_character(NewCharacter::monster(0).hp(10));
    host.apply_damage(unit, 4, DamageInfo::new(DamageType::Spell));

    assert_eq!(host.character(unit).map(|c| c.hp), Some(6));
    assert_eq!(host.fired_of(HOST_TRIGGER_ON_HIT).len(), 2);
    assert!(host.fired_of(HIT).is_empty());
}

/// With the shipped listing the hit feature fires once per damage call.
#[test]
fn test_hit_fires_once_per_call() {
    let mut host = MemoryCombat::new(1);
    install(&mut host);
    let unit = host.add_character(NewCharacter::monster(0).hp(10));

    host.apply_damage(unit, 1, DamageInfo::new(DamageType::Spell));
    assert_eq!(host.fired_of(HIT).len(), 1);
    host.apply_damage(unit, 1, DamageInfo::new(DamageType::Spell));
    assert_eq!(host.fired_of(HIT).len(), 2);
}

/// A missing method disables its feature; the host skips the call.
#[test]
fn test_missing_method_disables_feature() {
    let mut host = MemoryCombat::new(2);
    host.remove_method(fixtures::TOWER_DAMAGE_TAKEN);
    let extension = install(&mut host);
    assert!(!extension.is_feature_active(features::RESOURCE_DAMAGE));
    assert!(extension.is_feature_active(features::CHARACTER_HIT));

    let resource = host.add_resource(20);
    host.apply_damage(resource, 5, DamageInfo::new(DamageType::DirectAttack));
    assert_eq!(host.character(resource).map(|c| c.hp), Some(15));
    assert!(host.fired_of(TOWER).is_empty());
    assert_eq!(host.fired_of(HIT).len(), 1);
}

/// Without any extension installed the host runs its listings as shipped.
#[test]
fn test_unhooked_host() {
    let mut host = MemoryCombat::new(1);
    let unit = host.add_character(NewCharacter::monster(0).hp(10));
    host.give_status(unit, HEX, 1);
    assert_eq!(host.add_status(unit, StatusId(3), 4, true), 4);
    host.apply_damage(unit, 2, DamageInfo::new(DamageType::Spell));
    let fired: Vec<TriggerId> = host.fired().iter().map(|f| f.trigger).collect();
    assert_eq!(fired, vec![HOST_TRIGGER_ON_HIT]);
}

fn body() -> MethodBody {
    MethodBody::new(
        "Demo::Run",
        vec![
            Instruction::ld_arg(0),
            Instruction::call("Demo::Step"),
            Instruction::call("Demo::Step"),
            Instruction::ret(),
        ],
    )
}

/// A feature whose second site fails loses its first site too, and stays
/// disabled.
#[test]
fn test_partial_feature_withdrawn() {
    init_logs();
    let body = body();
    let mut adapter = Instrumentation::new();
    adapter
        .attach_before("demo", "Demo::Run", Some(&body), Pattern::first_call("Demo::Step"), HookId(1))
        .unwrap();
    adapter.attach_prefix("other", "Demo::Run", Some(&body), HookId(2)).unwrap();
    assert_eq!(adapter.patch_count(), 2);

    let err = adapter
        .attach_after("demo", "Demo::Run", Some(&body), Pattern::unique_call("Demo::Step"), HookId(3))
        .unwrap_err();
    assert!(matches!(err, AttachError::NoSite { feature: "demo", .. }));
    assert_eq!(adapter.patch_count(), 1);
    assert!(adapter.is_inert("demo"));
    assert!(adapter.is_active("other"));

    assert_eq!(
        adapter.attach_postfix("demo", "Demo::Run", Some(&body), HookId(4)),
        Err(AttachError::Inert { feature: "demo" })
    );
    assert_eq!(
        adapter.plan(&body),
        vec![Step::Hook(HookId(2)), Step::Native(0), Step::Native(1), Step::Native(2), Step::Native(3)]
    );
}

/// Splices land around the matched span in plan order.
#[test]
fn test_plan_order() {
    init_logs();
    let body = body();
    let mut adapter = Instrumentation::new();
    adapter.attach_postfix("demo", "Demo::Run", Some(&body), HookId(4)).unwrap();
    adapter
        .attach_after("demo", "Demo::Run", Some(&body), Pattern::last_call("Demo::Step"), HookId(3))
        .unwrap();
    adapter
        .attach_before("demo", "Demo::Run", Some(&body), Pattern::first_call("Demo::Step"), HookId(2))
        .unwrap();
    adapter.attach_prefix("demo", "Demo::Run", Some(&body), HookId(1)).unwrap();

    assert_eq!(
        adapter.plan(&body),
        vec![
            Step::Hook(HookId(1)),
            Step::Native(0),
            Step::Hook(HookId(2)),
            Step::Native(1),
            Step::Native(2),
            Step::Hook(HookId(3)),
            Step::Native(3),
            Step::Hook(HookId(4)),
        ]
    );

    let other = MethodBody::new("Demo::Other", vec![Instruction::ret()]);
    assert_eq!(adapter.plan(&other), vec![Step::Native(0)]);
    assert!(adapter
        .attach_prefix("late", "Demo::Missing", None, HookId(5))
        .is_err());
}

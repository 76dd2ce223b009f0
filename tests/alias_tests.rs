//! Trigger alias tests.
//!
//! Aliases are registered on the trigger registry and always resolve to
//! final, non-alias triggers. These tests cover chain flattening, the
//! refusals, and randomized edge sets checked against a reference graph.

use std::collections::{BTreeMap, BTreeSet};

use combat_extend::core::RegistrationError;
use combat_extend::triggers::{TriggerId, TriggerRegistry};
use proptest::prelude::*;

fn t(raw: u32) -> TriggerId {
    TriggerId::new(raw)
}

fn registry() -> TriggerRegistry {
    TriggerRegistry::with_reserved_max(10)
}

/// A -> B then B -> C resolves A straight to C.
#[test]
fn test_chain_flattens_to_final() {
    let mut reg = registry();
    reg.register_alias(t(20), t(21)).unwrap();
    reg.register_alias(t(21), t(22)).unwrap();

    assert_eq!(reg.resolve(t(20)), &[t(22)]);
    assert_eq!(reg.resolve(t(21)), &[t(22)]);
    assert!(reg.resolve(t(22)).is_empty());
    assert_eq!(reg.expand(t(22)), &[t(20), t(21)]);
    assert!(reg.expand(t(21)).is_empty());
}

/// Registering onto an existing alias flattens onto its targets.
#[test]
fn test_alias_of_alias_registered_later() {
    let mut reg = registry();
    reg.register_alias(t(21), t(3)).unwrap();
    reg.register_alias(t(20), t(21)).unwrap();

    assert_eq!(reg.resolve(t(20)), &[t(3)]);
    assert_eq!(reg.expand(t(3)), &[t(21), t(20)]);
}

/// A custom may alias several host triggers.
#[test]
fn test_alias_extends_target_set() {
    let mut reg = registry();
    reg.register_alias(t(20), t(3)).unwrap();
    reg.register_alias(t(20), t(5)).unwrap();
    reg.register_alias(t(20), t(3)).unwrap();

    assert_eq!(reg.resolve(t(20)), &[t(3), t(5)]);
    assert_eq!(reg.expand(t(5)), &[t(20)]);
}

/// Self-aliases and cycles are refused and leave the graph untouched.
#[test]
fn test_refusals() {
    let mut reg = registry();
    assert_eq!(
        reg.register_alias(t(20), t(20)),
        Err(RegistrationError::SelfAlias { trigger: t(20) })
    );

    reg.register_alias(t(20), t(21)).unwrap();
    reg.register_alias(t(21), t(22)).unwrap();
    assert_eq!(
        reg.register_alias(t(22), t(20)),
        Err(RegistrationError::AliasCycle {
            custom: t(22),
            target: t(20),
        })
    );
    assert_eq!(reg.resolve(t(20)), &[t(22)]);
    assert!(reg.resolve(t(22)).is_empty());
}

/// Host ids cannot be made into aliases.
#[test]
fn test_reserved_custom_refused() {
    let mut reg = registry();
    assert!(matches!(
        reg.register_alias(t(4), t(20)),
        Err(RegistrationError::ReservedTrigger { .. })
    ));
    assert!(!reg.has_aliases());
}

/// Reference reachability over accepted edges.
fn reaches(edges: &BTreeMap<u32, BTreeSet<u32>>, from: u32, to: u32) -> bool {
    let mut stack = vec![from];
    let mut seen = BTreeSet::new();
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if seen.insert(node) {
            stack.extend(edges.get(&node).into_iter().flatten().copied());
        }
    }
    false
}

/// Final targets reachable from `from` in the reference graph.
fn finals(edges: &BTreeMap<u32, BTreeSet<u32>>, from: u32) -> BTreeSet<u32> {
    let mut out = BTreeSet::new();
    let mut stack: Vec<u32> = edges.get(&from).into_iter().flatten().copied().collect();
    let mut seen = BTreeSet::new();
    while let Some(node) = stack.pop() {
        if !seen.insert(node) {
            continue;
        }
        match edges.get(&node) {
            Some(next) => stack.extend(next.iter().copied()),
            None => {
                out.insert(node);
            }
        }
    }
    out
}

proptest! {
    /// Random edge sets: refusals match the reference graph, resolved sets
    /// hold only final triggers, and expansion mirrors resolution.
    #[test]
    fn prop_alias_graph_matches_reference(edges in prop::collection::vec((11u32..19, 11u32..19), 0..24)) {
        let mut reg = registry();
        let mut accepted: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();

        for (custom, target) in edges {
            let result = reg.register_alias(t(custom), t(target));
            if custom == target {
                prop_assert_eq!(result, Err(RegistrationError::SelfAlias { trigger: t(custom) }));
            } else if reaches(&accepted, target, custom) {
                prop_assert_eq!(result, Err(RegistrationError::AliasCycle { custom: t(custom), target: t(target) }));
            } else {
                prop_assert!(result.is_ok());
                accepted.entry(custom).or_default().insert(target);
            }
        }

        for raw in 11u32..19 {
            let resolved: BTreeSet<u32> = reg.resolve(t(raw)).iter().map(|id| id.raw()).collect();
            prop_assert_eq!(&resolved, &finals(&accepted, raw));
            for &target in &resolved {
                prop_assert!(reg.resolve(t(target)).is_empty());
                prop_assert!(reg.expand(t(target)).contains(&t(raw)));
            }
        }
    }
}

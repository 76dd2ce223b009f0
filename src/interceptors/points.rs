//! Where each interceptor splices into the host.

use crate::host::fixtures::{self, natives};
use crate::host::MethodSource;
use crate::instrument::{HookId, HookPoint, Instrumentation, Pattern, Splice};

/// Feature names. A failed attach disables everything under one name.
pub mod features {
    pub const STATUS_ADDED: &str = "status-added";
    pub const STACK_MODIFIER: &str = "stack-modifier";
    pub const STATUS_REMOVED: &str = "status-removed";
    pub const CARD_PLAYED: &str = "card-played";
    pub const CARD_DISCARDED: &str = "card-discarded";
    pub const CHARACTER_SPAWNED: &str = "character-spawned";
    pub const CHARACTER_HIT: &str = "character-hit";
    pub const RESOURCE_DAMAGE: &str = "resource-damage";
    pub const TRIGGER_ALIASES: &str = "trigger-aliases";

    pub const ALL: [&str; 9] = [
        STATUS_ADDED,
        STACK_MODIFIER,
        STATUS_REMOVED,
        CARD_PLAYED,
        CARD_DISCARDED,
        CHARACTER_SPAWNED,
        CHARACTER_HIT,
        RESOURCE_DAMAGE,
        TRIGGER_ALIASES,
    ];
}

/// Call-outs the extension answers.
pub mod hooks {
    use crate::instrument::HookId;

    pub const STATUS_ADDED: HookId = HookId(1);
    pub const STACK_MODIFIER: HookId = HookId(2);
    pub const STATUS_REMOVED: HookId = HookId(3);
    pub const CARD_PLAYED: HookId = HookId(4);
    pub const CARD_DISCARDED: HookId = HookId(5);
    pub const CHARACTER_SPAWNED: HookId = HookId(6);
    pub const CHARACTER_HIT: HookId = HookId(7);
    pub const RESOURCE_DAMAGE: HookId = HookId(8);
    pub const TRIGGER_ALIASES: HookId = HookId(9);
    /// Releases the hit guard's claim when `ApplyDamage` returns.
    pub const HIT_RELEASE: HookId = HookId(10);
}

fn point(feature: &'static str, method: &'static str, splice: Splice, hook: HookId) -> HookPoint {
    HookPoint {
        feature,
        method,
        splice,
        hook,
    }
}

/// Every splice the extension places, in attach order.
#[must_use]
pub fn hook_points() -> Vec<HookPoint> {
    vec![
        point(
            features::STACK_MODIFIER,
            fixtures::ADD_STATUS_EFFECT,
            Splice::Before(Pattern::first_call(natives::ADD_STACKS)),
            hooks::STACK_MODIFIER,
        ),
        point(
            features::STATUS_ADDED,
            fixtures::ADD_STATUS_EFFECT,
            Splice::Before(Pattern::first_call(natives::IS_MUTED)),
            hooks::STATUS_ADDED,
        ),
        point(
            features::STATUS_REMOVED,
            fixtures::REMOVE_STATUS_EFFECT,
            Splice::After(Pattern::first_call(natives::REMOVE_STACKS)),
            hooks::STATUS_REMOVED,
        ),
        point(
            features::CARD_PLAYED,
            fixtures::FIRE_CARD_PLAYED,
            Splice::Before(Pattern::last_call(natives::RUN_TRIGGER_QUEUE)),
            hooks::CARD_PLAYED,
        ),
        point(
            features::CARD_DISCARDED,
            fixtures::DISCARD_CARD,
            Splice::Before(Pattern::first_call(natives::DISCARD_RELIC_EFFECTS)),
            hooks::CARD_DISCARDED,
        ),
        point(
            features::CHARACTER_SPAWNED,
            fixtures::OTHER_CHARACTER_SPAWNED,
            Splice::Postfix,
            hooks::CHARACTER_SPAWNED,
        ),
        point(
            features::CHARACTER_HIT,
            fixtures::APPLY_DAMAGE,
            Splice::After(Pattern::unique_call(natives::QUEUE_AND_RUN_TRIGGER)),
            hooks::CHARACTER_HIT,
        ),
        point(
            features::CHARACTER_HIT,
            fixtures::APPLY_DAMAGE,
            Splice::Postfix,
            hooks::HIT_RELEASE,
        ),
        point(
            features::RESOURCE_DAMAGE,
            fixtures::TOWER_DAMAGE_TAKEN,
            Splice::Postfix,
            hooks::RESOURCE_DAMAGE,
        ),
        point(
            features::TRIGGER_ALIASES,
            fixtures::QUEUE_TRIGGER,
            Splice::After(Pattern::first_call(natives::ENQUEUE)),
            hooks::TRIGGER_ALIASES,
        ),
    ]
}

/// Attach every hook point against `source`.
///
/// Failures are logged by the adapter and leave their feature inert; the
/// rest still attach. Returns how many splices were placed.
pub fn attach_all(adapter: &mut Instrumentation, source: &dyn MethodSource) -> usize {
    let mut placed = 0;
    for point in hook_points() {
        if adapter.attach(&point, source.method(point.method)).is_ok() {
            placed += 1;
        }
    }
    let inert: Vec<&str> = features::ALL
        .into_iter()
        .filter(|feature| adapter.is_inert(feature))
        .collect();
    if inert.is_empty() {
        tracing::debug!(placed, "all interceptors attached");
    } else {
        tracing::warn!(placed, ?inert, "some interceptors are disabled");
    }
    placed
}

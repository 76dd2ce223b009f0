//! Instruction listings of the host lifecycle methods the extension patches.
//!
//! These mirror the shape of the shipped host build closely enough that the
//! extension's patterns are exercised for real: each listing contains the
//! calls the patterns anchor on plus the surrounding noise.

use crate::instrument::{Instruction, MethodBody, OpCode};

pub const ADD_STATUS_EFFECT: &str = "CharacterState::AddStatusEffect";
pub const REMOVE_STATUS_EFFECT: &str = "CharacterState::RemoveStatusEffect";
pub const FIRE_CARD_PLAYED: &str = "CardManager::FireUnitTriggersForCardPlayed";
pub const DISCARD_CARD: &str = "CardManager::DiscardCard";
pub const OTHER_CHARACTER_SPAWNED: &str = "CharacterState::OnOtherCharacterSpawned";
pub const APPLY_DAMAGE: &str = "CharacterState::ApplyDamage";
pub const TOWER_DAMAGE_TAKEN: &str = "RelicManager::ApplyTowerDamageTakenRelicEffects";
pub const QUEUE_TRIGGER: &str = "CombatManager::QueueTrigger";

/// Native calls the in-memory host gives behavior to.
pub mod natives {
    pub const ROOM_STATUS_MODIFIERS: &str = "RoomState::ApplyStatusModifiers";
    pub const ADD_STACKS: &str = "StatusEffectStack::AddStacks";
    /// Name of the stack application call in some host builds.
    pub const INCREMENT_STACKS: &str = "StatusEffectStack::IncrementStacks";
    pub const REMOVE_STACKS: &str = "StatusEffectStack::RemoveStacks";
    pub const IS_MUTED: &str = "CharacterState::IsMuted";
    pub const FIRE_STATUS_TRIGGERS: &str = "CharacterState::FireStatusTriggers";
    pub const FIRE_CARD_PLAYED_TRIGGERS: &str = "CharacterState::FireCardPlayedTriggers";
    pub const RUN_TRIGGER_QUEUE: &str = "CombatManager::RunTriggerQueue";
    pub const MOVE_TO_DISCARD: &str = "CardManager::MoveToDiscard";
    pub const DISCARD_RELIC_EFFECTS: &str = "RelicManager::ApplyCardDiscardedRelicEffects";
    pub const FIRE_ALLY_SPAWNED: &str = "CharacterState::FireAllySpawnedTriggers";
    pub const DAMAGE_HEALTH: &str = "CharacterState::ApplyDamageToHealth";
    pub const QUEUE_AND_RUN_TRIGGER: &str = "CombatManager::QueueAndRunTrigger";
    pub const TOWER_RELICS: &str = "RelicState::OnTowerDamaged";
    pub const ENQUEUE: &str = "TriggerQueue::Enqueue";
}

use natives::*;

/// `CharacterState::AddStatusEffect`.
pub fn add_status_effect() -> MethodBody {
    MethodBody::new(
        ADD_STATUS_EFFECT,
        vec![
            Instruction::ld_arg(0),
            Instruction::ld_arg(1),
            Instruction::ld_arg(2),
            Instruction::call_virt(ROOM_STATUS_MODIFIERS),
            Instruction::simple(OpCode::StLoc),
            Instruction::ld_field("statusEffects"),
            Instruction::simple(OpCode::LdLoc),
            Instruction::call(ADD_STACKS),
            Instruction::ld_arg(0),
            Instruction::call(IS_MUTED),
            Instruction::branch_false(13),
            Instruction::ld_arg(0),
            Instruction::call(FIRE_STATUS_TRIGGERS),
            Instruction::ret(),
        ],
    )
}

/// `CharacterState::RemoveStatusEffect`.
pub fn remove_status_effect() -> MethodBody {
    MethodBody::new(
        REMOVE_STATUS_EFFECT,
        vec![
            Instruction::ld_arg(0),
            Instruction::ld_field("statusEffects"),
            Instruction::ld_arg(2),
            Instruction::call(REMOVE_STACKS),
            Instruction::simple(OpCode::Pop),
            Instruction::ld_arg(0),
            Instruction::call(FIRE_STATUS_TRIGGERS),
            Instruction::ret(),
        ],
    )
}

/// `CardManager::FireUnitTriggersForCardPlayed`.
pub fn fire_card_played() -> MethodBody {
    MethodBody::new(
        FIRE_CARD_PLAYED,
        vec![
            Instruction::ld_arg(1),
            Instruction::call(FIRE_CARD_PLAYED_TRIGGERS),
            Instruction::call(RUN_TRIGGER_QUEUE),
            Instruction::ld_arg(1),
            Instruction::call(FIRE_CARD_PLAYED_TRIGGERS),
            Instruction::call(RUN_TRIGGER_QUEUE),
            Instruction::ret(),
        ],
    )
}

/// `CardManager::DiscardCard`.
pub fn discard_card() -> MethodBody {
    MethodBody::new(
        DISCARD_CARD,
        vec![
            Instruction::ld_arg(1),
            Instruction::call(MOVE_TO_DISCARD),
            Instruction::ld_arg(1),
            Instruction::call_virt(DISCARD_RELIC_EFFECTS),
            Instruction::ret(),
        ],
    )
}

/// `CharacterState::OnOtherCharacterSpawned`.
pub fn other_character_spawned() -> MethodBody {
    MethodBody::new(
        OTHER_CHARACTER_SPAWNED,
        vec![
            Instruction::ld_arg(0),
            Instruction::ld_arg(1),
            Instruction::call(FIRE_ALLY_SPAWNED),
            Instruction::ret(),
        ],
    )
}

/// `CharacterState::ApplyDamage`.
pub fn apply_damage() -> MethodBody {
    MethodBody::new(
        APPLY_DAMAGE,
        vec![
            Instruction::ld_arg(0),
            Instruction::ld_arg(1),
            Instruction::call(DAMAGE_HEALTH),
            Instruction::ld_arg(0),
            Instruction::ld_const(3),
            Instruction::call(QUEUE_AND_RUN_TRIGGER),
            Instruction::ret(),
        ],
    )
}

/// `RelicManager::ApplyTowerDamageTakenRelicEffects`.
pub fn tower_damage_taken() -> MethodBody {
    MethodBody::new(
        TOWER_DAMAGE_TAKEN,
        vec![
            Instruction::ld_arg(1),
            Instruction::call_virt(TOWER_RELICS),
            Instruction::ret(),
        ],
    )
}

/// `CombatManager::QueueTrigger`.
pub fn queue_trigger() -> MethodBody {
    MethodBody::new(
        QUEUE_TRIGGER,
        vec![
            Instruction::ld_field("triggerQueue"),
            Instruction::ld_arg(1),
            Instruction::ld_arg(2),
            Instruction::call(ENQUEUE),
            Instruction::ret(),
        ],
    )
}

/// Every listing, as shipped.
pub fn all() -> Vec<MethodBody> {
    vec![
        add_status_effect(),
        remove_status_effect(),
        fire_card_played(),
        discard_card(),
        other_character_spawned(),
        apply_damage(),
        tower_damage_taken(),
        queue_trigger(),
    ]
}

/// `ApplyDamage` from a build where the on-hit trigger is queued twice.
///
/// A unique-match splice must refuse this listing.
pub fn apply_damage_twice_queued() -> MethodBody {
    let mut body = apply_damage();
    let ret = body.instructions.pop();
    body.instructions.extend([
        Instruction::ld_arg(0),
        Instruction::ld_const(3),
        Instruction::call(QUEUE_AND_RUN_TRIGGER),
    ]);
    body.instructions.extend(ret);
    body
}

/// `AddStatusEffect` from a build that renamed the stack application call.
pub fn add_status_effect_renamed() -> MethodBody {
    let mut body = add_status_effect();
    for instruction in &mut body.instructions {
        if instruction.calls(ADD_STACKS) {
            *instruction = Instruction::call(INCREMENT_STACKS);
        }
    }
    body
}

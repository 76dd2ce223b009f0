//! In-memory reference host.
//!
//! Holds just enough combat state to drive the extension end to end: rooms
//! of characters, status stacks, card piles and the trigger queue. Lifecycle
//! methods run from their instruction listings, interleaved with whatever
//! the installed [`HookDispatch`] splices in.
//!
//! State lives in persistent `im` collections, so [`MemoryCombat::snapshot`]
//! is O(1). Tests use it to run a preview pass and a committing pass against
//! identical boards.

use std::collections::VecDeque;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::core::{CardId, EntityId, RoomIndex, StatusId, SubtypeId, Team, TeamFilter};
use crate::instrument::{Instruction, MethodBody, Step};
use crate::triggers::{QueueTriggerParams, TriggerId};

use super::fixtures::{self, natives};
use super::frame::{CallId, HookFrame};
use super::view::{CardPile, CardView, CharacterView, DamageInfo, DiscardInfo, StatusInfo, StatusStack};
use super::{
    CombatServices, HookDispatch, MethodSource, HOST_TRIGGER_ON_ALLY_SPAWNED, HOST_TRIGGER_ON_HIT,
    HOST_TRIGGER_ON_SILENCED,
};

/// A trigger the host fired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiredTrigger {
    pub character: EntityId,
    pub trigger: TriggerId,
    pub params: QueueTriggerParams,
}

/// Description of a character to place on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCharacter {
    team: Team,
    room: RoomIndex,
    attack: i64,
    hp: i64,
    boss: bool,
    subtypes: SmallVec<[SubtypeId; 4]>,
}

impl NewCharacter {
    #[must_use]
    pub fn monster(room: u8) -> Self {
        Self::new(Team::Monsters, room)
    }

    #[must_use]
    pub fn hero(room: u8) -> Self {
        Self::new(Team::Heroes, room)
    }

    fn new(team: Team, room: u8) -> Self {
        Self {
            team,
            room: RoomIndex(room),
            attack: 1,
            hp: 1,
            boss: false,
            subtypes: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn attack(mut self, attack: i64) -> Self {
        self.attack = attack;
        self
    }

    #[must_use]
    pub fn hp(mut self, hp: i64) -> Self {
        self.hp = hp;
        self
    }

    #[must_use]
    pub fn boss(mut self) -> Self {
        self.boss = true;
        self
    }

    #[must_use]
    pub fn subtype(mut self, subtype: SubtypeId) -> Self {
        self.subtypes.push(subtype);
        self
    }
}

#[derive(Clone, Debug)]
struct Character {
    view: CharacterView,
    statuses: Vec<StatusStack>,
}

/// An in-memory combat host.
#[derive(Clone)]
pub struct MemoryCombat {
    rooms: im::Vector<im::Vector<EntityId>>,
    characters: im::HashMap<EntityId, Character>,
    catalog: im::HashMap<StatusId, StatusInfo>,
    cards: im::HashMap<CardId, CardView>,
    piles: im::HashMap<CardPile, im::Vector<CardId>>,
    max_hand_size: usize,
    selected_room: RoomIndex,
    resource: Option<EntityId>,
    next_entity: u32,
    next_call: u64,
    queue: VecDeque<FiredTrigger>,
    fired: im::Vector<FiredTrigger>,
    /// Fired triggers that ran the pre-character-trigger status stage.
    pre_stage: im::Vector<(EntityId, TriggerId)>,
    methods: im::HashMap<String, Rc<MethodBody>>,
    hooks: Option<Rc<dyn HookDispatch>>,
}

impl std::fmt::Debug for MemoryCombat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCombat")
            .field("rooms", &self.rooms)
            .field("characters", &self.characters.len())
            .field("queued", &self.queue.len())
            .field("fired", &self.fired.len())
            .field("hooked", &self.hooks.is_some())
            .finish()
    }
}

impl MemoryCombat {
    /// Create an empty board with `room_count` rooms and the shipped method listings.
    pub fn new(room_count: usize) -> Self {
        let room_count = room_count.max(1);
        Self {
            rooms: (0..room_count).map(|_| im::Vector::new()).collect(),
            characters: im::HashMap::new(),
            catalog: im::HashMap::new(),
            cards: im::HashMap::new(),
            piles: im::HashMap::new(),
            max_hand_size: 10,
            selected_room: RoomIndex(0),
            resource: None,
            next_entity: 1,
            next_call: 0,
            queue: VecDeque::new(),
            fired: im::Vector::new(),
            pre_stage: im::Vector::new(),
            methods: fixtures::all()
                .into_iter()
                .map(|body| (body.name.clone(), Rc::new(body)))
                .collect(),
            hooks: None,
        }
    }

    /// O(1) copy of the whole board.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Install the extension's dispatcher.
    pub fn install_hooks(&mut self, hooks: Rc<dyn HookDispatch>) {
        self.hooks = Some(hooks);
    }

    /// Swap in a different listing, as a host update would.
    pub fn replace_method(&mut self, body: MethodBody) {
        self.methods.insert(body.name.clone(), Rc::new(body));
    }

    /// Drop a listing entirely.
    pub fn remove_method(&mut self, name: &str) {
        self.methods.remove(name);
    }

    // === Board setup (no hooks run) ===

    /// Place a character at the back of its room.
    pub fn add_character(&mut self, new: NewCharacter) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;

        let last_room = self.rooms.len() - 1;
        let room = RoomIndex(new.room.0.min(last_room as u8));
        if room != new.room {
            tracing::warn!(requested = %new.room, placed = %room, "room out of range");
        }

        self.characters.insert(
            id,
            Character {
                view: CharacterView {
                    id,
                    team: new.team,
                    room,
                    attack: new.attack,
                    hp: new.hp,
                    max_hp: new.hp,
                    alive: new.hp > 0,
                    boss: new.boss,
                    resource: false,
                    subtypes: new.subtypes,
                    last_attacker: None,
                },
                statuses: Vec::new(),
            },
        );
        if let Some(roster) = self.rooms.get_mut(room.as_usize()) {
            roster.push_back(id);
        }
        id
    }

    /// Place the resource entity in the top room.
    pub fn add_resource(&mut self, hp: i64) -> EntityId {
        let top = (self.rooms.len() - 1) as u8;
        let id = self.add_character(NewCharacter::monster(top).attack(0).hp(hp));
        if let Some(c) = self.characters.get_mut(&id) {
            c.view.resource = true;
        }
        self.resource = Some(id);
        id
    }

    pub fn define_status(&mut self, info: StatusInfo) {
        self.catalog.insert(info.id, info);
    }

    /// Give stacks directly, skipping the host's status method.
    pub fn give_status(&mut self, id: EntityId, status: StatusId, count: i64) {
        if let Some(c) = self.characters.get_mut(&id) {
            Self::add_stacks(&mut c.statuses, status, count);
        }
    }

    pub fn add_card(&mut self, card: CardView, pile: CardPile) {
        self.cards.insert(card.id, card);
        self.piles.entry(pile).or_insert_with(im::Vector::new).push_back(card.id);
    }

    pub fn set_max_hand_size(&mut self, size: usize) {
        self.max_hand_size = size;
    }

    pub fn select_room(&mut self, room: RoomIndex) {
        self.selected_room = room;
    }

    pub fn set_attack(&mut self, id: EntityId, attack: i64) {
        if let Some(c) = self.characters.get_mut(&id) {
            c.view.attack = attack;
        }
    }

    /// Kill a character outright. It stays in its room, marked dead.
    pub fn kill(&mut self, id: EntityId) {
        if let Some(c) = self.characters.get_mut(&id) {
            c.view.hp = 0;
            c.view.alive = false;
        }
    }

    // === Host lifecycle operations (hooks run) ===

    /// `AddStatusEffect`. Returns the stacks actually applied.
    pub fn add_status(
        &mut self,
        target: EntityId,
        status: StatusId,
        stacks: i64,
        allow_modification: bool,
    ) -> i64 {
        let mut frame = HookFrame::StatusAdded {
            target,
            status,
            stacks,
            allow_modification,
        };
        self.run_method(fixtures::ADD_STATUS_EFFECT, &mut frame);
        match frame {
            HookFrame::StatusAdded { stacks, .. } => stacks,
            _ => 0,
        }
    }

    /// `RemoveStatusEffect`. Returns the stacks actually removed.
    pub fn remove_status(&mut self, target: EntityId, status: StatusId, stacks: i64) -> i64 {
        let mut frame = HookFrame::StatusRemoved {
            target,
            status,
            stacks,
            removed: 0,
        };
        self.run_method(fixtures::REMOVE_STATUS_EFFECT, &mut frame);
        match frame {
            HookFrame::StatusRemoved { removed, .. } => removed,
            _ => 0,
        }
    }

    /// Play a card from hand into `room`.
    pub fn play_card(&mut self, card: CardId, room: RoomIndex, activated_by: Option<EntityId>) {
        self.move_card(card, CardPile::Hand, CardPile::Discard);
        let mut frame = HookFrame::CardPlayed {
            card,
            room,
            activated_by,
        };
        self.run_method(fixtures::FIRE_CARD_PLAYED, &mut frame);
    }

    /// `DiscardCard`.
    pub fn discard_card(&mut self, discard: DiscardInfo) {
        let mut frame = HookFrame::CardDiscarded { discard };
        self.run_method(fixtures::DISCARD_CARD, &mut frame);
    }

    /// Place a character, then notify each ally already in its room.
    pub fn spawn_character(&mut self, new: NewCharacter) -> EntityId {
        let spawned = self.add_character(new);
        let Some(view) = self.character(spawned) else {
            return spawned;
        };
        let mut observers = Vec::new();
        self.characters_in_room(view.room, view.team.into(), &mut observers);
        for observer in observers.into_iter().filter(|&o| o != spawned) {
            let mut frame = HookFrame::OtherCharacterSpawned { observer, spawned };
            self.run_method(fixtures::OTHER_CHARACTER_SPAWNED, &mut frame);
        }
        spawned
    }

    /// `ApplyDamage`, plus the tower relic pass when the resource is hit.
    pub fn apply_damage(&mut self, target: EntityId, damage: i64, info: DamageInfo) {
        let call = CallId(self.next_call);
        self.next_call += 1;
        let mut frame = HookFrame::Damage {
            call,
            target,
            damage,
            info,
        };
        self.run_method(fixtures::APPLY_DAMAGE, &mut frame);

        if self.resource == Some(target) {
            let mut frame = HookFrame::ResourceDamage {
                resource: target,
                damage,
                info,
            };
            self.run_method(fixtures::TOWER_DAMAGE_TAKEN, &mut frame);
        }
    }

    // === Inspection ===

    /// Triggers fired so far, oldest first.
    #[must_use]
    pub fn fired(&self) -> Vec<FiredTrigger> {
        self.fired.iter().cloned().collect()
    }

    /// Fired triggers with id `trigger`.
    #[must_use]
    pub fn fired_of(&self, trigger: TriggerId) -> Vec<FiredTrigger> {
        self.fired.iter().filter(|f| f.trigger == trigger).cloned().collect()
    }

    pub fn clear_fired(&mut self) {
        self.fired.clear();
        self.pre_stage.clear();
    }

    /// `(character, trigger)` pairs that ran the pre-character-trigger
    /// status stage, oldest first.
    #[must_use]
    pub fn pre_stage_runs(&self) -> Vec<(EntityId, TriggerId)> {
        self.pre_stage.iter().copied().collect()
    }

    fn runs_pre_trigger_stage(&self, trigger: TriggerId) -> bool {
        trigger == HOST_TRIGGER_ON_SILENCED
            || self.hooks.as_ref().is_some_and(|hooks| hooks.runs_pre_trigger_stage(trigger))
    }

    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    // === Interpreter ===

    fn run_method(&mut self, name: &str, frame: &mut HookFrame) {
        let Some(body) = self.methods.get(name).cloned() else {
            tracing::warn!(method = name, "host method missing, skipping");
            return;
        };
        match self.hooks.clone() {
            None => {
                for instruction in &body.instructions {
                    self.execute(instruction, frame);
                }
            }
            Some(hooks) => {
                for step in hooks.plan(&body) {
                    match step {
                        Step::Native(index) => {
                            if let Some(instruction) = body.instructions.get(index) {
                                self.execute(instruction, frame);
                            }
                        }
                        Step::Hook(hook) => hooks.dispatch(hook, frame, self),
                    }
                }
            }
        }
    }

    fn execute(&mut self, instruction: &Instruction, frame: &mut HookFrame) {
        let Some(callee) = instruction.callee() else {
            return;
        };
        match (callee, &mut *frame) {
            (natives::ADD_STACKS | natives::INCREMENT_STACKS, HookFrame::StatusAdded { target, status, stacks, .. }) => {
                let (target, status) = (*target, *status);
                let alive = self.is_alive(target);
                match self.characters.get_mut(&target) {
                    Some(c) if alive && *stacks > 0 => Self::add_stacks(&mut c.statuses, status, *stacks),
                    _ => *stacks = 0,
                }
            }
            (natives::REMOVE_STACKS, HookFrame::StatusRemoved { target, status, stacks, removed }) => {
                let target = *target;
                if let Some(c) = self.characters.get_mut(&target) {
                    *removed = Self::remove_stacks(&mut c.statuses, *status, *stacks);
                }
            }
            (natives::MOVE_TO_DISCARD, HookFrame::CardDiscarded { discard }) => {
                let card = discard.card;
                self.move_card(card, CardPile::Hand, CardPile::Discard);
            }
            (natives::FIRE_ALLY_SPAWNED, HookFrame::OtherCharacterSpawned { observer, .. }) => {
                let observer = *observer;
                self.queue_trigger(observer, HOST_TRIGGER_ON_ALLY_SPAWNED, QueueTriggerParams::default());
                self.run_trigger_queue();
            }
            (natives::DAMAGE_HEALTH, HookFrame::Damage { target, damage, info, .. }) => {
                let (target, damage, attacker) = (*target, *damage, info.attacker);
                let resource = self.resource;
                if let Some(c) = self.characters.get_mut(&target) {
                    c.view.hp -= damage;
                    c.view.alive = c.view.hp > 0;
                    if attacker.is_some() && attacker != resource {
                        c.view.last_attacker = attacker;
                    }
                }
            }
            (natives::QUEUE_AND_RUN_TRIGGER, HookFrame::Damage { target, .. }) => {
                let target = *target;
                self.queue_trigger(target, HOST_TRIGGER_ON_HIT, QueueTriggerParams::default());
                self.run_trigger_queue();
            }
            (natives::ENQUEUE, HookFrame::QueueTrigger { character, trigger, params }) => {
                let (character, trigger, params) = (*character, *trigger, params.clone());
                self.push_trigger(character, trigger, params);
            }
            (natives::RUN_TRIGGER_QUEUE, _) => self.run_trigger_queue(),
            // Host internals with no observable effect here.
            _ => {}
        }
    }

    fn add_stacks(statuses: &mut Vec<StatusStack>, status: StatusId, count: i64) {
        match statuses.iter_mut().find(|s| s.status == status) {
            Some(stack) => stack.count += count,
            None => statuses.push(StatusStack { status, count }),
        }
    }

    fn remove_stacks(statuses: &mut Vec<StatusStack>, status: StatusId, count: i64) -> i64 {
        let Some(index) = statuses.iter().position(|s| s.status == status) else {
            return 0;
        };
        let removed = count.clamp(0, statuses[index].count);
        statuses[index].count -= removed;
        if statuses[index].count == 0 {
            statuses.remove(index);
        }
        removed
    }

    fn move_card(&mut self, card: CardId, from: CardPile, to: CardPile) {
        let moved = self
            .piles
            .get_mut(&from)
            .and_then(|pile| pile.index_of(&card).map(|index| pile.remove(index)));
        if let Some(card) = moved {
            self.piles.entry(to).or_insert_with(im::Vector::new).push_back(card);
        }
    }
}

impl MethodSource for MemoryCombat {
    fn method(&self, name: &str) -> Option<&MethodBody> {
        self.methods.get(name).map(|body| body.as_ref())
    }
}

impl CombatServices for MemoryCombat {
    fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn selected_room(&self) -> RoomIndex {
        self.selected_room
    }

    fn resource_room(&self) -> RoomIndex {
        self.resource
            .and_then(|id| self.characters.get(&id))
            .map_or(RoomIndex((self.rooms.len() - 1) as u8), |c| c.view.room)
    }

    fn resource_entity(&self) -> Option<EntityId> {
        self.resource
    }

    fn characters_in_room(&self, room: RoomIndex, teams: TeamFilter, out: &mut Vec<EntityId>) {
        let Some(roster) = self.rooms.get(room.as_usize()) else {
            return;
        };
        for &team in teams.teams() {
            out.extend(
                roster
                    .iter()
                    .filter(|id| self.characters.get(*id).is_some_and(|c| c.view.team == team)),
            );
        }
    }

    fn team_characters(&self, team: Team, out: &mut Vec<EntityId>) {
        for index in 0..self.rooms.len() {
            self.characters_in_room(RoomIndex(index as u8), team.into(), out);
        }
    }

    fn character(&self, id: EntityId) -> Option<CharacterView> {
        self.characters.get(&id).map(|c| c.view.clone())
    }

    fn statuses(&self, id: EntityId) -> &[StatusStack] {
        self.characters.get(&id).map_or(&[], |c| c.statuses.as_slice())
    }

    fn status_info(&self, status: StatusId) -> Option<&StatusInfo> {
        self.catalog.get(&status)
    }

    fn card(&self, id: CardId) -> Option<CardView> {
        self.cards.get(&id).copied()
    }

    fn cards_in_pile(&self, pile: CardPile, out: &mut Vec<CardId>) {
        if let Some(cards) = self.piles.get(&pile) {
            out.extend(cards.iter().copied());
        }
    }

    fn hand_size(&self) -> usize {
        self.piles.get(&CardPile::Hand).map_or(0, |h| h.len())
    }

    fn max_hand_size(&self) -> usize {
        self.max_hand_size
    }

    fn queue_trigger(&mut self, character: EntityId, trigger: TriggerId, params: QueueTriggerParams) {
        let mut frame = HookFrame::QueueTrigger {
            character,
            trigger,
            params,
        };
        self.run_method(fixtures::QUEUE_TRIGGER, &mut frame);
    }

    fn push_trigger(&mut self, character: EntityId, trigger: TriggerId, params: QueueTriggerParams) {
        self.queue.push_back(FiredTrigger {
            character,
            trigger,
            params,
        });
    }

    fn run_trigger_queue(&mut self) {
        while let Some(next) = self.queue.pop_front() {
            if self.runs_pre_trigger_stage(next.trigger) {
                tracing::debug!(character = %next.character, trigger = %next.trigger, "pre-character-trigger stage");
                self.pre_stage.push_back((next.character, next.trigger));
            }
            tracing::debug!(character = %next.character, trigger = %next.trigger, "host fired trigger");
            self.fired.push_back(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{CardType, DamageType, StatusDisplay};

    const ARMOR: StatusId = StatusId(1);

    fn board() -> (MemoryCombat, EntityId, EntityId) {
        let mut host = MemoryCombat::new(3);
        let monster = host.add_character(NewCharacter::monster(1).attack(5).hp(10));
        let hero = host.add_character(NewCharacter::hero(1).attack(3).hp(8));
        host.define_status(StatusInfo::new(ARMOR, "armor", StatusDisplay::Positive));
        (host, monster, hero)
    }

    #[test]
    fn test_room_listing_order() {
        let (mut host, monster, hero) = board();
        let second = host.add_character(NewCharacter::monster(1));
        let mut out = Vec::new();
        host.characters_in_room(RoomIndex(1), TeamFilter::Both, &mut out);
        assert_eq!(out, vec![monster, second, hero]);

        out.clear();
        host.characters_in_room(RoomIndex(1), TeamFilter::Heroes, &mut out);
        assert_eq!(out, vec![hero]);
    }

    #[test]
    fn test_unhooked_status_application() {
        let (mut host, monster, _) = board();
        assert_eq!(host.add_status(monster, ARMOR, 3, true), 3);
        assert_eq!(host.add_status(monster, ARMOR, 2, true), 2);
        assert_eq!(host.status_count(monster, ARMOR), 5);
        assert_eq!(host.distinct_statuses(monster, StatusDisplay::Positive), 1);

        assert_eq!(host.remove_status(monster, ARMOR, 7), 5);
        assert!(host.statuses(monster).is_empty());
    }

    #[test]
    fn test_damage_queues_host_on_hit() {
        let (mut host, monster, hero) = board();
        host.apply_damage(monster, 4, DamageInfo::new(DamageType::DirectAttack).from_attacker(hero));

        let view = host.character(monster).unwrap();
        assert_eq!(view.hp, 6);
        assert_eq!(view.last_attacker, Some(hero));
        assert_eq!(host.fired_of(HOST_TRIGGER_ON_HIT).len(), 1);
        assert_eq!(host.queued(), 0);
    }

    #[test]
    fn test_resource_room_and_snapshot() {
        let (mut host, monster, _) = board();
        let resource = host.add_resource(50);
        assert_eq!(host.resource_room(), RoomIndex(2));
        assert_eq!(host.resource_entity(), Some(resource));

        let before = host.snapshot();
        host.kill(monster);
        assert!(!host.is_alive(monster));
        assert!(before.is_alive(monster));
    }

    #[test]
    fn test_cards_move_between_piles() {
        let (mut host, _, _) = board();
        host.add_card(CardView::new(CardId(1), CardType::Spell), CardPile::Hand);
        host.add_card(CardView::new(CardId(2), CardType::Blight), CardPile::Hand);
        assert_eq!(host.hand_size(), 2);

        host.discard_card(DiscardInfo::by_effect(CardId(2)));
        assert_eq!(host.hand_size(), 1);
        let mut discard = Vec::new();
        host.cards_in_pile(CardPile::Discard, &mut discard);
        assert_eq!(discard, vec![CardId(2)]);
    }

    #[test]
    fn test_spawn_notifies_allies() {
        let (mut host, monster, _) = board();
        let spawned = host.spawn_character(NewCharacter::monster(1));
        let fired = host.fired_of(HOST_TRIGGER_ON_ALLY_SPAWNED);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].character, monster);
        assert_ne!(fired[0].character, spawned);
    }
}

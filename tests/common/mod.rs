#![allow(dead_code)]

use actorpool::*;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HookLog {
    pub activate: usize,
    pub deactivate: usize,
    pub enable_low_cost: usize,
    pub disable_low_cost: usize,
}

/// Actor with lifecycle hooks.
#[derive(Debug)]
pub struct Goblin {
    pub transform: Transform,
    pub tick: bool,
    pub collision: bool,
    pub hidden: bool,
    pub owner: Option<ActorHandle>,
    pub low_cost: bool,
    pub hooks: HookLog,
}

impl PoolHooks for Goblin {
    fn on_pool_activate(&mut self) {
        self.hooks.activate += 1;
    }

    fn on_pool_deactivate(&mut self) {
        self.hooks.deactivate += 1;
    }

    fn enable_low_cost_mode(&mut self) {
        self.low_cost = true;
        self.hooks.enable_low_cost += 1;
    }

    fn disable_low_cost_mode(&mut self) {
        self.low_cost = false;
        self.hooks.disable_low_cost += 1;
    }
}

impl Actor for Goblin {
    fn set_tick_enabled(&mut self, enabled: bool) {
        self.tick = enabled;
    }
    fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision = enabled;
    }
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
    fn transform(&self) -> Transform {
        self.transform
    }
    fn set_transform(&mut self, transform: &Transform) {
        self.transform = *transform;
    }
    fn set_owner(&mut self, owner: Option<ActorHandle>) {
        self.owner = owner;
    }
    fn pool_hooks(&mut self) -> Option<&mut dyn PoolHooks> {
        Some(self)
    }
}

/// Actor without hooks that does not tick by default.
#[derive(Debug)]
pub struct Barrel {
    pub transform: Transform,
    pub tick: bool,
    pub hidden: bool,
    pub owner: Option<ActorHandle>,
}

impl Actor for Barrel {
    fn set_tick_enabled(&mut self, enabled: bool) {
        self.tick = enabled;
    }
    fn starts_with_tick_enabled(&self) -> bool {
        false
    }
    fn set_collision_enabled(&mut self, _enabled: bool) {}
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
    fn transform(&self) -> Transform {
        self.transform
    }
    fn set_transform(&mut self, transform: &Transform) {
        self.transform = *transform;
    }
    fn set_owner(&mut self, owner: Option<ActorHandle>) {
        self.owner = owner;
    }
}

pub trait Spawnable: Actor + Sized {
    fn spawn_at(transform: &Transform) -> Self;
}

impl Spawnable for Goblin {
    fn spawn_at(transform: &Transform) -> Self {
        Goblin {
            transform: *transform,
            tick: true,
            collision: true,
            hidden: false,
            owner: None,
            low_cost: false,
            hooks: HookLog::default(),
        }
    }
}

impl Spawnable for Barrel {
    fn spawn_at(transform: &Transform) -> Self {
        Barrel {
            transform: *transform,
            tick: false,
            hidden: false,
            owner: None,
        }
    }
}

type Factory = fn(&Transform) -> (ActorHandle, Rc<RefCell<dyn Actor>>);

fn make<T: Spawnable>(transform: &Transform) -> (ActorHandle, Rc<RefCell<dyn Actor>>) {
    let actor = Rc::new(RefCell::new(T::spawn_at(transform)));
    let handle = ActorHandle::new(&actor);
    let actor: Rc<RefCell<dyn Actor>> = actor;
    (handle, actor)
}

/// In-memory runtime that owns every actor it constructs.
#[derive(Default)]
pub struct TestWorld {
    factories: HashMap<ActorClass, Factory>,
    actors: Vec<Rc<RefCell<dyn Actor>>>,
    pub constructed: usize,
    pub destroyed: usize,
}

impl TestWorld {
    pub fn new() -> Self {
        TestWorld::default()
            .with::<Goblin>()
            .with::<Barrel>()
    }

    pub fn with<T: Spawnable>(mut self) -> Self {
        self.factories.insert(ActorClass::of::<T>(), make::<T>);
        self
    }

    /// Number of actors the world currently owns.
    pub fn alive(&self) -> usize {
        self.actors.len()
    }

    /// Destroys `actor` behind the pool's back.
    pub fn kill(&mut self, actor: &ActorHandle) {
        if let Some(strong) = actor.upgrade() {
            self.actors.retain(|a| !Rc::ptr_eq(a, &strong));
        }
    }
}

impl World for TestWorld {
    fn spawn_actor(&mut self, class: ActorClass, transform: &Transform) -> ActorHandle {
        let factory = self.factories[&class];
        let (handle, actor) = factory(transform);
        self.actors.push(actor);
        self.constructed += 1;
        handle
    }

    fn destroy_actor(&mut self, actor: ActorHandle) {
        self.kill(&actor);
        self.destroyed += 1;
    }
}

pub fn goblin() -> ActorClass {
    ActorClass::of::<Goblin>()
}

pub fn barrel() -> ActorClass {
    ActorClass::of::<Barrel>()
}

pub fn at(x: f32) -> Transform {
    Transform::from_translation([x, 0.0, 0.0])
}

pub fn new_pool() -> ActorPool<TestWorld> {
    ActorPool::new(TestWorld::new(), PoolConfig::default())
}

pub fn goblin_state(actor: &ActorHandle) -> (Transform, bool, bool, bool, Option<ActorHandle>) {
    actor
        .inspect(|g: &Goblin| (g.transform, g.tick, g.collision, g.hidden, g.owner.clone()))
        .unwrap()
}

pub fn hooks(actor: &ActorHandle) -> HookLog {
    actor.inspect(|g: &Goblin| g.hooks).unwrap()
}

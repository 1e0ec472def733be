use crate::{
    Actor, ActorClass, ActorHandle, Broadcast, LevelChanged, LevelSignal, ListenerError,
    PoolConfig, PoolStorage, SubscriptionId, Transform, World,
};
use alloc::{
    rc::{Rc, Weak},
    vec::Vec,
};
use core::{cell::RefCell, fmt};
use tracing::{debug, trace, warn};

/// Payload of the spawn and return notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolEvent {
    /// The actor that was handed out or taken back.
    pub actor: ActorHandle,
    /// The requested transform on spawn, the last active transform on return.
    pub transform: Transform,
}

/// Running counters of an [`ActorPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Spawns served from a free list.
    pub hits: u64,
    /// Spawns that had to construct a new actor.
    pub misses: u64,
    /// Actors filed back into a free list.
    pub releases: u64,
    /// Actors constructed through the world, by spawns and pre-warming.
    pub constructed: u64,
}

#[derive(Clone, Copy)]
enum Hook {
    Activate,
    Deactivate,
    EnableLowCostMode,
    DisableLowCostMode,
}

#[inline(always)]
fn fire(actor: &mut dyn Actor, hook: Hook) {
    if let Some(hooks) = actor.pool_hooks() {
        match hook {
            Hook::Activate => hooks.on_pool_activate(),
            Hook::Deactivate => hooks.on_pool_deactivate(),
            Hook::EnableLowCostMode => hooks.enable_low_cost_mode(),
            Hook::DisableLowCostMode => hooks.disable_low_cost_mode(),
        }
    }
}

fn apply_standby(actor: &mut dyn Actor) {
    actor.set_tick_enabled(false);
    actor.set_collision_enabled(false);
    actor.set_hidden(true);
    actor.set_transform(&Transform::IDENTITY);
    actor.set_owner(None);
    fire(actor, Hook::EnableLowCostMode);
}

fn apply_active(actor: &mut dyn Actor, transform: &Transform, owner: Option<ActorHandle>) {
    let tick = actor.starts_with_tick_enabled();
    actor.set_tick_enabled(tick);
    actor.set_transform(transform);
    actor.set_hidden(false);
    actor.set_collision_enabled(true);
    actor.set_owner(owner);
    fire(actor, Hook::DisableLowCostMode);
}

/// Recycles actors per class instead of constructing and destroying them.
///
/// Spawning pops the most recently returned standby actor of the requested
/// class, or asks the [`World`] for a new one when the free list is empty.
/// Returning an actor puts it on standby and files it under its class.
///
/// The pool is single-threaded; share it as `Rc<RefCell<ActorPool<W>>>`
/// (see [`Self::initialize`]) and hand [`crate::PoolSpawner`]s a weak
/// reference to it.
pub struct ActorPool<W: World> {
    world: W,
    config: PoolConfig,
    storage: PoolStorage,
    stats: PoolStats,
    on_actor_spawned: Broadcast<PoolEvent>,
    on_actor_returned: Broadcast<PoolEvent>,
    level_subscription: Option<(Weak<LevelSignal>, SubscriptionId)>,
}

impl<W: World> ActorPool<W> {
    /// Creates a pool that is not attached to any level signal.
    pub fn new(world: W, config: PoolConfig) -> Self {
        ActorPool {
            world,
            config,
            storage: PoolStorage::new(),
            stats: PoolStats::default(),
            on_actor_spawned: Broadcast::with_policy(config.listener_failures),
            on_actor_returned: Broadcast::with_policy(config.listener_failures),
            level_subscription: None,
        }
    }

    /// Creates a shared pool and subscribes it to `level_changed`.
    ///
    /// The subscription only holds a weak reference, so it never keeps the
    /// pool alive. It is removed by [`Self::deinitialize`] or on drop.
    pub fn initialize(
        world: W,
        config: PoolConfig,
        level_changed: &Rc<LevelSignal>,
    ) -> Rc<RefCell<Self>>
    where
        W: 'static,
    {
        let pool = Rc::new(RefCell::new(Self::new(world, config)));
        let weak = Rc::downgrade(&pool);
        let id = level_changed.subscribe(move |_: &LevelChanged| {
            let Some(pool) = weak.upgrade() else {
                return Ok(());
            };
            let mut pool = pool.try_borrow_mut().map_err(|_| ListenerError::Busy)?;
            pool.handle_level_changed();
            Ok(())
        });
        pool.borrow_mut().level_subscription = Some((Rc::downgrade(level_changed), id));
        pool
    }

    /// Empties the pool and detaches from the level signal.
    ///
    /// Safe to call more than once; drop calls it as well.
    pub fn deinitialize(&mut self) {
        self.reset_pool();
        if let Some((signal, id)) = self.level_subscription.take() {
            if let Some(signal) = signal.upgrade() {
                signal.unsubscribe(id);
            }
        }
    }

    fn handle_level_changed(&mut self) {
        if self.config.reset_on_level_change {
            warn!(standby = self.storage.len(), "actor pool reset");
            self.reset_pool();
        }
    }

    /// Hands out an active actor of `class` at `transform`, owned by `owner`.
    ///
    /// A standby actor is reused when one is available; otherwise the world
    /// constructs a new one. Either way the actor's activate hook has run
    /// when this returns. With `broadcast` set, spawn listeners are notified
    /// afterwards with the requested transform.
    pub fn spawn_actor(
        &mut self,
        class: ActorClass,
        transform: &Transform,
        owner: Option<ActorHandle>,
        broadcast: bool,
    ) -> ActorHandle {
        let actor = match self.reuse_standby(class, transform, &owner) {
            Some(actor) => {
                self.stats.hits += 1;
                debug!(class = %class, remaining = self.storage.len_of(class), "pool hit");
                actor
            }
            None => {
                self.stats.misses += 1;
                self.stats.constructed += 1;
                debug!(class = %class, "pool miss, constructing");
                let actor = self.world.spawn_actor(class, transform);
                debug_assert_eq!(actor.class(), class);
                actor.with_actor(|actor| {
                    actor.set_owner(owner);
                    fire(actor, Hook::Activate);
                });
                actor
            }
        };

        if broadcast {
            self.on_actor_spawned.broadcast(&PoolEvent {
                actor: actor.clone(),
                transform: *transform,
            });
        }
        actor
    }

    fn reuse_standby(
        &mut self,
        class: ActorClass,
        transform: &Transform,
        owner: &Option<ActorHandle>,
    ) -> Option<ActorHandle> {
        while let Some(candidate) = self.storage.pop(class) {
            let activated = candidate.with_actor(|actor| {
                apply_active(actor, transform, owner.clone());
                fire(actor, Hook::Activate);
            });
            if activated.is_some() {
                return Some(candidate);
            }
            trace!(class = %class, "dropping stale standby handle");
        }
        None
    }

    /// Pops the next standby actor of `class` without activating it.
    ///
    /// No hooks run and the actor stays on standby; the caller takes over
    /// managing its state.
    pub fn take_from_pool(&mut self, class: ActorClass) -> Option<ActorHandle> {
        while let Some(candidate) = self.storage.pop(class) {
            if candidate.is_valid() {
                return Some(candidate);
            }
            trace!(class = %class, "dropping stale standby handle");
        }
        None
    }

    /// Puts `actor` on standby and files it under its class.
    ///
    /// With `broadcast` set, return listeners are notified first, with the
    /// actor's transform from before it was reset. Invalid handles and
    /// handles already in the pool are ignored.
    pub fn return_to_pool(&mut self, actor: &ActorHandle, broadcast: bool) {
        let Some(transform) = actor.with_actor(|actor| actor.transform()) else {
            trace!(class = %actor.class(), "ignoring invalid actor handle");
            return;
        };
        if self.storage.contains(actor) {
            debug!(class = %actor.class(), "actor is already pooled");
            return;
        }

        if broadcast {
            self.on_actor_returned.broadcast(&PoolEvent {
                actor: actor.clone(),
                transform,
            });
        }

        let parked = actor.with_actor(|actor| {
            fire(actor, Hook::Deactivate);
            apply_standby(actor);
        });
        if parked.is_none() {
            trace!(class = %actor.class(), "actor went away during return");
            return;
        }
        self.storage.push(actor.clone());
        self.stats.releases += 1;
    }

    /// Applies the standby state to `actor` without touching the pool.
    pub fn set_actor_standby(&self, actor: &ActorHandle) {
        if actor.with_actor(apply_standby).is_none() {
            trace!(class = %actor.class(), "ignoring invalid actor handle");
        }
    }

    /// Applies the active state to `actor` without touching the pool.
    ///
    /// Calling this on an already active actor overwrites its transform and
    /// owner and fires the disable-low-cost-mode hook again.
    pub fn set_actor_active(
        &self,
        actor: &ActorHandle,
        transform: &Transform,
        owner: Option<ActorHandle>,
    ) {
        if actor
            .with_actor(|actor| apply_active(actor, transform, owner))
            .is_none()
        {
            trace!(class = %actor.class(), "ignoring invalid actor handle");
        }
    }

    /// Empties the whole pool, then fills `class` with `count` standby actors.
    ///
    /// Every other class loses its standby actors too unless
    /// [`PoolConfig::pre_warm_clears_all`] is unset, so callers that need
    /// several classes warmed must use [`Self::grow_pool`] after the first.
    pub fn pre_warm(&mut self, class: ActorClass, count: usize) {
        if self.config.pre_warm_clears_all {
            self.reset_pool();
        } else {
            self.evict_class(class);
        }
        self.grow_pool(class, count);
    }

    /// Adds `count` freshly constructed standby actors to `class`.
    pub fn grow_pool(&mut self, class: ActorClass, count: usize) {
        debug!(class = %class, count, "growing pool");
        self.storage.reserve(class, count);
        for _ in 0..count {
            let actor = self.world.spawn_actor(class, &Transform::IDENTITY);
            self.stats.constructed += 1;
            if actor.with_actor(apply_standby).is_some() {
                self.storage.push(actor);
            } else {
                trace!(class = %class, "world returned an invalid actor");
            }
        }
    }

    /// Drops every standby actor of `class`. Active actors are unaffected.
    pub fn evict_class(&mut self, class: ActorClass) {
        let evicted = self.storage.remove(class);
        if !evicted.is_empty() {
            debug!(class = %class, count = evicted.len(), "evicting class");
        }
        self.destroy_all(evicted);
    }

    /// Drops every standby actor of every class.
    ///
    /// Actors currently handed out are simply forgotten by the pool.
    pub fn reset_pool(&mut self) {
        let evicted = self.storage.clear();
        self.destroy_all(evicted);
    }

    fn destroy_all(&mut self, evicted: Vec<ActorHandle>) {
        for actor in evicted.into_iter().filter(ActorHandle::is_valid) {
            self.world.destroy_actor(actor);
        }
    }

    /// Number of standby actors of `class`.
    pub fn standby_count(&self, class: ActorClass) -> usize {
        self.storage.len_of(class)
    }

    /// Number of standby actors across all classes.
    pub fn total_standby(&self) -> usize {
        self.storage.len()
    }

    /// Read-only view of the free lists.
    pub fn storage(&self) -> &PoolStorage {
        &self.storage
    }

    /// Counters since the pool was created.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// The pool's configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// The world actors are constructed in.
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Mutable access to the world.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Channel notified by spawns requested with `broadcast` set.
    ///
    /// Listeners run while the pool is mutably borrowed, so a listener cannot
    /// call back into a shared pool.
    pub fn on_actor_spawned(&self) -> &Broadcast<PoolEvent> {
        &self.on_actor_spawned
    }

    /// Channel notified by returns requested with `broadcast` set.
    pub fn on_actor_returned(&self) -> &Broadcast<PoolEvent> {
        &self.on_actor_returned
    }
}

impl<W: World> Drop for ActorPool<W> {
    fn drop(&mut self) {
        self.deinitialize();
    }
}

impl<W: World> fmt::Debug for ActorPool<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorPool")
            .field("config", &self.config)
            .field("storage", &self.storage)
            .field("stats", &self.stats)
            .field("on_actor_spawned", &self.on_actor_spawned)
            .field("on_actor_returned", &self.on_actor_returned)
            .finish_non_exhaustive()
    }
}

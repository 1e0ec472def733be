use crate::{ActorClass, ActorHandle, ActorPool, Transform, World};
use alloc::rc::{Rc, Weak};
use core::{cell::RefCell, fmt};
use tracing::trace;

/// Spawns pooled actors on behalf of one owning actor.
///
/// The spawner holds a weak reference to its pool, resolved once by
/// [`Self::bind`]. Once the pool is gone, or while it is borrowed elsewhere,
/// spawning yields `None`.
pub struct PoolSpawner<W: World> {
    pool: Weak<RefCell<ActorPool<W>>>,
    owner: Option<ActorHandle>,
}

impl<W: World> PoolSpawner<W> {
    /// Creates an unbound spawner for `owner`.
    pub fn new(owner: Option<ActorHandle>) -> Self {
        PoolSpawner {
            pool: Weak::new(),
            owner,
        }
    }

    /// Creates a spawner for `owner` already bound to `pool`.
    pub fn bound(pool: &Rc<RefCell<ActorPool<W>>>, owner: Option<ActorHandle>) -> Self {
        PoolSpawner {
            pool: Rc::downgrade(pool),
            owner,
        }
    }

    /// Resolves the pool this spawner forwards to.
    pub fn bind(&mut self, pool: &Rc<RefCell<ActorPool<W>>>) {
        self.pool = Rc::downgrade(pool);
    }

    /// Returns `true` while the bound pool is alive.
    pub fn is_bound(&self) -> bool {
        self.pool.strong_count() > 0
    }

    /// The actor spawned actors are owned by.
    pub fn owner(&self) -> Option<&ActorHandle> {
        self.owner.as_ref()
    }

    /// Spawns an actor of `class` from the pool, owned by this spawner's owner.
    pub fn spawn_actor(
        &self,
        class: ActorClass,
        transform: &Transform,
        broadcast: bool,
    ) -> Option<ActorHandle> {
        let Some(pool) = self.pool.upgrade() else {
            trace!(class = %class, "spawner has no pool");
            return None;
        };
        let Ok(mut pool) = pool.try_borrow_mut() else {
            trace!(class = %class, "pool is busy");
            return None;
        };
        Some(pool.spawn_actor(class, transform, self.owner.clone(), broadcast))
    }
}

impl<W: World> fmt::Debug for PoolSpawner<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolSpawner")
            .field("bound", &self.is_bound())
            .field("owner", &self.owner)
            .finish()
    }
}

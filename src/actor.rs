use crate::PoolHooks;
use alloc::rc::{Rc, Weak};
use core::{
    any::{type_name, Any, TypeId},
    cell::{RefCell, RefMut},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// Position, rotation and scale of an actor in its world.
///
/// The pool never does placement math with it, it only hands it to actors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in world units.
    pub translation: [f32; 3],
    /// Rotation as a `[x, y, z, w]` quaternion.
    pub rotation: [f32; 4],
    /// Per-axis scale.
    pub scale: [f32; 3],
}

impl Transform {
    /// The transform every standby actor is parked at.
    pub const IDENTITY: Transform = Transform {
        translation: [0.0; 3],
        rotation: [0.0, 0.0, 0.0, 1.0],
        scale: [1.0; 3],
    };

    /// Creates an identity transform moved to `translation`.
    pub const fn from_translation(translation: [f32; 3]) -> Self {
        Transform {
            translation,
            ..Self::IDENTITY
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Identifies the concrete type of a pooled actor.
///
/// This is the only key the pool partitions its free lists by: two actors of
/// different types are never handed out for one another.
#[derive(Clone, Copy)]
pub struct ActorClass {
    id: TypeId,
    name: &'static str,
}

impl ActorClass {
    /// Returns the class of `T`.
    pub fn of<T: Actor>() -> Self {
        ActorClass {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Type name of the class, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this is the class of `T`.
    pub fn is<T: Actor>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ActorClass {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for ActorClass {}
impl PartialOrd for ActorClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for ActorClass {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}
impl Hash for ActorClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl fmt::Debug for ActorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
impl fmt::Display for ActorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Upcast helper, implemented for every `'static` type.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    #[inline(always)]
    fn as_any(&self) -> &dyn Any {
        self
    }
    #[inline(always)]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A heavyweight object owned by the runtime that can be parked in a pool.
///
/// The pool only requests state through these setters; what "ticking" or
/// "collision" means is up to the runtime.
pub trait Actor: AsAny {
    /// Enables or disables per-frame updates.
    fn set_tick_enabled(&mut self, enabled: bool);

    /// Whether the actor ticks when it becomes active.
    ///
    /// By default actors start ticking.
    #[inline(always)]
    fn starts_with_tick_enabled(&self) -> bool {
        true
    }

    /// Enables or disables collision.
    fn set_collision_enabled(&mut self, enabled: bool);

    /// Hides or shows the actor.
    fn set_hidden(&mut self, hidden: bool);

    /// Current transform of the actor.
    fn transform(&self) -> Transform;

    /// Moves the actor.
    fn set_transform(&mut self, transform: &Transform);

    /// Sets or clears the owning actor.
    fn set_owner(&mut self, owner: Option<ActorHandle>);

    /// Exposes the lifecycle hooks if this type implements them.
    ///
    /// Types with hooks return `Some(self)`. The default skips all hooks.
    #[inline(always)]
    fn pool_hooks(&mut self) -> Option<&mut dyn PoolHooks> {
        None
    }
}

/// Non-owning handle to an actor owned by the runtime.
///
/// Clones refer to the same actor. A handle turns invalid once the runtime
/// drops the actor; every pool operation treats an invalid handle as a no-op.
#[derive(Clone)]
pub struct ActorHandle {
    class: ActorClass,
    actor: Weak<RefCell<dyn Actor>>,
}

impl ActorHandle {
    /// Creates a handle for an actor owned by `actor`, recording `T` as its
    /// class.
    pub fn new<T: Actor>(actor: &Rc<RefCell<T>>) -> Self {
        let actor: Rc<RefCell<dyn Actor>> = actor.clone();
        ActorHandle {
            class: ActorClass::of::<T>(),
            actor: Rc::downgrade(&actor),
        }
    }

    /// Class of the actor behind this handle.
    pub fn class(&self) -> ActorClass {
        self.class
    }

    /// Returns `true` while the runtime still owns the actor.
    pub fn is_valid(&self) -> bool {
        self.actor.strong_count() > 0
    }

    /// Returns `true` if both handles point at the same actor.
    pub fn ptr_eq(&self, other: &ActorHandle) -> bool {
        Weak::ptr_eq(&self.actor, &other.actor)
    }

    /// Address of the actor allocation, stable for as long as this handle
    /// exists.
    pub(crate) fn addr(&self) -> usize {
        self.actor.as_ptr().cast::<()>() as usize
    }

    /// Upgrades to a strong reference, if the actor is still alive.
    pub fn upgrade(&self) -> Option<Rc<RefCell<dyn Actor>>> {
        self.actor.upgrade()
    }

    /// Runs `f` with mutable access to the actor.
    ///
    /// Returns `None` if the actor is gone or already borrowed.
    pub fn with_actor<R>(&self, f: impl FnOnce(&mut dyn Actor) -> R) -> Option<R> {
        let actor = self.actor.upgrade()?;
        let mut actor: RefMut<'_, dyn Actor> = actor.try_borrow_mut().ok()?;
        Some(f(&mut *actor))
    }

    /// Runs `f` with shared access to the concrete actor type `T`.
    ///
    /// Returns `None` if the actor is gone, borrowed mutably, or not a `T`.
    pub fn inspect<T: Actor, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let actor = self.actor.upgrade()?;
        let actor = actor.try_borrow().ok()?;
        (*actor).as_any().downcast_ref::<T>().map(f)
    }

    /// Runs `f` with mutable access to the concrete actor type `T`.
    pub fn inspect_mut<T: Actor, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let actor = self.actor.upgrade()?;
        let mut actor = actor.try_borrow_mut().ok()?;
        (*actor).as_any_mut().downcast_mut::<T>().map(f)
    }
}

impl PartialEq for ActorHandle {
    #[inline]
    fn eq(&self, other: &ActorHandle) -> bool {
        self.ptr_eq(other)
    }
}
impl Eq for ActorHandle {}

impl fmt::Debug for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorHandle")
            .field("class", &self.class)
            .field("ptr", &self.actor.as_ptr().cast::<()>())
            .field("valid", &self.is_valid())
            .finish()
    }
}

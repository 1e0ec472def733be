use crate::{ActorClass, ActorHandle, Broadcast, Transform};

/// The runtime that owns actors and knows how to build them.
///
/// The pool asks the world for a new actor whenever a class has no standby
/// instance, and hands evicted standby actors back to it.
pub trait World {
    /// Constructs a new actor of `class` at `transform`.
    ///
    /// This must not fail; a world that cannot construct the actor should
    /// abort rather than return an unusable handle.
    fn spawn_actor(&mut self, class: ActorClass, transform: &Transform) -> ActorHandle;

    /// Called for every still-valid standby actor the pool evicts.
    ///
    /// By default evicted actors are simply forgotten.
    #[inline(always)]
    fn destroy_actor(&mut self, _actor: ActorHandle) {}
}

/// Event fired by the runtime when the current level or world goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelChanged;

/// Channel the runtime announces level transitions on.
pub type LevelSignal = Broadcast<LevelChanged>;

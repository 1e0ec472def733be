/// Lifecycle notifications an actor may opt into while it is pooled.
///
/// Implementing this trait does nothing on its own: the actor must also
/// return `Some(self)` from [`crate::Actor::pool_hooks`]. Every method is a
/// one-way notification and defaults to doing nothing. The pool may call the
/// low-cost-mode pair redundantly, so implementations must tolerate repeats.
///
/// # Example
/// ```
/// use actorpool::{Actor, ActorHandle, PoolHooks, Transform};
///
/// #[derive(Default)]
/// struct Projectile {
///     transform: Transform,
///     live: bool,
/// }
///
/// impl PoolHooks for Projectile {
///     fn on_pool_activate(&mut self) {
///         self.live = true;
///     }
///
///     fn on_pool_deactivate(&mut self) {
///         self.live = false;
///     }
/// }
///
/// impl Actor for Projectile {
///     fn set_tick_enabled(&mut self, _enabled: bool) {}
///     fn set_collision_enabled(&mut self, _enabled: bool) {}
///     fn set_hidden(&mut self, _hidden: bool) {}
///     fn transform(&self) -> Transform {
///         self.transform
///     }
///     fn set_transform(&mut self, transform: &Transform) {
///         self.transform = *transform;
///     }
///     fn set_owner(&mut self, _owner: Option<ActorHandle>) {}
///     fn pool_hooks(&mut self) -> Option<&mut dyn PoolHooks> {
///         Some(self)
///     }
/// }
/// ```
pub trait PoolHooks {
    /// Called after the actor became active, before it is handed out.
    ///
    /// The transform and owner requested by the caller are already applied.
    #[inline(always)]
    fn on_pool_activate(&mut self) {}

    /// Called before the actor is put on standby.
    #[inline(always)]
    fn on_pool_deactivate(&mut self) {}

    /// Called while entering standby, after the standby state is applied.
    #[inline(always)]
    fn enable_low_cost_mode(&mut self) {}

    /// Called while entering the active state, after it is applied.
    #[inline(always)]
    fn disable_low_cost_mode(&mut self) {}
}

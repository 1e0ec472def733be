use crate::DeliveryPolicy;

/// Behavior switches for an [`crate::ActorPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// When set, [`crate::ActorPool::pre_warm`] empties the free lists of
    /// every class before filling the requested one. When unset only the
    /// requested class is emptied first.
    pub pre_warm_clears_all: bool,

    /// Empty the pool whenever the level signal fires.
    pub reset_on_level_change: bool,

    /// How the spawn and return channels treat a failing listener.
    pub listener_failures: DeliveryPolicy,
}

impl PoolConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        PoolConfig {
            pre_warm_clears_all: true,
            reset_on_level_change: true,
            listener_failures: DeliveryPolicy::Isolate,
        }
    }

    /// Sets [`Self::pre_warm_clears_all`].
    pub fn with_pre_warm_clears_all(mut self, clears_all: bool) -> Self {
        self.pre_warm_clears_all = clears_all;
        self
    }

    /// Sets [`Self::reset_on_level_change`].
    pub fn with_reset_on_level_change(mut self, reset: bool) -> Self {
        self.reset_on_level_change = reset;
        self
    }

    /// Sets [`Self::listener_failures`].
    pub fn with_listener_failures(mut self, policy: DeliveryPolicy) -> Self {
        self.listener_failures = policy;
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new()
    }
}

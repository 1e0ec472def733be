use crate::ListenerError;
use alloc::{boxed::Box, vec::Vec};
use core::{
    cell::{Cell, RefCell},
    fmt, mem,
};
use tracing::warn;

/// A boxed listener callback.
pub type Listener<E> = Box<dyn FnMut(&E) -> Result<(), ListenerError>>;

/// Identifies one subscription on a [`Broadcast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// What a [`Broadcast`] does when a listener returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryPolicy {
    /// Log the failure and keep delivering to the remaining listeners.
    #[default]
    Isolate,
    /// Stop delivering the current event at the first failure.
    StopOnError,
}

/// Result of a single [`Broadcast::broadcast`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastOutcome {
    /// Listeners that handled the event without error.
    pub delivered: usize,
    /// Listeners that returned an error.
    pub failed: usize,
}

/// Synchronous fan-out of events to a dynamic list of listeners.
///
/// Subscribing and unsubscribing take `&self`, so a channel can be shared
/// through an `Rc` and listeners may (un)subscribe while an event is being
/// delivered. Listeners added during delivery receive the next event;
/// listeners removed during delivery are dropped once it completes. A
/// listener that panics does not take the channel down with it: the list is
/// restored while unwinding.
pub struct Broadcast<E> {
    listeners: RefCell<Vec<(SubscriptionId, Listener<E>)>>,
    // Ids of the listeners taken out for the delivery in progress.
    in_flight: RefCell<Vec<SubscriptionId>>,
    pending_removals: RefCell<Vec<SubscriptionId>>,
    dispatching: Cell<bool>,
    next_id: Cell<u64>,
    policy: DeliveryPolicy,
}

impl<E> Broadcast<E> {
    /// Creates a channel that isolates listener failures.
    pub fn new() -> Self {
        Self::with_policy(DeliveryPolicy::Isolate)
    }

    /// Creates a channel with the given failure policy.
    pub fn with_policy(policy: DeliveryPolicy) -> Self {
        Broadcast {
            listeners: RefCell::new(Vec::new()),
            in_flight: RefCell::new(Vec::new()),
            pending_removals: RefCell::new(Vec::new()),
            dispatching: Cell::new(false),
            next_id: Cell::new(0),
            policy,
        }
    }

    /// Failure policy of this channel.
    pub fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    /// Registers `listener` and returns the id to unsubscribe it with.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: FnMut(&E) -> Result<(), ListenerError> + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if `id` is not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(index) = listeners.iter().position(|(sub, _)| *sub == id) {
            listeners.remove(index);
            return true;
        }
        if !self.in_flight.borrow().contains(&id) {
            return false;
        }
        let mut pending = self.pending_removals.borrow_mut();
        if pending.contains(&id) {
            return false;
        }
        pending.push(id);
        true
    }

    /// Delivers `event` to every current listener, in subscription order.
    ///
    /// Nested calls on the same channel from inside a listener are dropped.
    pub fn broadcast(&self, event: &E) -> BroadcastOutcome {
        let mut outcome = BroadcastOutcome::default();
        if self.dispatching.replace(true) {
            warn!("nested broadcast on the same channel ignored");
            return outcome;
        }

        let mut dispatch = Dispatch::begin(self);
        for (id, listener) in dispatch.current.iter_mut() {
            if self.pending_removals.borrow().contains(id) {
                continue;
            }
            match listener(event) {
                Ok(()) => outcome.delivered += 1,
                Err(err) => {
                    outcome.failed += 1;
                    warn!(subscription = id.0, error = %err, "listener failed");
                    if self.policy == DeliveryPolicy::StopOnError {
                        break;
                    }
                }
            }
        }
        outcome
    }

    /// Number of subscribed listeners.
    pub fn len(&self) -> usize {
        let in_flight = self.in_flight.borrow().len() - self.pending_removals.borrow().len();
        self.listeners.borrow().len() + in_flight
    }

    /// Returns `true` if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every listener.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
        let in_flight = self.in_flight.borrow();
        let mut pending = self.pending_removals.borrow_mut();
        for id in in_flight.iter() {
            if !pending.contains(id) {
                pending.push(*id);
            }
        }
    }
}

/// Listeners taken out of a [`Broadcast`] for one delivery.
///
/// Dropping it puts them back, also when a listener unwinds.
struct Dispatch<'a, E> {
    channel: &'a Broadcast<E>,
    current: Vec<(SubscriptionId, Listener<E>)>,
}

impl<'a, E> Dispatch<'a, E> {
    fn begin(channel: &'a Broadcast<E>) -> Self {
        let current = mem::take(&mut *channel.listeners.borrow_mut());
        *channel.in_flight.borrow_mut() = current.iter().map(|(id, _)| *id).collect();
        Dispatch { channel, current }
    }
}

impl<E> Drop for Dispatch<'_, E> {
    fn drop(&mut self) {
        let channel = self.channel;
        let mut listeners = channel.listeners.borrow_mut();
        let added = mem::replace(&mut *listeners, mem::take(&mut self.current));
        listeners.extend(added);
        let removed = mem::take(&mut *channel.pending_removals.borrow_mut());
        if !removed.is_empty() {
            listeners.retain(|(id, _)| !removed.contains(id));
        }
        channel.in_flight.borrow_mut().clear();
        channel.dispatching.set(false);
    }
}

impl<E> Default for Broadcast<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Broadcast<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcast")
            .field("listeners", &self.listeners.try_borrow().map(|l| l.len()).ok())
            .field("dispatching", &self.dispatching.get())
            .field("policy", &self.policy)
            .finish()
    }
}

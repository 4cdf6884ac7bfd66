//! Phase transition notifications.
//!
//! Listeners are plain callbacks run synchronously, in subscription order,
//! while the cycle is still inside `tick` or `set_time`. A callback has no
//! access to the bus it lives in, so it cannot subscribe or unsubscribe
//! mid-broadcast.

/// One of the three zero-payload cycle signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseEvent {
    /// Sunrise: the cycle switched to day.
    EnteredDay,
    /// Sunset: the cycle switched to night.
    EnteredNight,
    /// The clock wrapped past midnight and the day counter advanced.
    NewDay,
}

/// Handle returned by [`PhaseEventBus::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(PhaseEvent) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    /// `None` listens to every event.
    filter: Option<PhaseEvent>,
    listener: Listener,
}

/// Ordered multicast list of phase listeners.
#[derive(Default)]
pub struct PhaseEventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl PhaseEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to a single event kind.
    pub fn subscribe<F>(&mut self, event: PhaseEvent, listener: F) -> SubscriptionId
    where
        F: FnMut(PhaseEvent) + Send + Sync + 'static,
    {
        self.push(Some(event), Box::new(listener))
    }

    /// Listen to every event kind.
    pub fn subscribe_all<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(PhaseEvent) + Send + Sync + 'static,
    {
        self.push(None, Box::new(listener))
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Run every matching listener, oldest subscription first.
    pub fn broadcast(&mut self, event: PhaseEvent) {
        for subscription in &mut self.subscriptions {
            if subscription.filter.map_or(true, |f| f == event) {
                (subscription.listener)(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    fn push(&mut self, filter: Option<PhaseEvent>, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            filter,
            listener,
        });
        id
    }
}

impl std::fmt::Debug for PhaseEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseEventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

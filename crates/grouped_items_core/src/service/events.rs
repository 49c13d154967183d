//! Collection change notifications.
//!
//! # Responsibility
//! - Describe structural changes of a display collection.
//! - Fan them out synchronously to registered subscribers.
//!
//! # Invariants
//! - Subscribers run in registration order, inline with the mutating call.
//! - Subscribers only see the change value, never the collection.

use crate::model::entity::EntityId;

/// One structural change. `container == None` means the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionChange {
    Inserted {
        container: Option<EntityId>,
        entity: EntityId,
        index: usize,
    },
    Removed {
        container: Option<EntityId>,
        entity: EntityId,
        index: usize,
    },
    Moved {
        container: Option<EntityId>,
        entity: EntityId,
        from: usize,
        to: usize,
    },
    /// Display label changed; structure untouched.
    Renamed { entity: EntityId },
    /// Whole collection replaced or cleared.
    Reset,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&CollectionChange)>;

/// Ordered subscriber list.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&CollectionChange) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(candidate, _)| *candidate != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn notify(&mut self, change: &CollectionChange) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(change);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

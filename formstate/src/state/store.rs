//! Observable container for [`ValidationState`].
//!
//! All mutation goes through [`StateStore::update`], which applies one
//! closure under the lock and then notifies subscribers with the new
//! [`FormSnapshot`]. The lock is released before any subscriber runs, so a
//! subscriber may call back into the store.
//!
//! Snapshots are delivered strictly in the order their updates were
//! applied. An update made while subscribers are being notified (from a
//! subscriber, or from another thread) only queues its snapshot; whoever is
//! already delivering hands it out after the current one.

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;

use super::{FormSnapshot, ValidationState};

type Subscriber = Arc<dyn Fn(&FormSnapshot) + Send + Sync>;

struct StoreInner {
    snapshot: FormSnapshot,
    subscribers: Vec<(u64, Subscriber)>,
    next_id: u64,
    /// Snapshots not yet handed to subscribers, oldest first.
    pending: VecDeque<(FormSnapshot, Vec<Subscriber>)>,
    /// Some caller is draining `pending`.
    delivering: bool,
}

/// Shared, subscribable validation state.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<Mutex<StoreInner>>,
    changes: Arc<watch::Sender<FormSnapshot>>,
}

impl StateStore {
    /// Create a store holding empty state.
    pub fn new() -> Self {
        let snapshot = FormSnapshot::default();
        let (changes, _) = watch::channel(snapshot.clone());
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                snapshot,
                subscribers: Vec::new(),
                next_id: 0,
                pending: VecDeque::new(),
                delivering: false,
            })),
            changes: Arc::new(changes),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> FormSnapshot {
        self.lock().snapshot.clone()
    }

    /// Read the current state without notifying anyone.
    pub fn read<R>(&self, f: impl FnOnce(&ValidationState) -> R) -> R {
        f(&self.lock().snapshot.state)
    }

    /// Apply a mutation and notify subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut ValidationState) -> R) -> R {
        match self.try_update(|state| Ok::<R, Infallible>(f(state))) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Apply a fallible mutation. Subscribers are notified only on success;
    /// on failure the closure is expected to have left the state untouched.
    ///
    /// If snapshots are already being delivered, this returns once the new
    /// snapshot is queued; the delivering caller notifies subscribers.
    pub fn try_update<R, E>(
        &self,
        f: impl FnOnce(&mut ValidationState) -> Result<R, E>,
    ) -> Result<R, E> {
        let (result, deliver) = {
            let mut inner = self.lock();
            let result = f(&mut inner.snapshot.state)?;
            let snapshot = FormSnapshot::derive(inner.snapshot.state.clone());
            inner.snapshot = snapshot.clone();
            // Published under the lock so the channel never goes backwards.
            self.changes.send_replace(snapshot.clone());

            let subscribers: Vec<Subscriber> =
                inner.subscribers.iter().map(|(_, s)| Arc::clone(s)).collect();
            inner.pending.push_back((snapshot, subscribers));
            let deliver = !inner.delivering;
            inner.delivering = true;
            (result, deliver)
        };
        if deliver {
            self.deliver_pending();
        }
        Ok(result)
    }

    /// Hand out queued snapshots until the queue is empty.
    fn deliver_pending(&self) {
        let mut delivery = Delivery {
            store: self,
            finished: false,
        };
        loop {
            let next = {
                let mut inner = self.lock();
                let next = inner.pending.pop_front();
                if next.is_none() {
                    inner.delivering = false;
                }
                next
            };
            let Some((snapshot, subscribers)) = next else {
                break;
            };
            for subscriber in &subscribers {
                subscriber(&snapshot);
            }
        }
        delivery.finished = true;
    }

    /// Register a subscriber.
    ///
    /// The subscriber receives the current snapshot immediately and every
    /// later one until the returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&FormSnapshot) + Send + Sync + 'static,
    {
        let subscriber: Subscriber = Arc::new(f);
        let (id, current) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Arc::clone(&subscriber)));
            (id, inner.snapshot.clone())
        };
        subscriber(&current);

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Receiver that always holds the latest snapshot.
    pub fn watch(&self) -> watch::Receiver<FormSnapshot> {
        self.changes.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("StateStore")
            .field("snapshot", &inner.snapshot)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// Releases the delivery role if a subscriber panics mid-delivery, so later
/// updates are not queued forever.
struct Delivery<'a> {
    store: &'a StateStore,
    finished: bool,
}

impl Drop for Delivery<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.store.lock().delivering = false;
        }
    }
}

/// Handle to a store subscription. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    store: Weak<Mutex<StoreInner>>,
}

impl Subscription {
    /// Stop receiving snapshots.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            let mut inner = store.lock().unwrap_or_else(PoisonError::into_inner);
            inner.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

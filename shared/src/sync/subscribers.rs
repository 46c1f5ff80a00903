use std::sync::{Arc, Mutex};

use super::change_set::ChangeSet;

pub type SubscriptionHandle = u64;

/// Callback invoked with the Change Set after every completed merge.
pub type ChangeListener = Arc<dyn Fn(&ChangeSet) + Send + Sync>;

// ChangeSubscribers
/// Per-Context subscription list, invoked synchronously after each atomic
/// merge completes.
///
/// Listeners are held behind `Arc` and invoked with the list lock released,
/// so a listener may subscribe or unsubscribe without deadlocking. Merges
/// issued from inside a listener are deferred by the Context, not here.
pub(crate) struct ChangeSubscribers {
    listeners: Mutex<SubscriberList>,
}

struct SubscriberList {
    next_handle: SubscriptionHandle,
    entries: Vec<(SubscriptionHandle, ChangeListener)>,
}

impl ChangeSubscribers {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(SubscriberList {
                next_handle: 0,
                entries: Vec::new(),
            }),
        }
    }

    pub fn subscribe(&self, listener: ChangeListener) -> SubscriptionHandle {
        let Ok(mut list) = self.listeners.lock() else {
            panic!("subscriber list poisoned");
        };
        let handle = list.next_handle;
        list.next_handle += 1;
        list.entries.push((handle, listener));
        handle
    }

    /// Returns whether the handle was still subscribed.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let Ok(mut list) = self.listeners.lock() else {
            panic!("subscriber list poisoned");
        };
        let before = list.entries.len();
        list.entries.retain(|(h, _)| *h != handle);
        list.entries.len() != before
    }

    pub fn notify(&self, changed: &ChangeSet) {
        let snapshot: Vec<ChangeListener> = {
            let Ok(list) = self.listeners.lock() else {
                panic!("subscriber list poisoned");
            };
            list.entries.iter().map(|(_, l)| l.clone()).collect()
        };
        for listener in snapshot {
            listener(changed);
        }
    }
}

use std::{
    collections::{HashSet, VecDeque},
    sync::{Arc, Condvar, Mutex},
    thread::{self, ThreadId},
    time::Duration,
};

use log::{debug, trace};
use serde_json::Value;

use crate::{
    backends::Timer,
    entity::entity_id::EntityId,
    transport::{RawData, Transport},
};

use super::{
    change_set::ChangeSet,
    error::SyncError,
    snapshot::Snapshot,
    subscribers::{ChangeListener, ChangeSubscribers, SubscriptionHandle},
};

// EntityContext
/// Per-entity owner of canonical remote state and synchronization logic.
///
/// All snapshot mutation funnels through here: full refreshes, applied
/// deltas, pushed notifications, and acknowledged single-property writes.
/// Fields sharing a Context never need locks of their own.
pub struct EntityContext {
    kind_name: &'static str,
    id: EntityId,
    transport: Arc<dyn Transport>,
    state: Mutex<ContextState>,
    fetch_gate: Mutex<FetchGate>,
    fetch_done: Condvar,
    merge_queue: Mutex<MergeQueue>,
    subscribers: ChangeSubscribers,
}

/// Snapshot and expiry share one lock: a merge replaces the visible state
/// and stamps freshness as a single atomic step.
struct ContextState {
    snapshot: Snapshot,
    expiry: Timer,
}

/// Single-flight bookkeeping for fetch coalescing. `attempt` counts started
/// fetches; `last_result` records the outcome of the most recently completed
/// one so waiters can observe the result of the attempt they joined.
struct FetchGate {
    in_flight: bool,
    attempt: u64,
    last_result: Option<(u64, Result<(), SyncError>)>,
}

/// Merges triggered from inside a change notification on the same thread
/// are parked here and applied once the current merge finishes. Tracked per
/// thread: a concurrent merge from another thread is ordinary contention,
/// not re-entrancy.
struct MergeQueue {
    notifying: HashSet<ThreadId>,
    pending: VecDeque<(RawData, bool)>,
}

impl EntityContext {
    pub fn new(
        kind_name: &'static str,
        id: EntityId,
        transport: Arc<dyn Transport>,
        expiry_window: Duration,
    ) -> Self {
        Self {
            kind_name,
            id,
            transport,
            state: Mutex::new(ContextState {
                snapshot: Snapshot::new(),
                expiry: Timer::new(expiry_window),
            }),
            fetch_gate: Mutex::new(FetchGate {
                in_flight: false,
                attempt: 0,
                last_result: None,
            }),
            fetch_done: Condvar::new(),
            merge_queue: Mutex::new(MergeQueue {
                notifying: HashSet::new(),
                pending: VecDeque::new(),
            }),
            subscribers: ChangeSubscribers::new(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind_name
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// True if no full refresh has occurred yet, or the expiry window has
    /// passed since the last one. Partial merges never establish freshness.
    pub fn is_stale(&self) -> bool {
        self.lock_state().expiry.has_elapsed()
    }

    /// Forces the next freshness check to fetch, regardless of snapshot age.
    pub fn expire_now(&self) {
        self.lock_state().expiry.expire_now();
    }

    /// If stale, performs one blocking fetch through the transport and
    /// merges the full result. Concurrent callers during an in-flight fetch
    /// wait for that fetch and observe its result instead of issuing their
    /// own; a failed fetch leaves snapshot and timer unchanged and is
    /// reported to every caller of that attempt.
    pub fn ensure_fresh(&self) -> Result<(), SyncError> {
        if !self.is_stale() {
            return Ok(());
        }

        let Ok(mut gate) = self.fetch_gate.lock() else {
            panic!("fetch gate poisoned");
        };
        loop {
            // staleness may have been resolved while waiting for the gate
            if !self.is_stale() {
                return Ok(());
            }

            if gate.in_flight {
                let attempt = gate.attempt;
                trace!(
                    "{} {}: coalescing onto in-flight fetch #{}",
                    self.kind_name, self.id, attempt
                );
                while gate.in_flight && gate.attempt == attempt {
                    let Ok(next) = self.fetch_done.wait(gate) else {
                        panic!("fetch gate poisoned");
                    };
                    gate = next;
                }
                if let Some((done, result)) = &gate.last_result {
                    if *done == attempt {
                        if let Err(err) = result {
                            return Err(err.clone());
                        }
                    }
                }
                continue;
            }

            gate.in_flight = true;
            gate.attempt += 1;
            let attempt = gate.attempt;
            drop(gate);

            let result = self.fetch_and_merge(attempt);

            let Ok(mut finished) = self.fetch_gate.lock() else {
                panic!("fetch gate poisoned");
            };
            finished.in_flight = false;
            finished.last_result = Some((attempt, result.clone()));
            self.fetch_done.notify_all();
            return result;
        }
    }

    fn fetch_and_merge(&self, attempt: u64) -> Result<(), SyncError> {
        debug!("{} {}: issuing fetch #{}", self.kind_name, self.id, attempt);
        let data = self
            .transport
            .fetch(self.kind_name, &self.id)
            .map_err(SyncError::FetchFailed)?;
        self.merge(&data, true);
        Ok(())
    }

    /// Folds `incoming` into the snapshot: computes the Change Set against
    /// the current state, replaces only the provided properties, resets the
    /// expiry timer only for a full snapshot, then raises the Change Set to
    /// subscribers.
    ///
    /// A merge issued from inside a notification handler on the same thread
    /// is deferred until the current merge finishes, then applied with its
    /// own notification.
    pub fn merge(&self, incoming: &RawData, is_full_snapshot: bool) {
        {
            let Ok(mut queue) = self.merge_queue.lock() else {
                panic!("merge queue poisoned");
            };
            if queue.notifying.contains(&thread::current().id()) {
                queue
                    .pending
                    .push_back((incoming.clone(), is_full_snapshot));
                return;
            }
        }
        self.apply_and_notify(incoming.clone(), is_full_snapshot);
    }

    fn apply_and_notify(&self, mut incoming: RawData, mut is_full_snapshot: bool) {
        loop {
            let changed = {
                let mut state = self.lock_state();
                let changed = state.snapshot.apply(&incoming);
                if is_full_snapshot {
                    state.expiry.reset();
                }
                changed
            };
            trace!(
                "{} {}: merged {} properties, {} changed",
                self.kind_name,
                self.id,
                incoming.len(),
                changed.len()
            );

            {
                let Ok(mut queue) = self.merge_queue.lock() else {
                    panic!("merge queue poisoned");
                };
                queue.notifying.insert(thread::current().id());
            }
            self.subscribers.notify(&changed);

            let next = {
                let Ok(mut queue) = self.merge_queue.lock() else {
                    panic!("merge queue poisoned");
                };
                match queue.pending.pop_front() {
                    Some(deferred) => Some(deferred),
                    None => {
                        queue.notifying.remove(&thread::current().id());
                        None
                    }
                }
            };
            match next {
                Some((data, full)) => {
                    incoming = data;
                    is_full_snapshot = full;
                }
                None => break,
            }
        }
    }

    /// Issues a single-property write through the transport. On success the
    /// acknowledged value is folded into the snapshot as a one-property
    /// merge; the expiry timer is untouched since the other properties
    /// remain unconfirmed. On failure the snapshot is unchanged.
    pub fn queue_write(&self, property: &str, value: Value) -> Result<(), SyncError> {
        self.transport
            .write(self.kind_name, &self.id, property, &value)
            .map_err(SyncError::WriteFailed)?;
        debug!("{} {}: write of `{}` acknowledged", self.kind_name, self.id, property);

        let mut single = RawData::new();
        single.insert(property.to_string(), value);
        self.merge(&single, false);
        Ok(())
    }

    /// Issues the remote deletion for this entity. Cache removal is the
    /// proxy's responsibility once this succeeds.
    pub fn delete_remote(&self) -> Result<(), SyncError> {
        self.transport
            .delete(self.kind_name, &self.id)
            .map_err(SyncError::DeleteFailed)
    }

    /// One property of the current snapshot, without freshness enforcement.
    pub fn property(&self, name: &str) -> Option<Value> {
        self.lock_state().snapshot.get(name).cloned()
    }

    /// A copy of the current snapshot, without freshness enforcement.
    pub fn snapshot(&self) -> Snapshot {
        self.lock_state().snapshot.clone()
    }

    pub fn subscribe(&self, listener: ChangeListener) -> SubscriptionHandle {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.subscribers.unsubscribe(handle)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ContextState> {
        let Ok(state) = self.state.lock() else {
            panic!("context state poisoned");
        };
        state
    }
}

use std::{
    any::Any,
    collections::HashMap,
    sync::{Arc, RwLock},
};

use log::debug;

use crate::{
    entity::{entity_id::EntityId, entity_kind::EntityKind},
    sync::context::EntityContext,
    transport::RawData,
};

/// A live proxy held by the cache.
///
/// Implemented by every concrete resource type; gives the cache a route
/// into the instance's Context for externally-sourced merges.
pub trait CachedEntity: Send + Sync {
    fn context(&self) -> &Arc<EntityContext>;
}

/// One cached instance: the concrete proxy plus a direct handle to its
/// Context so external deltas can be routed without downcasting.
struct CacheEntry {
    context: Arc<EntityContext>,
    instance: Arc<dyn Any + Send + Sync>,
}

// EntityCache
/// Process-wide map from (kind, id) to the single live proxy instance; the
/// single source of truth for "is this entity already known".
pub struct EntityCache {
    entries: RwLock<HashMap<(EntityKind, EntityId), CacheEntry>>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the existing instance for `E`'s kind and `id`, or constructs
    /// one via `construct` and registers it. Under concurrent callers the
    /// construction is observed at most once: a losing racer's candidate is
    /// discarded in favor of the winner's.
    pub fn find_or_create<E, F, Err>(&self, id: &EntityId, construct: F) -> Result<Arc<E>, Err>
    where
        E: CachedEntity + Send + Sync + 'static,
        F: FnOnce() -> Result<Arc<E>, Err>,
    {
        let kind = EntityKind::of::<E>();
        if let Some(existing) = self.get::<E>(&kind, id) {
            return Ok(existing);
        }

        let candidate = construct()?;

        let Ok(mut entries) = self.entries.write() else {
            panic!("entity cache poisoned");
        };
        if let Some(entry) = entries.get(&(kind, id.clone())) {
            // lost the registration race; use the winner's instance
            return Ok(Self::downcast::<E>(entry));
        }
        debug!("caching {} {}", candidate.context().kind_name(), id);
        entries.insert(
            (kind, id.clone()),
            CacheEntry {
                context: candidate.context().clone(),
                instance: candidate.clone(),
            },
        );
        Ok(candidate)
    }

    /// Routes externally-sourced partial data (applied deltas, pushed
    /// notifications) into an existing instance's Context. With no instance
    /// to update, the data is dropped.
    pub fn merge_external(&self, kind: &EntityKind, id: &EntityId, partial: &RawData) {
        let context = {
            let Ok(entries) = self.entries.read() else {
                panic!("entity cache poisoned");
            };
            entries
                .get(&(*kind, id.clone()))
                .map(|entry| entry.context.clone())
        };
        // merge outside the map lock: listeners may call back into the cache
        match context {
            Some(context) => context.merge(partial, false),
            None => debug!("dropping external update for unknown entity {}", id),
        }
    }

    /// Deregisters an instance, typically after its remote deletion.
    /// Returns whether it was present.
    pub fn remove(&self, kind: &EntityKind, id: &EntityId) -> bool {
        let Ok(mut entries) = self.entries.write() else {
            panic!("entity cache poisoned");
        };
        let removed = entries.remove(&(*kind, id.clone()));
        if let Some(entry) = &removed {
            debug!("evicting {} {}", entry.context.kind_name(), id);
        }
        removed.is_some()
    }

    pub fn contains(&self, kind: &EntityKind, id: &EntityId) -> bool {
        let Ok(entries) = self.entries.read() else {
            panic!("entity cache poisoned");
        };
        entries.contains_key(&(*kind, id.clone()))
    }

    pub fn len(&self) -> usize {
        let Ok(entries) = self.entries.read() else {
            panic!("entity cache poisoned");
        };
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get<E: Send + Sync + 'static>(&self, kind: &EntityKind, id: &EntityId) -> Option<Arc<E>> {
        let Ok(entries) = self.entries.read() else {
            panic!("entity cache poisoned");
        };
        entries
            .get(&(*kind, id.clone()))
            .map(|entry| Self::downcast::<E>(entry))
    }

    fn downcast<E: Send + Sync + 'static>(entry: &CacheEntry) -> Arc<E> {
        let Ok(instance) = entry.instance.clone().downcast::<E>() else {
            panic!("cache entry holds a different type for this kind");
        };
        instance
    }
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

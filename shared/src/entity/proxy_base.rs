use std::{hash::Hash, sync::Arc};

use crate::{
    cache::entity_cache::EntityCache,
    sync::{context::EntityContext, error::SyncError},
};

use super::{entity_id::EntityId, entity_kind::EntityKind};

// ProxyBase
/// Identity and synchronization plumbing embedded by every concrete proxy
/// type: the entity's kind and id, its Context, and a handle back to the
/// cache that owns it.
///
/// Equality is by (kind, id) alone, regardless of snapshot content, so
/// deduplication works even between stale copies.
pub struct ProxyBase {
    kind: EntityKind,
    id: EntityId,
    context: Arc<EntityContext>,
    cache: Arc<EntityCache>,
}

impl ProxyBase {
    pub fn new(
        kind: EntityKind,
        id: EntityId,
        context: Arc<EntityContext>,
        cache: Arc<EntityCache>,
    ) -> Self {
        Self {
            kind,
            id,
            context,
            cache,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn context(&self) -> &Arc<EntityContext> {
        &self.context
    }

    /// Fetches a full snapshot now, regardless of the expiry window.
    pub fn refresh(&self) -> Result<(), SyncError> {
        self.context.expire_now();
        self.context.ensure_fresh()
    }

    /// Issues the remote deletion and, on success, removes this entity from
    /// the cache. Reads through handles that outlive the deletion are the
    /// caller's error; the engine does not poison them.
    pub fn delete(&self) -> Result<(), SyncError> {
        self.context.delete_remote()?;
        self.cache.remove(&self.kind, &self.id);
        Ok(())
    }
}

impl PartialEq for ProxyBase {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

impl Eq for ProxyBase {}

impl Hash for ProxyBase {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.id.hash(state);
    }
}

use std::sync::Arc;

use tether_shared::{
    CachedEntity, ChangeSet, EntityContext, EntityId, EntityKind, EnumerationRule, Field,
    FieldError, NonEmptyRule, NonNegativeRule, ProxyBase, RawData, Registry, RegistryError,
    SubscriptionHandle, SymbolMap, SyncError,
};

/// Completion state of a checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckItemState {
    Incomplete,
    Complete,
    /// Wire tokens this client does not recognize degrade here.
    Unknown,
}

fn state_map() -> SymbolMap<CheckItemState> {
    SymbolMap::new(
        CheckItemState::Unknown,
        &[
            (CheckItemState::Incomplete, "incomplete"),
            (CheckItemState::Complete, "complete"),
        ],
    )
    .expect("check item state pairs are bijective")
}

// CheckItem
/// An item in a remote checklist.
pub struct CheckItem {
    base: ProxyBase,
    name: Field<String>,
    pos: Field<i64>,
    state: Field<CheckItemState>,
}

impl CheckItem {
    /// The canonical instance for `id`, constructed and cached on first use.
    pub fn find_or_create(registry: &Registry, id: &EntityId) -> Result<Arc<Self>, RegistryError> {
        registry
            .cache()
            .find_or_create(id, || Self::build(registry, id))
    }

    fn build(registry: &Registry, id: &EntityId) -> Result<Arc<Self>, RegistryError> {
        let context = registry.context_for::<Self>(id)?;
        let base = ProxyBase::new(
            EntityKind::of::<Self>(),
            id.clone(),
            context.clone(),
            registry.cache().clone(),
        );
        Ok(Arc::new(Self {
            name: Field::new(context.clone(), "name").add_rule(NonEmptyRule),
            pos: Field::new(context.clone(), "pos").add_rule(NonNegativeRule),
            state: Field::with_symbols(context, "state", state_map())
                .add_rule(EnumerationRule::new(state_map())),
            base,
        }))
    }

    pub fn id(&self) -> &EntityId {
        self.base.id()
    }

    pub fn name(&self) -> Result<Option<String>, FieldError> {
        self.name.get()
    }

    pub fn set_name(&self, name: impl Into<String>) -> Result<(), FieldError> {
        self.name.set(name.into())
    }

    pub fn pos(&self) -> Result<Option<i64>, FieldError> {
        self.pos.get()
    }

    pub fn set_pos(&self, pos: i64) -> Result<(), FieldError> {
        self.pos.set(pos)
    }

    pub fn state(&self) -> Result<Option<CheckItemState>, FieldError> {
        self.state.get()
    }

    pub fn set_state(&self, state: CheckItemState) -> Result<(), FieldError> {
        self.state.set(state)
    }

    /// Fetches a full snapshot now, regardless of the expiry window.
    pub fn refresh(&self) -> Result<(), SyncError> {
        self.base.refresh()
    }

    /// Deletes the item remotely and evicts this instance from the cache.
    pub fn delete(&self) -> Result<(), SyncError> {
        self.base.delete()
    }

    /// Applies partial data carried by an event concerning this item.
    pub fn apply_event(&self, partial: &RawData) {
        self.base.context().merge(partial, false);
    }

    /// Invokes `listener` with the Change Set after every merge.
    pub fn on_updated(
        &self,
        listener: impl Fn(&ChangeSet) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        self.base.context().subscribe(Arc::new(listener))
    }

    pub fn remove_updated(&self, handle: SubscriptionHandle) -> bool {
        self.base.context().unsubscribe(handle)
    }
}

impl CachedEntity for CheckItem {
    fn context(&self) -> &Arc<EntityContext> {
        self.base.context()
    }
}

impl PartialEq for CheckItem {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl Eq for CheckItem {}

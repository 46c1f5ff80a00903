use std::{sync::Arc, time::Duration};

use log::warn;

use crate::{
    cache::entity_cache::EntityCache,
    entity::{
        entity_id::EntityId,
        entity_kind::{EntityKind, EntityKinds},
    },
    sync::context::EntityContext,
    transport::{RawData, Transport},
};

pub mod error;
pub use error::RegistryError;

/// Staleness window applied to entities unless configured otherwise.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(60);

// Registry
/// Explicitly-initialized owner of engine configuration: the transport
/// handle, the expiry window, the registered entity kinds, and the
/// process-wide entity cache.
///
/// Built up front, then locked; builder methods are rejected afterwards.
/// Passed by reference (or `Arc`) to whatever needs it — there is no
/// implicit global state.
pub struct Registry {
    kinds: EntityKinds,
    cache: Arc<EntityCache>,
    transport: Option<Arc<dyn Transport>>,
    expiry: Duration,
    locked: bool,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            kinds: EntityKinds::new(),
            cache: Arc::new(EntityCache::new()),
            transport: None,
            expiry: DEFAULT_EXPIRY,
            locked: false,
        }
    }
}

impl Registry {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn transport(&mut self, transport: Arc<dyn Transport>) -> &mut Self {
        self.check_lock();
        self.transport = Some(transport);
        self
    }

    pub fn expiry(&mut self, window: Duration) -> &mut Self {
        self.check_lock();
        self.expiry = window;
        self
    }

    /// Registers the concrete resource type `E` under its wire name.
    ///
    /// # Panics
    ///
    /// Panics on duplicate registration or a locked registry. Consider
    /// using `try_add_entity` for non-panicking error handling.
    pub fn add_entity<E: 'static>(&mut self, wire_name: &'static str) -> &mut Self {
        self.try_add_entity::<E>(wire_name)
            .expect("add_entity failed")
    }

    pub fn lock(&mut self) {
        self.check_lock();
        self.locked = true;
    }

    // Non-panicking builder methods

    pub fn try_transport(
        &mut self,
        transport: Arc<dyn Transport>,
    ) -> Result<&mut Self, RegistryError> {
        self.try_check_lock()?;
        self.transport = Some(transport);
        Ok(self)
    }

    pub fn try_expiry(&mut self, window: Duration) -> Result<&mut Self, RegistryError> {
        self.try_check_lock()?;
        self.expiry = window;
        Ok(self)
    }

    pub fn try_add_entity<E: 'static>(
        &mut self,
        wire_name: &'static str,
    ) -> Result<&mut Self, RegistryError> {
        self.try_check_lock()?;
        self.kinds.add_kind::<E>(wire_name)?;
        Ok(self)
    }

    pub fn try_lock(&mut self) -> Result<(), RegistryError> {
        self.try_check_lock()?;
        self.locked = true;
        Ok(())
    }

    /// Checks whether the registry can still be modified, panicking if not.
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Registry already locked!");
        }
    }

    /// Checks whether the registry can still be modified.
    pub fn try_check_lock(&self) -> Result<(), RegistryError> {
        if self.locked {
            Err(RegistryError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }

    // Runtime surface; available locked or not

    pub fn cache(&self) -> &Arc<EntityCache> {
        &self.cache
    }

    pub fn kinds(&self) -> &EntityKinds {
        &self.kinds
    }

    pub fn expiry_window(&self) -> Duration {
        self.expiry
    }

    /// Constructs a Context for one entity of the registered type `E`,
    /// wired to this registry's transport and expiry window.
    pub fn context_for<E: 'static>(&self, id: &EntityId) -> Result<Arc<EntityContext>, RegistryError> {
        let kind = EntityKind::of::<E>();
        let Some(kind_name) = self.kinds.name_from_kind(&kind) else {
            return Err(RegistryError::UnknownKind);
        };
        let Some(transport) = self.transport.clone() else {
            return Err(RegistryError::MissingTransport);
        };
        Ok(Arc::new(EntityContext::new(
            kind_name,
            id.clone(),
            transport,
            self.expiry,
        )))
    }

    /// Entry point for applied deltas and pushed notifications: translates
    /// the wire name and routes the partial data into the cached instance,
    /// if any. Unregistered kinds are dropped loudly — that is a
    /// configuration gap, not normal cache churn.
    pub fn apply_delta(&self, kind_name: &str, id: &EntityId, partial: &RawData) {
        match self.kinds.kind_from_name(kind_name) {
            Some(kind) => self.cache.merge_external(&kind, id, partial),
            None => warn!("dropping delta for unregistered kind `{kind_name}`"),
        }
    }
}

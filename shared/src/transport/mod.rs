pub mod error;

use serde_json::{Map, Value};

use crate::entity::entity_id::EntityId;

/// Remote-shaped property data, keyed by property name.
///
/// A full fetch yields a complete, self-consistent set; deltas and pushed
/// notifications yield any subset.
pub type RawData = Map<String, Value>;

/// The wire collaborator the engine issues all remote operations through.
///
/// Implementations own verbs, URLs, authentication, and timeout policy; the
/// engine treats a timeout as any other failure. All calls block the calling
/// thread.
pub trait Transport: Send + Sync {
    /// Retrieves the complete property set for one entity.
    fn fetch(&self, kind_name: &str, id: &EntityId) -> Result<RawData, error::TransportError>;

    /// Updates a single property of one entity.
    fn write(
        &self,
        kind_name: &str,
        id: &EntityId,
        property: &str,
        value: &Value,
    ) -> Result<(), error::TransportError>;

    /// Deletes one entity remotely.
    fn delete(&self, kind_name: &str, id: &EntityId) -> Result<(), error::TransportError>;
}

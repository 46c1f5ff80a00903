use thiserror::Error;

/// Errors that can occur during registry configuration and lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Registry is locked and cannot be modified
    #[error("Registry is already locked and cannot be modified. Registry.lock() has been called and no further changes are allowed")]
    AlreadyLocked,

    /// No transport collaborator was configured before use
    #[error("No transport configured. Must call `transport()` during registry initialization")]
    MissingTransport,

    /// An entity kind or wire name was registered twice
    #[error("Entity kind `{name}` conflicts with an existing registration. Wire names and types must be unique")]
    DuplicateKind { name: &'static str },

    /// The entity type was never registered
    #[error("Entity kind not registered. Must call `add_entity()` during registry initialization")]
    UnknownKind,
}

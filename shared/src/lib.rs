//! # Tether Shared
//! The identity & synchronization engine underlying the tether resource
//! crates: canonical one-instance-per-ID proxies, lazily fetched and
//! time-expired snapshots, validated write-through fields, and partial-update
//! merging from refreshes, applied deltas, and pushed notifications.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod backends;
mod cache;
mod entity;
mod field;
mod registry;
mod sync;
mod transport;

pub use backends::Timer;
pub use cache::entity_cache::{CachedEntity, EntityCache};
pub use entity::{
    entity_id::EntityId,
    entity_kind::{EntityKind, EntityKinds},
    proxy_base::ProxyBase,
};
pub use field::{
    codec::{FieldCodec, JsonCodec, SymbolCodec},
    error::{FieldError, SymbolMapError},
    field::Field,
    symbol_map::SymbolMap,
    validation::{EnumerationRule, FormatRule, MinLengthRule, NonEmptyRule, NonNegativeRule, Rule},
};
pub use registry::{error::RegistryError, Registry};
pub use sync::{
    change_set::ChangeSet,
    context::EntityContext,
    error::SyncError,
    snapshot::Snapshot,
    subscribers::{ChangeListener, SubscriptionHandle},
};
pub use transport::{error::TransportError, RawData, Transport};

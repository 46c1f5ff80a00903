use thiserror::Error;

use crate::transport::error::TransportError;

/// Failures surfaced by Context synchronization operations.
///
/// Nothing is retried inside the engine; every variant is recoverable by the
/// caller re-attempting the operation. Clone + PartialEq so one in-flight
/// fetch failure can propagate to every coalesced waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A full refresh could not be obtained; the snapshot and expiry timer
    /// are unchanged
    #[error("Fetch failed, local snapshot preserved: {0}")]
    FetchFailed(#[source] TransportError),

    /// A single-property write was not acknowledged; the snapshot is
    /// unchanged (no optimistic update is applied before acknowledgment)
    #[error("Write failed, local snapshot preserved: {0}")]
    WriteFailed(#[source] TransportError),

    /// A remote deletion was not acknowledged; the instance stays cached
    #[error("Delete failed, instance stays cached: {0}")]
    DeleteFailed(#[source] TransportError),
}

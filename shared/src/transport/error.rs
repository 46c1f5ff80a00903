use thiserror::Error;

/// Errors surfaced by a transport collaborator.
///
/// Clone + PartialEq so a single failed fetch can be reported to every
/// caller coalesced onto it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The remote endpoint could not be reached
    #[error("Could not reach remote endpoint: {reason}")]
    Unreachable { reason: String },

    /// The remote endpoint rejected the request
    #[error("Remote endpoint rejected the request with status {status}: {reason}")]
    Rejected { status: u16, reason: String },

    /// The operation exceeded the transport's own timeout policy
    #[error("Transport operation timed out after {millis}ms")]
    TimedOut { millis: u64 },

    /// The response body could not be interpreted as property data
    #[error("Malformed response body: {reason}")]
    MalformedResponse { reason: String },
}

use thiserror::Error;

use crate::sync::error::SyncError;

/// Errors that can occur during symbol map operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolMapError {
    /// An outbound lookup was attempted for a symbol that was never
    /// registered. Unlike inbound tokens, this is a programming error, not
    /// untrusted input, so it does not degrade to a sentinel
    #[error("Symbol `{symbol}` was never registered with this map")]
    UnmappedSymbol { symbol: String },

    /// The same symbol appeared twice in the registration pairs
    #[error("Symbol `{symbol}` registered twice. Pairs must be unique in both directions")]
    DuplicateSymbol { symbol: String },

    /// The same wire token appeared twice in the registration pairs
    #[error("Wire token `{token}` registered twice. Pairs must be unique in both directions")]
    DuplicateToken { token: &'static str },

    /// The distinguished unknown symbol may not carry a wire token
    #[error("The unknown sentinel symbol must not appear in the registration pairs")]
    UnknownRegistered,
}

/// Errors that can occur during Field operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A rule in the field's validation chain rejected the value before any
    /// network call was made
    #[error("Validation failed for `{property}`: {message}")]
    Validation { property: String, message: String },

    /// The snapshot value does not fit the field's type
    #[error("Could not decode `{property}` from its wire value: {reason}")]
    Decode { property: String, reason: String },

    /// The value could not be converted to a wire value
    #[error("Could not encode `{property}` for the wire: {reason}")]
    Encode { property: String, reason: String },

    /// Outbound symbol lookup failed
    #[error(transparent)]
    Symbol(#[from] SymbolMapError),

    /// The underlying synchronization operation failed
    #[error(transparent)]
    Sync(#[from] SyncError),
}

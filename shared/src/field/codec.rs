use std::{fmt, hash::Hash};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{error::FieldError, symbol_map::SymbolMap};

/// The seam between a field's Rust type and the wire value stored in its
/// Context's snapshot.
pub trait FieldCodec<T>: Send + Sync {
    fn encode(&self, property: &str, value: &T) -> Result<Value, FieldError>;
    fn decode(&self, property: &str, value: &Value) -> Result<T, FieldError>;
}

// JsonCodec
/// Serde round-trip, for fields whose type maps directly onto its wire
/// shape. Decode failures surface as errors: wire drift is hostile input,
/// not a crash.
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> FieldCodec<T> for JsonCodec {
    fn encode(&self, property: &str, value: &T) -> Result<Value, FieldError> {
        serde_json::to_value(value).map_err(|err| FieldError::Encode {
            property: property.to_string(),
            reason: err.to_string(),
        })
    }

    fn decode(&self, property: &str, value: &Value) -> Result<T, FieldError> {
        serde_json::from_value(value.clone()).map_err(|err| FieldError::Decode {
            property: property.to_string(),
            reason: err.to_string(),
        })
    }
}

// SymbolCodec
/// Symbol-map translation for enumerated fields. Inbound values that are
/// not a registered token (including non-strings) degrade to the map's
/// unknown sentinel; outbound unregistered symbols are an error.
pub struct SymbolCodec<S> {
    map: SymbolMap<S>,
}

impl<S: Copy + Eq + Hash + fmt::Debug> SymbolCodec<S> {
    pub fn new(map: SymbolMap<S>) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &SymbolMap<S> {
        &self.map
    }
}

impl<S: Copy + Eq + Hash + fmt::Debug + Send + Sync> FieldCodec<S> for SymbolCodec<S> {
    fn encode(&self, _property: &str, value: &S) -> Result<Value, FieldError> {
        let token = self.map.to_wire(*value)?;
        Ok(Value::String(token.to_string()))
    }

    fn decode(&self, _property: &str, value: &Value) -> Result<S, FieldError> {
        match value {
            Value::String(token) => Ok(self.map.to_symbol(token)),
            _ => Ok(self.map.unknown()),
        }
    }
}

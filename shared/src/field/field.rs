use std::{fmt, hash::Hash, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::sync::context::EntityContext;

use super::{
    codec::{FieldCodec, JsonCodec, SymbolCodec},
    error::FieldError,
    symbol_map::SymbolMap,
    validation::Rule,
};

// Field
/// A single observable, validated, lazily-synchronized attribute of an
/// entity, bound at construction to one Context and one property name.
///
/// Reads delegate staleness handling to the Context; writes validate
/// locally, go through the transport, and are immediately visible to a
/// subsequent read once acknowledged (write-through).
pub struct Field<T> {
    context: Arc<EntityContext>,
    name: &'static str,
    codec: Box<dyn FieldCodec<T>>,
    rules: Vec<Box<dyn Rule<T>>>,
}

impl<T> Field<T> {
    /// A field whose type maps directly onto its wire shape.
    pub fn new(context: Arc<EntityContext>, name: &'static str) -> Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        Self {
            context,
            name,
            codec: Box::new(JsonCodec),
            rules: Vec::new(),
        }
    }

    /// An enumerated field translated through a symbol map.
    pub fn with_symbols(context: Arc<EntityContext>, name: &'static str, map: SymbolMap<T>) -> Self
    where
        T: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            context,
            name,
            codec: Box::new(SymbolCodec::new(map)),
            rules: Vec::new(),
        }
    }

    /// Appends a rule to the validation chain. Rules run in the order they
    /// were added.
    pub fn add_rule(mut self, rule: impl Rule<T> + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ensures the Context is fresh, then decodes the bound property from
    /// the snapshot. An absent or null property is `None`.
    pub fn get(&self) -> Result<Option<T>, FieldError> {
        self.context.ensure_fresh()?;
        self.local()
    }

    /// Decodes the bound property from the current snapshot without
    /// enforcing freshness.
    pub fn local(&self) -> Result<Option<T>, FieldError> {
        match self.context.property(self.name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => self.codec.decode(self.name, &value).map(Some),
        }
    }

    /// Runs the validation chain in order, stopping at the first violated
    /// rule; on success issues the write through the Context. A failed
    /// validation mutates nothing and issues no transport call.
    pub fn set(&self, value: T) -> Result<(), FieldError> {
        for rule in &self.rules {
            if let Err(message) = rule.check(&value) {
                return Err(FieldError::Validation {
                    property: self.name.to_string(),
                    message,
                });
            }
        }
        let wire = self.codec.encode(self.name, &value)?;
        self.context.queue_write(self.name, wire)?;
        Ok(())
    }
}

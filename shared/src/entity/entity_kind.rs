use std::{any::TypeId, collections::HashMap};

use crate::registry::error::RegistryError;

// EntityKind
/// Process-unique token identifying a concrete resource type.
#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub struct EntityKind(TypeId);

impl From<TypeId> for EntityKind {
    fn from(type_id: TypeId) -> Self {
        Self(type_id)
    }
}

impl EntityKind {
    pub fn of<E: 'static>() -> Self {
        Self(TypeId::of::<E>())
    }
}

// EntityKinds
/// Registry of resource types known to the engine, translating between a
/// kind token and the wire name external delta sources address entities by.
pub struct EntityKinds {
    kind_to_name: HashMap<EntityKind, &'static str>,
    name_to_kind: HashMap<&'static str, EntityKind>,
}

impl EntityKinds {
    pub fn new() -> Self {
        Self {
            kind_to_name: HashMap::new(),
            name_to_kind: HashMap::new(),
        }
    }

    /// Registers `E` under `wire_name`. Both the type and the name must be
    /// unregistered so far.
    pub fn add_kind<E: 'static>(&mut self, wire_name: &'static str) -> Result<(), RegistryError> {
        let kind = EntityKind::of::<E>();
        if self.kind_to_name.contains_key(&kind) || self.name_to_kind.contains_key(wire_name) {
            return Err(RegistryError::DuplicateKind { name: wire_name });
        }
        self.kind_to_name.insert(kind, wire_name);
        self.name_to_kind.insert(wire_name, kind);
        Ok(())
    }

    pub fn kind_from_name(&self, wire_name: &str) -> Option<EntityKind> {
        self.name_to_kind.get(wire_name).copied()
    }

    pub fn name_from_kind(&self, kind: &EntityKind) -> Option<&'static str> {
        self.kind_to_name.get(kind).copied()
    }

    pub fn len(&self) -> usize {
        self.kind_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kind_to_name.is_empty()
    }
}

impl Default for EntityKinds {
    fn default() -> Self {
        Self::new()
    }
}

use std::collections::BTreeMap;

use serde_json::Value;

use crate::transport::RawData;

use super::change_set::ChangeSet;

// Snapshot
/// The last-known-good remote state of one entity: a versionless mapping
/// from property name to wire-shaped value.
///
/// Mutated only through [`Snapshot::apply`]; the owning Context serializes
/// applies so no reader ever observes a partially-folded update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    properties: BTreeMap<String, Value>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self {
            properties: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Folds `incoming` into the snapshot, replacing only the provided
    /// properties, and returns the names whose values differ from (or are
    /// new versus) the prior state, in incoming order.
    pub fn apply(&mut self, incoming: &RawData) -> ChangeSet {
        let mut changed = ChangeSet::new();
        for (name, value) in incoming {
            match self.properties.get(name) {
                Some(existing) if existing == value => {}
                _ => {
                    self.properties.insert(name.clone(), value.clone());
                    changed.push(name.clone());
                }
            }
        }
        changed
    }

    /// The snapshot's current contents as raw property data.
    pub fn to_raw(&self) -> RawData {
        self.properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

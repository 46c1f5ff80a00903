use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use serde_json::Value;

use tether_client::{CheckItem, Member};
use tether_shared::{EntityId, RawData, Registry, Transport, TransportError};

// ScriptedRemote
/// In-memory stand-in for the remote service: per-entity scripted data,
/// recorded writes, call counters, and configurable latency/failure.
pub struct ScriptedRemote {
    entities: Mutex<HashMap<(String, String), RawData>>,
    fetch_calls: AtomicUsize,
    write_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_fetches: AtomicBool,
    fetch_delay: Mutex<Duration>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self {
            entities: Mutex::new(HashMap::new()),
            fetch_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            fail_fetches: AtomicBool::new(false),
            fetch_delay: Mutex::new(Duration::ZERO),
        }
    }

    pub fn seed(&self, kind_name: &str, id: &str, pairs: &[(&str, Value)]) -> &Self {
        self.entities
            .lock()
            .unwrap()
            .insert((kind_name.to_string(), id.to_string()), raw(pairs));
        self
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = delay;
    }
}

impl Default for ScriptedRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ScriptedRemote {
    fn fetch(&self, kind_name: &str, id: &EntityId) -> Result<RawData, TransportError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.fetch_delay.lock().unwrap();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(TransportError::TimedOut { millis: 5 });
        }
        self.entities
            .lock()
            .unwrap()
            .get(&(kind_name.to_string(), id.to_string()))
            .cloned()
            .ok_or(TransportError::Rejected {
                status: 404,
                reason: "no such entity".to_string(),
            })
    }

    fn write(
        &self,
        kind_name: &str,
        id: &EntityId,
        property: &str,
        value: &Value,
    ) -> Result<(), TransportError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut entities = self.entities.lock().unwrap();
        let Some(data) = entities.get_mut(&(kind_name.to_string(), id.to_string())) else {
            return Err(TransportError::Rejected {
                status: 404,
                reason: "no such entity".to_string(),
            });
        };
        data.insert(property.to_string(), value.clone());
        Ok(())
    }

    fn delete(&self, kind_name: &str, id: &EntityId) -> Result<(), TransportError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut entities = self.entities.lock().unwrap();
        match entities.remove(&(kind_name.to_string(), id.to_string())) {
            Some(_) => Ok(()),
            None => Err(TransportError::Rejected {
                status: 404,
                reason: "no such entity".to_string(),
            }),
        }
    }
}

/// A locked registry over `remote` with both resource kinds registered.
pub fn registry_with(remote: Arc<ScriptedRemote>, expiry: Duration) -> Registry {
    let mut registry = Registry::builder();
    registry
        .transport(remote)
        .expiry(expiry)
        .add_entity::<CheckItem>("checkItem")
        .add_entity::<Member>("member");
    registry.lock();
    registry
}

pub fn raw(pairs: &[(&str, Value)]) -> RawData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

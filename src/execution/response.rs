//! Response accumulator for one node

use serde_json::map::Entry;
use serde_json::{Map, Value};

/// Accumulates the result mapping of one node
///
/// Keys keep the order in which they were first written. Writing a key
/// twice merges the two values: mappings key by key, lists element by
/// element. A leaf keeps its first value, so the result does not depend
/// on which write came first.
#[derive(Debug, Default)]
pub(crate) struct ResponseBuilder {
    map: Map<String, Value>,
}

impl ResponseBuilder {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            map: Map::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        match self.map.entry(key.into()) {
            Entry::Occupied(mut slot) => {
                tracing::trace!(key = %slot.key(), "response key written twice, merging");
                deep_merge(slot.get_mut(), value);
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }

    /// Finish the mapping
    pub(crate) fn finish(self) -> Value {
        Value::Object(self.map)
    }
}

fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.entry(key) {
                    Entry::Occupied(mut slot) => deep_merge(slot.get_mut(), value),
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(source)) => {
            for (target, source) in target.iter_mut().zip(source) {
                deep_merge(target, source);
            }
        }
        // Leaves: the first write wins
        _ => {}
    }
}

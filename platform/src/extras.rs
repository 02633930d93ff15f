// Extras payload attached to a job descriptor
//
// The payload travels opaquely through the native scheduler and is read
// back when a job fires; it is the only channel for correlating a fired
// job with the work specification that produced it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ExtrasBundle is a string-keyed payload of scalar values
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ExtrasBundle {
    entries: serde_json::Map<String, Value>,
}

impl ExtrasBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Value::String(value.into()));
    }

    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) {
        self.entries.insert(key.into(), Value::Bool(value));
    }

    /// Read a string value; None if the key is absent or holds another type
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Read a boolean value; None if the key is absent or holds another type
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.entries.get(key).and_then(Value::as_bool)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

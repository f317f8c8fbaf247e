use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-request-type state bag.
///
/// The machine holds exactly one of these, for the active request, and never
/// looks inside it; only the owning template interprets the keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateState(Map<String, Value>);

impl TemplateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return a copy with `key` set, leaving `self` untouched
    pub fn with(&self, key: impl Into<String>, value: Value) -> Self {
        let mut next = self.0.clone();
        next.insert(key.into(), value);
        Self(next)
    }
}

impl From<Map<String, Value>> for TemplateState {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

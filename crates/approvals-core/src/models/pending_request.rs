use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A not-yet-resolved approval request surfaced by the host.
///
/// The core only ever reads these. Identity for activation purposes is the
/// full value, so a re-delivered request with changed `request_data` counts
/// as a new activation even when its `id` is unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequest {
    pub id: String,
    /// Discriminant selecting the template (e.g. `wallet_addEthereumChain`)
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(default)]
    pub origin: String,
    /// Type-specific payload, opaque to the core
    #[serde(default)]
    pub request_data: Value,
}

impl PendingRequest {
    pub fn new(
        id: impl Into<String>,
        request_type: impl Into<String>,
        origin: impl Into<String>,
        request_data: Value,
    ) -> Self {
        Self {
            id: id.into(),
            request_type: request_type.into(),
            origin: origin.into(),
            request_data,
        }
    }

    /// Read a string field from `request_data`
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.request_data.get(key).and_then(Value::as_str)
    }
}

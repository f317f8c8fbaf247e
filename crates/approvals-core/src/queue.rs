//! In-memory pending-request source.
//!
//! The host (or a demo fixture) pushes requests here; the confirmation
//! machine receives snapshots through `set_queue`, and `QueueDispatcher`
//! removes requests once they are resolved or rejected.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;

use crate::constants::message_type;
use crate::error::CoreError;
use crate::models::PendingRequest;

#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    inner: Arc<Mutex<Vec<PendingRequest>>>,
}

impl PendingQueue {
    pub fn new(requests: Vec<PendingRequest>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(requests)),
        }
    }

    pub fn snapshot(&self) -> Vec<PendingRequest> {
        self.inner.lock().clone()
    }

    /// Append a request. A request whose id is already pending is replaced
    /// in place so ids stay unique.
    pub fn push(&self, request: PendingRequest) {
        let mut requests = self.inner.lock();
        if let Some(existing) = requests.iter_mut().find(|r| r.id == request.id) {
            *existing = request;
        } else {
            requests.push(request);
        }
    }

    pub fn remove(&self, id: &str) -> Option<PendingRequest> {
        let mut requests = self.inner.lock();
        let position = requests.iter().position(|r| r.id == id)?;
        Some(requests.remove(position))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Parse a JSON array of pending requests
pub fn parse_requests(json: &str, context: &str) -> Result<Vec<PendingRequest>, CoreError> {
    serde_json::from_str(json).map_err(|e| CoreError::json(context, e))
}

pub fn load_requests(path: &Path) -> Result<Vec<PendingRequest>, CoreError> {
    let json = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
    parse_requests(&json, &path.display().to_string())
}

/// Fixture used when no request file is given
pub fn demo_requests() -> Vec<PendingRequest> {
    vec![PendingRequest::new(
        "xlo",
        message_type::ADD_ETHEREUM_CHAIN,
        "https://example-site.io/",
        json!({
            "chainName": "Example",
            "chainId": "0x2329",
            "rpcUrl": "https://mainnet.example-site.io",
            "blockExplorerUrl": "https://blockexplorer.example-site.io/",
            "ticker": "EXMPL"
        }),
    )]
}

//! Host-side resolution of pending approvals.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::constants::provider_error;
use crate::queue::PendingQueue;

/// EIP-1193 style error handed back to the requesting site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn user_rejected_request() -> Self {
        Self {
            code: provider_error::USER_REJECTED_REQUEST,
            message: "User rejected the request.".to_string(),
        }
    }
}

/// Dispatch capability handed to templates; actions call into it
pub trait Dispatch: Send + Sync {
    fn resolve_pending_approval(&self, id: &str, value: Value);
    fn reject_pending_approval(&self, id: &str, error: ProviderError);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Approved { id: String, value: Value },
    Rejected { id: String, error: ProviderError },
}

impl Resolution {
    pub fn id(&self) -> &str {
        match self {
            Resolution::Approved { id, .. } | Resolution::Rejected { id, .. } => id,
        }
    }
}

/// Resolves approvals by removing them from a `PendingQueue` and recording
/// the outcome for the host to report.
#[derive(Debug, Clone)]
pub struct QueueDispatcher {
    queue: PendingQueue,
    resolutions: Arc<Mutex<Vec<Resolution>>>,
}

impl QueueDispatcher {
    pub fn new(queue: PendingQueue) -> Self {
        Self {
            queue,
            resolutions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Drain the outcomes recorded since the last call
    pub fn take_resolutions(&self) -> Vec<Resolution> {
        std::mem::take(&mut *self.resolutions.lock())
    }

    pub fn resolutions(&self) -> Vec<Resolution> {
        self.resolutions.lock().clone()
    }

    fn finish(&self, resolution: Resolution) {
        if self.queue.remove(resolution.id()).is_none() {
            tracing::warn!(
                "Resolution for {} ignored: request is no longer pending",
                resolution.id()
            );
            return;
        }
        self.resolutions.lock().push(resolution);
    }
}

impl Dispatch for QueueDispatcher {
    fn resolve_pending_approval(&self, id: &str, value: Value) {
        tracing::info!("Approving pending request {}", id);
        self.finish(Resolution::Approved {
            id: id.to_string(),
            value,
        });
    }

    fn reject_pending_approval(&self, id: &str, error: ProviderError) {
        tracing::info!("Rejecting pending request {} ({})", id, error.code);
        self.finish(Resolution::Rejected {
            id: id.to_string(),
            error,
        });
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};

/// Routing capability used when the pending queue drains
pub trait Navigator: Send + Sync {
    fn navigate_to_default(&self);
}

/// Navigator that records requests for the host to act on at its own pace
#[derive(Debug, Default)]
pub struct RouteSignal {
    requested: AtomicUsize,
    total: AtomicUsize,
}

impl RouteSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a navigation was requested since the last call
    pub fn take(&self) -> bool {
        self.requested.swap(0, Ordering::SeqCst) > 0
    }

    /// Navigations requested over the signal's lifetime
    pub fn count(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl Navigator for RouteSignal {
    fn navigate_to_default(&self) {
        self.requested.fetch_add(1, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
    }
}

use std::fmt;

use crate::models::{Alert, TemplateState};
use crate::templates::StateUpdate;

/// Result of asynchronous work started for one activation.
///
/// Every variant carries the generation it was started under; the machine
/// discards completions whose generation is no longer current.
pub enum Completion {
    Alerts {
        generation: u64,
        request_id: String,
        result: anyhow::Result<Vec<Alert>>,
    },
    State {
        generation: u64,
        request_id: String,
        result: anyhow::Result<TemplateState>,
    },
    /// Issued by a template through its `StateSetter`
    StateUpdate {
        generation: u64,
        update: StateUpdate,
    },
}

impl Completion {
    pub fn generation(&self) -> u64 {
        match self {
            Completion::Alerts { generation, .. }
            | Completion::State { generation, .. }
            | Completion::StateUpdate { generation, .. } => *generation,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Completion::Alerts { .. } => "alerts",
            Completion::State { .. } => "state",
            Completion::StateUpdate { .. } => "state update",
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Alerts {
                generation,
                request_id,
                result,
            } => f
                .debug_struct("Alerts")
                .field("generation", generation)
                .field("request_id", request_id)
                .field("ok", &result.is_ok())
                .finish(),
            Completion::State {
                generation,
                request_id,
                result,
            } => f
                .debug_struct("State")
                .field("generation", generation)
                .field("request_id", request_id)
                .field("ok", &result.is_ok())
                .finish(),
            Completion::StateUpdate { generation, .. } => f
                .debug_struct("StateUpdate")
                .field("generation", generation)
                .finish(),
        }
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (generation {})", self.label(), self.generation())
    }
}

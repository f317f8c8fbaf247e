use std::collections::{HashMap, HashSet};

use crate::models::Alert;

/// Alerts of a single request, in the order they were first recorded
#[derive(Debug, Clone, Default)]
struct RequestAlerts {
    alerts: Vec<Alert>,
    /// Ids purged after dismissal; a later merge must not bring them back
    purged: HashSet<String>,
}

/// Alert state keyed by request id, then alert id.
///
/// Only the confirmation machine mutates this, and only through the
/// transitions below.
#[derive(Debug, Clone, Default)]
pub struct AlertState {
    by_request: HashMap<String, RequestAlerts>,
}

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Query Methods =====

    /// Every recorded alert for `request_id`, dismissed ones included
    pub fn alerts_for(&self, request_id: &str) -> &[Alert] {
        self.by_request
            .get(request_id)
            .map(|entry| entry.alerts.as_slice())
            .unwrap_or(&[])
    }

    /// Alerts that may be presented: not dismissed, in recorded order
    pub fn visible(&self, request_id: &str) -> Vec<&Alert> {
        self.alerts_for(request_id)
            .iter()
            .filter(|alert| !alert.dismissed)
            .collect()
    }

    pub fn get(&self, request_id: &str, alert_id: &str) -> Option<&Alert> {
        self.alerts_for(request_id)
            .iter()
            .find(|alert| alert.id == alert_id)
    }

    pub fn is_purged(&self, request_id: &str, alert_id: &str) -> bool {
        self.by_request
            .get(request_id)
            .map(|entry| entry.purged.contains(alert_id))
            .unwrap_or(false)
    }

    // ===== Transitions =====

    /// Add every alert whose id is not already known for this request.
    /// Existing entries (dismissed or not) are left exactly as they are.
    /// Returns how many alerts were added.
    pub fn merge(&mut self, request_id: &str, alerts: Vec<Alert>) -> usize {
        let entry = self.by_request.entry(request_id.to_string()).or_default();
        let mut added = 0;
        for alert in alerts {
            let known = entry.purged.contains(&alert.id)
                || entry.alerts.iter().any(|existing| existing.id == alert.id);
            if known {
                continue;
            }
            entry.alerts.push(Alert {
                dismissed: false,
                ..alert
            });
            added += 1;
        }
        added
    }

    /// Mark an alert dismissed. Dismissal is permanent for the lifetime of
    /// the entry. Returns false if the alert is unknown.
    pub fn dismiss(&mut self, request_id: &str, alert_id: &str) -> bool {
        let Some(alert) = self
            .by_request
            .get_mut(request_id)
            .and_then(|entry| entry.alerts.iter_mut().find(|alert| alert.id == alert_id))
        else {
            return false;
        };
        alert.dismissed = true;
        true
    }

    /// Delete a dismissed alert's entry and remember its id. Active alerts
    /// are never purged.
    pub fn purge(&mut self, request_id: &str, alert_id: &str) -> bool {
        let Some(entry) = self.by_request.get_mut(request_id) else {
            return false;
        };
        let Some(position) = entry
            .alerts
            .iter()
            .position(|alert| alert.id == alert_id && alert.dismissed)
        else {
            return false;
        };
        entry.alerts.remove(position);
        entry.purged.insert(alert_id.to_string());
        true
    }

    /// Drop state for requests that are no longer pending
    pub fn retain_requests<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.by_request.retain(|request_id, _| keep(request_id));
    }

    pub fn request_count(&self) -> usize {
        self.by_request.len()
    }
}

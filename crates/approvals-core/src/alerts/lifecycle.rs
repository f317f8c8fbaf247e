//! Callout lifecycle: active → pending-removal → removed.
//!
//! Dismissing a callout starts a fixed delay so the fade transition can
//! finish before the entry leaves the tree. Timers are plain deadlines held
//! by the deck, so they die with it: re-syncing to another request, an alert
//! vanishing from the machine's state, or dropping the deck all cancel them.

use std::time::{Duration, Instant};

use crate::models::Alert;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutPhase {
    Active,
    PendingRemoval { since: Instant },
}

/// What the deck asks of the confirmation machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckIntent {
    /// Mark the alert dismissed (emitted when the user closes a callout)
    Dismiss { request_id: String, alert_id: String },
    /// The removal delay elapsed; purge the entry
    Purge { request_id: String, alert_id: String },
}

#[derive(Debug, Clone)]
struct DeckEntry {
    alert: Alert,
    phase: CalloutPhase,
}

/// A callout ready for presentation
#[derive(Debug, Clone, Copy)]
pub struct Callout<'a> {
    pub alert: &'a Alert,
    pub is_first: bool,
    pub is_last: bool,
    pub is_multiple: bool,
    /// In its removal transition
    pub removing: bool,
}

/// Banner deck for the active request's alerts
#[derive(Debug)]
pub struct AlertDeck {
    request_id: Option<String>,
    removal_delay: Duration,
    entries: Vec<DeckEntry>,
}

impl AlertDeck {
    pub fn new(removal_delay: Duration) -> Self {
        Self {
            request_id: None,
            removal_delay,
            entries: Vec::new(),
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Reconcile with the machine's alerts for `request_id` (dismissed
    /// entries included, in recorded order).
    ///
    /// Callouts already in their removal transition survive until their
    /// timer fires; everything else mirrors the machine's state.
    pub fn sync(&mut self, request_id: Option<&str>, alerts: &[Alert]) {
        if self.request_id.as_deref() != request_id {
            if self.has_pending_removals() {
                tracing::debug!(
                    "alert deck switched request, cancelling {} pending removal(s)",
                    self.entries
                        .iter()
                        .filter(|e| matches!(e.phase, CalloutPhase::PendingRemoval { .. }))
                        .count()
                );
            }
            self.entries.clear();
            self.request_id = request_id.map(str::to_string);
        }

        let previous = std::mem::take(&mut self.entries);
        self.entries = alerts
            .iter()
            .filter_map(|alert| {
                let phase = previous
                    .iter()
                    .find(|entry| entry.alert.id == alert.id)
                    .map(|entry| entry.phase);
                match phase {
                    Some(phase @ CalloutPhase::PendingRemoval { .. }) => Some(DeckEntry {
                        alert: alert.clone(),
                        phase,
                    }),
                    _ if alert.dismissed => None,
                    _ => Some(DeckEntry {
                        alert: alert.clone(),
                        phase: CalloutPhase::Active,
                    }),
                }
            })
            .collect();
    }

    /// Close a callout. Idempotent: only an active callout moves to
    /// pending-removal and yields an intent.
    pub fn dismiss(&mut self, alert_id: &str, now: Instant) -> Option<DeckIntent> {
        let request_id = self.request_id.clone()?;
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.alert.id == alert_id)?;
        if entry.phase != CalloutPhase::Active {
            return None;
        }
        entry.phase = CalloutPhase::PendingRemoval { since: now };
        Some(DeckIntent::Dismiss {
            request_id,
            alert_id: alert_id.to_string(),
        })
    }

    /// Dismiss the `index`-th presented callout
    pub fn dismiss_at(&mut self, index: usize, now: Instant) -> Option<DeckIntent> {
        let alert_id = self.entries.get(index)?.alert.id.clone();
        self.dismiss(&alert_id, now)
    }

    /// Fire every removal timer that has elapsed at `now`
    pub fn tick(&mut self, now: Instant) -> Vec<DeckIntent> {
        let Some(request_id) = self.request_id.clone() else {
            return Vec::new();
        };
        let delay = self.removal_delay;
        let mut intents = Vec::new();
        self.entries.retain(|entry| match entry.phase {
            CalloutPhase::PendingRemoval { since } if now.duration_since(since) >= delay => {
                intents.push(DeckIntent::Purge {
                    request_id: request_id.clone(),
                    alert_id: entry.alert.id.clone(),
                });
                false
            }
            _ => true,
        });
        intents
    }

    pub fn callouts(&self) -> Vec<Callout<'_>> {
        let count = self.entries.len();
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| Callout {
                alert: &entry.alert,
                is_first: idx == 0,
                is_last: idx + 1 == count,
                is_multiple: count > 1,
                removing: entry.phase != CalloutPhase::Active,
            })
            .collect()
    }

    pub fn has_pending_removals(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry.phase, CalloutPhase::PendingRemoval { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tear down: forget the request and cancel every timer
    pub fn clear(&mut self) {
        self.entries.clear();
        self.request_id = None;
    }
}

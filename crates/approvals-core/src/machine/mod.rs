//! Pending-confirmation state machine.
//!
//! Owns the pending queue snapshot, the current index, per-request alert
//! state and the active request's template state. Async template work is
//! spawned onto the tokio runtime and reported back as `Completion`s that
//! the host feeds into `apply` from its event loop; every completion is
//! tagged with the activation generation it belongs to so late results for
//! a request that is no longer active are dropped.

mod completion;
#[cfg(test)]
mod tests;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub use completion::Completion;

use crate::alerts::{AlertState, DeckIntent};
use crate::config::EnvironmentType;
use crate::dispatch::Dispatch;
use crate::i18n::Translate;
use crate::models::{Alert, PendingRequest, TemplateState};
use crate::navigation::Navigator;
use crate::templates::{StateSetter, TemplateRegistry, TemplateValues};

#[derive(Debug, Default, Clone, Copy)]
struct InFlight {
    alerts: bool,
    state: bool,
}

/// Inputs the cached values were computed from
struct ValuesKey {
    generation: u64,
    request: PendingRequest,
    translate: Arc<dyn Translate>,
    dispatch: Arc<dyn Dispatch>,
    state: TemplateState,
}

/// A derivation problem the host may want to surface beyond the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// No template is registered for the request's type
    UnknownRequestType {
        request_id: String,
        request_type: String,
    },
    /// A template's alerts or state lookup failed or panicked
    DerivationFailed {
        request_id: String,
        what: &'static str,
        error: String,
    },
}

fn same_instance<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

pub struct ConfirmationMachine {
    templates: Arc<TemplateRegistry>,
    translate: Arc<dyn Translate>,
    dispatch: Arc<dyn Dispatch>,
    navigator: Arc<dyn Navigator>,
    environment: EnvironmentType,

    pending: Vec<PendingRequest>,
    queue_received: bool,
    current_index: usize,
    active: Option<PendingRequest>,
    generation: u64,
    in_flight: InFlight,
    confirmation_state: TemplateState,
    alert_state: AlertState,
    redirected: bool,
    issues: Vec<LoadIssue>,

    values_cache: Option<(ValuesKey, TemplateValues)>,
    values_computed: u64,

    completion_tx: UnboundedSender<Completion>,
    completion_rx: Option<UnboundedReceiver<Completion>>,
}

impl ConfirmationMachine {
    pub fn new(
        templates: Arc<TemplateRegistry>,
        translate: Arc<dyn Translate>,
        dispatch: Arc<dyn Dispatch>,
        navigator: Arc<dyn Navigator>,
        environment: EnvironmentType,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            templates,
            translate,
            dispatch,
            navigator,
            environment,
            pending: Vec::new(),
            queue_received: false,
            current_index: 0,
            active: None,
            generation: 0,
            in_flight: InFlight::default(),
            confirmation_state: TemplateState::default(),
            alert_state: AlertState::new(),
            redirected: false,
            issues: Vec::new(),
            values_cache: None,
            values_computed: 0,
            completion_tx,
            completion_rx: Some(completion_rx),
        }
    }

    /// Drain problems recorded since the last call
    pub fn take_issues(&mut self) -> Vec<LoadIssue> {
        std::mem::take(&mut self.issues)
    }

    /// Hand the completion receiver to the host's event loop. Returns `None`
    /// after the first call.
    pub fn take_completions(&mut self) -> Option<UnboundedReceiver<Completion>> {
        self.completion_rx.take()
    }

    // ===== Queries =====

    pub fn environment(&self) -> EnvironmentType {
        self.environment
    }

    pub fn pending(&self) -> &[PendingRequest] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&PendingRequest> {
        self.active.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn confirmation_state(&self) -> &TemplateState {
        &self.confirmation_state
    }

    pub fn alert_state(&self) -> &AlertState {
        &self.alert_state
    }

    /// Every recorded alert of the active request, dismissed ones included
    pub fn current_alerts(&self) -> &[Alert] {
        match &self.active {
            Some(request) => self.alert_state.alerts_for(&request.id),
            None => &[],
        }
    }

    pub fn visible_alerts(&self) -> Vec<&Alert> {
        match &self.active {
            Some(request) => self.alert_state.visible(&request.id),
            None => Vec::new(),
        }
    }

    /// Whether alerts or initial state are still being derived
    pub fn is_loading(&self) -> bool {
        self.active.is_some() && (self.in_flight.alerts || self.in_flight.state)
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.current_index + 1 < self.pending.len()
    }

    /// How many times template values were actually computed
    pub fn values_computed(&self) -> u64 {
        self.values_computed
    }

    pub fn translator(&self) -> &Arc<dyn Translate> {
        &self.translate
    }

    // ===== Queue and navigation =====

    /// Deliver a new queue snapshot. A snapshot deep-equal to the current
    /// one is ignored. Returns whether anything changed.
    pub fn set_queue(&mut self, queue: Vec<PendingRequest>) -> bool {
        if self.queue_received && queue == self.pending {
            return false;
        }
        self.queue_received = true;
        self.pending = queue;

        let pending = &self.pending;
        self.alert_state
            .retain_requests(|request_id| pending.iter().any(|r| r.id == request_id));

        if self.pending.is_empty() {
            self.current_index = 0;
            if self.environment.redirects_when_empty() && !self.redirected {
                self.redirected = true;
                tracing::info!(
                    "pending queue drained in {} view, navigating to default route",
                    self.environment.label()
                );
                self.navigator.navigate_to_default();
            }
        } else {
            self.redirected = false;
            if self.current_index >= self.pending.len() {
                self.current_index = self.pending.len() - 1;
            }
        }

        self.sync_active();
        true
    }

    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current_index += 1;
        self.sync_active();
        true
    }

    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current_index -= 1;
        self.sync_active();
        true
    }

    fn sync_active(&mut self) {
        let current = self.pending.get(self.current_index).cloned();
        if current == self.active {
            return;
        }

        self.generation += 1;
        self.active = current;
        self.confirmation_state = TemplateState::default();
        self.in_flight = InFlight::default();

        if let Some(request) = self.active.clone() {
            tracing::debug!(
                "activating request {} ({}) as generation {}",
                request.id,
                request.request_type,
                self.generation
            );
            self.activate(request);
        }
    }

    fn activate(&mut self, request: PendingRequest) {
        let template = match self.templates.get(&request.request_type) {
            Ok(template) => template,
            Err(e) => {
                tracing::error!("Cannot derive alerts for request {}: {}", request.id, e);
                self.issues.push(LoadIssue::UnknownRequestType {
                    request_id: request.id.clone(),
                    request_type: request.request_type.clone(),
                });
                return;
            }
        };
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(
                "no async runtime available; alerts and state for {} will not be derived",
                request.id
            );
            return;
        };

        self.in_flight = InFlight {
            alerts: true,
            state: true,
        };
        let generation = self.generation;

        {
            let template = Arc::clone(&template);
            let request = request.clone();
            let tx = self.completion_tx.clone();
            handle.spawn(async move {
                let result = guarded(template.alerts(&request)).await;
                let _ = tx.send(Completion::Alerts {
                    generation,
                    request_id: request.id,
                    result,
                });
            });
        }

        let tx = self.completion_tx.clone();
        handle.spawn(async move {
            let result = guarded(template.state(&request)).await;
            let _ = tx.send(Completion::State {
                generation,
                request_id: request.id,
                result,
            });
        });
    }

    // ===== Completions =====

    /// Fold a completion into the machine. Returns false when it was stale
    /// and discarded.
    pub fn apply(&mut self, completion: Completion) -> bool {
        if completion.generation() != self.generation {
            tracing::debug!(
                "discarding stale {} (current generation {})",
                completion,
                self.generation
            );
            return false;
        }

        match completion {
            Completion::Alerts {
                request_id, result, ..
            } => {
                self.in_flight.alerts = false;
                match result {
                    Ok(alerts) => {
                        let added = self.alert_state.merge(&request_id, alerts);
                        tracing::debug!("merged {} new alert(s) for {}", added, request_id);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to derive alerts for {}: {:#}", request_id, e);
                        self.issues.push(LoadIssue::DerivationFailed {
                            request_id,
                            what: "alerts",
                            error: format!("{:#}", e),
                        });
                    }
                }
            }
            Completion::State {
                request_id, result, ..
            } => {
                self.in_flight.state = false;
                match result {
                    Ok(state) => self.confirmation_state = state,
                    Err(e) => {
                        tracing::warn!("Failed to derive state for {}: {:#}", request_id, e);
                        self.confirmation_state = TemplateState::default();
                        self.issues.push(LoadIssue::DerivationFailed {
                            request_id,
                            what: "state",
                            error: format!("{:#}", e),
                        });
                    }
                }
            }
            Completion::StateUpdate { update, .. } => {
                self.confirmation_state = update(&self.confirmation_state);
            }
        }
        true
    }

    /// Apply every completion already queued, when the receiver has not been
    /// handed out. Returns how many were current.
    pub fn apply_ready(&mut self) -> usize {
        let mut applied = 0;
        while let Some(completion) = self.completion_rx.as_mut().and_then(|rx| rx.try_recv().ok()) {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    // ===== Alerts =====

    pub fn dismiss_alert(&mut self, alert_id: &str) -> bool {
        let Some(request) = &self.active else {
            return false;
        };
        self.alert_state.dismiss(&request.id, alert_id)
    }

    pub fn purge_alert(&mut self, alert_id: &str) -> bool {
        let Some(request) = &self.active else {
            return false;
        };
        self.alert_state.purge(&request.id, alert_id)
    }

    /// Route an intent from the alert deck. Intents for a request that is
    /// no longer active are ignored.
    pub fn handle_deck_intent(&mut self, intent: DeckIntent) -> bool {
        let (request_id, alert_id, purge) = match &intent {
            DeckIntent::Dismiss {
                request_id,
                alert_id,
            } => (request_id, alert_id, false),
            DeckIntent::Purge {
                request_id,
                alert_id,
            } => (request_id, alert_id, true),
        };
        if self.active.as_ref().map(|r| &r.id) != Some(request_id) {
            tracing::debug!("ignoring {:?}: request is not active", intent);
            return false;
        }
        if purge {
            self.purge_alert(alert_id)
        } else {
            self.dismiss_alert(alert_id)
        }
    }

    // ===== Values =====

    pub fn set_translator(&mut self, translate: Arc<dyn Translate>) {
        self.translate = translate;
    }

    pub fn set_dispatcher(&mut self, dispatch: Arc<dyn Dispatch>) {
        self.dispatch = dispatch;
    }

    /// Presentation values for the active request, recomputed only when the
    /// request, translator, dispatcher or template state changed
    pub fn values(&mut self) -> Option<&TemplateValues> {
        let request = self.active.clone()?;

        let fresh = match &self.values_cache {
            Some((key, _)) => {
                key.generation == self.generation
                    && key.request == request
                    && same_instance(&key.translate, &self.translate)
                    && same_instance(&key.dispatch, &self.dispatch)
                    && key.state == self.confirmation_state
            }
            None => false,
        };

        if !fresh {
            let values = self.compute_values(&request);
            let key = ValuesKey {
                generation: self.generation,
                request,
                translate: Arc::clone(&self.translate),
                dispatch: Arc::clone(&self.dispatch),
                state: self.confirmation_state.clone(),
            };
            self.values_cache = Some((key, values));
            self.values_computed += 1;
        }

        self.values_cache.as_ref().map(|(_, values)| values)
    }

    fn compute_values(&self, request: &PendingRequest) -> TemplateValues {
        match self.templates.get(&request.request_type) {
            Ok(template) => template.values(
                request,
                self.translate.as_ref(),
                &self.dispatch,
                &self.confirmation_state,
                &StateSetter::new(self.generation, self.completion_tx.clone()),
            ),
            Err(e) => {
                tracing::error!("Cannot present request {}: {}", request.id, e);
                TemplateValues::empty(self.translate.as_ref())
            }
        }
    }

    /// End the flow: outstanding completions and state updates become stale
    pub fn shutdown(&mut self) {
        self.generation += 1;
        self.active = None;
        self.in_flight = InFlight::default();
        self.values_cache = None;
    }
}

/// Turn a panicking template future into an error result
async fn guarded<T, F>(future: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("template panicked")),
    }
}

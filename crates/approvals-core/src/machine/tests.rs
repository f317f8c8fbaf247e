use super::*;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::alerts::AlertDeck;
use crate::constants::alert_id;
use crate::dispatch::{QueueDispatcher, Resolution};
use crate::i18n::Locale;
use crate::models::{Children, Severity};
use crate::navigation::RouteSignal;
use crate::queue::{demo_requests, PendingQueue};
use crate::templates::{Action, ConfirmationTemplate, StaticChainList};

const TEST_TYPE: &str = "test_request";

fn label(request: &PendingRequest) -> String {
    request.data_str("label").unwrap_or(&request.id).to_string()
}

/// Template whose alert lookups can be held open per label
#[derive(Default)]
struct ScriptedTemplate {
    gates: Mutex<HashMap<String, oneshot::Receiver<Vec<Alert>>>>,
    alerts_calls: AtomicUsize,
    state_calls: AtomicUsize,
    values_calls: AtomicUsize,
}

impl ScriptedTemplate {
    fn gate(&self, label: &str) -> oneshot::Sender<Vec<Alert>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(label.to_string(), rx);
        tx
    }
}

#[async_trait]
impl ConfirmationTemplate for ScriptedTemplate {
    async fn alerts(&self, request: &PendingRequest) -> anyhow::Result<Vec<Alert>> {
        self.alerts_calls.fetch_add(1, Ordering::SeqCst);
        let label = label(request);
        match label.as_str() {
            "fails" => anyhow::bail!("lookup failed"),
            "panics" => panic!("lookup exploded"),
            _ => {}
        }
        let gate = self.gates.lock().remove(&label);
        match gate {
            Some(rx) => Ok(rx.await?),
            None => Ok(vec![Alert::new(
                format!("{label}-alert"),
                Severity::Info,
                Children::Text(label.clone()),
            )]),
        }
    }

    async fn state(&self, request: &PendingRequest) -> anyhow::Result<TemplateState> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TemplateState::new().with("label", json!(label(request))))
    }

    fn values(
        &self,
        request: &PendingRequest,
        translate: &dyn Translate,
        _dispatch: &Arc<dyn Dispatch>,
        state: &TemplateState,
        set_state: &StateSetter,
    ) -> TemplateValues {
        self.values_calls.fetch_add(1, Ordering::SeqCst);
        let step = state.get("step").and_then(Value::as_i64).unwrap_or(1);
        let setter = set_state.clone();
        TemplateValues {
            content: Some(Children::Text(format!("{} step {}", label(request), step))),
            approval_text: translate.translate("approve", &[]),
            cancel_text: translate.translate("cancel", &[]),
            on_approve: Action::new(move || setter.update(|s| s.with("step", json!(2)))),
            on_cancel: Action::noop(),
        }
    }
}

fn request(id: &str, label: &str) -> PendingRequest {
    PendingRequest::new(id, TEST_TYPE, "https://site.io", json!({ "label": label }))
}

struct Harness {
    machine: ConfirmationMachine,
    rx: UnboundedReceiver<Completion>,
    template: Arc<ScriptedTemplate>,
    signal: Arc<RouteSignal>,
}

fn harness(environment: EnvironmentType) -> Harness {
    let template = Arc::new(ScriptedTemplate::default());
    let registry = TemplateRegistry::new().with_template(TEST_TYPE, template.clone());
    let signal = Arc::new(RouteSignal::new());
    let mut machine = ConfirmationMachine::new(
        Arc::new(registry),
        Arc::new(Locale::english()),
        Arc::new(QueueDispatcher::new(PendingQueue::default())),
        signal.clone(),
        environment,
    );
    let rx = machine.take_completions().unwrap();
    Harness {
        machine,
        rx,
        template,
        signal,
    }
}

/// Receive `n` completions and apply them in arrival order
async fn pump(
    machine: &mut ConfirmationMachine,
    rx: &mut UnboundedReceiver<Completion>,
    n: usize,
) -> Vec<bool> {
    let mut applied = Vec::with_capacity(n);
    for _ in 0..n {
        let completion = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for a completion")
            .expect("completion channel closed");
        applied.push(machine.apply(completion));
    }
    applied
}

fn visible_ids(machine: &ConfirmationMachine) -> Vec<String> {
    machine
        .visible_alerts()
        .iter()
        .map(|a| a.id.clone())
        .collect()
}

#[tokio::test]
async fn test_activation_derives_alerts_and_state_once() {
    let mut h = harness(EnvironmentType::Popup);
    assert!(h.machine.set_queue(vec![request("a", "a")]));
    assert!(h.machine.is_loading());

    assert_eq!(pump(&mut h.machine, &mut h.rx, 2).await, vec![true, true]);
    assert!(!h.machine.is_loading());
    assert_eq!(visible_ids(&h.machine), vec!["a-alert"]);
    assert_eq!(h.machine.confirmation_state().get("label"), Some(&json!("a")));

    // Deep-equal redelivery is not a new activation
    assert!(!h.machine.set_queue(vec![request("a", "a")]));
    assert_eq!(h.template.alerts_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.template.state_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_late_results_for_replaced_request_are_dropped() {
    let mut h = harness(EnvironmentType::Popup);
    let release_first = h.template.gate("first");

    h.machine.set_queue(vec![request("same", "first")]);
    // Only the state lookup completes; alerts are held open
    assert_eq!(pump(&mut h.machine, &mut h.rx, 1).await, vec![true]);
    let first_generation = h.machine.generation();

    // Same id, new payload: a new activation
    h.machine.set_queue(vec![request("same", "second")]);
    assert!(h.machine.generation() > first_generation);
    assert_eq!(pump(&mut h.machine, &mut h.rx, 2).await, vec![true, true]);

    release_first
        .send(vec![Alert::new("first-late", Severity::Danger, Children::Text("late".into()))])
        .unwrap();
    assert_eq!(pump(&mut h.machine, &mut h.rx, 1).await, vec![false]);

    let ids: Vec<&str> = h
        .machine
        .current_alerts()
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(ids, vec!["second-alert"]);
    assert_eq!(h.machine.confirmation_state().get("label"), Some(&json!("second")));
}

#[tokio::test]
async fn test_state_reset_on_activation() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("a", "a"), request("b", "b")]);
    pump(&mut h.machine, &mut h.rx, 2).await;
    assert!(!h.machine.confirmation_state().is_empty());

    h.machine.next();
    assert!(h.machine.confirmation_state().is_empty());
    assert!(h.machine.is_loading());
}

#[tokio::test]
async fn test_index_clamped_when_queue_shrinks() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("a", "a"), request("b", "b")]);
    assert!(!h.machine.previous());
    assert!(h.machine.next());
    assert_eq!(h.machine.current_index(), 1);
    assert_eq!(h.machine.current().map(|r| r.id.as_str()), Some("b"));
    assert!(!h.machine.next());

    h.machine.set_queue(vec![request("a", "a")]);
    assert_eq!(h.machine.current_index(), 0);
    assert_eq!(h.machine.current().map(|r| r.id.as_str()), Some("a"));
    assert!(!h.machine.can_go_next());
    assert!(!h.machine.can_go_previous());
}

#[tokio::test]
async fn test_drained_queue_redirects_once() {
    for environment in [EnvironmentType::Popup, EnvironmentType::Fullscreen] {
        let mut h = harness(environment);
        h.machine.set_queue(vec![request("a", "a")]);
        assert_eq!(h.signal.count(), 0);

        h.machine.set_queue(Vec::new());
        assert_eq!(h.signal.count(), 1);
        assert!(h.machine.current().is_none());
        assert!(!h.machine.is_loading());

        h.machine.set_queue(Vec::new());
        assert_eq!(h.signal.count(), 1);

        // A new drain after a refill redirects again
        h.machine.set_queue(vec![request("b", "b")]);
        h.machine.set_queue(Vec::new());
        assert_eq!(h.signal.count(), 2);
    }
}

#[tokio::test]
async fn test_initially_empty_queue_redirects() {
    let mut h = harness(EnvironmentType::Fullscreen);
    h.machine.set_queue(Vec::new());
    assert_eq!(h.signal.count(), 1);
}

#[tokio::test]
async fn test_notification_never_redirects() {
    let mut h = harness(EnvironmentType::Notification);
    h.machine.set_queue(Vec::new());
    h.machine.set_queue(vec![request("a", "a")]);
    h.machine.set_queue(Vec::new());
    assert_eq!(h.signal.count(), 0);
    assert!(h.machine.is_empty());
}

#[tokio::test]
async fn test_rederived_alerts_keep_dismissal() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("a", "a"), request("b", "b")]);
    pump(&mut h.machine, &mut h.rx, 2).await;
    assert!(h.machine.dismiss_alert("a-alert"));
    assert!(h.machine.visible_alerts().is_empty());

    h.machine.next();
    pump(&mut h.machine, &mut h.rx, 2).await;
    h.machine.previous();
    pump(&mut h.machine, &mut h.rx, 2).await;

    assert_eq!(h.template.alerts_calls.load(Ordering::SeqCst), 3);
    assert!(h.machine.visible_alerts().is_empty());
    assert!(h.machine.current_alerts()[0].dismissed);
}

#[tokio::test]
async fn test_purged_alert_stays_gone() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("a", "a"), request("b", "b")]);
    pump(&mut h.machine, &mut h.rx, 2).await;

    assert!(!h.machine.handle_deck_intent(DeckIntent::Purge {
        request_id: "a".into(),
        alert_id: "a-alert".into(),
    }));
    assert!(h.machine.handle_deck_intent(DeckIntent::Dismiss {
        request_id: "a".into(),
        alert_id: "a-alert".into(),
    }));
    assert!(h.machine.handle_deck_intent(DeckIntent::Purge {
        request_id: "a".into(),
        alert_id: "a-alert".into(),
    }));
    assert!(h.machine.current_alerts().is_empty());

    h.machine.next();
    pump(&mut h.machine, &mut h.rx, 2).await;
    h.machine.previous();
    pump(&mut h.machine, &mut h.rx, 2).await;
    assert!(h.machine.current_alerts().is_empty());
}

#[tokio::test]
async fn test_intent_for_inactive_request_is_ignored() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("a", "a"), request("b", "b")]);
    pump(&mut h.machine, &mut h.rx, 2).await;
    h.machine.next();

    assert!(!h.machine.handle_deck_intent(DeckIntent::Dismiss {
        request_id: "a".into(),
        alert_id: "a-alert".into(),
    }));
    assert!(!h.machine.alert_state().get("a", "a-alert").unwrap().dismissed);
}

#[tokio::test]
async fn test_alert_state_dropped_for_resolved_requests() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("a", "a"), request("b", "b")]);
    pump(&mut h.machine, &mut h.rx, 2).await;
    h.machine.set_queue(vec![request("b", "b")]);
    assert!(h.machine.alert_state().alerts_for("a").is_empty());
}

#[tokio::test]
async fn test_values_are_memoized() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("a", "a")]);
    pump(&mut h.machine, &mut h.rx, 2).await;

    let first = h.machine.values().unwrap().content.clone();
    let second = h.machine.values().unwrap().content.clone();
    assert_eq!(first, second);
    assert_eq!(h.machine.values_computed(), 1);
    assert_eq!(h.template.values_calls.load(Ordering::SeqCst), 1);

    // A different translator instance is a new input
    h.machine.set_translator(Arc::new(Locale::english()));
    h.machine.values();
    assert_eq!(h.machine.values_computed(), 2);

    // So is a template state change
    h.machine.values().unwrap().on_approve.invoke();
    assert_eq!(pump(&mut h.machine, &mut h.rx, 1).await, vec![true]);
    let content = h.machine.values().unwrap().content.clone();
    assert_eq!(content, Some(Children::Text("a step 2".into())));
    assert_eq!(h.machine.values_computed(), 3);
}

#[tokio::test]
async fn test_state_update_from_previous_activation_is_dropped() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("a", "a"), request("b", "b")]);
    pump(&mut h.machine, &mut h.rx, 2).await;
    let approve_a = h.machine.values().unwrap().on_approve.clone();

    h.machine.next();
    pump(&mut h.machine, &mut h.rx, 2).await;

    approve_a.invoke();
    assert_eq!(pump(&mut h.machine, &mut h.rx, 1).await, vec![false]);
    assert!(h.machine.confirmation_state().get("step").is_none());
}

#[tokio::test]
async fn test_failed_lookup_is_treated_as_empty() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("x", "fails")]);
    assert_eq!(pump(&mut h.machine, &mut h.rx, 2).await, vec![true, true]);
    assert!(h.machine.visible_alerts().is_empty());
    assert!(!h.machine.is_loading());

    let issues = h.machine.take_issues();
    assert_eq!(issues.len(), 1);
    assert!(matches!(
        &issues[0],
        LoadIssue::DerivationFailed { request_id, what: "alerts", error }
            if request_id == "x" && error.contains("lookup failed")
    ));
    assert!(h.machine.take_issues().is_empty());
}

#[tokio::test]
async fn test_panicking_template_is_contained() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("x", "panics")]);
    assert_eq!(pump(&mut h.machine, &mut h.rx, 2).await, vec![true, true]);
    assert!(h.machine.visible_alerts().is_empty());
    assert!(!h.machine.is_loading());
}

#[tokio::test]
async fn test_unknown_request_type_degrades_to_empty_values() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![PendingRequest::new(
        "m",
        "eth_mystery",
        "https://site.io",
        Value::Null,
    )]);
    assert!(!h.machine.is_loading());
    assert!(h.rx.try_recv().is_err());
    assert_eq!(
        h.machine.take_issues(),
        vec![LoadIssue::UnknownRequestType {
            request_id: "m".into(),
            request_type: "eth_mystery".into(),
        }]
    );

    let values = h.machine.values().unwrap();
    assert!(values.content.is_none());
    assert_eq!(values.approval_text, "Approve");
    values.on_approve.invoke();
}

#[test]
fn test_no_runtime_skips_derivation() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("a", "a")]);
    assert!(!h.machine.is_loading());
    assert!(h.machine.values().is_some());
}

#[tokio::test]
async fn test_shutdown_makes_outstanding_work_stale() {
    let mut h = harness(EnvironmentType::Popup);
    h.machine.set_queue(vec![request("a", "a")]);
    h.machine.shutdown();
    assert_eq!(pump(&mut h.machine, &mut h.rx, 2).await, vec![false, false]);
    assert!(h.machine.current().is_none());
}

#[tokio::test]
async fn test_apply_ready_without_taking_receiver() {
    let template = Arc::new(ScriptedTemplate::default());
    let mut machine = ConfirmationMachine::new(
        Arc::new(TemplateRegistry::new().with_template(TEST_TYPE, template)),
        Arc::new(Locale::english()),
        Arc::new(QueueDispatcher::new(PendingQueue::default())),
        Arc::new(RouteSignal::new()),
        EnvironmentType::Popup,
    );
    machine.set_queue(vec![request("a", "a")]);

    let mut applied = 0;
    for _ in 0..50 {
        tokio::task::yield_now().await;
        applied += machine.apply_ready();
        if applied == 2 {
            break;
        }
    }
    assert_eq!(applied, 2);
    assert_eq!(visible_ids(&machine), vec!["a-alert"]);
}

#[tokio::test]
async fn test_add_network_flow_end_to_end() {
    let queue = PendingQueue::new(demo_requests());
    let dispatcher = Arc::new(QueueDispatcher::new(queue.clone()));
    let signal = Arc::new(RouteSignal::new());
    let registry = TemplateRegistry::standard(Arc::new(StaticChainList::default()));
    let mut machine = ConfirmationMachine::new(
        Arc::new(registry),
        Arc::new(Locale::english()),
        dispatcher.clone(),
        signal.clone(),
        EnvironmentType::Notification,
    );
    let mut rx = machine.take_completions().unwrap();

    machine.set_queue(queue.snapshot());
    pump(&mut machine, &mut rx, 2).await;
    assert_eq!(
        visible_ids(&machine),
        vec![alert_id::UNRECOGNIZED_CHAIN, alert_id::INVALID_CHAIN]
    );

    let mut deck = AlertDeck::new(Duration::from_millis(500));
    deck.sync(machine.current().map(|r| r.id.as_str()), machine.current_alerts());
    let t0 = Instant::now();

    let intent = deck.dismiss(alert_id::UNRECOGNIZED_CHAIN, t0).unwrap();
    assert!(machine.handle_deck_intent(intent));
    assert_eq!(visible_ids(&machine), vec![alert_id::INVALID_CHAIN]);
    deck.sync(machine.current().map(|r| r.id.as_str()), machine.current_alerts());
    assert_eq!(deck.len(), 2);
    assert!(deck.callouts()[0].removing);

    for intent in deck.tick(t0 + Duration::from_millis(500)) {
        assert!(machine.handle_deck_intent(intent));
    }
    assert_eq!(machine.current_alerts().len(), 1);
    deck.sync(machine.current().map(|r| r.id.as_str()), machine.current_alerts());
    assert_eq!(deck.len(), 1);
    assert!(deck.callouts()[0].is_first && deck.callouts()[0].is_last);

    machine.values().unwrap().on_approve.invoke();
    assert!(queue.is_empty());
    assert!(matches!(
        dispatcher.take_resolutions().as_slice(),
        [Resolution::Approved { id, .. }] if id == "xlo"
    ));

    machine.set_queue(queue.snapshot());
    assert!(machine.current().is_none());
    assert_eq!(signal.count(), 0);
}

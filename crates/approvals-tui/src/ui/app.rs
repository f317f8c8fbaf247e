use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use approvals_core::alerts::{AlertDeck, Callout};
use approvals_core::dispatch::{QueueDispatcher, Resolution};
use approvals_core::i18n::Translate;
use approvals_core::machine::{Completion, ConfirmationMachine, LoadIssue};
use approvals_core::navigation::RouteSignal;
use approvals_core::origin::{OriginLookup, OriginMetadata};
use approvals_core::queue::PendingQueue;
use approvals_core::render::{RenderOutput, TemplateRenderer};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::ui::animation_clock::AnimationClock;
use crate::ui::elements::DetailLabels;
use crate::ui::notifications::{Notification, NotificationQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The pending-confirmation page
    Confirmation,
    /// Default route shown once the queue drains
    Home,
}

/// Snapshot of what the confirmation page shows for the active request
pub struct PageContent {
    pub content: Rc<RenderOutput>,
    pub approval_text: String,
    pub cancel_text: String,
}

pub struct App {
    pub running: bool,
    pub view: View,
    /// Truncated definition lists show every entry
    pub show_details: bool,
    /// Lines scrolled off the top of the page body
    pub scroll: u16,

    machine: ConfirmationMachine,
    deck: AlertDeck,
    renderer: TemplateRenderer,
    queue: PendingQueue,
    dispatcher: Arc<QueueDispatcher>,
    route: Arc<RouteSignal>,
    origins: Box<dyn OriginLookup>,
    notifications: NotificationQueue,
    clock: AnimationClock,
}

impl App {
    pub fn new(
        machine: ConfirmationMachine,
        queue: PendingQueue,
        dispatcher: Arc<QueueDispatcher>,
        route: Arc<RouteSignal>,
        origins: Box<dyn OriginLookup>,
        removal_delay: Duration,
    ) -> Self {
        let mut app = Self {
            running: true,
            view: View::Confirmation,
            show_details: false,
            scroll: 0,
            machine,
            deck: AlertDeck::new(removal_delay),
            renderer: TemplateRenderer::new(),
            queue,
            dispatcher,
            route,
            origins,
            notifications: NotificationQueue::new(),
            clock: AnimationClock::new(),
        };
        app.sync_queue();
        app
    }

    pub fn machine(&self) -> &ConfirmationMachine {
        &self.machine
    }

    /// Receiver for template results; the event loop feeds them back through
    /// [`App::apply_completion`]
    pub fn take_completions(&mut self) -> Option<UnboundedReceiver<Completion>> {
        self.machine.take_completions()
    }

    pub fn translate(&self, key: &str, substitutions: &[&str]) -> String {
        self.machine.translator().translate(key, substitutions)
    }

    pub fn detail_labels(&self) -> DetailLabels {
        DetailLabels {
            view_all: self.translate("viewAllDetails", &[]),
            show_less: self.translate("showLessDetails", &[]),
        }
    }

    pub fn callouts(&self) -> Vec<Callout<'_>> {
        self.deck.callouts()
    }

    pub fn origin(&self) -> Option<OriginMetadata> {
        self.machine
            .current()
            .map(|request| self.origins.lookup(&request.origin))
    }

    pub fn spinner(&self) -> char {
        self.clock.spinner_char()
    }

    pub fn current_notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Template values for the active request, rendered through the memo
    pub fn page_content(&mut self) -> Option<PageContent> {
        let values = self.machine.values()?;
        let approval_text = values.approval_text.clone();
        let cancel_text = values.cancel_text.clone();
        let content = self.renderer.render(values.content.as_ref());
        Some(PageContent {
            content,
            approval_text,
            cancel_text,
        })
    }

    // ===== Event loop hooks =====

    pub fn tick(&mut self, now: Instant) {
        self.clock.tick();
        self.notifications.tick(now);

        for intent in self.deck.tick(now) {
            self.machine.handle_deck_intent(intent);
        }

        self.report_resolutions();
        self.sync_queue();
    }

    pub fn apply_completion(&mut self, completion: Completion) {
        if self.machine.apply(completion) {
            self.sync_deck();
        }
        self.report_issues();
    }

    /// Pull the host queue into the machine and follow any navigation
    pub fn sync_queue(&mut self) {
        if self.machine.set_queue(self.queue.snapshot()) {
            self.report_issues();
            self.sync_deck();
            if !self.machine.is_empty() {
                self.view = View::Confirmation;
            }
        }
        if self.route.take() {
            tracing::info!("navigating to default route");
            self.view = View::Home;
            self.show_details = false;
        }
    }

    fn sync_deck(&mut self) {
        if self.deck.request_id() != self.machine.current().map(|r| r.id.as_str()) {
            self.scroll = 0;
        }
        let request_id = self.machine.current().map(|r| r.id.as_str());
        self.deck.sync(request_id, self.machine.current_alerts());
    }

    fn report_resolutions(&mut self) {
        for resolution in self.dispatcher.take_resolutions() {
            let notification = match &resolution {
                Resolution::Approved { id, .. } => Notification::success(format!("Approved {}", id)),
                Resolution::Rejected { id, error } => {
                    Notification::info(format!("Rejected {} ({})", id, error.code))
                }
            };
            self.notify(notification);
        }
    }

    fn report_issues(&mut self) {
        for issue in self.machine.take_issues() {
            let notification = match issue {
                LoadIssue::UnknownRequestType {
                    request_id,
                    request_type,
                } => Notification::error(format!(
                    "Cannot show {}: unsupported request type {}",
                    request_id, request_type
                )),
                LoadIssue::DerivationFailed {
                    request_id, what, ..
                } => Notification::warning(format!(
                    "Could not check {} for {}",
                    what, request_id
                )),
            };
            self.notify(notification);
        }
    }

    // ===== User actions =====

    pub fn approve(&mut self) {
        let Some(action) = self.machine.values().map(|v| v.on_approve.clone()) else {
            return;
        };
        action.invoke();
        self.report_resolutions();
        self.sync_queue();
    }

    pub fn cancel(&mut self) {
        let Some(action) = self.machine.values().map(|v| v.on_cancel.clone()) else {
            return;
        };
        action.invoke();
        self.report_resolutions();
        self.sync_queue();
    }

    pub fn next(&mut self) {
        if self.machine.next() {
            self.show_details = false;
            self.scroll = 0;
            self.sync_deck();
        }
    }

    pub fn previous(&mut self) {
        if self.machine.previous() {
            self.show_details = false;
            self.scroll = 0;
            self.sync_deck();
        }
    }

    /// Close the `index`-th callout (0-based)
    pub fn dismiss_callout(&mut self, index: usize) {
        if let Some(intent) = self.deck.dismiss_at(index, Instant::now()) {
            self.machine.handle_deck_intent(intent);
            self.sync_deck();
        }
    }

    pub fn dismiss_notification(&mut self) {
        self.notifications.dismiss();
    }

    pub fn toggle_details(&mut self) {
        self.show_details = !self.show_details;
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn quit(&mut self) {
        self.machine.shutdown();
        self.deck.clear();
        self.renderer.reset();
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approvals_core::config::EnvironmentType;
    use approvals_core::i18n::Locale;
    use approvals_core::origin::KnownOrigins;
    use approvals_core::queue::demo_requests;
    use approvals_core::error::CoreError;
    use approvals_core::models::PendingRequest;
    use approvals_core::templates::{ChainListSource, ChainRecord, StaticChainList, TemplateRegistry};
    use async_trait::async_trait;

    use crate::ui::notifications::NotificationLevel;

    struct UnreachableChainList;

    #[async_trait]
    impl ChainListSource for UnreachableChainList {
        async fn chain_list(&self) -> Result<Vec<ChainRecord>, CoreError> {
            Err(CoreError::HttpStatus {
                url: "https://chains.invalid".into(),
                status: 503,
            })
        }
    }

    fn app(environment: EnvironmentType, queue: PendingQueue) -> App {
        let dispatcher = Arc::new(QueueDispatcher::new(queue.clone()));
        let route = Arc::new(RouteSignal::new());
        let machine = ConfirmationMachine::new(
            Arc::new(TemplateRegistry::standard(Arc::new(StaticChainList::default()))),
            Arc::new(Locale::english()),
            dispatcher.clone(),
            route.clone(),
            environment,
        );
        App::new(
            machine,
            queue,
            dispatcher,
            route,
            Box::new(KnownOrigins::new()),
            Duration::from_millis(500),
        )
    }

    #[test]
    fn test_approve_drains_queue_and_navigates_home() {
        let queue = PendingQueue::new(demo_requests());
        let mut app = app(EnvironmentType::Popup, queue.clone());
        assert_eq!(app.view, View::Confirmation);
        assert_eq!(app.origin().unwrap().name, "example-site.io");

        app.approve();
        assert!(queue.is_empty());
        assert_eq!(app.view, View::Home);
        assert_eq!(
            app.current_notification().map(|n| n.message.as_str()),
            Some("Approved xlo")
        );
    }

    #[test]
    fn test_notification_environment_stays_put() {
        let queue = PendingQueue::new(demo_requests());
        let mut app = app(EnvironmentType::Notification, queue);
        app.cancel();
        assert_eq!(app.view, View::Confirmation);
        assert!(app.machine().current().is_none());
        assert!(app.current_notification().unwrap().message.contains("4001"));
    }

    #[test]
    fn test_new_request_returns_to_confirmation() {
        let queue = PendingQueue::default();
        let mut app = app(EnvironmentType::Fullscreen, queue.clone());
        assert_eq!(app.view, View::Home);

        queue.push(demo_requests().remove(0));
        app.tick(Instant::now());
        assert_eq!(app.view, View::Confirmation);
        assert!(app.page_content().is_some());
    }

    #[test]
    fn test_unsupported_request_type_raises_error_notification() {
        let queue = PendingQueue::new(vec![PendingRequest::new(
            "m",
            "eth_mystery",
            "https://site.io",
            serde_json::Value::Null,
        )]);
        let mut app = app(EnvironmentType::Popup, queue);
        let current = app.current_notification().unwrap();
        assert_eq!(current.level, NotificationLevel::Error);
        assert_eq!(
            current.message,
            "Cannot show m: unsupported request type eth_mystery"
        );

        app.dismiss_notification();
        assert!(app.current_notification().is_none());
    }

    #[tokio::test]
    async fn test_failed_chain_lookup_raises_warning() {
        let queue = PendingQueue::new(demo_requests());
        let dispatcher = Arc::new(QueueDispatcher::new(queue.clone()));
        let route = Arc::new(RouteSignal::new());
        let mut machine = ConfirmationMachine::new(
            Arc::new(TemplateRegistry::standard(Arc::new(UnreachableChainList))),
            Arc::new(Locale::english()),
            dispatcher.clone(),
            route.clone(),
            EnvironmentType::Popup,
        );
        let mut completions = machine.take_completions().unwrap();
        let mut app = App::new(
            machine,
            queue,
            dispatcher,
            route,
            Box::new(KnownOrigins::new()),
            Duration::from_millis(500),
        );

        for _ in 0..2 {
            let completion = tokio::time::timeout(Duration::from_secs(2), completions.recv())
                .await
                .unwrap()
                .unwrap();
            app.apply_completion(completion);
        }

        let current = app.current_notification().unwrap();
        assert_eq!(current.level, NotificationLevel::Warning);
        assert_eq!(current.message, "Could not check alerts for xlo");
        assert!(app.callouts().is_empty());
    }

    #[test]
    fn test_page_content_is_memoized() {
        let queue = PendingQueue::new(demo_requests());
        let mut app = app(EnvironmentType::Popup, queue);
        let first = app.page_content().unwrap();
        let second = app.page_content().unwrap();
        assert!(Rc::ptr_eq(&first.content, &second.content));
        assert_eq!(first.approval_text, "Approve");
    }
}

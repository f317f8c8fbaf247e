//! Per-request-type confirmation templates.
//!
//! A template turns a pending request into alerts, initial state and
//! presentation values. Templates are registered once at startup; the
//! registry is read-only afterwards.

mod add_ethereum_chain;
mod chain_list;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::constants::message_type;
use crate::dispatch::Dispatch;
use crate::error::CoreError;
use crate::i18n::Translate;
use crate::machine::Completion;
use crate::models::{Alert, Children, PendingRequest, TemplateState};

pub use add_ethereum_chain::{chain_alerts, AddEthereumChain};
pub use chain_list::{ChainListSource, ChainRecord, HttpChainList, NativeCurrency, StaticChainList};

/// A user action wired to the dispatch capability
#[derive(Clone)]
pub struct Action(Arc<dyn Fn() + Send + Sync>);

impl Action {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub fn invoke(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// Presentation values for the active request
#[derive(Debug, Clone)]
pub struct TemplateValues {
    pub content: Option<Children>,
    pub approval_text: String,
    pub cancel_text: String,
    pub on_approve: Action,
    pub on_cancel: Action,
}

impl TemplateValues {
    /// Used when no template can serve the request: nothing to show and
    /// buttons that do nothing
    pub fn empty(translate: &dyn Translate) -> Self {
        Self {
            content: None,
            approval_text: translate.translate("approve", &[]),
            cancel_text: translate.translate("cancel", &[]),
            on_approve: Action::noop(),
            on_cancel: Action::noop(),
        }
    }
}

pub type StateUpdate = Box<dyn FnOnce(&TemplateState) -> TemplateState + Send>;

/// Guarded template-state setter.
///
/// Updates are tagged with the activation they were created for and are
/// dropped by the machine once another request has become active.
#[derive(Clone)]
pub struct StateSetter {
    generation: u64,
    tx: Option<UnboundedSender<Completion>>,
}

impl StateSetter {
    pub(crate) fn new(generation: u64, tx: UnboundedSender<Completion>) -> Self {
        Self {
            generation,
            tx: Some(tx),
        }
    }

    /// A setter not bound to any machine; updates go nowhere
    pub fn detached() -> Self {
        Self {
            generation: 0,
            tx: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn update<F>(&self, update: F)
    where
        F: FnOnce(&TemplateState) -> TemplateState + Send + 'static,
    {
        let Some(tx) = &self.tx else {
            return;
        };
        let completion = Completion::StateUpdate {
            generation: self.generation,
            update: Box::new(update),
        };
        if tx.send(completion).is_err() {
            tracing::debug!("state update dropped: confirmation flow has ended");
        }
    }

    pub fn set(&self, state: TemplateState) {
        self.update(move |_| state);
    }
}

impl fmt::Debug for StateSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSetter")
            .field("generation", &self.generation)
            .field("bound", &self.tx.is_some())
            .finish()
    }
}

#[async_trait]
pub trait ConfirmationTemplate: Send + Sync {
    /// Alerts to attach to the request. Errors are logged by the caller and
    /// treated as "no alerts".
    async fn alerts(&self, request: &PendingRequest) -> anyhow::Result<Vec<Alert>>;

    /// Initial template state for the request
    async fn state(&self, _request: &PendingRequest) -> anyhow::Result<TemplateState> {
        Ok(TemplateState::default())
    }

    fn values(
        &self,
        request: &PendingRequest,
        translate: &dyn Translate,
        dispatch: &Arc<dyn Dispatch>,
        state: &TemplateState,
        set_state: &StateSetter,
    ) -> TemplateValues;
}

#[derive(Default, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, Arc<dyn ConfirmationTemplate>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in template
    pub fn standard(chains: Arc<dyn ChainListSource>) -> Self {
        Self::new().with_template(
            message_type::ADD_ETHEREUM_CHAIN,
            Arc::new(AddEthereumChain::new(chains)),
        )
    }

    pub fn with_template(
        mut self,
        request_type: impl Into<String>,
        template: Arc<dyn ConfirmationTemplate>,
    ) -> Self {
        self.templates.insert(request_type.into(), template);
        self
    }

    pub fn get(&self, request_type: &str) -> Result<Arc<dyn ConfirmationTemplate>, CoreError> {
        self.templates
            .get(request_type)
            .cloned()
            .ok_or_else(|| CoreError::UnknownRequestType(request_type.to_string()))
    }

    pub fn request_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("request_types", &self.request_types())
            .finish()
    }
}

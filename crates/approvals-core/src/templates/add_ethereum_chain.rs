//! `wallet_addEthereumChain`: a site asks to add a custom network.
//!
//! The request is checked against the public chain list. An unknown chain id
//! raises a warning; any mismatch with the recorded chain (name, currency,
//! decimals or RPC host) raises a danger alert.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use url::Url;

use super::chain_list::{ChainListSource, ChainRecord};
use super::{Action, ConfirmationTemplate, StateSetter, TemplateValues};
use crate::constants::{alert_id, NATIVE_CURRENCY_DECIMALS};
use crate::dispatch::{Dispatch, ProviderError};
use crate::i18n::Translate;
use crate::models::{Alert, Children, PendingRequest, Section, Severity, TemplateState};

pub struct AddEthereumChain {
    chains: Arc<dyn ChainListSource>,
}

impl AddEthereumChain {
    pub fn new(chains: Arc<dyn ChainListSource>) -> Self {
        Self { chains }
    }
}

fn verify_link_span(before: &str, after: &str) -> Children {
    Children::Single(Box::new(
        Section::element("span")
            .with_children(vec![
                Section::text(before),
                Section::element("a")
                    .with_prop("href", json!("#"))
                    .with_text("verify the network details")
                    .into(),
                Section::text(after),
            ])
            .into(),
    ))
}

fn unrecognized_chain() -> Alert {
    Alert::new(
        alert_id::UNRECOGNIZED_CHAIN,
        Severity::Warning,
        verify_link_span(
            "This custom network is not recognized. We recommend that you ",
            " before proceeding",
        ),
    )
}

fn invalid_chain() -> Alert {
    Alert::new(
        alert_id::INVALID_CHAIN,
        Severity::Danger,
        verify_link_span(
            "This network details for this Chain ID do not match our records. We recommend that you ",
            " before proceeding.",
        ),
    )
}

/// `"0x2329"` -> 9001
fn parse_chain_id(raw: &str) -> Option<u64> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    u64::from_str_radix(digits, 16).ok()
}

fn hostname(raw: &str) -> Option<String> {
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

fn matches_record(request: &PendingRequest, chain: &ChainRecord) -> bool {
    let currency_ok = chain.native_currency.as_ref().is_some_and(|currency| {
        currency.decimals == Some(NATIVE_CURRENCY_DECIMALS)
            && currency.symbol.is_some()
            && currency.symbol.as_deref() == request.data_str("ticker")
    });
    let name_ok = request
        .data_str("chainName")
        .is_some_and(|name| name.to_lowercase() == chain.name.to_lowercase());
    // An RPC URL that does not parse can never match a known host
    let rpc_ok = request
        .data_str("rpcUrl")
        .and_then(hostname)
        .is_some_and(|host| {
            chain
                .rpc
                .iter()
                .filter_map(|rpc| hostname(rpc))
                .any(|known| known == host)
        });
    currency_ok && name_ok && rpc_ok
}

/// Alerts for `request` given the known chains, in presentation order
pub fn chain_alerts(request: &PendingRequest, chains: &[ChainRecord]) -> Vec<Alert> {
    let chain_id = request.data_str("chainId").and_then(parse_chain_id);
    let matched = chain_id.and_then(|id| chains.iter().find(|chain| chain.chain_id == id));

    let mut alerts = Vec::new();
    match matched {
        None => {
            alerts.push(unrecognized_chain());
            alerts.push(invalid_chain());
        }
        Some(chain) if !matches_record(request, chain) => alerts.push(invalid_chain()),
        Some(_) => {}
    }
    alerts
}

fn chain_id_display(request: &PendingRequest) -> Value {
    match request.data_str("chainId") {
        Some(raw) => parse_chain_id(raw).map(Value::from).unwrap_or_else(|| json!(raw)),
        None => Value::Null,
    }
}

fn data_value(request: &PendingRequest, key: &str) -> Value {
    request.request_data.get(key).cloned().unwrap_or(Value::Null)
}

#[async_trait]
impl ConfirmationTemplate for AddEthereumChain {
    async fn alerts(&self, request: &PendingRequest) -> anyhow::Result<Vec<Alert>> {
        let chains = self
            .chains
            .chain_list()
            .await
            .context("Failed to load the known chain list")?;
        Ok(chain_alerts(request, &chains))
    }

    fn values(
        &self,
        request: &PendingRequest,
        translate: &dyn Translate,
        dispatch: &Arc<dyn Dispatch>,
        _state: &TemplateState,
        _set_state: &StateSetter,
    ) -> TemplateValues {
        let t = |key: &str| translate.translate(key, &[]);
        let chain_name = request.data_str("chainName").unwrap_or_default();

        let mut dictionary = Map::new();
        dictionary.insert(t("networkName"), data_value(request, "chainName"));
        dictionary.insert(t("networkURL"), data_value(request, "rpcUrl"));
        dictionary.insert(t("chainId"), chain_id_display(request));
        dictionary.insert(t("currencySymbol"), data_value(request, "ticker"));
        dictionary.insert(t("blockExplorerUrl"), data_value(request, "blockExplorerUrl"));

        let mut tooltips = Map::new();
        tooltips.insert(t("networkName"), json!(t("networkNameDefinition")));

        let content = vec![
            Section::element("Typography")
                .with_text(translate.translate("allowCustomNetworkTitle", &[chain_name]))
                .with_props(json!({
                    "variant": "h3",
                    "align": "center",
                    "fontWeight": "bold",
                    "boxProps": { "margin": [0, 0, 4] }
                }))
                .into(),
            Section::element("Typography")
                .with_text(t("allowCustomNetworkDescription"))
                .with_props(json!({
                    "variant": "h7",
                    "align": "center",
                    "boxProps": { "margin": [0, 0, 4] }
                }))
                .into(),
            Section::element("Typography")
                .with_children(vec![
                    Section::element("b")
                        .with_text(format!("{} ", t("onlyAddNetworksYouTrust")))
                        .into(),
                    Section::text(t("untrustworthyNetworksCanBeRisky")),
                ])
                .with_props(json!({
                    "variant": "h7",
                    "align": "center",
                    "boxProps": { "margin": 0 }
                }))
                .into(),
            Section::element("TruncatedDefinitionList")
                .with_props(json!({
                    "title": t("networkDetails"),
                    "tooltips": tooltips,
                    "dictionary": dictionary,
                    "prefaceKeys": [t("networkURL"), t("chainId")]
                }))
                .into(),
        ];

        let on_approve = {
            let dispatch = Arc::clone(dispatch);
            let id = request.id.clone();
            let data = request.request_data.clone();
            Action::new(move || dispatch.resolve_pending_approval(&id, data.clone()))
        };
        let on_cancel = {
            let dispatch = Arc::clone(dispatch);
            let id = request.id.clone();
            Action::new(move || {
                dispatch.reject_pending_approval(&id, ProviderError::user_rejected_request())
            })
        };

        TemplateValues {
            content: Some(Children::List(content)),
            approval_text: t("approve"),
            cancel_text: t("cancel"),
            on_approve,
            on_cancel,
        }
    }
}

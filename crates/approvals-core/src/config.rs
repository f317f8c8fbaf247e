use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{ALERT_REMOVAL_DELAY, CHAIN_LIST_REFRESH, CHAIN_LIST_URL};

/// The UI surface the confirmation flow is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentType {
    Popup,
    Fullscreen,
    Notification,
}

impl EnvironmentType {
    /// Whether a drained queue sends the user back to the default route.
    /// The notification window is closed by its host instead, so it stays put.
    pub fn redirects_when_empty(self) -> bool {
        matches!(self, EnvironmentType::Popup | EnvironmentType::Fullscreen)
    }

    pub fn label(self) -> &'static str {
        match self {
            EnvironmentType::Popup => "popup",
            EnvironmentType::Fullscreen => "fullscreen",
            EnvironmentType::Notification => "notification",
        }
    }
}

impl FromStr for EnvironmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "popup" => Ok(EnvironmentType::Popup),
            "fullscreen" => Ok(EnvironmentType::Fullscreen),
            "notification" => Ok(EnvironmentType::Notification),
            other => Err(format!(
                "unknown environment '{}' (expected popup, fullscreen or notification)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub environment: EnvironmentType,
    /// Time between a callout being dismissed and its entry being purged
    pub alert_removal_delay: Duration,
    pub chain_list_url: String,
    pub chain_list_refresh: Duration,
    /// Optional `messages.json` overriding the embedded English locale
    pub locale_path: Option<PathBuf>,
    /// Skip network lookups; templates see an empty chain list
    pub offline: bool,
}

impl CoreConfig {
    pub fn new(environment: EnvironmentType) -> Self {
        Self {
            environment,
            alert_removal_delay: ALERT_REMOVAL_DELAY,
            chain_list_url: CHAIN_LIST_URL.to_string(),
            chain_list_refresh: CHAIN_LIST_REFRESH,
            locale_path: None,
            offline: false,
        }
    }

    pub fn with_locale<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.locale_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_removal_delay(mut self, delay: Duration) -> Self {
        self.alert_removal_delay = delay;
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(EnvironmentType::Popup)
    }
}

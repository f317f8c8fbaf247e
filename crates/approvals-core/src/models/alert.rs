use serde::{Deserialize, Serialize};

use super::section::Children;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

impl Severity {
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Warning => "⚠",
            Severity::Danger => "✗",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "danger" => Some(Severity::Danger),
            _ => None,
        }
    }
}

/// A template-generated warning attached to one pending request.
///
/// `content` is a section tree and goes through the same allowlisted
/// renderer as the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub severity: Severity,
    pub content: Children,
    #[serde(default)]
    pub dismissed: bool,
}

impl Alert {
    pub fn new(id: impl Into<String>, severity: Severity, content: Children) -> Self {
        Self {
            id: id.into(),
            severity,
            content,
            dismissed: false,
        }
    }
}

//! Message lookup for template and page strings.
//!
//! Locale files use the `messages.json` layout:
//! `{ "key": { "message": "Text with $1 placeholders" } }`.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::CoreError;

const ENGLISH_MESSAGES: &str = include_str!("../locales/en/messages.json");

/// Translation capability handed to templates.
///
/// Must be a pure function of key and substitutions.
pub trait Translate: Send + Sync {
    fn translate(&self, key: &str, substitutions: &[&str]) -> String;
}

#[derive(Debug, Deserialize)]
struct MessageEntry {
    message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Locale {
    messages: HashMap<String, String>,
}

impl Locale {
    /// The embedded English locale
    pub fn english() -> Self {
        match Self::from_json(ENGLISH_MESSAGES, "embedded en locale") {
            Ok(locale) => locale,
            Err(e) => {
                tracing::error!("{}", e);
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str, context: &str) -> Result<Self, CoreError> {
        let entries: HashMap<String, MessageEntry> =
            serde_json::from_str(json).map_err(|e| CoreError::json(context, e))?;
        Ok(Self {
            messages: entries
                .into_iter()
                .map(|(key, entry)| (key, entry.message))
                .collect(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Self::from_json(&json, &path.display().to_string())
    }

    /// Layer `self` over `fallback`: keys missing here come from `fallback`
    pub fn with_fallback(mut self, fallback: Locale) -> Self {
        for (key, message) in fallback.messages {
            self.messages.entry(key).or_insert(message);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Translate for Locale {
    fn translate(&self, key: &str, substitutions: &[&str]) -> String {
        let Some(message) = self.messages.get(key) else {
            tracing::warn!("Translator - Unable to find value of key \"{}\"", key);
            return key.to_string();
        };
        substitute(message, substitutions)
    }
}

/// Replace `$1..$n`, highest index first so `$10` is not eaten by `$1`
fn substitute(message: &str, substitutions: &[&str]) -> String {
    let mut out = message.to_string();
    for (idx, value) in substitutions.iter().enumerate().rev() {
        out = out.replace(&format!("${}", idx + 1), value);
    }
    out
}

//! Requesting-site metadata shown in the confirmation header.

use std::collections::HashMap;

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginMetadata {
    pub origin: String,
    /// Display name; the host name when the site is unknown
    pub name: String,
    pub host: String,
    pub icon: Option<String>,
}

pub trait OriginLookup: Send + Sync {
    fn lookup(&self, origin: &str) -> OriginMetadata;
}

/// Metadata registered by the host for sites it has seen before
#[derive(Debug, Clone, Default)]
pub struct KnownOrigins {
    subjects: HashMap<String, (String, Option<String>)>,
}

impl KnownOrigins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        origin: impl Into<String>,
        name: impl Into<String>,
        icon: Option<String>,
    ) {
        self.subjects.insert(origin.into(), (name.into(), icon));
    }
}

impl OriginLookup for KnownOrigins {
    fn lookup(&self, origin: &str) -> OriginMetadata {
        let host = Url::parse(origin)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| strip_http_schemes(origin).trim_end_matches('/').to_string());

        match self.subjects.get(origin) {
            Some((name, icon)) => OriginMetadata {
                origin: origin.to_string(),
                name: name.clone(),
                host,
                icon: icon.clone(),
            },
            None => OriginMetadata {
                origin: origin.to_string(),
                name: host.clone(),
                host,
                icon: None,
            },
        }
    }
}

/// `https://example.io/` -> `example.io/`
pub fn strip_http_schemes(value: &str) -> &str {
    value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_origin_uses_host() {
        let origins = KnownOrigins::new();
        let meta = origins.lookup("https://example-site.io/");
        assert_eq!(meta.name, "example-site.io");
        assert_eq!(meta.host, "example-site.io");
        assert!(meta.icon.is_none());
    }

    #[test]
    fn test_known_origin() {
        let mut origins = KnownOrigins::new();
        origins.register("https://app.uniswap.org", "Uniswap", Some("🦄".into()));
        let meta = origins.lookup("https://app.uniswap.org");
        assert_eq!(meta.name, "Uniswap");
        assert_eq!(meta.host, "app.uniswap.org");
        assert_eq!(meta.icon.as_deref(), Some("🦄"));
    }

    #[test]
    fn test_unparseable_origin() {
        let meta = KnownOrigins::new().lookup("metamask");
        assert_eq!(meta.name, "metamask");
    }

    #[test]
    fn test_strip_http_schemes() {
        assert_eq!(strip_http_schemes("https://a.io/"), "a.io/");
        assert_eq!(strip_http_schemes("http://a.io"), "a.io");
        assert_eq!(strip_http_schemes("chrome-extension://x"), "chrome-extension://x");
    }
}

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::CoreError;

struct CachedResponse {
    fetched_at: Instant,
    body: Value,
}

/// JSON GET client that serves repeat requests from a per-URL cache until
/// `refresh` has elapsed.
pub struct FetchWithCache {
    client: reqwest::Client,
    refresh: Duration,
    cache: Mutex<HashMap<String, CachedResponse>>,
}

impl FetchWithCache {
    pub fn new(refresh: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            refresh,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached(&self, url: &str) -> Option<Value> {
        let cache = self.cache.lock();
        cache
            .get(url)
            .filter(|entry| entry.fetched_at.elapsed() < self.refresh)
            .map(|entry| entry.body.clone())
    }

    pub async fn fetch_json(&self, url: &str) -> Result<Value, CoreError> {
        if let Some(body) = self.cached(url) {
            tracing::debug!("Serving {} from cache", url);
            return Ok(body);
        }

        let response = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|source| CoreError::Http {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CoreError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(|source| CoreError::Http {
            url: url.to_string(),
            source,
        })?;

        self.cache.lock().insert(
            url.to_string(),
            CachedResponse {
                fetched_at: Instant::now(),
                body: body.clone(),
            },
        );
        Ok(body)
    }

    #[cfg(test)]
    fn seed(&self, url: &str, body: Value, fetched_at: Instant) {
        self.cache
            .lock()
            .insert(url.to_string(), CachedResponse { fetched_at, body });
    }
}

//! Known-chain lookup used to vet add-network requests.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::fetch::FetchWithCache;

/// Partially filled currencies are kept so they can fail validation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NativeCurrency {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u64>,
}

/// One entry of the public chain list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRecord {
    pub name: String,
    pub chain_id: u64,
    #[serde(default)]
    pub rpc: Vec<String>,
    #[serde(default)]
    pub native_currency: Option<NativeCurrency>,
}

impl ChainRecord {
    /// Parse a chain list, skipping entries that do not have the expected
    /// shape instead of rejecting the whole list
    pub fn parse_list(value: Value) -> Vec<ChainRecord> {
        let Value::Array(entries) = value else {
            tracing::warn!("chain list is not an array; treating it as empty");
            return Vec::new();
        };
        let total = entries.len();
        let records: Vec<ChainRecord> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        if records.len() < total {
            tracing::debug!("skipped {} malformed chain list entries", total - records.len());
        }
        records
    }
}

#[async_trait]
pub trait ChainListSource: Send + Sync {
    async fn chain_list(&self) -> Result<Vec<ChainRecord>, CoreError>;
}

/// Chain list fetched over HTTP and cached between lookups
pub struct HttpChainList {
    url: String,
    fetcher: FetchWithCache,
}

impl HttpChainList {
    pub fn new(url: impl Into<String>, fetcher: FetchWithCache) -> Self {
        Self {
            url: url.into(),
            fetcher,
        }
    }
}

#[async_trait]
impl ChainListSource for HttpChainList {
    async fn chain_list(&self) -> Result<Vec<ChainRecord>, CoreError> {
        let body = self.fetcher.fetch_json(&self.url).await?;
        Ok(ChainRecord::parse_list(body))
    }
}

/// Fixed chain list; empty in offline mode
#[derive(Debug, Clone, Default)]
pub struct StaticChainList {
    chains: Vec<ChainRecord>,
}

impl StaticChainList {
    pub fn new(chains: Vec<ChainRecord>) -> Self {
        Self { chains }
    }
}

#[async_trait]
impl ChainListSource for StaticChainList {
    async fn chain_list(&self) -> Result<Vec<ChainRecord>, CoreError> {
        Ok(self.chains.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_list_skips_malformed_entries() {
        let records = ChainRecord::parse_list(json!([
            {
                "name": "Ethereum Mainnet",
                "chainId": 1,
                "rpc": ["https://mainnet.infura.io/v3/${INFURA_API_KEY}"],
                "nativeCurrency": { "name": "Ether", "symbol": "ETH", "decimals": 18 }
            },
            { "name": "broken" },
            { "name": "No RPC", "chainId": 5 }
        ]));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].chain_id, 1);
        assert_eq!(
            records[0].native_currency.as_ref().unwrap().symbol.as_deref(),
            Some("ETH")
        );
        assert!(records[1].rpc.is_empty());
        assert!(records[1].native_currency.is_none());
    }

    #[test]
    fn test_incomplete_currency_keeps_entry() {
        let records = ChainRecord::parse_list(json!([
            {
                "name": "Half Chain",
                "chainId": 77,
                "nativeCurrency": { "name": "Half", "symbol": "HLF" }
            }
        ]));
        assert_eq!(records.len(), 1);
        let currency = records[0].native_currency.as_ref().unwrap();
        assert_eq!(currency.symbol.as_deref(), Some("HLF"));
        assert_eq!(currency.decimals, None);
    }

    #[test]
    fn test_parse_non_array() {
        assert!(ChainRecord::parse_list(json!({ "chains": [] })).is_empty());
    }

    #[tokio::test]
    async fn test_static_list() {
        let source = StaticChainList::default();
        assert!(source.chain_list().await.unwrap().is_empty());
    }
}

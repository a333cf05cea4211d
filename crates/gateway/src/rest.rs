use std::time::Duration;

use async_trait::async_trait;
use crossrate_core::PairId;
use crossrate_ports::{PairSource, PairSourceError};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

const TRADING_PAIRS_PATH: &str = "/api/tradingPairs";

/// Response envelope shared by the exchange's public REST endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct TradingPair {
    #[serde(default)]
    pub name: Option<String>,
}

/// Pair discovery over the exchange's REST API
#[derive(Clone)]
pub struct RestPairSource {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl RestPairSource {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        RestPairSource {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PairSourceError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| PairSourceError::Request(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PairSourceError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(PairSourceError::Request(format!("HTTP {}: {}", status, text)));
        }

        serde_json::from_str(&text).map_err(|e| PairSourceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PairSource for RestPairSource {
    async fn fetch_pairs(&self) -> Result<Vec<PairId>, PairSourceError> {
        tracing::info!(url = %self.base_url, "Requesting available currency pairs");

        let response: Option<ApiResponse<Vec<TradingPair>>> = self.get(TRADING_PAIRS_PATH).await?;
        let pairs = match response {
            Some(response) => pair_names(response)?,
            None => Vec::new(),
        };

        tracing::info!(count = pairs.len(), "Finished loading currency pairs");
        Ok(pairs)
    }
}

/// Usable pair identifiers from a decoded envelope, sorted and deduplicated
pub fn pair_names(response: ApiResponse<Vec<TradingPair>>) -> Result<Vec<PairId>, PairSourceError> {
    if response.error {
        let message = response
            .error_message
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(PairSourceError::Api(message));
    }

    let data = response.data.unwrap_or_default();
    if data.is_empty() {
        tracing::warn!("Exchange returned an empty trading pair list");
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = data
        .into_iter()
        .filter_map(|pair| pair.name)
        .filter(|name| !name.trim().is_empty())
        .collect();
    names.sort();
    names.dedup();

    Ok(names.into_iter().map(PairId::new).collect())
}

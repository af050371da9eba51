use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{CryptoProvider, HttpClient};
use crate::config::CryptoConfig;
use crate::{ErrorCode, Result, ShowcaseError};

/// USD price entry of one asset from `/simple/price`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub usd: f64,
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
    #[serde(default)]
    pub usd_market_cap: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    rates: HashMap<String, f64>,
}

/// CoinGecko prices plus a USD-based exchange rate feed
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    prices: HttpClient,
    rates: HttpClient,
    base_url: String,
    exchange_url: String,
}

impl CoinGeckoClient {
    pub fn new(config: &CryptoConfig) -> Result<Self> {
        Ok(Self {
            prices: HttpClient::new("Crypto", config.timeout_seconds)?,
            rates: HttpClient::new("Exchange", config.timeout_seconds)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            exchange_url: config.exchange_url.clone(),
        })
    }
}

#[async_trait]
impl CryptoProvider for CoinGeckoClient {
    #[instrument(skip(self))]
    async fn prices(&self, ids: &[String]) -> Result<HashMap<String, PriceEntry>> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true&include_market_cap=true",
            self.base_url,
            urlencoding::encode(&ids.join(","))
        );
        self.prices.get_json(&url).await
    }

    #[instrument(skip(self))]
    async fn usd_rate(&self, currency: &str) -> Result<f64> {
        let response: ExchangeResponse = self.rates.get_json(&self.exchange_url).await?;
        response.rates.get(currency).copied().ok_or_else(|| {
            ShowcaseError::api_with_context(
                format!("No USD rate for {currency}"),
                ErrorCode::ApiInvalidResponse,
                HashMap::from([("currency".to_string(), currency.to_string())]),
            )
        })
    }
}

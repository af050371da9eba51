//! Crypto price quotes

use serde::{Deserialize, Serialize};

use crate::lookup::CryptoAsset;

/// Price of one asset in USD and in the configured local currency
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CryptoQuote {
    pub id: String,
    pub display_name: String,
    pub symbol: String,
    pub emoji: String,
    pub price_usd: f64,
    pub price_local: f64,
    pub change_24h_percent: f64,
    pub market_cap_usd: f64,
}

impl CryptoQuote {
    /// Build a quote from a USD price entry and the USD→local rate
    #[must_use]
    pub fn from_usd(
        asset: &CryptoAsset,
        price_usd: f64,
        change_24h_percent: f64,
        market_cap_usd: f64,
        usd_to_local: f64,
    ) -> Self {
        Self {
            id: asset.id.to_string(),
            display_name: asset.name.to_string(),
            symbol: asset.symbol.to_string(),
            emoji: asset.emoji.to_string(),
            price_usd,
            price_local: price_usd * usd_to_local,
            change_24h_percent,
            market_cap_usd,
        }
    }

    #[must_use]
    pub fn is_rising(&self) -> bool {
        self.change_24h_percent >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::crypto_asset;

    #[test]
    fn test_local_price_uses_rate() {
        let asset = crypto_asset("bitcoin").unwrap();
        let quote = CryptoQuote::from_usd(asset, 60_000.0, -1.25, 1.2e12, 0.9);

        assert_eq!(quote.symbol, "BTC");
        assert!((quote.price_local - 54_000.0).abs() < 1e-6);
        assert!(!quote.is_rising());
    }
}

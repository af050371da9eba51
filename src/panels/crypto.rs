use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{PanelSlot, Tab};
use crate::Result;
use crate::api::CryptoProvider;
use crate::config::CryptoConfig;
use crate::document::Document;
use crate::html::{
    NumberLocale, error_block, escape_html, format_market_cap, format_number,
    format_signed_percent, loading_block, no_results,
};
use crate::lookup::crypto_asset;
use crate::models::CryptoQuote;
use crate::widget::RenderState;

/// Price board for the configured assets
pub struct CryptoPanel {
    slot: PanelSlot,
    provider: Arc<dyn CryptoProvider>,
    ids: Vec<String>,
    local_currency: String,
}

impl CryptoPanel {
    pub fn new(provider: Arc<dyn CryptoProvider>, config: &CryptoConfig) -> Self {
        Self {
            slot: PanelSlot::new(Tab::Crypto),
            provider,
            ids: config.ids.clone(),
            local_currency: config.local_currency.clone(),
        }
    }

    pub async fn state(&self) -> RenderState {
        self.slot.state().await
    }

    /// Prices and the exchange rate are both required
    pub async fn quotes(&self) -> Result<(Vec<CryptoQuote>, f64)> {
        let (prices, rate) = futures::future::try_join(
            self.provider.prices(&self.ids),
            self.provider.usd_rate(&self.local_currency),
        )
        .await?;

        let quotes = self
            .ids
            .iter()
            .filter_map(|id| {
                let Some(entry) = prices.get(id) else {
                    warn!("No price for {}", id);
                    return None;
                };
                let asset = crypto_asset(id)?;
                Some(CryptoQuote::from_usd(
                    asset,
                    entry.usd,
                    entry.usd_24h_change.unwrap_or_default(),
                    entry.usd_market_cap.unwrap_or_default(),
                    rate,
                ))
            })
            .collect::<Vec<_>>();

        info!("{} quotes at 1 USD = {} {}", quotes.len(), rate, self.local_currency);
        Ok((quotes, rate))
    }

    pub async fn load(&self, doc: &Mutex<Document>) -> RenderState {
        let ticket = self.slot.begin();
        self.slot
            .commit(doc, ticket, RenderState::Loading, loading_block("Loading crypto prices..."))
            .await;

        let (state, html) = match self.quotes().await {
            Ok((quotes, _)) if quotes.is_empty() => (
                RenderState::Empty,
                no_results("💰 No prices available", "Please try again later."),
            ),
            Ok((quotes, rate)) => (RenderState::Content, self.render(&quotes, rate)),
            Err(err) => {
                warn!("Crypto load failed: {}", err);
                (
                    RenderState::Error,
                    error_block("⚠️", "Crypto data unavailable", &err.user_message(), Some("crypto")),
                )
            }
        };

        self.slot.commit(doc, ticket, state, html).await;
        self.slot.state().await
    }

    fn render(&self, quotes: &[CryptoQuote], rate: f64) -> String {
        let currency = escape_html(&self.local_currency);
        let cards: String = quotes
            .iter()
            .map(|quote| {
                let (direction, icon) = if quote.is_rising() {
                    ("positive", "📈")
                } else {
                    ("negative", "📉")
                };
                format!(
                    r#"<div class="crypto-card">
<div class="crypto-info"><div class="crypto-icon">{emoji}</div><div class="crypto-details"><h4>{name}</h4><span class="crypto-symbol">{symbol}</span></div></div>
<div class="crypto-prices"><div class="price-usd">${usd}</div><div class="price-chf">{currency} {local}</div></div>
<div class="crypto-change {direction}"><span class="change-icon">{icon}</span><span class="change-value">{change}</span></div>
<div class="crypto-marketcap"><span class="marketcap-label">Market Cap:</span><span class="marketcap-value">${cap}</span></div>
</div>"#,
                    emoji = quote.emoji,
                    name = escape_html(&quote.display_name),
                    symbol = escape_html(&quote.symbol.to_uppercase()),
                    usd = format_number(quote.price_usd, NumberLocale::EnUs, 2, 6),
                    local = format_number(quote.price_local, NumberLocale::DeCh, 2, 2),
                    change = format_signed_percent(quote.change_24h_percent),
                    cap = format_market_cap(quote.market_cap_usd),
                )
            })
            .collect();

        format!(
            r#"<div class="crypto-header"><h3>💰 Top Cryptocurrencies</h3><p class="exchange-rate">1 USD = {rate:.2} {currency}</p></div>
<div class="crypto-cards">{cards}</div>
<div class="crypto-footer"><p class="disclaimer">💡 Prices are updated in real-time from CoinGecko API</p></div>"#
        )
    }
}

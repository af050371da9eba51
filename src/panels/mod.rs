//! The four showcase panels and their tab identifiers

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::ShowcaseError;
use crate::document::Document;
use crate::widget::{RenderState, RequestSequence, Ticket};

pub mod crypto;
pub mod movies;
pub mod weather;
pub mod world;

pub use crypto::CryptoPanel;
pub use movies::MoviePanel;
pub use weather::{DEFAULT_CITIES, WeatherPanel};
pub use world::WorldPanel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    World,
    Weather,
    Crypto,
    Movies,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::World, Tab::Weather, Tab::Crypto, Tab::Movies];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::World => "world",
            Self::Weather => "weather",
            Self::Crypto => "crypto",
            Self::Movies => "movies",
        }
    }

    /// Element the panel renders into
    #[must_use]
    pub fn container_id(self) -> &'static str {
        match self {
            Self::World => "world-content",
            Self::Weather => "weather-grid",
            Self::Crypto => "crypto-grid",
            Self::Movies => "movies-grid",
        }
    }

    #[must_use]
    pub fn panel_id(self) -> String {
        format!("{}-panel", self.as_str())
    }

    #[must_use]
    pub fn button_id(self) -> String {
        format!("{}-tab", self.as_str())
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = ShowcaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s)
            .ok_or_else(|| ShowcaseError::validation(format!("unknown tab: {s}")))
    }
}

/// Per-panel bookkeeping: render state plus the request sequence guarding
/// the panel's container
#[derive(Debug)]
pub(crate) struct PanelSlot {
    tab: Tab,
    state: Mutex<RenderState>,
    sequence: RequestSequence,
}

impl PanelSlot {
    pub(crate) fn new(tab: Tab) -> Self {
        Self {
            tab,
            state: Mutex::new(RenderState::Idle),
            sequence: RequestSequence::new(),
        }
    }

    pub(crate) fn begin(&self) -> Ticket {
        self.sequence.issue()
    }

    pub(crate) async fn state(&self) -> RenderState {
        *self.state.lock().await
    }

    /// Write `html` into the container if `ticket` is still the latest
    /// request. Returns false for a stale result, which is dropped.
    pub(crate) async fn commit(
        &self,
        doc: &Mutex<Document>,
        ticket: Ticket,
        state: RenderState,
        html: String,
    ) -> bool {
        if !self.sequence.is_current(ticket) {
            debug!(
                tab = %self.tab,
                ticket = ticket.number(),
                "Discarding stale {} result",
                state
            );
            return false;
        }
        doc.lock().await.set_container(self.tab.container_id(), html);
        *self.state.lock().await = state;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_parse() {
        assert_eq!("crypto".parse::<Tab>().unwrap(), Tab::Crypto);
        assert!(matches!(
            "settings".parse::<Tab>(),
            Err(ShowcaseError::Validation { .. })
        ));
        assert_eq!(Tab::Movies.panel_id(), "movies-panel");
    }

    #[tokio::test]
    async fn test_stale_commit_is_dropped() {
        let doc = Mutex::new(Document::new());
        let slot = PanelSlot::new(Tab::Weather);

        let slow = slot.begin();
        let fast = slot.begin();

        assert!(slot.commit(&doc, fast, RenderState::Content, "new".to_string()).await);
        assert!(!slot.commit(&doc, slow, RenderState::Content, "old".to_string()).await);

        assert_eq!(doc.lock().await.container("weather-grid"), Some("new"));
        assert_eq!(slot.state().await, RenderState::Content);
    }
}

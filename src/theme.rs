//! Light/dark theme with a persisted user override

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::document::Document;
use crate::storage::PreferenceStore;
use crate::{Result, ShowcaseError};

/// Preference key holding the user's explicit choice
pub const THEME_KEY: &str = "theme";
/// Element whose text shows the toggle icon
pub const THEME_ICON_ID: &str = "theme-icon";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon on the toggle: offers the other mode
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Light => "🌙",
            Self::Dark => "☀️",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ShowcaseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ShowcaseError::validation(format!("unknown theme: {other}"))),
        }
    }
}

/// Snapshot returned to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeState {
    pub theme: Theme,
    /// Whether an explicit user choice is stored
    pub stored: bool,
    pub icon: &'static str,
}

/// Resolves, applies and persists the theme
pub struct ThemeController {
    store: Arc<dyn PreferenceStore>,
    current: Mutex<Theme>,
}

impl ThemeController {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            store,
            current: Mutex::new(Theme::default()),
        }
    }

    async fn stored(&self) -> Option<Theme> {
        match self.store.get(THEME_KEY).await {
            Ok(Some(value)) => match value.parse() {
                Ok(theme) => Some(theme),
                Err(err) => {
                    warn!("Ignoring stored theme: {}", err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("Reading theme preference failed: {}", err);
                None
            }
        }
    }

    async fn apply(&self, doc: &mut Document, theme: Theme) -> ThemeState {
        *self.current.lock().await = theme;
        doc.set_root_attribute("data-theme", theme.as_str());
        doc.set_text(THEME_ICON_ID, theme.icon());
        info!(theme = %theme, "Theme applied");
        ThemeState {
            theme,
            stored: self.stored().await.is_some(),
            icon: theme.icon(),
        }
    }

    /// Initial theme: stored choice, else the OS preference, else light
    pub async fn load(&self, doc: &mut Document, os_preference: Option<Theme>) -> ThemeState {
        let theme = self
            .stored()
            .await
            .or(os_preference)
            .unwrap_or_default();
        self.apply(doc, theme).await
    }

    /// Flip the current theme and persist it as the user's choice.
    ///
    /// The flip is applied even when persisting fails.
    pub async fn toggle(&self, doc: &mut Document) -> Result<ThemeState> {
        let next = self.current.lock().await.flipped();
        let persisted = self.store.put(THEME_KEY, next.as_str()).await;
        let state = self.apply(doc, next).await;
        persisted.map(|()| state)
    }

    /// OS preference changed; ignored while a user choice is stored
    pub async fn os_changed(&self, doc: &mut Document, os_theme: Theme) -> ThemeState {
        if self.stored().await.is_some() {
            return self.state().await;
        }
        self.apply(doc, os_theme).await
    }

    /// Forget the user's choice so OS changes apply again
    pub async fn clear(&self) -> Result<ThemeState> {
        self.store.remove(THEME_KEY).await?;
        Ok(self.state().await)
    }

    pub async fn state(&self) -> ThemeState {
        let theme = *self.current.lock().await;
        ThemeState {
            theme,
            stored: self.stored().await.is_some(),
            icon: theme.icon(),
        }
    }
}

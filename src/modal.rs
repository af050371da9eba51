//! Single-instance modal dialogs
//!
//! Each kind has one fixed node id. Showing a kind tears down any existing
//! instance first, so there is never more than one node per id. Every
//! dismissal path runs the same teardown.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::ShowcaseError;
use crate::document::{Document, KeyListener, ModalNode};
use crate::html::escape_html;

/// Body class that locks page scrolling while a modal is open
pub const MODAL_OPEN_CLASS: &str = "modal-open";

const ESCAPE_KEY: &str = "Escape";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ModalKind {
    #[serde(rename = "weather-modal")]
    Weather,
    #[serde(rename = "movie-modal")]
    Movie,
}

impl ModalKind {
    /// Fixed node id of this kind's single instance
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Weather => "weather-modal",
            Self::Movie => "movie-modal",
        }
    }

    fn subject(self) -> &'static str {
        match self {
            Self::Weather => "weather forecast",
            Self::Movie => "movie details",
        }
    }
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModalKind {
    type Err = ShowcaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weather-modal" => Ok(Self::Weather),
            "movie-modal" => Ok(Self::Movie),
            other => Err(ShowcaseError::validation(format!("unknown modal: {other}"))),
        }
    }
}

/// What the modal body shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalView {
    Loading,
    /// Rendered body HTML
    Content(String),
    Error,
}

/// How the user asked to close a modal
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum Dismissal {
    CloseButton,
    /// A click on the overlay; clicks that land on the content are ignored
    Backdrop {
        #[serde(default)]
        on_content: bool,
    },
}

fn render_shell(kind: ModalKind, view: &ModalView) -> String {
    let id = kind.id();
    let body = match view {
        ModalView::Loading => format!(
            r#"<div class="modal-content loading"><div class="spinner"></div><p>Loading {}...</p></div>"#,
            kind.subject()
        ),
        ModalView::Error => format!(
            r#"<div class="modal-content error"><h3>⚠️ Error</h3><p>Sorry, couldn't load {}. Please try again.</p><button class="modal-close-btn" data-dismiss="{id}">Close</button></div>"#,
            escape_html(kind.subject())
        ),
        ModalView::Content(html) => format!(
            r#"<div class="modal-content details" tabindex="-1"><button class="modal-close-x" data-dismiss="{id}" aria-label="Close modal">×</button>{html}<button class="modal-close-btn" data-dismiss="{id}">Close</button></div>"#
        ),
    };
    format!(r#"<div id="{id}" class="{id} show" data-backdrop="{id}">{body}</div>"#)
}

/// Show `view` in the single instance of `kind`
pub fn show(doc: &mut Document, kind: ModalKind, view: &ModalView) {
    teardown(doc, kind);

    let listener = doc.add_key_listener(KeyListener {
        key: ESCAPE_KEY.to_string(),
        modal_id: kind.id().to_string(),
    });
    doc.insert_modal(ModalNode {
        id: kind.id().to_string(),
        html: render_shell(kind, view),
        listener: Some(listener),
    });
    doc.add_body_class(MODAL_OPEN_CLASS);
    debug!(modal = kind.id(), "Modal shown");
}

/// Remove the node and its key listener. Scrolling unlocks once no modal
/// of any kind is left.
///
/// Safe to call when no instance exists.
pub fn close(doc: &mut Document, kind: ModalKind) {
    if teardown(doc, kind) {
        debug!(modal = kind.id(), "Modal closed");
    }
    if doc.modal_count() == 0 {
        doc.remove_body_class(MODAL_OPEN_CLASS);
    }
}

fn teardown(doc: &mut Document, kind: ModalKind) -> bool {
    match doc.take_modal(kind.id()) {
        Some(node) => {
            if let Some(listener) = node.listener {
                doc.remove_key_listener(listener);
            }
            true
        }
        None => false,
    }
}

/// Apply a click-driven dismissal, returning whether the modal closed
pub fn dismiss(doc: &mut Document, kind: ModalKind, dismissal: &Dismissal) -> bool {
    match dismissal {
        Dismissal::Backdrop { on_content: true } => false,
        Dismissal::CloseButton | Dismissal::Backdrop { on_content: false } => {
            close(doc, kind);
            true
        }
    }
}

/// Deliver a key press to the registered listeners, returning the modals
/// it closed
pub fn key_pressed(doc: &mut Document, key: &str) -> Vec<ModalKind> {
    let mut closed = Vec::new();
    for (_, listener) in doc.listeners_for(key) {
        if let Ok(kind) = listener.modal_id.parse::<ModalKind>() {
            close(doc, kind);
            closed.push(kind);
        }
    }
    closed
}

/// Remove every modal node and listener, e.g. when the page session resets
pub fn cleanup_all(doc: &mut Document) {
    let ids: Vec<String> = doc.modal_ids().map(ToString::to_string).collect();
    for id in ids {
        if let Some(node) = doc.take_modal(&id)
            && let Some(listener) = node.listener
        {
            doc.remove_key_listener(listener);
        }
    }
    doc.remove_body_class(MODAL_OPEN_CLASS);
    debug!("All modals cleaned up");
}

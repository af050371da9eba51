//! Mobile navigation menu

use crate::document::Document;

pub const NAV_MENU_ID: &str = "navMenu";
pub const NAV_TOGGLE_ID: &str = "navToggle";
const ACTIVE: &str = "active";

/// Flip the menu and its toggle button, returning whether it is now open
pub fn toggle(doc: &mut Document) -> bool {
    let open = !is_open(doc);
    set_open(doc, open);
    open
}

/// Handle a click anywhere on the page.
///
/// `path` lists the ids of the clicked element and its ancestors. A click
/// outside both the menu and its toggle closes an open menu.
pub fn page_clicked<S: AsRef<str>>(doc: &mut Document, path: &[S]) -> bool {
    let inside = path
        .iter()
        .any(|id| matches!(id.as_ref(), NAV_MENU_ID | NAV_TOGGLE_ID));
    if !inside && is_open(doc) {
        set_open(doc, false);
    }
    is_open(doc)
}

#[must_use]
pub fn is_open(doc: &Document) -> bool {
    doc.node_has_class(NAV_MENU_ID, ACTIVE)
}

fn set_open(doc: &mut Document, open: bool) {
    for node in [NAV_MENU_ID, NAV_TOGGLE_ID] {
        if open {
            doc.add_node_class(node, ACTIVE);
        } else {
            doc.remove_node_class(node, ACTIVE);
        }
    }
}

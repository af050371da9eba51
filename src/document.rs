//! In-memory stand-in for the page the widgets render into
//!
//! Holds exactly the state the runtime reads or writes: container HTML by
//! element id, CSS classes on the body and on named nodes, attributes on the
//! root element, element text, modal nodes and the registered key
//! listeners. The host serializes fragments out of it; tests assert on it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use tokio::sync::Mutex;

/// Document shared between panels, modals and the host
pub type SharedDocument = Arc<Mutex<Document>>;

/// Handle for a registered key listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// A key listener owned by one modal node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyListener {
    pub key: String,
    pub modal_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalNode {
    pub id: String,
    pub html: String,
    /// Listener removed together with the node
    pub listener: Option<ListenerId>,
}

#[derive(Debug, Default)]
pub struct Document {
    containers: HashMap<String, String>,
    text: HashMap<String, String>,
    body_classes: BTreeSet<String>,
    node_classes: HashMap<String, BTreeSet<String>>,
    root_attributes: BTreeMap<String, String>,
    modals: BTreeMap<String, ModalNode>,
    key_listeners: BTreeMap<ListenerId, KeyListener>,
    next_listener: u64,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> SharedDocument {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Replace the whole content of a container
    pub fn set_container(&mut self, id: &str, html: impl Into<String>) {
        self.containers.insert(id.to_string(), html.into());
    }

    #[must_use]
    pub fn container(&self, id: &str) -> Option<&str> {
        self.containers.get(id).map(String::as_str)
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        self.text.insert(id.to_string(), text.into());
    }

    #[must_use]
    pub fn text(&self, id: &str) -> Option<&str> {
        self.text.get(id).map(String::as_str)
    }

    pub fn add_body_class(&mut self, class: &str) {
        self.body_classes.insert(class.to_string());
    }

    pub fn remove_body_class(&mut self, class: &str) {
        self.body_classes.remove(class);
    }

    #[must_use]
    pub fn body_has_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    pub fn add_node_class(&mut self, node: &str, class: &str) {
        self.node_classes
            .entry(node.to_string())
            .or_default()
            .insert(class.to_string());
    }

    pub fn remove_node_class(&mut self, node: &str, class: &str) {
        if let Some(classes) = self.node_classes.get_mut(node) {
            classes.remove(class);
        }
    }

    /// Flip `class` on `node`, returning whether it is now present
    pub fn toggle_node_class(&mut self, node: &str, class: &str) -> bool {
        let classes = self.node_classes.entry(node.to_string()).or_default();
        if classes.remove(class) {
            false
        } else {
            classes.insert(class.to_string());
            true
        }
    }

    #[must_use]
    pub fn node_has_class(&self, node: &str, class: &str) -> bool {
        self.node_classes
            .get(node)
            .is_some_and(|classes| classes.contains(class))
    }

    pub fn set_root_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.root_attributes.insert(name.to_string(), value.into());
    }

    #[must_use]
    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes.get(name).map(String::as_str)
    }

    /// Append a modal node, replacing any node with the same id
    pub fn insert_modal(&mut self, node: ModalNode) -> Option<ModalNode> {
        self.modals.insert(node.id.clone(), node)
    }

    pub fn take_modal(&mut self, id: &str) -> Option<ModalNode> {
        self.modals.remove(id)
    }

    #[must_use]
    pub fn modal(&self, id: &str) -> Option<&ModalNode> {
        self.modals.get(id)
    }

    pub fn modal_ids(&self) -> impl Iterator<Item = &str> {
        self.modals.keys().map(String::as_str)
    }

    #[must_use]
    pub fn modal_count(&self) -> usize {
        self.modals.len()
    }

    pub fn add_key_listener(&mut self, listener: KeyListener) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.key_listeners.insert(id, listener);
        id
    }

    pub fn remove_key_listener(&mut self, id: ListenerId) -> Option<KeyListener> {
        self.key_listeners.remove(&id)
    }

    /// Listeners registered for `key`, in registration order
    #[must_use]
    pub fn listeners_for(&self, key: &str) -> Vec<(ListenerId, KeyListener)> {
        self.key_listeners
            .iter()
            .filter(|(_, listener)| listener.key == key)
            .map(|(id, listener)| (*id, listener.clone()))
            .collect()
    }

    #[must_use]
    pub fn key_listener_count(&self) -> usize {
        self.key_listeners.len()
    }
}

//! Owned, mutable model of the host page.
//!
//! The agent never controls the host's lifecycle: the host may detach,
//! rebuild or replace any subtree at any time. Everything the agent needs
//! (lookups, visible text, insertion of its own elements, observation of
//! structural change) goes through this type.
//!
//! The tree is the `ego_tree` arena that `scraper` parses into. The arena
//! only grows: detached nodes stay allocated until the document is dropped,
//! so the agent reuses its own elements instead of rebuilding them.

use ego_tree::NodeRef;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{CaseSensitivity, ElementRef, Html, Node, Selector, StrTendril};
use thiserror::Error;
use tokio::sync::mpsc;

pub use ego_tree::NodeId;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A selector string `scraper` could not compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid selector '{selector}': {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

/// Compile `source` into a [`Selector`].
pub fn parse_selector(source: &str) -> Result<Selector, SelectorError> {
    Selector::parse(source).map_err(|err| SelectorError {
        selector: source.to_string(),
        message: err.to_string(),
    })
}

/// A child-list change observed under a watched subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Node whose children changed.
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

/// Receiving end of a [`Document::observe`] registration.
///
/// Dropping the watch unregisters it on the next mutation.
pub struct MutationWatch {
    receiver: mpsc::UnboundedReceiver<MutationRecord>,
}

impl MutationWatch {
    /// Wait for the next record. Returns `None` once the document is gone.
    pub async fn changed(&mut self) -> Option<MutationRecord> {
        self.receiver.recv().await
    }

    /// Take every record delivered so far without waiting.
    pub fn drain(&mut self) -> Vec<MutationRecord> {
        let mut records = Vec::new();
        while let Ok(record) = self.receiver.try_recv() {
            records.push(record);
        }
        records
    }
}

struct Watcher {
    target: NodeId,
    subtree: bool,
    sender: mpsc::UnboundedSender<MutationRecord>,
}

/// Host document backed by a parsed [`Html`] tree.
pub struct Document {
    html: Html,
    body: NodeId,
    watchers: Vec<Watcher>,
    selection: Option<NodeId>,
    copy_command_enabled: bool,
    copied: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty page: `<html><head></head><body></body></html>`.
    pub fn new() -> Self {
        Self::parse_html("")
    }

    pub(super) fn from_html(html: Html, body: NodeId) -> Self {
        Self {
            html,
            body,
            watchers: Vec::new(),
            selection: None,
            copy_command_enabled: true,
            copied: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.html.tree.root().id()
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn allocated(&self) -> usize {
        self.html.tree.nodes().count()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.html.tree.orphan(element_node(tag)).id()
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.html.tree.orphan(text_node(text)).id()
    }

    fn get(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.get(id).map(|node| node.value())
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id)?.as_element()
    }

    fn element_ref(&self, id: NodeId) -> Option<ElementRef<'_>> {
        ElementRef::wrap(self.get(id)?)
    }

    /// Lowercase tag name.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent().map(|parent| parent.id())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|node| node.children().map(|child| child.id()).collect())
            .unwrap_or_default()
    }

    fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling().map(|sibling| sibling.id())
    }

    // ---------------------------------------------------------------
    // Tree mutation
    // ---------------------------------------------------------------

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` before `reference` (or at the end when `None`, or
    /// when `reference` is not a child of `parent`).
    ///
    /// Inserting a node into its own subtree is refused.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        if self.contains(child, parent) {
            tracing::warn!(?parent, ?child, "Refusing to insert a node into its own subtree");
            return;
        }
        let reference = match reference {
            Some(r) if r == child => self.next_sibling(child),
            other => other,
        }
        .filter(|&r| self.parent(r) == Some(parent));

        self.remove(child);
        let attached = match reference {
            Some(reference) => match self.html.tree.get_mut(reference) {
                Some(mut node) => {
                    node.insert_id_before(child);
                    true
                }
                None => false,
            },
            None => match self.html.tree.get_mut(parent) {
                Some(mut node) => {
                    node.append_id(child);
                    true
                }
                None => false,
            },
        };
        if attached {
            self.notify(MutationRecord {
                target: parent,
                added: vec![child],
                removed: Vec::new(),
            });
        }
    }

    /// Detach `id` from its parent. The subtree stays intact.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
        self.notify(MutationRecord {
            target: parent,
            added: Vec::new(),
            removed: vec![id],
        });
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let removed = self.children(id);
        if removed.is_empty() {
            return;
        }
        for &child in &removed {
            if let Some(mut node) = self.html.tree.get_mut(child) {
                node.detach();
            }
        }
        self.notify(MutationRecord {
            target: id,
            added: Vec::new(),
            removed,
        });
    }

    /// `textContent` setter. An element whose only child is a text node
    /// keeps that node and has its text replaced; otherwise the children
    /// are replaced by a single text node. An empty string leaves the
    /// element without children.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let target = match self.children(id).as_slice() {
            [only] if !text.is_empty() && self.node(*only).is_some_and(Node::is_text) => *only,
            _ if self.node(id).is_some_and(Node::is_text) => id,
            _ => {
                self.clear_children(id);
                if !text.is_empty() {
                    let node = self.create_text(text);
                    self.append_child(id, node);
                }
                return;
            }
        };
        if let Some(mut node) = self.html.tree.get_mut(target) {
            *node.value() = text_node(text);
        }
    }

    /// Concatenation of every descendant text node, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        node.descendants()
            .filter_map(|node| node.value().as_text())
            .map(|text| &**text)
            .collect()
    }

    // ---------------------------------------------------------------
    // Attributes, classes, styles
    // ---------------------------------------------------------------

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        self.update_attributes(id, |attrs| {
            match attrs.iter_mut().find(|(key, _)| *key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attrs.push((name, value.to_string())),
            }
        });
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        self.update_attributes(id, |attrs| attrs.retain(|(key, _)| key != name));
    }

    /// Rebuild the element so its cached id and class lists follow the
    /// new attributes.
    fn update_attributes(&mut self, id: NodeId, update: impl FnOnce(&mut Vec<(String, String)>)) {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return;
        };
        let Node::Element(element) = node.value() else {
            return;
        };
        let mut attrs: Vec<(String, String)> = element
            .attrs()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        update(&mut attrs);
        let attributes = attrs
            .iter()
            .map(|(key, value)| Attribute {
                name: QualName::new(None, Namespace::from(""), LocalName::from(key.as_str())),
                value: html5ever::tendril::StrTendril::from_slice(value),
            })
            .collect();
        *element = Element::new(element.name.clone(), attributes);
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|el| el.has_class(class, CaseSensitivity::CaseSensitive))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) || self.element(id).is_none() {
            return;
        }
        let classes = match self.attribute(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", &classes);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(existing) = self.attribute(id, "class") else {
            return;
        };
        let remaining = existing
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(id, "class", &remaining);
    }

    /// Inline style property, e.g. `display`. The last declaration wins.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        style_declarations(self.attribute(id, "style")?)
            .filter(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
            .last()
    }

    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let property = property.to_ascii_lowercase();
        let mut declarations: Vec<(String, String)> = self
            .attribute(id, "style")
            .map(|style| {
                style_declarations(style)
                    .filter(|(name, _)| !name.eq_ignore_ascii_case(&property))
                    .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        declarations.push((property, value.to_string()));
        let style = declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attribute(id, "style", &style);
    }

    /// True when the element is hidden by its own attributes or inline style.
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.attribute(id, "hidden").is_some() || self.style(id, "display") == Some("none")
    }

    // ---------------------------------------------------------------
    // Structure queries
    // ---------------------------------------------------------------

    /// True when `id` is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root(), id)
    }

    /// Inclusive ancestor test: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// Descendants of `scope` (excluding `scope`) in document order.
    pub fn descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.get(scope)
            .into_iter()
            .flat_map(|node| node.descendants().skip(1))
            .map(|node| node.id())
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = parse_selector(selector)?;
        Ok(self.select(&selector))
    }

    /// Every connected element matching `selector`, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.select_within(self.root(), selector)
    }

    /// Elements under `scope` matching `selector`, in document order.
    pub fn select_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&node| {
                self.element_ref(node)
                    .is_some_and(|element| selector.matches(&element))
            })
            .collect()
    }

    // ---------------------------------------------------------------
    // Observation
    // ---------------------------------------------------------------

    /// Watch child-list changes on `target` (and below it when `subtree`).
    ///
    /// A watch is also told when `target` itself, or one of its ancestors,
    /// is removed from the page.
    pub fn observe(&mut self, target: NodeId, subtree: bool) -> MutationWatch {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.watchers.push(Watcher {
            target,
            subtree,
            sender,
        });
        MutationWatch { receiver }
    }

    fn notify(&mut self, record: MutationRecord) {
        self.watchers.retain(|w| !w.sender.is_closed());
        for watcher in &self.watchers {
            let inside = watcher.target == record.target
                || (watcher.subtree && self.contains(watcher.target, record.target));
            let lost = record
                .removed
                .iter()
                .any(|&removed| self.contains(removed, watcher.target));
            if inside || lost {
                let _ = watcher.sender.send(record.clone());
            }
        }
    }

    // ---------------------------------------------------------------
    // Selection and the host copy command
    // ---------------------------------------------------------------

    /// Select the contents of `id` (its `value` for form fields).
    pub fn select_contents(&mut self, id: NodeId) {
        self.selection = Some(id);
    }

    /// Whether the host still honours the copy command.
    pub fn set_copy_command_enabled(&mut self, enabled: bool) {
        self.copy_command_enabled = enabled;
    }

    /// Copy the current selection. Returns false when nothing was copied.
    pub fn exec_copy(&mut self) -> bool {
        if !self.copy_command_enabled {
            return false;
        }
        let Some(selected) = self.selection else {
            return false;
        };
        if !self.is_connected(selected) {
            return false;
        }
        let text = match self.attribute(selected, "value") {
            Some(value) => value.to_string(),
            None => self.text_content(selected),
        };
        self.copied = Some(text);
        true
    }

    /// Text most recently placed on the host clipboard by [`Self::exec_copy`].
    pub fn copied_text(&self) -> Option<&str> {
        self.copied.as_deref()
    }
}

/// Attribute-less HTML element.
pub(super) fn element_node(tag: &str) -> Node {
    let name = QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(tag.to_ascii_lowercase().as_str()),
    );
    Node::Element(Element::new(name, Vec::new()))
}

fn text_node(text: &str) -> Node {
    Node::Text(Text {
        text: StrTendril::from_slice(text),
    })
}

fn style_declarations(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        let property = property.trim();
        (!property.is_empty()).then(|| (property, value.trim()))
    })
}

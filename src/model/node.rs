// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;

use super::ids::NodeId;
use super::style::NodeStyle;

/// Which side of the root a top-level branch hangs on. Only meaningful for
/// direct children of the root; deeper nodes inherit their branch side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A directed edge to another node, owned by the source node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    target: NodeId,
    label: Option<String>,
}

impl Connector {
    pub fn new(target: NodeId, label: Option<String>) -> Self {
        Self { target, label }
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// A vertex of the document tree.
///
/// Tree shape (parent/children) is only mutated through [`super::Document`],
/// which keeps the parent pointers and child sequences consistent; everything
/// else on the node is free to change in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: String,
    note: Option<String>,
    folded: bool,
    style: NodeStyle,
    icons: Vec<String>,
    attributes: Vec<(String, String)>,
    connectors: Vec<Connector>,
    side: Option<Side>,
}

impl Node {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            text: text.into(),
            note: None,
            folded: false,
            style: NodeStyle::default(),
            icons: Vec::new(),
            attributes: Vec::new(),
            connectors: Vec::new(),
            side: None,
        }
    }

    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = Some(note.into());
    }

    pub fn folded(&self) -> bool {
        self.folded
    }

    pub fn set_folded(&mut self, folded: bool) {
        self.folded = folded;
    }

    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut NodeStyle {
        &mut self.style
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn set_side(&mut self, side: Option<Side>) {
        self.side = side;
    }

    pub fn icons(&self) -> &[String] {
        &self.icons
    }

    /// Appends an icon; the same icon may be attached more than once.
    pub fn add_icon(&mut self, icon: impl Into<String>) {
        self.icons.push(icon.into());
    }

    /// Removes the first occurrence of `icon`; false when it was not attached.
    pub fn remove_icon(&mut self, icon: &str) -> bool {
        match self.icons.iter().position(|attached| attached == icon) {
            Some(index) => {
                self.icons.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_icons(&mut self) {
        self.icons.clear();
    }

    /// Ordered association list; names need not be unique.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Updates the first entry named `name`, or appends a new entry.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing_value)) => *existing_value = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Removes the last entry named `name` (last-match-wins for duplicate
    /// names); false when no entry matched.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        match self.attributes.iter().rposition(|(existing, _)| existing == name) {
            Some(index) => {
                self.attributes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn add_connector(&mut self, connector: Connector) {
        self.connectors.push(connector);
    }

    /// Removes every connector pointing at `target`; returns how many went.
    pub fn remove_connectors_to(&mut self, target: &NodeId) -> usize {
        let before = self.connectors.len();
        self.connectors.retain(|connector| connector.target() != target);
        before - self.connectors.len()
    }

    pub(crate) fn drop_dangling_connectors(&mut self, removed: &BTreeSet<NodeId>) {
        self.connectors.retain(|connector| !removed.contains(connector.target()));
    }
}

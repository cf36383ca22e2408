// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, BTreeSet};

use super::ids::NodeId;
use super::node::{Node, Side};

/// The live mind map: an id-keyed node arena with exactly one root.
///
/// The document also carries the current selection (the implicit target for
/// commands that omit `node_id`) and the last centered node. Tree shape only
/// changes through [`Self::create_child`], [`Self::create_sibling`] and
/// [`Self::remove_subtree`], which keep parent pointers, child sequences and
/// the selection consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    file_path: Option<String>,
    nodes: BTreeMap<NodeId, Node>,
    root_id: NodeId,
    selected_id: NodeId,
    centered_id: Option<NodeId>,
    next_serial: u64,
}

impl Document {
    pub fn new(title: impl Into<String>, root_text: impl Into<String>) -> Self {
        let root_id = NodeId::generated(1);
        let mut nodes = BTreeMap::new();
        nodes.insert(root_id.clone(), Node::new(root_text));
        Self {
            title: title.into(),
            file_path: None,
            nodes,
            selected_id: root_id.clone(),
            root_id,
            centered_id: None,
            next_serial: 2,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: impl Into<String>) {
        self.file_path = Some(path.into());
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root_id
    }

    pub fn selected_id(&self) -> &NodeId {
        &self.selected_id
    }

    /// Moves the selection; false (selection unchanged) if `id` is unknown.
    pub fn select(&mut self, id: &NodeId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        self.selected_id = id.clone();
        true
    }

    pub fn centered_id(&self) -> Option<&NodeId> {
        self.centered_id.as_ref()
    }

    /// Records `id` as the centered node; false if `id` is unknown.
    pub fn center_on(&mut self, id: &NodeId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        self.centered_id = Some(id.clone());
        true
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn is_root(&self, id: &NodeId) -> bool {
        *id == self.root_id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 0-based position of `id` within its parent's child sequence; None for
    /// the root and for unknown ids.
    pub fn child_index(&self, id: &NodeId) -> Option<usize> {
        let parent_id = self.nodes.get(id)?.parent()?;
        let parent = self.nodes.get(parent_id)?;
        parent.children().iter().position(|child| child == id)
    }

    /// Appends a new child under `parent`; None if `parent` is unknown.
    pub fn create_child(
        &mut self,
        parent: &NodeId,
        text: impl Into<String>,
        side: Option<Side>,
    ) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let id = self.mint_id();
        let parent_node = self.nodes.get_mut(parent)?;
        parent_node.children_mut().push(id.clone());

        let mut node = Node::new(text);
        node.set_parent(Some(parent.clone()));
        node.set_side(side);
        self.nodes.insert(id.clone(), node);
        Some(id)
    }

    /// Inserts a new sibling next to `anchor` (immediately before it when
    /// `before`, immediately after otherwise). None if `anchor` is unknown or
    /// has no parent. The sibling inherits the anchor's branch side.
    pub fn create_sibling(
        &mut self,
        anchor: &NodeId,
        text: impl Into<String>,
        before: bool,
    ) -> Option<NodeId> {
        let anchor_node = self.nodes.get(anchor)?;
        let parent_id = anchor_node.parent()?.clone();
        let side = anchor_node.side();

        let id = self.mint_id();
        let parent = self.nodes.get_mut(&parent_id)?;
        let anchor_position = parent.children().iter().position(|child| child == anchor)?;
        let insert_at = if before { anchor_position } else { anchor_position + 1 };
        parent.children_mut().insert(insert_at, id.clone());

        let mut node = Node::new(text);
        node.set_parent(Some(parent_id));
        node.set_side(side);
        self.nodes.insert(id.clone(), node);
        Some(id)
    }

    /// Removes `id` and every descendant. Returns the number of nodes
    /// removed; 0 for unknown ids and for the root (which never goes away).
    ///
    /// A selection inside the removed subtree moves to the subtree's former
    /// parent; connectors from surviving nodes into the subtree are dropped.
    pub fn remove_subtree(&mut self, id: &NodeId) -> usize {
        if self.is_root(id) || !self.nodes.contains_key(id) {
            return 0;
        }
        let parent_id = self.nodes.get(id).and_then(|node| node.parent().cloned());

        let mut removed = BTreeSet::new();
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children().iter().cloned());
            }
            removed.insert(current);
        }
        for removed_id in &removed {
            self.nodes.remove(removed_id);
        }

        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children_mut().retain(|child| child != id);
            }
            if removed.contains(&self.selected_id) {
                self.selected_id = parent_id;
            }
        }
        if self
            .centered_id
            .as_ref()
            .is_some_and(|centered| removed.contains(centered))
        {
            self.centered_id = None;
        }
        for node in self.nodes.values_mut() {
            node.drop_dangling_connectors(&removed);
        }

        removed.len()
    }

    fn mint_id(&mut self) -> NodeId {
        let id = NodeId::generated(self.next_serial);
        self.next_serial = self.next_serial.saturating_add(1);
        id
    }
}

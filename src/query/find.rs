// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

use crate::model::{Document, NodeId};

/// Every node id in the document, pre-order from the root (a node before its
/// children, children in sequence order). Folded branches are traversed like
/// any other.
pub fn preorder(doc: &Document) -> Vec<NodeId> {
    preorder_from(doc, doc.root_id())
}

/// Pre-order ids of the subtree rooted at `start`; empty if `start` is
/// unknown.
pub fn preorder_from(doc: &Document, start: &NodeId) -> Vec<NodeId> {
    let mut visited = Vec::new();
    if !doc.contains(start) {
        return visited;
    }
    let mut stack = vec![start.clone()];
    while let Some(current) = stack.pop() {
        if let Some(node) = doc.node(&current) {
            for child in node.children().iter().rev() {
                stack.push(child.clone());
            }
            visited.push(current);
        }
    }
    visited
}

/// Ids of all nodes whose text contains `query`, in pre-order visitation
/// order. The whole tree is visited; matching never short-circuits. With
/// `case_sensitive` false, query and node text are lowercased before the
/// containment check.
pub fn find_by_text(doc: &Document, query: &str, case_sensitive: bool) -> Vec<NodeId> {
    let needle = if case_sensitive { query.to_owned() } else { query.to_lowercase() };
    preorder(doc)
        .into_iter()
        .filter(|id| {
            doc.node(id).is_some_and(|node| {
                if case_sensitive {
                    node.text().contains(&needle)
                } else {
                    node.text().to_lowercase().contains(&needle)
                }
            })
        })
        .collect()
}

/// Number of nodes in the subtree rooted at `id` (the node itself plus all
/// descendants). A leaf counts 1; an unknown id counts 0.
pub fn subtree_size(doc: &Document, id: &NodeId) -> usize {
    preorder_from(doc, id).len()
}

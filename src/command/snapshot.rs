// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Color, Document, Node, NodeId};

/// Stable JSON projection of one node, embedded in command replies.
///
/// `note` is an empty string when absent, never null. The two colors are
/// lowercase `#rrggbb` or null when unset, never omitted. `attributes` is the
/// mapping view of the node's association list; with duplicate names the
/// last entry wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeSnapshot {
    pub id: String,
    pub text: String,
    pub note: String,
    pub is_root: bool,
    pub is_folded: bool,
    pub child_count: usize,
    pub icons: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: Option<String>,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
}

/// Projects `id` out of the document; None when the node is gone.
pub fn snapshot(doc: &Document, id: &NodeId) -> Option<NodeSnapshot> {
    let node = doc.node(id)?;
    Some(NodeSnapshot {
        id: id.as_str().to_owned(),
        text: node.text().to_owned(),
        note: node.note().unwrap_or("").to_owned(),
        is_root: doc.is_root(id),
        is_folded: node.folded(),
        child_count: node.children().len(),
        icons: node.icons().to_vec(),
        attributes: attribute_map(node),
        style: node.style().name().map(str::to_owned),
        text_color: node.style().text_color().map(Color::to_hex),
        background_color: node.style().background_color().map(Color::to_hex),
    })
}

pub fn attribute_map(node: &Node) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (name, value) in node.attributes() {
        map.insert(name.clone(), value.clone());
    }
    map
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::snapshot;
    use crate::model::{Color, Document};

    #[test]
    fn fresh_node_projects_defaults() {
        let doc = Document::new("map", "root");
        let snap = snapshot(&doc, doc.root_id()).expect("root snapshot");

        assert_eq!(snap.text, "root");
        assert_eq!(snap.note, "");
        assert!(snap.is_root);
        assert!(!snap.is_folded);
        assert_eq!(snap.child_count, 0);
        assert!(snap.icons.is_empty());
        assert!(snap.attributes.is_empty());
        assert_eq!(snap.style, None);
        assert_eq!(snap.text_color, None);
        assert_eq!(snap.background_color, None);
    }

    #[test]
    fn unset_colors_serialize_as_null_not_missing() {
        let doc = Document::new("map", "root");
        let snap = snapshot(&doc, doc.root_id()).expect("root snapshot");
        let value = serde_json::to_value(&snap).expect("to json");

        assert_eq!(value.get("text_color"), Some(&json!(null)));
        assert_eq!(value.get("background_color"), Some(&json!(null)));
        assert_eq!(value.get("style"), Some(&json!(null)));
        assert_eq!(value.get("note"), Some(&json!("")));
    }

    #[test]
    fn colors_project_as_lowercase_hex() {
        let mut doc = Document::new("map", "root");
        let root = doc.root_id().clone();
        let style = doc.node_mut(&root).expect("root").style_mut();
        style.set_text_color(Color::from_rgb(0xff, 0x00, 0x00));
        style.set_background_color(Color::from_rgb(0xab, 0xcd, 0xef));

        let snap = snapshot(&doc, &root).expect("root snapshot");
        assert_eq!(snap.text_color.as_deref(), Some("#ff0000"));
        assert_eq!(snap.background_color.as_deref(), Some("#abcdef"));
    }

    #[test]
    fn child_count_and_root_flag_track_the_tree() {
        let mut doc = Document::new("map", "root");
        let root = doc.root_id().clone();
        let child = doc.create_child(&root, "child", None).expect("child");

        let root_snap = snapshot(&doc, &root).expect("root snapshot");
        assert!(root_snap.is_root);
        assert_eq!(root_snap.child_count, 1);

        let child_snap = snapshot(&doc, &child).expect("child snapshot");
        assert!(!child_snap.is_root);
        assert_eq!(child_snap.child_count, 0);
    }
}

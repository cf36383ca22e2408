// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::snapshot::NodeSnapshot;

/// Acknowledgement for mutations that leave no node to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Acknowledgement carrying the node the command landed on
/// (create/select/navigate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeAck {
    pub success: bool,
    pub node: NodeSnapshot,
}

/// Read reply for `get_selected_node` / `get_root`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NodeView {
    pub node: NodeSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AttributesView {
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NoteView {
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IconCatalogView {
    pub icons: Vec<String>,
}

/// `file` is null for maps that have never been saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapInfo {
    pub title: String,
    pub file: Option<String>,
    pub node_count: usize,
    pub root_id: String,
}

/// Search results in pre-order visitation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FindResults {
    pub results: Vec<NodeSnapshot>,
    pub count: usize,
}

/// Reply of `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatusReply {
    pub status: String,
    pub version: String,
    pub map_title: String,
    pub current_node: String,
}

/// Reply of `POST /stop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StopReply {
    pub status: String,
}

/// Any successful command reply. Serialized untagged: the wire shape is the
/// variant's own fields, nothing more.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandReply {
    NodeAck(NodeAck),
    Ack(Ack),
    NodeView(NodeView),
    Attributes(AttributesView),
    Note(NoteView),
    IconCatalog(IconCatalogView),
    MapInfo(MapInfo),
    Find(FindResults),
}

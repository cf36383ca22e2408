// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use crate::command::reply::{
    Ack, AttributesView, FindResults, IconCatalogView, MapInfo, NodeAck, NodeView, NoteView,
    StatusReply,
};
pub use crate::command::snapshot::NodeSnapshot;

use crate::mcp::client::ClientError;

// Tool parameter structs double as the wire params for `POST /execute`:
// absent optionals are omitted from the serialized object, so the bridge
// sees exactly what the caller provided.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BranchSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NodeIdParams {
    pub node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NodeTargetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NavigateToChildParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateChildNodeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<BranchSide>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateSiblingNodeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NodeTextParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NodeColorParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NodeStyleParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub style: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FontFormattingParams {
    pub node_id: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub size: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IconParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddConnectorParams {
    pub source_id: String,
    pub target_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveConnectorParams {
    pub source_id: String,
    pub target_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetAttributeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AttributeNameParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindNodesParams {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

/// Reply of `check_connection`: either the relayed bridge status or a
/// connection failure with a hint. The tool itself never errors.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConnectionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ConnectionReport {
    pub fn running(status: StatusReply) -> Self {
        Self {
            status: Some(status.status),
            version: Some(status.version),
            map_title: Some(status.map_title),
            current_node: Some(status.current_node),
            error: None,
            details: None,
            hint: None,
        }
    }

    pub fn unreachable(err: &ClientError) -> Self {
        let mut details = err.to_string();
        if let Some(source) = std::error::Error::source(err) {
            details.push_str(": ");
            details.push_str(&source.to_string());
        }
        Self {
            status: None,
            version: None,
            map_title: None,
            current_node: None,
            error: Some("Cannot connect to bridge".to_owned()),
            details: Some(details),
            hint: Some(
                "Make sure the bridge server is running (start it with `mindbridge --demo`) \
                 and that MINDBRIDGE_HOST/MINDBRIDGE_PORT point at it"
                    .to_owned(),
            ),
        }
    }
}

/// Reply of `set_font_formatting`: one entry per issued sub-command, in
/// bold/italic/size order, plus whether every step succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FontFormattingOutcome {
    pub results: Vec<Value>,
    pub success: bool,
}

// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use super::client::{BridgeClient, ClientError};
use super::types::*;

/// The client adapter: an MCP server whose tools each perform one HTTP call
/// against the bridge. It keeps no map state of its own; the bridge's
/// document is the single source of truth.
#[derive(Clone)]
pub struct MindBridgeMcp {
    client: BridgeClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl MindBridgeMcp {
    pub fn new(client: BridgeClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Issues one command and decodes the success body into the tool's typed
    /// reply. Bridge-side `{error}` bodies become typed MCP errors.
    async fn run<T: DeserializeOwned>(
        &self,
        command: &str,
        params: Value,
    ) -> Result<Json<T>, ErrorData> {
        let body = self
            .client
            .execute(command, params)
            .await
            .map_err(relay_error)?;
        let typed = serde_json::from_value(body).map_err(|err| {
            ErrorData::internal_error(format!("unexpected bridge reply: {err}"), None)
        })?;
        Ok(Json(typed))
    }

    async fn font_step(
        &self,
        command: &str,
        params: Value,
        results: &mut Vec<Value>,
        success: &mut bool,
    ) -> Result<(), ErrorData> {
        match self.client.execute(command, params).await {
            Ok(body) => {
                *success &= body.get("success").and_then(Value::as_bool).unwrap_or(true);
                results.push(body);
            }
            Err(ClientError::Bridge { body, .. }) => {
                *success = false;
                results.push(body);
            }
            Err(err) => return Err(relay_error(err)),
        }
        Ok(())
    }

    /// Check if the bridge server is running and reachable; reports a
    /// connection failure with a hint instead of erroring.
    #[tool(name = "check_connection")]
    async fn check_connection(&self) -> Result<Json<ConnectionReport>, ErrorData> {
        match self.client.status().await {
            Ok(status) => Ok(Json(ConnectionReport::running(status))),
            Err(err) => Ok(Json(ConnectionReport::unreachable(&err))),
        }
    }

    /// Get information about the currently open mind map.
    #[tool(name = "get_map_info")]
    async fn get_map_info(&self) -> Result<Json<MapInfo>, ErrorData> {
        self.run("get_map_info", json!({})).await
    }

    /// Get information about the currently selected node.
    #[tool(name = "get_selected_node")]
    async fn get_selected_node(&self) -> Result<Json<NodeView>, ErrorData> {
        self.run("get_selected_node", json!({})).await
    }

    /// Get information about the root node of the map.
    #[tool(name = "get_root_node")]
    async fn get_root_node(&self) -> Result<Json<NodeView>, ErrorData> {
        self.run("get_root", json!({})).await
    }

    /// Select a specific node by its ID; commands without a node_id then
    /// target it.
    #[tool(name = "select_node")]
    async fn select_node(
        &self,
        params: Parameters<NodeIdParams>,
    ) -> Result<Json<NodeAck>, ErrorData> {
        self.run("select_node", to_params(&params.0)?).await
    }

    /// Navigate to the parent of the currently selected node.
    #[tool(name = "navigate_to_parent")]
    async fn navigate_to_parent(
        &self,
        params: Parameters<NodeTargetParams>,
    ) -> Result<Json<NodeAck>, ErrorData> {
        self.run("navigate_to_parent", to_params(&params.0)?).await
    }

    /// Navigate to a child of the currently selected node by position
    /// (default: the first child).
    #[tool(name = "navigate_to_child")]
    async fn navigate_to_child(
        &self,
        params: Parameters<NavigateToChildParams>,
    ) -> Result<Json<NodeAck>, ErrorData> {
        self.run("navigate_to_child", to_params(&params.0)?).await
    }

    /// Create a new child node under the selected node (or a given one).
    #[tool(name = "create_child_node")]
    async fn create_child_node(
        &self,
        params: Parameters<CreateChildNodeParams>,
    ) -> Result<Json<NodeAck>, ErrorData> {
        self.run("create_child", to_params(&params.0)?).await
    }

    /// Create a new sibling node next to the selected node (or a given one).
    #[tool(name = "create_sibling_node")]
    async fn create_sibling_node(
        &self,
        params: Parameters<CreateSiblingNodeParams>,
    ) -> Result<Json<NodeAck>, ErrorData> {
        self.run("create_sibling", to_params(&params.0)?).await
    }

    /// Change the text of a node.
    #[tool(name = "set_node_text")]
    async fn set_node_text(
        &self,
        params: Parameters<NodeTextParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("set_node_text", to_params(&params.0)?).await
    }

    /// Delete a node and all its children; the selection moves to its parent.
    #[tool(name = "delete_node")]
    async fn delete_node(
        &self,
        params: Parameters<NodeTargetParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("delete_node", to_params(&params.0)?).await
    }

    /// Set the text color of a node (a color name or #rrggbb).
    #[tool(name = "set_node_color")]
    async fn set_node_color(
        &self,
        params: Parameters<NodeColorParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("set_node_color", to_params(&params.0)?).await
    }

    /// Set the background color of a node (a color name or #rrggbb).
    #[tool(name = "set_background_color")]
    async fn set_background_color(
        &self,
        params: Parameters<NodeColorParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("set_background_color", to_params(&params.0)?).await
    }

    /// Apply a named style to a node.
    #[tool(name = "set_node_style")]
    async fn set_node_style(
        &self,
        params: Parameters<NodeStyleParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("set_node_style", to_params(&params.0)?).await
    }

    /// Set font formatting (bold, italic, size) for a node; each provided
    /// field is applied as its own step.
    #[tool(name = "set_font_formatting")]
    async fn set_font_formatting(
        &self,
        params: Parameters<FontFormattingParams>,
    ) -> Result<Json<FontFormattingOutcome>, ErrorData> {
        let FontFormattingParams {
            node_id,
            bold,
            italic,
            size,
        } = params.0;

        let mut results = Vec::new();
        let mut success = true;
        if let Some(bold) = bold {
            let step = json!({ "node_id": &node_id, "bold": bold });
            self.font_step("set_font_bold", step, &mut results, &mut success)
                .await?;
        }
        if let Some(italic) = italic {
            let step = json!({ "node_id": &node_id, "italic": italic });
            self.font_step("set_font_italic", step, &mut results, &mut success)
                .await?;
        }
        if let Some(size) = size {
            let step = json!({ "node_id": &node_id, "size": size });
            self.font_step("set_font_size", step, &mut results, &mut success)
                .await?;
        }
        Ok(Json(FontFormattingOutcome { results, success }))
    }

    /// Add an icon to a node.
    #[tool(name = "add_icon")]
    async fn add_icon(&self, params: Parameters<IconParams>) -> Result<Json<Ack>, ErrorData> {
        self.run("add_icon", to_params(&params.0)?).await
    }

    /// Remove an icon from a node.
    #[tool(name = "remove_icon")]
    async fn remove_icon(&self, params: Parameters<IconParams>) -> Result<Json<Ack>, ErrorData> {
        self.run("remove_icon", to_params(&params.0)?).await
    }

    /// Remove all icons from a node.
    #[tool(name = "remove_all_icons")]
    async fn remove_all_icons(
        &self,
        params: Parameters<NodeTargetParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("remove_all_icons", to_params(&params.0)?).await
    }

    /// List all icon names that can be added to nodes.
    #[tool(name = "list_icons")]
    async fn list_icons(&self) -> Result<Json<IconCatalogView>, ErrorData> {
        self.run("list_icons", json!({})).await
    }

    /// Add a visual connector (arrow) between two nodes.
    #[tool(name = "add_connector")]
    async fn add_connector(
        &self,
        params: Parameters<AddConnectorParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("add_connector", to_params(&params.0)?).await
    }

    /// Remove the connectors between two nodes.
    #[tool(name = "remove_connector")]
    async fn remove_connector(
        &self,
        params: Parameters<RemoveConnectorParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("remove_connector", to_params(&params.0)?).await
    }

    /// Set a custom attribute (name-value pair) on a node.
    #[tool(name = "set_node_attribute")]
    async fn set_node_attribute(
        &self,
        params: Parameters<SetAttributeParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("set_attribute", to_params(&params.0)?).await
    }

    /// Get all attributes of a node.
    #[tool(name = "get_node_attributes")]
    async fn get_node_attributes(
        &self,
        params: Parameters<NodeTargetParams>,
    ) -> Result<Json<AttributesView>, ErrorData> {
        self.run("get_attributes", to_params(&params.0)?).await
    }

    /// Remove a custom attribute from a node.
    #[tool(name = "remove_node_attribute")]
    async fn remove_node_attribute(
        &self,
        params: Parameters<AttributeNameParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("remove_attribute", to_params(&params.0)?).await
    }

    /// Set or replace the note text of a node.
    #[tool(name = "set_node_note")]
    async fn set_node_note(
        &self,
        params: Parameters<NodeTextParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("set_note", to_params(&params.0)?).await
    }

    /// Get the note text of a node.
    #[tool(name = "get_node_note")]
    async fn get_node_note(
        &self,
        params: Parameters<NodeTargetParams>,
    ) -> Result<Json<NoteView>, ErrorData> {
        self.run("get_note", to_params(&params.0)?).await
    }

    /// Fold (collapse) a node to hide its children.
    #[tool(name = "fold_node")]
    async fn fold_node(&self, params: Parameters<NodeIdParams>) -> Result<Json<Ack>, ErrorData> {
        self.run("fold_node", to_params(&params.0)?).await
    }

    /// Unfold (expand) a node to show its children.
    #[tool(name = "unfold_node")]
    async fn unfold_node(&self, params: Parameters<NodeIdParams>) -> Result<Json<Ack>, ErrorData> {
        self.run("unfold_node", to_params(&params.0)?).await
    }

    /// Center the map view on a specific node.
    #[tool(name = "center_on_node")]
    async fn center_on_node(
        &self,
        params: Parameters<NodeIdParams>,
    ) -> Result<Json<Ack>, ErrorData> {
        self.run("center_on_node", to_params(&params.0)?).await
    }

    /// Search for nodes whose text contains the given string.
    #[tool(name = "find_nodes")]
    async fn find_nodes(
        &self,
        params: Parameters<FindNodesParams>,
    ) -> Result<Json<FindResults>, ErrorData> {
        self.run("find_nodes", to_params(&params.0)?).await
    }
}

#[tool_handler]
impl ServerHandler for MindBridgeMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Mind-map remote control over a local bridge server (tools: check_connection, get_map_info, get_selected_node, get_root_node, select_node, navigate_to_parent, navigate_to_child, create_child_node, create_sibling_node, set_node_text, delete_node, set_node_color, set_background_color, set_node_style, set_font_formatting, add_icon, remove_icon, remove_all_icons, list_icons, add_connector, remove_connector, set_node_attribute, get_node_attributes, remove_node_attribute, set_node_note, get_node_note, fold_node, unfold_node, center_on_node, find_nodes)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn to_params<T: Serialize>(params: &T) -> Result<Value, ErrorData> {
    serde_json::to_value(params)
        .map_err(|err| ErrorData::internal_error(format!("cannot encode params: {err}"), None))
}

/// `{error}` bodies from the bridge become typed tool errors; the full body
/// rides along as data so extras like `available_commands` survive the relay.
fn relay_error(err: ClientError) -> ErrorData {
    match err {
        ClientError::Bridge { message, body } => {
            if message.starts_with("Node not found") {
                ErrorData::resource_not_found(message, Some(body))
            } else {
                ErrorData::invalid_params(message, Some(body))
            }
        }
        other => ErrorData::internal_error(other.to_string(), None),
    }
}

#[cfg(test)]
mod e2e;

// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

//! Command dispatch over the live document.
//!
//! A request is `(command name, params object)`; the name selects exactly one
//! typed handler. `node_id` defaults to the current selection wherever it is
//! optional, so the selection carried by [`Document`] is an explicit input to
//! every dispatch call. Domain failures come back as [`CommandError`] values
//! that render to the wire as `{"error": ...}` bodies; none of them leave a
//! partial mutation behind.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::model::{Color, ColorParseError, Connector, Document, Node, NodeId, Side, ICON_CATALOG};
use crate::query;

pub mod reply;
pub mod snapshot;

pub use reply::{
    Ack, AttributesView, CommandReply, FindResults, IconCatalogView, MapInfo, NodeAck, NodeView,
    NoteView, StatusReply, StopReply,
};
pub use snapshot::{attribute_map, snapshot, NodeSnapshot};

/// Text given to nodes created without an explicit `text` param.
pub const DEFAULT_NODE_TEXT: &str = "New Node";

/// Every command name the dispatcher knows, in catalog order. Returned
/// verbatim as `available_commands` on unknown-command errors.
pub const COMMAND_NAMES: [&str; 31] = [
    "select_node",
    "get_selected_node",
    "get_root",
    "navigate_to_parent",
    "navigate_to_child",
    "create_child",
    "create_sibling",
    "set_node_text",
    "delete_node",
    "set_node_color",
    "set_background_color",
    "set_node_style",
    "set_font_bold",
    "set_font_italic",
    "set_font_size",
    "add_icon",
    "remove_icon",
    "remove_all_icons",
    "list_icons",
    "add_connector",
    "remove_connector",
    "set_attribute",
    "get_attributes",
    "remove_attribute",
    "set_note",
    "get_note",
    "get_map_info",
    "center_on_node",
    "fold_node",
    "unfold_node",
    "find_nodes",
];

/// The `POST /execute` body: a command name plus its parameter object.
/// Missing `params` is treated as an empty object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
    #[serde(default)]
    pub params: Value,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>, params: Value) -> Self {
        Self {
            command: command.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchPosition {
    Left,
    Right,
}

impl BranchPosition {
    fn into_side(self) -> Side {
        match self {
            Self::Left => Side::Left,
            Self::Right => Side::Right,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetParams {
    pub node_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildIndexParams {
    pub node_id: Option<String>,
    #[serde(default)]
    pub index: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateChildParams {
    pub node_id: Option<String>,
    pub text: Option<String>,
    pub position: Option<BranchPosition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSiblingParams {
    pub node_id: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub before: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetTextParams {
    pub node_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColorParams {
    pub node_id: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetStyleParams {
    pub node_id: Option<String>,
    pub style: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetBoldParams {
    pub node_id: Option<String>,
    pub bold: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetItalicParams {
    pub node_id: Option<String>,
    pub italic: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetFontSizeParams {
    pub node_id: Option<String>,
    pub size: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IconParams {
    pub node_id: Option<String>,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorParams {
    pub source_id: String,
    pub target_id: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorEndpointsParams {
    pub source_id: String,
    pub target_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetAttributeParams {
    pub node_id: Option<String>,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeNameParams {
    pub node_id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetNoteParams {
    pub node_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindParams {
    pub text: String,
    pub case_sensitive: Option<bool>,
}

/// The tagged union of all known commands with their typed parameters.
#[derive(Debug, Clone)]
pub enum Command {
    SelectNode(TargetParams),
    GetSelectedNode,
    GetRoot,
    NavigateToParent(TargetParams),
    NavigateToChild(ChildIndexParams),
    CreateChild(CreateChildParams),
    CreateSibling(CreateSiblingParams),
    SetNodeText(SetTextParams),
    DeleteNode(TargetParams),
    SetNodeColor(ColorParams),
    SetBackgroundColor(ColorParams),
    SetNodeStyle(SetStyleParams),
    SetFontBold(SetBoldParams),
    SetFontItalic(SetItalicParams),
    SetFontSize(SetFontSizeParams),
    AddIcon(IconParams),
    RemoveIcon(IconParams),
    RemoveAllIcons(TargetParams),
    ListIcons,
    AddConnector(ConnectorParams),
    RemoveConnector(ConnectorEndpointsParams),
    SetAttribute(SetAttributeParams),
    GetAttributes(TargetParams),
    RemoveAttribute(AttributeNameParams),
    SetNote(SetNoteParams),
    GetNote(TargetParams),
    FoldNode(TargetParams),
    UnfoldNode(TargetParams),
    CenterOnNode(TargetParams),
    GetMapInfo,
    FindNodes(FindParams),
}

impl Command {
    /// Resolves a command name and raw params into a typed command.
    ///
    /// Unknown names never touch the params; ill-typed or missing required
    /// params surface as [`CommandError::InvalidParams`] naming the command.
    pub fn parse(name: &str, params: &Value) -> Result<Self, CommandError> {
        let empty;
        let params = if params.is_null() {
            empty = Value::Object(serde_json::Map::new());
            &empty
        } else {
            params
        };

        let command = match name {
            "select_node" => Self::SelectNode(typed(name, params)?),
            "get_selected_node" => Self::GetSelectedNode,
            "get_root" => Self::GetRoot,
            "navigate_to_parent" => Self::NavigateToParent(typed(name, params)?),
            "navigate_to_child" => Self::NavigateToChild(typed(name, params)?),
            "create_child" => Self::CreateChild(typed(name, params)?),
            "create_sibling" => Self::CreateSibling(typed(name, params)?),
            "set_node_text" => Self::SetNodeText(typed(name, params)?),
            "delete_node" => Self::DeleteNode(typed(name, params)?),
            "set_node_color" => Self::SetNodeColor(typed(name, params)?),
            "set_background_color" => Self::SetBackgroundColor(typed(name, params)?),
            "set_node_style" => Self::SetNodeStyle(typed(name, params)?),
            "set_font_bold" => Self::SetFontBold(typed(name, params)?),
            "set_font_italic" => Self::SetFontItalic(typed(name, params)?),
            "set_font_size" => Self::SetFontSize(typed(name, params)?),
            "add_icon" => Self::AddIcon(typed(name, params)?),
            "remove_icon" => Self::RemoveIcon(typed(name, params)?),
            "remove_all_icons" => Self::RemoveAllIcons(typed(name, params)?),
            "list_icons" => Self::ListIcons,
            "add_connector" => Self::AddConnector(typed(name, params)?),
            "remove_connector" => Self::RemoveConnector(typed(name, params)?),
            "set_attribute" => Self::SetAttribute(typed(name, params)?),
            "get_attributes" => Self::GetAttributes(typed(name, params)?),
            "remove_attribute" => Self::RemoveAttribute(typed(name, params)?),
            "set_note" => Self::SetNote(typed(name, params)?),
            "get_note" => Self::GetNote(typed(name, params)?),
            "get_map_info" => Self::GetMapInfo,
            "center_on_node" => Self::CenterOnNode(typed(name, params)?),
            "fold_node" => Self::FoldNode(typed(name, params)?),
            "unfold_node" => Self::UnfoldNode(typed(name, params)?),
            "find_nodes" => Self::FindNodes(typed(name, params)?),
            _ => {
                return Err(CommandError::UnknownCommand {
                    name: name.to_owned(),
                })
            }
        };
        Ok(command)
    }
}

fn typed<T: DeserializeOwned>(command: &str, params: &Value) -> Result<T, CommandError> {
    serde_json::from_value(params.clone()).map_err(|err| CommandError::InvalidParams {
        command: command.to_owned(),
        detail: err.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    UnknownCommand { name: String },
    InvalidParams { command: String, detail: String },
    NodeNotFound { id: String },
    InvalidChildIndex { index: usize, child_count: usize },
    CannotDeleteRoot,
    CannotCreateSiblingOfRoot,
    RootHasNoParent,
    InvalidColor { value: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand { name } => write!(f, "Unknown command: {name}"),
            Self::InvalidParams { command, detail } => {
                write!(f, "Invalid parameters for {command}: {detail}")
            }
            Self::NodeNotFound { id } => write!(f, "Node not found: {id}"),
            Self::InvalidChildIndex { index, .. } => write!(f, "Invalid child index: {index}"),
            Self::CannotDeleteRoot => f.write_str("Cannot delete root node"),
            Self::CannotCreateSiblingOfRoot => f.write_str("Cannot create sibling for root node"),
            Self::RootHasNoParent => f.write_str("Root node has no parent"),
            Self::InvalidColor { value } => write!(f, "Invalid color: {value}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<ColorParseError> for CommandError {
    fn from(err: ColorParseError) -> Self {
        Self::InvalidColor {
            value: err.value().to_owned(),
        }
    }
}

impl CommandError {
    /// The HTTP-200 error body for this failure. Unknown commands carry the
    /// full catalog; bad child indexes carry the actual `child_count`.
    pub fn to_body(&self) -> Value {
        match self {
            Self::UnknownCommand { .. } => json!({
                "error": self.to_string(),
                "available_commands": COMMAND_NAMES,
            }),
            Self::InvalidChildIndex { child_count, .. } => json!({
                "error": self.to_string(),
                "child_count": child_count,
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

/// Parses and executes one request against the document.
pub fn dispatch(doc: &mut Document, request: &CommandRequest) -> Result<CommandReply, CommandError> {
    let command = Command::parse(&request.command, &request.params)?;
    execute(doc, command)
}

/// Executes a typed command. Each arm is deliberately thin: resolve the
/// target, apply one model operation, project the reply.
pub fn execute(doc: &mut Document, command: Command) -> Result<CommandReply, CommandError> {
    match command {
        Command::SelectNode(params) => {
            let id = resolve_target(doc, params.node_id)?;
            doc.select(&id);
            node_ack(doc, &id)
        }
        Command::GetSelectedNode => {
            let id = doc.selected_id().clone();
            Ok(CommandReply::NodeView(NodeView {
                node: require_snapshot(doc, &id)?,
            }))
        }
        Command::GetRoot => {
            let id = doc.root_id().clone();
            Ok(CommandReply::NodeView(NodeView {
                node: require_snapshot(doc, &id)?,
            }))
        }
        Command::NavigateToParent(params) => {
            let id = resolve_target(doc, params.node_id)?;
            let parent = doc
                .node(&id)
                .and_then(|node| node.parent().cloned())
                .ok_or(CommandError::RootHasNoParent)?;
            doc.select(&parent);
            node_ack(doc, &parent)
        }
        Command::NavigateToChild(params) => {
            let id = resolve_target(doc, params.node_id)?;
            let child_count = doc.node(&id).map(|node| node.children().len()).unwrap_or(0);
            let child = doc
                .node(&id)
                .and_then(|node| node.children().get(params.index).cloned())
                .ok_or(CommandError::InvalidChildIndex {
                    index: params.index,
                    child_count,
                })?;
            doc.select(&child);
            node_ack(doc, &child)
        }
        Command::CreateChild(params) => {
            let parent = resolve_target(doc, params.node_id)?;
            let text = params.text.unwrap_or_else(|| DEFAULT_NODE_TEXT.to_owned());
            let side = params.position.map(BranchPosition::into_side);
            let id = doc
                .create_child(&parent, text, side)
                .ok_or_else(|| not_found(&parent))?;
            node_ack(doc, &id)
        }
        Command::CreateSibling(params) => {
            let anchor = resolve_target(doc, params.node_id)?;
            if doc.is_root(&anchor) {
                return Err(CommandError::CannotCreateSiblingOfRoot);
            }
            let text = params.text.unwrap_or_else(|| DEFAULT_NODE_TEXT.to_owned());
            let id = doc
                .create_sibling(&anchor, text, params.before)
                .ok_or(CommandError::CannotCreateSiblingOfRoot)?;
            node_ack(doc, &id)
        }
        Command::SetNodeText(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.set_text(params.text);
            ok_ack()
        }
        Command::DeleteNode(params) => {
            let id = resolve_target(doc, params.node_id)?;
            if doc.is_root(&id) {
                return Err(CommandError::CannotDeleteRoot);
            }
            doc.remove_subtree(&id);
            ok_ack()
        }
        Command::SetNodeColor(params) => {
            let id = resolve_target(doc, params.node_id)?;
            let color = Color::parse(&params.color)?;
            require_node_mut(doc, &id)?.style_mut().set_text_color(color);
            ok_ack()
        }
        Command::SetBackgroundColor(params) => {
            let id = resolve_target(doc, params.node_id)?;
            let color = Color::parse(&params.color)?;
            require_node_mut(doc, &id)?
                .style_mut()
                .set_background_color(color);
            ok_ack()
        }
        Command::SetNodeStyle(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.style_mut().set_name(params.style);
            ok_ack()
        }
        Command::SetFontBold(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.style_mut().set_bold(params.bold);
            ok_ack()
        }
        Command::SetFontItalic(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.style_mut().set_italic(params.italic);
            ok_ack()
        }
        Command::SetFontSize(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.style_mut().set_font_size(params.size);
            ok_ack()
        }
        Command::AddIcon(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.add_icon(params.icon);
            ok_ack()
        }
        Command::RemoveIcon(params) => {
            let id = resolve_target(doc, params.node_id)?;
            // Removing an icon that is not attached is still a success.
            require_node_mut(doc, &id)?.remove_icon(&params.icon);
            ok_ack()
        }
        Command::RemoveAllIcons(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.clear_icons();
            ok_ack()
        }
        Command::ListIcons => Ok(CommandReply::IconCatalog(IconCatalogView {
            icons: ICON_CATALOG.iter().map(|icon| (*icon).to_owned()).collect(),
        })),
        Command::AddConnector(params) => {
            let source = resolve_id(doc, params.source_id)?;
            let target = resolve_id(doc, params.target_id)?;
            require_node_mut(doc, &source)?.add_connector(Connector::new(target, params.label));
            ok_ack()
        }
        Command::RemoveConnector(params) => {
            let source = resolve_id(doc, params.source_id)?;
            let target = resolve_id(doc, params.target_id)?;
            // No matching connector is a no-op, not an error.
            require_node_mut(doc, &source)?.remove_connectors_to(&target);
            ok_ack()
        }
        Command::SetAttribute(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.set_attribute(params.name, params.value);
            ok_ack()
        }
        Command::GetAttributes(params) => {
            let id = resolve_target(doc, params.node_id)?;
            let node = require_node(doc, &id)?;
            Ok(CommandReply::Attributes(AttributesView {
                attributes: attribute_map(node),
            }))
        }
        Command::RemoveAttribute(params) => {
            let id = resolve_target(doc, params.node_id)?;
            // Last-match-wins for duplicate names; absent names are a no-op.
            require_node_mut(doc, &id)?.remove_attribute(&params.name);
            ok_ack()
        }
        Command::SetNote(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.set_note(params.text);
            ok_ack()
        }
        Command::GetNote(params) => {
            let id = resolve_target(doc, params.node_id)?;
            let node = require_node(doc, &id)?;
            Ok(CommandReply::Note(NoteView {
                note: node.note().unwrap_or("").to_owned(),
            }))
        }
        Command::FoldNode(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.set_folded(true);
            ok_ack()
        }
        Command::UnfoldNode(params) => {
            let id = resolve_target(doc, params.node_id)?;
            require_node_mut(doc, &id)?.set_folded(false);
            ok_ack()
        }
        Command::CenterOnNode(params) => {
            let id = resolve_target(doc, params.node_id)?;
            doc.center_on(&id);
            ok_ack()
        }
        Command::GetMapInfo => Ok(CommandReply::MapInfo(MapInfo {
            title: doc.title().to_owned(),
            file: doc.file_path().map(str::to_owned),
            node_count: query::subtree_size(doc, doc.root_id()),
            root_id: doc.root_id().as_str().to_owned(),
        })),
        Command::FindNodes(params) => {
            // Case-sensitive unless the caller explicitly turns it off.
            let case_sensitive = params.case_sensitive.unwrap_or(true);
            let ids = query::find_by_text(doc, &params.text, case_sensitive);
            let results: Vec<NodeSnapshot> =
                ids.iter().filter_map(|id| snapshot(doc, id)).collect();
            let count = results.len();
            Ok(CommandReply::Find(FindResults { results, count }))
        }
    }
}

/// `node_id` params fall back to the current selection; explicit ids must
/// resolve to a live node.
fn resolve_target(doc: &Document, node_id: Option<String>) -> Result<NodeId, CommandError> {
    match node_id {
        None => Ok(doc.selected_id().clone()),
        Some(raw) => resolve_id(doc, raw),
    }
}

fn resolve_id(doc: &Document, raw: String) -> Result<NodeId, CommandError> {
    let id = NodeId::new(raw.clone()).map_err(|_| CommandError::NodeNotFound { id: raw.clone() })?;
    if !doc.contains(&id) {
        return Err(CommandError::NodeNotFound { id: raw });
    }
    Ok(id)
}

fn not_found(id: &NodeId) -> CommandError {
    CommandError::NodeNotFound {
        id: id.as_str().to_owned(),
    }
}

fn require_node<'doc>(doc: &'doc Document, id: &NodeId) -> Result<&'doc Node, CommandError> {
    doc.node(id).ok_or_else(|| not_found(id))
}

fn require_node_mut<'doc>(
    doc: &'doc mut Document,
    id: &NodeId,
) -> Result<&'doc mut Node, CommandError> {
    doc.node_mut(id).ok_or_else(|| not_found(id))
}

fn require_snapshot(doc: &Document, id: &NodeId) -> Result<NodeSnapshot, CommandError> {
    snapshot(doc, id).ok_or_else(|| not_found(id))
}

fn node_ack(doc: &Document, id: &NodeId) -> Result<CommandReply, CommandError> {
    Ok(CommandReply::NodeAck(NodeAck {
        success: true,
        node: require_snapshot(doc, id)?,
    }))
}

fn ok_ack() -> Result<CommandReply, CommandError> {
    Ok(CommandReply::Ack(Ack::ok()))
}

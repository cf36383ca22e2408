// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

use super::*;

use std::net::SocketAddr;

use serde_json::json;
use tokio::task::JoinHandle;

use crate::bridge::{AppState, BridgeError, BridgeServer};
use crate::model::{fixtures, Document};

struct BridgeHarness {
    addr: SocketAddr,
    task: JoinHandle<Result<(), BridgeError>>,
}

impl BridgeHarness {
    /// Serves `doc` on an ephemeral loopback port in the background.
    async fn start(doc: Document) -> Self {
        let state = AppState::new(doc, false);
        let server = BridgeServer::bind("127.0.0.1:0", state).await.expect("bind bridge");
        let addr = server.local_addr();
        let task = tokio::spawn(server.serve());
        Self { addr, task }
    }

    fn adapter(&self) -> MindBridgeMcp {
        let client =
            BridgeClient::new(&self.addr.ip().to_string(), self.addr.port()).expect("client");
        MindBridgeMcp::new(client)
    }

    async fn shutdown(self) {
        let client =
            BridgeClient::new(&self.addr.ip().to_string(), self.addr.port()).expect("client");
        let reply = client.stop().await.expect("stop");
        assert_eq!(reply.status, "stopping");
        self.task.await.expect("join").expect("serve");
    }
}

#[tokio::test]
async fn e2e_adapter_builds_and_inspects_a_map_over_the_wire() {
    let harness = BridgeHarness::start(Document::new("E2E Map", "Center")).await;
    let adapter = harness.adapter();

    // Step 1: the bridge is reachable and reports the map.
    let Json(report) = adapter.check_connection().await.expect("check_connection");
    assert_eq!(report.status.as_deref(), Some("running"));
    assert_eq!(report.map_title.as_deref(), Some("E2E Map"));
    assert!(report.error.is_none());

    // Step 2: grow a small tree under the root.
    let Json(created) = adapter
        .create_child_node(Parameters(CreateChildNodeParams {
            node_id: None,
            text: Some("Tasks".to_owned()),
            position: Some(BranchSide::Right),
        }))
        .await
        .expect("create_child_node");
    assert!(created.success);
    assert_eq!(created.node.text, "Tasks");
    let tasks_id = created.node.id.clone();

    let Json(selected) = adapter
        .select_node(Parameters(NodeIdParams { node_id: tasks_id.clone() }))
        .await
        .expect("select_node");
    assert_eq!(selected.node.id, tasks_id);

    // Step 3: selection-relative commands follow the selection.
    adapter
        .set_node_text(Parameters(NodeTextParams {
            node_id: None,
            text: "Tasks (triaged)".to_owned(),
        }))
        .await
        .expect("set_node_text");
    adapter
        .set_node_attribute(Parameters(SetAttributeParams {
            node_id: None,
            name: "owner".to_owned(),
            value: "ops".to_owned(),
        }))
        .await
        .expect("set_node_attribute");

    let Json(attributes) = adapter
        .get_node_attributes(Parameters(NodeTargetParams { node_id: None }))
        .await
        .expect("get_node_attributes");
    assert_eq!(attributes.attributes.get("owner"), Some(&"ops".to_owned()));

    let Json(view) = adapter.get_selected_node().await.expect("get_selected_node");
    assert_eq!(view.node.text, "Tasks (triaged)");
    assert_eq!(view.node.attributes.get("owner"), Some(&"ops".to_owned()));

    // Step 4: search sees the rename.
    let Json(found) = adapter
        .find_nodes(Parameters(FindNodesParams {
            text: "triaged".to_owned(),
            case_sensitive: None,
        }))
        .await
        .expect("find_nodes");
    assert_eq!(found.count, 1);
    assert_eq!(found.results[0].id, tasks_id);

    // Step 5: deleting moves the selection back to the root.
    adapter
        .delete_node(Parameters(NodeTargetParams { node_id: Some(tasks_id) }))
        .await
        .expect("delete_node");
    let Json(view) = adapter.get_selected_node().await.expect("get_selected_node");
    assert!(view.node.is_root);

    harness.shutdown().await;
}

#[tokio::test]
async fn e2e_demo_map_supports_navigation_and_styling() {
    let harness = BridgeHarness::start(fixtures::demo_document()).await;
    let adapter = harness.adapter();

    let Json(info) = adapter.get_map_info().await.expect("get_map_info");
    assert_eq!(info.title, "Product Launch");
    assert!(info.node_count > 1);

    let Json(root) = adapter.get_root_node().await.expect("get_root_node");
    assert!(root.node.is_root);
    assert!(root.node.child_count > 0);

    let Json(first_child) = adapter
        .navigate_to_child(Parameters(NavigateToChildParams { node_id: None, index: None }))
        .await
        .expect("navigate_to_child");
    assert!(!first_child.node.is_root);

    let Json(back) = adapter
        .navigate_to_parent(Parameters(NodeTargetParams { node_id: None }))
        .await
        .expect("navigate_to_parent");
    assert_eq!(back.node.id, root.node.id);

    adapter
        .set_node_color(Parameters(NodeColorParams {
            node_id: None,
            color: "red".to_owned(),
        }))
        .await
        .expect("set_node_color");
    let Json(view) = adapter.get_selected_node().await.expect("get_selected_node");
    assert_eq!(view.node.text_color.as_deref(), Some("#ff0000"));

    harness.shutdown().await;
}

#[tokio::test]
async fn e2e_font_formatting_fans_out_per_field() {
    let harness = BridgeHarness::start(Document::new("Fonts", "Root")).await;
    let adapter = harness.adapter();

    let Json(outcome) = adapter
        .set_font_formatting(Parameters(FontFormattingParams {
            node_id: None,
            bold: Some(true),
            italic: None,
            size: Some(18),
        }))
        .await
        .expect("set_font_formatting");
    assert!(outcome.success);
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0], json!({ "success": true }));

    let Json(outcome) = adapter
        .set_font_formatting(Parameters(FontFormattingParams {
            node_id: None,
            bold: None,
            italic: None,
            size: None,
        }))
        .await
        .expect("set_font_formatting with nothing to do");
    assert!(outcome.success);
    assert!(outcome.results.is_empty());

    harness.shutdown().await;
}

#[tokio::test]
async fn e2e_domain_errors_become_typed_tool_errors() {
    let harness = BridgeHarness::start(Document::new("Errors", "Root")).await;
    let adapter = harness.adapter();

    let err = adapter
        .select_node(Parameters(NodeIdParams { node_id: "ID_404".to_owned() }))
        .await
        .err()
        .expect("missing node");
    assert_eq!(err.code, ErrorData::resource_not_found("x", None).code);
    assert_eq!(err.message, "Node not found: ID_404");

    let err = adapter
        .set_node_color(Parameters(NodeColorParams {
            node_id: None,
            color: "#nope".to_owned(),
        }))
        .await
        .err()
        .expect("bad color");
    assert_eq!(err.code, ErrorData::invalid_params("x", None).code);
    assert_eq!(err.message, "Invalid color: #nope");

    harness.shutdown().await;
}

#[tokio::test]
async fn e2e_check_connection_reports_a_hint_when_the_bridge_is_down() {
    // Grab a port that nothing listens on by binding and dropping it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("probe bind");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);

    let client = BridgeClient::new(&addr.ip().to_string(), addr.port()).expect("client");
    let adapter = MindBridgeMcp::new(client);

    let Json(report) = adapter.check_connection().await.expect("check_connection");
    assert_eq!(report.error.as_deref(), Some("Cannot connect to bridge"));
    assert!(report.details.is_some());
    assert!(report.hint.as_deref().expect("hint").contains("mindbridge"));
    assert!(report.status.is_none());
}

#[tokio::test]
async fn e2e_stop_ends_the_serve_task() {
    let harness = BridgeHarness::start(Document::new("Stop", "Root")).await;
    let addr = harness.addr;

    harness.shutdown().await;

    // The port no longer answers once serve has returned.
    let client = BridgeClient::new(&addr.ip().to_string(), addr.port()).expect("client");
    assert!(client.status().await.is_err());
}

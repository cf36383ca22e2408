// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

//! Model Context Protocol (MCP) client adapter.
//!
//! Exposes the bridge's command channel as MCP tools over stdio; each tool
//! call becomes exactly one HTTP request against the bridge server.

mod client;
mod server;
mod types;

pub use client::{BridgeClient, ClientError};
pub use server::MindBridgeMcp;

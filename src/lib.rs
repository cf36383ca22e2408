// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

//! Mindbridge — loopback HTTP bridge and MCP adapter for a live mind map.
//!
//! The bridge server owns one in-memory [`model::Document`] and exposes it
//! over a JSON command channel; the MCP adapter translates tool calls into
//! single HTTP requests against that channel.

pub mod bridge;
pub mod command;
pub mod mcp;
pub mod model;
pub mod query;

// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

//! Read-only queries over the document tree.
//!
//! Traversal order is the contract here: results are always pre-order
//! relative to the tree, never insertion or relevance order.

pub mod find;

pub use find::{find_by_text, preorder, preorder_from, subtree_size};

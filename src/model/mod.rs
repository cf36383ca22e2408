// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

//! Core data model.
//!
//! One [`Document`] per process: a tree of nodes addressed by stable string
//! ids, plus the current selection the command surface falls back to.

pub mod document;
pub mod fixtures;
pub mod icons;
pub mod ids;
pub mod node;
pub mod style;

pub use document::Document;
pub use icons::ICON_CATALOG;
pub use ids::{NodeId, NodeIdError};
pub use node::{Connector, Node, Side};
pub use style::{Color, ColorParseError, NodeStyle};

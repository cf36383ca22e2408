// SPDX-FileCopyrightText: 2026 Mindbridge contributors
// SPDX-License-Identifier: MIT

use super::document::Document;
use super::node::{Connector, Side};
use super::style::Color;

/// A small but fully furnished map used by `--demo` mode and tests: branch
/// sides, colors, icons, attributes, a note, a folded branch and a connector.
pub fn demo_document() -> Document {
    let mut doc = Document::new("Product Launch", "Product Launch");
    let root = doc.root_id().clone();

    let goals = doc.create_child(&root, "Goals", Some(Side::Right)).expect("goals");
    let timeline = doc.create_child(&root, "Timeline", Some(Side::Right)).expect("timeline");
    let risks = doc.create_child(&root, "Risks", Some(Side::Left)).expect("risks");
    doc.create_child(&root, "Team", Some(Side::Left)).expect("team");

    let signups = doc.create_child(&goals, "Grow signups", None).expect("signups");
    let ship = doc.create_child(&goals, "Ship v2", None).expect("ship");

    doc.create_child(&timeline, "Q1 research", None).expect("q1");
    let build = doc.create_child(&timeline, "Q2 build", None).expect("q2");
    let launch = doc.create_child(&timeline, "Q3 launch", None).expect("q3");

    doc.create_child(&risks, "Scope creep", None).expect("scope");
    let vendor = doc.create_child(&risks, "Vendor delay", None).expect("vendor");

    {
        let node = doc.node_mut(&signups).expect("signups");
        node.add_icon("full-1");
        node.set_attribute("priority", "high");
        node.style_mut().set_text_color(Color::from_rgb(0x00, 0xff, 0x00));
    }
    {
        let node = doc.node_mut(&ship).expect("ship");
        node.add_icon("idea");
        node.set_attribute("priority", "medium");
    }
    doc.node_mut(&launch)
        .expect("launch")
        .set_note("Coordinate with marketing before the announcement.");
    {
        let node = doc.node_mut(&risks).expect("risks");
        node.set_folded(true);
        node.add_icon("messagebox_warning");
    }
    {
        let node = doc.node_mut(&vendor).expect("vendor");
        node.style_mut().set_name("Important");
        node.style_mut().set_background_color(Color::from_rgb(0xff, 0xff, 0x00));
        node.add_connector(Connector::new(build, Some("blocks".to_owned())));
    }

    doc
}

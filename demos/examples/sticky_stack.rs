// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scrolling list with stacked sticky headers and footers.
//!
//! This example shows how to combine:
//! - `understory_sticky_tree` as an in-memory document with scroll offsets,
//! - `understory_sticky` to stack headers, footers, and section titles,
//! - `tracing` and `tracing-subscriber` to report what the coordinator did.
//!
//! Run:
//! - `cargo run -p understory_sticky_demos --example sticky_stack`
//! - `RUST_LOG=understory_sticky=trace cargo run -p understory_sticky_demos --example sticky_stack`

use kurbo::{Rect, Vec2};
use tracing::{info, info_span};
use tracing_subscriber::EnvFilter;
use understory_sticky::config::Z_INDEX_ATTRIBUTE;
use understory_sticky::{Edge, Position, StyleSnapshot};
use understory_sticky_tree::{ElementData, ElementId, StickyHost, Tree};

const WIDTH: f64 = 360.0;
const SECTION_HEIGHT: f64 = 400.0;
const TITLE_HEIGHT: f64 = 28.0;

fn sticky(rect: Rect, class: &str) -> ElementData {
    ElementData::new(rect)
        .with_class(class)
        .with_style(StyleSnapshot {
            position: Position::Sticky,
            ..StyleSnapshot::default()
        })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut tree = Tree::with_root(
        ElementData::new(Rect::new(0.0, 0.0, WIDTH, 640.0))
            .with_attribute(Z_INDEX_ATTRIBUTE, "100"),
    );
    let list = tree.insert(
        Some(tree.root()),
        ElementData::new(Rect::new(0.0, 0.0, WIDTH, 640.0))
            .with_class("sticky-container")
            .with_style(StyleSnapshot::scroll_container()),
    );
    let app_bar = tree.insert(
        Some(list),
        sticky(Rect::new(0.0, 0.0, WIDTH, 56.0), "sticky-top"),
    );
    let tabs = tree.insert(
        Some(list),
        sticky(Rect::new(0.0, 56.0, WIDTH, 104.0), "sticky-top"),
    );

    let mut titles: Vec<ElementId> = Vec::new();
    let mut y = 104.0;
    for _ in 0..4 {
        let section = tree.insert(
            Some(list),
            ElementData::new(Rect::new(0.0, y, WIDTH, y + SECTION_HEIGHT)),
        );
        titles.push(tree.insert(
            Some(section),
            sticky(Rect::new(0.0, 0.0, WIDTH, TITLE_HEIGHT), "sticky-top"),
        ));
        y += SECTION_HEIGHT;
    }

    let composer = tree.insert(
        Some(list),
        sticky(Rect::new(0.0, y, WIDTH, y + 64.0), "sticky-bottom"),
    );
    let nav = tree.insert(
        Some(list),
        sticky(Rect::new(0.0, y + 64.0, WIDTH, y + 120.0), "sticky-bottom"),
    );

    let mut host = StickyHost::new(tree);
    host.refresh();

    let tiers = host.coordinator.tiers();
    info!(
        lower = tiers.lower,
        mid = tiers.mid,
        upper = tiers.upper,
        "stacking tiers"
    );
    let bars = [
        ("app bar", app_bar),
        ("tabs", tabs),
        ("composer", composer),
        ("nav", nav),
    ];
    for (name, el) in bars {
        let offsets = host.coordinator.offsets_of(el).unwrap_or_default();
        info!(
            bar = name,
            top = offsets.get(Edge::Top),
            bottom = offsets.get(Edge::Bottom),
            z = ?host.coordinator.z_index_of(el),
            "bar offsets"
        );
    }

    for scroll in [0.0, 200.0, 450.0, 900.0, 1300.0] {
        let rounds = host.scroll_to(list, Vec2::new(0.0, scroll));
        let _span = info_span!("scrolled", scroll, rounds).entered();
        for (section, title) in titles.iter().enumerate() {
            let world = host.tree.world_bounds(*title).unwrap_or_default();
            info!(
                section,
                y = world.y0,
                z = ?host.coordinator.z_index_of(*title),
                pin = ?host.coordinator.pin_state_of(*title),
                "section title"
            );
        }
    }
}

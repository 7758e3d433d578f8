// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_sticky_tree --heading-base-level=0

//! Understory Sticky Tree: an in-memory host for [`understory_sticky`].
//!
//! - [`Tree`]: a retained element tree with generational [`ElementId`]s,
//!   class lists, attributes, style snapshots, border boxes, scroll offsets,
//!   and an inline-style surface. [`Tree::commit`] recomputes world boxes,
//!   applying scroll offsets and sticky shifts for elements that carry an
//!   inline inset.
//! - [`ObserverSet`]: intersection and resize observers that report by
//!   comparing committed geometry on [`ObserverSet::poll`].
//! - [`StickyHost`]: both of the above plus a coordinator, with a
//!   [`StickyHost::settle`] loop that feeds reports back until nothing changes.
//!
//! ## Not a layout engine
//!
//! Boxes are authored, not computed. Only scrolling and sticky shifts move
//! them. This is enough to drive the coordinator headlessly and to test it
//! end to end.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_sticky::{Position, StyleSnapshot};
//! use understory_sticky_tree::{ElementData, StickyHost, Tree};
//!
//! let sticky = StyleSnapshot { position: Position::Sticky, ..StyleSnapshot::default() };
//!
//! let mut tree = Tree::new();
//! tree.set_local_bounds(tree.root(), Rect::new(0.0, 0.0, 320.0, 480.0));
//! let list = tree.insert(
//!     Some(tree.root()),
//!     ElementData::new(Rect::new(0.0, 0.0, 320.0, 480.0))
//!         .with_class("sticky-container")
//!         .with_style(StyleSnapshot::scroll_container()),
//! );
//! let title = tree.insert(
//!     Some(list),
//!     ElementData::new(Rect::new(0.0, 0.0, 320.0, 40.0))
//!         .with_class("sticky-top")
//!         .with_style(sticky),
//! );
//! let tabs = tree.insert(
//!     Some(list),
//!     ElementData::new(Rect::new(0.0, 40.0, 320.0, 70.0))
//!         .with_class("sticky-top")
//!         .with_style(sticky),
//! );
//!
//! let mut host = StickyHost::new(tree);
//! host.refresh();
//! assert_eq!(host.tree.inline_style(title).and_then(|s| s.top), Some(0.0));
//! assert_eq!(host.tree.inline_style(tabs).and_then(|s| s.top), Some(40.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod host;
mod observers;
mod tree;
mod types;

pub use host::{MAX_SETTLE_ROUNDS, StickyHost, TreeCoordinator};
pub use observers::{Notifications, ObserverHandle, ObserverSet, intersection_ratio};
pub use tree::{Descendants, Tree};
pub use types::{ElementData, ElementId, InlineStyle};

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_sticky --heading-base-level=0

//! Understory Sticky: stacking coordination for sticky elements.
//!
//! Native sticky positioning pins each element on its own. When several sticky
//! elements share a scroll container they overlap at the pinned edge, and their
//! paint order is whatever the document says. This crate computes, for every
//! sticky element:
//!
//! - its **containing block**: the nearest ancestor that establishes a new
//!   positioning context ([`containing_block`]),
//! - its **insets**: the sum of the extents of the same-edge siblings that pin
//!   before it, so stacked elements sit one below another ([`registry`]),
//! - its **z-index**: one of three tiers, re-decided whenever its pin state
//!   changes so pinned content covers content that scrolls beneath it
//!   ([`z_index`]).
//!
//! [`StickyCoordinator`] ties these together and owns the observer lifecycle.
//!
//! ## Host integration
//!
//! The crate does not know about any particular DOM or renderer. Hosts
//! implement two traits:
//!
//! - [`Document`]: tree structure, class lookup, computed-style snapshots
//!   ([`StyleSnapshot`]), border boxes, and an output channel that receives
//!   [`LayoutInstruction`]s.
//! - [`Observers`]: boundary-intersection and resize subscriptions.
//!
//! Observer callbacks are forwarded back as [`Message`]s (or through the
//! [`StickyCoordinator::on_resize`] and [`StickyCoordinator::on_intersection`]
//! helpers). Processing is serialized: messages posted while a flush runs are
//! drained by that flush.
//!
//! The `understory_sticky_tree` crate provides an in-memory host suitable for
//! tests and headless use.
//!
//! ## Stacking rules
//!
//! - `top` and `left` insets accumulate in document order; `bottom` and
//!   `right` in reverse document order. Vertical edges use border-box height,
//!   horizontal edges border-box width.
//! - Elements are selected by class: `<prefix>-top`, `<prefix>-right`,
//!   `<prefix>-bottom`, `<prefix>-left` (prefix `sticky` by default).
//! - Tiers derive from one base value `b`: lower `b`, mid `b + 1`, upper
//!   `b + 2` ([`ZTiers`]).
//!
//! ```rust
//! use understory_sticky::{StickyConfig, ZTier};
//! use understory_sticky::containing_block::creates_containing_block;
//! use understory_sticky::{Edges, StyleSnapshot};
//!
//! let config = StickyConfig::from_root_attribute(Some("2000"));
//! assert_eq!(config.tiers().value(ZTier::Mid), 2001);
//!
//! // Malformed configuration silently falls back.
//! assert_eq!(StickyConfig::from_root_attribute(Some("abc")).base_z_index, 1000);
//!
//! assert_eq!(config.edges_for(["sticky-top", "card"]), Edges::TOP);
//! assert!(creates_containing_block(&StyleSnapshot::scroll_container(), Edges::TOP));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod containing_block;
mod coordinator;
pub mod geometry;
mod host;
pub mod registry;
mod style;
mod types;
pub mod z_index;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, StickyConfig};
pub use coordinator::{BOUNDARY_MARGIN, FULL_THRESHOLD, Message, StickyCoordinator};
pub use host::{Document, IntersectionEntry, IntersectionOptions, Observers};
pub use style::{Overflow, Position, StyleSnapshot, WillChange};
pub use types::{Edge, EdgeOffsets, Edges, LayoutInstruction, PinState, ZTier, ZTiers};

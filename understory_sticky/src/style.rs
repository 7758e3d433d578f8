// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Computed-style snapshots consumed by containing-block resolution.
//!
//! Hosts translate whatever style system they have into a [`StyleSnapshot`].
//! Only the properties that decide whether an ancestor establishes a new
//! positioning context are represented.

use crate::types::{Edge, Edges};

/// Computed `position`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    /// `static`
    #[default]
    Static,
    /// `relative`
    Relative,
    /// `absolute`
    Absolute,
    /// `fixed`
    Fixed,
    /// `sticky`
    Sticky,
}

/// Computed overflow for one axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Overflow {
    /// `visible`
    #[default]
    Visible,
    /// `hidden`
    Hidden,
    /// `clip`
    Clip,
    /// `scroll`
    Scroll,
    /// `auto`
    Auto,
}

bitflags::bitflags! {
    /// The `will-change` hints that matter for containing blocks.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WillChange: u8 {
        /// `will-change: transform`
        const TRANSFORM   = 0b0000_0001;
        /// `will-change: perspective`
        const PERSPECTIVE = 0b0000_0010;
    }
}

/// The subset of an element's computed style the resolver inspects.
///
/// `Default` is the initial value of every property: static, visible, no
/// containment, no effects, `z-index: auto`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyleSnapshot {
    /// Computed `position`.
    pub position: Position,
    /// Computed `overflow-x`.
    pub overflow_x: Overflow,
    /// Computed `overflow-y`.
    pub overflow_y: Overflow,
    /// `contain` is anything other than `none`.
    pub contain: bool,
    /// `filter` is anything other than `none`.
    pub filter: bool,
    /// `transform` is anything other than `none`.
    pub transform: bool,
    /// `perspective` is anything other than `none`.
    pub perspective: bool,
    /// Relevant `will-change` hints.
    pub will_change: WillChange,
    /// Computed `z-index`; `None` is `auto`.
    pub z_index: Option<i32>,
}

impl StyleSnapshot {
    /// A scroll container: `position: relative; overflow: auto`.
    pub fn scroll_container() -> Self {
        Self {
            position: Position::Relative,
            overflow_x: Overflow::Auto,
            overflow_y: Overflow::Auto,
            ..Self::default()
        }
    }

    /// Set both overflow axes.
    #[must_use]
    pub const fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow_x = overflow;
        self.overflow_y = overflow;
        self
    }

    /// Computed overflow along the axis that `edge` scrolls on.
    pub const fn overflow_for(&self, edge: Edge) -> Overflow {
        if edge.is_vertical() {
            self.overflow_y
        } else {
            self.overflow_x
        }
    }

    /// Whether any axis relevant to `edges` clips or scrolls.
    ///
    /// An empty edge set consults both axes.
    pub fn clips_for(&self, edges: Edges) -> bool {
        if edges.is_empty() {
            return self.overflow_x != Overflow::Visible || self.overflow_y != Overflow::Visible;
        }
        edges
            .edges()
            .any(|edge| self.overflow_for(edge) != Overflow::Visible)
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public value types: edges, per-edge offsets, z-index tiers, and layout instructions.

/// One edge of a scroll container that a sticky element can pin to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The top edge.
    Top,
    /// The right edge.
    Right,
    /// The bottom edge.
    Bottom,
    /// The left edge.
    Left,
}

impl Edge {
    /// All edges in `top, right, bottom, left` order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The class-name suffix used to declare this edge (`top`, `right`, ...).
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// Whether this edge stacks in document order (`top`, `left`) rather than
    /// in reverse document order (`bottom`, `right`).
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }

    /// Whether this edge lies on the vertical axis (`top`, `bottom`).
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// The single-edge flag for this edge.
    pub const fn flag(self) -> Edges {
        match self {
            Self::Top => Edges::TOP,
            Self::Right => Edges::RIGHT,
            Self::Bottom => Edges::BOTTOM,
            Self::Left => Edges::LEFT,
        }
    }
}

bitflags::bitflags! {
    /// Set of edges an element sticks to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// Sticks to the top edge.
        const TOP    = 0b0000_0001;
        /// Sticks to the right edge.
        const RIGHT  = 0b0000_0010;
        /// Sticks to the bottom edge.
        const BOTTOM = 0b0000_0100;
        /// Sticks to the left edge.
        const LEFT   = 0b0000_1000;
        /// Both vertical edges.
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
        /// Both horizontal edges.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl Edges {
    /// Whether `edge` is in this set.
    pub const fn sticks_to(self, edge: Edge) -> bool {
        self.contains(edge.flag())
    }

    /// Iterate the edges in this set in `top, right, bottom, left` order.
    pub fn edges(self) -> impl Iterator<Item = Edge> {
        Edge::ALL.into_iter().filter(move |e| self.sticks_to(*e))
    }
}

/// Per-edge pixel insets.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EdgeOffsets {
    /// Inset from the top edge.
    pub top: f64,
    /// Inset from the right edge.
    pub right: f64,
    /// Inset from the bottom edge.
    pub bottom: f64,
    /// Inset from the left edge.
    pub left: f64,
}

impl EdgeOffsets {
    /// All four insets zero.
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Read the inset for `edge`.
    pub const fn get(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    /// Mutable access to the inset for `edge`.
    pub fn get_mut(&mut self, edge: Edge) -> &mut f64 {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Right => &mut self.right,
            Edge::Bottom => &mut self.bottom,
            Edge::Left => &mut self.left,
        }
    }
}

/// One of the three ordered z-index bands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZTier {
    /// Beneath bottom-pinned content; used by top-sticky elements that overlap
    /// the bottom zone.
    Lower,
    /// Elements without directional ambiguity (for example bottom-only sticky).
    Mid,
    /// Top-sticky elements scrolling in normal flow.
    Upper,
}

/// Concrete z-index values for each [`ZTier`], derived from one base value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ZTiers {
    /// Value of [`ZTier::Lower`].
    pub lower: i32,
    /// Value of [`ZTier::Mid`].
    pub mid: i32,
    /// Value of [`ZTier::Upper`].
    pub upper: i32,
}

impl ZTiers {
    /// Derive `{ base, base + 1, base + 2 }`, saturating at `i32::MAX`.
    pub const fn from_base(base: i32) -> Self {
        Self {
            lower: base,
            mid: base.saturating_add(1),
            upper: base.saturating_add(2),
        }
    }

    /// The z-index value for `tier`.
    pub const fn value(&self, tier: ZTier) -> i32 {
        match tier {
            ZTier::Lower => self.lower,
            ZTier::Mid => self.mid,
            ZTier::Upper => self.upper,
        }
    }
}

/// Whether an element is currently rendered at one of its sticky insets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PinState {
    /// In natural flow position.
    #[default]
    Unpinned,
    /// Held at a sticky inset by scrolling.
    Pinned,
}

/// Style output for one element, applied by the host.
///
/// `None` entries mean "leave untouched".
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutInstruction<E> {
    /// Target element.
    pub element: E,
    /// Inset for the top edge, in pixels.
    pub top: Option<f64>,
    /// Inset for the right edge, in pixels.
    pub right: Option<f64>,
    /// Inset for the bottom edge, in pixels.
    pub bottom: Option<f64>,
    /// Inset for the left edge, in pixels.
    pub left: Option<f64>,
    /// Stacking value.
    pub z_index: Option<i32>,
}

impl<E> LayoutInstruction<E> {
    /// An instruction that touches nothing.
    pub const fn new(element: E) -> Self {
        Self {
            element,
            top: None,
            right: None,
            bottom: None,
            left: None,
            z_index: None,
        }
    }

    /// Set the insets for every edge in `edges` from `offsets`; other edges stay untouched.
    #[must_use]
    pub fn with_insets(mut self, edges: Edges, offsets: &EdgeOffsets) -> Self {
        for edge in edges.edges() {
            let v = Some(offsets.get(edge));
            match edge {
                Edge::Top => self.top = v,
                Edge::Right => self.right = v,
                Edge::Bottom => self.bottom = v,
                Edge::Left => self.left = v,
            }
        }
        self
    }

    /// Set the z-index.
    #[must_use]
    pub const fn with_z_index(mut self, z: i32) -> Self {
        self.z_index = Some(z);
        self
    }

    /// Returns `true` if applying this instruction would change nothing.
    pub const fn is_empty(&self) -> bool {
        self.top.is_none()
            && self.right.is_none()
            && self.bottom.is_none()
            && self.left.is_none()
            && self.z_index.is_none()
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: identifiers, per-element data, and inline style.

use alloc::string::String;

use kurbo::{Insets, Rect};
use smallvec::SmallVec;
use understory_sticky::{LayoutInstruction, StyleSnapshot};

/// Identifier for an element in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Author-supplied data for one element.
///
/// `local_bounds` is the border box in the parent's coordinate space, before
/// the parent's scroll offset and any sticky shift are applied.
#[derive(Clone, Debug, Default)]
pub struct ElementData {
    /// Class list, in insertion order.
    pub classes: SmallVec<[String; 4]>,
    /// `name = value` attributes.
    pub attributes: SmallVec<[(String, String); 2]>,
    /// Computed style, minus anything written inline.
    pub style: StyleSnapshot,
    /// Border box relative to the parent.
    pub local_bounds: Rect,
    /// Border widths.
    pub border: Insets,
    /// Padding widths.
    pub padding: Insets,
}

impl ElementData {
    /// Data with the given border box and everything else defaulted.
    pub fn new(local_bounds: Rect) -> Self {
        Self {
            local_bounds,
            ..Self::default()
        }
    }

    /// Add a class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Replace the style.
    #[must_use]
    pub fn with_style(mut self, style: StyleSnapshot) -> Self {
        self.style = style;
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set border widths.
    #[must_use]
    pub fn with_border(mut self, border: Insets) -> Self {
        self.border = border;
        self
    }

    /// Set padding widths.
    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }
}

/// Values written to an element through [`understory_sticky::Document::apply`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InlineStyle {
    /// `top` inset.
    pub top: Option<f64>,
    /// `right` inset.
    pub right: Option<f64>,
    /// `bottom` inset.
    pub bottom: Option<f64>,
    /// `left` inset.
    pub left: Option<f64>,
    /// `z-index`.
    pub z_index: Option<i32>,
}

impl InlineStyle {
    /// Overlay the set fields of `instruction`. Returns `true` if anything changed.
    pub fn merge<E>(&mut self, instruction: &LayoutInstruction<E>) -> bool {
        let before = *self;
        self.top = instruction.top.or(self.top);
        self.right = instruction.right.or(self.right);
        self.bottom = instruction.bottom.or(self.bottom);
        self.left = instruction.left.or(self.left);
        self.z_index = instruction.z_index.or(self.z_index);
        before != *self
    }
}

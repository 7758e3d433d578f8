// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities the host provides to the coordinator.
//!
//! The coordinator never talks to a rendering engine directly. A host exposes
//! its element tree through [`Document`] and its observer machinery through
//! [`Observers`], then forwards observer callbacks back as
//! [`Message`](crate::Message)s.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Insets, Rect};

use crate::style::StyleSnapshot;
use crate::types::LayoutInstruction;

/// Read access to an element tree plus the style output channel.
pub trait Document {
    /// Element handle. Cheap to copy and compare; the coordinator never owns
    /// the element it refers to.
    type Element: Copy + Eq + Hash + Debug;

    /// The document root, used as the fallback containing block.
    fn root(&self) -> Self::Element;

    /// Parent of `element`, or `None` for the root and for detached elements.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// All attached elements in document (pre-order) order.
    fn elements(&self) -> impl Iterator<Item = Self::Element> + '_;

    /// Whether `element` carries `class` in its class list.
    fn has_class(&self, element: Self::Element, class: &str) -> bool;

    /// Computed style of `element`.
    fn computed_style(&self, element: Self::Element) -> StyleSnapshot;

    /// Border box in the host's absolute space, or `None` if the element is
    /// detached or has no layout.
    fn border_box(&self, element: Self::Element) -> Option<Rect>;

    /// Computed border widths.
    fn border_widths(&self, _element: Self::Element) -> Insets {
        Insets::ZERO
    }

    /// Computed padding widths.
    fn padding_widths(&self, _element: Self::Element) -> Insets {
        Insets::ZERO
    }

    /// Write an instruction to the element's inline style.
    fn apply(&mut self, instruction: &LayoutInstruction<Self::Element>);
}

/// Options for a boundary-intersection observer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntersectionOptions<E> {
    /// Element whose box is the observation region.
    pub root: E,
    /// Visibility ratio at which the observer reports.
    pub threshold: f64,
    /// Amount by which the root's region shrinks on each side before testing.
    pub root_inset: Insets,
}

/// A visibility report for one observed element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntersectionEntry<E> {
    /// Observed element.
    pub target: E,
    /// Fraction of the target's border box inside the (shrunk) root region, in `0.0..=1.0`.
    pub ratio: f64,
}

/// Observer machinery owned by the host.
///
/// Handles returned by [`Observers::observe_intersection`] are owned by the
/// coordinator and handed back exactly once to
/// [`Observers::disconnect_intersection`].
pub trait Observers<E> {
    /// Subscription handle for one intersection observer.
    type Handle: Debug;

    /// Start observing `target` against `options.root`.
    fn observe_intersection(&mut self, target: E, options: IntersectionOptions<E>)
    -> Self::Handle;

    /// Tear down one intersection observer.
    fn disconnect_intersection(&mut self, handle: Self::Handle);

    /// Start reporting border-box size changes of `target`.
    fn observe_resize(&mut self, target: E);

    /// Stop every resize subscription.
    fn disconnect_resize(&mut self);
}

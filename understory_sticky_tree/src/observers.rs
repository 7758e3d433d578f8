// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated intersection and resize observers driven by [`Tree`] commits.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use understory_sticky::{Document, IntersectionEntry, IntersectionOptions, Observers};

use crate::tree::Tree;
use crate::types::ElementId;

/// Handle for one intersection subscription.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u32);

#[derive(Clone, Debug)]
struct IntersectionSubscription {
    handle: ObserverHandle,
    target: ElementId,
    options: IntersectionOptions<ElementId>,
    /// Whether the last report was at or above the threshold.
    last: Option<bool>,
}

#[derive(Clone, Debug)]
struct ResizeSubscription {
    target: ElementId,
    last: Option<Size>,
}

/// Everything that changed since the previous [`ObserverSet::poll`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notifications {
    /// Targets whose border-box size changed.
    pub resized: Vec<ElementId>,
    /// Targets that crossed their threshold.
    pub intersections: Vec<IntersectionEntry<ElementId>>,
}

impl Notifications {
    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.resized.is_empty() && self.intersections.is_empty()
    }
}

/// Observer registry that reports by comparing committed tree geometry.
///
/// Like their browser counterparts, new subscriptions report once on the
/// first poll after they are created. After that an intersection observer
/// reports when its target crosses the threshold in either direction and a
/// resize observer reports when the border-box size changes.
#[derive(Clone, Debug, Default)]
pub struct ObserverSet {
    next: u32,
    intersections: Vec<IntersectionSubscription>,
    resizes: Vec<ResizeSubscription>,
}

impl ObserverSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live intersection subscriptions.
    pub fn intersection_count(&self) -> usize {
        self.intersections.len()
    }

    /// Number of live resize subscriptions.
    pub fn resize_count(&self) -> usize {
        self.resizes.len()
    }

    /// Options of every live intersection subscription on `target`.
    pub fn options_for(
        &self,
        target: ElementId,
    ) -> impl Iterator<Item = &IntersectionOptions<ElementId>> + '_ {
        self.intersections
            .iter()
            .filter(move |s| s.target == target)
            .map(|s| &s.options)
    }

    /// Compare `tree`'s committed geometry with the previous poll.
    ///
    /// Targets without a box (detached or removed) stay silent.
    pub fn poll(&mut self, tree: &Tree) -> Notifications {
        let mut out = Notifications::default();

        for sub in &mut self.resizes {
            let Some(size) = tree.border_box(sub.target).map(|r| r.size()) else {
                continue;
            };
            if sub.last != Some(size) {
                sub.last = Some(size);
                out.resized.push(sub.target);
            }
        }

        for sub in &mut self.intersections {
            let Some(ratio) = intersection_ratio(tree, sub.target, &sub.options) else {
                continue;
            };
            let above = ratio >= sub.options.threshold;
            if sub.last != Some(above) {
                sub.last = Some(above);
                out.intersections.push(IntersectionEntry {
                    target: sub.target,
                    ratio,
                });
            }
        }

        out
    }
}

/// Fraction of `target`'s border box inside the root's padding box shrunk by
/// `options.root_inset`.
pub fn intersection_ratio(
    tree: &Tree,
    target: ElementId,
    options: &IntersectionOptions<ElementId>,
) -> Option<f64> {
    let target_box = tree.border_box(target)?;
    let root_box = tree.border_box(options.root)?;
    let border = tree.border_widths(options.root);
    let inset = options.root_inset;
    let region = Rect::new(
        root_box.x0 + border.x0 + inset.x0,
        root_box.y0 + border.y0 + inset.y0,
        root_box.x1 - border.x1 - inset.x1,
        root_box.y1 - border.y1 - inset.y1,
    );
    if region.width() <= 0.0 || region.height() <= 0.0 {
        return Some(0.0);
    }
    let area = target_box.area();
    if area <= 0.0 {
        // `Rect::contains` excludes the far edges; an empty box on them still counts.
        let inside = region.union_pt(Point::new(target_box.x0, target_box.y0)) == region
            && region.union_pt(Point::new(target_box.x1, target_box.y1)) == region;
        return Some(if inside { 1.0 } else { 0.0 });
    }
    let overlap = region.intersect(target_box);
    Some((overlap.area() / area).clamp(0.0, 1.0))
}

impl Observers<ElementId> for ObserverSet {
    type Handle = ObserverHandle;

    fn observe_intersection(
        &mut self,
        target: ElementId,
        options: IntersectionOptions<ElementId>,
    ) -> ObserverHandle {
        self.next = self.next.wrapping_add(1);
        let handle = ObserverHandle(self.next);
        self.intersections.push(IntersectionSubscription {
            handle,
            target,
            options,
            last: None,
        });
        handle
    }

    fn disconnect_intersection(&mut self, handle: ObserverHandle) {
        self.intersections.retain(|s| s.handle != handle);
    }

    fn observe_resize(&mut self, target: ElementId) {
        if !self.resizes.iter().any(|s| s.target == target) {
            self.resizes.push(ResizeSubscription { target, last: None });
        }
    }

    fn disconnect_resize(&mut self) {
        self.resizes.clear();
    }
}

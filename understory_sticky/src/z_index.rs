// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-index arbitration between pinned and scrolling sticky elements.
//!
//! Bottom-pinned content owns the bottom zone of its container. A top-sticky
//! element that reaches into that zone drops to [`ZTier::Lower`] so it passes
//! beneath. Any other top-sticky element, pinned or still in flow, takes
//! [`ZTier::Upper`]. Everything else sits at [`ZTier::Mid`].

use kurbo::Insets;

use crate::geometry::{ElementRect, Origin, get_rect};
use crate::host::Document;
use crate::types::{EdgeOffsets, Edges, PinState, ZTier};

/// Geometry the arbiter needs for one decision.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArbiterGeometry {
    /// The element's boxes relative to its containing block's border box.
    pub rect: ElementRect,
    /// Border-box height of the containing block.
    pub container_height: f64,
    /// Border widths of the containing block. Sticky insets are measured
    /// from the padding box inside them.
    pub container_border: Insets,
}

impl ArbiterGeometry {
    /// Distance from the scrollport's top edge to the element's top edge.
    pub fn top_in_scrollport(&self) -> f64 {
        self.rect.top() - self.container_border.y0
    }

    /// Distance from the element's bottom edge to the scrollport's bottom edge.
    pub fn bottom_in_scrollport(&self) -> f64 {
        self.container_height - self.container_border.y1 - self.rect.bottom()
    }
}

/// Tier assigned before any boundary report arrives.
pub fn initial_tier(sticks_to: Edges) -> ZTier {
    if sticks_to.contains(Edges::TOP) {
        ZTier::Upper
    } else {
        ZTier::Mid
    }
}

/// Decide the tier of an element from its current geometry.
pub fn decide_tier(sticks_to: Edges, offset: &EdgeOffsets, geometry: &ArbiterGeometry) -> ZTier {
    if !sticks_to.contains(Edges::TOP) {
        return ZTier::Mid;
    }
    let into_bottom_zone = geometry.rect.bottom() >= geometry.container_height - offset.bottom;
    if into_bottom_zone {
        ZTier::Lower
    } else {
        ZTier::Upper
    }
}

/// Whether the element sits exactly at one of its vertical sticky insets.
pub fn pin_state(sticks_to: Edges, offset: &EdgeOffsets, geometry: &ArbiterGeometry) -> PinState {
    let at_top = sticks_to.contains(Edges::TOP) && geometry.top_in_scrollport() == offset.top;
    let at_bottom =
        sticks_to.contains(Edges::BOTTOM) && geometry.bottom_in_scrollport() == offset.bottom;
    if at_top || at_bottom {
        PinState::Pinned
    } else {
        PinState::Unpinned
    }
}

/// Measure `element` relative to `container`.
///
/// Returns `None` when either box is unavailable or has zero area; the caller
/// skips the update in that case.
pub fn measure<D: Document>(
    doc: &D,
    element: D::Element,
    container: D::Element,
) -> Option<ArbiterGeometry> {
    let container_box = doc.border_box(container)?;
    let border_box = doc.border_box(element)?;
    let rect = get_rect(
        border_box,
        doc.border_widths(element),
        doc.padding_widths(element),
        Origin::Element(container_box),
    );
    if rect.is_degenerate() || container_box.height() <= 0.0 {
        return None;
    }
    Some(ArbiterGeometry {
        rect,
        container_height: container_box.height(),
        container_border: doc.border_widths(container),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleSnapshot;
    use crate::testing::MockDocument;
    use crate::types::ZTiers;
    use kurbo::Rect;

    fn geometry(top: f64, height: f64, container_height: f64) -> ArbiterGeometry {
        ArbiterGeometry {
            rect: get_rect(
                Rect::new(0.0, top, 100.0, top + height),
                Insets::ZERO,
                Insets::ZERO,
                Origin::default(),
            ),
            container_height,
            container_border: Insets::ZERO,
        }
    }

    #[test]
    fn bottom_only_is_mid() {
        let offsets = EdgeOffsets::ZERO;
        assert_eq!(
            decide_tier(Edges::BOTTOM, &offsets, &geometry(480.0, 20.0, 500.0)),
            ZTier::Mid
        );
        assert_eq!(initial_tier(Edges::BOTTOM), ZTier::Mid);
        assert_eq!(initial_tier(Edges::TOP | Edges::BOTTOM), ZTier::Upper);
    }

    #[test]
    fn in_flow_top_sticky_is_upper() {
        let offsets = EdgeOffsets {
            top: 40.0,
            bottom: 20.0,
            ..EdgeOffsets::ZERO
        };
        assert_eq!(
            decide_tier(Edges::TOP, &offsets, &geometry(200.0, 30.0, 500.0)),
            ZTier::Upper
        );
    }

    #[test]
    fn entering_bottom_zone_is_lower() {
        let offsets = EdgeOffsets {
            top: 40.0,
            bottom: 20.0,
            ..EdgeOffsets::ZERO
        };
        // Bottom edge at 480 == 500 - 20.
        assert_eq!(
            decide_tier(Edges::TOP, &offsets, &geometry(450.0, 30.0, 500.0)),
            ZTier::Lower
        );
        assert_eq!(
            decide_tier(Edges::TOP, &offsets, &geometry(460.0, 30.0, 500.0)),
            ZTier::Lower
        );
        assert_eq!(
            decide_tier(Edges::TOP, &offsets, &geometry(449.0, 30.0, 500.0)),
            ZTier::Upper
        );
    }

    #[test]
    fn held_at_top_inset_stays_upper() {
        let offsets = EdgeOffsets {
            top: 40.0,
            bottom: 20.0,
            ..EdgeOffsets::ZERO
        };
        let stuck = geometry(40.0, 30.0, 500.0);
        assert_eq!(pin_state(Edges::TOP, &offsets, &stuck), PinState::Pinned);
        assert_eq!(decide_tier(Edges::TOP, &offsets, &stuck), ZTier::Upper);
        assert!(ZTiers::from_base(1000).value(ZTier::Upper) > ZTiers::from_base(1000).lower);
    }

    #[test]
    fn pin_state_follows_insets() {
        let offsets = EdgeOffsets {
            top: 40.0,
            bottom: 20.0,
            ..EdgeOffsets::ZERO
        };
        // Below the fold, still in flow.
        let below = geometry(800.0, 30.0, 500.0);
        assert_eq!(pin_state(Edges::TOP, &offsets, &below), PinState::Unpinned);
        let nudged = geometry(41.0, 30.0, 500.0);
        assert_eq!(pin_state(Edges::TOP, &offsets, &nudged), PinState::Unpinned);
        // 500 - 20 - 30 = 450.
        let footer = geometry(450.0, 30.0, 500.0);
        assert_eq!(pin_state(Edges::BOTTOM, &offsets, &footer), PinState::Pinned);
        assert_eq!(pin_state(Edges::TOP, &offsets, &footer), PinState::Unpinned);
    }

    #[test]
    fn pin_state_measures_inside_container_border() {
        let offsets = EdgeOffsets {
            top: 40.0,
            bottom: 20.0,
            ..EdgeOffsets::ZERO
        };
        let bordered = |top| ArbiterGeometry {
            container_border: Insets::new(0.0, 5.0, 0.0, 8.0),
            ..geometry(top, 30.0, 500.0)
        };
        assert_eq!(pin_state(Edges::TOP, &offsets, &bordered(45.0)), PinState::Pinned);
        assert_eq!(pin_state(Edges::TOP, &offsets, &bordered(40.0)), PinState::Unpinned);
        // 500 - 8 - 20 - 30 = 442.
        assert_eq!(pin_state(Edges::BOTTOM, &offsets, &bordered(442.0)), PinState::Pinned);
    }

    #[test]
    fn measure_is_relative_to_container() {
        let mut doc = MockDocument::new();
        let container = doc.push(Some(doc.root()), StyleSnapshot::scroll_container(), &[]);
        let el = doc.push(Some(container), StyleSnapshot::default(), &["sticky-top"]);
        doc.set_rect(container, Rect::new(10.0, 100.0, 310.0, 600.0));
        doc.set_rect(el, Rect::new(10.0, 140.0, 310.0, 170.0));
        let g = measure(&doc, el, container).unwrap();
        assert_eq!(g.container_height, 500.0);
        assert_eq!(g.rect.top(), 40.0);
        assert_eq!(g.rect.bottom(), 70.0);
    }

    #[test]
    fn measure_skips_detached_and_empty() {
        let mut doc = MockDocument::new();
        let container = doc.push(Some(doc.root()), StyleSnapshot::scroll_container(), &[]);
        let el = doc.push(Some(container), StyleSnapshot::default(), &["sticky-top"]);
        doc.set_rect(container, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(measure(&doc, el, container).is_none());
        doc.set_rect(el, Rect::new(0.0, 10.0, 100.0, 10.0));
        assert!(measure(&doc, el, container).is_none());
        doc.set_rect(el, Rect::new(0.0, 10.0, 100.0, 20.0));
        assert!(measure(&doc, el, container).is_some());
        doc.detach(el);
        assert!(measure(&doc, el, container).is_none());
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Containing-block resolution.

use crate::host::Document;
use crate::style::{Position, StyleSnapshot, WillChange};
use crate::types::{Edges, LayoutInstruction};

/// Whether an element with `style` is a containing block for sticky
/// descendants that stick to `edges`.
///
/// Any one of these qualifies:
/// - non-static `position` with a non-`visible` overflow on an axis relevant to `edges`,
/// - `contain` other than `none`,
/// - a `filter`, `transform`, or `perspective`,
/// - `will-change` naming `transform` or `perspective`.
pub fn creates_containing_block(style: &StyleSnapshot, edges: Edges) -> bool {
    (style.position != Position::Static && style.clips_for(edges))
        || style.contain
        || style.filter
        || style.transform
        || style.perspective
        || style
            .will_change
            .intersects(WillChange::TRANSFORM | WillChange::PERSPECTIVE)
}

/// Walk from the parent of `element` towards the root and return the first
/// ancestor satisfying [`creates_containing_block`].
///
/// The root is the fallback and is never tested itself. Detached elements
/// resolve to the root.
pub fn resolve_containing_block<D: Document>(
    doc: &D,
    element: D::Element,
    edges: Edges,
) -> D::Element {
    let root = doc.root();
    let mut current = doc.parent(element);
    while let Some(ancestor) = current {
        if ancestor == root {
            break;
        }
        if creates_containing_block(&doc.computed_style(ancestor), edges) {
            return ancestor;
        }
        current = doc.parent(ancestor);
    }
    root
}

/// Force `z-index: 0` on a containing block whose z-index is `auto`, so it
/// forms a local stacking context for the tiers assigned to its children.
///
/// Returns `true` if a write was issued.
pub fn establish_stacking_context<D: Document>(doc: &mut D, block: D::Element) -> bool {
    if doc.computed_style(block).z_index.is_some() {
        return false;
    }
    doc.apply(&LayoutInstruction::new(block).with_z_index(0));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Overflow;
    use crate::testing::MockDocument;
    use kurbo::Rect;

    #[test]
    fn static_scroller_is_not_a_block() {
        let style = StyleSnapshot::default().with_overflow(Overflow::Auto);
        assert!(!creates_containing_block(&style, Edges::TOP));
    }

    #[test]
    fn positioned_visible_is_not_a_block() {
        let style = StyleSnapshot {
            position: Position::Relative,
            ..StyleSnapshot::default()
        };
        assert!(!creates_containing_block(&style, Edges::TOP));
    }

    #[test]
    fn each_predicate_qualifies_alone() {
        let base = StyleSnapshot::default();
        let cases = [
            StyleSnapshot::scroll_container(),
            StyleSnapshot {
                contain: true,
                ..base
            },
            StyleSnapshot {
                filter: true,
                ..base
            },
            StyleSnapshot {
                transform: true,
                ..base
            },
            StyleSnapshot {
                perspective: true,
                ..base
            },
            StyleSnapshot {
                will_change: WillChange::TRANSFORM,
                ..base
            },
            StyleSnapshot {
                will_change: WillChange::PERSPECTIVE,
                ..base
            },
        ];
        for style in cases {
            assert!(
                creates_containing_block(&style, Edges::TOP),
                "{style:?} should qualify"
            );
        }
    }

    #[test]
    fn overflow_axis_follows_edges() {
        let style = StyleSnapshot {
            position: Position::Relative,
            overflow_x: Overflow::Auto,
            overflow_y: Overflow::Visible,
            ..StyleSnapshot::default()
        };
        assert!(!creates_containing_block(&style, Edges::TOP));
        assert!(creates_containing_block(&style, Edges::LEFT));
        assert!(creates_containing_block(&style, Edges::TOP | Edges::LEFT));
    }

    #[test]
    fn resolves_nearest_qualifying_ancestor() {
        let mut doc = MockDocument::new();
        let outer = doc.push(Some(doc.root()), StyleSnapshot::scroll_container(), &[]);
        let plain = doc.push(Some(outer), StyleSnapshot::default(), &[]);
        let el = doc.push(Some(plain), StyleSnapshot::default(), &["sticky-top"]);
        assert_eq!(resolve_containing_block(&doc, el, Edges::TOP), outer);
    }

    #[test]
    fn element_itself_is_not_considered() {
        let mut doc = MockDocument::new();
        let el = doc.push(
            Some(doc.root()),
            StyleSnapshot::scroll_container(),
            &["sticky-top"],
        );
        assert_eq!(resolve_containing_block(&doc, el, Edges::TOP), doc.root());
    }

    #[test]
    fn falls_back_to_root() {
        let mut doc = MockDocument::new();
        let a = doc.push(Some(doc.root()), StyleSnapshot::default(), &[]);
        let el = doc.push(Some(a), StyleSnapshot::default(), &["sticky-top"]);
        assert_eq!(resolve_containing_block(&doc, el, Edges::TOP), doc.root());

        let detached = doc.push(None, StyleSnapshot::default(), &["sticky-top"]);
        assert_eq!(
            resolve_containing_block(&doc, detached, Edges::TOP),
            doc.root()
        );
    }

    #[test]
    fn stacking_context_forced_only_when_auto() {
        let mut doc = MockDocument::new();
        let auto = doc.push(Some(doc.root()), StyleSnapshot::scroll_container(), &[]);
        let set = doc.push(
            Some(doc.root()),
            StyleSnapshot {
                z_index: Some(3),
                ..StyleSnapshot::scroll_container()
            },
            &[],
        );
        doc.set_rect(auto, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(establish_stacking_context(&mut doc, auto));
        assert_eq!(doc.computed_style(auto).z_index, Some(0));
        assert!(!establish_stacking_context(&mut doc, auto));
        assert!(!establish_stacking_context(&mut doc, set));
        assert_eq!(doc.computed_style(set).z_index, Some(3));
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box-model geometry: border, padding, and content boxes relative to an origin.

use kurbo::{Insets, Point, Rect, Vec2};

/// Coordinate origin for [`get_rect`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Origin {
    /// Translate so the top-left corner of this border box becomes `(0, 0)`.
    Element(Rect),
    /// Translate so this point becomes `(0, 0)`.
    Point(Point),
}

impl Default for Origin {
    fn default() -> Self {
        Self::Point(Point::ORIGIN)
    }
}

impl Origin {
    fn offset(self) -> Vec2 {
        match self {
            Self::Element(rect) => rect.origin().to_vec2(),
            Self::Point(p) => p.to_vec2(),
        }
    }
}

/// The three nested boxes of an element plus the widths separating them.
///
/// All rects are in the coordinate space chosen by the [`Origin`] passed to
/// [`get_rect`]. Use `x0`/`y0`/`x1`/`y1` for left/top/right/bottom.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ElementRect {
    /// Outer edge of the border.
    pub border_box: Rect,
    /// Inner edge of the border.
    pub padding_box: Rect,
    /// Inner edge of the padding.
    pub content_box: Rect,
    /// Border widths per side.
    pub border_width: Insets,
    /// Padding widths per side.
    pub padding_width: Insets,
}

impl ElementRect {
    /// Top edge of the border box.
    pub fn top(&self) -> f64 {
        self.border_box.y0
    }

    /// Bottom edge of the border box.
    pub fn bottom(&self) -> f64 {
        self.border_box.y1
    }

    /// Whether the border box has zero area.
    pub fn is_degenerate(&self) -> bool {
        self.border_box.width() <= 0.0 || self.border_box.height() <= 0.0
    }
}

/// Compute an element's boxes relative to `origin`.
///
/// `border_box` is in the host's absolute space (for example viewport
/// coordinates); `border` and `padding` are the computed widths. Padding and
/// content boxes never invert: widths larger than the box collapse it to zero
/// size rather than producing negative extents.
///
/// ```rust
/// use kurbo::{Insets, Rect};
/// use understory_sticky::geometry::{Origin, get_rect};
///
/// let container = Rect::new(100.0, 50.0, 400.0, 550.0);
/// let el = Rect::new(110.0, 90.0, 310.0, 130.0);
/// let r = get_rect(el, Insets::uniform(1.0), Insets::uniform(4.0), Origin::Element(container));
/// assert_eq!(r.border_box, Rect::new(10.0, 40.0, 210.0, 80.0));
/// assert_eq!(r.content_box, Rect::new(15.0, 45.0, 205.0, 75.0));
/// ```
pub fn get_rect(border_box: Rect, border: Insets, padding: Insets, origin: Origin) -> ElementRect {
    let border_box = (border_box - origin.offset()).abs();
    let padding_box = shrink(border_box, border);
    let content_box = shrink(padding_box, padding);
    ElementRect {
        border_box,
        padding_box,
        content_box,
        border_width: border,
        padding_width: padding,
    }
}

fn shrink(rect: Rect, by: Insets) -> Rect {
    let x0 = rect.x0 + by.x0;
    let y0 = rect.y0 + by.y0;
    let x1 = (rect.x1 - by.x1).max(x0);
    let y1 = (rect.y1 - by.y1).max(y0);
    Rect::new(x0, y0, x1, y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_origin_is_identity() {
        let el = Rect::new(5.0, 6.0, 15.0, 26.0);
        let r = get_rect(el, Insets::ZERO, Insets::ZERO, Origin::default());
        assert_eq!(r.border_box, el);
        assert_eq!(r.padding_box, el);
        assert_eq!(r.content_box, el);
    }

    #[test]
    fn point_origin_translates() {
        let el = Rect::new(5.0, 6.0, 15.0, 26.0);
        let r = get_rect(
            el,
            Insets::ZERO,
            Insets::ZERO,
            Origin::Point(Point::new(5.0, 6.0)),
        );
        assert_eq!(r.border_box, Rect::new(0.0, 0.0, 10.0, 20.0));
        assert_eq!(r.top(), 0.0);
        assert_eq!(r.bottom(), 20.0);
    }

    #[test]
    fn asymmetric_widths_nest_boxes() {
        let el = Rect::new(0.0, 0.0, 100.0, 50.0);
        let border = Insets::new(1.0, 2.0, 3.0, 4.0);
        let padding = Insets::new(5.0, 5.0, 5.0, 5.0);
        let r = get_rect(el, border, padding, Origin::default());
        assert_eq!(r.padding_box, Rect::new(1.0, 2.0, 97.0, 46.0));
        assert_eq!(r.content_box, Rect::new(6.0, 7.0, 92.0, 41.0));
        assert_eq!(r.border_width, border);
        assert_eq!(r.padding_width, padding);
    }

    #[test]
    fn oversized_padding_collapses_content() {
        let el = Rect::new(0.0, 0.0, 10.0, 10.0);
        let r = get_rect(el, Insets::ZERO, Insets::uniform(8.0), Origin::default());
        assert_eq!(r.content_box.width(), 0.0);
        assert_eq!(r.content_box.height(), 0.0);
        assert!(!r.is_degenerate());
    }
}

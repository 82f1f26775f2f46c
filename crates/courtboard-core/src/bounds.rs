//! Bounding boxes and centers for board elements.
//!
//! All functions here are pure. An element that cannot be bounded (a path
//! without points) yields `None`; callers aggregating over several elements
//! must filter those out before taking minima and maxima.

use kurbo::{Point, Rect};

use crate::elements::ElementRef;

/// Average glyph width relative to the font size.
pub const GLYPH_WIDTH_FACTOR: f64 = 0.6;
/// Line height relative to the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;
/// Character count assumed for empty text, so it stays grabbable.
pub const EMPTY_TEXT_CHARS: usize = 4;

/// Compute the bounds of any element.
pub fn element_bounds(element: ElementRef<'_>) -> Option<Rect> {
    element.bounds()
}

/// Bounds of an ellipse (or circle) centered at `center`.
pub fn ellipse_bounds(center: Point, radius_x: f64, radius_y: f64) -> Rect {
    Rect::new(
        center.x - radius_x,
        center.y - radius_y,
        center.x + radius_x,
        center.y + radius_y,
    )
}

/// Bounds of a `width` x `height` box centered at `center`.
///
/// Rotation is ignored: the result is the unrotated box.
pub fn centered_bounds(center: Point, width: f64, height: f64) -> Rect {
    Rect::from_center_size(center, (width, height))
}

/// Estimated size of a single line of text.
pub fn text_size(content: &str, font_size: f64) -> (f64, f64) {
    let chars = match content.chars().count() {
        0 => EMPTY_TEXT_CHARS,
        n => n,
    };
    (
        chars as f64 * font_size * GLYPH_WIDTH_FACTOR,
        font_size * LINE_HEIGHT_FACTOR,
    )
}

/// Bounds of text anchored at its top-left corner.
pub fn text_bounds(anchor: Point, content: &str, font_size: f64) -> Rect {
    let (width, height) = text_size(content, font_size);
    Rect::new(anchor.x, anchor.y, anchor.x + width, anchor.y + height)
}

/// Min/max box around a list of points.
///
/// The center of the result is the middle of the box, not the centroid
/// of the points.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    Some(
        points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |rect, p| {
                rect.union_pt(*p)
            }),
    )
}

/// Union of all available bounds.
pub fn union_bounds<I>(bounds: I) -> Option<Rect>
where
    I: IntoIterator<Item = Option<Rect>>,
{
    bounds
        .into_iter()
        .flatten()
        .reduce(|acc, rect| acc.union(rect))
}

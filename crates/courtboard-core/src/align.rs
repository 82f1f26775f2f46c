//! Alignment and distribution of the selected elements.
//!
//! Alignment needs at least two selected elements with bounds, distribution
//! at least three; otherwise the commands do nothing. Elements are moved
//! through [`Board::update_element_position`], so paths keep their shape.

use kurbo::Rect;

use crate::board::Board;
use crate::elements::ElementId;

/// Minimum selection size for alignment.
pub const MIN_ALIGN: usize = 2;
/// Minimum selection size for distribution.
pub const MIN_DISTRIBUTE: usize = 3;

/// Edge or axis to align on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    /// Horizontal center.
    Center,
    /// Vertical center.
    Middle,
}

/// Axis to distribute along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

fn selected_bounds(board: &Board) -> Vec<(ElementId, Rect)> {
    board
        .selected_elements()
        .into_iter()
        .filter_map(|element| Some((element.id().to_string(), element.bounds()?)))
        .collect()
}

/// Align the selected elements. Returns false when fewer than two
/// selected elements have bounds.
pub fn align(board: &mut Board, alignment: Alignment) -> bool {
    let items = selected_bounds(board);
    if items.len() < MIN_ALIGN {
        return false;
    }

    let fold = |init: f64, f: fn(f64, f64) -> f64, edge: fn(&Rect) -> f64| {
        items.iter().map(|(_, r)| edge(r)).fold(init, f)
    };
    let min_left = fold(f64::INFINITY, f64::min, |r| r.x0);
    let max_right = fold(f64::NEG_INFINITY, f64::max, |r| r.x1);
    let min_top = fold(f64::INFINITY, f64::min, |r| r.y0);
    let max_bottom = fold(f64::NEG_INFINITY, f64::max, |r| r.y1);

    for (id, rect) in &items {
        let center = rect.center();
        let (x, y) = match alignment {
            Alignment::Left => (min_left + rect.width() / 2.0, center.y),
            Alignment::Right => (max_right - rect.width() / 2.0, center.y),
            Alignment::Top => (center.x, min_top + rect.height() / 2.0),
            Alignment::Bottom => (center.x, max_bottom - rect.height() / 2.0),
            Alignment::Center => ((min_left + max_right) / 2.0, center.y),
            Alignment::Middle => (center.x, (min_top + max_bottom) / 2.0),
        };
        board.update_element_position(id, x, y);
    }
    true
}

/// Space the selected elements evenly between the first and last center
/// along `axis`. The outermost elements stay in place.
pub fn distribute(board: &mut Board, axis: Axis) -> bool {
    let mut items = selected_bounds(board);
    if items.len() < MIN_DISTRIBUTE {
        return false;
    }

    let coord = |rect: &Rect| match axis {
        Axis::Horizontal => rect.center().x,
        Axis::Vertical => rect.center().y,
    };
    items.sort_by(|(_, a), (_, b)| coord(a).total_cmp(&coord(b)));

    let first = coord(&items[0].1);
    let last = coord(&items[items.len() - 1].1);
    let spacing = (last - first) / (items.len() - 1) as f64;

    for (index, (id, rect)) in items.iter().enumerate().take(items.len() - 1).skip(1) {
        let target = first + spacing * index as f64;
        let center = rect.center();
        let (x, y) = match axis {
            Axis::Horizontal => (target, center.y),
            Axis::Vertical => (center.x, target),
        };
        board.update_element_position(id, x, y);
    }
    true
}

pub fn align_left(board: &mut Board) -> bool {
    align(board, Alignment::Left)
}

pub fn align_right(board: &mut Board) -> bool {
    align(board, Alignment::Right)
}

pub fn align_top(board: &mut Board) -> bool {
    align(board, Alignment::Top)
}

pub fn align_bottom(board: &mut Board) -> bool {
    align(board, Alignment::Bottom)
}

pub fn align_center(board: &mut Board) -> bool {
    align(board, Alignment::Center)
}

pub fn align_middle(board: &mut Board) -> bool {
    align(board, Alignment::Middle)
}

pub fn distribute_horizontally(board: &mut Board) -> bool {
    distribute(board, Axis::Horizontal)
}

pub fn distribute_vertically(board: &mut Board) -> bool {
    distribute(board, Axis::Vertical)
}

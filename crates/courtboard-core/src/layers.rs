//! Z-order commands relative to the current selection.
//!
//! All commands work on the derived view of every element sorted by
//! z-index. Empty selections are a no-op.

use crate::board::Board;
use crate::elements::{ElementId, Z_INDEX_UNASSIGNED};

struct Layer {
    id: ElementId,
    z: i64,
    selected: bool,
}

/// Every element in paint order, with duplicate z-indices spread out first
/// so that swapping two neighbors always changes their order.
///
/// Views pressed against either end of the `i64` range are renumbered from
/// zero so front/back moves keep headroom.
fn layer_view(board: &mut Board) -> Vec<Layer> {
    let mut view: Vec<Layer> = board
        .sorted_elements()
        .into_iter()
        .map(|element| Layer {
            id: element.id().to_string(),
            z: element.z_index(),
            selected: board.is_selected(element.id()),
        })
        .collect();

    let len = view.len() as i64;
    let crowded = view
        .first()
        .is_some_and(|layer| layer.z <= Z_INDEX_UNASSIGNED.saturating_add(len))
        || view
            .last()
            .is_some_and(|layer| layer.z >= i64::MAX.saturating_sub(len));
    if crowded || view.windows(2).any(|pair| pair[0].z == pair[1].z) {
        log::debug!("Renumbering layers (crowded: {})", crowded);
        let base = match view.first() {
            Some(layer) if !crowded => layer.z,
            _ => 0,
        };
        for (offset, layer) in (0i64..).zip(view.iter_mut()) {
            layer.z = base.saturating_add(offset);
            board.set_z_index(&layer.id, layer.z);
        }
    }
    view
}

fn swap_z(board: &mut Board, view: &mut [Layer], a: usize, b: usize) {
    let (za, zb) = (view[a].z, view[b].z);
    view[a].z = zb;
    view[b].z = za;
    view.swap(a, b);
    board.set_z_index(&view[a].id, view[a].z);
    board.set_z_index(&view[b].id, view[b].z);
}

/// Place every selected element above all others, keeping their relative
/// order.
pub fn bring_to_front(board: &mut Board) -> bool {
    if board.selection().is_empty() {
        return false;
    }
    let view = layer_view(board);
    let Some(max) = view.iter().map(|layer| layer.z).max() else {
        return false;
    };
    for (offset, layer) in (1i64..).zip(view.iter().filter(|layer| layer.selected)) {
        board.set_z_index(&layer.id, max.saturating_add(offset));
    }
    true
}

/// Place every selected element below all others, keeping their relative
/// order.
pub fn send_to_back(board: &mut Board) -> bool {
    if board.selection().is_empty() {
        return false;
    }
    let view = layer_view(board);
    let Some(min) = view.iter().map(|layer| layer.z).min() else {
        return false;
    };
    let selected: Vec<&Layer> = view.iter().filter(|layer| layer.selected).collect();
    let count = selected.len() as i64;
    for (offset, layer) in (0i64..).zip(selected) {
        board.set_z_index(&layer.id, min.saturating_sub(count).saturating_add(offset));
    }
    true
}

/// Move each selected element one step up.
///
/// An element swaps with the non-selected neighbor directly above it, so a
/// contiguous selected block moves as a unit. Processed top-down.
pub fn bring_forward(board: &mut Board) -> bool {
    if board.selection().is_empty() {
        return false;
    }
    let mut view = layer_view(board);
    let mut moved = false;
    for i in (0..view.len().saturating_sub(1)).rev() {
        if view[i].selected && !view[i + 1].selected {
            swap_z(board, &mut view, i, i + 1);
            moved = true;
        }
    }
    moved
}

/// Move each selected element one step down. Processed bottom-up.
pub fn send_backward(board: &mut Board) -> bool {
    if board.selection().is_empty() {
        return false;
    }
    let mut view = layer_view(board);
    let mut moved = false;
    for i in 1..view.len() {
        if view[i].selected && !view[i - 1].selected {
            swap_z(board, &mut view, i, i - 1);
            moved = true;
        }
    }
    moved
}

/// True if some selected element has a non-selected element above it.
pub fn can_bring_forward(board: &Board) -> bool {
    let sorted = board.sorted_elements();
    sorted
        .windows(2)
        .any(|pair| board.is_selected(pair[0].id()) && !board.is_selected(pair[1].id()))
}

/// True if some selected element has a non-selected element below it.
pub fn can_send_backward(board: &Board) -> bool {
    let sorted = board.sorted_elements();
    sorted
        .windows(2)
        .any(|pair| board.is_selected(pair[1].id()) && !board.is_selected(pair[0].id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PlayerOptions;
    use crate::elements::ElementKind;

    fn board_with(n: usize) -> (Board, Vec<ElementId>) {
        let mut board = Board::new();
        let ids = (0..n)
            .map(|_| board.add_player(PlayerOptions::default()))
            .collect();
        board.clear_selection();
        (board, ids)
    }

    fn select(board: &mut Board, ids: &[&ElementId]) {
        board.clear_selection();
        for id in ids {
            board.select_element(id, ElementKind::Player, true);
        }
    }

    fn pick(ids: &[ElementId], indices: &[usize]) -> Vec<String> {
        indices.iter().map(|i| ids[*i].clone()).collect()
    }

    fn order(board: &Board) -> Vec<String> {
        board
            .sorted_elements()
            .iter()
            .map(|element| element.id().to_string())
            .collect()
    }

    #[test]
    fn test_bring_to_front_keeps_relative_order() {
        let (mut board, ids) = board_with(4);
        select(&mut board, &[&ids[1], &ids[0]]);
        assert!(bring_to_front(&mut board));
        assert_eq!(order(&board), pick(&ids, &[2, 3, 0, 1]));
    }

    #[test]
    fn test_send_to_back() {
        let (mut board, ids) = board_with(4);
        select(&mut board, &[&ids[3], &ids[2]]);
        assert!(send_to_back(&mut board));
        assert_eq!(order(&board), pick(&ids, &[2, 3, 0, 1]));
        assert!(board.element(&ids[2]).unwrap().z_index() < 0);
    }

    #[test]
    fn test_bring_forward_moves_block_together() {
        let (mut board, ids) = board_with(4);
        select(&mut board, &[&ids[0], &ids[1]]);
        assert!(bring_forward(&mut board));
        assert_eq!(order(&board), pick(&ids, &[2, 0, 1, 3]));
    }

    #[test]
    fn test_send_backward_moves_block_together() {
        let (mut board, ids) = board_with(4);
        select(&mut board, &[&ids[2], &ids[3]]);
        assert!(send_backward(&mut board));
        assert_eq!(order(&board), pick(&ids, &[0, 2, 3, 1]));
    }

    #[test]
    fn test_top_element_cannot_move_forward() {
        let (mut board, ids) = board_with(3);
        select(&mut board, &[&ids[2]]);
        assert!(!can_bring_forward(&board));
        assert!(can_send_backward(&board));
        assert!(!bring_forward(&mut board));
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let (mut board, ids) = board_with(3);
        let revision = board.revision();
        assert!(!bring_to_front(&mut board));
        assert!(!send_backward(&mut board));
        assert_eq!(board.revision(), revision);
        assert_eq!(order(&board), ids);
    }

    #[test]
    fn test_duplicate_z_indices_still_reorder() {
        let (mut board, ids) = board_with(3);
        for id in &ids {
            board.update_player(id, |p| p.z_index = 7);
        }
        select(&mut board, &[&ids[0]]);
        assert!(bring_forward(&mut board));
        assert_eq!(order(&board), pick(&ids, &[1, 0, 2]));
    }

    #[test]
    fn test_front_and_back_at_range_limits() {
        let (mut board, ids) = board_with(3);
        board.update_player(&ids[1], |p| p.z_index = i64::MAX);
        board.update_player(&ids[2], |p| p.z_index = Z_INDEX_UNASSIGNED + 1);
        assert_eq!(order(&board), pick(&ids, &[2, 0, 1]));

        select(&mut board, &[&ids[2]]);
        assert!(bring_to_front(&mut board));
        assert_eq!(order(&board), pick(&ids, &[0, 1, 2]));

        select(&mut board, &[&ids[2]]);
        assert!(send_to_back(&mut board));
        assert_eq!(order(&board), pick(&ids, &[2, 0, 1]));
        assert!(
            board
                .sorted_elements()
                .iter()
                .all(|element| element.z_index() != Z_INDEX_UNASSIGNED)
        );
    }
}

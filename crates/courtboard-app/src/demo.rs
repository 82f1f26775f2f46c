//! Built-in play used when no document is given.

use courtboard_core::animation::{KeyframeEvent, board_poses};
use courtboard_core::{BoardElement, Easing, Editor, PathKind, PlayDocument, Team};
use kurbo::Point;

/// A short high pick and roll: the center screens for the point guard,
/// who drives while the center rolls to the rim.
pub fn demo_document() -> PlayDocument {
    let mut editor = Editor::new();
    editor.edit(|board| board.add_default_players());

    let offense: Vec<String> = editor
        .board()
        .players()
        .iter()
        .filter(|player| player.team == Team::Offense)
        .map(|player| player.id().to_string())
        .collect();
    let (Some(guard), Some(center)) = (offense.first().cloned(), offense.last().cloned()) else {
        return editor.to_document("High pick and roll");
    };
    editor.seed_animation();

    editor.edit(|board| {
        board.update_element_position(&center, 470.0, 240.0);
        board.add_path(
            PathKind::Movement,
            vec![Point::new(280.0, 350.0), Point::new(470.0, 240.0)],
        );
    });
    add_keyframe(&mut editor, 1500.0, Easing::EaseInOutQuad, "screen");

    editor.edit(|board| {
        board.update_element_position(&guard, 300.0, 230.0);
        board.update_element_position(&center, 200.0, 280.0);
        board.add_path(
            PathKind::Dribble,
            vec![Point::new(490.0, 250.0), Point::new(400.0, 220.0), Point::new(300.0, 230.0)],
        );
    });
    add_keyframe(&mut editor, 3000.0, Easing::EaseOutCubic, "roll");

    editor.edit(|board| {
        board.add_path(
            PathKind::Pass,
            vec![Point::new(300.0, 230.0), Point::new(200.0, 280.0)],
        );
    });
    add_keyframe(&mut editor, 3600.0, Easing::Linear, "pass");

    editor.to_document("High pick and roll")
}

fn add_keyframe(editor: &mut Editor, time: f64, easing: Easing, event: &str) {
    let poses = board_poses(editor.board());
    editor
        .animation_mut()
        .add_keyframe(time, poses, vec![KeyframeEvent::new(event)], easing);
}

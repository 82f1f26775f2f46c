//! Keyframe playback.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::clock::{Clock, FrameFlag, FrameScheduler, SystemClock};
use super::{ANIMATION_FORMAT_VERSION, AnimationData, Easing, Keyframe, KeyframeEvent, Pose, Timeline};
use crate::board::Board;
use crate::config::DEFAULT_ANIMATION_DURATION_MS;
use crate::elements::{ElementId, ElementRef};

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Output of one playback frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    /// Playback time of the frame in milliseconds.
    pub time: f64,
    pub positions: BTreeMap<ElementId, Pose>,
    /// Events of keyframes crossed since the previous frame.
    pub events: Vec<KeyframeEvent>,
    /// The frame reached the end; playback has stopped.
    pub finished: bool,
}

/// Poses of every animatable element on `board`.
///
/// Paths are skipped. Rotation is recorded for rotatable shapes.
pub fn board_poses(board: &Board) -> BTreeMap<ElementId, Pose> {
    board
        .elements()
        .filter_map(|element| {
            let position = element.position()?;
            let pose = Pose::new(position.x, position.y);
            let pose = match (element, element.rotation()) {
                (ElementRef::Shape(_), Some(rotation)) => pose.with_rotation(rotation),
                _ => pose,
            };
            Some((element.id().to_string(), pose))
        })
        .collect()
}

/// Owns a timeline and drives playback from wall-clock time.
///
/// The engine never touches the board; it publishes interpolated poses
/// for the renderer.
pub struct AnimationEngine {
    timeline: Timeline,
    state: PlaybackState,
    current_time: f64,
    positions: BTreeMap<ElementId, Pose>,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn FrameScheduler>,
    /// Clock reading that corresponds to playback time zero.
    start_ms: f64,
    paused_at_ms: f64,
    /// Total time spent paused since `start_ms`.
    paused_ms: f64,
    /// Playback time up to which keyframe events were reported.
    events_until: Option<f64>,
}

impl std::fmt::Debug for AnimationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationEngine")
            .field("state", &self.state)
            .field("current_time", &self.current_time)
            .field("keyframes", &self.timeline.len())
            .finish_non_exhaustive()
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationEngine {
    /// Engine on the system clock whose frame requests nobody polls.
    pub fn new() -> Self {
        Self::with_clock(SystemClock::default(), FrameFlag::new())
    }

    pub fn with_clock(clock: impl Clock + 'static, scheduler: impl FrameScheduler + 'static) -> Self {
        Self {
            timeline: Timeline::with_default_duration(DEFAULT_ANIMATION_DURATION_MS),
            state: PlaybackState::Stopped,
            current_time: 0.0,
            positions: BTreeMap::new(),
            clock: Box::new(clock),
            scheduler: Box::new(scheduler),
            start_ms: 0.0,
            paused_at_ms: 0.0,
            paused_ms: 0.0,
            events_until: None,
        }
    }

    /// Duration reported while there are no keyframes.
    pub fn set_default_duration(&mut self, default_duration: f64) {
        let keyframes = self.timeline.keyframes().to_vec();
        self.timeline = Timeline::from_keyframes(keyframes, default_duration);
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        self.timeline.keyframes()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    /// Current time as a fraction of the duration.
    pub fn progress(&self) -> f64 {
        let duration = self.duration();
        if duration > 0.0 {
            self.current_time / duration
        } else {
            0.0
        }
    }

    /// Poses at the current time.
    pub fn positions(&self) -> &BTreeMap<ElementId, Pose> {
        &self.positions
    }

    fn refresh(&mut self) {
        self.positions = self.timeline.interpolate(self.current_time);
    }

    // --- keyframes ---

    /// Insert a keyframe in time order. Returns its index.
    pub fn add_keyframe(
        &mut self,
        time: f64,
        elements: BTreeMap<ElementId, Pose>,
        events: Vec<KeyframeEvent>,
        easing: Easing,
    ) -> usize {
        let mut keyframe = Keyframe::new(time.max(0.0), elements);
        keyframe.events = events;
        keyframe.easing = easing;
        let index = self.timeline.add_keyframe(keyframe);
        self.refresh();
        index
    }

    /// Record the board's current poses as a keyframe at `time`.
    pub fn capture_keyframe(&mut self, time: f64, board: &Board, easing: Easing) -> usize {
        self.add_keyframe(time, board_poses(board), Vec::new(), easing)
    }

    /// Make the board's current poses keyframe 0, replacing any existing
    /// keyframe at time 0.
    pub fn seed_from_board(&mut self, board: &Board) {
        self.timeline.remove_at_time(0.0);
        self.capture_keyframe(0.0, board, Easing::Linear);
    }

    pub fn remove_keyframe(&mut self, index: usize) -> Option<Keyframe> {
        let removed = self.timeline.remove_keyframe(index);
        if removed.is_some() {
            self.current_time = self.current_time.min(self.duration());
            self.refresh();
        }
        removed
    }

    pub fn update_keyframe_easing(&mut self, index: usize, easing: Easing) -> bool {
        let updated = self.timeline.update_keyframe_easing(index, easing);
        if updated {
            self.refresh();
        }
        updated
    }

    /// Drop all keyframes and stop.
    pub fn clear_keyframes(&mut self) {
        self.stop();
        self.timeline.clear();
        self.positions.clear();
    }

    // --- playback ---

    /// Start or resume playback.
    ///
    /// From `Stopped` playback starts at time 0; from `Paused` it resumes
    /// at the paused time.
    pub fn play(&mut self) {
        let now = self.clock.now_ms();
        match self.state {
            PlaybackState::Playing => return,
            PlaybackState::Stopped => {
                self.current_time = 0.0;
                self.start_ms = now;
                self.paused_ms = 0.0;
                self.events_until = None;
                self.refresh();
            }
            PlaybackState::Paused => {
                self.paused_ms += now - self.paused_at_ms;
            }
        }
        self.state = PlaybackState::Playing;
        self.scheduler.request_frame();
        log::debug!("Playback started at {:.0} ms", self.current_time);
    }

    /// Pause, cancelling any pending frame.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.scheduler.cancel_frame();
        self.paused_at_ms = self.clock.now_ms();
        self.state = PlaybackState::Paused;
        log::debug!("Playback paused at {:.0} ms", self.current_time);
    }

    /// Stop and rewind to time 0, cancelling any pending frame.
    pub fn stop(&mut self) {
        self.scheduler.cancel_frame();
        self.state = PlaybackState::Stopped;
        self.current_time = 0.0;
        self.paused_ms = 0.0;
        self.events_until = None;
        self.refresh();
    }

    pub fn toggle_play_pause(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance playback to the current clock time.
    ///
    /// Returns `None` unless playing. Reaching the end stops playback after
    /// producing the final frame; otherwise the next frame is requested.
    pub fn on_frame(&mut self) -> Option<FrameUpdate> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        let duration = self.duration();
        let elapsed = self.clock.now_ms() - self.start_ms - self.paused_ms;
        self.current_time = elapsed.clamp(0.0, duration);
        self.refresh();

        let events = self
            .timeline
            .keyframes_crossed(self.events_until, self.current_time)
            .flat_map(|keyframe| keyframe.events.iter().cloned())
            .collect();
        self.events_until = Some(self.current_time);

        let mut update = FrameUpdate {
            time: self.current_time,
            positions: self.positions.clone(),
            events,
            finished: false,
        };
        if elapsed >= duration {
            update.finished = true;
            self.stop();
            log::info!("Playback finished after {:.0} ms", duration);
        } else {
            self.scheduler.request_frame();
        }
        Some(update)
    }

    /// Jump to `time` (clamped), recomputing poses immediately.
    ///
    /// Works in every state; while playing or paused, playback continues
    /// from the new time.
    pub fn seek_to(&mut self, time: f64) {
        let time = time.clamp(0.0, self.duration());
        self.current_time = time;
        match self.state {
            PlaybackState::Playing => {
                self.start_ms = self.clock.now_ms() - time - self.paused_ms;
            }
            PlaybackState::Paused => {
                self.start_ms = self.paused_at_ms - time - self.paused_ms;
            }
            PlaybackState::Stopped => {}
        }
        self.events_until = Some(time);
        self.refresh();
    }

    /// Jump to a fraction (0 to 1) of the duration.
    pub fn seek_to_progress(&mut self, progress: f64) {
        self.seek_to(progress.clamp(0.0, 1.0) * self.duration());
    }

    // --- import/export ---

    pub fn export_data(&self) -> AnimationData {
        AnimationData {
            version: ANIMATION_FORMAT_VERSION.to_string(),
            duration: self.duration(),
            keyframes: self.timeline.keyframes().to_vec(),
        }
    }

    /// Replace the timeline, stopping playback.
    ///
    /// Older payloads without per-keyframe easing load as linear.
    pub fn import_data(&mut self, data: AnimationData) {
        if data.version != ANIMATION_FORMAT_VERSION {
            log::warn!(
                "Migrating animation data from version {} to {}",
                data.version,
                ANIMATION_FORMAT_VERSION
            );
        }
        self.stop();
        let default_duration = if data.keyframes.is_empty() && data.duration > 0.0 {
            data.duration
        } else {
            self.timeline.default_duration()
        };
        self.timeline = Timeline::from_keyframes(data.keyframes, default_duration);
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::clock::ManualClock;
    use crate::board::PlayerOptions;
    use kurbo::Point;

    const EPS: f64 = 1e-9;

    fn engine() -> (AnimationEngine, ManualClock, FrameFlag) {
        let clock = ManualClock::new();
        let flag = FrameFlag::new();
        (AnimationEngine::with_clock(clock.clone(), flag.clone()), clock, flag)
    }

    fn two_keyframes(engine: &mut AnimationEngine) {
        let start = BTreeMap::from([("p".to_string(), Pose::new(0.0, 0.0))]);
        let end = BTreeMap::from([("p".to_string(), Pose::new(100.0, 0.0))]);
        engine.add_keyframe(0.0, start, Vec::new(), Easing::Linear);
        engine.add_keyframe(1000.0, end, vec![KeyframeEvent::new("shot")], Easing::Linear);
    }

    #[test]
    fn test_play_pause_resume() {
        let (mut engine, clock, flag) = engine();
        two_keyframes(&mut engine);

        engine.play();
        assert!(flag.take());
        clock.advance(250.0);
        let frame = engine.on_frame().unwrap();
        assert!((frame.time - 250.0).abs() < EPS);
        assert!((frame.positions["p"].x - 25.0).abs() < EPS);
        assert!(flag.is_pending());

        engine.pause();
        assert!(!flag.is_pending());
        clock.advance(5000.0);
        assert!(engine.on_frame().is_none());

        engine.play();
        clock.advance(250.0);
        let frame = engine.on_frame().unwrap();
        assert!((frame.time - 500.0).abs() < EPS);
    }

    #[test]
    fn test_reaching_end_stops() {
        let (mut engine, clock, flag) = engine();
        two_keyframes(&mut engine);
        engine.play();
        clock.advance(1500.0);

        let frame = engine.on_frame().unwrap();
        assert!(frame.finished);
        assert!((frame.time - 1000.0).abs() < EPS);
        assert!((frame.positions["p"].x - 100.0).abs() < EPS);
        assert_eq!(engine.state(), PlaybackState::Stopped);
        assert!(engine.current_time().abs() < EPS);
        assert!(!flag.is_pending());
    }

    #[test]
    fn test_events_fire_once_when_crossed() {
        let (mut engine, clock, _flag) = engine();
        two_keyframes(&mut engine);
        engine.play();
        clock.advance(600.0);
        assert!(engine.on_frame().unwrap().events.is_empty());
        clock.advance(600.0);
        let frame = engine.on_frame().unwrap();
        assert_eq!(frame.events, vec![KeyframeEvent::new("shot")]);
    }

    #[test]
    fn test_seek_while_stopped() {
        let (mut engine, _clock, _flag) = engine();
        two_keyframes(&mut engine);
        engine.seek_to(750.0);
        assert!((engine.positions()["p"].x - 75.0).abs() < EPS);
        assert_eq!(engine.state(), PlaybackState::Stopped);

        engine.seek_to_progress(2.0);
        assert!((engine.current_time() - 1000.0).abs() < EPS);
        assert!((engine.progress() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_seek_while_paused_then_resume() {
        let (mut engine, clock, _flag) = engine();
        two_keyframes(&mut engine);
        engine.play();
        clock.advance(100.0);
        engine.on_frame();
        engine.pause();
        clock.advance(300.0);

        engine.seek_to(800.0);
        clock.advance(50.0);
        engine.play();
        clock.advance(100.0);
        let frame = engine.on_frame().unwrap();
        assert!((frame.time - 900.0).abs() < EPS);
    }

    #[test]
    fn test_seek_while_playing() {
        let (mut engine, clock, _flag) = engine();
        two_keyframes(&mut engine);
        engine.play();
        clock.advance(100.0);
        engine.seek_to(400.0);
        clock.advance(100.0);
        assert!((engine.on_frame().unwrap().time - 500.0).abs() < EPS);
    }

    #[test]
    fn test_play_from_stopped_restarts() {
        let (mut engine, clock, _flag) = engine();
        two_keyframes(&mut engine);
        engine.seek_to(600.0);
        engine.play();
        assert!(engine.current_time().abs() < EPS);
        clock.advance(10.0);
        assert!((engine.on_frame().unwrap().time - 10.0).abs() < EPS);
    }

    #[test]
    fn test_capture_from_board() {
        let mut board = Board::new();
        let player = board.add_player(PlayerOptions {
            position: Some(Point::new(100.0, 100.0)),
            ..Default::default()
        });
        let screen = board.add_screen(Some(Point::new(10.0, 10.0)));
        board.set_rotation(&screen, 45.0);
        board.add_arrow(None);

        let (mut engine, _clock, _flag) = engine();
        engine.seed_from_board(&board);
        let poses = &engine.keyframes()[0].elements;
        assert_eq!(poses.len(), 2);
        assert_eq!(poses[&player], Pose::new(100.0, 100.0));
        assert_eq!(poses[&screen].rotation, Some(45.0));

        board.update_element_position(&player, 300.0, 100.0);
        engine.capture_keyframe(1000.0, &board, Easing::Linear);
        engine.seek_to(500.0);
        assert!((engine.positions()[&player].x - 200.0).abs() < EPS);

        engine.seed_from_board(&board);
        assert_eq!(engine.keyframes().len(), 2);
    }

    #[test]
    fn test_empty_timeline_uses_default_duration() {
        let (mut engine, _clock, _flag) = engine();
        assert!((engine.duration() - DEFAULT_ANIMATION_DURATION_MS).abs() < EPS);
        engine.set_default_duration(2000.0);
        assert!((engine.duration() - 2000.0).abs() < EPS);
    }

    #[test]
    fn test_clear_keyframes_stops() {
        let (mut engine, _clock, flag) = engine();
        two_keyframes(&mut engine);
        engine.play();
        engine.clear_keyframes();
        assert_eq!(engine.state(), PlaybackState::Stopped);
        assert!(engine.keyframes().is_empty());
        assert!(!flag.is_pending());
    }
}

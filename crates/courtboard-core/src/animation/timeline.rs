//! Time-sorted keyframes and interpolation between them.

use std::collections::BTreeMap;

use super::{Easing, Keyframe, Pose};
use crate::config::DEFAULT_ANIMATION_DURATION_MS;
use crate::elements::ElementId;

/// Ordered keyframes.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    keyframes: Vec<Keyframe>,
    /// Duration reported while there are no keyframes.
    default_duration: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::with_default_duration(DEFAULT_ANIMATION_DURATION_MS)
    }

    pub fn with_default_duration(default_duration: f64) -> Self {
        Self {
            keyframes: Vec::new(),
            default_duration,
        }
    }

    /// Build from keyframes in any order. Equal times keep their input
    /// order.
    pub fn from_keyframes(mut keyframes: Vec<Keyframe>, default_duration: f64) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            keyframes,
            default_duration,
        }
    }

    pub fn default_duration(&self) -> f64 {
        self.default_duration
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Time of the last keyframe, or the default duration when empty.
    pub fn duration(&self) -> f64 {
        self.keyframes
            .last()
            .map_or(self.default_duration, |keyframe| keyframe.time)
    }

    /// Insert a keyframe in time order, returning its index.
    ///
    /// A keyframe with the same time as existing ones goes after them.
    pub fn add_keyframe(&mut self, keyframe: Keyframe) -> usize {
        let index = self.keyframes.partition_point(|k| k.time <= keyframe.time);
        self.keyframes.insert(index, keyframe);
        index
    }

    pub fn remove_keyframe(&mut self, index: usize) -> Option<Keyframe> {
        (index < self.keyframes.len()).then(|| self.keyframes.remove(index))
    }

    /// Remove every keyframe at exactly `time`.
    pub fn remove_at_time(&mut self, time: f64) -> usize {
        let before = self.keyframes.len();
        self.keyframes.retain(|k| k.time != time);
        before - self.keyframes.len()
    }

    pub fn update_keyframe_easing(&mut self, index: usize, easing: Easing) -> bool {
        match self.keyframes.get_mut(index) {
            Some(keyframe) => {
                keyframe.easing = easing;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Latest keyframe at or before `time` and earliest at or after it.
    fn bracket(&self, time: f64) -> Option<(&Keyframe, &Keyframe)> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        let at_or_before = self.keyframes.partition_point(|k| k.time <= time);
        let at_or_after = self.keyframes.partition_point(|k| k.time < time);
        let before = at_or_before.checked_sub(1).map_or(first, |i| &self.keyframes[i]);
        let after = self.keyframes.get(at_or_after).unwrap_or(last);
        Some((before, after))
    }

    /// Element poses at `time`.
    ///
    /// On a keyframe (or outside the timeline) the nearest keyframe's poses
    /// are returned verbatim. Between two keyframes, elements present in
    /// both are blended with the later keyframe's easing; elements only in
    /// the earlier one keep their pose.
    pub fn interpolate(&self, time: f64) -> BTreeMap<ElementId, Pose> {
        let Some((before, after)) = self.bracket(time) else {
            return BTreeMap::new();
        };
        let span = after.time - before.time;
        if std::ptr::eq(before, after) || span <= 0.0 {
            return before.elements.clone();
        }

        let t = after.easing.apply((time - before.time) / span);
        before
            .elements
            .iter()
            .map(|(id, from)| {
                let pose = match after.elements.get(id) {
                    Some(to) => from.lerp(to, t),
                    None => *from,
                };
                (id.clone(), pose)
            })
            .collect()
    }

    /// Keyframes with `from < time <= to`, or `time <= to` when `from` is
    /// `None`.
    pub fn keyframes_crossed(
        &self,
        from: Option<f64>,
        to: f64,
    ) -> impl Iterator<Item = &Keyframe> + '_ {
        self.keyframes
            .iter()
            .filter(move |k| k.time <= to && from.is_none_or(|from| k.time > from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn keyframe(time: f64, poses: &[(&str, f64, f64)]) -> Keyframe {
        Keyframe::new(
            time,
            poses
                .iter()
                .map(|(id, x, y)| (id.to_string(), Pose::new(*x, *y)))
                .collect(),
        )
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut timeline = Timeline::new();
        timeline.add_keyframe(keyframe(1000.0, &[]));
        timeline.add_keyframe(keyframe(0.0, &[]));
        assert_eq!(timeline.add_keyframe(keyframe(500.0, &[])), 1);
        let times: Vec<f64> = timeline.keyframes().iter().map(|k| k.time).collect();
        assert_eq!(times, [0.0, 500.0, 1000.0]);
        assert!((timeline.duration() - 1000.0).abs() < EPS);
    }

    #[test]
    fn test_empty_duration_falls_back() {
        let timeline = Timeline::with_default_duration(3000.0);
        assert!((timeline.duration() - 3000.0).abs() < EPS);
        assert!(timeline.interpolate(100.0).is_empty());
    }

    #[test]
    fn test_linear_midpoint() {
        let mut timeline = Timeline::new();
        timeline.add_keyframe(keyframe(0.0, &[("p", 100.0, 100.0)]));
        timeline.add_keyframe(keyframe(1000.0, &[("p", 300.0, 100.0)]));
        let poses = timeline.interpolate(500.0);
        assert!((poses["p"].x - 200.0).abs() < EPS);
        assert!((poses["p"].y - 100.0).abs() < EPS);
    }

    #[test]
    fn test_uses_target_keyframe_easing() {
        let mut timeline = Timeline::new();
        let mut first = keyframe(0.0, &[("p", 0.0, 0.0)]);
        first.easing = Easing::EaseOutCubic;
        timeline.add_keyframe(first);
        let mut second = keyframe(100.0, &[("p", 100.0, 0.0)]);
        second.easing = Easing::EaseInQuad;
        timeline.add_keyframe(second);
        assert!((timeline.interpolate(50.0)["p"].x - 25.0).abs() < EPS);
    }

    #[test]
    fn test_exact_hits_are_verbatim() {
        let mut timeline = Timeline::new();
        for (i, easing) in Easing::ALL.into_iter().enumerate() {
            let mut k = keyframe(i as f64 * 250.0, &[("p", i as f64 * 7.3, 1.0 / 3.0)]);
            k.easing = easing;
            timeline.add_keyframe(k);
        }
        for k in timeline.keyframes() {
            assert_eq!(timeline.interpolate(k.time), k.elements);
        }
    }

    #[test]
    fn test_missing_elements() {
        let mut timeline = Timeline::new();
        timeline.add_keyframe(keyframe(0.0, &[("a", 0.0, 0.0), ("b", 5.0, 5.0)]));
        timeline.add_keyframe(keyframe(100.0, &[("a", 10.0, 0.0), ("c", 9.0, 9.0)]));
        let poses = timeline.interpolate(50.0);
        assert_eq!(poses["b"], Pose::new(5.0, 5.0));
        assert!(!poses.contains_key("c"));
    }

    #[test]
    fn test_outside_range_clamps() {
        let mut timeline = Timeline::new();
        timeline.add_keyframe(keyframe(100.0, &[("a", 1.0, 1.0)]));
        timeline.add_keyframe(keyframe(200.0, &[("a", 2.0, 2.0)]));
        assert_eq!(timeline.interpolate(0.0)["a"], Pose::new(1.0, 1.0));
        assert_eq!(timeline.interpolate(999.0)["a"], Pose::new(2.0, 2.0));
    }

    #[test]
    fn test_remove_and_update() {
        let mut timeline = Timeline::new();
        timeline.add_keyframe(keyframe(0.0, &[]));
        timeline.add_keyframe(keyframe(10.0, &[]));
        assert!(timeline.update_keyframe_easing(1, Easing::EaseInSine));
        assert!(!timeline.update_keyframe_easing(5, Easing::EaseInSine));
        assert_eq!(timeline.remove_keyframe(1).map(|k| k.easing), Some(Easing::EaseInSine));
        assert!(timeline.remove_keyframe(1).is_none());
        assert_eq!(timeline.remove_at_time(0.0), 1);
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_keyframes_crossed() {
        let mut timeline = Timeline::new();
        for time in [0.0, 100.0, 200.0] {
            timeline.add_keyframe(keyframe(time, &[]));
        }
        assert_eq!(timeline.keyframes_crossed(None, 50.0).count(), 1);
        assert_eq!(timeline.keyframes_crossed(Some(0.0), 200.0).count(), 2);
        assert_eq!(timeline.keyframes_crossed(Some(100.0), 150.0).count(), 0);
    }
}

//! Easing functions, resolved by name.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Maps linear progress in `[0, 1]` onto eased progress.
///
/// Every variant satisfies `apply(0) == 0` and `apply(1) == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
}

impl Easing {
    /// All registered easings.
    pub const ALL: [Easing; 10] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
    ];

    /// Canonical name used in saved data.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseInSine => "easeInSine",
            Easing::EaseOutSine => "easeOutSine",
            Easing::EaseInOutSine => "easeInOutSine",
        }
    }

    /// Look up an easing by name. `easeIn`, `easeOut` and `easeInOut` are
    /// accepted as the quadratic variants.
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "easeIn" => return Some(Easing::EaseInQuad),
            "easeOut" => return Some(Easing::EaseOutQuad),
            "easeInOut" => return Some(Easing::EaseInOutQuad),
            _ => {}
        }
        Self::ALL.into_iter().find(|easing| easing.name() == name)
    }

    /// Resolve a name, falling back to linear for unknown names.
    pub fn from_name(name: &str) -> Self {
        Self::lookup(name).unwrap_or_else(|| {
            log::warn!("Unknown easing '{}', using linear", name);
            Easing::Linear
        })
    }

    /// Apply the easing to progress `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

impl From<String> for Easing {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.name().to_string()
    }
}

impl std::fmt::Display for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in Easing::ALL {
            assert!(easing.apply(0.0).abs() < EPS, "{} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < EPS, "{} at 1", easing);
        }
    }

    #[test]
    fn test_monotonic() {
        for easing in Easing::ALL {
            let mut prev = 0.0;
            for step in 1..=100 {
                let value = easing.apply(step as f64 / 100.0);
                assert!(value >= prev - EPS, "{} not monotonic", easing);
                prev = value;
            }
        }
    }

    #[test]
    fn test_unknown_name_falls_back_to_linear() {
        assert_eq!(Easing::from_name("bounceOutElastic"), Easing::Linear);
        let easing: Easing = serde_json::from_str("\"wobble\"").unwrap();
        assert_eq!(easing, Easing::Linear);
    }

    #[test]
    fn test_aliases_and_names() {
        assert_eq!(Easing::from_name("easeInOut"), Easing::EaseInOutQuad);
        for easing in Easing::ALL {
            assert_eq!(Easing::lookup(easing.name()), Some(easing));
        }
        assert_eq!(serde_json::to_string(&Easing::EaseOutCubic).unwrap(), "\"easeOutCubic\"");
    }

    #[test]
    fn test_midpoints() {
        assert!((Easing::Linear.apply(0.5) - 0.5).abs() < EPS);
        assert!((Easing::EaseInQuad.apply(0.5) - 0.25).abs() < EPS);
        assert!((Easing::EaseInOutCubic.apply(0.5) - 0.5).abs() < EPS);
    }
}

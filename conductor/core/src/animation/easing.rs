//! Easing curves

/// Easing function applied to normalised progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EasingFunction {
    /// No easing
    #[default]
    Linear,
    /// Quadratic ease-in-out (breathing)
    EaseInOutQuad,
    /// Quintic ease-in-out (colour transitions)
    EaseInOutQuint,
}

impl EasingFunction {
    /// Map progress in `[0, 1]` to eased progress in `[0, 1]`
    ///
    /// Input outside the range is clamped. Both endpoints are exact.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 3] = [
        EasingFunction::Linear,
        EasingFunction::EaseInOutQuad,
        EasingFunction::EaseInOutQuint,
    ];

    #[test]
    fn test_endpoints_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for step in 0..=1000 {
                let v = easing.apply(step as f32 / 1000.0);
                assert!(v >= prev, "{easing:?} decreased at step {step}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_midpoint_symmetry() {
        assert!((EasingFunction::EaseInOutQuad.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((EasingFunction::EaseInOutQuint.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((EasingFunction::EaseInOutQuint.apply(0.25) - 16.0 * 0.25f32.powi(5)).abs() < 1e-6);
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(EasingFunction::EaseInOutQuint.apply(-3.0), 0.0);
        assert_eq!(EasingFunction::EaseInOutQuad.apply(7.0), 1.0);
    }
}

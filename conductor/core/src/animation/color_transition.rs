//! Colour Transition Controller
//!
//! Moves the surface from one palette to another over a fixed duration with
//! quintic ease-in-out. The Surface Model blends `current_colors` toward
//! `target_colors` by `color_mix_ratio`, so a transition only has to drive
//! that ratio from 0 to 1.
//!
//! # Supersession
//!
//! A transition that starts while another is running takes over from the
//! colour the viewer is actually seeing: `current_colors` becomes the blend at
//! the interrupted ratio, so there is no visible jump.

use std::time::Duration;

use super::EasingFunction;
use crate::color::{derive_palette, Rgb};
use crate::surface::SurfaceParameters;

/// A running transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionState {
    /// Logical start time
    pub start: Duration,
    /// Total length
    pub duration: Duration,
}

impl TransitionState {
    /// Linear progress in `[0, 1]` at `now`
    #[must_use]
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).min(1.0) as f32
    }
}

/// Drives `color_mix_ratio` through transitions
#[derive(Clone, Debug)]
pub struct ColorTransitionController {
    duration: Duration,
    easing: EasingFunction,
    active: Option<TransitionState>,
}

impl ColorTransitionController {
    /// Create an idle controller
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            easing: EasingFunction::EaseInOutQuint,
            active: None,
        }
    }

    /// Running transition, if any
    #[must_use]
    pub fn state(&self) -> Option<TransitionState> {
        self.active
    }

    /// Whether a transition is running
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start a transition toward the palette derived from `base`
    pub fn begin(&mut self, now: Duration, base: Rgb, params: &mut SurfaceParameters) {
        if let Some(previous) = self.active {
            tracing::debug!(
                ratio = params.color_mix_ratio,
                started = ?previous.start,
                "Superseding colour transition"
            );
        }

        params.current_colors = params.blended_palette();
        params.target_colors = derive_palette(base);
        params.color_mix_ratio = 0.0;
        self.active = Some(TransitionState {
            start: now,
            duration: self.duration,
        });
        tracing::info!(color = %base, "Colour transition started");
    }

    /// Update the mix ratio for `now`
    ///
    /// Returns `true` while the transition is still running. The final
    /// update writes exactly `1.0`.
    pub fn tick(&mut self, now: Duration, params: &mut SurfaceParameters) -> bool {
        let Some(state) = self.active else {
            return false;
        };

        let progress = state.progress(now);
        if progress >= 1.0 {
            params.color_mix_ratio = 1.0;
            self.active = None;
            tracing::debug!("Colour transition complete");
            return false;
        }

        params.color_mix_ratio = self.easing.apply(progress);
        true
    }

    /// Abandon any running transition, leaving the ratio as is
    pub fn halt(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::lerp_palette;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn blue() -> Rgb {
        Rgb::parse_hex("#4A90E2").unwrap()
    }

    #[test]
    fn test_begin_resets_ratio_and_targets() {
        let mut params = SurfaceParameters::default();
        let start_palette = params.current_colors;
        let mut ctl = ColorTransitionController::new(ms(10_000));

        ctl.begin(ms(500), blue(), &mut params);

        assert_eq!(params.color_mix_ratio, 0.0);
        assert_eq!(params.current_colors, start_palette);
        assert_eq!(params.target_colors, derive_palette(blue()));
        assert_eq!(
            ctl.state(),
            Some(TransitionState {
                start: ms(500),
                duration: ms(10_000)
            })
        );
    }

    #[test]
    fn test_ratio_is_monotonic_and_ends_at_one() {
        let mut params = SurfaceParameters::default();
        let mut ctl = ColorTransitionController::new(ms(10_000));
        ctl.begin(ms(0), blue(), &mut params);

        let mut prev = 0.0;
        for t in (0..=10_500).step_by(50) {
            ctl.tick(ms(t), &mut params);
            assert!(params.color_mix_ratio >= prev);
            prev = params.color_mix_ratio;
        }
        assert_eq!(params.color_mix_ratio, 1.0);
        assert!(!ctl.is_active());
        assert_eq!(params.blended_palette(), derive_palette(blue()));
    }

    #[test]
    fn test_completes_exactly_at_duration() {
        let mut params = SurfaceParameters::default();
        let mut ctl = ColorTransitionController::new(ms(10_000));
        ctl.begin(ms(1_000), blue(), &mut params);

        assert!(ctl.tick(ms(10_500), &mut params));
        assert!(params.color_mix_ratio < 1.0);
        assert!(ctl.tick(ms(10_999), &mut params));
        assert!(!ctl.tick(ms(11_000), &mut params));
        assert_eq!(params.color_mix_ratio, 1.0);
    }

    #[test]
    fn test_supersede_starts_from_visible_blend() {
        let mut params = SurfaceParameters::default();
        let mut ctl = ColorTransitionController::new(ms(10_000));
        let red = Rgb::parse_hex("#aa2222").unwrap();
        ctl.begin(ms(0), red, &mut params);
        ctl.tick(ms(5_220), &mut params);

        let ratio = params.color_mix_ratio;
        assert!((ratio - 0.6).abs() < 0.01, "ratio {ratio}");
        let visible = lerp_palette(&params.current_colors, &params.target_colors, ratio);

        ctl.begin(ms(5_220), blue(), &mut params);

        assert_eq!(params.color_mix_ratio, 0.0);
        assert_eq!(params.current_colors, visible);
        assert_eq!(params.target_colors, derive_palette(blue()));
        assert_eq!(ctl.state().map(|s| s.start), Some(ms(5_220)));
    }

    #[test]
    fn test_tick_without_transition_is_noop() {
        let mut params = SurfaceParameters::default();
        params.color_mix_ratio = 0.25;
        let mut ctl = ColorTransitionController::new(ms(10_000));
        assert!(!ctl.tick(ms(99), &mut params));
        assert_eq!(params.color_mix_ratio, 0.25);
    }

    #[test]
    fn test_zero_duration_completes_on_first_tick() {
        let mut params = SurfaceParameters::default();
        let mut ctl = ColorTransitionController::new(Duration::ZERO);
        ctl.begin(ms(3), blue(), &mut params);
        assert!(!ctl.tick(ms(3), &mut params));
        assert_eq!(params.color_mix_ratio, 1.0);
    }
}

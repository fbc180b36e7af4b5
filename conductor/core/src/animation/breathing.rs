//! Breathing Animator
//!
//! A breath is a short pulse of the surface scale: ease up from the base
//! scale by `delta`, then ease back down. Each half lasts `duration` and is
//! sampled at `fps`, so a 400 ms half at 60 fps takes 24 steps.
//!
//! # Rate Limiting
//!
//! At most one breath runs at a time. A new breath may only start once
//! `2 * duration` has passed since the previous trigger, even if the previous
//! breath already finished. Triggers that arrive too early are dropped, not
//! queued.
//!
//! The animator never sleeps. Callers invoke [`BreathingAnimator::step`]
//! once per [`BreathingAnimator::frame_interval`].

use std::time::Duration;

use super::EasingFunction;
use crate::config::BreathingConfig;

/// Rate-limit state shared by every trigger source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BreathingState {
    /// A breath is in progress
    pub active: bool,
    /// Logical time of the last accepted trigger
    pub last_trigger: Option<Duration>,
}

/// Result of [`BreathingAnimator::trigger`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A new breath started; schedule steps
    Started,
    /// A breath is already running
    AlreadyActive,
    /// The previous trigger was too recent
    CoolingDown,
}

/// Result of one [`BreathingAnimator::step`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreathStep {
    /// More steps follow
    Continue,
    /// The breath is over and the scale is back at base
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Inhale,
    Exhale,
}

/// Drives `SurfaceParameters::scale` through breaths
#[derive(Clone, Debug)]
pub struct BreathingAnimator {
    base_scale: f32,
    delta: f32,
    duration: Duration,
    fps: u32,
    state: BreathingState,
    phase: Phase,
    frame: u32,
}

impl BreathingAnimator {
    /// Create an idle animator
    #[must_use]
    pub fn new(config: &BreathingConfig) -> Self {
        Self {
            base_scale: config.base_scale,
            delta: config.delta,
            duration: config.duration(),
            fps: config.fps.max(1),
            state: BreathingState::default(),
            phase: Phase::Idle,
            frame: 0,
        }
    }

    /// Current rate-limit state
    #[must_use]
    pub fn state(&self) -> BreathingState {
        self.state
    }

    /// Whether a breath is running
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Resting scale
    #[must_use]
    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    /// Minimum spacing between accepted triggers
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.duration * 2
    }

    /// Time between steps
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps))
    }

    /// Steps per half breath (at least one)
    #[must_use]
    pub fn frames_per_half(&self) -> u32 {
        let frames = (f64::from(self.fps) * self.duration.as_secs_f64()).round();
        (frames as u32).max(1)
    }

    /// Whether a trigger at `now` would pass the cooldown check
    #[must_use]
    pub fn is_cooled_down(&self, now: Duration) -> bool {
        self.state
            .last_trigger
            .map_or(true, |last| now.saturating_sub(last) >= self.cooldown())
    }

    /// Try to start a breath at logical time `now`
    pub fn trigger(&mut self, now: Duration) -> TriggerOutcome {
        if self.state.active {
            tracing::trace!(?now, "Breath dropped: already breathing");
            return TriggerOutcome::AlreadyActive;
        }
        if !self.is_cooled_down(now) {
            tracing::trace!(?now, "Breath dropped: cooling down");
            return TriggerOutcome::CoolingDown;
        }

        self.state = BreathingState {
            active: true,
            last_trigger: Some(now),
        };
        self.phase = Phase::Inhale;
        self.frame = 0;
        tracing::debug!(?now, "Breath started");
        TriggerOutcome::Started
    }

    /// Advance one step, writing the new scale
    ///
    /// The last step of each half writes the half's end value exactly, so a
    /// finished breath leaves `scale == base_scale` with no drift.
    pub fn step(&mut self, scale: &mut f32) -> BreathStep {
        let peak = self.base_scale + self.delta;
        let (from, to) = match self.phase {
            Phase::Idle => return BreathStep::Finished,
            Phase::Inhale => (self.base_scale, peak),
            Phase::Exhale => (peak, self.base_scale),
        };

        let frames = self.frames_per_half();
        self.frame += 1;

        if self.frame < frames {
            let eased = EasingFunction::EaseInOutQuad.apply(self.frame as f32 / frames as f32);
            *scale = from + (to - from) * eased;
            return BreathStep::Continue;
        }

        *scale = to;
        self.frame = 0;
        match self.phase {
            Phase::Inhale => {
                self.phase = Phase::Exhale;
                BreathStep::Continue
            }
            _ => {
                self.phase = Phase::Idle;
                self.state.active = false;
                BreathStep::Finished
            }
        }
    }

    /// Stop immediately; the scale is left where it is
    pub fn halt(&mut self) {
        self.phase = Phase::Idle;
        self.frame = 0;
        self.state.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn animator() -> BreathingAnimator {
        BreathingAnimator::new(&BreathingConfig::default())
    }

    fn run_to_end(animator: &mut BreathingAnimator, scale: &mut f32) -> Vec<f32> {
        let mut trace = Vec::new();
        while animator.step(scale) == BreathStep::Continue {
            trace.push(*scale);
        }
        trace.push(*scale);
        trace
    }

    #[test]
    fn test_frame_math() {
        let a = animator();
        assert_eq!(a.frames_per_half(), 24);
        assert_eq!(a.cooldown(), Duration::from_millis(800));
        assert!((a.frame_interval().as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_breath_returns_exactly_to_base() {
        let mut a = animator();
        let mut scale = 1.0;
        assert_eq!(a.trigger(Duration::ZERO), TriggerOutcome::Started);

        let trace = run_to_end(&mut a, &mut scale);

        assert_eq!(trace.len(), 48);
        assert!((trace[23] - 1.05).abs() < 1e-6);
        assert!(trace.iter().all(|s| (1.0 - 1e-6..=1.05 + 1e-6).contains(s)));
        assert_eq!(scale, 1.0);
        assert!(!a.is_active());
    }

    #[test]
    fn test_inhale_rises_then_exhale_falls() {
        let mut a = animator();
        let mut scale = 1.0;
        a.trigger(Duration::ZERO);
        let trace = run_to_end(&mut a, &mut scale);

        assert!(trace[..24].windows(2).all(|w| w[1] >= w[0]));
        assert!(trace[24..].windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_trigger_while_active_is_dropped() {
        let mut a = animator();
        let t1 = Duration::from_millis(100);
        assert_eq!(a.trigger(t1), TriggerOutcome::Started);
        assert_eq!(
            a.trigger(Duration::from_secs(5)),
            TriggerOutcome::AlreadyActive
        );
        assert_eq!(a.state().last_trigger, Some(t1));
    }

    #[test]
    fn test_cooldown_after_finish() {
        let mut a = animator();
        let mut scale = 1.0;
        a.trigger(Duration::ZERO);
        run_to_end(&mut a, &mut scale);

        assert_eq!(
            a.trigger(Duration::from_millis(799)),
            TriggerOutcome::CoolingDown
        );
        assert_eq!(
            a.trigger(Duration::from_millis(800)),
            TriggerOutcome::Started
        );
    }

    #[test]
    fn test_halt_clears_active() {
        let mut a = animator();
        let mut scale = 1.0;
        a.trigger(Duration::ZERO);
        a.step(&mut scale);
        a.halt();
        assert!(!a.is_active());
        assert_eq!(a.step(&mut scale), BreathStep::Finished);
    }

    #[test]
    fn test_step_when_idle_is_noop() {
        let mut a = animator();
        let mut scale = 1.0;
        assert_eq!(a.step(&mut scale), BreathStep::Finished);
        assert_eq!(scale, 1.0);
    }
}

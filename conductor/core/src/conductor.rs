//! Conductor - The Engine Core
//!
//! The Conductor wires the engine together. It owns:
//! - The render loop (clock, surface parameters, raster)
//! - The message store
//! - The three animators
//! - The scheduler every animator step goes through
//!
//! # Design Philosophy
//!
//! The Conductor is UI-agnostic and never sleeps. A surface calls
//! [`Conductor::tick`] once per display frame; each tick advances the clock,
//! runs every job that has come due, updates the colour transition, and
//! presents a frame. Tests drive [`Conductor::tick_at`] with explicit clock
//! readings instead.
//!
//! # Tick Order
//!
//! ```text
//! tick_at(t)
//!   1. clock.advance_to(t)
//!   2. drain jobs due <= t      (reveal steps, breath steps, colour starts)
//!   3. colour transition tick   (mix ratio at t)
//!   4. present frame
//! ```
//!
//! Jobs reschedule relative to their own due time, so cadence does not drift
//! with frame jitter.

use std::collections::HashMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{
    is_breath_boundary, BreathStep, BreathingAnimator, BreathingState, ColorTransitionController,
    TransitionState, TriggerOutcome, TypingAnimator,
};
use crate::color::Rgb;
use crate::config::EngineConfig;
use crate::events::{ColorRequest, InboundTurn};
use crate::messages::{MessageStore, Turn};
use crate::render::{FrameBuffer, LoopState, RenderLoop};
use crate::scheduler::Scheduler;
use crate::surface::SurfaceParameters;

/// Deferred work
#[derive(Clone, Debug, PartialEq)]
enum Job {
    /// Reveal the next prefix of an agent turn
    Reveal { turn: usize },
    /// Advance the running breath
    Breathe,
    /// Start a colour transition
    BeginColor { color: Rgb },
}

/// The engine
pub struct Conductor<R: Rng = StdRng> {
    /// Configuration
    config: EngineConfig,
    /// Clock, parameters and raster
    render: RenderLoop,
    /// Pending timed jobs
    scheduler: Scheduler<Job>,
    /// Conversation history
    store: MessageStore,
    /// One animator per turn still being revealed
    typing: HashMap<usize, TypingAnimator>,
    /// Colours waiting for their turn's reveal to finish
    pending_colors: HashMap<usize, Rgb>,
    /// Engine-wide breathing state
    breathing: BreathingAnimator,
    /// Palette transitions
    color: ColorTransitionController,
    /// Source of typing delays
    rng: R,
}

impl Conductor<StdRng> {
    /// Create a Conductor with an entropy-seeded RNG
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> Conductor<R> {
    /// Create a Conductor with a caller-supplied RNG
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        Self {
            render: RenderLoop::new(&config),
            scheduler: Scheduler::new(),
            store: MessageStore::new(),
            typing: HashMap::new(),
            pending_colors: HashMap::new(),
            breathing: BreathingAnimator::new(&config.breathing),
            color: ColorTransitionController::new(config.color.transition()),
            rng,
            config,
        }
    }

    /// Allocate the raster and start producing frames
    pub fn start(&mut self, width: u32, height: u32) -> bool {
        self.render.start(width, height)
    }

    /// Stop everything; safe to call more than once
    ///
    /// Pending reveal, breath and colour jobs are dropped. The message store
    /// stays readable.
    pub fn dispose(&mut self) -> bool {
        if !self.render.dispose() {
            tracing::debug!("Dispose called on an already disposed engine");
            return false;
        }
        let dropped = self.scheduler.len();
        self.scheduler.clear();
        self.typing.clear();
        self.pending_colors.clear();
        self.breathing.halt();
        self.color.halt();
        tracing::info!(dropped_jobs = dropped, "Engine disposed");
        true
    }

    /// Forward a surface resize
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.render.resize(width, height)
    }

    /// Whether frames are being produced
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.render.is_running()
    }

    /// Render loop lifecycle state
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.render.state()
    }

    /// Current logical time
    #[must_use]
    pub fn now(&self) -> Duration {
        self.render.clock().now()
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Conversation turns in order
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        self.store.turns()
    }

    /// Message store
    #[must_use]
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Surface parameters
    #[must_use]
    pub fn parameters(&self) -> &SurfaceParameters {
        self.render.parameters()
    }

    /// Breathing rate-limit state
    #[must_use]
    pub fn breathing_state(&self) -> BreathingState {
        self.breathing.state()
    }

    /// Running colour transition
    #[must_use]
    pub fn color_transition(&self) -> Option<TransitionState> {
        self.color.state()
    }

    /// Number of scheduled jobs
    #[must_use]
    pub fn pending_jobs(&self) -> usize {
        self.scheduler.len()
    }

    /// Whether any turn is still being revealed
    #[must_use]
    pub fn is_typing(&self) -> bool {
        !self.typing.is_empty()
    }

    /// Last frame presented
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        self.render.frame()
    }

    /// Append a user turn
    ///
    /// Blank input and input after dispose are ignored.
    pub fn push_user_turn(&mut self, text: &str) -> Option<usize> {
        if self.is_disposed() {
            tracing::warn!("User turn after dispose ignored");
            return None;
        }
        if text.trim().is_empty() {
            return None;
        }
        let index = self.store.push_user(text);
        tracing::debug!(index, "User turn added");
        Some(index)
    }

    /// Append an agent turn and start revealing it
    pub fn push_agent_turn(&mut self, text: &str) -> Option<usize> {
        if self.is_disposed() {
            tracing::warn!("Agent turn after dispose ignored");
            return None;
        }
        let index = self.store.push_agent(text);
        self.start_typing(index, text);
        Some(index)
    }

    /// Apply an inbound turn
    ///
    /// Non-empty text becomes an agent turn and starts revealing. A valid
    /// colour directive starts a transition once that reveal has finished
    /// (or right away when there is no text) plus the configured delay.
    /// Returns the index of the created turn.
    pub fn handle_inbound(&mut self, event: InboundTurn) -> Option<usize> {
        if self.is_disposed() {
            tracing::warn!("Inbound turn after dispose ignored");
            return None;
        }

        let color = match event.color_request() {
            ColorRequest::Valid(color) => Some(color),
            ColorRequest::None => None,
            ColorRequest::Ignored { action } => {
                tracing::debug!(%action, "Ignoring scene update");
                None
            }
            ColorRequest::Malformed { value, error } => {
                tracing::warn!(%value, %error, "Ignoring malformed colour");
                None
            }
        };

        let Some(text) = event.visible_text() else {
            if let Some(color) = color {
                self.schedule_color(self.now(), color);
            }
            return None;
        };

        let index = self.store.push_agent(text);
        if let Some(color) = color {
            self.pending_colors.insert(index, color);
        }
        self.start_typing(index, text);
        Some(index)
    }

    /// Advance to wall-clock time and present a frame
    ///
    /// Returns `None` once disposed.
    pub fn tick(&mut self) -> Option<&FrameBuffer> {
        let elapsed = self.render.real_elapsed();
        self.tick_at(elapsed)
    }

    /// Advance to `elapsed` since start and present a frame
    ///
    /// Returns `None` unless running.
    pub fn tick_at(&mut self, elapsed: Duration) -> Option<&FrameBuffer> {
        if !self.render.is_running() {
            if self.is_disposed() {
                tracing::error!("Tick after dispose");
            }
            return None;
        }

        self.render.advance_clock_to(elapsed);
        let now = self.now();

        while let Some((due, job)) = self.scheduler.pop_due(now) {
            self.run_job(due, job);
        }
        self.color.tick(now, self.render.parameters_mut());

        Some(self.render.present())
    }

    fn is_disposed(&self) -> bool {
        self.render.state() == LoopState::Disposed
    }

    fn start_typing(&mut self, turn: usize, text: &str) {
        let now = self.now();
        let mut animator = TypingAnimator::new(turn, text, self.config.typing.speed());
        if animator.start(&mut self.store) {
            let delay = animator.next_delay(&mut self.rng);
            self.scheduler
                .schedule_after(now, delay, Job::Reveal { turn });
            self.typing.insert(turn, animator);
            tracing::debug!(turn, chars = text.chars().count(), "Typing started");
        } else {
            self.finish_typing(turn, now);
        }
    }

    fn finish_typing(&mut self, turn: usize, at: Duration) {
        self.typing.remove(&turn);
        if let Some(color) = self.pending_colors.remove(&turn) {
            self.schedule_color(at, color);
        }
        tracing::debug!(turn, "Typing finished");
    }

    fn schedule_color(&mut self, at: Duration, color: Rgb) {
        let delay = self.config.color.delay_after_typing();
        self.scheduler
            .schedule_after(at, delay, Job::BeginColor { color });
        tracing::debug!(%color, due = ?(at + delay), "Colour transition scheduled");
    }

    fn run_job(&mut self, due: Duration, job: Job) {
        match job {
            Job::Reveal { turn } => self.reveal_next(turn, due),
            Job::Breathe => {
                let scale = &mut self.render.parameters_mut().scale;
                if self.breathing.step(scale) == BreathStep::Continue && self.render.is_running()
                {
                    self.scheduler
                        .schedule_after(due, self.breathing.frame_interval(), Job::Breathe);
                }
            }
            Job::BeginColor { color } => {
                self.color.begin(due, color, self.render.parameters_mut());
            }
        }
    }

    fn reveal_next(&mut self, turn: usize, due: Duration) {
        let Some(animator) = self.typing.get_mut(&turn) else {
            return;
        };
        let Some(step) = animator.advance(&mut self.store) else {
            return;
        };
        let next_delay = (!step.finished).then(|| animator.next_delay(&mut self.rng));

        if step.revealed_char.is_some_and(is_breath_boundary)
            && self.breathing.trigger(due) == TriggerOutcome::Started
        {
            self.scheduler
                .schedule_after(due, self.breathing.frame_interval(), Job::Breathe);
        }

        match next_delay {
            Some(delay) if self.render.is_running() => {
                self.scheduler
                    .schedule_after(due, delay, Job::Reveal { turn });
            }
            Some(_) => {}
            None => self.finish_typing(turn, due),
        }
    }
}

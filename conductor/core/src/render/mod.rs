//! Render Loop
//!
//! Owns the logical clock, the surface parameters and the raster. Each frame
//! it advances the clock, evaluates the Surface Model over a tessellated
//! sphere and writes an RGB8 frame composited over the clear colour.
//!
//! # Lifecycle
//!
//! ```text
//! Initializing ──start──> Running ──dispose──> Disposed
//! ```
//!
//! Dispose is terminal and idempotent. After dispose, resizes are ignored
//! and no further frames are produced.
//!
//! # Frame Pipeline
//!
//! ```text
//! SphereMesh (cached per deform_strength)
//!     │  × scale, view-projection
//!     ▼
//! ClipVertex ──> Rasterizer ──shade()──> FrameBuffer
//! ```

mod camera;
mod frame;
mod mesh;
mod raster;

pub use camera::Camera;
pub use frame::FrameBuffer;
pub use mesh::{SphereMesh, MAX_SEGMENTS};
pub use raster::{ClipVertex, Rasterizer};

use std::time::{Duration, Instant};

use glam::Vec4;

use crate::clock::Clock;
use crate::color::Rgb;
use crate::config::EngineConfig;
use crate::surface::model::shade;
use crate::surface::SurfaceParameters;

/// Render loop lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Parameters exist; no raster yet
    Initializing,
    /// Producing frames
    Running,
    /// Released; terminal
    Disposed,
}

/// Drives the clock and produces frames
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    clock: Clock,
    started_at: Option<Instant>,
    params: SurfaceParameters,
    camera: Camera,
    mesh: SphereMesh,
    rasterizer: Rasterizer,
    clip_vertices: Vec<ClipVertex>,
    frame: FrameBuffer,
    clear_color: Rgb,
    frames_presented: u64,
}

impl RenderLoop {
    /// Initialise parameters and geometry; no raster is allocated yet
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: LoopState::Initializing,
            clock: Clock::new(),
            started_at: None,
            params: config.surface_parameters(),
            camera: Camera::new(1.0),
            mesh: SphereMesh::new(config.surface.segments),
            rasterizer: Rasterizer::new(),
            clip_vertices: Vec::new(),
            frame: FrameBuffer::default(),
            clear_color: config.surface.clear_color,
            frames_presented: 0,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether frames are being produced
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Allocate the raster and start the clock
    ///
    /// Returns `false` unless the loop was initialising.
    pub fn start(&mut self, width: u32, height: u32) -> bool {
        if self.state != LoopState::Initializing {
            tracing::warn!(state = ?self.state, "Render loop start ignored");
            return false;
        }
        self.frame = FrameBuffer::new(width, height, self.clear_color);
        self.camera.aspect = Camera::aspect_for(width, height);
        self.started_at = Some(Instant::now());
        self.state = LoopState::Running;
        tracing::info!(width, height, segments = self.mesh.segments(), "Render loop started");
        true
    }

    /// Change the output size
    ///
    /// Only the raster and aspect ratio change. Returns `false` when not
    /// running or when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.is_running() {
            tracing::debug!(width, height, "Resize ignored: not running");
            return false;
        }
        if !self.frame.resize(width, height, self.clear_color) {
            return false;
        }
        self.camera.aspect = Camera::aspect_for(width, height);
        tracing::debug!(width, height, "Render loop resized");
        true
    }

    /// Wall-clock time since start
    #[must_use]
    pub fn real_elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Move the logical clock forward; earlier readings are ignored
    pub fn advance_clock_to(&mut self, elapsed: Duration) -> Duration {
        self.clock.advance_to(elapsed)
    }

    /// Logical clock
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Surface parameters
    #[must_use]
    pub fn parameters(&self) -> &SurfaceParameters {
        &self.params
    }

    /// Surface parameters for the animators
    pub fn parameters_mut(&mut self) -> &mut SurfaceParameters {
        &mut self.params
    }

    /// Camera
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Last frame presented (empty before start and after dispose)
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Frames presented since start
    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Draw one frame at the current clock reading
    pub fn present(&mut self) -> &FrameBuffer {
        if !self.is_running() || self.frame.is_empty() {
            return &self.frame;
        }

        self.frame.fill(self.clear_color);

        let view_projection = self.camera.view_projection();
        let normal_matrix = self.camera.normal_matrix();
        let scale = self.params.scale;

        self.clip_vertices.clear();
        self.clip_vertices.extend(
            self.mesh
                .deformed(self.params.deform_strength)
                .iter()
                .map(|v| ClipVertex {
                    clip: view_projection * Vec4::from((v.position * scale, 1.0)),
                    uv: v.uv,
                    normal: normal_matrix * v.normal,
                }),
        );

        let time = self.clock.seconds();
        let params = &self.params;
        let fragments = self.rasterizer.draw(
            &mut self.frame,
            &self.clip_vertices,
            self.mesh.triangles(),
            |uv, normal| shade(uv, normal, time, params),
        );

        self.frames_presented += 1;
        tracing::trace!(frame = self.frames_presented, fragments, "Frame presented");
        &self.frame
    }

    /// Stop producing frames and release the raster
    ///
    /// Returns `false` if already disposed.
    pub fn dispose(&mut self) -> bool {
        if self.state == LoopState::Disposed {
            return false;
        }
        self.state = LoopState::Disposed;
        self.frame = FrameBuffer::default();
        self.clip_vertices = Vec::new();
        self.rasterizer = Rasterizer::new();
        tracing::info!(frames = self.frames_presented, "Render loop disposed");
        true
    }
}

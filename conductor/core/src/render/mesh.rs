//! UV sphere tessellation
//!
//! A unit sphere split into `segments` slices around and `segments` stacks
//! from pole to pole. The seam column is duplicated so every vertex has a
//! single texture coordinate. Triangles wind counter-clockwise seen from
//! outside.
//!
//! Deformation only depends on `deform_strength`, so the deformed vertices
//! are cached and rebuilt only when that value changes.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::surface::model::deform;
use crate::surface::{DeformedVertex, SurfacePoint};

/// Densest tessellation the mesh will build
pub const MAX_SEGMENTS: u32 = 1024;

/// Tessellated unit sphere with a deformation cache
#[derive(Clone, Debug)]
pub struct SphereMesh {
    segments: u32,
    points: Vec<SurfacePoint>,
    triangles: Vec<[u32; 3]>,
    deformed: Vec<DeformedVertex>,
    deformed_for: Option<u32>,
}

impl SphereMesh {
    /// Build a sphere; `segments` is clamped to `3..=MAX_SEGMENTS`
    #[must_use]
    pub fn new(segments: u32) -> Self {
        let segments = segments.clamp(3, MAX_SEGMENTS);
        let row = segments + 1;

        let mut points = Vec::with_capacity(row as usize * row as usize);
        for iy in 0..=segments {
            let v = iy as f32 / segments as f32;
            for ix in 0..=segments {
                let u = ix as f32 / segments as f32;
                let (sin_theta, cos_theta) = (v * PI).sin_cos();
                let (sin_phi, cos_phi) = (u * TAU).sin_cos();
                let position = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                points.push(SurfacePoint {
                    position,
                    normal: position.normalize_or_zero(),
                    uv: Vec2::new(u, 1.0 - v),
                });
            }
        }

        let index = |iy: u32, ix: u32| iy * row + ix;
        let mut triangles = Vec::with_capacity(segments as usize * segments as usize * 2);
        for iy in 0..segments {
            for ix in 0..segments {
                let a = index(iy, ix + 1);
                let b = index(iy, ix);
                let c = index(iy + 1, ix);
                let d = index(iy + 1, ix + 1);
                if iy != 0 {
                    triangles.push([a, b, d]);
                }
                if iy != segments - 1 {
                    triangles.push([b, c, d]);
                }
            }
        }

        Self {
            segments,
            points,
            triangles,
            deformed: Vec::new(),
            deformed_for: None,
        }
    }

    /// Segment count actually used
    #[must_use]
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Undeformed vertices
    #[must_use]
    pub fn points(&self) -> &[SurfacePoint] {
        &self.points
    }

    /// Vertex indices, three per triangle
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Vertices deformed at `deform_strength`, unscaled
    pub fn deformed(&mut self, deform_strength: f32) -> &[DeformedVertex] {
        let key = deform_strength.to_bits();
        if self.deformed_for != Some(key) {
            self.deformed.clear();
            self.deformed
                .extend(self.points.iter().map(|p| deform(p, deform_strength)));
            self.deformed_for = Some(key);
        }
        &self.deformed
    }
}

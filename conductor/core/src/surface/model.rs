//! Deformation and Colouring
//!
//! Two stages, mirroring a vertex and a fragment program:
//!
//! 1. [`displace`] pushes each surface point along its normal by three
//!    octaves of simplex noise, attenuated towards the silhouette, then
//!    applies the uniform scale.
//! 2. [`shade`] weights the two four-colour palettes with four drifting
//!    noise fields, blends them by `color_mix_ratio`, brightens, and adds
//!    rim and specular terms from the deformed normal.

use glam::{Vec2, Vec3};

use super::noise::{gradient2, simplex3, smoothstep};
use super::SurfaceParameters;
use crate::color::Palette;

/// (frequency, weight) per displacement octave
pub const OCTAVES: [(f32, f32); 3] = [(2.0, 1.0), (4.0, 0.4), (8.0, 0.2)];

/// (frequency, drift rate) per colour field
const COLOR_FIELDS: [(f32, f32); 4] = [(1.0, 1.5), (1.2, -1.4), (0.8, 1.6), (1.5, -1.05)];

/// Radius at which displacement fades out completely
const FALLOFF_RADIUS: f32 = 1.2;

const FIELD_FLOOR: f32 = 0.1;
const CONTRAST: f32 = 1.8;
const SEPARATION: f32 = 2.2;
/// Lower bound on each normalised-before weight so no colour vanishes
pub const MIN_WEIGHT: f32 = 0.01;

const GAMMA: f32 = 0.85;
const BRIGHTNESS: f32 = 1.3;

/// Output alpha; constant over time
pub const SURFACE_ALPHA: f32 = 0.85;

/// A point on the undeformed surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    /// Object-space position
    pub position: Vec3,
    /// Unit outward normal
    pub normal: Vec3,
    /// Texture coordinate
    pub uv: Vec2,
}

/// A surface point after displacement
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeformedVertex {
    /// Displaced object-space position
    pub position: Vec3,
    /// Normal after displacement
    pub normal: Vec3,
    /// Texture coordinate (unchanged)
    pub uv: Vec2,
}

/// Fragment colour before compositing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    /// Colour, may exceed 1.0 where rim and highlight add up
    pub rgb: Vec3,
    /// Coverage
    pub alpha: f32,
}

/// Summed octave noise at `position`
#[must_use]
pub fn displacement(position: Vec3, deform_strength: f32) -> f32 {
    OCTAVES
        .iter()
        .map(|&(freq, weight)| simplex3(position * freq) * deform_strength * weight)
        .sum()
}

/// Attenuation by distance from the surface centre
#[must_use]
pub fn falloff(position: Vec3) -> f32 {
    smoothstep(FALLOFF_RADIUS, 0.0, position.length())
}

/// Displace a point without applying the uniform scale
///
/// Only depends on `deform_strength`, so callers may cache the result and
/// apply `scale` per frame.
#[must_use]
pub fn deform(point: &SurfacePoint, deform_strength: f32) -> DeformedVertex {
    let noise = displacement(point.position, deform_strength);
    DeformedVertex {
        position: point.position + point.normal * noise * falloff(point.position),
        normal: (point.normal + point.normal * noise).normalize_or_zero(),
        uv: point.uv,
    }
}

/// Full vertex stage: deform, then scale
#[must_use]
pub fn displace(point: &SurfacePoint, params: &SurfaceParameters) -> DeformedVertex {
    let mut vertex = deform(point, params.deform_strength);
    vertex.position *= params.scale;
    vertex
}

/// Normalised weights of the four palette entries at `uv` and `time`
///
/// Every weight is strictly positive and they sum to 1.
#[must_use]
pub fn blend_weights(uv: Vec2, time: f32, noise_scale: f32) -> [f32; 4] {
    let pos = uv * noise_scale;
    let raw = COLOR_FIELDS.map(|(freq, rate)| {
        let n = (gradient2(pos * freq + Vec2::splat(time * rate)) * 0.5 + 0.5)
            .clamp(0.0, 1.0)
            .max(FIELD_FLOOR);
        (n * CONTRAST).clamp(0.0, 1.0).powf(SEPARATION).max(MIN_WEIGHT)
    });
    let total: f32 = raw.iter().sum();
    raw.map(|w| w / total)
}

fn weighted(palette: &Palette, weights: &[f32; 4]) -> Vec3 {
    palette
        .iter()
        .zip(weights)
        .map(|(color, &w)| color.to_vec3() * w)
        .sum()
}

/// Fragment stage
///
/// `view_normal` is the interpolated normal in camera space. When
/// `color_mix_ratio` is exactly 1.0 the palette term is exactly the target
/// palette's.
#[must_use]
pub fn shade(uv: Vec2, view_normal: Vec3, time: f32, params: &SurfaceParameters) -> Rgba {
    let weights = blend_weights(uv, time, params.noise_scale);
    let ratio = params.color_mix_ratio;

    let current = weighted(&params.current_colors, &weights);
    let target = weighted(&params.target_colors, &weights);
    let mut color = current * (1.0 - ratio) + target * ratio;

    color = (color.powf(GAMMA) * BRIGHTNESS).clamp(Vec3::ZERO, Vec3::ONE);

    let n = view_normal.normalize_or_zero();
    let sphere_gradient = n.dot(Vec3::Y) * 0.5 + 0.5;
    color = color * 0.8 + color * (sphere_gradient * 1.5) * 0.2;

    let rim = (1.0 - n.dot(Vec3::Z).max(0.0)).powf(1.8) * 0.5;
    let highlight = n.dot(Vec3::ONE.normalize()).max(0.0).powf(20.0) * 0.4;

    Rgba {
        rgb: color + Vec3::splat(rim + highlight),
        alpha: SURFACE_ALPHA,
    }
}

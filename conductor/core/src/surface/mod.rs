//! Surface Model
//!
//! The breathing orb is described by plain data ([`SurfaceParameters`]) and
//! evaluated by pure functions ([`model`]). Nothing in here keeps state
//! between calls: given the same clock value and parameters the output is
//! identical, which is what lets the model be tested without a raster.

pub mod model;
pub mod noise;

use crate::color::{default_palette, lerp_palette, Palette};

pub use model::{DeformedVertex, Rgba, SurfacePoint, SURFACE_ALPHA};

/// Numeric inputs to the Surface Model
///
/// Written by exactly three parties: initialisation (everything, once), the
/// breathing animator (`scale` only) and the colour transition controller
/// (colours and `color_mix_ratio` only).
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceParameters {
    /// Uniform scale applied after deformation
    pub scale: f32,
    /// Frequency multiplier for the colour noise fields
    pub noise_scale: f32,
    /// Amplitude of the normal displacement
    pub deform_strength: f32,
    /// Palette being blended away from
    pub current_colors: Palette,
    /// Palette being blended towards
    pub target_colors: Palette,
    /// Blend factor between the two palettes (0.0-1.0)
    pub color_mix_ratio: f32,
}

impl SurfaceParameters {
    /// Starting parameters: one palette used for both ends, no blend
    #[must_use]
    pub fn new(palette: Palette, base_scale: f32, noise_scale: f32, deform_strength: f32) -> Self {
        Self {
            scale: base_scale,
            noise_scale,
            deform_strength,
            current_colors: palette,
            target_colors: palette,
            color_mix_ratio: 0.0,
        }
    }

    /// The four colours as currently interpolated
    #[must_use]
    pub fn blended_palette(&self) -> Palette {
        lerp_palette(&self.current_colors, &self.target_colors, self.color_mix_ratio)
    }
}

impl Default for SurfaceParameters {
    fn default() -> Self {
        Self::new(default_palette(), 1.0, 3.0, 0.3)
    }
}

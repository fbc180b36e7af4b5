//! Perspective camera fixed on the surface centre

use glam::{Mat3, Mat4, Vec3};

/// Right-handed perspective camera
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width over height of the raster
    pub aspect: f32,
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
}

impl Camera {
    /// Slightly above the equator, five units out, looking at the origin
    #[must_use]
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, 5.0),
            target: Vec3::ZERO,
            fov_y: 75f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Aspect ratio for a raster size
    #[must_use]
    pub fn aspect_for(width: u32, height: u32) -> f32 {
        width.max(1) as f32 / height.max(1) as f32
    }

    /// World to camera
    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Camera to clip, depth in `[0, 1]`
    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect.max(1e-6), self.near, self.far)
    }

    /// World to clip
    #[inline]
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Transforms object normals into camera space
    ///
    /// The view matrix is rigid, so its rotation part is its own
    /// inverse-transpose.
    #[inline]
    #[must_use]
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.view_matrix())
    }
}

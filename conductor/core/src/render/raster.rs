//! Triangle rasteriser
//!
//! Edge-function scan over each triangle's bounding box with a depth buffer,
//! counter-clockwise front faces, and perspective-correct interpolation of
//! texture coordinates and normals. Fragments are alpha-composited over
//! whatever the frame already holds.

use glam::{Vec2, Vec3, Vec4};

use super::FrameBuffer;
use crate::surface::Rgba;

/// A vertex after the vertex stage
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipVertex {
    /// Clip-space position
    pub clip: Vec4,
    /// Texture coordinate
    pub uv: Vec2,
    /// Camera-space normal
    pub normal: Vec3,
}

#[derive(Clone, Copy)]
struct ScreenVertex {
    xy: Vec2,
    depth: f32,
    inv_w: f32,
}

/// Reusable depth buffer and scan state
#[derive(Clone, Debug, Default)]
pub struct Rasterizer {
    depth: Vec<f32>,
}

impl Rasterizer {
    /// Create an empty rasteriser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw indexed triangles into `target`
    ///
    /// `fragment` receives the interpolated texture coordinate and
    /// camera-space normal. Returns the number of fragments written.
    pub fn draw(
        &mut self,
        target: &mut FrameBuffer,
        vertices: &[ClipVertex],
        triangles: &[[u32; 3]],
        mut fragment: impl FnMut(Vec2, Vec3) -> Rgba,
    ) -> usize {
        let (width, height) = target.size();
        if width == 0 || height == 0 {
            return 0;
        }
        self.depth.clear();
        self.depth.resize(width as usize * height as usize, f32::INFINITY);

        let size = Vec2::new(width as f32, height as f32);
        let mut written = 0;

        for tri in triangles {
            let Some([v0, v1, v2]) = fetch(vertices, tri) else {
                continue;
            };
            let (Some(s0), Some(s1), Some(s2)) = (
                to_screen(&v0, size),
                to_screen(&v1, size),
                to_screen(&v2, size),
            ) else {
                continue;
            };

            // Positive for triangles counter-clockwise in NDC
            let area = edge(s0.xy, s1.xy, s2.xy);
            if area <= 0.0 {
                continue;
            }

            let min = s0.xy.min(s1.xy).min(s2.xy).floor().max(Vec2::ZERO);
            let max = s0.xy.max(s1.xy).max(s2.xy).ceil().min(size - Vec2::ONE);
            if min.x > max.x || min.y > max.y {
                continue;
            }

            for y in min.y as u32..=max.y as u32 {
                for x in min.x as u32..=max.x as u32 {
                    let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let l0 = edge(s1.xy, s2.xy, p) / area;
                    let l1 = edge(s2.xy, s0.xy, p) / area;
                    let l2 = edge(s0.xy, s1.xy, p) / area;
                    if l0 < 0.0 || l1 < 0.0 || l2 < 0.0 {
                        continue;
                    }

                    let depth = l0 * s0.depth + l1 * s1.depth + l2 * s2.depth;
                    let slot = y as usize * width as usize + x as usize;
                    if !(0.0..=1.0).contains(&depth) || depth >= self.depth[slot] {
                        continue;
                    }

                    let w0 = l0 * s0.inv_w;
                    let w1 = l1 * s1.inv_w;
                    let w2 = l2 * s2.inv_w;
                    let norm = w0 + w1 + w2;
                    if norm <= 0.0 {
                        continue;
                    }
                    let uv = (v0.uv * w0 + v1.uv * w1 + v2.uv * w2) / norm;
                    let normal = (v0.normal * w0 + v1.normal * w1 + v2.normal * w2) / norm;

                    let shaded = fragment(uv, normal);
                    let background = target.pixel(x, y).unwrap_or_default();
                    target.set(x, y, composite(shaded, background));
                    self.depth[slot] = depth;
                    written += 1;
                }
            }
        }

        written
    }
}

fn fetch(vertices: &[ClipVertex], tri: &[u32; 3]) -> Option<[ClipVertex; 3]> {
    Some([
        *vertices.get(tri[0] as usize)?,
        *vertices.get(tri[1] as usize)?,
        *vertices.get(tri[2] as usize)?,
    ])
}

/// Perspective divide and viewport mapping; `None` behind the eye
fn to_screen(v: &ClipVertex, size: Vec2) -> Option<ScreenVertex> {
    if v.clip.w <= f32::EPSILON {
        return None;
    }
    let inv_w = 1.0 / v.clip.w;
    let ndc = v.clip.truncate() * inv_w;
    Some(ScreenVertex {
        xy: Vec2::new((ndc.x * 0.5 + 0.5) * size.x, (0.5 - ndc.y * 0.5) * size.y),
        depth: ndc.z,
        inv_w,
    })
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

/// Source-over blend, quantised to 8 bits
fn composite(src: Rgba, dst: [u8; 3]) -> [u8; 3] {
    let dst = Vec3::new(f32::from(dst[0]), f32::from(dst[1]), f32::from(dst[2])) / 255.0;
    let alpha = src.alpha.clamp(0.0, 1.0);
    let out = src.rgb.clamp(Vec3::ZERO, Vec3::ONE) * alpha + dst * (1.0 - alpha);
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(out.x), q(out.y), q(out.z)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use pretty_assertions::assert_eq;

    fn vertex(x: f32, y: f32) -> ClipVertex {
        ClipVertex {
            clip: Vec4::new(x, y, 0.5, 1.0),
            uv: Vec2::ZERO,
            normal: Vec3::Z,
        }
    }

    fn black() -> Rgba {
        Rgba {
            rgb: Vec3::ZERO,
            alpha: 1.0,
        }
    }

    #[test]
    fn test_front_face_covers_pixels() {
        let mut fb = FrameBuffer::new(4, 4, Rgb::new(1.0, 1.0, 1.0));
        let verts = [vertex(-1.0, -1.0), vertex(1.0, -1.0), vertex(1.0, 1.0), vertex(-1.0, 1.0)];
        let mut raster = Rasterizer::new();

        let written = raster.draw(&mut fb, &verts, &[[0, 1, 2], [0, 2, 3]], |_, _| black());

        assert_eq!(written, 16);
        assert!(fb.pixels().iter().all(|p| *p == [0, 0, 0]));
    }

    #[test]
    fn test_back_face_is_culled() {
        let mut fb = FrameBuffer::new(4, 4, Rgb::new(1.0, 1.0, 1.0));
        let verts = [vertex(-1.0, -1.0), vertex(1.0, -1.0), vertex(1.0, 1.0)];
        let mut raster = Rasterizer::new();

        let written = raster.draw(&mut fb, &verts, &[[0, 2, 1]], |_, _| black());

        assert_eq!(written, 0);
        assert!(fb.pixels().iter().all(|p| *p == [255, 255, 255]));
    }

    #[test]
    fn test_nearer_fragment_wins() {
        let mut fb = FrameBuffer::new(2, 2, Rgb::new(1.0, 1.0, 1.0));
        let mut near = [vertex(-1.0, -1.0), vertex(3.0, -1.0), vertex(-1.0, 3.0)];
        for v in &mut near {
            v.clip.z = 0.2;
            v.normal = Vec3::X;
        }
        let mut verts = vec![vertex(-1.0, -1.0), vertex(3.0, -1.0), vertex(-1.0, 3.0)];
        verts.extend(near);
        let mut raster = Rasterizer::new();

        raster.draw(&mut fb, &verts, &[[3, 4, 5], [0, 1, 2]], |_, n| Rgba {
            rgb: if n.x > 0.5 { Vec3::X } else { Vec3::Y },
            alpha: 1.0,
        });

        assert_eq!(fb.pixel(0, 0), Some([255, 0, 0]));
    }

    #[test]
    fn test_translucent_composite_over_white() {
        let out = composite(
            Rgba {
                rgb: Vec3::ZERO,
                alpha: 0.85,
            },
            [255, 255, 255],
        );
        assert_eq!(out, [38, 38, 38]);
    }

    #[test]
    fn test_behind_eye_is_skipped() {
        let mut fb = FrameBuffer::new(2, 2, Rgb::new(1.0, 1.0, 1.0));
        let mut verts = [vertex(-1.0, -1.0), vertex(3.0, -1.0), vertex(-1.0, 3.0)];
        verts[0].clip.w = -1.0;
        let written = Rasterizer::new().draw(&mut fb, &verts, &[[0, 1, 2]], |_, _| black());
        assert_eq!(written, 0);
    }
}

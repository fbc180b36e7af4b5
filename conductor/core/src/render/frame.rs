//! RGB8 frame buffer

use crate::color::Rgb;

/// Row-major RGB8 pixels, top row first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl FrameBuffer {
    /// Allocate a buffer filled with `fill`
    #[must_use]
    pub fn new(width: u32, height: u32, fill: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill.to_u8(); width as usize * height as usize],
        }
    }

    /// Width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the buffer has no pixels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// All pixels, row-major
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Pixel at `(x, y)`
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.offset(x, y)).copied()
    }

    /// Overwrite a pixel; out-of-range writes are ignored
    pub fn set(&mut self, x: u32, y: u32, value: [u8; 3]) {
        if x < self.width && y < self.height {
            let offset = self.offset(x, y);
            self.pixels[offset] = value;
        }
    }

    /// Fill every pixel
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color.to_u8());
    }

    /// Reallocate for a new size; returns `false` if the size is unchanged
    pub fn resize(&mut self, width: u32, height: u32, fill: Rgb) -> bool {
        if (width, height) == self.size() {
            return false;
        }
        *self = Self::new(width, height, fill);
        true
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_and_fill() {
        let mut fb = FrameBuffer::new(3, 2, Rgb::new(1.0, 1.0, 1.0));
        assert_eq!(fb.pixels().len(), 6);
        assert_eq!(fb.pixel(2, 1), Some([255, 255, 255]));
        fb.fill(Rgb::new(0.0, 0.0, 0.0));
        assert!(fb.pixels().iter().all(|p| *p == [0, 0, 0]));
    }

    #[test]
    fn test_bounds() {
        let mut fb = FrameBuffer::new(2, 2, Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(fb.pixel(2, 0), None);
        fb.set(5, 5, [1, 2, 3]);
        fb.set(1, 0, [1, 2, 3]);
        assert_eq!(fb.pixel(1, 0), Some([1, 2, 3]));
    }

    #[test]
    fn test_resize_same_size_is_noop() {
        let white = Rgb::new(1.0, 1.0, 1.0);
        let mut fb = FrameBuffer::new(4, 4, white);
        fb.set(0, 0, [9, 9, 9]);
        assert!(!fb.resize(4, 4, white));
        assert_eq!(fb.pixel(0, 0), Some([9, 9, 9]));
        assert!(fb.resize(8, 2, white));
        assert_eq!(fb.size(), (8, 2));
    }
}

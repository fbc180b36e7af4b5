//! OrbView Widget
//!
//! Each terminal cell shows two vertically stacked raster pixels: the upper
//! one as the foreground of `▀`, the lower one as its background.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use zenorb_core::FrameBuffer;

const UPPER_HALF: char = '▀';

/// Raster size that fills `area` at two pixels per cell
#[must_use]
pub fn raster_size(area: Rect) -> (u32, u32) {
    (u32::from(area.width), u32::from(area.height) * 2)
}

/// Draws a [`FrameBuffer`]
pub struct OrbView<'a> {
    frame: &'a FrameBuffer,
}

impl<'a> OrbView<'a> {
    pub fn new(frame: &'a FrameBuffer) -> Self {
        Self { frame }
    }
}

fn to_color([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

impl Widget for OrbView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = u32::from(col);
                let y = u32::from(row) * 2;
                // Cells beyond the raster keep whatever was there
                let Some(upper) = self.frame.pixel(x, y) else {
                    continue;
                };
                let lower = self.frame.pixel(x, y + 1).unwrap_or(upper);

                buf[(area.x + col, area.y + row)]
                    .set_char(UPPER_HALF)
                    .set_fg(to_color(upper))
                    .set_bg(to_color(lower));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use zenorb_core::Rgb;

    #[test]
    fn test_raster_size_doubles_rows() {
        assert_eq!(raster_size(Rect::new(3, 4, 80, 20)), (80, 40));
    }

    #[test]
    fn test_cells_pair_upper_and_lower_pixels() {
        let mut frame = FrameBuffer::new(2, 4, Rgb::from_u8(255, 255, 255));
        frame.set(0, 0, [10, 20, 30]);
        frame.set(0, 1, [40, 50, 60]);
        frame.set(1, 3, [70, 80, 90]);

        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        OrbView::new(&frame).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(10, 20, 30));
        assert_eq!(cell.bg, Color::Rgb(40, 50, 60));

        let cell = &buf[(1, 1)];
        assert_eq!(cell.fg, Color::Rgb(255, 255, 255));
        assert_eq!(cell.bg, Color::Rgb(70, 80, 90));
    }

    #[test]
    fn test_area_larger_than_raster_is_left_alone() {
        let frame = FrameBuffer::new(1, 2, Rgb::from_u8(0, 0, 0));
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        OrbView::new(&frame).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "▀");
        assert_eq!(buf[(1, 0)].symbol(), " ");
        assert_eq!(buf[(0, 1)].symbol(), " ");
    }
}

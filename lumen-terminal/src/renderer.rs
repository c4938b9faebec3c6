/// Character framebuffer and triangle rasterizer for terminal output
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Vector4;
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
pub const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        ch: ' ',
        color: Color::Reset,
    };

    /// Pick a ramp character from an RGB value in [0, 1]
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        let luminance = (0.2126 * r + 0.7152 * g + 0.0722 * b).clamp(0.0, 1.0);
        let index = (luminance * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;

        Self {
            ch: LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)],
            color: Color::Rgb {
                r: to_byte(r),
                g: to_byte(g),
                b: to_byte(b),
            },
        }
    }
}

/// A projected vertex: pixel coordinates plus NDC depth
pub type ScreenPoint = (f32, f32, f32);

/// Colour and depth buffers sized to the terminal
pub struct Framebuffer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Cell::EMPTY; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Cell::EMPTY);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Map a clip-space position to pixel coordinates.
    ///
    /// Returns `None` behind the eye or outside the depth range; x and y may
    /// fall off screen and are clipped during rasterization.
    pub fn to_screen(&self, clip: &Vector4<f32>) -> Option<ScreenPoint> {
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * self.height as f32;
        Some((screen_x, screen_y, ndc.z))
    }

    /// Scanline fill with barycentric coverage and a depth test
    pub fn fill_triangle(&mut self, coords: &[ScreenPoint; 3], cell: Cell) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let [v0, v1, v2] = *coords;

        // Bounding box clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p) else {
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.cells[idx] = cell;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for cell in row {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(ch: char) -> Cell {
        Cell { ch, color: Color::White }
    }

    #[test]
    fn test_fill_covers_interior() {
        let mut fb = Framebuffer::new(10, 10);
        fb.fill_triangle(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0), (0.0, 10.0, 0.0)], solid('#'));

        assert_eq!(fb.cell(1, 1).unwrap().ch, '#');
        assert_eq!(fb.cell(9, 9).unwrap().ch, ' ');
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut fb = Framebuffer::new(4, 4);
        let tri = |z: f32| [(0.0, 0.0, z), (8.0, 0.0, z), (0.0, 8.0, z)];

        fb.fill_triangle(&tri(0.5), solid('a'));
        fb.fill_triangle(&tri(0.9), solid('b'));
        assert_eq!(fb.cell(0, 0).unwrap().ch, 'a');

        fb.fill_triangle(&tri(0.1), solid('c'));
        assert_eq!(fb.cell(0, 0).unwrap().ch, 'c');

        fb.clear();
        assert_eq!(fb.cell(0, 0), Some(Cell::EMPTY));
    }

    #[test]
    fn test_degenerate_triangle_draws_nothing() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());

        let mut fb = Framebuffer::new(4, 4);
        fb.fill_triangle(&[(0.0, 0.0, 0.0), (1.0, 1.0, 0.0), (2.0, 2.0, 0.0)], solid('x'));
        assert!((0..4).all(|y| (0..4).all(|x| fb.cell(x, y) == Some(Cell::EMPTY))));
    }

    #[test]
    fn test_to_screen() {
        let fb = Framebuffer::new(80, 40);

        let center = fb.to_screen(&Vector4::new(0.0, 0.0, 0.0, 1.0)).unwrap();
        assert_eq!(center, (40.0, 20.0, 0.0));

        let top_left = fb.to_screen(&Vector4::new(-2.0, 2.0, 1.0, 2.0)).unwrap();
        assert_eq!(top_left, (0.0, 0.0, 0.5));

        assert!(fb.to_screen(&Vector4::new(0.0, 0.0, 0.0, -1.0)).is_none());
        assert!(fb.to_screen(&Vector4::new(0.0, 0.0, 3.0, 1.0)).is_none());
    }

    #[test]
    fn test_ramp_follows_luminance() {
        assert_eq!(Cell::from_rgb(0.0, 0.0, 0.0).ch, '.');
        assert_eq!(Cell::from_rgb(1.0, 1.0, 1.0).ch, '@');
        assert_eq!(
            Cell::from_rgb(2.0, -1.0, 0.5).color,
            Color::Rgb { r: 255, g: 0, b: 127 }
        );
    }

    #[test]
    fn test_draw_does_not_scroll_past_last_row() {
        let fb = Framebuffer::new(3, 2);
        let mut out = Vec::new();
        fb.draw(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\r\n").count(), 1);
        assert_eq!(text.matches(' ').count(), 6);
        let last_row = text.rsplit("\r\n").next().unwrap();
        assert_eq!(last_row.matches(' ').count(), 3);
    }
}

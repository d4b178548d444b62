//! CPU rasterizer for the draw command set.
//!
//! Pixel `(x, y)` covers `[x, x + 1) × [y, y + 1)` and is sampled at its
//! center. Strokes paint every pixel whose center lies within half the line
//! width of the segment; ellipses paint every pixel whose center lies inside.
//! Painting is opaque, without anti-aliasing. Geometry with a non-finite
//! coordinate or size is skipped.

use glam::DVec2;
use ode_viz_core::color::Srgb;
use ode_viz_core::error::VizError;
use ode_viz_core::surface::DrawSurface;
use ode_viz_core::vector::Vector;

/// Half-width below which a stroke is widened to one pixel.
const MIN_HALF_WIDTH: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: usize,
    height: usize,
    background: [u8; 4],
    stroke: [u8; 4],
    fill: [u8; 4],
    line_width: f64,
    rgba: Vec<u8>,
}

impl RasterSurface {
    /// A `width × height` surface cleared to black.
    pub fn new(width: usize, height: usize) -> Result<Self, VizError> {
        Self::with_background(width, height, Srgb::BLACK)
    }

    pub fn with_background(width: usize, height: usize, background: Srgb) -> Result<Self, VizError> {
        let invalid = || VizError::InvalidDimensions {
            width: width as f64,
            height: height as f64,
        };
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(invalid)?;
        let background = opaque(background);
        let rgba = background.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            background,
            stroke: opaque(Srgb::WHITE),
            fill: opaque(Srgb::WHITE),
            line_width: 1.0,
            rgba,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major RGBA8 bytes, `width * height * 4` long.
    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }

    /// Color at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.rgba[i..i + 4]);
        Some(px)
    }

    /// Number of pixels that differ from the background.
    pub fn painted_pixels(&self) -> usize {
        self.rgba
            .chunks_exact(4)
            .filter(|px| *px != self.background.as_slice())
            .count()
    }

    fn put(&mut self, x: usize, y: usize, color: [u8; 4]) {
        let i = (y * self.width + x) * 4;
        self.rgba[i..i + 4].copy_from_slice(&color);
    }

    /// Pixel index range whose centers can fall inside `[lo, hi]`, clipped
    /// to `[0, len)`. Empty when the span misses the surface.
    fn span(lo: f64, hi: f64, len: usize) -> std::ops::Range<usize> {
        let start = (lo - 0.5).ceil().max(0.0);
        let end = ((hi - 0.5).floor() + 1.0).min(len as f64);
        if end <= start {
            return 0..0;
        }
        start as usize..end as usize
    }

    fn paint_where<F>(&mut self, min: DVec2, max: DVec2, color: [u8; 4], inside: F)
    where
        F: Fn(DVec2) -> bool,
    {
        for y in Self::span(min.y, max.y, self.height) {
            for x in Self::span(min.x, max.x, self.width) {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if inside(center) {
                    self.put(x, y, color);
                }
            }
        }
    }
}

impl DrawSurface for RasterSurface {
    fn clear(&mut self) {
        let bg = self.background;
        for px in self.rgba.chunks_exact_mut(4) {
            px.copy_from_slice(&bg);
        }
    }

    fn set_stroke_color(&mut self, color: Srgb) {
        self.stroke = opaque(color);
    }

    fn set_fill_color(&mut self, color: Srgb) {
        self.fill = opaque(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn draw_line(&mut self, from: Vector, to: Vector) {
        if !(from.is_finite() && to.is_finite() && self.line_width.is_finite()) {
            return;
        }
        let a = DVec2::from(from);
        let b = DVec2::from(to);
        let half = (self.line_width / 2.0).max(MIN_HALF_WIDTH);
        let pad = DVec2::splat(half);
        let ab = b - a;
        let len_sq = ab.length_squared();
        let color = self.stroke;
        self.paint_where(a.min(b) - pad, a.max(b) + pad, color, |p| {
            let t = if len_sq > 0.0 {
                ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            p.distance_squared(a + ab * t) <= half * half
        });
    }

    fn draw_ellipse(&mut self, center: Vector, radius_x: f64, radius_y: f64) {
        if !(center.is_finite() && radius_x.is_finite() && radius_y.is_finite()) {
            return;
        }
        if radius_x <= 0.0 || radius_y <= 0.0 {
            return;
        }
        let c = DVec2::from(center);
        let r = DVec2::new(radius_x, radius_y);
        let color = self.fill;
        self.paint_where(c - r, c + r, color, |p| ((p - c) / r).length_squared() <= 1.0);
    }
}

fn opaque(color: Srgb) -> [u8; 4] {
    let [r, g, b] = color.to_rgb8();
    [r, g, b, 255]
}

//! Magnitude-to-color mapping for the vector field pass.
//!
//! A [`Palette`] is a list of color stops at ascending positions in [0, 1],
//! sampled by piecewise-linear interpolation in sRGB. The
//! [`ColorContinuum`] pushes a field magnitude through the saturation curve
//! `p = 1 - exp(-m / pivot)` before sampling, so small magnitudes spread over
//! the low end of the gradient and large ones crowd toward the last stop.

use crate::color::Srgb;
use crate::error::VizError;

/// Color stops sampled by piecewise-linear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<(f64, Srgb)>,
}

impl Palette {
    /// Requires at least one stop, positions in [0, 1] and non-decreasing.
    pub fn new(stops: Vec<(f64, Srgb)>) -> Result<Self, VizError> {
        if stops.is_empty() {
            return Err(VizError::InvalidColor(
                "palette requires at least 1 stop".to_string(),
            ));
        }
        if stops.iter().any(|(p, _)| !(0.0..=1.0).contains(p)) {
            return Err(VizError::InvalidColor(
                "palette stop positions must lie in [0, 1]".to_string(),
            ));
        }
        if stops.windows(2).any(|w| w[1].0 < w[0].0) {
            return Err(VizError::InvalidColor(
                "palette stop positions must be ascending".to_string(),
            ));
        }
        Ok(Self { stops })
    }

    /// Evenly spaced stops parsed from hex strings.
    pub fn from_hex(hexes: &[&str]) -> Result<Self, VizError> {
        let last = hexes.len().saturating_sub(1).max(1) as f64;
        let stops = hexes
            .iter()
            .enumerate()
            .map(|(i, h)| Srgb::from_hex(h).map(|c| (i as f64 / last, c)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(stops)
    }

    /// Blue through orange and salmon to red.
    pub fn heat() -> Self {
        Self {
            stops: vec![
                (0.0, Srgb::from_rgb8(0, 100, 255)),
                (1.0 / 3.0, Srgb::from_rgb8(255, 127, 50)),
                (2.0 / 3.0, Srgb::from_rgb8(255, 100, 100)),
                (1.0, Srgb::from_rgb8(255, 0, 0)),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Samples at `t`, clamped to [0, 1]. NaN samples the first stop.
    pub fn sample(&self, t: f64) -> Srgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (first_pos, first) = self.stops[0];
        if t <= first_pos {
            return first;
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                let span = p1 - p0;
                if span <= 0.0 {
                    return c1;
                }
                return c0.lerp(c1, (t - p0) / span);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::heat()
    }
}

/// Saturating magnitude-to-color map.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorContinuum {
    palette: Palette,
    pivot: f64,
}

impl ColorContinuum {
    pub fn new(palette: Palette, pivot: f64) -> Self {
        Self { palette, pivot }
    }

    pub fn pivot(&self) -> f64 {
        self.pivot
    }

    pub fn set_pivot(&mut self, pivot: f64) {
        self.pivot = pivot;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Position on the gradient for magnitude `m`: `1 - exp(-m / pivot)`.
    pub fn saturation(&self, m: f64) -> f64 {
        1.0 - (-m / self.pivot).exp()
    }

    pub fn color_for(&self, m: f64) -> Srgb {
        self.palette.sample(self.saturation(m))
    }
}

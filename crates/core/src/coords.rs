//! Affine mapping between chart space and canvas/grid space.
//!
//! Chart space is the coordinate system the ODE is written in. Canvas space
//! is pixels, grid space is cell indices; both start at `(0, 0)` and run to a
//! `bounds` vector. The mapping does not flip the y axis: larger chart `y`
//! is further down the canvas.
//!
//! Mapping functions divide by `bounds` and by the range span without any
//! guard. Build ranges through [`CoordinateRange::new`] (or load them from a
//! validated [`Scene`](crate::scene::Scene)) to keep spans positive, and
//! never pass zero bounds.

use serde::{Deserialize, Serialize};

use crate::error::VizError;
use crate::vector::Vector;

/// The rectangle `[x_neg, x_pos] × [y_neg, y_pos]` of chart space shown on
/// the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRange {
    pub x_neg: f64,
    pub x_pos: f64,
    pub y_neg: f64,
    pub y_pos: f64,
}

impl CoordinateRange {
    /// Creates a range, rejecting spans that are empty, inverted or non-finite.
    pub fn new(x_neg: f64, x_pos: f64, y_neg: f64, y_pos: f64) -> Result<Self, VizError> {
        let range = Self {
            x_neg,
            x_pos,
            y_neg,
            y_pos,
        };
        range.validate()?;
        Ok(range)
    }

    /// A range centered on the origin with half-widths `half_x` and `half_y`.
    pub fn symmetric(half_x: f64, half_y: f64) -> Result<Self, VizError> {
        Self::new(-half_x, half_x, -half_y, half_y)
    }

    /// Checks `x_neg < x_pos` and `y_neg < y_pos` with finite bounds.
    pub fn validate(&self) -> Result<(), VizError> {
        check_axis('x', self.x_neg, self.x_pos)?;
        check_axis('y', self.y_neg, self.y_pos)
    }

    pub fn width(&self) -> f64 {
        self.x_pos - self.x_neg
    }

    pub fn height(&self) -> f64 {
        self.y_pos - self.y_neg
    }

    /// Chart units per unit of `bounds`, per axis.
    pub fn scale(&self, bounds: Vector) -> Vector {
        Vector::new(self.width() / bounds.x, self.height() / bounds.y)
    }

    /// Maps a position in `[0, bounds]` onto the chart range.
    pub fn to_chart_coords(&self, pos: Vector, bounds: Vector) -> Vector {
        Vector::new(
            remap(pos.x, bounds.x, self.x_neg, self.x_pos),
            remap(pos.y, bounds.y, self.y_neg, self.y_pos),
        )
    }

    /// Converts a displacement into chart units without translating it.
    pub fn to_chart_scale(&self, vec: Vector, bounds: Vector) -> Vector {
        vec.mul_elementwise(self.scale(bounds))
    }

    /// Inverse of [`CoordinateRange::to_chart_coords`].
    pub fn to_canvas_coords(&self, chart: Vector, bounds: Vector) -> Vector {
        Vector::new(
            (chart.x - self.x_neg) / self.width() * bounds.x,
            (chart.y - self.y_neg) / self.height() * bounds.y,
        )
    }

    /// Canvas position of the chart origin. Lies outside `[0, bounds]` when
    /// the range does not contain zero.
    pub fn origin_on_canvas(&self, bounds: Vector) -> Vector {
        Vector::new(
            -bounds.x * self.x_neg / self.width(),
            -bounds.y * self.y_neg / self.height(),
        )
    }
}

fn remap(v: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    v * (out_max - out_min) / in_max + out_min
}

fn check_axis(axis: char, neg: f64, pos: f64) -> Result<(), VizError> {
    if !(neg.is_finite() && pos.is_finite() && neg < pos) {
        return Err(VizError::DegenerateRange { axis, neg, pos });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx(a: Vector, b: Vector) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn new_rejects_inverted_and_empty_spans() {
        assert!(CoordinateRange::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(CoordinateRange::new(-1.0, 1.0, 2.0, 2.0).is_err());
        assert!(CoordinateRange::new(f64::NAN, 1.0, -1.0, 1.0).is_err());
        assert!(matches!(
            CoordinateRange::new(-1.0, 1.0, 3.0, 2.0),
            Err(VizError::DegenerateRange { axis: 'y', .. })
        ));
    }

    #[test]
    fn grid_origin_maps_to_negative_corner() {
        let r = CoordinateRange::new(-2.0, 4.0, -1.0, 3.0).unwrap();
        let bounds = Vector::new(12.0, 8.0);
        assert_eq!(r.to_chart_coords(Vector::ZERO, bounds), Vector::new(-2.0, -1.0));
    }

    #[test]
    fn full_bound_maps_to_positive_corner() {
        let r = CoordinateRange::new(-2.0, 4.0, -1.0, 3.0).unwrap();
        let bounds = Vector::new(12.0, 8.0);
        assert!(approx(r.to_chart_coords(bounds, bounds), Vector::new(4.0, 3.0)));
    }

    #[test]
    fn coords_equal_scale_plus_offset() {
        let r = CoordinateRange::new(-5.0, 1.0, -2.0, 6.0).unwrap();
        let bounds = Vector::new(300.0, 200.0);
        let p = Vector::new(75.0, 130.0);
        let via_scale = r.to_chart_scale(p, bounds) + Vector::new(r.x_neg, r.y_neg);
        assert!(approx(r.to_chart_coords(p, bounds), via_scale));
    }

    #[test]
    fn scale_is_span_over_bound() {
        let r = CoordinateRange::symmetric(4.0, 3.0).unwrap();
        let s = r.scale(Vector::new(400.0, 300.0));
        assert!(approx(s, Vector::new(0.02, 0.02)));
    }

    #[test]
    fn canvas_coords_invert_chart_coords() {
        let r = CoordinateRange::new(-3.0, 1.0, -0.5, 2.5).unwrap();
        let bounds = Vector::new(640.0, 480.0);
        let p = Vector::new(123.0, 456.0);
        let back = r.to_canvas_coords(r.to_chart_coords(p, bounds), bounds);
        assert!((back.x - p.x).abs() < 1e-9 && (back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn origin_on_canvas_handles_asymmetric_range() {
        let r = CoordinateRange::new(-1.0, 3.0, -3.0, 1.0).unwrap();
        let o = r.origin_on_canvas(Vector::new(400.0, 400.0));
        assert!(approx(o, Vector::new(100.0, 300.0)));
        assert!(approx(r.to_chart_coords(o, Vector::new(400.0, 400.0)), Vector::ZERO));
    }
}

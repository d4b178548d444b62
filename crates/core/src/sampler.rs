//! Grid sampling of an ODE system into a [`FieldSnapshot`].
//!
//! The canvas is split into `cols × rows` cells. Each cell is sampled once at
//! its center: the grid index is mapped into chart space and the half-cell
//! margin, converted separately with
//! [`CoordinateRange::to_chart_scale`], is added on top. The raw ODE value
//! has its true magnitude recorded before the [`FieldStyle`] reshapes it for
//! display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::coords::CoordinateRange;
use crate::error::VizError;
use crate::ode::OdeSystem;
use crate::vector::Vector;

/// How a sampled vector is reshaped for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStyle {
    /// Multiply by the vector scale.
    Raw,
    /// Unit length, then multiply by the vector scale.
    Normalize,
    /// Multiply by the vector scale, then clamp to the vector cap.
    #[default]
    Cap,
}

const STYLE_NAMES: &[&str] = &["raw", "normalize", "cap"];

impl FieldStyle {
    /// Reshapes `v` in place.
    pub fn apply(self, v: &mut Vector, vector_scale: f64, vector_cap: f64) {
        match self {
            FieldStyle::Raw => *v *= vector_scale,
            FieldStyle::Normalize => {
                v.normalize();
                *v *= vector_scale;
            }
            FieldStyle::Cap => {
                *v *= vector_scale;
                v.cap(vector_cap);
            }
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        STYLE_NAMES
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldStyle::Raw => "raw",
            FieldStyle::Normalize => "normalize",
            FieldStyle::Cap => "cap",
        }
    }
}

impl FromStr for FieldStyle {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "scalar" => Ok(FieldStyle::Raw),
            "normalize" => Ok(FieldStyle::Normalize),
            "cap" => Ok(FieldStyle::Cap),
            _ => Err(VizError::UnknownStyle(s.to_string())),
        }
    }
}

impl fmt::Display for FieldStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One evaluation of the field over the whole grid at a fixed time.
///
/// Cells are stored row-major: `(i, j)` lives at `j * cols + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSnapshot {
    cols: usize,
    rows: usize,
    t: f64,
    cells: Vec<Vector>,
}

impl FieldSnapshot {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Time the snapshot was taken at.
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Vector in column `i`, row `j`, or `None` outside the grid.
    pub fn get(&self, i: usize, j: usize) -> Option<Vector> {
        if i >= self.cols || j >= self.rows {
            return None;
        }
        Some(self.cells[j * self.cols + i])
    }

    /// Yields `(i, j, vector)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Vector)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(k, &v)| (k % self.cols, k / self.cols, v))
    }

    /// Largest true magnitude in the grid, ignoring non-finite cells.
    pub fn max_true_magnitude(&self) -> f64 {
        self.cells
            .iter()
            .map(Vector::true_magnitude)
            .filter(|m| m.is_finite())
            .fold(0.0, f64::max)
    }
}

/// Grid geometry plus the display style used to build snapshots.
#[derive(Debug, Clone)]
pub struct FieldSampler {
    canvas: Vector,
    cols: usize,
    rows: usize,
    range: CoordinateRange,
    style: FieldStyle,
    vector_scale: f64,
    vector_cap: f64,
}

impl FieldSampler {
    /// Default length multiplier for displayed vectors.
    pub const DEFAULT_VECTOR_SCALE: f64 = 12.0;
    /// Default maximum displayed length under [`FieldStyle::Cap`].
    pub const DEFAULT_VECTOR_CAP: f64 = 10.0;

    /// Creates a sampler over a `width × height` canvas split into
    /// `cols × rows` cells, using the `Cap` style and default scale/cap.
    pub fn new(
        width: f64,
        height: f64,
        cols: usize,
        rows: usize,
        range: CoordinateRange,
    ) -> Result<Self, VizError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(VizError::InvalidDimensions { width, height });
        }
        if cols == 0 || rows == 0 {
            return Err(VizError::InvalidGrid { cols, rows });
        }
        range.validate()?;
        Ok(Self {
            canvas: Vector::new(width, height),
            cols,
            rows,
            range,
            style: FieldStyle::default(),
            vector_scale: Self::DEFAULT_VECTOR_SCALE,
            vector_cap: Self::DEFAULT_VECTOR_CAP,
        })
    }

    pub fn with_style(mut self, style: FieldStyle, vector_scale: f64, vector_cap: f64) -> Self {
        self.style = style;
        self.vector_scale = vector_scale;
        self.vector_cap = vector_cap;
        self
    }

    pub fn style(&self) -> FieldStyle {
        self.style
    }

    pub fn set_style(&mut self, style: FieldStyle) {
        self.style = style;
    }

    pub fn vector_scale(&self) -> f64 {
        self.vector_scale
    }

    pub fn vector_cap(&self) -> f64 {
        self.vector_cap
    }

    pub fn range(&self) -> &CoordinateRange {
        &self.range
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// `(width, height)` in pixels.
    pub fn canvas_bounds(&self) -> Vector {
        self.canvas
    }

    /// `(cols, rows)`.
    pub fn grid_bounds(&self) -> Vector {
        Vector::new(self.cols as f64, self.rows as f64)
    }

    /// Pixel distance between neighbouring cell centers.
    pub fn gaps(&self) -> Vector {
        Vector::new(
            self.canvas.x / self.cols as f64,
            self.canvas.y / self.rows as f64,
        )
    }

    /// Half a cell gap on each axis.
    pub fn margins(&self) -> Vector {
        Vector::new(
            self.canvas.x / (self.cols as f64 * 2.0),
            self.canvas.y / (self.rows as f64 * 2.0),
        )
    }

    /// Pixel position of the center of cell `(i, j)`.
    pub fn cell_center(&self, i: usize, j: usize) -> Vector {
        let gaps = self.gaps();
        self.margins() + Vector::new(i as f64 * gaps.x, j as f64 * gaps.y)
    }

    /// Chart position sampled for cell `(i, j)`.
    pub fn chart_center(&self, i: usize, j: usize) -> Vector {
        let chart_margins = self.range.to_chart_scale(self.margins(), self.canvas);
        self.grid_to_chart(i, j) + chart_margins
    }

    fn grid_to_chart(&self, i: usize, j: usize) -> Vector {
        self.range
            .to_chart_coords(Vector::new(i as f64, j as f64), self.grid_bounds())
    }

    /// Evaluates `system` at every cell center at time `t`.
    pub fn sample_at(&self, system: &dyn OdeSystem, t: f64) -> FieldSnapshot {
        let chart_margins = self.range.to_chart_scale(self.margins(), self.canvas);
        let cells = (0..self.rows)
            .flat_map(|j| (0..self.cols).map(move |i| (i, j)))
            .map(|(i, j)| {
                let chart_pos = self.grid_to_chart(i, j) + chart_margins;
                let mut v = system.eval(chart_pos, t);
                v.record_true_magnitude();
                self.style.apply(&mut v, self.vector_scale, self.vector_cap);
                v
            })
            .collect();
        FieldSnapshot {
            cols: self.cols,
            rows: self.rows,
            t,
            cells,
        }
    }
}

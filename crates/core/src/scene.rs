//! Reproducible description of a visualizer session.
//!
//! A [`Scene`] captures everything needed to recreate a run: canvas and grid
//! geometry, chart range, the ODE system and its parameters, display style,
//! integration settings, PRNG seed and initial seed points.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coords::CoordinateRange;
use crate::error::VizError;
use crate::ode::SystemKind;
use crate::params::{param_bool, param_f64, param_points, param_string, param_usize};
use crate::sampler::{FieldSampler, FieldStyle};
use crate::trajectory::TrajectoryIntegrator;
use crate::vector::Vector;

/// Pixel size of one vector-grid cell used to derive default grid dimensions.
pub const DEFAULT_CELL_SIZE: f64 = 15.0;
/// Pixels per chart unit used to derive the default range.
pub const DEFAULT_PIXELS_PER_UNIT: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub cols: usize,
    pub rows: usize,
    pub range: CoordinateRange,
    pub system: String,
    pub system_params: Value,
    pub style: FieldStyle,
    pub vector_scale: f64,
    pub vector_cap: f64,
    pub color_scale: f64,
    pub color_pivot: f64,
    pub color_continuum: bool,
    pub step_size: f64,
    pub iteration_count: usize,
    pub speed: f64,
    pub seed: u64,
    /// Seed points placed at startup, in canvas pixels.
    pub points: Vec<Vector>,
    /// Extra uniformly random seed points placed at startup.
    pub random_points: usize,
}

impl Scene {
    /// Default scene for a `width × height` canvas: 15 px cells and a range
    /// of one chart unit per 100 px on each side of the origin.
    pub fn with_canvas(width: f64, height: f64) -> Self {
        let half_x = width / DEFAULT_PIXELS_PER_UNIT;
        let half_y = height / DEFAULT_PIXELS_PER_UNIT;
        Self {
            width,
            height,
            cols: grid_count(width),
            rows: grid_count(height),
            range: CoordinateRange {
                x_neg: -half_x,
                x_pos: half_x,
                y_neg: -half_y,
                y_pos: half_y,
            },
            system: "pendulum".to_string(),
            system_params: Value::Object(serde_json::Map::new()),
            style: FieldStyle::Cap,
            vector_scale: FieldSampler::DEFAULT_VECTOR_SCALE,
            vector_cap: FieldSampler::DEFAULT_VECTOR_CAP,
            color_scale: 255.0,
            color_pivot: 255.0,
            color_continuum: true,
            step_size: TrajectoryIntegrator::DEFAULT_STEP_SIZE,
            iteration_count: TrajectoryIntegrator::DEFAULT_ITERATION_COUNT,
            speed: 1.0,
            seed: 42,
            points: Vec::new(),
            random_points: 0,
        }
    }

    /// Reads a loosely structured JSON object. Missing or mistyped keys take
    /// their defaults; only an unparseable style name is an error. Geometry
    /// defaults follow `width`/`height` when the file sets only those.
    pub fn from_json(value: &Value) -> Result<Self, VizError> {
        let width = param_f64(value, "width", 800.0);
        let height = param_f64(value, "height", 600.0);
        let d = Self::with_canvas(width, height);

        let range = match value.get("range") {
            Some(r) => CoordinateRange {
                x_neg: param_f64(r, "x_neg", d.range.x_neg),
                x_pos: param_f64(r, "x_pos", d.range.x_pos),
                y_neg: param_f64(r, "y_neg", d.range.y_neg),
                y_pos: param_f64(r, "y_pos", d.range.y_pos),
            },
            None => d.range,
        };
        let style = match value.get("style").and_then(Value::as_str) {
            Some(name) => name.parse()?,
            None => d.style,
        };

        Ok(Self {
            cols: param_usize(value, "cols", d.cols),
            rows: param_usize(value, "rows", d.rows),
            range,
            system: param_string(value, "system", &d.system),
            system_params: value
                .get("system_params")
                .cloned()
                .unwrap_or_else(|| d.system_params.clone()),
            style,
            vector_scale: param_f64(value, "vector_scale", d.vector_scale),
            vector_cap: param_f64(value, "vector_cap", d.vector_cap),
            color_scale: param_f64(value, "color_scale", d.color_scale),
            color_pivot: param_f64(value, "color_pivot", d.color_pivot),
            color_continuum: param_bool(value, "color_continuum", d.color_continuum),
            step_size: param_f64(value, "step_size", d.step_size),
            iteration_count: param_usize(value, "iteration_count", d.iteration_count),
            speed: param_f64(value, "speed", d.speed),
            seed: value.get("seed").and_then(Value::as_u64).unwrap_or(d.seed),
            points: param_points(value, "points"),
            random_points: param_usize(value, "random_points", d.random_points),
            ..d
        })
    }

    /// Parses JSON text and reads it with [`Scene::from_json`].
    pub fn from_json_str(text: &str) -> Result<Self, VizError> {
        let value: Value = serde_json::from_str(text).map_err(|e| VizError::InvalidSetting {
            name: "scene".to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&value)
    }

    /// Rejects geometry and settings the visualizer cannot run with.
    pub fn validate(&self) -> Result<(), VizError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(VizError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.cols == 0 || self.rows == 0 {
            return Err(VizError::InvalidGrid {
                cols: self.cols,
                rows: self.rows,
            });
        }
        self.range.validate()?;
        positive("step_size", self.step_size)?;
        positive("vector_cap", self.vector_cap)?;
        positive("color_pivot", self.color_pivot)?;
        finite("vector_scale", self.vector_scale)?;
        finite("color_scale", self.color_scale)?;
        finite("speed", self.speed)?;
        if let Some(p) = self.points.iter().find(|p| !p.is_finite()) {
            return Err(VizError::InvalidSetting {
                name: "points".to_string(),
                reason: format!("non-finite seed point ({}, {})", p.x, p.y),
            });
        }
        if !SystemKind::list_names().contains(&self.system.as_str()) {
            return Err(VizError::UnknownSystem(self.system.clone()));
        }
        Ok(())
    }

    /// Instantiates the named built-in system with this scene's parameters.
    pub fn build_system(&self) -> Result<SystemKind, VizError> {
        SystemKind::from_name(&self.system, &self.system_params)
    }

    pub fn canvas_bounds(&self) -> Vector {
        Vector::new(self.width, self.height)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::with_canvas(800.0, 600.0)
    }
}

fn grid_count(pixels: f64) -> usize {
    if pixels.is_finite() && pixels > 0.0 {
        (pixels / DEFAULT_CELL_SIZE).floor() as usize
    } else {
        0
    }
}

pub(crate) fn positive(name: &str, value: f64) -> Result<(), VizError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(VizError::InvalidSetting {
            name: name.to_string(),
            reason: format!("must be positive and finite, got {value}"),
        })
    }
}

fn finite(name: &str, value: f64) -> Result<(), VizError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(VizError::InvalidSetting {
            name: name.to_string(),
            reason: format!("must be finite, got {value}"),
        })
    }
}

//! Drawing-surface abstraction and the draw command list.
//!
//! The renderer never draws directly. It emits [`DrawCommand`]s that a host
//! replays onto whatever implements [`DrawSurface`]: a browser canvas, the
//! raster surface in `ode-viz-raster`, or the [`CommandRecorder`] used in
//! tests and JSON dumps.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::vector::Vector;

/// Minimal immediate-mode 2D drawing target.
pub trait DrawSurface {
    fn clear(&mut self);
    fn set_stroke_color(&mut self, color: Srgb);
    fn set_fill_color(&mut self, color: Srgb);
    fn set_line_width(&mut self, width: f64);
    /// Strokes a segment with the current stroke color and width.
    fn draw_line(&mut self, from: Vector, to: Vector);
    /// Fills an axis-aligned ellipse with the current fill color.
    fn draw_ellipse(&mut self, center: Vector, radius_x: f64, radius_y: f64);

    /// Strokes consecutive segments through `points`.
    fn draw_polyline(&mut self, points: &[Vector]) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1]);
        }
    }
}

/// One drawing primitive or state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    StrokeColor { color: Srgb },
    FillColor { color: Srgb },
    LineWidth { width: f64 },
    Line { from: Vector, to: Vector },
    Ellipse { center: Vector, rx: f64, ry: f64 },
    Polyline { points: Vec<Vector> },
}

impl DrawCommand {
    /// Executes this command against `surface`.
    pub fn apply(&self, surface: &mut dyn DrawSurface) {
        match self {
            DrawCommand::Clear => surface.clear(),
            DrawCommand::StrokeColor { color } => surface.set_stroke_color(*color),
            DrawCommand::FillColor { color } => surface.set_fill_color(*color),
            DrawCommand::LineWidth { width } => surface.set_line_width(*width),
            DrawCommand::Line { from, to } => surface.draw_line(*from, *to),
            DrawCommand::Ellipse { center, rx, ry } => surface.draw_ellipse(*center, *rx, *ry),
            DrawCommand::Polyline { points } => surface.draw_polyline(points),
        }
    }
}

/// Replays `commands` in order.
pub fn replay(commands: &[DrawCommand], surface: &mut dyn DrawSurface) {
    for cmd in commands {
        cmd.apply(surface);
    }
}

/// A surface that just stores what it was asked to draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands recorded since the last `clear`.
    pub fn current_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| *c == DrawCommand::Clear)
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `clear` calls, i.e. frames started.
    pub fn frames(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| **c == DrawCommand::Clear)
            .count()
    }
}

impl DrawSurface for CommandRecorder {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_stroke_color(&mut self, color: Srgb) {
        self.commands.push(DrawCommand::StrokeColor { color });
    }

    fn set_fill_color(&mut self, color: Srgb) {
        self.commands.push(DrawCommand::FillColor { color });
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth { width });
    }

    fn draw_line(&mut self, from: Vector, to: Vector) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn draw_ellipse(&mut self, center: Vector, radius_x: f64, radius_y: f64) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            rx: radius_x,
            ry: radius_y,
        });
    }

    fn draw_polyline(&mut self, points: &[Vector]) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
        });
    }
}

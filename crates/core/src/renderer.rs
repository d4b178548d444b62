//! Turns a field snapshot and trajectory traces into draw commands.

use crate::color::Srgb;
use crate::palette::ColorContinuum;
use crate::sampler::{FieldSampler, FieldSnapshot};
use crate::settings::DrawSettings;
use crate::surface::{replay, DrawCommand, DrawSurface};
use crate::trajectory::Trace;
use crate::vector::Vector;

pub const AXIS_WIDTH: f64 = 2.0;
pub const FIELD_LINE_WIDTH: f64 = 1.0;
pub const FIELD_DOT_RADIUS: f64 = 1.0;
pub const TRAJECTORY_WIDTH: f64 = 1.5;
pub const SEED_MARKER_RADIUS: f64 = 3.0;

/// Builds frames as ordered command lists: clear, axes, vector field,
/// trajectories. Passes disabled in [`DrawSettings`] are skipped.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    continuum: ColorContinuum,
    color_scale: f64,
}

impl FrameRenderer {
    pub const DEFAULT_COLOR_SCALE: f64 = 255.0;

    pub fn new(continuum: ColorContinuum, color_scale: f64) -> Self {
        Self {
            continuum,
            color_scale,
        }
    }

    pub fn continuum(&self) -> &ColorContinuum {
        &self.continuum
    }

    pub fn continuum_mut(&mut self) -> &mut ColorContinuum {
        &mut self.continuum
    }

    pub fn color_scale(&self) -> f64 {
        self.color_scale
    }

    /// Color of a field cell whose unscaled magnitude is `true_magnitude`.
    pub fn field_color(&self, true_magnitude: f64, settings: &DrawSettings) -> Srgb {
        match (settings.color, settings.color_continuum) {
            (true, true) => self.continuum.color_for(true_magnitude * self.color_scale),
            (true, false) => Srgb::LIGHT_BLUE,
            (false, _) => Srgb::WHITE,
        }
    }

    pub fn render(
        &self,
        snapshot: &FieldSnapshot,
        traces: &[Trace],
        settings: &DrawSettings,
        sampler: &FieldSampler,
    ) -> Vec<DrawCommand> {
        let mut cmds = vec![DrawCommand::Clear];
        if settings.axes_pass {
            self.axes_pass(sampler, &mut cmds);
        }
        if settings.vector_field_pass {
            self.field_pass(snapshot, settings, sampler, &mut cmds);
        }
        if settings.line_pass {
            self.trajectory_pass(traces, &mut cmds);
        }
        cmds
    }

    /// Renders straight onto `surface`.
    pub fn draw(
        &self,
        snapshot: &FieldSnapshot,
        traces: &[Trace],
        settings: &DrawSettings,
        sampler: &FieldSampler,
        surface: &mut dyn DrawSurface,
    ) {
        replay(&self.render(snapshot, traces, settings, sampler), surface);
    }

    fn axes_pass(&self, sampler: &FieldSampler, cmds: &mut Vec<DrawCommand>) {
        let bounds = sampler.canvas_bounds();
        let origin = sampler.range().origin_on_canvas(bounds);
        cmds.push(DrawCommand::StrokeColor {
            color: Srgb::WHITE,
        });
        cmds.push(DrawCommand::LineWidth { width: AXIS_WIDTH });
        cmds.push(DrawCommand::Line {
            from: Vector::new(origin.x, 0.0),
            to: Vector::new(origin.x, bounds.y),
        });
        cmds.push(DrawCommand::Line {
            from: Vector::new(0.0, origin.y),
            to: Vector::new(bounds.x, origin.y),
        });
    }

    fn field_pass(
        &self,
        snapshot: &FieldSnapshot,
        settings: &DrawSettings,
        sampler: &FieldSampler,
        cmds: &mut Vec<DrawCommand>,
    ) {
        cmds.push(DrawCommand::LineWidth {
            width: FIELD_LINE_WIDTH,
        });
        for (i, j, v) in snapshot.iter() {
            let color = self.field_color(v.true_magnitude(), settings);
            let center = sampler.cell_center(i, j);
            cmds.push(DrawCommand::StrokeColor { color });
            cmds.push(DrawCommand::FillColor { color });
            cmds.push(DrawCommand::Ellipse {
                center,
                rx: FIELD_DOT_RADIUS,
                ry: FIELD_DOT_RADIUS,
            });
            cmds.push(DrawCommand::Line {
                from: center,
                to: center + v,
            });
        }
    }

    fn trajectory_pass(&self, traces: &[Trace], cmds: &mut Vec<DrawCommand>) {
        for trace in traces {
            cmds.push(DrawCommand::FillColor {
                color: Srgb::ORANGE,
            });
            cmds.push(DrawCommand::Ellipse {
                center: trace.origin,
                rx: SEED_MARKER_RADIUS,
                ry: SEED_MARKER_RADIUS,
            });
            cmds.push(DrawCommand::StrokeColor {
                color: Srgb::WHITE,
            });
            cmds.push(DrawCommand::LineWidth {
                width: TRAJECTORY_WIDTH,
            });
            cmds.push(DrawCommand::Polyline {
                points: trace.path.clone(),
            });
        }
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(
            ColorContinuum::new(Default::default(), Self::DEFAULT_COLOR_SCALE),
            Self::DEFAULT_COLOR_SCALE,
        )
    }
}

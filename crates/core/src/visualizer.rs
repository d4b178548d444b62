//! The application context: one owned value holding every piece of session
//! state, threaded through the host's frame loop and input handlers.

use std::time::Duration;

use crate::animation::AnimationController;
use crate::error::VizError;
use crate::ode::OdeSystem;
use crate::palette::{ColorContinuum, Palette};
use crate::prng::Xorshift64;
use crate::renderer::FrameRenderer;
use crate::sampler::{FieldSampler, FieldSnapshot, FieldStyle};
use crate::scene::{positive, Scene};
use crate::settings::DrawSettings;
use crate::surface::DrawSurface;
use crate::trajectory::{Trace, TrajectoryIntegrator};
use crate::vector::Vector;

/// Pixel radius searched by [`InputEvent::RemoveNear`].
pub const REMOVE_THRESHOLD: f64 = 5.0;

/// A user interaction applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pivot(f64),
    StepSize(f64),
    IterationCount(usize),
    FieldStyle(FieldStyle),
    ColorContinuum(bool),
    /// Canvas-space click: places a seed when inside the canvas.
    Click(Vector),
    /// Canvas-space secondary click: removes the nearest seed.
    RemoveNear(Vector),
}

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was drawn; schedule the next tick.
    Continue,
    /// Stopped; do not reschedule.
    Idle,
}

pub struct Visualizer {
    sampler: FieldSampler,
    integrator: TrajectoryIntegrator,
    system: Box<dyn OdeSystem>,
    renderer: FrameRenderer,
    controller: AnimationController,
    rng: Xorshift64,
    color_continuum: bool,
    snapshot: FieldSnapshot,
    traces: Vec<Trace>,
}

impl Visualizer {
    /// Builds a visualizer for `scene` driven by `system`. Nothing is drawn
    /// until [`Visualizer::init`].
    pub fn new(scene: &Scene, system: Box<dyn OdeSystem>) -> Result<Self, VizError> {
        scene.validate()?;
        let sampler = FieldSampler::new(
            scene.width,
            scene.height,
            scene.cols,
            scene.rows,
            scene.range,
        )?
        .with_style(scene.style, scene.vector_scale, scene.vector_cap);
        let mut integrator = TrajectoryIntegrator::new(scene.canvas_bounds(), scene.range);
        integrator.set_step_size(scene.step_size);
        integrator.set_iteration_count(scene.iteration_count);

        let mut rng = Xorshift64::new(scene.seed);
        for &p in &scene.points {
            integrator.place_seed(p);
        }
        for _ in 0..scene.random_points {
            integrator.place_seed(rng.next_point(scene.width, scene.height));
        }

        let mut controller = AnimationController::new(scene.speed);
        if !integrator.is_empty() {
            controller.note_randomized();
        }

        let renderer = FrameRenderer::new(
            ColorContinuum::new(Palette::heat(), scene.color_pivot),
            scene.color_scale,
        );
        let snapshot = sampler.sample_at(system.as_ref(), 0.0);

        Ok(Self {
            sampler,
            integrator,
            system,
            renderer,
            controller,
            rng,
            color_continuum: scene.color_continuum,
            snapshot,
            traces: Vec::new(),
        })
    }

    /// Builds the scene's named built-in system and a visualizer around it.
    pub fn from_scene(scene: &Scene) -> Result<Self, VizError> {
        let system = scene.build_system()?;
        Self::new(scene, Box::new(system))
    }

    /// Draws the initial `t = 0` frame without touching the seed points.
    pub fn init(&mut self, surface: &mut dyn DrawSurface) {
        self.reset(DrawSettings::no_randomize(), surface);
    }

    pub fn start(&mut self, now: Duration) {
        self.controller.start(now);
    }

    /// Draws one frame at the controller's current time.
    pub fn tick(&mut self, now: Duration, surface: &mut dyn DrawSurface) -> TickOutcome {
        match self.controller.advance(now) {
            Some(t) => {
                let settings = self.controller.run_settings();
                self.draw_frame(t, settings, surface);
                TickOutcome::Continue
            }
            None => TickOutcome::Idle,
        }
    }

    /// Stops the loop and immediately runs the reset pass. Returns the
    /// settings that pass used.
    pub fn stop(&mut self, surface: &mut dyn DrawSurface) -> DrawSettings {
        let settings = self.controller.stop();
        self.reset(settings, surface);
        settings
    }

    /// Samples at `t = 0`, optionally replaces the seeds with one random
    /// point, and draws the `t = 0` frame.
    pub fn reset(&mut self, settings: DrawSettings, surface: &mut dyn DrawSurface) {
        if settings.randomize_points {
            let rng = &mut self.rng;
            self.integrator.reseed(1, |w, h| rng.next_point(w, h));
            self.controller.note_randomized();
        }
        self.draw_frame(0.0, settings, surface);
    }

    /// Redraws the `t = 0` frame when stopped. Returns whether it drew.
    pub fn refresh(&mut self, surface: &mut dyn DrawSurface) -> bool {
        if self.controller.is_running() {
            return false;
        }
        self.reset(DrawSettings::no_randomize(), surface);
        true
    }

    /// Applies `event`, then refreshes. Returns `Ok(false)` for a click
    /// outside the canvas or a removal that found no seed, in which case
    /// nothing is redrawn.
    ///
    /// A pivot or step size that is not positive and finite is rejected with
    /// the same error a scene file would get, and leaves the state untouched.
    pub fn apply_input(
        &mut self,
        event: InputEvent,
        surface: &mut dyn DrawSurface,
    ) -> Result<bool, VizError> {
        match event {
            InputEvent::Pivot(pivot) => {
                positive("color_pivot", pivot)?;
                self.renderer.continuum_mut().set_pivot(pivot);
            }
            InputEvent::StepSize(step) => {
                positive("step_size", step)?;
                self.integrator.set_step_size(step);
            }
            InputEvent::IterationCount(n) => self.integrator.set_iteration_count(n),
            InputEvent::FieldStyle(style) => self.sampler.set_style(style),
            InputEvent::ColorContinuum(enabled) => self.color_continuum = enabled,
            InputEvent::Click(pos) => {
                let bounds = self.sampler.canvas_bounds();
                if !pos.within_rect(0.0, 0.0, bounds.x, bounds.y) {
                    return Ok(false);
                }
                self.controller.note_randomized();
                self.integrator.place_seed(pos);
            }
            InputEvent::RemoveNear(pos) => {
                if self.integrator.remove_nearest(pos, REMOVE_THRESHOLD).is_none() {
                    return Ok(false);
                }
            }
        }
        self.refresh(surface);
        Ok(true)
    }

    fn draw_frame(&mut self, t: f64, settings: DrawSettings, surface: &mut dyn DrawSurface) {
        let settings = settings.with_color_continuum(self.color_continuum);
        self.snapshot = self.sampler.sample_at(self.system.as_ref(), t);
        self.traces = if settings.line_pass {
            self.integrator.replay(self.system.as_ref(), t)
        } else {
            Vec::new()
        };
        self.renderer
            .draw(&self.snapshot, &self.traces, &settings, &self.sampler, surface);
    }

    pub fn status_line(&self) -> String {
        self.controller.status_line()
    }

    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AnimationController {
        &mut self.controller
    }

    pub fn sampler(&self) -> &FieldSampler {
        &self.sampler
    }

    pub fn integrator(&self) -> &TrajectoryIntegrator {
        &self.integrator
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn system(&self) -> &dyn OdeSystem {
        self.system.as_ref()
    }

    /// Field snapshot behind the last drawn frame.
    pub fn snapshot(&self) -> &FieldSnapshot {
        &self.snapshot
    }

    /// Trajectory polylines behind the last drawn frame.
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn color_continuum(&self) -> bool {
        self.color_continuum
    }
}

#![deny(unsafe_code)]
//! Core of the ode-viz planar ODE visualizer.
//!
//! Samples a 2D system `x' = f(x, y, t)`, `y' = g(x, y, t)` on a grid of
//! cells, integrates seed points into trajectories with fixed-length Euler
//! steps, and renders each frame as a list of [`DrawCommand`]s for any
//! [`DrawSurface`]. The [`Visualizer`] owns all session state and is driven
//! by the host's clock and input events.

pub mod animation;
pub mod color;
pub mod coords;
pub mod error;
pub mod ode;
pub mod palette;
pub mod params;
pub mod prng;
pub mod renderer;
pub mod sampler;
pub mod scene;
pub mod settings;
pub mod surface;
pub mod trajectory;
pub mod vector;
pub mod visualizer;

pub use animation::{AnimationController, AnimationState, RunState};
pub use color::Srgb;
pub use coords::CoordinateRange;
pub use error::VizError;
pub use ode::{FnSystem, OdeSystem, SystemKind};
pub use palette::{ColorContinuum, Palette};
pub use prng::Xorshift64;
pub use renderer::FrameRenderer;
pub use sampler::{FieldSampler, FieldSnapshot, FieldStyle};
pub use scene::Scene;
pub use settings::DrawSettings;
pub use surface::{CommandRecorder, DrawCommand, DrawSurface};
pub use trajectory::{Point, PointState, StepResult, Trace, Trajectory, TrajectoryIntegrator};
pub use vector::Vector;
pub use visualizer::{InputEvent, TickOutcome, Visualizer};

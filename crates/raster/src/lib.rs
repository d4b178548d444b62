#![deny(unsafe_code)]
//! Headless rendering for ode-viz.
//!
//! [`RasterSurface`] implements [`DrawSurface`](ode_viz_core::DrawSurface)
//! over an in-memory RGBA8 buffer so frames can be produced without a
//! window. The `png` feature (default on) adds [`snapshot::write_png`];
//! the rasterizer itself has no feature gate.

pub mod surface;

#[cfg(feature = "png")]
pub mod snapshot;

pub use surface::RasterSurface;

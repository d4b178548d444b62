//! PNG output for a [`RasterSurface`].
//!
//! Feature-gated behind `png` (default on) so the rasterizer can be used
//! without pulling in the `image` crate.

use ode_viz_core::error::VizError;
use std::path::Path;

use crate::surface::RasterSurface;

/// Writes the surface as an RGBA PNG.
///
/// Returns `VizError::InvalidDimensions` if the surface does not fit `u32`
/// dimensions, or `VizError::Io` on write failure.
pub fn write_png(surface: &RasterSurface, path: &Path) -> Result<(), VizError> {
    let invalid = || VizError::InvalidDimensions {
        width: surface.width() as f64,
        height: surface.height() as f64,
    };
    let w = u32::try_from(surface.width()).map_err(|_| invalid())?;
    let h = u32::try_from(surface.height()).map_err(|_| invalid())?;
    let img = image::RgbaImage::from_raw(w, h, surface.as_rgba().to_vec())
        .ok_or_else(|| VizError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| VizError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ode_viz_core::color::Srgb;
    use ode_viz_core::surface::DrawSurface;
    use ode_viz_core::vector::Vector;

    #[test]
    fn write_png_round_trip() {
        let mut surface = RasterSurface::new(16, 12).unwrap();
        surface.set_fill_color(Srgb::ORANGE);
        surface.draw_ellipse(Vector::new(8.0, 6.0), 3.0, 3.0);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        write_png(&surface, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 12);
        assert_eq!(img.get_pixel(8, 6).0, [255, 165, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn write_png_into_missing_directory_is_io_error() {
        let surface = RasterSurface::new(4, 4).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        assert!(matches!(write_png(&surface, &path), Err(VizError::Io(_))));
    }
}

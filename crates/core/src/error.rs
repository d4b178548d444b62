//! Error types for the ode-viz core.

use thiserror::Error;

/// Errors produced while configuring or driving a visualizer.
///
/// Numeric work itself never fails: degenerate geometry and non-finite ODE
/// output propagate as values. These variants cover configuration that is
/// rejected up front.
#[derive(Debug, Error)]
pub enum VizError {
    /// Canvas width or height was zero, negative or non-finite.
    #[error("invalid dimensions: canvas width and height must be positive, got {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    /// The vector grid had zero rows or columns.
    #[error("invalid grid: rows and cols must be non-zero, got {cols}x{rows}")]
    InvalidGrid { cols: usize, rows: usize },

    /// A chart range whose positive bound does not exceed its negative bound.
    #[error("degenerate {axis} range: [{neg}, {pos}] must satisfy neg < pos")]
    DegenerateRange { axis: char, neg: f64, pos: f64 },

    /// A requested ODE system name is not registered.
    #[error("unknown system: {0}")]
    UnknownSystem(String),

    /// A field style string could not be parsed.
    #[error("unknown field style: {0}")]
    UnknownStyle(String),

    /// A numeric setting was outside its accepted range.
    #[error("invalid setting '{name}': {reason}")]
    InvalidSetting { name: String, reason: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A file could not be written or read.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_both_sides() {
        let err = VizError::InvalidDimensions {
            width: 0.0,
            height: 480.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("0x480"), "unexpected message: {msg}");
    }

    #[test]
    fn invalid_grid_mentions_rows_and_cols() {
        let msg = VizError::InvalidGrid { cols: 0, rows: 12 }.to_string();
        assert!(msg.contains("rows") && msg.contains("cols"), "{msg}");
        assert!(msg.contains("0x12"), "{msg}");
    }

    #[test]
    fn degenerate_range_names_axis_and_bounds() {
        let err = VizError::DegenerateRange {
            axis: 'y',
            neg: 2.0,
            pos: -2.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("y range"), "missing axis in: {msg}");
        assert!(msg.contains("[2, -2]"), "missing bounds in: {msg}");
    }

    #[test]
    fn unknown_system_includes_name() {
        let msg = VizError::UnknownSystem("lorenz".into()).to_string();
        assert!(msg.contains("lorenz"), "{msg}");
    }

    #[test]
    fn invalid_setting_includes_name_and_reason() {
        let err = VizError::InvalidSetting {
            name: "step_size".into(),
            reason: "must be finite".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("step_size"), "{msg}");
        assert!(msg.contains("must be finite"), "{msg}");
    }

    #[test]
    fn viz_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VizError>();
    }

    #[test]
    fn viz_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<VizError>();
    }
}

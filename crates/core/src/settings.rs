//! Per-frame rendering switches.

use serde::{Deserialize, Serialize};

/// Independent toggles for each rendering pass of a frame.
///
/// `randomize_points` is only consulted by a reset pass, where it decides
/// whether the seed points are replaced by a fresh random one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSettings {
    pub line_pass: bool,
    pub color: bool,
    pub vector_field_pass: bool,
    pub randomize_points: bool,
    pub axes_pass: bool,
    pub color_continuum: bool,
}

impl DrawSettings {
    /// Every pass on, including point randomization on reset.
    pub fn full() -> Self {
        Self {
            line_pass: true,
            color: true,
            vector_field_pass: true,
            randomize_points: true,
            axes_pass: true,
            color_continuum: true,
        }
    }

    /// Same as [`DrawSettings::full`] but keeps existing seed points.
    pub fn no_randomize() -> Self {
        Self {
            randomize_points: false,
            ..Self::full()
        }
    }

    pub fn with_color_continuum(mut self, enabled: bool) -> Self {
        self.color_continuum = enabled;
        self
    }
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_randomize_differs_only_in_randomize_flag() {
        let full = DrawSettings::full();
        let quiet = DrawSettings::no_randomize();
        assert!(full.randomize_points);
        assert!(!quiet.randomize_points);
        assert_eq!(
            DrawSettings {
                randomize_points: true,
                ..quiet
            },
            full
        );
    }

    #[test]
    fn with_color_continuum_touches_one_flag() {
        let s = DrawSettings::full().with_color_continuum(false);
        assert!(!s.color_continuum);
        assert!(s.color && s.axes_pass && s.line_pass && s.vector_field_pass);
    }

    #[test]
    fn serde_round_trip() {
        let s = DrawSettings::no_randomize();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"randomize_points\":false"));
        let back: DrawSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}

//! Failures of the `ode-viz` binary and the exit code each one maps to.
//!
//! | code | meaning |
//! |---|---|
//! | 2  | clap rejected the command line |
//! | 10 | the core refused the scene (unknown system, bad geometry or setting) |
//! | 11 | a scene file could not be read, or the PNG could not be written |
//! | 12 | malformed scene file, flag JSON or flag value |
//! | 13 | the JSON report could not be serialized |

use ode_viz_core::VizError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Viz(VizError),

    #[error("cannot read scene {}: {source}", path.display())]
    SceneRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("scene {} is not valid JSON: {source}", path.display())]
    SceneParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("scene {} must hold a JSON object", path.display())]
    SceneNotObject { path: PathBuf },

    #[error("invalid --{flag} JSON: {source}")]
    FlagJson {
        flag: &'static str,
        source: serde_json::Error,
    },

    #[error("invalid --{flag}: {reason}")]
    FlagValue { flag: &'static str, reason: String },

    #[error("cannot write snapshot: {0}")]
    Snapshot(String),

    #[error("cannot serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Viz(_) => 10,
            CliError::SceneRead { .. } | CliError::Snapshot(_) => 11,
            CliError::SceneParse { .. }
            | CliError::SceneNotObject { .. }
            | CliError::FlagJson { .. }
            | CliError::FlagValue { .. } => 12,
            CliError::Report(_) => 13,
        }
    }
}

/// Core I/O failures only arise while writing the PNG.
impl From<VizError> for CliError {
    fn from(e: VizError) -> Self {
        match e {
            VizError::Io(msg) => CliError::Snapshot(msg),
            other => CliError::Viz(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{oops").unwrap_err()
    }

    #[test]
    fn scene_errors_name_the_file() {
        let path = PathBuf::from("scenes/vortex.json");
        let read = CliError::SceneRead {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(read.exit_code(), 11);
        assert!(read.to_string().contains("scenes/vortex.json"));

        let parse = CliError::SceneParse {
            path,
            source: json_error(),
        };
        assert_eq!(parse.exit_code(), 12);
        assert!(parse.to_string().starts_with("scene scenes/vortex.json is not valid JSON"));
    }

    #[test]
    fn flag_errors_name_the_flag() {
        let err = CliError::FlagJson {
            flag: "points",
            source: json_error(),
        };
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().starts_with("invalid --points JSON"));

        let err = CliError::FlagValue {
            flag: "fps",
            reason: "must be positive, got 0".into(),
        };
        assert_eq!(err.exit_code(), 12);
        assert_eq!(err.to_string(), "invalid --fps: must be positive, got 0");
    }

    #[test]
    fn core_io_becomes_snapshot_failure() {
        let err = CliError::from(VizError::Io("disk full".into()));
        assert!(matches!(err, CliError::Snapshot(_)));
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn core_config_errors_keep_their_message() {
        let err = CliError::from(VizError::UnknownStyle("wavy".into()));
        assert_eq!(err.exit_code(), 10);
        assert_eq!(err.to_string(), VizError::UnknownStyle("wavy".into()).to_string());
    }

    #[test]
    fn report_failure_is_exit_13() {
        assert_eq!(CliError::from(json_error()).exit_code(), 13);
    }
}

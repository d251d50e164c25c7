//! Error types for toolpath generation.
//!
//! Warnings ride along with valid results (see `bladekit_core::WarningItem`);
//! the variants here are fatal. A fatal condition aborts the generation
//! call before any G-code is written, so a partial or unsafe program never
//! reaches disk.

use bladekit_settings::ConfigError;
use std::io;
use thiserror::Error;

/// Fatal errors during toolpath generation.
#[derive(Error, Debug)]
pub enum ToolpathError {
    /// The path ended while the blade was still retracted, rotating or
    /// replunging. Emitting the program would leave the machine in an
    /// unsafe half-transition, so generation aborts instead.
    #[error("Unresolved retract at point {index}: path ended while {state}")]
    UnresolvedRetract { index: usize, state: &'static str },

    /// A required setting is missing or out of physical range.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No valid mapping between the orientation source path and the 3D
    /// toolpath could be established.
    #[error("No angle correspondence: {reason} (source points: {points_2d}, toolpath points: {points_3d})")]
    Correspondence {
        reason: String,
        points_2d: usize,
        points_3d: usize,
    },

    /// I/O error while writing program output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for toolpath generation.
pub type ToolpathResult<T> = Result<T, ToolpathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_retract_display() {
        let err = ToolpathError::UnresolvedRetract {
            index: 42,
            state: "rotating",
        };
        assert_eq!(
            err.to_string(),
            "Unresolved retract at point 42: path ended while rotating"
        );
    }

    #[test]
    fn test_correspondence_display() {
        let err = ToolpathError::Correspondence {
            reason: "source path has zero arc length".to_string(),
            points_2d: 12,
            points_3d: 300,
        };
        assert_eq!(
            err.to_string(),
            "No angle correspondence: source path has zero arc length (source points: 12, toolpath points: 300)"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = ConfigError::MissingValue("gcode.spindle_on_mcode".to_string());
        let err: ToolpathError = config_err.into();
        assert!(matches!(err, ToolpathError::Config(_)));
    }
}

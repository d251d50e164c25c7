//! Post-processor configuration.
//!
//! Configuration is organized into logical sections:
//! - Machine heights, jump repositioning and the G53 park position
//! - G-code output policy (axes, modal A step, retract-on-turn, feeds, spindle)
//! - Blade-orientation parameters (smoothing, corners, pivots, attachment)
//!
//! Every section derives serde with per-field defaults, so a partial config
//! file only overrides what it names. `Config::validate` must pass before a
//! generation run starts; validation failures are fatal and nothing is
//! emitted.

use crate::error::{ConfigError, ConfigResult};
use bladekit_core::{AttachMethod, OutputAxes};
use serde::{Deserialize, Serialize};

/// Machine geometry and travel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Height where the blade is clear of the workpiece (mm).
    pub z_safe_mm: f64,
    /// Cutting depth for 2D workflows (mm).
    pub z_cut_mm: f64,
    /// XY gap between consecutive points that triggers a safe-height
    /// reposition instead of a dragged cut (mm).
    pub jump_threshold_mm: f64,
    /// Park in machine coordinates (G53) before switching to G54.
    pub use_g53_park: bool,
    /// Park position, machine coordinates (mm).
    pub g53_park_x: f64,
    pub g53_park_y: f64,
    pub g53_park_z: f64,
    /// Optional park angle for the rotary axis (degrees).
    pub g53_park_a: Option<f64>,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            z_safe_mm: 5.0,
            z_cut_mm: -1.0,
            jump_threshold_mm: 2.0,
            use_g53_park: false,
            g53_park_x: 0.0,
            g53_park_y: 0.0,
            g53_park_z: 0.0,
            g53_park_a: None,
        }
    }
}

impl MachineSettings {
    /// Validate physical consistency of the machine section.
    pub fn validate(&self) -> ConfigResult<()> {
        for (key, value) in [
            ("machine.z_safe_mm", self.z_safe_mm),
            ("machine.z_cut_mm", self.z_cut_mm),
            ("machine.jump_threshold_mm", self.jump_threshold_mm),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
        }
        if self.z_safe_mm <= self.z_cut_mm {
            return Err(ConfigError::Incompatible(format!(
                "z_safe_mm ({}) must be above z_cut_mm ({})",
                self.z_safe_mm, self.z_cut_mm
            )));
        }
        if self.jump_threshold_mm <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "machine.jump_threshold_mm".to_string(),
                value: self.jump_threshold_mm,
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// G-code output policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcodeSettings {
    /// Axis words the emitter may write.
    pub output_axes: OutputAxes,
    /// Modal suppression tolerance for the A word (degrees). Changes below
    /// this accumulate until they cross the step, avoiding controller
    /// jitter on near-zero rotations.
    pub a_min_step_deg: f64,
    /// Retract to safe height before large in-material direction changes.
    pub turn_retract_enabled: bool,
    /// Angle delta that forces a retract/rotate/replunge sequence (degrees).
    pub turn_retract_threshold_deg: f64,
    /// Cutting feed (mm/min).
    pub feed_xy_mm_min: f64,
    /// Plunge feed (mm/min).
    pub feed_z_mm_min: f64,
    /// Rotation feed for staged in-place pivots (deg/min).
    pub feed_a_deg_min: f64,
    /// Emit spindle M-codes around the cut.
    pub spindle_enabled: bool,
    /// Append `S<rpm>` to the spindle-on M-code.
    pub spindle_use_s: bool,
    pub spindle_rpm: f64,
    pub spindle_on_mcode: String,
    pub spindle_off_mcode: String,
}

impl Default for GcodeSettings {
    fn default() -> Self {
        Self {
            output_axes: OutputAxes::Xyza,
            a_min_step_deg: 0.0,
            turn_retract_enabled: true,
            turn_retract_threshold_deg: 45.0,
            feed_xy_mm_min: 2000.0,
            feed_z_mm_min: 500.0,
            feed_a_deg_min: 2000.0,
            spindle_enabled: false,
            spindle_use_s: false,
            spindle_rpm: 10000.0,
            spindle_on_mcode: "M3".to_string(),
            spindle_off_mcode: "M5".to_string(),
        }
    }
}

impl GcodeSettings {
    /// Validate the output-policy section.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.a_min_step_deg.is_finite() || self.a_min_step_deg < 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "gcode.a_min_step_deg".to_string(),
                value: self.a_min_step_deg,
                reason: "must be zero or positive".to_string(),
            });
        }
        if !self.turn_retract_threshold_deg.is_finite() || self.turn_retract_threshold_deg <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "gcode.turn_retract_threshold_deg".to_string(),
                value: self.turn_retract_threshold_deg,
                reason: "must be positive".to_string(),
            });
        }
        for (key, value) in [
            ("gcode.feed_xy_mm_min", self.feed_xy_mm_min),
            ("gcode.feed_z_mm_min", self.feed_z_mm_min),
            ("gcode.feed_a_deg_min", self.feed_a_deg_min),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value,
                    reason: "must be positive".to_string(),
                });
            }
        }
        if self.spindle_enabled {
            if self.spindle_on_mcode.trim().is_empty() {
                return Err(ConfigError::MissingValue(
                    "gcode.spindle_on_mcode".to_string(),
                ));
            }
            if self.spindle_off_mcode.trim().is_empty() {
                return Err(ConfigError::MissingValue(
                    "gcode.spindle_off_mcode".to_string(),
                ));
            }
            if !self.spindle_rpm.is_finite() || self.spindle_rpm < 0.0 {
                return Err(ConfigError::ValueOutOfRange {
                    key: "gcode.spindle_rpm".to_string(),
                    value: self.spindle_rpm,
                    reason: "must be zero or positive".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Blade-orientation parameters.
///
/// The corner threshold and smoothing window are policy knobs, not
/// universal constants; the defaults here mirror field-proven values but
/// every machine gets to override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleSettings {
    /// Moving-average window for tangent smoothing (points). 1 disables.
    pub smooth_window: usize,
    /// Direction change that marks a corner instead of a smoothing target
    /// (degrees).
    pub corner_threshold_deg: f64,
    /// Insert staged in-place rotation steps at corners.
    pub pivot_enable: bool,
    /// Number of intermediate steps per corner pivot.
    pub pivot_steps: usize,
    /// How orientation samples map onto the 3D toolpath.
    pub attach_method: AttachMethod,
}

impl Default for AngleSettings {
    fn default() -> Self {
        Self {
            smooth_window: 5,
            corner_threshold_deg: 25.0,
            pivot_enable: false,
            pivot_steps: 6,
            attach_method: AttachMethod::ArcLength,
        }
    }
}

impl AngleSettings {
    /// Validate the orientation section.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.smooth_window < 1 {
            return Err(ConfigError::ValueOutOfRange {
                key: "angle.smooth_window".to_string(),
                value: self.smooth_window as f64,
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.corner_threshold_deg.is_finite() || self.corner_threshold_deg <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "angle.corner_threshold_deg".to_string(),
                value: self.corner_threshold_deg,
                reason: "must be positive".to_string(),
            });
        }
        if self.pivot_enable && self.pivot_steps < 1 {
            return Err(ConfigError::ValueOutOfRange {
                key: "angle.pivot_steps".to_string(),
                value: self.pivot_steps as f64,
                reason: "must be at least 1 when pivoting is enabled".to_string(),
            });
        }
        Ok(())
    }
}

/// Complete post-processor configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub machine: MachineSettings,
    pub gcode: GcodeSettings,
    pub angle: AngleSettings,
}

impl Config {
    /// Validate every section. Must pass before any G-code is written.
    pub fn validate(&self) -> ConfigResult<()> {
        self.machine.validate()?;
        self.gcode.validate()?;
        self.angle.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.machine.z_safe_mm, 5.0);
        assert_eq!(config.gcode.turn_retract_threshold_deg, 45.0);
        assert_eq!(config.angle.smooth_window, 5);
        assert!(config.gcode.output_axes.includes_a());
    }

    #[test]
    fn test_inverted_heights_rejected() {
        let mut config = Config::default();
        config.machine.z_safe_mm = -2.0;
        config.machine.z_cut_mm = 1.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Incompatible(_)));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut config = Config::default();
        config.gcode.turn_retract_threshold_deg = -45.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::ValueOutOfRange { .. }));
    }

    #[test]
    fn test_negative_a_min_step_rejected() {
        let mut config = Config::default();
        config.gcode.a_min_step_deg = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spindle_requires_mcode() {
        let mut config = Config::default();
        config.gcode.spindle_enabled = true;
        config.gcode.spindle_on_mcode = " ".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue(_)));
    }

    #[test]
    fn test_pivot_steps_checked_only_when_enabled() {
        let mut config = Config::default();
        config.angle.pivot_steps = 0;
        assert!(config.validate().is_ok());
        config.angle.pivot_enable = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: Config = toml::from_str(
            r#"
            [gcode]
            output_axes = "XYZ"
            a_min_step_deg = 2.0
            "#,
        )
        .unwrap();
        assert!(!config.gcode.output_axes.includes_a());
        assert_eq!(config.gcode.a_min_step_deg, 2.0);
        // Unnamed sections keep their defaults.
        assert_eq!(config.machine.z_safe_mm, 5.0);
        assert_eq!(config.angle.pivot_steps, 6);
    }
}

//! Single-call program generation.
//!
//! One pass per request: orientation field, axis attachment, motion
//! planning, emission. Stages are pure transformations over immutable
//! inputs, so repeated or concurrent invocations are independent; the
//! configuration is validated up front and nothing is emitted if it
//! fails. Warnings accumulate across stages and ride along with the
//! result.

use crate::angle_field::AngleField;
use crate::axis_attach::attach_angles;
use crate::emitter::{GcodeEmitter, GcodeStats};
use crate::error::ToolpathResult;
use crate::motion::plan_motion;
use bladekit_core::{warnings_summary, MotionCommand, Point2, Point3, ToolpathPoint, WarningItem};
use bladekit_settings::Config;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A generated program: G-code text plus the intermediate artifacts the
/// caller may want for preview rendering or reporting.
#[derive(Debug, Clone, Serialize)]
pub struct GcodeProgram {
    /// Final program text, one command per line, trailing newline.
    pub gcode: String,
    /// The motion commands behind the text.
    pub commands: Vec<MotionCommand>,
    /// Fused XYZA points, for read-only preview consumption.
    pub points: Vec<ToolpathPoint>,
    pub stats: GcodeStats,
    pub warnings: Vec<WarningItem>,
}

impl GcodeProgram {
    /// Write the program to a `.nc` file.
    pub fn write_nc(&self, path: impl AsRef<Path>) -> ToolpathResult<()> {
        fs::write(path.as_ref(), &self.gcode)?;
        Ok(())
    }
}

/// Generate a program from a 2D orientation path and an independently
/// produced 3D toolpath.
pub fn generate_program(
    path2d: &[Point2],
    path3d: &[Point3],
    config: &Config,
) -> ToolpathResult<GcodeProgram> {
    config.validate()?;
    let mut warnings = Vec::new();

    let cleaned = clean_path3d(path3d, &mut warnings);
    let field = AngleField::build(path2d, &config.angle);
    warnings.extend_from_slice(field.warnings());

    let points = attach_angles(&field, &cleaned, config.angle.attach_method)?;
    finish(points, config, warnings)
}

/// Generate a program from a flat 2D path cut at the configured depth.
/// Corner pivots apply here when enabled.
pub fn generate_program_2d(path2d: &[Point2], config: &Config) -> ToolpathResult<GcodeProgram> {
    config.validate()?;

    let field = AngleField::build(path2d, &config.angle);
    let warnings = field.warnings().to_vec();

    let points = field.fused_points(config.machine.z_cut_mm, &config.angle);
    finish(points, config, warnings)
}

fn finish(
    points: Vec<ToolpathPoint>,
    config: &Config,
    mut warnings: Vec<WarningItem>,
) -> ToolpathResult<GcodeProgram> {
    if points.is_empty() {
        warnings.push(WarningItem::new(
            "empty_toolpath",
            "no fused points; emitting nothing",
        ));
    }

    let plan = plan_motion(&points, config)?;
    let mut emitter = GcodeEmitter::new(config);
    let (gcode, stats) = emitter.emit_program(&plan);

    tracing::info!(
        points = points.len(),
        lines = stats.line_count,
        retracts = stats.retract_count,
        jumps = stats.jump_count,
        "generated program"
    );
    if !warnings.is_empty() {
        tracing::warn!(summary = %warnings_summary(&warnings), "generation finished with warnings");
    }

    Ok(GcodeProgram {
        gcode,
        commands: plan.commands,
        points,
        stats,
        warnings,
    })
}

/// Drop points with non-finite coordinates before attachment, recording
/// how many were skipped.
fn clean_path3d(path3d: &[Point3], warnings: &mut Vec<WarningItem>) -> Vec<Point3> {
    let cleaned: Vec<Point3> = path3d.iter().copied().filter(Point3::is_finite).collect();
    let skipped = path3d.len() - cleaned.len();
    if skipped > 0 {
        let first_bad = path3d.iter().position(|p| !p.is_finite()).unwrap_or(0);
        warnings.push(
            WarningItem::new("nonfinite_points", "skipped non-finite toolpath points")
                .with_context("skipped", skipped)
                .with_context("first_index", first_bad),
        );
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_2d() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
            Point2::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_invalid_config_aborts_before_output() {
        let mut config = Config::default();
        config.gcode.turn_retract_threshold_deg = -1.0;
        let path3d = vec![Point3::new(0.0, 0.0, -1.0), Point3::new(5.0, 0.0, -1.0)];
        let err = generate_program(&square_2d(), &path3d, &config).unwrap_err();
        assert!(matches!(err, crate::ToolpathError::Config(_)));
    }

    #[test]
    fn test_empty_inputs_make_empty_program_with_warnings() {
        let config = Config::default();
        let program = generate_program(&[], &[], &config).unwrap();
        assert!(program.gcode.is_empty());
        assert!(program.commands.is_empty());
        let codes: Vec<&str> = program.warnings.iter().map(|w| w.code.as_str()).collect();
        assert!(codes.contains(&"empty_input"));
        assert!(codes.contains(&"empty_toolpath"));
    }

    #[test]
    fn test_nonfinite_points_skipped_with_warning() {
        let config = Config::default();
        let path2d = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
        let path3d = vec![
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(f64::NAN, 0.0, -1.0),
            Point3::new(1.0, 0.0, -1.0),
        ];
        let program = generate_program(&path2d, &path3d, &config).unwrap();
        assert_eq!(program.points.len(), 2);
        assert_eq!(program.warnings[0].code, "nonfinite_points");
        assert_eq!(program.warnings[0].context["skipped"], "1");
    }

    #[test]
    fn test_2d_program_cuts_at_configured_depth() {
        let mut config = Config::default();
        config.machine.z_cut_mm = -2.0;
        config.machine.jump_threshold_mm = 50.0;
        let program = generate_program_2d(&square_2d(), &config).unwrap();
        assert!(program.points.iter().all(|p| p.z == -2.0));
        assert!(program.gcode.contains("Z-2.000"));
    }

    #[test]
    fn test_program_writes_nc_file() {
        let config = Config::default();
        let path2d = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
        let path3d: Vec<Point3> = (0..=10).map(|i| Point3::new(i as f64, 0.0, -1.0)).collect();
        let program = generate_program(&path2d, &path3d, &config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let nc_path = dir.path().join("out.nc");
        program.write_nc(&nc_path).unwrap();
        let text = fs::read_to_string(&nc_path).unwrap();
        assert_eq!(text, program.gcode);
        assert!(text.lines().count() > 3);
    }

    #[test]
    fn test_repeated_generation_is_deterministic() {
        let mut config = Config::default();
        config.machine.jump_threshold_mm = 50.0;
        let path2d = square_2d();
        let path3d: Vec<Point3> = path2d
            .iter()
            .map(|p| Point3::new(p.x, p.y, -1.0))
            .collect();
        let first = generate_program(&path2d, &path3d, &config).unwrap();
        let second = generate_program(&path2d, &path3d, &config).unwrap();
        assert_eq!(first.gcode, second.gcode);
        assert_eq!(first.points, second.points);
    }

    #[test]
    fn test_program_serializes_for_preview_consumers() {
        let config = Config::default();
        let path2d = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
        let path3d: Vec<Point3> = (0..=10).map(|i| Point3::new(i as f64, 0.0, -1.0)).collect();
        let program = generate_program(&path2d, &path3d, &config).unwrap();

        let json = serde_json::to_value(&program).unwrap();
        assert!(json["points"].as_array().unwrap().len() == 11);
        assert!(json["stats"]["line_count"].as_u64().unwrap() > 3);
        assert!(json["gcode"].as_str().unwrap().contains("G21"));
    }
}

//! # Bladekit
//!
//! Toolpath post-processor for 4-axis tangential knife CNC machines. The
//! A axis continuously reorients the blade to track the local cutting
//! direction; this crate turns plain point paths into modal, Mach3-safe
//! G-code with retract-on-turn safety built in.
//!
//! ## Architecture
//!
//! Bladekit is organized as a workspace with multiple crates:
//!
//! 1. **bladekit-core** - point/motion data model, angle math, warnings
//! 2. **bladekit-settings** - configuration, validation, persistence
//! 3. **bladekit-toolpath** - angle field, axis attachment, motion
//!    planning, G-code emission
//! 4. **bladekit** - library facade and the command-line driver

pub mod types;

pub use bladekit_core::{
    angle_delta_deg, cumulative_lengths, normalize_deg, path_length, unwrap_deg, warnings_summary,
    AngleSample, AttachMethod, MotionCommand, OutputAxes, Point2, Point3, ToolpathPoint,
    WarningItem,
};

pub use bladekit_settings::{
    default_config_path, AngleSettings, Config, ConfigError, GcodeSettings, MachineSettings,
    SettingsError,
};

pub use bladekit_toolpath::{
    attach_angles, generate_program, generate_program_2d, plan_motion, AngleField, CutState,
    GcodeEmitter, GcodeProgram, GcodeStats, MotionPlan, ToolpathError,
};

pub use types::InputPaths;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with console output and RUST_LOG
/// environment variable support.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

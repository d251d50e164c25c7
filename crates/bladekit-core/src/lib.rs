//! # Bladekit Core
//!
//! Core types and math for tangential-knife toolpath processing.
//! Provides the point/motion data model shared by the settings and
//! toolpath crates, the degree-domain angle helpers (normalization,
//! shortest deltas, phase unwrapping) and the warning model used to
//! surface non-fatal conditions alongside degraded results.

pub mod angles;
pub mod geometry;
pub mod types;
pub mod warning;

pub use angles::{angle_delta_deg, normalize_deg, unwrap_deg};
pub use geometry::{cumulative_lengths, path_length};
pub use types::{
    AngleSample, AttachMethod, MotionCommand, OutputAxes, Point2, Point3, ToolpathPoint,
};
pub use warning::{warnings_summary, WarningItem};

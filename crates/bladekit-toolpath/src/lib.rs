//! # Bladekit Toolpath
//!
//! Turns cutting paths into motion for a 4-axis (X, Y, Z, A) CNC machine
//! whose A axis keeps a tangential or ultrasonic blade aligned with the
//! local cutting direction.
//!
//! ## Stages
//!
//! - **Angle Field**: per-point tangent angles from a 2D path, with
//!   normalization, phase unwrapping, corner detection and smoothing
//! - **Axis Attachment**: maps the angle stream onto an independently
//!   generated 3D toolpath by arc length or nearest point
//! - **Motion Planning**: the retract/rotate/replunge state machine that
//!   keeps large blade rotations out of the material
//! - **G-code Emission**: modal Mach3-safe text output with per-word
//!   suppression and a configurable minimum A step
//!
//! The [`pipeline`] module ties the stages together into single-call
//! program generation for both 3D and flat 2D workflows.

pub mod angle_field;
pub mod axis_attach;
pub mod emitter;
pub mod error;
pub mod motion;
pub mod pipeline;

pub use angle_field::AngleField;
pub use axis_attach::attach_angles;
pub use emitter::{GcodeEmitter, GcodeStats};
pub use error::{ToolpathError, ToolpathResult};
pub use motion::{plan_motion, CutState, MotionPlan};
pub use pipeline::{generate_program, generate_program_2d, GcodeProgram};

//! Motion planning for the fused XYZA stream.
//!
//! Tangential and ultrasonic blades cannot rotate safely while engaged in
//! material beyond a small angle. Large direction changes therefore go
//! through an explicit retract/rotate/replunge sequence at safe height;
//! everything else rotates in-line with the cut move. The state machine is
//! an explicit enum so an unresolved half-transition at the end of the
//! path is a checkable, fatal condition rather than a silent unsafe
//! program.

use crate::error::{ToolpathError, ToolpathResult};
use bladekit_core::{MotionCommand, ToolpathPoint};
use bladekit_settings::Config;
use serde::Serialize;

/// Z values closer to safe height than this count as already clear.
const Z_EPS: f64 = 1e-6;

/// Where the blade is in the retract cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutState {
    /// Normal engaged cutting; A changes ride along with XYZ moves.
    Cutting,
    /// Moving up to safe height before a large rotation.
    Retracting,
    /// Rotating A at safe height, XY held.
    Rotating,
    /// Plunging back to the cut depth after rotating.
    Replunging,
}

impl CutState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cutting => "cutting",
            Self::Retracting => "retracting",
            Self::Rotating => "rotating",
            Self::Replunging => "replunging",
        }
    }

    /// Whether `next` is a legal successor. Rotation may be skipped when
    /// a reposition needs no blade turn, but every cycle must come back
    /// through a replunge.
    fn can_enter(&self, next: CutState) -> bool {
        matches!(
            (self, next),
            (Self::Cutting, Self::Retracting)
                | (Self::Retracting, Self::Rotating)
                | (Self::Retracting, Self::Replunging)
                | (Self::Rotating, Self::Replunging)
                | (Self::Replunging, Self::Cutting)
        )
    }
}

/// Step the machine, failing on any transition the cycle does not allow.
fn enter(state: &mut CutState, next: CutState, index: usize) -> ToolpathResult<()> {
    if !state.can_enter(next) {
        return Err(ToolpathError::UnresolvedRetract {
            index,
            state: state.name(),
        });
    }
    *state = next;
    Ok(())
}

/// Planned motion for one program.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MotionPlan {
    pub commands: Vec<MotionCommand>,
    /// Retract cycles forced by in-material direction changes.
    pub retract_count: usize,
    /// Safe-height repositions over long XY gaps.
    pub jump_count: usize,
}

/// Convert fused points into motion commands under the configured safety
/// policy. Empty input plans zero commands.
pub fn plan_motion(points: &[ToolpathPoint], config: &Config) -> ToolpathResult<MotionPlan> {
    let mut plan = MotionPlan::default();
    let first = match points.first() {
        Some(first) => *first,
        None => return Ok(plan),
    };

    let include_a = config.gcode.output_axes.includes_a();
    let z_safe = config.machine.z_safe_mm;
    let jump_threshold = config.machine.jump_threshold_mm;
    let feed_xy = config.gcode.feed_xy_mm_min;
    let feed_z = config.gcode.feed_z_mm_min;
    let retract_enabled = config.gcode.turn_retract_enabled;
    let retract_threshold = config.gcode.turn_retract_threshold_deg;

    // Lead-in: approach at safe height, orient while plunging.
    plan.commands.push(MotionCommand::rapid().at_z(z_safe));
    plan.commands
        .push(MotionCommand::rapid().at_x(first.x).at_y(first.y));
    plan.commands.push(
        MotionCommand::cut()
            .at_z(first.z)
            .with_a(if include_a { first.a } else { None })
            .with_feed(feed_z),
    );

    let mut state = CutState::Cutting;
    for (index, pair) in points.windows(2).enumerate() {
        let (prev, next) = (pair[0], pair[1]);
        let gap = prev.xy_distance_to(&next);
        let delta_a = match (prev.a, next.a) {
            (Some(a0), Some(a1)) if include_a => (a1 - a0).abs(),
            _ => 0.0,
        };
        let in_material = prev.z < z_safe - Z_EPS;

        if gap > jump_threshold {
            // Disconnected contour: travel clear of the material instead
            // of dragging the blade across the gap.
            enter(&mut state, CutState::Retracting, index)?;
            plan.commands.push(MotionCommand::rapid().at_z(z_safe));
            plan.commands
                .push(MotionCommand::rapid().at_x(next.x).at_y(next.y));
            enter(&mut state, CutState::Replunging, index)?;
            plan.commands.push(
                MotionCommand::cut()
                    .at_z(next.z)
                    .with_a(if include_a { next.a } else { None })
                    .with_feed(feed_z),
            );
            enter(&mut state, CutState::Cutting, index)?;
            plan.jump_count += 1;
            continue;
        }

        if retract_enabled && in_material && delta_a >= retract_threshold {
            enter(&mut state, CutState::Retracting, index)?;
            plan.commands.push(MotionCommand::rapid().at_z(z_safe));
            enter(&mut state, CutState::Rotating, index)?;
            // A only, XY held: no lateral travel while the blade turns.
            plan.commands.push(MotionCommand::rapid().with_a(next.a));
            enter(&mut state, CutState::Replunging, index)?;
            plan.commands
                .push(MotionCommand::cut().at_z(prev.z).with_feed(feed_z));
            enter(&mut state, CutState::Cutting, index)?;
            plan.retract_count += 1;
        }

        if state != CutState::Cutting {
            return Err(ToolpathError::UnresolvedRetract {
                index,
                state: state.name(),
            });
        }

        plan.commands.push(
            MotionCommand::cut()
                .at_x(next.x)
                .at_y(next.y)
                .at_z(next.z)
                .with_a(if include_a { next.a } else { None })
                .with_feed(feed_xy),
        );
    }

    if state != CutState::Cutting {
        return Err(ToolpathError::UnresolvedRetract {
            index: points.len() - 1,
            state: state.name(),
        });
    }

    // Lead-out: clear the workpiece.
    plan.commands.push(MotionCommand::rapid().at_z(z_safe));
    Ok(plan)
}

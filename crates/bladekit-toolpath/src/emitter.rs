//! Modal Mach3 G-code emission.
//!
//! Every word is modal: a value persists across lines until it changes, so
//! unchanged words are suppressed. Positions compare with a tolerance that
//! matches the printed precision; the A word instead uses the configured
//! minimum step, and its baseline only advances when the word is actually
//! emitted — sub-step changes accumulate until they cross the threshold.

use crate::motion::MotionPlan;
use bladekit_core::MotionCommand;
use bladekit_settings::Config;
use serde::Serialize;

/// Suppression tolerance for X/Y/Z, half of the printed 3-decimal step.
const POS_EPS_MM: f64 = 5e-4;
/// Suppression tolerance for feed values.
const FEED_EPS: f64 = 1e-6;

/// Summary of an emitted program.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GcodeStats {
    pub line_count: usize,
    pub rapid_moves: usize,
    pub cut_moves: usize,
    pub min_x: Option<f64>,
    pub max_x: Option<f64>,
    pub min_y: Option<f64>,
    pub max_y: Option<f64>,
    pub min_z: Option<f64>,
    pub max_z: Option<f64>,
    pub min_a: Option<f64>,
    pub max_a: Option<f64>,
    pub retract_count: usize,
    pub jump_count: usize,
}

impl GcodeStats {
    fn grow(slot_min: &mut Option<f64>, slot_max: &mut Option<f64>, value: f64) {
        *slot_min = Some(slot_min.map_or(value, |v| v.min(value)));
        *slot_max = Some(slot_max.map_or(value, |v| v.max(value)));
    }

    fn track(&mut self, cmd: &MotionCommand, include_a: bool) {
        if let Some(x) = cmd.x {
            Self::grow(&mut self.min_x, &mut self.max_x, x);
        }
        if let Some(y) = cmd.y {
            Self::grow(&mut self.min_y, &mut self.max_y, y);
        }
        if let Some(z) = cmd.z {
            Self::grow(&mut self.min_z, &mut self.max_z, z);
        }
        if include_a {
            if let Some(a) = cmd.a {
                Self::grow(&mut self.min_a, &mut self.max_a, a);
            }
        }
    }
}

/// Stateful modal emitter. `reset` (or a fresh value) restarts the modal
/// baselines, so the same plan always serializes to identical text.
#[derive(Debug)]
pub struct GcodeEmitter<'cfg> {
    config: &'cfg Config,
    last_x: Option<f64>,
    last_y: Option<f64>,
    last_z: Option<f64>,
    last_a: Option<f64>,
    last_feed: Option<f64>,
    last_rapid: Option<bool>,
    spindle_on: bool,
}

impl<'cfg> GcodeEmitter<'cfg> {
    pub fn new(config: &'cfg Config) -> Self {
        Self {
            config,
            last_x: None,
            last_y: None,
            last_z: None,
            last_a: None,
            last_feed: None,
            last_rapid: None,
            spindle_on: false,
        }
    }

    /// Forget all modal state.
    pub fn reset(&mut self) {
        self.last_x = None;
        self.last_y = None;
        self.last_z = None;
        self.last_a = None;
        self.last_feed = None;
        self.last_rapid = None;
        self.spindle_on = false;
    }

    /// Serialize a motion plan. An empty plan yields empty text — never a
    /// preamble with nothing to run.
    pub fn emit_program(&mut self, plan: &MotionPlan) -> (String, GcodeStats) {
        self.reset();
        let mut stats = GcodeStats {
            retract_count: plan.retract_count,
            jump_count: plan.jump_count,
            ..GcodeStats::default()
        };
        if plan.commands.is_empty() {
            return (String::new(), stats);
        }

        let include_a = self.config.gcode.output_axes.includes_a();
        let mut lines: Vec<String> = Vec::new();
        lines.push("(Generated by bladekit)".to_string());
        lines.push("G21 G90 G17 G94".to_string());
        self.emit_park_preamble(&mut lines, include_a);

        for cmd in &plan.commands {
            if !cmd.rapid && self.config.gcode.spindle_enabled && !self.spindle_on {
                lines.push(self.spindle_on_line());
                self.spindle_on = true;
            }
            stats.track(cmd, include_a);
            if let Some(line) = self.emit_line(cmd, include_a, &mut stats) {
                lines.push(line);
            }
        }

        if self.spindle_on {
            lines.push(self.config.gcode.spindle_off_mcode.trim().to_string());
        }
        lines.push("M30".to_string());

        stats.line_count = lines.len();
        let mut text = lines.join("\n");
        text.push('\n');
        (text, stats)
    }

    /// Rapid to the park position in machine coordinates, then select the
    /// work coordinate system. Machine-coordinate targets never touch the
    /// modal axis baselines.
    fn emit_park_preamble(&mut self, lines: &mut Vec<String>, include_a: bool) {
        let machine = &self.config.machine;
        if !machine.use_g53_park {
            return;
        }
        lines.push(format!("G53 G0 Z{}", fmt_axis(machine.g53_park_z)));
        lines.push(format!(
            "G53 G0 X{} Y{}",
            fmt_axis(machine.g53_park_x),
            fmt_axis(machine.g53_park_y)
        ));
        if include_a {
            if let Some(park_a) = machine.g53_park_a {
                lines.push(format!("G53 G0 A{}", fmt_axis(park_a)));
            }
        }
        lines.push("G54".to_string());
        self.last_rapid = Some(true);
    }

    fn spindle_on_line(&self) -> String {
        let gcode = &self.config.gcode;
        if gcode.spindle_use_s {
            format!("{} S{:.0}", gcode.spindle_on_mcode.trim(), gcode.spindle_rpm)
        } else {
            gcode.spindle_on_mcode.trim().to_string()
        }
    }

    /// Render one command, or `None` when every word is suppressed.
    fn emit_line(
        &mut self,
        cmd: &MotionCommand,
        include_a: bool,
        stats: &mut GcodeStats,
    ) -> Option<String> {
        let a_tolerance = self.config.gcode.a_min_step_deg.max(POS_EPS_MM);

        let x = cmd.x.filter(|&v| changed(self.last_x, v, POS_EPS_MM));
        let y = cmd.y.filter(|&v| changed(self.last_y, v, POS_EPS_MM));
        let z = cmd.z.filter(|&v| changed(self.last_z, v, POS_EPS_MM));
        let a = if include_a {
            cmd.a.filter(|&v| changed(self.last_a, v, a_tolerance))
        } else {
            None
        };
        let feed = if cmd.rapid {
            None
        } else {
            cmd.feed.filter(|&v| changed(self.last_feed, v, FEED_EPS))
        };

        if x.is_none() && y.is_none() && z.is_none() && a.is_none() && feed.is_none() {
            return None;
        }

        let mut parts: Vec<String> = Vec::new();
        if self.last_rapid != Some(cmd.rapid) {
            parts.push(if cmd.rapid { "G0" } else { "G1" }.to_string());
            self.last_rapid = Some(cmd.rapid);
        }
        if let Some(v) = x {
            parts.push(format!("X{}", fmt_axis(v)));
            self.last_x = Some(v);
        }
        if let Some(v) = y {
            parts.push(format!("Y{}", fmt_axis(v)));
            self.last_y = Some(v);
        }
        if let Some(v) = z {
            parts.push(format!("Z{}", fmt_axis(v)));
            self.last_z = Some(v);
        }
        if let Some(v) = a {
            parts.push(format!("A{}", fmt_axis(v)));
            self.last_a = Some(v);
        }
        if let Some(v) = feed {
            parts.push(format!("F{:.0}", v));
            self.last_feed = Some(v);
        }

        if cmd.rapid {
            stats.rapid_moves += 1;
        } else {
            stats.cut_moves += 1;
        }
        Some(parts.join(" "))
    }
}

/// Axis words print with fixed 3-decimal precision.
fn fmt_axis(value: f64) -> String {
    format!("{:.3}", value)
}

/// A word is due when no baseline exists yet or the change reaches the
/// tolerance.
fn changed(last: Option<f64>, value: f64, tolerance: f64) -> bool {
    match last {
        None => true,
        Some(previous) => (value - previous).abs() >= tolerance,
    }
}

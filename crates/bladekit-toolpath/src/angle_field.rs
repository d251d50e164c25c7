//! Blade orientation from path geometry.
//!
//! An [`AngleField`] holds one tangent angle per source point, unwrapped to
//! a continuous degree stream and parametrized by cumulative arc length.
//! Each point carries the heading of the segment arriving at it (the first
//! point takes the first heading), so a direction change sits between a
//! corner point and its successor and the blade pivots at the corner, not
//! somewhere along a side. Corners keep their true discontinuity; only the
//! runs between corners are smoothed.

use bladekit_core::{
    angle_delta_deg, cumulative_lengths, normalize_deg, unwrap_deg, AngleSample, Point2,
    ToolpathPoint, WarningItem,
};
use bladekit_settings::AngleSettings;

/// Coordinates closer than this are the same point.
const COORD_EPS: f64 = 1e-9;

/// Per-point blade orientation along a 2D path.
#[derive(Debug, Clone)]
pub struct AngleField {
    points: Vec<Point2>,
    samples: Vec<AngleSample>,
    corners: Vec<usize>,
    warnings: Vec<WarningItem>,
}

impl AngleField {
    /// Compute the field for an ordered 2D path.
    ///
    /// One pass: segment headings, corner detection on the raw headings,
    /// smoothing of the non-corner runs, then phase unwrap. Degenerate
    /// input degrades to a warning instead of failing — an empty field is
    /// a legitimate result.
    pub fn build(points: &[Point2], settings: &AngleSettings) -> Self {
        let mut warnings = Vec::new();
        let n = points.len();

        if n < 2 {
            if n == 0 {
                warnings.push(WarningItem::new("empty_input", "path is empty"));
                return Self {
                    points: Vec::new(),
                    samples: Vec::new(),
                    corners: Vec::new(),
                    warnings,
                };
            }
            warnings.push(
                WarningItem::new("empty_input", "path has a single point; angle undefined")
                    .with_context("points", n),
            );
            return Self {
                points: points.to_vec(),
                samples: vec![AngleSample::new(0.0, 0.0)],
                corners: Vec::new(),
                warnings,
            };
        }

        let segment_angles = segment_angles(points, &mut warnings);
        let corners = detect_corners(&segment_angles, settings.corner_threshold_deg);

        // Point i takes the heading of the segment arriving at it; the
        // first point takes the first heading.
        let mut point_angles = Vec::with_capacity(n);
        point_angles.push(segment_angles[0]);
        for i in 1..n {
            point_angles.push(segment_angles[i - 1]);
        }

        smooth_between_corners(&mut point_angles, &corners, settings.smooth_window);
        let unwrapped = unwrap_deg(&point_angles);

        let lengths = cumulative_lengths(points);
        let samples = lengths
            .iter()
            .zip(unwrapped.iter())
            .map(|(&s, &angle)| AngleSample::new(s, angle))
            .collect();

        Self {
            points: points.to_vec(),
            samples,
            corners,
            warnings,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn samples(&self) -> &[AngleSample] {
        &self.samples
    }

    /// Indices of points detected as corners. The heading discontinuity
    /// of corner `i` sits between samples `i` and `i + 1`.
    pub fn corners(&self) -> &[usize] {
        &self.corners
    }

    pub fn warnings(&self) -> &[WarningItem] {
        &self.warnings
    }

    /// Arc length covered by the field's parametrization.
    pub fn total_length(&self) -> f64 {
        self.samples.last().map_or(0.0, |sample| sample.s)
    }

    /// Angle at arc-length parameter `s`, linearly interpolated between
    /// the bracketing samples and clamped to the endpoint samples outside
    /// the field's domain. Never extrapolates.
    pub fn angle_at(&self, s: f64) -> f64 {
        let samples = &self.samples;
        let (first, last) = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if s <= first.s {
            return first.angle_deg;
        }
        if s >= last.s {
            return last.angle_deg;
        }
        let idx = samples.partition_point(|sample| sample.s < s);
        let hi = samples[idx];
        let lo = samples[idx - 1];
        let span = hi.s - lo.s;
        if span < COORD_EPS {
            return lo.angle_deg;
        }
        let t = (s - lo.s) / span;
        lo.angle_deg + (hi.angle_deg - lo.angle_deg) * t
    }

    /// Fuse the field into XYZA points at a fixed cutting depth, for flat
    /// workflows with no independent 3D path.
    ///
    /// When pivoting is enabled, each corner gets `pivot_steps` staged
    /// rotation points at the corner XY before the path moves on, so the
    /// blade turns through a sharp corner in small increments.
    pub fn fused_points(&self, z: f64, settings: &AngleSettings) -> Vec<ToolpathPoint> {
        let mut fused = Vec::with_capacity(self.points.len());
        for (i, (point, sample)) in self.points.iter().zip(self.samples.iter()).enumerate() {
            if settings.pivot_enable && i >= 1 && self.corners.contains(&(i - 1)) {
                let corner = self.points[i - 1];
                let prev = self.samples[i - 1].angle_deg;
                let diff = sample.angle_deg - prev;
                if diff.abs() > COORD_EPS && settings.pivot_steps > 0 {
                    for step in 1..=settings.pivot_steps {
                        let t = step as f64 / (settings.pivot_steps + 1) as f64;
                        fused.push(ToolpathPoint::new(
                            corner.x,
                            corner.y,
                            z,
                            Some(prev + diff * t),
                        ));
                    }
                }
            }
            fused.push(ToolpathPoint::new(point.x, point.y, z, Some(sample.angle_deg)));
        }
        fused
    }
}

/// Heading of each segment in degrees, normalized to [-180, 180).
/// Zero-length segments hold the previous heading; a path made only of
/// them degrades to a fixed 0 heading with a warning.
fn segment_angles(points: &[Point2], warnings: &mut Vec<WarningItem>) -> Vec<f64> {
    let mut raw: Vec<Option<f64>> = Vec::with_capacity(points.len() - 1);
    let mut last: Option<f64> = None;
    for pair in points.windows(2) {
        let dx = pair[1].x - pair[0].x;
        let dy = pair[1].y - pair[0].y;
        if dx.abs() < COORD_EPS && dy.abs() < COORD_EPS {
            raw.push(last);
        } else {
            let angle = normalize_deg(dy.atan2(dx).to_degrees());
            raw.push(Some(angle));
            last = Some(angle);
        }
    }

    match raw.iter().flatten().next().copied() {
        Some(first_heading) => raw
            .iter()
            .map(|angle| angle.unwrap_or(first_heading))
            .collect(),
        None => {
            warnings.push(
                WarningItem::new(
                    "degenerate_geometry",
                    "all segments have zero length; holding default angle",
                )
                .with_context("points", points.len()),
            );
            vec![0.0; points.len() - 1]
        }
    }
}

/// Point indices where the heading change meets the threshold. Detection
/// runs on the raw headings, before smoothing, so a softened curve cannot
/// hide a genuine corner.
fn detect_corners(segment_angles: &[f64], threshold_deg: f64) -> Vec<usize> {
    if threshold_deg <= 0.0 {
        return Vec::new();
    }
    let mut corners = Vec::new();
    for i in 1..segment_angles.len() {
        let delta = angle_delta_deg(segment_angles[i - 1], segment_angles[i]);
        if delta.abs() >= threshold_deg {
            corners.push(i);
        }
    }
    corners
}

/// Circular moving average applied independently to each run between
/// corners. Corner `i` ends its run at point `i` (the last point still on
/// the old heading), so the window never crosses a discontinuity.
fn smooth_between_corners(angles: &mut [f64], corners: &[usize], window: usize) {
    if window <= 1 || angles.is_empty() {
        return;
    }
    let mut starts = Vec::with_capacity(corners.len() + 1);
    starts.push(0);
    starts.extend(corners.iter().map(|&corner| corner + 1));
    for (run, &start) in starts.iter().enumerate() {
        let end = starts.get(run + 1).copied().unwrap_or(angles.len());
        if end > start {
            smooth_run(&mut angles[start..end], window);
        }
    }
}

/// In-place circular (sin/cos mean) smoothing of one run. Averaging in
/// the circular domain keeps wrap-boundary samples from producing bogus
/// midpoints.
fn smooth_run(angles: &mut [f64], window: usize) {
    if angles.len() < 2 {
        return;
    }
    let half = window / 2;
    let source = angles.to_vec();
    for (i, slot) in angles.iter_mut().enumerate() {
        let start = i.saturating_sub(half);
        let end = (i + half + 1).min(source.len());
        let mut sin_sum = 0.0;
        let mut cos_sum = 0.0;
        for &angle in &source[start..end] {
            let radians = angle.to_radians();
            sin_sum += radians.sin();
            cos_sum += radians.cos();
        }
        let count = (end - start) as f64;
        *slot = (sin_sum / count).atan2(cos_sum / count).to_degrees();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AngleSettings {
        AngleSettings::default()
    }

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
            Point2::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_straight_line_constant_angle() {
        let points: Vec<Point2> = (0..10).map(|i| Point2::new(i as f64, 0.0)).collect();
        let field = AngleField::build(&points, &settings());
        assert_eq!(field.len(), 10);
        assert!(field.corners().is_empty());
        assert!(field.warnings().is_empty());
        for sample in field.samples() {
            assert!(sample.angle_deg.abs() < 1e-9);
        }
    }

    #[test]
    fn test_square_corners_detected_and_unsmoothed() {
        let field = AngleField::build(&square(), &settings());
        assert_eq!(field.corners(), &[1, 2, 3]);

        let angles: Vec<f64> = field.samples().iter().map(|s| s.angle_deg).collect();
        // The blade holds each side's heading and jumps a full right
        // angle across every corner.
        assert_eq!(angles[0], angles[1]);
        for &corner in field.corners() {
            let delta = angles[corner + 1] - angles[corner];
            assert!(
                (delta.abs() - 90.0).abs() < 1e-6,
                "corner {} delta {}",
                corner,
                delta
            );
        }
    }

    #[test]
    fn test_unwrap_keeps_deltas_bounded() {
        let field = AngleField::build(&square(), &settings());
        for pair in field.samples().windows(2) {
            assert!((pair[1].angle_deg - pair[0].angle_deg).abs() <= 180.0);
        }
        // The last leg heads -90 raw; unwrapped it continues to 270
        // instead of jumping back across the wrap boundary.
        assert!((field.samples()[4].angle_deg - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_and_single_point() {
        let field = AngleField::build(&[], &settings());
        assert!(field.is_empty());
        assert_eq!(field.warnings()[0].code, "empty_input");

        let field = AngleField::build(&[Point2::new(1.0, 2.0)], &settings());
        assert_eq!(field.len(), 1);
        assert_eq!(field.samples()[0].angle_deg, 0.0);
        assert_eq!(field.warnings()[0].code, "empty_input");
    }

    #[test]
    fn test_all_degenerate_segments() {
        let points = vec![Point2::new(3.0, 3.0); 4];
        let field = AngleField::build(&points, &settings());
        assert_eq!(field.len(), 4);
        assert_eq!(field.warnings()[0].code, "degenerate_geometry");
        for sample in field.samples() {
            assert_eq!(sample.angle_deg, 0.0);
        }
    }

    #[test]
    fn test_duplicate_point_holds_heading() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
        ];
        let field = AngleField::build(&points, &settings());
        assert!(field.warnings().is_empty());
        for sample in field.samples() {
            assert!(sample.angle_deg.abs() < 1e-9);
        }
    }

    #[test]
    fn test_angle_at_interpolates_and_clamps() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ];
        let mut cfg = settings();
        cfg.smooth_window = 1;
        let field = AngleField::build(&points, &cfg);
        // Samples: s=0 a=0, s=10 a=0, s=20 a=90.
        assert_eq!(field.angle_at(-5.0), 0.0);
        assert!(field.angle_at(5.0).abs() < 1e-9);
        assert!((field.angle_at(15.0) - 45.0).abs() < 1e-9);
        assert_eq!(field.angle_at(99.0), 90.0);
    }

    #[test]
    fn test_smoothing_softens_gentle_curve() {
        // A polyline turning 10 degrees per segment is below the corner
        // threshold everywhere, so smoothing applies to all of it.
        let mut points = Vec::new();
        let mut heading: f64 = 0.0;
        let mut x = 0.0;
        let mut y = 0.0;
        for _ in 0..20 {
            points.push(Point2::new(x, y));
            x += heading.to_radians().cos();
            y += heading.to_radians().sin();
            heading += 10.0;
        }
        let field = AngleField::build(&points, &settings());
        assert!(field.corners().is_empty());
        for pair in field.samples().windows(2) {
            assert!((pair[1].angle_deg - pair[0].angle_deg).abs() < 25.0);
        }
    }

    #[test]
    fn test_fused_points_pivot_insertion() {
        let mut cfg = settings();
        cfg.pivot_enable = true;
        cfg.pivot_steps = 3;
        let field = AngleField::build(&square(), &cfg);
        let fused = field.fused_points(-1.0, &cfg);
        // 5 path points plus 3 pivot steps at each of the 3 corners.
        assert_eq!(fused.len(), 5 + 3 * 3);
        // Pivot steps hold the corner XY while the angle advances from
        // the old heading toward the new one.
        for pivot in &fused[2..5] {
            assert_eq!((pivot.x, pivot.y), (10.0, 0.0));
            let angle = pivot.a.unwrap();
            assert!(angle > 0.0 && angle < 90.0);
        }
        // The corner's successor then carries the new heading.
        assert_eq!(fused[5].a, Some(90.0));
    }

    #[test]
    fn test_fused_points_without_pivots() {
        let cfg = settings();
        let field = AngleField::build(&square(), &cfg);
        let fused = field.fused_points(-2.5, &cfg);
        assert_eq!(fused.len(), 5);
        assert!(fused.iter().all(|p| p.z == -2.5 && p.a.is_some()));
    }
}

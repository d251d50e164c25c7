//! Attaching blade orientation to a 3D toolpath.
//!
//! The 3D path comes from an independent generator and usually has a
//! different point density than the 2D orientation source, so the two are
//! matched either by cumulative arc length (default) or by nearest source
//! point. Every output point gets a defined angle; outside the field's
//! arc-length domain the angle clamps to the endpoint sample.

use crate::angle_field::AngleField;
use crate::error::{ToolpathError, ToolpathResult};
use bladekit_core::{cumulative_lengths, AttachMethod, Point2, Point3, ToolpathPoint};

/// Arc lengths shorter than this cannot carry a parametrization.
const LENGTH_EPS: f64 = 1e-9;

/// Fuse the angle field with a 3D toolpath into XYZA points.
///
/// An empty field or an empty path fuses to an empty result — emitting
/// zero commands is a legitimate outcome, not an error. A mapping that
/// cannot be established at all (zero-length source under arc-length
/// matching) is fatal for this path.
pub fn attach_angles(
    field: &AngleField,
    path3d: &[Point3],
    method: AttachMethod,
) -> ToolpathResult<Vec<ToolpathPoint>> {
    if field.is_empty() || path3d.is_empty() {
        return Ok(Vec::new());
    }
    match method {
        AttachMethod::ArcLength => attach_by_arc_length(field, path3d),
        AttachMethod::NearestPoint => attach_by_nearest(field, path3d),
    }
}

fn attach_by_arc_length(field: &AngleField, path3d: &[Point3]) -> ToolpathResult<Vec<ToolpathPoint>> {
    let xy: Vec<Point2> = path3d.iter().map(|point| point.xy()).collect();
    let s3d = cumulative_lengths(&xy);
    let s3d_max = s3d.last().copied().unwrap_or(0.0);

    if field.total_length() < LENGTH_EPS && s3d_max > LENGTH_EPS {
        return Err(ToolpathError::Correspondence {
            reason: "source path has zero arc length".to_string(),
            points_2d: field.len(),
            points_3d: path3d.len(),
        });
    }

    Ok(path3d
        .iter()
        .zip(s3d.iter())
        .map(|(point, &s)| {
            ToolpathPoint::new(point.x, point.y, point.z, Some(field.angle_at(s)))
        })
        .collect())
}

fn attach_by_nearest(field: &AngleField, path3d: &[Point3]) -> ToolpathResult<Vec<ToolpathPoint>> {
    let sources = field.points();
    let samples = field.samples();
    let mut fused = Vec::with_capacity(path3d.len());
    for point in path3d {
        let target = point.xy();
        let mut best_index = 0;
        let mut best_distance = f64::INFINITY;
        for (index, source) in sources.iter().enumerate() {
            let distance = source.distance_to(&target);
            if distance < best_distance {
                best_distance = distance;
                best_index = index;
            }
        }
        if !best_distance.is_finite() {
            return Err(ToolpathError::Correspondence {
                reason: "no finite distance to any source point".to_string(),
                points_2d: field.len(),
                points_3d: path3d.len(),
            });
        }
        fused.push(ToolpathPoint::new(
            point.x,
            point.y,
            point.z,
            Some(samples[best_index].angle_deg),
        ));
    }
    Ok(fused)
}

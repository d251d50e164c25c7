//! Point and motion data model.
//!
//! All linear coordinates are millimeters, all angles are degrees.
//! `ToolpathPoint` carries a continuous (unwrapped) A angle, so consecutive
//! values may leave the [-180, 180) range by design.

use serde::{Deserialize, Serialize};

/// Planar path point (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Spatial toolpath point (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the XY plane.
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Fused XYZA cutting position.
///
/// `a` is `None` when no blade orientation has been attached (pure XYZ
/// workflows); otherwise it is a continuous unwrapped angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolpathPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub a: Option<f64>,
}

impl ToolpathPoint {
    pub fn new(x: f64, y: f64, z: f64, a: Option<f64>) -> Self {
        Self { x, y, z, a }
    }

    /// Planar distance to another point, ignoring Z and A.
    pub fn xy_distance_to(&self, other: &ToolpathPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// One sample of the blade-orientation field: unwrapped angle at an
/// arc-length parameter along the source path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleSample {
    /// Cumulative arc length of the source point (mm).
    pub s: f64,
    /// Unwrapped tangent angle (degrees).
    pub angle_deg: f64,
}

impl AngleSample {
    pub fn new(s: f64, angle_deg: f64) -> Self {
        Self { s, angle_deg }
    }
}

/// Which axis words a post run is allowed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputAxes {
    /// Three linear axes only; the A word is never written.
    Xyz,
    /// Linear axes plus the rotary blade axis.
    Xyza,
}

impl OutputAxes {
    /// Whether the rotary axis participates in output.
    pub fn includes_a(&self) -> bool {
        matches!(self, Self::Xyza)
    }
}

impl Default for OutputAxes {
    fn default() -> Self {
        Self::Xyza
    }
}

impl std::fmt::Display for OutputAxes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xyz => write!(f, "XYZ"),
            Self::Xyza => write!(f, "XYZA"),
        }
    }
}

/// Strategy for mapping orientation samples onto a 3D toolpath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachMethod {
    /// Interpolate by cumulative path distance. Robust to differing point
    /// densities between the source and target paths.
    ArcLength,
    /// Take the angle of the Euclidean-closest source point. For 3D paths
    /// that diverge from the 2D projection.
    NearestPoint,
}

impl Default for AttachMethod {
    fn default() -> Self {
        Self::ArcLength
    }
}

impl std::fmt::Display for AttachMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArcLength => write!(f, "arc_length"),
            Self::NearestPoint => write!(f, "nearest_point"),
        }
    }
}

/// One motion step, precursor to a G-code line.
///
/// A field is `Some` only when this step commands that axis; the emitter
/// applies modal suppression on top of that. Rapid moves never carry a
/// feed value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionCommand {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub a: Option<f64>,
    pub feed: Option<f64>,
    pub rapid: bool,
}

impl MotionCommand {
    /// A rapid (G0) move with no axis targets yet.
    pub fn rapid() -> Self {
        Self {
            rapid: true,
            ..Self::default()
        }
    }

    /// A feed (G1) move with no axis targets yet.
    pub fn cut() -> Self {
        Self::default()
    }

    pub fn at_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn at_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn at_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn at_a(mut self, a: f64) -> Self {
        self.a = Some(a);
        self
    }

    /// Optional A target, kept as-is.
    pub fn with_a(mut self, a: Option<f64>) -> Self {
        self.a = a;
        self
    }

    pub fn with_feed(mut self, feed: f64) -> Self {
        self.feed = Some(feed);
        self
    }

    /// True when the step commands no axis at all.
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none() && self.a.is_none()
    }
}

//! Input file model for the command-line driver.
//!
//! Paths arrive as plain JSON point lists produced by an upstream geometry
//! tool: a 2D orientation path and, optionally, an independently generated
//! 3D toolpath. When the 3D path is absent the 2D path is cut flat at the
//! configured depth.

use anyhow::Context;
use bladekit_core::{Point2, Point3};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Parsed input path file.
#[derive(Debug, Clone, Deserialize)]
pub struct InputPaths {
    /// Ordered 2D path the blade orientation is derived from.
    #[serde(default)]
    pub points_2d: Vec<[f64; 2]>,
    /// Optional independently generated 3D toolpath.
    #[serde(default)]
    pub points_3d: Option<Vec<[f64; 3]>>,
}

impl InputPaths {
    /// Read and parse a JSON path file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read path file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse path file {}", path.display()))
    }

    pub fn path_2d(&self) -> Vec<Point2> {
        self.points_2d
            .iter()
            .map(|&[x, y]| Point2::new(x, y))
            .collect()
    }

    pub fn path_3d(&self) -> Option<Vec<Point3>> {
        self.points_3d.as_ref().map(|points| {
            points
                .iter()
                .map(|&[x, y, z]| Point3::new(x, y, z))
                .collect()
        })
    }
}

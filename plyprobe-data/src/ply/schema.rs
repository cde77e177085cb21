//! Vertex schema names and point cloud classification.

use serde::Serialize;
use std::fmt;

/// Any of these properties marks a cloud as a Gaussian splat.
pub const GAUSSIAN_MARKERS: [&str; 4] = ["opacity", "scale_0", "rot_0", "f_dc_0"];

/// Splat-specific properties, in the order they are reported.
pub const GAUSSIAN_PROPERTIES: [&str; 9] = [
    "scale_0", "scale_1", "scale_2", "rot_0", "rot_1", "rot_2", "rot_3", "f_dc_0", "f_rest_0",
];

pub const POSITION_FIELDS: [&str; 3] = ["x", "y", "z"];
pub const NORMAL_FIELDS: [&str; 3] = ["nx", "ny", "nz"];
pub const COLOR_FIELDS: [&str; 3] = ["red", "green", "blue"];

/// Spherical-harmonic DC coefficient, first band.
pub const SH_DC_FIELD: &str = "f_dc_0";
pub const OPACITY_FIELD: &str = "opacity";

/// Schema variant of a vertex element, decided once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudKind {
    /// Position, normal and RGB color only.
    Geometric,
    /// 3D Gaussian splats: opacity, scale, rotation, SH color.
    Gaussian,
}

impl CloudKind {
    /// Classify from declared property names. Name presence only, no validation.
    pub fn classify<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        if names
            .into_iter()
            .any(|name| GAUSSIAN_MARKERS.contains(&name))
        {
            CloudKind::Gaussian
        } else {
            CloudKind::Geometric
        }
    }

    pub fn is_gaussian(self) -> bool {
        self == CloudKind::Gaussian
    }
}

impl fmt::Display for CloudKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudKind::Geometric => f.write_str("Initial Geometry"),
            CloudKind::Gaussian => f.write_str("3D Gaussian"),
        }
    }
}

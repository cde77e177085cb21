//! Inspection report: summary plus the shapes of the derived arrays.

use plyprobe_data::{AttributeArray, CloudSummary, HeaderInfo, ParsedCloud, PlyError};
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Shape of a derived array, or why it could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extracted {
    Shape(Vec<usize>),
    Missing(String),
}

impl Extracted {
    fn from_result(label: &str, result: Result<AttributeArray, PlyError>) -> Self {
        match result {
            Ok(array) => Extracted::Shape(array.shape()),
            Err(e) => {
                warn!("{} unavailable: {}", label, e);
                Extracted::Missing(e.to_string())
            }
        }
    }
}

impl fmt::Display for Extracted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extracted::Shape(shape) => write!(f, "{:?}", shape),
            Extracted::Missing(reason) => write!(f, "unavailable ({})", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaussianEntry {
    pub name: String,
    pub shape: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub header: HeaderInfo,
    pub summary: CloudSummary,
    pub positions: Extracted,
    pub colors: Extracted,
    pub normals: Extracted,
    pub gaussian_properties: Vec<GaussianEntry>,
    pub opacity_range: Option<(f32, f32)>,
}

impl Report {
    pub fn build(cloud: &ParsedCloud) -> Self {
        let gaussian_properties = cloud
            .get_gaussian_properties()
            .into_iter()
            .map(|(name, array)| GaussianEntry {
                name: name.to_string(),
                shape: array.shape(),
            })
            .collect();

        Self {
            header: cloud.header().clone(),
            summary: cloud.summary(),
            positions: Extracted::from_result("Positions", cloud.get_position()),
            colors: Extracted::from_result("Colors", cloud.get_color()),
            normals: Extracted::from_result("Normals", cloud.get_normals()),
            gaussian_properties,
            opacity_range: cloud.get_opacity().and_then(AttributeArray::range),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Format: {} {} (elements: {})",
            self.header.format,
            self.header.version,
            self.header.elements.join(", ")
        )?;
        for comment in &self.header.comments {
            writeln!(f, "Comment: {}", comment)?;
        }
        write!(f, "{}", self.summary)?;

        writeln!(f)?;
        writeln!(f, "Extracted Data:")?;
        writeln!(f, "Positions shape: {}", self.positions)?;
        writeln!(f, "Colors shape: {}", self.colors)?;
        writeln!(f, "Normals shape: {}", self.normals)?;

        if self.header.is_gaussian() {
            writeln!(f)?;
            writeln!(f, "Gaussian Properties:")?;
            for entry in &self.gaussian_properties {
                writeln!(f, "  {}: shape={:?}", entry.name, entry.shape)?;
            }
            if let Some((min, max)) = self.opacity_range {
                writeln!(f, "Opacity range: [{:.4}, {:.4}]", min, max)?;
            }
        }
        Ok(())
    }
}

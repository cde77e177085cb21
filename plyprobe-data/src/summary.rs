//! Per-property statistics for a parsed cloud.

use crate::ply::{CloudKind, ParsedCloud, ScalarKind};
use serde::Serialize;
use std::fmt;

/// Shape, declared type and value range of one vertex property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyStats {
    pub name: String,
    pub shape: Vec<usize>,
    pub scalar_type: ScalarKind,
    pub min: Option<f32>,
    pub max: Option<f32>,
}

/// Snapshot of a cloud's header facts and property statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudSummary {
    pub source: String,
    pub vertex_count: usize,
    pub kind: CloudKind,
    pub properties: Vec<PropertyStats>,
}

impl ParsedCloud {
    pub fn summary(&self) -> CloudSummary {
        let properties = self
            .fields()
            .iter()
            .map(|(name, field)| {
                let range = field.data.range();
                PropertyStats {
                    name: name.to_string(),
                    shape: field.data.shape(),
                    scalar_type: field.scalar_type,
                    min: range.map(|(lo, _)| lo),
                    max: range.map(|(_, hi)| hi),
                }
            })
            .collect();

        CloudSummary {
            source: self.source().to_string(),
            vertex_count: self.vertex_count(),
            kind: self.kind(),
            properties,
        }
    }
}

impl fmt::Display for PropertyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape.as_slice() {
            [n] => write!(f, "{}: {} elements, {}", self.name, n, self.scalar_type)?,
            shape => write!(f, "{}: {:?} shape, {}", self.name, shape, self.scalar_type)?,
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if self.scalar_type.is_float() {
                write!(f, ", Range: [{:.4}, {:.4}]", min, max)?;
            } else {
                write!(f, ", Range: [{}, {}]", min, max)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for CloudSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PLY File: {}", self.source)?;
        writeln!(f, "Vertex Count: {}", self.vertex_count)?;
        writeln!(f, "Point Cloud Type: {}", self.kind)?;
        let names: Vec<_> = self.properties.iter().map(|p| p.name.as_str()).collect();
        writeln!(f, "Properties: [{}]", names.join(", "))?;
        writeln!(f)?;
        writeln!(f, "Property Statistics:")?;
        for property in &self.properties {
            writeln!(f, "  - {}", property)?;
        }
        Ok(())
    }
}

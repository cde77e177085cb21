//! Descriptive PLY header summary.

use crate::ply::CloudKind;
use serde::Serialize;
use std::fmt;

/// Container encoding declared by the `format` header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl PlyFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            PlyFormat::Ascii => "ascii",
            PlyFormat::BinaryLittleEndian => "binary_little_endian",
            PlyFormat::BinaryBigEndian => "binary_big_endian",
        }
    }
}

impl fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only header facts. Not consulted by any accessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderInfo {
    pub format: PlyFormat,
    pub version: String,
    /// Element names in declaration order, including ones that are not decoded.
    pub elements: Vec<String>,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
    pub vertex_count: usize,
    pub kind: CloudKind,
}

impl HeaderInfo {
    pub fn is_gaussian(&self) -> bool {
        self.kind.is_gaussian()
    }
}

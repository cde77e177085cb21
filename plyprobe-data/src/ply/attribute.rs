//! Per-vertex attribute storage.

use crate::ply::PlyError;
use serde::Serialize;
use std::fmt;

/// Declared PLY scalar type of a property (element type for list properties).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarKind {
    pub fn is_float(self) -> bool {
        matches!(self, ScalarKind::Float | ScalarKind::Double)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Char => "char",
            ScalarKind::UChar => "uchar",
            ScalarKind::Short => "short",
            ScalarKind::UShort => "ushort",
            ScalarKind::Int => "int",
            ScalarKind::UInt => "uint",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Homogeneous numeric array with one entry (or one row) per vertex.
///
/// Scalar properties are stored as `Scalar`, list properties as a row-major
/// `Matrix` with `cols` values per vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeArray {
    Scalar(Vec<f32>),
    Matrix {
        rows: usize,
        cols: usize,
        data: Vec<f32>,
    },
}

impl AttributeArray {
    /// Build a matrix from row-major data. `data.len()` must equal `rows * cols`.
    pub(crate) fn matrix(rows: usize, cols: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        AttributeArray::Matrix { rows, cols, data }
    }

    /// Leading dimension (the vertex count).
    pub fn len(&self) -> usize {
        match self {
            AttributeArray::Scalar(values) => values.len(),
            AttributeArray::Matrix { rows, .. } => *rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ndim(&self) -> usize {
        match self {
            AttributeArray::Scalar(_) => 1,
            AttributeArray::Matrix { .. } => 2,
        }
    }

    /// Values per vertex: 1 for scalars, `cols` for matrices.
    pub fn width(&self) -> usize {
        match self {
            AttributeArray::Scalar(_) => 1,
            AttributeArray::Matrix { cols, .. } => *cols,
        }
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            AttributeArray::Scalar(values) => vec![values.len()],
            AttributeArray::Matrix { rows, cols, .. } => vec![*rows, *cols],
        }
    }

    /// Flat view of all values (row-major for matrices).
    pub fn values(&self) -> &[f32] {
        match self {
            AttributeArray::Scalar(values) => values,
            AttributeArray::Matrix { data, .. } => data,
        }
    }

    pub fn as_scalar(&self) -> Option<&[f32]> {
        match self {
            AttributeArray::Scalar(values) => Some(values),
            AttributeArray::Matrix { .. } => None,
        }
    }

    /// Values belonging to vertex `index`.
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.len() {
            return None;
        }
        let width = self.width();
        self.values().get(index * width..(index + 1) * width)
    }

    /// Iterate over per-vertex rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// First value of vertex `index`, whatever the width.
    pub fn first_value(&self, index: usize) -> Option<f32> {
        self.row(index).and_then(|row| row.first().copied())
    }

    /// Apply `f` to every value, keeping the shape.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        match self {
            AttributeArray::Scalar(values) => {
                AttributeArray::Scalar(values.iter().map(|&v| f(v)).collect())
            }
            AttributeArray::Matrix { rows, cols, data } => AttributeArray::Matrix {
                rows: *rows,
                cols: *cols,
                data: data.iter().map(|&v| f(v)).collect(),
            },
        }
    }

    /// Minimum and maximum over all values, ignoring NaNs.
    pub fn range(&self) -> Option<(f32, f32)> {
        self.values()
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Stack arrays side by side into an `N x sum(width)` matrix.
    ///
    /// Every input must have the same leading dimension; scalars contribute
    /// one column, matrices all of theirs.
    pub fn column_stack(columns: &[(&str, &AttributeArray)]) -> Result<Self, PlyError> {
        let Some((_, first)) = columns.first() else {
            return Ok(AttributeArray::matrix(0, 0, Vec::new()));
        };
        let rows = first.len();
        for (name, column) in columns {
            if column.len() != rows {
                return Err(PlyError::ShapeMismatch {
                    name: (*name).to_string(),
                    expected: format!("{} rows", rows),
                    found: shape_label(&column.shape()),
                });
            }
        }

        let cols: usize = columns.iter().map(|(_, c)| c.width()).sum();
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for (_, column) in columns {
                if let Some(row) = column.row(i) {
                    data.extend_from_slice(row);
                }
            }
        }
        Ok(AttributeArray::matrix(rows, cols, data))
    }
}

/// Render a shape like numpy does: `(2,)` or `(2, 3)`.
pub(crate) fn shape_label(shape: &[usize]) -> String {
    match shape {
        [n] => format!("({},)", n),
        dims => format!(
            "({})",
            dims.iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

//! Parsed point cloud and its attribute accessors.

use crate::ply::attribute::shape_label;
use crate::ply::schema::{
    COLOR_FIELDS, GAUSSIAN_PROPERTIES, NORMAL_FIELDS, OPACITY_FIELD, POSITION_FIELDS, SH_DC_FIELD,
};
use crate::ply::{AttributeArray, CloudKind, FieldTable, HeaderInfo, PlyError};
use tracing::debug;

/// An immutable, fully decoded vertex element.
///
/// Built once by [`parse`](crate::ply::parse); every accessor takes `&self`,
/// so a `ParsedCloud` can be shared freely between readers.
#[derive(Debug, Clone)]
pub struct ParsedCloud {
    source: String,
    header: HeaderInfo,
    fields: FieldTable,
}

impl ParsedCloud {
    pub(crate) fn from_parts(source: String, header: HeaderInfo, fields: FieldTable) -> Self {
        Self {
            source,
            header,
            fields,
        }
    }

    /// Where the data was read from (file path or caller-supplied label).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn header(&self) -> &HeaderInfo {
        &self.header
    }

    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    pub fn kind(&self) -> CloudKind {
        self.header.kind
    }

    pub fn is_gaussian(&self) -> bool {
        self.header.kind.is_gaussian()
    }

    pub fn vertex_count(&self) -> usize {
        self.header.vertex_count
    }

    /// Look up a vertex property by name.
    pub fn get_property(&self, name: &str) -> Result<&AttributeArray, PlyError> {
        self.fields.get(name)
    }

    /// `x, y, z` stacked into an `N x 3` matrix.
    pub fn get_position(&self) -> Result<AttributeArray, PlyError> {
        self.stack(&POSITION_FIELDS)
    }

    /// `nx, ny, nz` stacked into an `N x 3` matrix.
    pub fn get_normals(&self) -> Result<AttributeArray, PlyError> {
        self.stack(&NORMAL_FIELDS)
    }

    /// Per-vertex color.
    ///
    /// Gaussian clouds read the spherical-harmonic DC term from `f_dc_0` when
    /// it exists: a one-dimensional array is returned unchanged, a matrix is
    /// read as `[bands, 3]` per vertex and only band zero is kept. Everything
    /// else, including Gaussian clouds without `f_dc_0`, uses `red, green,
    /// blue` scaled to `[0, 1]`.
    pub fn get_color(&self) -> Result<AttributeArray, PlyError> {
        match self.kind() {
            CloudKind::Gaussian => match self.fields.get_opt(SH_DC_FIELD) {
                Some(f_dc) => sh_dc_band(f_dc),
                None => {
                    debug!("Gaussian cloud has no {}, using RGB color", SH_DC_FIELD);
                    self.rgb_color()
                }
            },
            CloudKind::Geometric => self.rgb_color(),
        }
    }

    /// Opacity, only for Gaussian clouds that store it.
    pub fn get_opacity(&self) -> Option<&AttributeArray> {
        match self.kind() {
            CloudKind::Geometric => None,
            CloudKind::Gaussian => self.fields.get_opt(OPACITY_FIELD),
        }
    }

    /// Splat-specific properties that are present, in reporting order.
    ///
    /// Empty for geometric clouds. Absent names are skipped.
    pub fn get_gaussian_properties(&self) -> Vec<(&'static str, &AttributeArray)> {
        match self.kind() {
            CloudKind::Geometric => Vec::new(),
            CloudKind::Gaussian => GAUSSIAN_PROPERTIES
                .iter()
                .filter_map(|&name| self.fields.get_opt(name).map(|array| (name, array)))
                .collect(),
        }
    }

    pub(crate) fn rgb_color(&self) -> Result<AttributeArray, PlyError> {
        Ok(self.stack(&COLOR_FIELDS)?.map(|v| v / 255.0))
    }

    fn stack(&self, names: &[&str]) -> Result<AttributeArray, PlyError> {
        let columns = names
            .iter()
            .map(|&name| self.get_property(name).map(|array| (name, array)))
            .collect::<Result<Vec<_>, _>>()?;
        AttributeArray::column_stack(&columns)
    }
}

fn sh_dc_band(f_dc: &AttributeArray) -> Result<AttributeArray, PlyError> {
    match f_dc {
        AttributeArray::Scalar(_) => Ok(f_dc.clone()),
        AttributeArray::Matrix { rows: 0, .. } => Ok(AttributeArray::matrix(0, 3, Vec::new())),
        AttributeArray::Matrix { rows, cols, data } => {
            if *cols < 3 || cols % 3 != 0 {
                return Err(PlyError::ShapeMismatch {
                    name: SH_DC_FIELD.to_string(),
                    expected: "(N, 3 * bands)".to_string(),
                    found: shape_label(&f_dc.shape()),
                });
            }
            let band = data
                .chunks_exact(*cols)
                .flat_map(|row| row[..3].iter().copied())
                .collect();
            Ok(AttributeArray::matrix(*rows, 3, band))
        }
    }
}

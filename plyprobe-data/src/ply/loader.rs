//! PLY file loading functions

use crate::ply::{
    AttributeArray, CloudKind, Field, FieldTable, HeaderInfo, ParsedCloud, PlyError, PlyFormat,
    ScalarKind,
};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Encoding, Header, Property, PropertyDef, PropertyType, ScalarType};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

const VERTEX_ELEMENT: &str = "vertex";

/// Parse a PLY file from disk.
///
/// The file is closed before this returns, on success and on failure alike.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn parse(path: impl AsRef<Path>) -> Result<ParsedCloud, PlyError> {
    let path = path.as_ref();
    debug!("Loading PLY file: {}", path.display());
    let file = File::open(path).map_err(|source| PlyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_reader(BufReader::new(file), &path.display().to_string())
}

/// Parse PLY data from any buffered reader. `source` is only used for reporting.
#[tracing::instrument(skip_all, fields(source = %source))]
pub fn parse_reader<R: BufRead>(mut reader: R, source: &str) -> Result<ParsedCloud, PlyError> {
    let parser = Parser::<DefaultElement>::new();

    let header = parser.read_header(&mut reader).map_err(|e| {
        warn!("Failed to parse PLY header: {}", e);
        PlyError::Decode(e)
    })?;
    debug!(
        "PLY header: {:?}, elements [{}]",
        header.encoding,
        header.elements.keys().cloned().collect::<Vec<_>>().join(", ")
    );

    let vertex_def = header
        .elements
        .get(VERTEX_ELEMENT)
        .ok_or_else(|| PlyError::InvalidContainer("missing vertex element".to_string()))?;

    let payload = parser.read_payload(&mut reader, &header).map_err(|e| {
        warn!("Failed to read PLY payload: {}", e);
        PlyError::Decode(e)
    })?;
    drop(reader);

    let rows: &[DefaultElement] = payload
        .get(VERTEX_ELEMENT)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    if rows.len() != vertex_def.count {
        return Err(PlyError::InvalidContainer(format!(
            "vertex element declares {} rows but {} were decoded",
            vertex_def.count,
            rows.len()
        )));
    }

    let kind = CloudKind::classify(vertex_def.properties.keys().map(String::as_str));

    let mut fields = FieldTable::with_capacity(vertex_def.properties.len());
    for (name, def) in vertex_def.properties.iter() {
        fields.insert(name.clone(), decode_field(name, def, rows)?);
    }

    let summary = header_info(&header, vertex_def.count, kind);
    info!(
        "PLY file parsed: {} vertices, {} properties, {}",
        summary.vertex_count,
        fields.len(),
        kind
    );

    Ok(ParsedCloud::from_parts(source.to_string(), summary, fields))
}

fn header_info(header: &Header, vertex_count: usize, kind: CloudKind) -> HeaderInfo {
    let format = match header.encoding {
        Encoding::Ascii => PlyFormat::Ascii,
        Encoding::BinaryLittleEndian => PlyFormat::BinaryLittleEndian,
        Encoding::BinaryBigEndian => PlyFormat::BinaryBigEndian,
    };
    HeaderInfo {
        format,
        version: format!("{}.{}", header.version.major, header.version.minor),
        elements: header.elements.keys().cloned().collect(),
        comments: header.comments.clone(),
        obj_info: header.obj_infos.clone(),
        vertex_count,
        kind,
    }
}

/// Materialize one vertex property as a column: scalars become `Scalar`,
/// lists become an `N x K` `Matrix`.
fn decode_field(name: &str, def: &PropertyDef, rows: &[DefaultElement]) -> Result<Field, PlyError> {
    match &def.data_type {
        PropertyType::Scalar(ty) => {
            let mut values = Vec::with_capacity(rows.len());
            for (i, row) in rows.iter().enumerate() {
                let value = row.get(name).and_then(scalar_value).ok_or_else(|| {
                    PlyError::InvalidContainer(format!(
                        "vertex {} has no scalar value for '{}'",
                        i, name
                    ))
                })?;
                values.push(value);
            }
            Ok(Field {
                scalar_type: scalar_kind(ty),
                data: AttributeArray::Scalar(values),
            })
        }
        PropertyType::List(_, ty) => {
            let mut cols = None;
            let mut data = Vec::new();
            for (i, row) in rows.iter().enumerate() {
                let list = row.get(name).and_then(list_values).ok_or_else(|| {
                    PlyError::InvalidContainer(format!(
                        "vertex {} has no list value for '{}'",
                        i, name
                    ))
                })?;
                match cols {
                    None => {
                        cols = Some(list.len());
                        data.reserve(rows.len() * list.len());
                    }
                    Some(width) if width != list.len() => {
                        return Err(PlyError::RaggedList {
                            name: name.to_string(),
                        });
                    }
                    Some(_) => {}
                }
                data.extend(list);
            }
            Ok(Field {
                scalar_type: scalar_kind(ty),
                data: AttributeArray::matrix(rows.len(), cols.unwrap_or(0), data),
            })
        }
    }
}

fn scalar_kind(ty: &ScalarType) -> ScalarKind {
    match ty {
        ScalarType::Char => ScalarKind::Char,
        ScalarType::UChar => ScalarKind::UChar,
        ScalarType::Short => ScalarKind::Short,
        ScalarType::UShort => ScalarKind::UShort,
        ScalarType::Int => ScalarKind::Int,
        ScalarType::UInt => ScalarKind::UInt,
        ScalarType::Float => ScalarKind::Float,
        ScalarType::Double => ScalarKind::Double,
    }
}

fn scalar_value(prop: &Property) -> Option<f32> {
    match prop {
        Property::Char(v) => Some(*v as f32),
        Property::UChar(v) => Some(*v as f32),
        Property::Short(v) => Some(*v as f32),
        Property::UShort(v) => Some(*v as f32),
        Property::Int(v) => Some(*v as f32),
        Property::UInt(v) => Some(*v as f32),
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        _ => None,
    }
}

fn list_values(prop: &Property) -> Option<Vec<f32>> {
    fn cast<T: Copy + Into<f64>>(values: &[T]) -> Vec<f32> {
        values.iter().map(|&v| Into::<f64>::into(v) as f32).collect()
    }

    match prop {
        Property::ListChar(v) => Some(cast(v)),
        Property::ListUChar(v) => Some(cast(v)),
        Property::ListShort(v) => Some(cast(v)),
        Property::ListUShort(v) => Some(cast(v)),
        Property::ListInt(v) => Some(cast(v)),
        Property::ListUInt(v) => Some(cast(v)),
        Property::ListFloat(v) => Some(v.clone()),
        Property::ListDouble(v) => Some(cast(v)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SIMPLE_ASCII: &str = "ply
format ascii 1.0
comment made by hand
element vertex 2
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
element face 0
property list uchar int vertex_indices
end_header
1.0 2.0 3.0 255 0 0
4.0 5.0 6.0 0 255 0
";

    fn parse_str(data: &str) -> Result<ParsedCloud, PlyError> {
        parse_reader(Cursor::new(data.as_bytes().to_vec()), "memory")
    }

    #[test]
    fn test_parse_header_info() {
        let cloud = parse_str(SIMPLE_ASCII).unwrap();
        let header = cloud.header();
        assert_eq!(header.format, PlyFormat::Ascii);
        assert_eq!(header.version, "1.0");
        assert_eq!(header.elements, vec!["vertex", "face"]);
        assert_eq!(header.comments, vec!["made by hand"]);
        assert_eq!(header.vertex_count, 2);
        assert_eq!(header.kind, CloudKind::Geometric);
        assert_eq!(cloud.source(), "memory");
    }

    #[test]
    fn test_parse_fields_in_declaration_order() {
        let cloud = parse_str(SIMPLE_ASCII).unwrap();
        let names: Vec<_> = cloud.fields().names().collect();
        assert_eq!(names, vec!["x", "y", "z", "red", "green", "blue"]);
        assert_eq!(
            cloud.fields().field("red").map(|f| f.scalar_type),
            Some(ScalarKind::UChar)
        );
    }

    #[test]
    fn test_missing_vertex_element() {
        let data = "ply
format ascii 1.0
element face 1
property list uchar int vertex_indices
end_header
3 0 1 2
";
        let err = parse_str(data).unwrap_err();
        assert!(matches!(err, PlyError::InvalidContainer(ref msg) if msg == "missing vertex element"));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = parse_str("not a ply file\n").unwrap_err();
        assert!(matches!(err, PlyError::Decode(_)));
    }

    #[test]
    fn test_list_property_becomes_matrix() {
        let data = "ply
format ascii 1.0
element vertex 2
property float x
property list uchar float f_dc_0
end_header
0.5 3 0.1 0.2 0.3
1.5 3 0.4 0.5 0.6
";
        let cloud = parse_str(data).unwrap();
        let f_dc = cloud.get_property("f_dc_0").unwrap();
        assert_eq!(f_dc.shape(), vec![2, 3]);
        assert_eq!(f_dc.row(1), Some(&[0.4, 0.5, 0.6][..]));
        assert!(cloud.is_gaussian());
    }

    #[test]
    fn test_ragged_list_rejected() {
        let data = "ply
format ascii 1.0
element vertex 2
property list uchar float scale
end_header
3 0.1 0.2 0.3
2 0.4 0.5
";
        let err = parse_str(data).unwrap_err();
        assert!(matches!(err, PlyError::RaggedList { ref name } if name == "scale"));
    }

    #[test]
    fn test_binary_little_endian() {
        let mut data = b"ply
format binary_little_endian 1.0
element vertex 2
property float x
property float y
property float z
property float opacity
end_header
"
        .to_vec();
        for v in [1.0f32, 2.0, 3.0, 0.25, -1.0, -2.0, -3.0, 0.75] {
            data.extend_from_slice(&v.to_le_bytes());
        }

        let cloud = parse_reader(Cursor::new(data), "binary").unwrap();
        assert_eq!(cloud.header().format, PlyFormat::BinaryLittleEndian);
        assert!(cloud.is_gaussian());
        let position = cloud.get_position().unwrap();
        assert_eq!(position.values(), &[1.0, 2.0, 3.0, -1.0, -2.0, -3.0]);
        assert_eq!(
            cloud.get_opacity(),
            Some(&AttributeArray::Scalar(vec![0.25, 0.75]))
        );
    }

    #[test]
    fn test_binary_big_endian() {
        let mut data = b"ply
format binary_big_endian 1.0
obj_info captured by rig 7
element vertex 1
property float x
property float y
property float z
end_header
"
        .to_vec();
        for v in [1.0f32, 2.0, 3.0] {
            data.extend_from_slice(&v.to_be_bytes());
        }

        let cloud = parse_reader(Cursor::new(data), "big-endian").unwrap();
        let header = cloud.header();
        assert_eq!(header.format, PlyFormat::BinaryBigEndian);
        assert_eq!(header.obj_info, vec!["captured by rig 7"]);
        assert!(header.comments.is_empty());
        assert_eq!(cloud.kind(), CloudKind::Geometric);
        assert_eq!(cloud.get_position().unwrap().values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_parse_from_path() {
        let path = std::env::temp_dir().join(format!("plyprobe-loader-{}.ply", std::process::id()));
        std::fs::write(&path, SIMPLE_ASCII).unwrap();

        let cloud = parse(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cloud.vertex_count(), 2);
        assert_eq!(cloud.source(), path.display().to_string());
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse("/definitely/not/here.ply").unwrap_err();
        assert!(matches!(err, PlyError::Io { .. }));
    }
}

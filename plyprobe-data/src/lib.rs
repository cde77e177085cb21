//! plyprobe data crate
//!
//! Loads the vertex element of a PLY file into a name-indexed field table,
//! classifies it as a plain geometric cloud or a 3D Gaussian splat cloud, and
//! exposes typed accessors that work across both.

pub mod convert;
pub mod ply;
pub mod summary;
pub mod types;

pub use convert::{GaussianDecodeConfig, SH_C0, activate_opacity, sh_dc_to_rgb};
pub use ply::{
    AttributeArray, CloudKind, Field, FieldTable, HeaderInfo, ParsedCloud, PlyError, PlyFormat,
    ScalarKind, parse, parse_reader,
};
pub use summary::{CloudSummary, PropertyStats};
pub use types::{Gaussian, Point};

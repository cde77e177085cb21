//! PLY vertex loading, schema classification and attribute access.

mod attribute;
mod cloud;
mod error;
mod header;
mod loader;
pub mod schema;
mod table;

pub use attribute::{AttributeArray, ScalarKind};
pub use cloud::ParsedCloud;
pub use error::PlyError;
pub use header::{HeaderInfo, PlyFormat};
pub use loader::{parse, parse_reader};
pub use schema::CloudKind;
pub use table::{Field, FieldTable};

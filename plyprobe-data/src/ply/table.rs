//! Name-indexed vertex field table.

use crate::ply::{AttributeArray, PlyError, ScalarKind};
use std::collections::HashMap;

/// A decoded vertex property and its declared scalar type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub scalar_type: ScalarKind,
    pub data: AttributeArray,
}

/// Mapping from property name to per-vertex array, in declaration order.
///
/// Filled once by the loader; there is no public way to insert, remove or
/// rename entries afterwards.
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    order: Vec<String>,
    fields: HashMap<String, Field>,
}

impl FieldTable {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
            fields: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a field. A repeated name keeps its first position but takes the new data.
    pub(crate) fn insert(&mut self, name: String, field: Field) {
        if !self.fields.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.fields.insert(name, field);
    }

    /// Look up a field, failing with the list of available names.
    pub fn get(&self, name: &str) -> Result<&AttributeArray, PlyError> {
        self.get_opt(name).ok_or_else(|| PlyError::AttributeNotFound {
            name: name.to_string(),
            available: self.order.clone(),
        })
    }

    /// Look up a field, `None` when absent.
    pub fn get_opt(&self, name: &str) -> Option<&AttributeArray> {
        self.fields.get(name).map(|field| &field.data)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// `(name, field)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.fields.get(name).map(|field| (name.as_str(), field)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(values: &[f32]) -> Field {
        Field {
            scalar_type: ScalarKind::Float,
            data: AttributeArray::Scalar(values.to_vec()),
        }
    }

    #[test]
    fn test_get_missing_lists_available() {
        let mut table = FieldTable::default();
        table.insert("x".to_string(), scalar(&[1.0]));
        table.insert("y".to_string(), scalar(&[2.0]));

        let err = table.get("nx").unwrap_err();
        match &err {
            PlyError::AttributeNotFound { name, available } => {
                assert_eq!(name, "nx");
                assert_eq!(available, &vec!["x".to_string(), "y".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Property 'nx' not found. Available properties: x, y"
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let mut table = FieldTable::default();
        for name in ["z", "a", "m"] {
            table.insert(name.to_string(), scalar(&[0.0]));
        }
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(table.len(), 3);
        assert!(table.get_opt("a").is_some());
        assert!(table.get_opt("b").is_none());
    }
}

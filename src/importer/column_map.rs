// ==========================================
// Panel Load Engineering - column mapping and boundary coercion
// ==========================================
// Responsibility: logical field table, target-field -> source-column
// mapping, and explicit string -> number/bool coercions applied at the
// ingestion boundary (never inline casts downstream)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Logical field ids
pub const FIELD_PART_NUMBER: &str = "part_number";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_MANUFACTURER: &str = "manufacturer";
pub const FIELD_QTY: &str = "qty";
pub const FIELD_UNIT: &str = "unit";
pub const FIELD_UNIT_PRICE: &str = "unit_price";
pub const FIELD_REFERENCE: &str = "reference";
pub const FIELD_POWER_GROUP: &str = "power_group";

/// One logical import field
#[derive(Debug, Clone, Copy)]
pub struct ImportField {
    pub id: &'static str,
    pub label: &'static str,
    pub required: bool,
}

/// The fields a spreadsheet column can be mapped onto.
pub const IMPORT_FIELDS: &[ImportField] = &[
    ImportField {
        id: FIELD_PART_NUMBER,
        label: "Part Number",
        required: true,
    },
    ImportField {
        id: FIELD_DESCRIPTION,
        label: "Description",
        required: true,
    },
    ImportField {
        id: FIELD_MANUFACTURER,
        label: "Manufacturer",
        required: false,
    },
    ImportField {
        id: FIELD_QTY,
        label: "Quantity",
        required: false,
    },
    ImportField {
        id: FIELD_UNIT,
        label: "Unit",
        required: false,
    },
    ImportField {
        id: FIELD_UNIT_PRICE,
        label: "Unit Price",
        required: false,
    },
    ImportField {
        id: FIELD_REFERENCE,
        label: "Reference",
        required: false,
    },
    ImportField {
        id: FIELD_POWER_GROUP,
        label: "Power Group",
        required: false,
    },
];

// ==========================================
// ColumnMapping - targetField -> sourceColumn table
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnMapping {
    mappings: HashMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            mappings: pairs
                .iter()
                .map(|(field, column)| (field.to_string(), column.to_string()))
                .collect(),
        }
    }

    /// Map a logical field to a source column; None clears the mapping.
    pub fn set(&mut self, field: &str, column: Option<&str>) -> ImportResult<()> {
        if !IMPORT_FIELDS.iter().any(|f| f.id == field) {
            return Err(ImportError::UnknownField(field.to_string()));
        }
        match column {
            Some(col) => {
                self.mappings.insert(field.to_string(), col.to_string());
            }
            None => {
                self.mappings.remove(field);
            }
        }
        Ok(())
    }

    pub fn column_for(&self, field: &str) -> Option<&str> {
        self.mappings.get(field).map(String::as_str)
    }

    /// Required fields that are still unmapped; the pipeline will not
    /// advance past mapping while this is non-empty.
    pub fn missing_required(&self) -> Vec<&'static str> {
        IMPORT_FIELDS
            .iter()
            .filter(|f| f.required && !self.mappings.contains_key(f.id))
            .map(|f| f.id)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.mappings
    }
}

// ==========================================
// MappingTemplate - a saved, named column mapping
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingTemplate {
    pub id: uuid::Uuid,
    pub name: String,
    pub mapping: ColumnMapping,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// ==========================================
// Boundary coercions
// ==========================================

/// Mapped cell value, trimmed; empty normalizes to None.
pub fn get_string(row: &HashMap<String, String>, column: &str) -> Option<String> {
    row.get(column)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a float cell, tagged with row and field on failure.
pub fn parse_f64(
    row: &HashMap<String, String>,
    column: &str,
    field: &str,
    row_number: usize,
) -> ImportResult<Option<f64>> {
    match get_string(row, column) {
        None => Ok(None),
        Some(value) => value.parse::<f64>().map(Some).map_err(|_| {
            ImportError::TypeConversionError {
                row: row_number,
                field: field.to_string(),
                message: format!("not a number: {}", value),
            }
        }),
    }
}

/// Parse an integer cell.
pub fn parse_i64(
    row: &HashMap<String, String>,
    column: &str,
    field: &str,
    row_number: usize,
) -> ImportResult<Option<i64>> {
    match get_string(row, column) {
        None => Ok(None),
        Some(value) => value.parse::<i64>().map(Some).map_err(|_| {
            ImportError::TypeConversionError {
                row: row_number,
                field: field.to_string(),
                message: format!("not an integer: {}", value),
            }
        }),
    }
}

/// Parse a boolean cell; accepts 1/0, true/false, yes/no, y/n.
pub fn parse_bool(
    row: &HashMap<String, String>,
    column: &str,
    field: &str,
    row_number: usize,
) -> ImportResult<Option<bool>> {
    match get_string(row, column) {
        None => Ok(None),
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" => Ok(Some(true)),
            "0" | "false" | "no" | "n" => Ok(Some(false)),
            other => Err(ImportError::TypeConversionError {
                row: row_number,
                field: field.to_string(),
                message: format!("not a boolean: {}", other),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_required_tracks_both_fields() {
        let mut mapping = ColumnMapping::new();
        assert_eq!(
            mapping.missing_required(),
            vec![FIELD_PART_NUMBER, FIELD_DESCRIPTION]
        );

        mapping.set(FIELD_PART_NUMBER, Some("PN")).unwrap();
        assert_eq!(mapping.missing_required(), vec![FIELD_DESCRIPTION]);

        mapping.set(FIELD_DESCRIPTION, Some("Desc")).unwrap();
        assert!(mapping.is_complete());

        mapping.set(FIELD_PART_NUMBER, None).unwrap();
        assert!(!mapping.is_complete());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut mapping = ColumnMapping::new();
        assert!(matches!(
            mapping.set("voltage", Some("V")),
            Err(ImportError::UnknownField(_))
        ));
    }

    #[test]
    fn test_parse_f64_tags_row_and_field() {
        let r = row(&[("Qty", "abc")]);
        let err = parse_f64(&r, "Qty", FIELD_QTY, 4).unwrap_err();
        match err {
            ImportError::TypeConversionError { row, field, .. } => {
                assert_eq!(row, 4);
                assert_eq!(field, "qty");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_empty_cell_is_none() {
        let r = row(&[("Qty", "   ")]);
        assert_eq!(parse_f64(&r, "Qty", FIELD_QTY, 1).unwrap(), None);
        assert_eq!(parse_i64(&r, "Qty", FIELD_QTY, 1).unwrap(), None);
        assert_eq!(parse_bool(&r, "Qty", FIELD_QTY, 1).unwrap(), None);
    }

    #[test]
    fn test_parse_bool_accepted_spellings() {
        for (value, expected) in [("1", true), ("Yes", true), ("0", false), ("n", false)] {
            let r = row(&[("Spare", value)]);
            assert_eq!(
                parse_bool(&r, "Spare", "is_spare", 1).unwrap(),
                Some(expected)
            );
        }
        let r = row(&[("Spare", "maybe")]);
        assert!(parse_bool(&r, "Spare", "is_spare", 1).is_err());
    }
}

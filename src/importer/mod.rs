// ==========================================
// Panel Load Engineering - import layer
// ==========================================
// Responsibility: spreadsheet-export ingestion into line items
// Stages: upload -> mapping -> matching -> preview -> commit
// ==========================================

pub mod column_map;
pub mod csv_reader;
pub mod error;
pub mod session;

// Re-export core types
pub use column_map::{
    get_string, parse_bool, parse_f64, parse_i64, ColumnMapping, ImportField, MappingTemplate,
    IMPORT_FIELDS,
};
pub use csv_reader::{read_csv, read_csv_file, ParsedRows};
pub use error::{ImportError, ImportResult};
pub use session::{ImportSession, PreviewLineItem};

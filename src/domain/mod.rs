// ==========================================
// Panel Load Engineering - domain layer
// ==========================================
// Responsibility: entities and value types
// Red line: no data access logic, no engine logic
// ==========================================

pub mod line_item;
pub mod package;
pub mod part;
pub mod types;

// Re-export core types
pub use line_item::{LineItem, LoadProject, NewLineItem, VoltageTable};
pub use package::{BomItem, BomLocation, BomPackage, JobProject, NewBomItem};
pub use part::{CatalogPart, ElectricalVariant};
pub use types::{ImportStep, MatchState, PhaseAssignment, ValidationSeverity, VoltageType};

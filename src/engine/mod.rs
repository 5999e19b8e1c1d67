// ==========================================
// Panel Load Engineering - engine layer
// ==========================================
// Responsibility: business rules (resolution, aggregation, validation,
// matching)
// Red line: engines never build SQL; pure computation never suspends
// ==========================================

pub mod aggregation;
pub mod matching;
pub mod normalize;
pub mod resolution;
pub mod validation;

// Re-export core engine surface
pub use aggregation::{
    balance_pct, calculate_table_results, phase_loading, total_amperes, total_heat_btu,
    total_watts, PhaseLoading, TableCalculationResult, BTU_PER_WATT,
};
pub use matching::{
    apply_manual_entry, match_all_rows, match_row, skip_result, CatalogLookup, CatalogSnapshot,
    ManualEntry, MatchResult, PartMatch,
};
pub use normalize::{normalize, normalize_opt};
pub use resolution::{resolve_line_item, ElectricalSpecSource, ResolvedLineItem};
pub use validation::{has_errors, validate_line_items, ValidationIssue};

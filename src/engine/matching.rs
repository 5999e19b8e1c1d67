// ==========================================
// Panel Load Engineering - part matching engine
// ==========================================
// Responsibility: match imported rows against the parts catalog with a
// confidence score; drive the per-row state machine
//   Pending -> {Matched | Unmatched} -> {Manual | Skipped}
// Red line: a failed catalog lookup downgrades that row to a non-match,
// it never aborts the batch
// ==========================================

use crate::config::MatchingConfig;
use crate::domain::part::CatalogPart;
use crate::domain::types::MatchState;
use crate::engine::normalize::normalize;
use crate::repository::error::RepositoryResult;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

// ==========================================
// ManualEntry - operator-supplied row payload
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualEntry {
    pub part_number: String,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
    pub wattage: Option<f64>,
    pub amperage: Option<f64>,
    pub heat_dissipation_btu: Option<f64>,
}

// ==========================================
// MatchResult - ephemeral, one per imported row
// ==========================================
// Created fresh per import session and discarded with it; never
// persisted directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub row_index: usize,
    pub part_id: Option<i64>,
    /// Self-reported certainty in [0, 1]
    pub confidence: f64,
    pub state: MatchState,
    pub matched_part_number: Option<String>,
    pub matched_manufacturer: Option<String>,
    pub manual_entry: Option<ManualEntry>,
}

impl MatchResult {
    fn unmatched(row_index: usize) -> Self {
        Self {
            row_index,
            part_id: None,
            confidence: 0.0,
            state: MatchState::Unmatched,
            matched_part_number: None,
            matched_manufacturer: None,
            manual_entry: None,
        }
    }

    /// Rows the import commit may write: matched or manual only.
    pub fn is_eligible(&self) -> bool {
        matches!(self.state, MatchState::Matched | MatchState::Manual)
    }
}

// ==========================================
// PartMatch - raw lookup outcome before classification
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PartMatch {
    pub part_id: Option<i64>,
    pub confidence: f64,
    pub matched_part_number: Option<String>,
    pub matched_manufacturer: Option<String>,
}

/// Catalog seam consumed by the matching engine. The contract is
/// whole-catalog retrieval; server-side filtering is not assumed.
#[async_trait::async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn find_exact_match(
        &self,
        part_number: &str,
        manufacturer: Option<&str>,
        config: &MatchingConfig,
    ) -> RepositoryResult<PartMatch>;
}

// ==========================================
// CatalogSnapshot - caller-owned catalog copy
// ==========================================
// An explicit snapshot object passed into the batch call, so tests can
// inject deterministic fixtures and callers control staleness.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    parts: Vec<CatalogPart>,
}

impl CatalogSnapshot {
    pub fn new(parts: Vec<CatalogPart>) -> Self {
        Self { parts }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[async_trait::async_trait]
impl CatalogLookup for CatalogSnapshot {
    /// Exact match on normalized part number, preferring a manufacturer
    /// match. A supplied-but-mismatched manufacturer drops confidence to
    /// the configured penalty value; a part-number miss returns no part
    /// at confidence 0.
    async fn find_exact_match(
        &self,
        part_number: &str,
        manufacturer: Option<&str>,
        config: &MatchingConfig,
    ) -> RepositoryResult<PartMatch> {
        if part_number.is_empty() {
            return Ok(PartMatch::default());
        }

        let part_norm = normalize(part_number, config);

        if let Some(mfr) = manufacturer {
            let mfr_norm = normalize(mfr, config);
            for part in &self.parts {
                if normalize(&part.part_number, config) == part_norm
                    && normalize(&part.manufacturer_name, config) == mfr_norm
                {
                    return Ok(PartMatch {
                        part_id: Some(part.id),
                        confidence: 1.0,
                        matched_part_number: Some(part.part_number.clone()),
                        matched_manufacturer: Some(part.manufacturer_name.clone()),
                    });
                }
            }
        }

        // Part-number-only pass: full confidence when no manufacturer was
        // supplied, penalized confidence when one was supplied but missed
        for part in &self.parts {
            if normalize(&part.part_number, config) == part_norm {
                let confidence = if manufacturer.is_some() {
                    config.mismatch_confidence
                } else {
                    1.0
                };
                return Ok(PartMatch {
                    part_id: Some(part.id),
                    confidence,
                    matched_part_number: Some(part.part_number.clone()),
                    matched_manufacturer: Some(part.manufacturer_name.clone()),
                });
            }
        }

        Ok(PartMatch::default())
    }
}

/// Extract part number and optional manufacturer strings from a row
/// using the caller-supplied column keys.
pub fn extract_part_and_manufacturer(
    row: &HashMap<String, String>,
    part_number_column: &str,
    manufacturer_column: Option<&str>,
) -> (String, Option<String>) {
    let part_number = row
        .get(part_number_column)
        .map(|v| v.trim().to_string())
        .unwrap_or_default();
    let manufacturer = manufacturer_column
        .and_then(|col| row.get(col))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    (part_number, manufacturer)
}

/// Match a single row against the catalog.
///
/// An empty part number is immediately unmatched at confidence 0. A
/// lookup failure is logged and downgraded to a non-match so one bad row
/// cannot abort a whole batch.
pub async fn match_row(
    row: &HashMap<String, String>,
    row_index: usize,
    part_number_column: &str,
    manufacturer_column: Option<&str>,
    config: &MatchingConfig,
    lookup: &(impl CatalogLookup + ?Sized),
) -> MatchResult {
    let (part_number, manufacturer) =
        extract_part_and_manufacturer(row, part_number_column, manufacturer_column);

    if part_number.is_empty() {
        return MatchResult::unmatched(row_index);
    }

    let found = match lookup
        .find_exact_match(&part_number, manufacturer.as_deref(), config)
        .await
    {
        Ok(found) => found,
        Err(e) => {
            warn!(row_index, error = %e, "catalog lookup failed, treating row as non-match");
            PartMatch::default()
        }
    };

    let state = if found.confidence >= config.match_threshold {
        MatchState::Matched
    } else {
        MatchState::Unmatched
    };

    MatchResult {
        row_index,
        part_id: found.part_id,
        confidence: found.confidence,
        state,
        matched_part_number: found.matched_part_number,
        matched_manufacturer: found.matched_manufacturer,
        manual_entry: None,
    }
}

/// Match all rows in fixed-size chunks.
///
/// Lookups within a chunk are awaited together; results preserve row
/// order by index regardless of completion order. The progress callback
/// fires after each chunk with (processed, total). There is no
/// cancellation primitive; callers observe completion or failure only.
pub async fn match_all_rows(
    rows: &[HashMap<String, String>],
    part_number_column: &str,
    manufacturer_column: Option<&str>,
    config: &MatchingConfig,
    lookup: &(impl CatalogLookup + ?Sized),
    mut on_progress: Option<&mut dyn FnMut(usize, usize)>,
) -> Vec<MatchResult> {
    let total = rows.len();
    let chunk_size = config.chunk_size.max(1);
    let mut results = Vec::with_capacity(total);

    for (chunk_index, chunk) in rows.chunks(chunk_size).enumerate() {
        let base = chunk_index * chunk_size;
        let chunk_results = join_all(chunk.iter().enumerate().map(|(offset, row)| {
            match_row(
                row,
                base + offset,
                part_number_column,
                manufacturer_column,
                config,
                lookup,
            )
        }))
        .await;
        results.extend(chunk_results);

        if let Some(cb) = on_progress.as_deref_mut() {
            cb(results.len(), total);
        }
    }

    results
}

/// Force a row into the manual state with the operator payload stored
/// verbatim. Manual entries never link a catalog part.
pub fn apply_manual_entry(
    result: &MatchResult,
    entry: ManualEntry,
    config: &MatchingConfig,
) -> MatchResult {
    MatchResult {
        state: MatchState::Manual,
        confidence: config.manual_confidence,
        part_id: None,
        manual_entry: Some(entry),
        ..result.clone()
    }
}

/// Force a row into the skipped state. Prior match metadata is kept for
/// audit/undo.
pub fn skip_result(result: &MatchResult) -> MatchResult {
    MatchResult {
        state: MatchState::Skipped,
        confidence: 0.0,
        ..result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::error::RepositoryError;

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(vec![
            CatalogPart {
                id: 1,
                part_number: "ABC-123".to_string(),
                manufacturer_name: "Siemens".to_string(),
                description: Some("Contactor".to_string()),
            },
            CatalogPart {
                id: 2,
                part_number: "DEF-456".to_string(),
                manufacturer_name: "Allen Bradley".to_string(),
                description: None,
            },
        ])
    }

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_exact_part_and_manufacturer_match() {
        let config = MatchingConfig::default();
        let found = catalog()
            .find_exact_match("abc-123", Some("SIEMENS"), &config)
            .await
            .unwrap();
        assert_eq!(found.part_id, Some(1));
        assert_eq!(found.confidence, 1.0);
        assert_eq!(found.matched_part_number.as_deref(), Some("ABC-123"));
    }

    #[tokio::test]
    async fn test_part_only_match_without_manufacturer() {
        let config = MatchingConfig::default();
        let found = catalog()
            .find_exact_match("ABC-123", None, &config)
            .await
            .unwrap();
        assert_eq!(found.part_id, Some(1));
        assert_eq!(found.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_manufacturer_mismatch_penalty() {
        let config = MatchingConfig::default();
        let found = catalog()
            .find_exact_match("ABC-123", Some("Schneider"), &config)
            .await
            .unwrap();
        assert_eq!(found.part_id, Some(1));
        assert_eq!(found.confidence, 0.8);
    }

    #[tokio::test]
    async fn test_no_match_at_all() {
        let config = MatchingConfig::default();
        let found = catalog()
            .find_exact_match("XYZ-999", Some("Siemens"), &config)
            .await
            .unwrap();
        assert_eq!(found.part_id, None);
        assert_eq!(found.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_match_row_empty_part_number_is_unmatched() {
        let config = MatchingConfig::default();
        let r = row(&[("Part Number", "   "), ("Manufacturer", "Siemens")]);
        let result = match_row(&r, 3, "Part Number", Some("Manufacturer"), &config, &catalog()).await;
        assert_eq!(result.state, MatchState::Unmatched);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.row_index, 3);
        assert_eq!(result.part_id, None);
    }

    #[tokio::test]
    async fn test_match_row_threshold_classification() {
        // Default threshold 0.9: mismatched manufacturer (0.8) falls below
        let config = MatchingConfig::default();
        let r = row(&[("Part Number", "ABC-123"), ("Manufacturer", "Schneider")]);
        let result = match_row(&r, 0, "Part Number", Some("Manufacturer"), &config, &catalog()).await;
        assert_eq!(result.state, MatchState::Unmatched);
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.part_id, Some(1));

        // Lowering the threshold flips the same row to matched
        let lenient = MatchingConfig {
            match_threshold: 0.7,
            ..MatchingConfig::default()
        };
        let result = match_row(&r, 0, "Part Number", Some("Manufacturer"), &lenient, &catalog()).await;
        assert_eq!(result.state, MatchState::Matched);
    }

    #[tokio::test]
    async fn test_match_all_rows_preserves_order_and_reports_progress() {
        let config = MatchingConfig {
            chunk_size: 2,
            ..MatchingConfig::default()
        };
        let rows = vec![
            row(&[("pn", "ABC-123")]),
            row(&[("pn", "nope")]),
            row(&[("pn", "DEF-456")]),
            row(&[("pn", "")]),
            row(&[("pn", "abc-123")]),
        ];

        let mut ticks = Vec::new();
        let mut cb = |processed: usize, total: usize| ticks.push((processed, total));
        let results =
            match_all_rows(&rows, "pn", None, &config, &catalog(), Some(&mut cb)).await;

        assert_eq!(results.len(), 5);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.row_index, i);
        }
        assert_eq!(results[0].state, MatchState::Matched);
        assert_eq!(results[1].state, MatchState::Unmatched);
        assert_eq!(results[2].state, MatchState::Matched);
        assert_eq!(results[3].state, MatchState::Unmatched);
        assert_eq!(results[4].state, MatchState::Matched);
        assert_eq!(ticks, vec![(2, 5), (4, 5), (5, 5)]);
    }

    #[tokio::test]
    async fn test_match_all_rows_is_idempotent() {
        let config = MatchingConfig::default();
        let rows = vec![
            row(&[("pn", "ABC-123"), ("mfr", "Siemens")]),
            row(&[("pn", "DEF-456"), ("mfr", "Wrong")]),
            row(&[("pn", "missing")]),
        ];
        let snapshot = catalog();

        let first = match_all_rows(&rows, "pn", Some("mfr"), &config, &snapshot, None).await;
        let second = match_all_rows(&rows, "pn", Some("mfr"), &config, &snapshot, None).await;
        assert_eq!(first, second);
    }

    /// Lookup that always fails, to exercise the per-row downgrade.
    struct FailingLookup;

    #[async_trait::async_trait]
    impl CatalogLookup for FailingLookup {
        async fn find_exact_match(
            &self,
            _part_number: &str,
            _manufacturer: Option<&str>,
            _config: &MatchingConfig,
        ) -> RepositoryResult<PartMatch> {
            Err(RepositoryError::DatabaseQueryError("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_downgrades_without_aborting_batch() {
        let config = MatchingConfig::default();
        let rows = vec![row(&[("pn", "ABC-123")]), row(&[("pn", "DEF-456")])];
        let results = match_all_rows(&rows, "pn", None, &config, &FailingLookup, None).await;
        assert_eq!(results.len(), 2);
        for r in &results {
            assert_eq!(r.state, MatchState::Unmatched);
            assert_eq!(r.part_id, None);
            assert_eq!(r.confidence, 0.0);
        }
    }

    #[tokio::test]
    async fn test_manual_entry_transition() {
        let config = MatchingConfig::default();
        let r = row(&[("pn", "nope")]);
        let result = match_row(&r, 0, "pn", None, &config, &catalog()).await;
        assert_eq!(result.state, MatchState::Unmatched);

        let manual = apply_manual_entry(
            &result,
            ManualEntry {
                part_number: "CUSTOM-1".to_string(),
                manufacturer: Some("Acme".to_string()),
                description: Some("Custom PSU".to_string()),
                wattage: Some(75.0),
                amperage: None,
                heat_dissipation_btu: None,
            },
            &config,
        );
        assert_eq!(manual.state, MatchState::Manual);
        assert_eq!(manual.confidence, 0.5);
        assert_eq!(manual.part_id, None);
        assert_eq!(
            manual.manual_entry.as_ref().unwrap().part_number,
            "CUSTOM-1"
        );
    }

    #[tokio::test]
    async fn test_skip_preserves_match_metadata() {
        let config = MatchingConfig::default();
        let r = row(&[("pn", "ABC-123"), ("mfr", "Wrong")]);
        let result = match_row(&r, 0, "pn", Some("mfr"), &config, &catalog()).await;
        assert_eq!(result.part_id, Some(1));

        let skipped = skip_result(&result);
        assert_eq!(skipped.state, MatchState::Skipped);
        assert_eq!(skipped.confidence, 0.0);
        // Prior metadata kept for audit/undo
        assert_eq!(skipped.part_id, Some(1));
        assert_eq!(skipped.matched_part_number.as_deref(), Some("ABC-123"));
    }
}

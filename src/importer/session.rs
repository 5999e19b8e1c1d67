// ==========================================
// Panel Load Engineering - import pipeline session
// ==========================================
// Stages: Upload -> Mapping -> Matching -> Preview -> Complete
// ==========================================
// Responsibility: orchestrate column mapping, batched matching,
// manual-entry/skip resolution and the final transactional bulk insert
// Red line: only rows in state matched/manual ever reach a write; the
// commit is all-or-nothing
// ==========================================

use crate::config::MatchingConfig;
use crate::domain::line_item::NewLineItem;
use crate::domain::types::{ImportStep, MatchState};
use crate::engine::matching::{
    apply_manual_entry, match_all_rows, skip_result, CatalogLookup, ManualEntry, MatchResult,
};
use crate::importer::column_map::{
    get_string, parse_f64, parse_i64, ColumnMapping, MappingTemplate, FIELD_DESCRIPTION,
    FIELD_MANUFACTURER, FIELD_PART_NUMBER, FIELD_POWER_GROUP, FIELD_QTY, FIELD_REFERENCE,
    FIELD_UNIT, FIELD_UNIT_PRICE,
};
use crate::importer::csv_reader::{read_csv_file, ParsedRows};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::line_item_repo::LineItemSink;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument};
use uuid::Uuid;

// ==========================================
// PreviewLineItem - read-only projection of an eligible row
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewLineItem {
    pub row_index: usize,
    pub state: MatchState,
    pub confidence: f64,
    pub part_id: Option<i64>,
    pub part_number: String,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub qty: i64,
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub reference: Option<String>,
    pub power_group: Option<String>,
}

// ==========================================
// ImportSession - one run of the import wizard
// ==========================================
// Match results live and die with the session; they are never persisted.
pub struct ImportSession {
    pub session_id: Uuid,
    step: ImportStep,
    headers: Vec<String>,
    rows: Vec<HashMap<String, String>>,
    mapping: ColumnMapping,
    match_results: Vec<MatchResult>,
    templates: Vec<MappingTemplate>,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportSession {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            step: ImportStep::Upload,
            headers: Vec::new(),
            rows: Vec::new(),
            mapping: ColumnMapping::new(),
            match_results: Vec::new(),
            templates: Vec::new(),
        }
    }

    pub fn step(&self) -> ImportStep {
        self.step
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[HashMap<String, String>] {
        &self.rows
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn match_results(&self) -> &[MatchResult] {
        &self.match_results
    }

    fn require_step(&self, expected: ImportStep) -> ImportResult<()> {
        if self.step != expected {
            return Err(ImportError::StepOutOfOrder {
                expected: format!("{:?}", expected).to_lowercase(),
                actual: format!("{:?}", self.step).to_lowercase(),
            });
        }
        Ok(())
    }

    // ==========================================
    // Upload stage
    // ==========================================

    /// Accept already-parsed rows (the common path: parsing happens at
    /// the application boundary). A new upload resets mappings and
    /// results.
    pub fn load_rows(
        &mut self,
        headers: Vec<String>,
        rows: Vec<HashMap<String, String>>,
    ) -> ImportResult<()> {
        if rows.is_empty() {
            return Err(ImportError::EmptyFile);
        }
        info!(session_id = %self.session_id, rows = rows.len(), "rows loaded");
        self.headers = headers;
        self.rows = rows;
        self.mapping = ColumnMapping::new();
        self.match_results = Vec::new();
        self.step = ImportStep::Mapping;
        Ok(())
    }

    /// Convenience upload path for CSV exports.
    pub fn load_csv_file<P: AsRef<Path>>(&mut self, path: P) -> ImportResult<()> {
        let ParsedRows { headers, rows } = read_csv_file(path)?;
        self.load_rows(headers, rows)
    }

    // ==========================================
    // Mapping stage
    // ==========================================

    pub fn set_mapping(&mut self, field: &str, column: Option<&str>) -> ImportResult<()> {
        self.mapping.set(field, column)
    }

    /// Advance to matching; refuses while a required field is unmapped.
    pub fn advance_to_matching(&mut self) -> ImportResult<()> {
        self.require_step(ImportStep::Mapping)?;
        if let Some(field) = self.mapping.missing_required().first() {
            return Err(ImportError::MissingRequiredMapping(field.to_string()));
        }
        self.step = ImportStep::Matching;
        Ok(())
    }

    pub fn save_template(&mut self, name: &str) -> Uuid {
        let template = MappingTemplate {
            id: Uuid::new_v4(),
            name: name.to_string(),
            mapping: self.mapping.clone(),
            created_at: chrono::Utc::now(),
        };
        let id = template.id;
        self.templates.push(template);
        id
    }

    pub fn load_template(&mut self, template_id: Uuid) -> bool {
        if let Some(template) = self.templates.iter().find(|t| t.id == template_id) {
            self.mapping = template.mapping.clone();
            return true;
        }
        false
    }

    pub fn delete_template(&mut self, template_id: Uuid) {
        self.templates.retain(|t| t.id != template_id);
    }

    pub fn templates(&self) -> &[MappingTemplate] {
        &self.templates
    }

    // ==========================================
    // Matching stage
    // ==========================================

    /// Run the batched matcher over all rows. Results preserve row order;
    /// the session moves to preview when the batch completes.
    #[instrument(skip_all, fields(session_id = %self.session_id))]
    pub async fn run_matching(
        &mut self,
        config: &MatchingConfig,
        lookup: &(impl CatalogLookup + ?Sized),
        on_progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> ImportResult<&[MatchResult]> {
        self.require_step(ImportStep::Matching)?;

        let part_column = self
            .mapping
            .column_for(FIELD_PART_NUMBER)
            .ok_or_else(|| ImportError::MissingRequiredMapping(FIELD_PART_NUMBER.to_string()))?
            .to_string();
        let manufacturer_column = self
            .mapping
            .column_for(FIELD_MANUFACTURER)
            .map(str::to_string);

        self.match_results = match_all_rows(
            &self.rows,
            &part_column,
            manufacturer_column.as_deref(),
            config,
            lookup,
            on_progress,
        )
        .await;

        let matched = self
            .match_results
            .iter()
            .filter(|r| r.state == MatchState::Matched)
            .count();
        info!(
            total = self.match_results.len(),
            matched,
            unmatched = self.match_results.len() - matched,
            "matching complete"
        );

        self.step = ImportStep::Preview;
        Ok(&self.match_results)
    }

    /// Operator resolves an unmatched (or rejected) row by hand.
    pub fn set_manual_entry(
        &mut self,
        row_index: usize,
        entry: ManualEntry,
        config: &MatchingConfig,
    ) -> ImportResult<()> {
        let result = self
            .match_results
            .iter_mut()
            .find(|r| r.row_index == row_index)
            .ok_or_else(|| ImportError::TypeConversionError {
                row: row_index,
                field: "row_index".to_string(),
                message: "no match result for row".to_string(),
            })?;
        *result = apply_manual_entry(result, entry, config);
        Ok(())
    }

    /// Operator skips a row; it is excluded from any downstream write.
    pub fn skip_row(&mut self, row_index: usize) -> ImportResult<()> {
        let result = self
            .match_results
            .iter_mut()
            .find(|r| r.row_index == row_index)
            .ok_or_else(|| ImportError::TypeConversionError {
                row: row_index,
                field: "row_index".to_string(),
                message: "no match result for row".to_string(),
            })?;
        *result = skip_result(result);
        Ok(())
    }

    // ==========================================
    // Preview stage
    // ==========================================

    /// Read-only projection of the rows a commit would write: matched and
    /// manual only. Unmatched/skipped/pending rows never appear.
    pub fn preview(&self) -> ImportResult<Vec<PreviewLineItem>> {
        let mut preview = Vec::new();

        for result in self.match_results.iter().filter(|r| r.is_eligible()) {
            let row = &self.rows[result.row_index];
            let row_number = result.row_index + 1;

            let qty = match self.mapping.column_for(FIELD_QTY) {
                Some(col) => parse_i64(row, col, FIELD_QTY, row_number)?.unwrap_or(1),
                None => 1,
            };
            let unit_price = match self.mapping.column_for(FIELD_UNIT_PRICE) {
                Some(col) => parse_f64(row, col, FIELD_UNIT_PRICE, row_number)?,
                None => None,
            };

            let mapped = |field: &str| {
                self.mapping
                    .column_for(field)
                    .and_then(|col| get_string(row, col))
            };

            let (part_number, description, manufacturer) = match &result.manual_entry {
                Some(entry) => (
                    entry.part_number.clone(),
                    entry.description.clone().or_else(|| mapped(FIELD_DESCRIPTION)),
                    entry.manufacturer.clone(),
                ),
                None => (
                    result
                        .matched_part_number
                        .clone()
                        .or_else(|| mapped(FIELD_PART_NUMBER))
                        .unwrap_or_default(),
                    mapped(FIELD_DESCRIPTION),
                    result
                        .matched_manufacturer
                        .clone()
                        .or_else(|| mapped(FIELD_MANUFACTURER)),
                ),
            };

            preview.push(PreviewLineItem {
                row_index: result.row_index,
                state: result.state,
                confidence: result.confidence,
                part_id: result.part_id,
                part_number,
                description,
                manufacturer,
                qty,
                unit: mapped(FIELD_UNIT),
                unit_price,
                reference: mapped(FIELD_REFERENCE),
                power_group: mapped(FIELD_POWER_GROUP),
            });
        }

        Ok(preview)
    }

    // ==========================================
    // Commit stage
    // ==========================================

    /// Convert eligible rows into line-item payloads and perform one
    /// transactional bulk insert. Rejects with an explicit error, never a
    /// partial write, when no target table is selected or no row is
    /// eligible.
    #[instrument(skip_all, fields(session_id = %self.session_id))]
    pub async fn commit(
        &mut self,
        target_table_id: Option<i64>,
        sink: &(impl LineItemSink + ?Sized),
    ) -> ImportResult<usize> {
        let voltage_table_id = target_table_id.ok_or(ImportError::NoTargetTable)?;

        let preview = self.preview()?;
        if preview.is_empty() {
            return Err(ImportError::NoEligibleRows);
        }

        let payloads: Vec<NewLineItem> = preview
            .iter()
            .enumerate()
            .map(|(sort_order, p)| {
                // Manual rows carry their electrical values as overrides
                // and never link a catalog part
                let entry = self
                    .match_results
                    .iter()
                    .find(|r| r.row_index == p.row_index)
                    .and_then(|r| r.manual_entry.clone());

                NewLineItem {
                    voltage_table_id,
                    part_id: p.part_id,
                    manual_part_number: if p.part_id.is_none() {
                        Some(p.part_number.clone())
                    } else {
                        None
                    },
                    description: p.description.clone(),
                    qty: p.qty,
                    utilization_pct: 1.0,
                    amperage_override: entry.as_ref().and_then(|e| e.amperage),
                    wattage_override: entry.as_ref().and_then(|e| e.wattage),
                    heat_dissipation_override: entry.as_ref().and_then(|e| e.heat_dissipation_btu),
                    power_group: p.power_group.clone(),
                    phase_assignment: None,
                    sort_order: sort_order as i64,
                }
            })
            .collect();

        debug!(count = payloads.len(), voltage_table_id, "committing line items");
        let inserted = sink.bulk_insert_line_items(payloads).await?;
        info!(inserted, voltage_table_id, "import commit complete");

        self.step = ImportStep::Complete;
        Ok(inserted)
    }

    /// Abandon the session and return to the upload stage.
    pub fn reset(&mut self) {
        self.headers.clear();
        self.rows.clear();
        self.mapping = ColumnMapping::new();
        self.match_results.clear();
        self.step = ImportStep::Upload;
    }
}

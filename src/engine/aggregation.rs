// ==========================================
// Panel Load Engineering - aggregation engine
// ==========================================
// Responsibility: totals, per-phase loading and balance for one
// voltage table
// Red line: stateless, pure functions over resolved items; callers
// decide whether and when to cache results
// ==========================================

use crate::domain::types::{PhaseAssignment, VoltageType};
use crate::domain::LineItem;
use crate::engine::resolution::{resolve_line_item, ElectricalSpecSource, ResolvedLineItem};
use crate::repository::error::RepositoryResult;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

/// Watt to BTU/hr conversion constant
pub const BTU_PER_WATT: f64 = 3.412;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// PhaseLoading - per-conductor wattage buckets
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseLoading {
    pub l1: f64,
    pub l2: f64,
    pub l3: f64,
}

// ==========================================
// TableCalculationResult - aggregate record for one table
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCalculationResult {
    pub total_watts: f64,
    pub total_amperes: f64,
    pub total_btu: f64,
    pub phase_loading: PhaseLoading,
    /// None when the table is not three-phase, or when no phase carries
    /// any load
    pub balance_pct: Option<f64>,
    pub item_count: usize,
}

/// Total loading in watts: sum of qty x utilization x wattage, rounded
/// to 2 decimals.
pub fn total_watts(resolved: &[ResolvedLineItem]) -> f64 {
    let total: f64 = resolved
        .iter()
        .map(|r| r.line_item.qty as f64 * r.line_item.utilization_pct * r.wattage)
        .sum();
    round2(total)
}

/// Total amperage, same weighting as wattage.
pub fn total_amperes(resolved: &[ResolvedLineItem]) -> f64 {
    let total: f64 = resolved
        .iter()
        .map(|r| r.line_item.qty as f64 * r.line_item.utilization_pct * r.amperage)
        .sum();
    round2(total)
}

/// Total heat dissipation in BTU/hr.
///
/// A positive direct heat value is used as-is; otherwise the item falls
/// back to wattage x 3.412.
pub fn total_heat_btu(resolved: &[ResolvedLineItem]) -> f64 {
    let mut total = 0.0;
    for r in resolved {
        let weight = r.line_item.qty as f64 * r.line_item.utilization_pct;
        if r.heat_btu > 0.0 {
            total += weight * r.heat_btu;
        } else {
            total += weight * r.wattage * BTU_PER_WATT;
        }
    }
    round2(total)
}

/// Per-phase loading in watts. Only items assigned to L1/L2/L3
/// contribute; N and unassigned items are excluded.
pub fn phase_loading(resolved: &[ResolvedLineItem]) -> PhaseLoading {
    let mut loading = PhaseLoading {
        l1: 0.0,
        l2: 0.0,
        l3: 0.0,
    };
    for r in resolved {
        let watts = r.line_item.qty as f64 * r.line_item.utilization_pct * r.wattage;
        match r.line_item.phase_assignment {
            Some(PhaseAssignment::L1) => loading.l1 += watts,
            Some(PhaseAssignment::L2) => loading.l2 += watts,
            Some(PhaseAssignment::L3) => loading.l3 += watts,
            _ => {}
        }
    }
    loading.l1 = round2(loading.l1);
    loading.l2 = round2(loading.l2);
    loading.l3 = round2(loading.l3);
    loading
}

/// Phase imbalance percentage: (max - min) / max x 100, rounded to 2
/// decimals. None when max is exactly 0 (no phase-assigned loads).
pub fn balance_pct(loading: PhaseLoading) -> Option<f64> {
    let values = [loading.l1, loading.l2, loading.l3];
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    if max == 0.0 {
        return None;
    }
    Some(round2((max - min) / max * 100.0))
}

/// Run all calculations for a voltage table's line items.
///
/// Items are resolved concurrently (lookups awaited together), then the
/// pure aggregations run. Balance is only computed for three-phase
/// tables; single/two-phase and DC tables report None.
pub async fn calculate_table_results(
    line_items: &[LineItem],
    voltage_type: VoltageType,
    source: &(impl ElectricalSpecSource + ?Sized),
) -> RepositoryResult<TableCalculationResult> {
    let resolved: Vec<ResolvedLineItem> = try_join_all(
        line_items
            .iter()
            .map(|item| resolve_line_item(item, voltage_type, source)),
    )
    .await?;

    let loading = phase_loading(&resolved);
    let balance = if voltage_type.is_three_phase() {
        balance_pct(loading)
    } else {
        None
    };

    Ok(TableCalculationResult {
        total_watts: total_watts(&resolved),
        total_amperes: total_amperes(&resolved),
        total_btu: total_heat_btu(&resolved),
        phase_loading: loading,
        balance_pct: balance,
        item_count: line_items.len(),
    })
}

// ==========================================
// Panel Load Engineering - electrical resolution engine
// ==========================================
// Responsibility: resolve effective wattage/amperage/heat for one line
// item from a manual override or the catalog variant for the table's
// voltage type
// Red line: no side effects; the only suspension point is the catalog
// lookup
// ==========================================

use crate::domain::part::ElectricalVariant;
use crate::domain::types::VoltageType;
use crate::domain::LineItem;
use crate::repository::error::RepositoryResult;

/// Catalog seam consumed by resolution. Implemented by the parts
/// repository and by in-memory fixtures in tests.
#[async_trait::async_trait]
pub trait ElectricalSpecSource: Send + Sync {
    /// Variant for (part, voltage type); None when the part has no
    /// ratings at that voltage.
    async fn variant_for(
        &self,
        part_id: i64,
        voltage_type: VoltageType,
    ) -> RepositoryResult<Option<ElectricalVariant>>;
}

// ==========================================
// ResolvedLineItem - effective electrical values
// ==========================================
#[derive(Debug, Clone)]
pub struct ResolvedLineItem {
    pub line_item: LineItem,
    /// Effective wattage (override or catalog spec)
    pub wattage: f64,
    /// Effective amperage (override or catalog spec)
    pub amperage: f64,
    /// Effective heat in BTU/hr (override or catalog spec)
    pub heat_btu: f64,
}

/// Resolve effective electrical values for a line item.
///
/// Catalog values seed the result when the item links a part; missing
/// fields coerce to 0. Overrides then replace the seeded value
/// unconditionally: an override of 0 is a valid override, only None
/// means "no override".
pub async fn resolve_line_item(
    item: &LineItem,
    voltage_type: VoltageType,
    source: &(impl ElectricalSpecSource + ?Sized),
) -> RepositoryResult<ResolvedLineItem> {
    let mut wattage = 0.0;
    let mut amperage = 0.0;
    let mut heat_btu = 0.0;

    if let Some(part_id) = item.part_id {
        if let Some(spec) = source.variant_for(part_id, voltage_type).await? {
            wattage = spec.wattage.unwrap_or(0.0);
            amperage = spec.amperage.unwrap_or(0.0);
            heat_btu = spec.heat_dissipation_btu.unwrap_or(0.0);
        }
    }

    if let Some(w) = item.wattage_override {
        wattage = w;
    }
    if let Some(a) = item.amperage_override {
        amperage = a;
    }
    if let Some(h) = item.heat_dissipation_override {
        heat_btu = h;
    }

    Ok(ResolvedLineItem {
        line_item: item.clone(),
        wattage,
        amperage,
        heat_btu,
    })
}

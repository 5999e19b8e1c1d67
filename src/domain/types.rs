// ==========================================
// Panel Load Engineering - domain type definitions
// ==========================================
// Serialization format matches the database string tags
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Voltage type
// ==========================================
// Encodes nominal voltage, phase count and AC/DC. The string tags are
// stored verbatim in voltage_tables.voltage_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoltageType {
    #[serde(rename = "DC")]
    Dc,
    #[serde(rename = "120VAC_1PH")]
    Vac120Single,
    #[serde(rename = "230VAC_3PH")]
    Vac230Three,
    #[serde(rename = "480VAC_1PH")]
    Vac480Single,
    #[serde(rename = "480VAC_3PH")]
    Vac480Three,
    #[serde(rename = "600VAC_3PH")]
    Vac600Three,
    #[serde(rename = "LEGACY")]
    Legacy,
}

impl VoltageType {
    /// Phase balance only applies to three-phase tables.
    pub fn is_three_phase(&self) -> bool {
        matches!(
            self,
            VoltageType::Vac230Three | VoltageType::Vac480Three | VoltageType::Vac600Three
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoltageType::Dc => "DC",
            VoltageType::Vac120Single => "120VAC_1PH",
            VoltageType::Vac230Three => "230VAC_3PH",
            VoltageType::Vac480Single => "480VAC_1PH",
            VoltageType::Vac480Three => "480VAC_3PH",
            VoltageType::Vac600Three => "600VAC_3PH",
            VoltageType::Legacy => "LEGACY",
        }
    }
}

impl fmt::Display for VoltageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VoltageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DC" => Ok(VoltageType::Dc),
            "120VAC_1PH" => Ok(VoltageType::Vac120Single),
            "230VAC_3PH" => Ok(VoltageType::Vac230Three),
            "480VAC_1PH" => Ok(VoltageType::Vac480Single),
            "480VAC_3PH" => Ok(VoltageType::Vac480Three),
            "600VAC_3PH" => Ok(VoltageType::Vac600Three),
            "LEGACY" => Ok(VoltageType::Legacy),
            other => Err(format!("unknown voltage type: {}", other)),
        }
    }
}

// ==========================================
// Phase assignment
// ==========================================
// Which conductor a load is wired to. N and Unknown never contribute to
// phase loading buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseAssignment {
    L1,
    L2,
    L3,
    N,
    #[serde(rename = "UNK")]
    Unknown,
}

impl PhaseAssignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseAssignment::L1 => "L1",
            PhaseAssignment::L2 => "L2",
            PhaseAssignment::L3 => "L3",
            PhaseAssignment::N => "N",
            PhaseAssignment::Unknown => "UNK",
        }
    }
}

impl fmt::Display for PhaseAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PhaseAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L1" => Ok(PhaseAssignment::L1),
            "L2" => Ok(PhaseAssignment::L2),
            "L3" => Ok(PhaseAssignment::L3),
            "N" => Ok(PhaseAssignment::N),
            "UNK" => Ok(PhaseAssignment::Unknown),
            other => Err(format!("unknown phase assignment: {}", other)),
        }
    }
}

// ==========================================
// Match state
// ==========================================
// Per-row state machine of the matching engine:
// Pending -> {Matched | Unmatched} -> {Manual | Skipped}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    Pending,
    Matched,
    Unmatched,
    Manual,
    Skipped,
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchState::Pending => write!(f, "pending"),
            MatchState::Matched => write!(f, "matched"),
            MatchState::Unmatched => write!(f, "unmatched"),
            MatchState::Manual => write!(f, "manual"),
            MatchState::Skipped => write!(f, "skipped"),
        }
    }
}

// ==========================================
// Import pipeline stage
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStep {
    Upload,
    Mapping,
    Matching,
    Preview,
    Complete,
}

// ==========================================
// Validation severity
// ==========================================
// Errors block an aggregation from being treated as authoritative;
// warnings are advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
}

// ==========================================
// Panel Load Engineering - matching configuration
// ==========================================
// Responsibility: normalization toggles and confidence heuristics for
// the part matching engine
// ==========================================

use serde::{Deserialize, Serialize};

/// Default classification threshold: confidence >= threshold => matched
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.9;

/// Confidence assigned when the part number matches but the supplied
/// manufacturer does not
pub const DEFAULT_MISMATCH_CONFIDENCE: f64 = 0.8;

/// Confidence assigned to operator-entered manual rows
pub const DEFAULT_MANUAL_CONFIDENCE: f64 = 0.5;

/// Rows matched per chunk in a batch run (bounds concurrent catalog lookups)
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Configuration for the part matching engine.
///
/// The threshold and the manufacturer-mismatch confidence are deployment
/// heuristics, not engine logic; defaults mirror production behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Trim and collapse internal whitespace before comparing
    pub normalize_whitespace: bool,
    /// Lowercase before comparing
    pub normalize_case: bool,
    /// Minimum confidence for a row to classify as matched
    pub match_threshold: f64,
    /// Confidence for a part-number match with a mismatched manufacturer
    pub mismatch_confidence: f64,
    /// Confidence recorded on manual entries
    pub manual_confidence: f64,
    /// Batch chunk size
    pub chunk_size: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            normalize_case: true,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            mismatch_confidence: DEFAULT_MISMATCH_CONFIDENCE,
            manual_confidence: DEFAULT_MANUAL_CONFIDENCE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

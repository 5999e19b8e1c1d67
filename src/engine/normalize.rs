// ==========================================
// Panel Load Engineering - string normalization
// ==========================================
// Responsibility: deterministic canonicalization used by part matching
// Red line: pure functions, no I/O
// ==========================================

use crate::config::MatchingConfig;

/// Normalize a string for matching.
///
/// Whitespace normalization trims and collapses internal runs to a
/// single space; case normalization lowercases. Both are driven by the
/// matching configuration so a deployment can opt out.
pub fn normalize(value: &str, config: &MatchingConfig) -> String {
    let mut normalized = value.to_string();

    if config.normalize_whitespace {
        normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    if config.normalize_case {
        normalized = normalized.to_lowercase();
    }

    normalized
}

/// Normalize an optional string; None and empty both normalize to "".
pub fn normalize_opt(value: Option<&str>, config: &MatchingConfig) -> String {
    value.map(|v| normalize(v, config)).unwrap_or_default()
}

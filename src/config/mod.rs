// ==========================================
// Panel Load Engineering - configuration layer
// ==========================================
// Responsibility: tunable business heuristics for matching and import
// Red line: engines read these values, they never hard-code them
// ==========================================

pub mod matching_config;

pub use matching_config::MatchingConfig;

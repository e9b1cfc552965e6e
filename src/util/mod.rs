
/// Full-grid Levenshtein distance over byte sequences
pub mod edit_distance;
/// Helper functions for writing JSON via serde
pub mod json_io;

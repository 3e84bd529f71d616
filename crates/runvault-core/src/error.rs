//! Error taxonomy for runvault.
//!
//! Validation and compilation failures are typed so a caller can render a
//! precise message; only filesystem faults surface as `Io`.

use std::path::PathBuf;

use crate::codec::FieldKey;

/// Errors produced while validating a run record string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Part length should be 14 and not {observed}")]
    FieldCount { observed: usize },

    #[error("Failed to validate part '{field}'.")]
    FieldPattern { field: FieldKey },

    #[error("Failed parsing mode '{mode}': {message}")]
    ModeParse { mode: String, message: String },

    #[error("Invalid region character '{region_char}' of '{server}'")]
    UnknownRegion { server: String, region_char: char },
}

/// A build vector segment that is not a plain integer literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("build segment '{segment}' of '{build}' is not an integer")]
pub struct BuildParseError {
    pub build: String,
    pub segment: String,
}

/// A score whose digit count has no magnitude suffix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("score {score} has {digits} digits, readable form covers 6 to 10")]
pub struct ScoreFormatError {
    pub score: u64,
    pub digits: usize,
}

/// Errors produced while compiling a query expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid pattern {expr}.")]
    Syntax { expr: String },

    #[error("'{field}' code part value '{value}' is not parseable as type {expected}.")]
    FieldValue {
        field: FieldKey,
        value: String,
        expected: &'static str,
    },

    #[error("Failed to match '{pair}' as a pair.")]
    MalformedPair { pair: String },

    #[error("Key '{key}' of pair '{pair}' is out of bounds of [1-14] as an index.")]
    KeyOutOfBounds { pair: String, key: String },

    #[error("Key '{key}' of pair '{pair}' doesn't match any attr.")]
    UnknownKey { pair: String, key: String },

    #[error("Key '{key}' of pair '{pair}' matches too many attrs: {}", candidates.join(", "))]
    AmbiguousKey {
        pair: String,
        key: String,
        candidates: Vec<String>,
    },

    #[error("Value '{value}' of cell '{cell}' of date operation '{expr}' exceeds the limit of {limit}.")]
    DateLimit {
        value: String,
        cell: String,
        expr: String,
        limit: u64,
    },

    #[error("Pair '{cell}' of cell '{expr}' is invalid. Make sure the pair starts with a number and ends with a date suffix.")]
    InvalidDateCell { cell: String, expr: String },

    #[error("Date cell '{expr}' does not name a representable point in time.")]
    DateOutOfRange { expr: String },

    #[error("'{segment}' is an invalid number operation in build pattern '{expr}'.")]
    BuildSegment { segment: String, expr: String },

    #[error("Failed parsing gamemode expression '{expr}': {message}")]
    Mode { expr: String, message: String },
}

/// Errors produced by the record store and the archival reconciler.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Save with id {id} doesn't exist.")]
    UnknownRecord { id: String },

    #[error("Code file {path} doesn't exist.")]
    MissingRecordFile { path: PathBuf },

    #[error("Invalid code \"{text}\" of file \"{path}\": {source}")]
    InvalidRecord {
        path: PathBuf,
        text: String,
        #[source]
        source: ValidationError,
    },

    #[error("History index {index} out of bounds, save {id} only has {len} past saves")]
    HistoryIndex { id: String, index: usize, len: usize },

    #[error("destination {path} already exists")]
    DestinationExists { path: PathBuf },

    #[error("directory {path} already holds save {id}")]
    DirectoryTaken { path: PathBuf, id: String },

    #[error("cannot restore save {id} into its own directory {path}")]
    RestoreIntoSelf { id: String, path: PathBuf },

    #[error("store root {path} is not a directory")]
    MissingRoot { path: PathBuf },

    #[error("settings error: {0}")]
    Settings(String),

    #[error("invalid score: {0}")]
    Score(#[from] ScoreFormatError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crate-level error aggregating every concern.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("invalid code: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_count_display() {
        let err = ValidationError::FieldCount { observed: 13 };
        assert_eq!(err.to_string(), "Part length should be 14 and not 13");
    }

    #[test]
    fn test_field_pattern_names_field() {
        let err = ValidationError::FieldPattern {
            field: FieldKey::Build,
        };
        assert_eq!(err.to_string(), "Failed to validate part 'build'.");
    }

    #[test]
    fn test_ambiguous_key_lists_candidates() {
        let err = QueryError::AmbiguousKey {
            pair: "c;5".to_string(),
            key: "c".to_string(),
            candidates: vec!["custom".to_string(), "creation".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("custom, creation"));
        assert!(msg.contains("'c;5'"));
    }

    #[test]
    fn test_store_error_wraps_into_vault_error() {
        let err: VaultError = StoreError::UnknownRecord {
            id: "6e2121d4".to_string(),
        }
        .into();
        assert!(err.to_string().contains("6e2121d4"));
    }
}

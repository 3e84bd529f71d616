//! Gamemode capability consumed by the codec and the query compiler.
//!
//! The mode grammar itself lives outside this crate. Callers hand in a
//! [`ModeParser`]; records and queries only see [`GameMode`] values.
//! [`TableModeParser`] is a table-driven implementation used by the CLI and
//! the tests.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Error message produced by a mode parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ModeParseError {
    pub message: String,
}

impl ModeParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A parsed gamemode.
pub trait GameMode: fmt::Debug + Send + Sync {
    /// The text the mode was parsed from.
    fn text(&self) -> &str;

    /// Whether this is a plain mode without heavy modifiers.
    fn is_normal_mode(&self) -> bool;

    /// Whether the mode carries the named prefix (e.g. `Growth`).
    fn prefix_has(&self, prefix: &str) -> bool;

    /// Whether the mode carries the named custom word (e.g. `old`).
    fn has_custom_word(&self, word: &str) -> bool;

    /// Every attribute the mode asserts.
    fn attributes(&self) -> BTreeSet<String>;

    /// Compare `self` as a pattern against `candidate`.
    ///
    /// Strict comparison requires the exact same attributes; loose comparison
    /// requires the candidate to carry at least the asserted ones.
    fn compare(&self, candidate: &dyn GameMode, strict: bool) -> bool {
        let asserted = self.attributes();
        let present = candidate.attributes();
        if strict {
            asserted == present
        } else {
            asserted.is_subset(&present)
        }
    }
}

/// Turns mode text into a [`GameMode`].
pub trait ModeParser: fmt::Debug + Send + Sync {
    fn parse(&self, text: &str) -> Result<Arc<dyn GameMode>, ModeParseError>;
}

/// One row of a [`TableModeParser`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeEntry {
    pub normal: bool,
    pub prefixes: Vec<String>,
    pub custom_words: Vec<String>,
    pub attributes: BTreeSet<String>,
}

impl ModeEntry {
    pub fn normal() -> Self {
        Self {
            normal: true,
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefixes.push(prefix.to_string());
        self
    }

    pub fn with_custom_word(mut self, word: &str) -> Self {
        self.custom_words.push(word.to_string());
        self
    }

    pub fn with_attribute(mut self, attribute: &str) -> Self {
        self.attributes.insert(attribute.to_string());
        self
    }
}

/// A [`GameMode`] resolved from a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMode {
    text: String,
    entry: ModeEntry,
}

impl GameMode for TableMode {
    fn text(&self) -> &str {
        &self.text
    }

    fn is_normal_mode(&self) -> bool {
        self.entry.normal
    }

    fn prefix_has(&self, prefix: &str) -> bool {
        self.entry.prefixes.iter().any(|p| p == prefix)
    }

    fn has_custom_word(&self, word: &str) -> bool {
        self.entry.custom_words.iter().any(|w| w == word)
    }

    fn attributes(&self) -> BTreeSet<String> {
        self.entry.attributes.clone()
    }
}

/// Resolves mode text by exact lookup in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableModeParser {
    modes: BTreeMap<String, ModeEntry>,
}

impl TableModeParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, text: &str, entry: ModeEntry) -> Self {
        self.modes.insert(text.to_string(), entry);
        self
    }

    /// Load a table from a JSON object of `text -> entry`.
    pub fn from_json_file(path: &Path) -> Result<Self, ModeParseError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ModeParseError::new(format!("cannot read mode table {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            ModeParseError::new(format!("invalid mode table {}: {e}", path.display()))
        })
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

impl ModeParser for TableModeParser {
    fn parse(&self, text: &str) -> Result<Arc<dyn GameMode>, ModeParseError> {
        let entry = self
            .modes
            .get(text)
            .ok_or_else(|| ModeParseError::new(format!("unknown gamemode '{text}'")))?;
        Ok(Arc::new(TableMode {
            text: text.to_string(),
            entry: entry.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> TableModeParser {
        TableModeParser::new()
            .with_mode(
                "w33oldscdreadnoughts2",
                ModeEntry::default()
                    .with_custom_word("old")
                    .with_attribute("dreadnoughts")
                    .with_attribute("old"),
            )
            .with_mode("dreadnoughts", ModeEntry::default().with_attribute("dreadnoughts"))
    }

    #[test]
    fn test_unknown_mode_fails() {
        let err = parser().parse("zz").unwrap_err();
        assert_eq!(err.to_string(), "unknown gamemode 'zz'");
    }

    #[test]
    fn test_loose_and_strict_compare() {
        let parser = parser();
        let pattern = parser.parse("dreadnoughts").unwrap();
        let candidate = parser.parse("w33oldscdreadnoughts2").unwrap();

        assert!(pattern.compare(candidate.as_ref(), false));
        assert!(!pattern.compare(candidate.as_ref(), true));
        assert!(candidate.compare(candidate.as_ref(), true));
        assert!(!candidate.compare(pattern.as_ref(), false));
    }

    #[test]
    fn test_table_deserializes_from_json() {
        let json = r#"{"e4": {"normal": true, "attributes": ["ffa"]}}"#;
        let parser: TableModeParser = serde_json::from_str(json).unwrap();
        let mode = parser.parse("e4").unwrap();
        assert!(mode.is_normal_mode());
        assert!(mode.attributes().contains("ffa"));
        assert!(!mode.prefix_has("Growth"));
    }
}

//! The fixed 14-field schema of a run record.
//!
//! Every position has a symbolic key and a field kind. The kinds carry the
//! positional validation patterns; a pattern only counts as matched when its
//! leftmost match covers the whole field.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Number of colon-separated fields in a run record.
pub const FIELD_COUNT: usize = 14;

/// Symbolic key of one record field, in positional order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKey {
    Id,
    Server,
    Mode,
    Tank,
    Build,
    Score,
    Runtime,
    Kills,
    Assists,
    Bosses,
    Polygons,
    Custom,
    Creation,
    Token,
}

impl FieldKey {
    /// All keys in positional order.
    pub const ALL: [FieldKey; FIELD_COUNT] = [
        FieldKey::Id,
        FieldKey::Server,
        FieldKey::Mode,
        FieldKey::Tank,
        FieldKey::Build,
        FieldKey::Score,
        FieldKey::Runtime,
        FieldKey::Kills,
        FieldKey::Assists,
        FieldKey::Bosses,
        FieldKey::Polygons,
        FieldKey::Custom,
        FieldKey::Creation,
        FieldKey::Token,
    ];

    /// Short symbolic name used in messages and key/value queries.
    pub fn short_name(self) -> &'static str {
        match self {
            FieldKey::Id => "id",
            FieldKey::Server => "server",
            FieldKey::Mode => "mode",
            FieldKey::Tank => "tank",
            FieldKey::Build => "build",
            FieldKey::Score => "score",
            FieldKey::Runtime => "runtime",
            FieldKey::Kills => "kills",
            FieldKey::Assists => "assists",
            FieldKey::Bosses => "bosses",
            FieldKey::Polygons => "polygons",
            FieldKey::Custom => "custom",
            FieldKey::Creation => "creation",
            FieldKey::Token => "token",
        }
    }

    /// Zero-based position of this field in the record.
    pub fn position(self) -> usize {
        self as usize
    }

    /// Key at a zero-based position.
    pub fn from_position(position: usize) -> Option<FieldKey> {
        Self::ALL.get(position).copied()
    }

    /// Validation kind of the field at this position.
    pub fn kind(self) -> FieldKind {
        FIELD_KINDS[self.position()]
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Closed set of per-position validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Lowercase alphanumeric token (id).
    Token,
    /// Region marker `#` plus a region character plus one letter.
    RegionMarker,
    /// Lowercase alphanumeric mode text, sub-parsed later.
    ModeText,
    /// Alphanumeric runs separated by single spaces or hyphens.
    FreeText,
    /// Digit groups separated by `/`.
    BuildVector,
    /// Plain non-negative integer.
    Integer,
    /// Any non-empty single-line text.
    Opaque,
}

/// Validator of every position, index-aligned with [`FieldKey::ALL`].
pub const FIELD_KINDS: [FieldKind; FIELD_COUNT] = [
    FieldKind::Token,
    FieldKind::RegionMarker,
    FieldKind::ModeText,
    FieldKind::FreeText,
    FieldKind::BuildVector,
    FieldKind::Integer,
    FieldKind::Integer,
    FieldKind::Integer,
    FieldKind::Integer,
    FieldKind::Integer,
    FieldKind::Integer,
    FieldKind::Integer,
    FieldKind::Integer,
    FieldKind::Opaque,
];

// The `|` inside the classes is accepted as a literal alphabet member. Kept
// as observed; see the regression tests below.
const TOKEN_PATTERN: &str = r"[0-9|a-z]+";
const REGION_PATTERN: &str = r"#[e|w|c|a|o][a-z]";
const FREE_TEXT_PATTERN: &str = r"(?:[0-9|A-Z|a-z]+[-| ]?)+";
const BUILD_PATTERN: &str = r"(?:[0-9]/?)+";
const INTEGER_PATTERN: &str = r"[0-9]+";
const OPAQUE_PATTERN: &str = r".+";

fn compiled(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("field pattern is a valid regex"))
}

impl FieldKind {
    fn regex(self) -> &'static Regex {
        static TOKEN: OnceLock<Regex> = OnceLock::new();
        static REGION: OnceLock<Regex> = OnceLock::new();
        static FREE_TEXT: OnceLock<Regex> = OnceLock::new();
        static BUILD: OnceLock<Regex> = OnceLock::new();
        static INTEGER: OnceLock<Regex> = OnceLock::new();
        static OPAQUE: OnceLock<Regex> = OnceLock::new();

        match self {
            FieldKind::Token | FieldKind::ModeText => compiled(&TOKEN, TOKEN_PATTERN),
            FieldKind::RegionMarker => compiled(&REGION, REGION_PATTERN),
            FieldKind::FreeText => compiled(&FREE_TEXT, FREE_TEXT_PATTERN),
            FieldKind::BuildVector => compiled(&BUILD, BUILD_PATTERN),
            FieldKind::Integer => compiled(&INTEGER, INTEGER_PATTERN),
            FieldKind::Opaque => compiled(&OPAQUE, OPAQUE_PATTERN),
        }
    }

    /// Characters a field of this kind must not end with.
    fn forbidden_tail(self) -> &'static [char] {
        match self {
            FieldKind::FreeText => &['-', '|', ' '],
            FieldKind::BuildVector => &['/'],
            _ => &[],
        }
    }

    /// Whether `part` is a valid field of this kind.
    ///
    /// A match that stops short of either end of `part` is a failure.
    pub fn matches(self, part: &str) -> bool {
        let Some(found) = self.regex().find(part) else {
            return false;
        };
        if found.start() != 0 || found.end() != part.len() {
            return false;
        }
        !part.ends_with(self.forbidden_tail())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_round_trip() {
        for (index, key) in FieldKey::ALL.iter().enumerate() {
            assert_eq!(key.position(), index);
            assert_eq!(FieldKey::from_position(index), Some(*key));
        }
        assert_eq!(FieldKey::from_position(FIELD_COUNT), None);
    }

    #[test]
    fn test_short_names_are_unique() {
        let mut names: Vec<_> = FieldKey::ALL.iter().map(|k| k.short_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FIELD_COUNT);
    }

    #[test]
    fn test_token_rejects_partial_match() {
        assert!(FieldKind::Token.matches("6e2121d4"));
        assert!(!FieldKind::Token.matches("6e2121D4"));
        assert!(!FieldKind::Token.matches("Abc"));
        assert!(!FieldKind::Token.matches(""));
    }

    #[test]
    fn test_region_marker_accepts_pipe_as_region_char() {
        assert!(FieldKind::RegionMarker.matches("#ef"));
        assert!(FieldKind::RegionMarker.matches("#oa"));
        assert!(FieldKind::RegionMarker.matches("#|a"));
        assert!(!FieldKind::RegionMarker.matches("#xa"));
        assert!(!FieldKind::RegionMarker.matches("#efg"));
        assert!(!FieldKind::RegionMarker.matches("ef"));
    }

    #[test]
    fn test_free_text_separators() {
        assert!(FieldKind::FreeText.matches("Auto-Tri-Angle"));
        assert!(FieldKind::FreeText.matches("Auto Smasher"));
        assert!(FieldKind::FreeText.matches("Falcon"));
        assert!(!FieldKind::FreeText.matches("Falcon-"));
        assert!(!FieldKind::FreeText.matches("Falcon "));
        assert!(!FieldKind::FreeText.matches("Auto--Gunner"));
        assert!(!FieldKind::FreeText.matches("-Falcon"));
    }

    #[test]
    fn test_build_vector() {
        assert!(FieldKind::BuildVector.matches("8/8/9/9/9/9/9/7/1/0"));
        assert!(FieldKind::BuildVector.matches("12"));
        assert!(!FieldKind::BuildVector.matches("8/8/"));
        assert!(!FieldKind::BuildVector.matches("/8"));
        assert!(!FieldKind::BuildVector.matches("8//8"));
        assert!(!FieldKind::BuildVector.matches("8/a"));
    }

    #[test]
    fn test_integer_and_opaque() {
        assert!(FieldKind::Integer.matches("10083590"));
        assert!(!FieldKind::Integer.matches("1e6"));
        assert!(!FieldKind::Integer.matches("-5"));
        assert!(FieldKind::Opaque.matches("5lZqbl5uVQDOddyJ"));
        assert!(!FieldKind::Opaque.matches(""));
        assert!(!FieldKind::Opaque.matches("token\n"));
    }
}

//! Key/value field matching: `[score;>=1000000],[tank;Falcon]`.
//!
//! A key is either a 1-based position in the record schema or a substring
//! that picks exactly one short field name. Each resolved key compiles into
//! a [`FieldPredicate`] over that field's own type.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use regex::Regex;

use super::build::BuildPattern;
use super::date::compile_date_op_at;
use super::numeric::{compile_numeric_op, NumericOp};
use crate::codec::{FieldKey, RunRecord, FIELD_COUNT};
use crate::error::QueryError;
use crate::mode::{GameMode, ModeParser};

const NUMBER_OPERATION: &str = "number operation";
const DATE_OPERATION: &str = "date operation or number operation";

/// A compiled test against one record field.
#[derive(Debug, Clone)]
pub enum FieldPredicate {
    Id(String),
    /// Matches the raw tag (`#ef`) or the bare name (`ef`).
    Server(String),
    Mode {
        pattern: Arc<dyn GameMode>,
        strict: bool,
    },
    /// Normalized needle, see [`normalize_tank`].
    Tank(String),
    Build(BuildPattern),
    Score(NumericOp),
    Runtime(NumericOp),
    Kills(NumericOp),
    Assists(NumericOp),
    Bosses(NumericOp),
    Polygons(NumericOp),
    Custom(NumericOp),
    Creation(NumericOp),
    Token(String),
}

impl FieldPredicate {
    pub fn key(&self) -> FieldKey {
        match self {
            FieldPredicate::Id(_) => FieldKey::Id,
            FieldPredicate::Server(_) => FieldKey::Server,
            FieldPredicate::Mode { .. } => FieldKey::Mode,
            FieldPredicate::Tank(_) => FieldKey::Tank,
            FieldPredicate::Build(_) => FieldKey::Build,
            FieldPredicate::Score(_) => FieldKey::Score,
            FieldPredicate::Runtime(_) => FieldKey::Runtime,
            FieldPredicate::Kills(_) => FieldKey::Kills,
            FieldPredicate::Assists(_) => FieldKey::Assists,
            FieldPredicate::Bosses(_) => FieldKey::Bosses,
            FieldPredicate::Polygons(_) => FieldKey::Polygons,
            FieldPredicate::Custom(_) => FieldKey::Custom,
            FieldPredicate::Creation(_) => FieldKey::Creation,
            FieldPredicate::Token(_) => FieldKey::Token,
        }
    }

    pub fn matches(&self, record: &RunRecord) -> bool {
        match self {
            FieldPredicate::Id(id) => record.id() == id,
            FieldPredicate::Server(server) => {
                record.server().raw() == server || record.server().name() == server
            }
            FieldPredicate::Mode { pattern, strict } => pattern.compare(record.mode(), *strict),
            FieldPredicate::Tank(needle) => normalize_tank(record.tank_class()).contains(needle.as_str()),
            FieldPredicate::Build(pattern) => pattern.matches(record.build()),
            FieldPredicate::Score(op) => op.test(record.score()),
            FieldPredicate::Runtime(op) => op.test(record.runtime_seconds()),
            FieldPredicate::Kills(op) => op.test(record.kills()),
            FieldPredicate::Assists(op) => op.test(record.assists()),
            FieldPredicate::Bosses(op) => op.test(record.boss_kills()),
            FieldPredicate::Polygons(op) => op.test(record.polygons_destroyed()),
            FieldPredicate::Custom(op) => op.test(record.custom_kills()),
            FieldPredicate::Creation(op) => op.test(record.creation_unix()),
            FieldPredicate::Token(token) => record.safety_token() == token,
        }
    }
}

/// Lowercase and drop spaces and hyphens: `Auto-Tri Angle` -> `autotriangle`.
pub fn normalize_tank(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(*c, ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn numeric(key: FieldKey, value: &str) -> Result<NumericOp, QueryError> {
    compile_numeric_op(value).ok_or_else(|| QueryError::FieldValue {
        field: key,
        value: value.to_string(),
        expected: NUMBER_OPERATION,
    })
}

fn date(
    key: FieldKey,
    value: &str,
    default_year: bool,
    now: DateTime<Utc>,
) -> Result<NumericOp, QueryError> {
    compile_date_op_at(value, default_year, now)?.ok_or_else(|| QueryError::FieldValue {
        field: key,
        value: value.to_string(),
        expected: DATE_OPERATION,
    })
}

/// Compile a mode expression. A leading `!` selects strict comparison.
pub fn compile_mode(expr: &str, parser: &dyn ModeParser) -> Result<FieldPredicate, QueryError> {
    let (text, strict) = match expr.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (expr, false),
    };
    let pattern = parser.parse(text).map_err(|err| QueryError::Mode {
        expr: expr.to_string(),
        message: err.message,
    })?;
    Ok(FieldPredicate::Mode { pattern, strict })
}

/// Compile the value of one resolved key.
pub fn compile_field(
    key: FieldKey,
    value: &str,
    parser: &dyn ModeParser,
    now: DateTime<Utc>,
) -> Result<FieldPredicate, QueryError> {
    Ok(match key {
        FieldKey::Id => FieldPredicate::Id(value.to_string()),
        FieldKey::Server => FieldPredicate::Server(value.to_string()),
        FieldKey::Mode => compile_mode(value, parser)?,
        FieldKey::Tank => FieldPredicate::Tank(normalize_tank(value)),
        FieldKey::Build => FieldPredicate::Build(BuildPattern::compile(value)?),
        FieldKey::Score => FieldPredicate::Score(numeric(key, value)?),
        FieldKey::Runtime => FieldPredicate::Runtime(date(key, value, false, now)?),
        FieldKey::Kills => FieldPredicate::Kills(numeric(key, value)?),
        FieldKey::Assists => FieldPredicate::Assists(numeric(key, value)?),
        FieldKey::Bosses => FieldPredicate::Bosses(numeric(key, value)?),
        FieldKey::Polygons => FieldPredicate::Polygons(numeric(key, value)?),
        FieldKey::Custom => FieldPredicate::Custom(numeric(key, value)?),
        FieldKey::Creation => FieldPredicate::Creation(date(key, value, true, now)?),
        FieldKey::Token => FieldPredicate::Token(value.to_string()),
    })
}

/// Resolve a pair key to a field.
pub fn resolve_key(pair: &str, key: &str) -> Result<FieldKey, QueryError> {
    if key.bytes().all(|b| b.is_ascii_digit()) {
        return key
            .parse::<usize>()
            .ok()
            .filter(|index| (1..=FIELD_COUNT).contains(index))
            .and_then(|index| FieldKey::from_position(index - 1))
            .ok_or_else(|| QueryError::KeyOutOfBounds {
                pair: pair.to_string(),
                key: key.to_string(),
            });
    }

    let candidates: Vec<FieldKey> = FieldKey::ALL
        .into_iter()
        .filter(|k| k.short_name().contains(key))
        .collect();

    match candidates.as_slice() {
        [only] => Ok(*only),
        [] => Err(QueryError::UnknownKey {
            pair: pair.to_string(),
            key: key.to_string(),
        }),
        _ => Err(QueryError::AmbiguousKey {
            pair: pair.to_string(),
            key: key.to_string(),
            candidates: candidates.iter().map(|k| k.short_name().to_string()).collect(),
        }),
    }
}

fn pair_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?<key>[a-z]+|[0-9]+);(?<value>.+)$").expect("valid regex"))
}

/// Compile `[k1;v1],[k2;v2]` relative to the current time.
pub fn compile_key_value_pairs(
    expr: &str,
    parser: &dyn ModeParser,
) -> Result<Vec<FieldPredicate>, QueryError> {
    compile_key_value_pairs_at(expr, parser, Utc::now())
}

/// Compile `[k1;v1],[k2;v2]`. Spaces are ignored; an empty expression
/// compiles to no predicates.
pub fn compile_key_value_pairs_at(
    expr: &str,
    parser: &dyn ModeParser,
    now: DateTime<Utc>,
) -> Result<Vec<FieldPredicate>, QueryError> {
    let expr: String = expr.chars().filter(|c| *c != ' ').collect();
    if expr.is_empty() {
        return Ok(Vec::new());
    }

    let mut pairs: Vec<&str> = expr.split("],[").collect();
    if let Some(first) = pairs.first_mut() {
        let text: &str = first;
        *first = text.strip_prefix('[').unwrap_or(text);
    }
    if let Some(last) = pairs.last_mut() {
        let text: &str = last;
        *last = text.strip_suffix(']').unwrap_or(text);
    }

    pairs
        .into_iter()
        .map(|pair| {
            let caps = pair_re()
                .captures(pair)
                .ok_or_else(|| QueryError::MalformedPair {
                    pair: pair.to_string(),
                })?;
            let key = resolve_key(pair, &caps["key"])?;
            compile_field(key, &caps["value"], parser, now)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::TableModeParser;

    #[test]
    fn test_resolve_by_index() {
        assert_eq!(resolve_key("1;x", "1").unwrap(), FieldKey::Id);
        assert_eq!(resolve_key("14;x", "14").unwrap(), FieldKey::Token);
        assert!(matches!(
            resolve_key("0;x", "0"),
            Err(QueryError::KeyOutOfBounds { .. })
        ));
        assert!(matches!(
            resolve_key("15;x", "15"),
            Err(QueryError::KeyOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_resolve_by_substring() {
        assert_eq!(resolve_key("sc;1", "sc").unwrap(), FieldKey::Score);
        assert_eq!(resolve_key("tank;x", "tank").unwrap(), FieldKey::Tank);
        assert_eq!(resolve_key("poly;1", "poly").unwrap(), FieldKey::Polygons);
    }

    #[test]
    fn test_ambiguous_and_absent_keys() {
        match resolve_key("c;1", "c") {
            Err(QueryError::AmbiguousKey { candidates, .. }) => {
                assert_eq!(candidates, vec!["score", "custom", "creation"]);
            }
            other => panic!("expected AmbiguousKey, got {other:?}"),
        }
        assert!(matches!(
            resolve_key("zzz;1", "zzz"),
            Err(QueryError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_key_match_is_case_sensitive() {
        let parser = TableModeParser::new();
        let err = compile_key_value_pairs("[Score;5]", &parser).unwrap_err();
        assert!(matches!(err, QueryError::MalformedPair { .. }));
    }

    #[test]
    fn test_compile_multiple_pairs() {
        let parser = TableModeParser::new();
        let predicates =
            compile_key_value_pairs("[score;>=1,000,000], [tank;Auto Tri]", &parser).unwrap();
        assert_eq!(predicates.len(), 2);
        assert_eq!(predicates[0].key(), FieldKey::Score);
        assert!(matches!(predicates[0], FieldPredicate::Score(NumericOp::Ge(1_000_000))));
        assert!(matches!(&predicates[1], FieldPredicate::Tank(t) if t == "autotri"));
    }

    #[test]
    fn test_empty_expression() {
        let parser = TableModeParser::new();
        assert!(compile_key_value_pairs("  ", &parser).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_numeric_value_names_field() {
        let parser = TableModeParser::new();
        let err = compile_key_value_pairs("[kills;lots]", &parser).unwrap_err();
        assert_eq!(
            err,
            QueryError::FieldValue {
                field: FieldKey::Kills,
                value: "lots".to_string(),
                expected: NUMBER_OPERATION,
            }
        );
    }

    #[test]
    fn test_unknown_mode_is_a_compile_error() {
        let parser = TableModeParser::new();
        let err = compile_key_value_pairs("[mode;!e4]", &parser).unwrap_err();
        assert!(matches!(err, QueryError::Mode { ref expr, .. } if expr == "!e4"));
    }

    #[test]
    fn test_normalize_tank() {
        assert_eq!(normalize_tank("Auto-Tri-Angle"), "autotriangle");
        assert_eq!(normalize_tank("Auto Smasher"), "autosmasher");
    }
}

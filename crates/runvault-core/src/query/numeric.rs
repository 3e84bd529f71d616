//! Number operations: `750000`, `>=500000`, `<50>1000`, `<100-200>`.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A compiled comparison against one integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericOp {
    Eq(u64),
    Gt(u64),
    Lt(u64),
    Ge(u64),
    Le(u64),
    /// `|stat - value| <= tolerance`
    Around { value: u64, tolerance: u64 },
    /// `min <= stat <= max`
    Range { min: u64, max: u64 },
}

impl NumericOp {
    pub fn test(&self, stat: u64) -> bool {
        match *self {
            NumericOp::Eq(v) => stat == v,
            NumericOp::Gt(v) => stat > v,
            NumericOp::Lt(v) => stat < v,
            NumericOp::Ge(v) => stat >= v,
            NumericOp::Le(v) => stat <= v,
            NumericOp::Around { value, tolerance } => {
                stat <= value.saturating_add(tolerance) && stat >= value.saturating_sub(tolerance)
            }
            NumericOp::Range { min, max } => stat >= min && stat <= max,
        }
    }
}

fn comparison_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?<oper>[><]=?)[^0-9]*(?<value>[0-9]+)$").expect("valid regex"))
}

fn around_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<(?<range>[0-9]+)>(?<value>[0-9]+)$").expect("valid regex"))
}

fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^<(?<min>[0-9]+)[^0-9]*-[^0-9]*(?<max>[0-9]+)>$").expect("valid regex")
    })
}

/// Drop thousands separators and spacing: `1,000 000.` reads as `1000000`.
fn strip_separators(expr: &str) -> String {
    expr.chars().filter(|c| !matches!(*c, ' ' | ',' | '.')).collect()
}

/// Compile a number operation. `None` means the text matched no form.
pub fn compile_numeric_op(expr: &str) -> Option<NumericOp> {
    let expr = strip_separators(expr);

    if !expr.is_empty() && expr.bytes().all(|b| b.is_ascii_digit()) {
        return expr.parse().ok().map(NumericOp::Eq);
    }

    if let Some(caps) = comparison_re().captures(&expr) {
        let value = caps["value"].parse().ok()?;
        return match &caps["oper"] {
            ">" => Some(NumericOp::Gt(value)),
            "<" => Some(NumericOp::Lt(value)),
            ">=" => Some(NumericOp::Ge(value)),
            "<=" => Some(NumericOp::Le(value)),
            _ => None,
        };
    }

    if let Some(caps) = around_re().captures(&expr) {
        return Some(NumericOp::Around {
            value: caps["value"].parse().ok()?,
            tolerance: caps["range"].parse().ok()?,
        });
    }

    if let Some(caps) = range_re().captures(&expr) {
        return Some(NumericOp::Range {
            min: caps["min"].parse().ok()?,
            max: caps["max"].parse().ok()?,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_integer_is_equality() {
        let op = compile_numeric_op("750000").unwrap();
        assert!(op.test(750_000));
        assert!(!op.test(749_999));
        assert!(!op.test(750_001));
    }

    #[test]
    fn test_separators_are_ignored() {
        assert_eq!(compile_numeric_op("750,000"), Some(NumericOp::Eq(750_000)));
        assert_eq!(compile_numeric_op(">= 1.000.000"), Some(NumericOp::Ge(1_000_000)));
    }

    #[test]
    fn test_comparisons() {
        let ge = compile_numeric_op(">=750000").unwrap();
        assert!(ge.test(750_000));
        assert!(ge.test(10_000_000));
        assert!(!ge.test(749_999));

        assert_eq!(compile_numeric_op(">5"), Some(NumericOp::Gt(5)));
        assert_eq!(compile_numeric_op("<100"), Some(NumericOp::Lt(100)));
        assert_eq!(compile_numeric_op("<=100"), Some(NumericOp::Le(100)));
    }

    #[test]
    fn test_tolerance() {
        let op = compile_numeric_op("<50>1000").unwrap();
        assert!(op.test(950));
        assert!(op.test(1000));
        assert!(op.test(1050));
        assert!(!op.test(949));
        assert!(!op.test(1051));
    }

    #[test]
    fn test_tolerance_below_zero_saturates() {
        let op = compile_numeric_op("<50>10").unwrap();
        assert!(op.test(0));
        assert!(op.test(60));
        assert!(!op.test(61));
    }

    #[test]
    fn test_range_is_inclusive() {
        let op = compile_numeric_op("<100-200>").unwrap();
        assert!(op.test(100));
        assert!(op.test(150));
        assert!(op.test(200));
        assert!(!op.test(99));
        assert!(!op.test(201));
    }

    #[test]
    fn test_unmatched_syntax() {
        assert_eq!(compile_numeric_op(""), None);
        assert_eq!(compile_numeric_op("abc"), None);
        assert_eq!(compile_numeric_op("=5"), None);
        assert_eq!(compile_numeric_op("5>"), None);
        assert_eq!(compile_numeric_op("<100-200"), None);
        assert_eq!(compile_numeric_op("-5"), None);
    }
}

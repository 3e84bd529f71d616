//! Date cells and date operations.
//!
//! A cell is a parenthesized list of `<digits><unit>` pairs, e.g.
//! `(2024y 9mon 8d 14h)`. The year selects January 1st 00:00 UTC of that
//! year; every other unit is an offset added on top of it. Missing units
//! are zero, so `(2h)` is 7200 and reads naturally as a tolerance.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use regex::Regex;

use super::numeric::{compile_numeric_op, NumericOp};
use crate::error::QueryError;

/// Largest value any single cell pair may carry.
pub const DATE_VALUE_LIMIT: u64 = 1_000_000;

fn pair_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?<value>[0-9]+)(?<unit>y|mon|d|h|min|ms|s)").expect("valid regex")
    })
}

fn cell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^)]+\)").expect("valid regex"))
}

fn tolerance_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^<(?<tolerance>\([^)]+\))>(?<value>\([^)]+\))$").expect("valid regex")
    })
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CellParts {
    years: Option<u64>,
    months: u64,
    days: u64,
    hours: u64,
    minutes: u64,
    seconds: u64,
    millis: u64,
}

fn parse_cell(expr: &str) -> Result<CellParts, QueryError> {
    let body = expr.strip_prefix('(').unwrap_or(expr);
    let body = body.strip_suffix(')').unwrap_or(body);

    let mut parts = CellParts::default();
    for token in body.split_whitespace() {
        // Pairs may also be written back to back, as in `2024y9mon`.
        let mut covered = 0;
        for caps in pair_re().captures_iter(token) {
            let (Some(whole), Some(digits), Some(unit)) =
                (caps.get(0), caps.name("value"), caps.name("unit"))
            else {
                break;
            };
            if whole.start() != covered {
                break;
            }
            covered = whole.end();

            let value = digits
                .as_str()
                .parse::<u64>()
                .ok()
                .filter(|v| *v <= DATE_VALUE_LIMIT)
                .ok_or_else(|| QueryError::DateLimit {
                    value: digits.as_str().to_string(),
                    cell: whole.as_str().to_string(),
                    expr: expr.to_string(),
                    limit: DATE_VALUE_LIMIT,
                })?;

            match unit.as_str() {
                "y" => parts.years = Some(value),
                "mon" => parts.months = value,
                "d" => parts.days = value,
                "h" => parts.hours = value,
                "min" => parts.minutes = value,
                "s" => parts.seconds = value,
                _ => parts.millis = value,
            }
        }
        if covered != token.len() {
            return Err(QueryError::InvalidDateCell {
                cell: token.to_string(),
                expr: expr.to_string(),
            });
        }
    }
    Ok(parts)
}

/// Convert one date cell to Unix seconds.
///
/// The year selects 1 January 00:00 UTC and every other unit is an offset
/// added to it. `d` is a number of days, not a day of the month:
/// `(2024y 9mon 8d)` is 2024-10-09, and `(2h)` alone is 7200.
///
/// Without `default_year` a missing year is 1970. With it, a missing year is
/// the year of `now`, and any year below 100 is read as 20xx.
pub fn cell_to_unix(expr: &str, default_year: bool, now: DateTime<Utc>) -> Result<i64, QueryError> {
    let parts = parse_cell(expr)?;
    let out_of_range = || QueryError::DateOutOfRange {
        expr: expr.to_string(),
    };

    let mut year = match parts.years {
        Some(y) => y,
        None if default_year => u64::try_from(now.year()).map_err(|_| out_of_range())?,
        None => 1970,
    };
    if default_year && year < 100 {
        year += 2000;
    }

    let year = i32::try_from(year).map_err(|_| out_of_range())?;
    let months = u32::try_from(parts.months).map_err(|_| out_of_range())?;
    // Every component is bounded by DATE_VALUE_LIMIT, so these fit.
    let offset = Duration::days(parts.days as i64)
        + Duration::hours(parts.hours as i64)
        + Duration::minutes(parts.minutes as i64)
        + Duration::seconds(parts.seconds as i64)
        + Duration::milliseconds(parts.millis as i64);

    let point = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.checked_add_months(Months::new(months)))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|start| start.checked_add_signed(offset))
        .ok_or_else(out_of_range)?;

    Ok(point.and_utc().timestamp())
}

/// Compile a date operation relative to the current time.
pub fn compile_date_op(expr: &str, default_year: bool) -> Result<Option<NumericOp>, QueryError> {
    compile_date_op_at(expr, default_year, Utc::now())
}

/// Compile a date operation.
///
/// Plain number operations pass through. Otherwise every `(...)` cell is
/// replaced by its Unix seconds and the result compiled as a number
/// operation. `<(tolerance)>(value)` is handled apart so the tolerance never
/// takes the current year.
pub fn compile_date_op_at(
    expr: &str,
    default_year: bool,
    now: DateTime<Utc>,
) -> Result<Option<NumericOp>, QueryError> {
    if let Some(op) = compile_numeric_op(expr) {
        return Ok(Some(op));
    }

    if let Some(caps) = tolerance_re().captures(expr) {
        let tolerance = cell_to_unix(&caps["tolerance"], false, now)?;
        let value = cell_to_unix(&caps["value"], default_year, now)?;
        return Ok(match (u64::try_from(value), u64::try_from(tolerance)) {
            (Ok(value), Ok(tolerance)) => Some(NumericOp::Around { value, tolerance }),
            _ => None,
        });
    }

    let mut substituted = String::with_capacity(expr.len());
    let mut last = 0;
    for found in cell_re().find_iter(expr) {
        substituted.push_str(&expr[last..found.start()]);
        substituted.push_str(&cell_to_unix(found.as_str(), default_year, now)?.to_string());
        last = found.end();
    }
    substituted.push_str(&expr[last..]);

    Ok(compile_numeric_op(&substituted))
}

use crate::error::ScoreFormatError;

fn magnitude_suffix(digits: usize) -> Option<&'static str> {
    match digits {
        6 => Some("K"),
        7..=9 => Some("m"),
        10 => Some("b"),
        _ => None,
    }
}

/// Render a score as three significant digits plus a magnitude suffix.
///
/// `10083590` becomes `10.0m`, `1784485` becomes `1.78m`, `750000` becomes
/// `750K`. Scores outside 6 to 10 digits have no suffix and are rejected.
pub fn format_score(score: u64) -> Result<String, ScoreFormatError> {
    let digits = score.to_string();
    let suffix = magnitude_suffix(digits.len()).ok_or(ScoreFormatError {
        score,
        digits: digits.len(),
    })?;

    let remainder = digits.len() % 3;
    let mut readable: String = digits.chars().take(3).collect();
    if remainder != 0 {
        readable.insert(remainder, '.');
    }
    readable.push_str(suffix);
    Ok(readable)
}

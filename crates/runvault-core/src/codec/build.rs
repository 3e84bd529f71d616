//! Upgrade allocation vector (`8/8/9/9/9/9/9/7/1/0`).

use std::fmt;

use crate::error::BuildParseError;

/// An ordered list of upgrade allocations.
///
/// Keeps the original text so serialization never renormalizes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    text: String,
    parts: Vec<u64>,
}

impl Build {
    /// Parse a slash-delimited build. Every segment must be a plain integer.
    pub fn parse(text: &str) -> Result<Self, BuildParseError> {
        let parts = text
            .split('/')
            .map(|segment| {
                let plain = !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit());
                plain
                    .then(|| segment.parse::<u64>().ok())
                    .flatten()
                    .ok_or_else(|| BuildParseError {
                        build: text.to_string(),
                        segment: segment.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            text: text.to_string(),
            parts,
        })
    }

    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    /// Total of all allocations.
    pub fn sum(&self) -> u64 {
        self.parts.iter().sum()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

//! Build patterns: `8/8/>=5`, `5/5/5$`.

use super::numeric::{compile_numeric_op, NumericOp};
use crate::codec::Build;
use crate::error::QueryError;

/// Which end of the build vector positions are counted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    End,
}

/// A compiled build pattern. `None` segments accept any value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPattern {
    anchor: Anchor,
    segments: Vec<Option<NumericOp>>,
}

impl BuildPattern {
    /// Compile a `/`-delimited pattern. A trailing `$` anchors it to the end.
    pub fn compile(expr: &str) -> Result<Self, QueryError> {
        let (body, anchor) = match expr.strip_suffix('$') {
            Some(body) => (body, Anchor::End),
            None => (expr, Anchor::Start),
        };

        let segments = body
            .split('/')
            .map(|segment| {
                if segment.is_empty() {
                    return Ok(None);
                }
                compile_numeric_op(segment)
                    .map(Some)
                    .ok_or_else(|| QueryError::BuildSegment {
                        segment: segment.to_string(),
                        expr: expr.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { anchor, segments })
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Every pattern position must exist in `build` and satisfy its segment.
    pub fn matches(&self, build: &Build) -> bool {
        let parts = build.parts();
        if parts.len() < self.segments.len() {
            return false;
        }
        let aligned = match self.anchor {
            Anchor::Start => &parts[..self.segments.len()],
            Anchor::End => &parts[parts.len() - self.segments.len()..],
        };
        self.segments
            .iter()
            .zip(aligned)
            .all(|(segment, value)| segment.map_or(true, |op| op.test(*value)))
    }
}

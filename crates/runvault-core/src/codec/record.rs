//! The 14-field run record.
//!
//! ```text
//! (6e2121d4:#ef:w33oldscdreadnoughts2:Auto-Tri-Angle:8/8/9/9/9/9/9/7/1/0:10083590:2720:9:3:0:536:9:1728507182:5lZqbl5uVQDOddyJ)
//! ```
//!
//! [`validate`] must succeed before a record is constructed; [`RunRecord::parse`]
//! runs it first, so no partially built record ever escapes.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use super::build::Build;
use super::category::Category;
use super::fields::{FieldKey, FieldKind, FIELD_COUNT};
use super::score::format_score;
use super::server::Server;
use crate::error::{ScoreFormatError, ValidationError};
use crate::mode::{GameMode, ModeParser};

/// Remove one optional leading `` `( `` or `(` and one optional trailing
/// `` )` `` or `)`. Each end is handled independently.
pub fn strip_wrapping(text: &str) -> &str {
    let text = text
        .strip_prefix("`(")
        .or_else(|| text.strip_prefix('('))
        .unwrap_or(text);
    text.strip_suffix(")`")
        .or_else(|| text.strip_suffix(')'))
        .unwrap_or(text)
}

/// Parenthesize `text` where a paren is missing, optionally backtick-quoted.
pub fn wrap(text: &str, quoted: bool) -> String {
    let mut code = String::with_capacity(text.len() + 4);
    if !text.starts_with('(') {
        code.push('(');
    }
    code.push_str(text);
    if !text.ends_with(')') {
        code.push(')');
    }
    if quoted {
        format!("`{code}`")
    } else {
        code
    }
}

fn normalize_message(message: &str) -> String {
    let mut normalized = message.to_string();
    if !normalized.ends_with(['.', '!', '?']) {
        normalized.push('.');
    }
    let mut chars = normalized.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => normalized,
    }
}

fn integer_in_range(key: FieldKey, part: &str) -> bool {
    let Ok(value) = part.parse::<u64>() else {
        return false;
    };
    match key {
        FieldKey::Creation => i64::try_from(value)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .is_some(),
        _ => true,
    }
}

/// Check that `text` is a well-formed run record.
///
/// Field count first, then each position in order, stopping at the first
/// failure, then the mode sub-parse.
pub fn validate(text: &str, parser: &dyn ModeParser) -> Result<(), ValidationError> {
    let parts: Vec<&str> = strip_wrapping(text).split(':').collect();
    if parts.len() != FIELD_COUNT {
        return Err(ValidationError::FieldCount {
            observed: parts.len(),
        });
    }

    for (key, part) in FieldKey::ALL.into_iter().zip(&parts) {
        let kind = key.kind();
        let valid = kind.matches(part) && (kind != FieldKind::Integer || integer_in_range(key, part));
        if !valid {
            return Err(ValidationError::FieldPattern { field: key });
        }
    }

    let mode = parts[FieldKey::Mode.position()];
    parser
        .parse(mode)
        .map_err(|err| ValidationError::ModeParse {
            mode: mode.to_string(),
            message: normalize_message(&err.message),
        })?;

    Ok(())
}

/// A parsed, validated run record.
#[derive(Debug, Clone)]
pub struct RunRecord {
    inner: String,
    id: String,
    server: Server,
    mode: Arc<dyn GameMode>,
    category: Category,
    tank_class: String,
    build: Build,
    score: u64,
    runtime_seconds: u64,
    kills: u64,
    assists: u64,
    boss_kills: u64,
    polygons_destroyed: u64,
    custom_kills: u64,
    creation_time: DateTime<Utc>,
    safety_token: String,
}

impl RunRecord {
    /// Validate `text` and build the record from it.
    pub fn parse(text: &str, parser: &dyn ModeParser) -> Result<Self, ValidationError> {
        validate(text, parser)?;
        Self::construct(text, parser)
    }

    fn construct(text: &str, parser: &dyn ModeParser) -> Result<Self, ValidationError> {
        let inner = strip_wrapping(text);
        let parts: Vec<&str> = inner.split(':').collect();
        let part = |key: FieldKey| parts[key.position()];
        let number = |key: FieldKey| {
            part(key)
                .parse::<u64>()
                .map_err(|_| ValidationError::FieldPattern { field: key })
        };

        let mode = parser
            .parse(part(FieldKey::Mode))
            .map_err(|err| ValidationError::ModeParse {
                mode: part(FieldKey::Mode).to_string(),
                message: normalize_message(&err.message),
            })?;
        let category = Category::classify(mode.as_ref());
        let build = Build::parse(part(FieldKey::Build)).map_err(|_| ValidationError::FieldPattern {
            field: FieldKey::Build,
        })?;
        let creation_time = i64::try_from(number(FieldKey::Creation)?)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(ValidationError::FieldPattern {
                field: FieldKey::Creation,
            })?;

        Ok(Self {
            inner: inner.to_string(),
            id: part(FieldKey::Id).to_string(),
            server: Server::parse(part(FieldKey::Server))?,
            mode,
            category,
            tank_class: part(FieldKey::Tank).to_string(),
            build,
            score: number(FieldKey::Score)?,
            runtime_seconds: number(FieldKey::Runtime)?,
            kills: number(FieldKey::Kills)?,
            assists: number(FieldKey::Assists)?,
            boss_kills: number(FieldKey::Bosses)?,
            polygons_destroyed: number(FieldKey::Polygons)?,
            custom_kills: number(FieldKey::Custom)?,
            creation_time,
            safety_token: part(FieldKey::Token).to_string(),
        })
    }

    /// The record text without wrapping.
    pub fn inner(&self) -> &str {
        &self.inner
    }

    /// The 14 field texts, exactly as submitted.
    pub fn fields(&self) -> Vec<&str> {
        self.inner.split(':').collect()
    }

    /// Canonical text, parenthesized and optionally backtick-quoted.
    pub fn format(&self, quoted: bool) -> String {
        wrap(&self.inner, quoted)
    }

    /// Same logical run. Corrected resubmissions keep their id.
    pub fn is_same_run(&self, other: &RunRecord) -> bool {
        self.id == other.id
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    pub fn mode(&self) -> &dyn GameMode {
        self.mode.as_ref()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn tank_class(&self) -> &str {
        &self.tank_class
    }

    pub fn build(&self) -> &Build {
        &self.build
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn runtime_seconds(&self) -> u64 {
        self.runtime_seconds
    }

    pub fn kills(&self) -> u64 {
        self.kills
    }

    pub fn assists(&self) -> u64 {
        self.assists
    }

    pub fn boss_kills(&self) -> u64 {
        self.boss_kills
    }

    pub fn polygons_destroyed(&self) -> u64 {
        self.polygons_destroyed
    }

    pub fn custom_kills(&self) -> u64 {
        self.custom_kills
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    /// Creation time as Unix seconds.
    pub fn creation_unix(&self) -> u64 {
        u64::try_from(self.creation_time.timestamp()).unwrap_or(0)
    }

    pub fn safety_token(&self) -> &str {
        &self.safety_token
    }

    /// Human readable score, see [`format_score`].
    pub fn formatted_score(&self) -> Result<String, ScoreFormatError> {
        format_score(self.score)
    }

    /// Kills plus weighted assists per million points, two decimals.
    pub fn kills_per_million(&self) -> f64 {
        if self.score == 0 {
            return 0.0;
        }
        let weighted = self.kills as f64 + self.assists as f64 / 25.0;
        let per_million = weighted / self.score as f64 * 1_000_000.0;
        (per_million * 100.0).round() / 100.0
    }

    /// Directory name of a run saved on `date`: `2024-10-09 10.0m Auto-Tri-Angle`.
    pub fn dir_name(&self, date: NaiveDate) -> Result<String, ScoreFormatError> {
        Ok(format!(
            "{} {} {}",
            date.format("%Y-%m-%d"),
            self.formatted_score()?,
            self.tank_class
        ))
    }

    /// Multi-line human readable breakdown.
    pub fn summary(&self, blur_token: bool) -> String {
        let score = self
            .formatted_score()
            .unwrap_or_else(|_| self.score.to_string());
        let token = if blur_token {
            format!("||{}||", self.safety_token)
        } else {
            self.safety_token.clone()
        };
        [
            format!("ID: {}", self.id),
            format!("Server: {} ({})", self.server.raw(), self.server.link()),
            format!("Region: {}", self.server.region()),
            format!("Mode: {}", self.mode.text()),
            format!("Sub-mode: {}", self.category),
            format!("Tank: {}", self.tank_class),
            format!("Build: {} ({} points)", self.build, self.build.sum()),
            format!(
                "Kills/Assists/Boss kills: {}/{}/{}",
                self.kills, self.assists, self.boss_kills
            ),
            format!(
                "Polygons destroyed/Custom kills: {}/{}",
                self.polygons_destroyed, self.custom_kills
            ),
            format!("Score: {score}"),
            format!("Kills/Million: {:.2}", self.kills_per_million()),
            format!(
                "Runtime: {:.2}h",
                self.runtime_seconds as f64 / 3600.0
            ),
            format!(
                "Saved at: {}",
                self.creation_time.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            format!("Safety token: {token}"),
        ]
        .join("\n")
    }
}

impl PartialEq for RunRecord {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for RunRecord {}

impl fmt::Display for RunRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(true))
    }
}

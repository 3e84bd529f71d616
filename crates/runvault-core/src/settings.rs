//! The externally owned settings document.
//!
//! Everything is kept verbatim except the `unclaimed` map, which records
//! when each run id was submitted.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

const UNCLAIMED: &str = "unclaimed";

/// A JSON settings document tied to the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    path: PathBuf,
    data: Map<String, Value>,
}

impl Settings {
    /// Read `path`. The document must be a JSON object.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str(&raw)? {
            Value::Object(data) => Ok(Self { path, data }),
            _ => Err(StoreError::Settings(format!(
                "{} does not hold a JSON object",
                path.display()
            ))),
        }
    }

    /// Like [`Settings::load`], starting empty when `path` does not exist.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self {
                path,
                data: Map::new(),
            })
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Submission time recorded for `id`, as written.
    pub fn unclaimed(&self, id: &str) -> Option<&str> {
        self.data.get(UNCLAIMED)?.get(id)?.as_str()
    }

    /// Record that `id` was submitted at `at`.
    pub fn record_submission(&mut self, id: &str, at: DateTime<Utc>) {
        let stamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let entry = self
            .data
            .entry(UNCLAIMED)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(unclaimed) = entry {
            unclaimed.insert(id.to_string(), Value::String(stamp));
        }
    }

    /// Rewrite the whole document to its file.
    pub fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.data)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

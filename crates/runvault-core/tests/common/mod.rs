#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use runvault_core::{ModeEntry, ModeParser, TableModeParser, CODE_FILE, FIELD_COUNT};

/// Saved on 2024-10-09 on #ef in an old dreadnoughts mode.
pub const CODE: &str = "(6e2121d4:#ef:w33oldscdreadnoughts2:Auto-Tri-Angle:8/8/9/9/9/9/9/7/1/0:10083590:2720:9:3:0:536:9:1728507182:5lZqbl5uVQDOddyJ)";

pub const LEGACY_MODE: &str = "w33oldscdreadnoughts2";
pub const CURRENT_MODE: &str = "w33scdreadnoughts2";
pub const NORMAL_MODE: &str = "ffa";
pub const GROWTH_MODE: &str = "growthffa";
pub const ARMS_RACE_MODE: &str = "armsraceffa";

pub fn modes() -> TableModeParser {
    TableModeParser::new()
        .with_mode(
            LEGACY_MODE,
            ModeEntry::default()
                .with_custom_word("old")
                .with_attribute("dreadnoughts")
                .with_attribute("siege"),
        )
        .with_mode(
            CURRENT_MODE,
            ModeEntry::default().with_attribute("dreadnoughts"),
        )
        .with_mode(NORMAL_MODE, ModeEntry::normal().with_attribute("ffa"))
        .with_mode(
            GROWTH_MODE,
            ModeEntry::default()
                .with_prefix("Growth")
                .with_attribute("ffa"),
        )
        .with_mode(
            ARMS_RACE_MODE,
            ModeEntry::default()
                .with_prefix("Arms Race")
                .with_attribute("ffa"),
        )
}

pub fn parser() -> Arc<dyn ModeParser> {
    Arc::new(modes())
}

/// [`CODE`] with some fields replaced, by 0-based position.
pub fn code_with(overrides: &[(usize, &str)]) -> String {
    let inner = CODE.trim_start_matches('(').trim_end_matches(')');
    let mut fields: Vec<&str> = inner.split(':').collect();
    assert_eq!(fields.len(), FIELD_COUNT);
    for (position, value) in overrides {
        fields[*position] = value;
    }
    format!("({})", fields.join(":"))
}

/// 2024-10-09 12:00 UTC, the day [`CODE`] was saved.
pub fn save_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 9, 12, 0, 0).unwrap()
}

/// Write a run directory at `<root>/<category>/<name>`.
pub fn write_run(root: &Path, category: &str, name: &str, code: &str) -> PathBuf {
    let dir = root.join(category).join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(CODE_FILE), code).unwrap();
    dir
}

/// Write a past save nested inside `run`.
pub fn write_history(run: &Path, name: &str, code: &str) -> PathBuf {
    let dir = run.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(CODE_FILE), code).unwrap();
    dir
}

pub fn write_screenshot(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, vec![0u8; size]).unwrap();
    path
}

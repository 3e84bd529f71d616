//! On-disk layout of a run directory.
//!
//! ```text
//! <root>/<category>/<run dir>/code.txt
//!                            /<screenshot files>
//!                            /<history dir>/code.txt
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{SaveEntry, StoredRun};
use crate::codec::RunRecord;
use crate::error::{Result, StoreError};
use crate::mode::ModeParser;

/// File holding the canonical record text of a run directory.
pub const CODE_FILE: &str = "code.txt";

/// Immediate subdirectories of `dir`, sorted by name.
pub fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Screenshots of a run directory as `(windowed, fullscreen)`.
///
/// Every file that is not a `.txt` counts. With two or more, the first two
/// by name are used and the larger one is the windowed shot.
pub fn find_screenshots(dir: &Path) -> Result<(Option<PathBuf>, Option<PathBuf>)> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_text = path.extension().is_some_and(|ext| ext == "txt");
        if entry.file_type()?.is_file() && !is_text {
            files.push(path);
        }
    }
    files.sort();

    let mut files = files.into_iter();
    let (windowed, fullscreen) = match (files.next(), files.next()) {
        (None, _) => return Ok((None, None)),
        (Some(only), None) => return Ok((Some(only), None)),
        (Some(first), Some(second)) => (first, second),
    };

    if fs::metadata(&windowed)?.len() < fs::metadata(&fullscreen)?.len() {
        Ok((Some(fullscreen), Some(windowed)))
    } else {
        Ok((Some(windowed), Some(fullscreen)))
    }
}

/// Read one run directory without looking at nested directories.
pub fn read_entry(dir: &Path, parser: &dyn ModeParser) -> Result<SaveEntry> {
    let code_file = dir.join(CODE_FILE);
    if !code_file.is_file() {
        return Err(StoreError::MissingRecordFile { path: code_file });
    }

    let text = fs::read_to_string(&code_file)?;
    let record = RunRecord::parse(text.trim(), parser).map_err(|source| StoreError::InvalidRecord {
        path: code_file.clone(),
        text: text.clone(),
        source,
    })?;
    let (windowed, fullscreen) = find_screenshots(dir)?;

    Ok(SaveEntry {
        record,
        path: dir.to_path_buf(),
        windowed,
        fullscreen,
    })
}

/// Read a top-level run directory and its history, oldest first.
pub fn read_run(dir: &Path, parser: &dyn ModeParser) -> Result<StoredRun> {
    let entry = read_entry(dir, parser)?;

    let mut history = list_dirs(dir)?
        .iter()
        .map(|sub| read_entry(sub, parser))
        .collect::<Result<Vec<_>>>()?;
    history.sort_by(|a, b| {
        a.record
            .creation_time()
            .cmp(&b.record.creation_time())
            .then_with(|| a.path.cmp(&b.path))
    });

    debug!(path = %dir.display(), history = history.len(), "read run directory");
    Ok(StoredRun { entry, history })
}

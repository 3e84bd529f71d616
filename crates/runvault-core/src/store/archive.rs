//! Moving runs between directories: discard, restore and save.
//!
//! Renames are not transactional. If a rename fails part-way the error is
//! returned, files already moved stay where they are and the in-memory
//! collection is left untouched.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::layout::{find_screenshots, read_entry, CODE_FILE};
use super::{RecordStore, SaveEntry, StoredRun};
use crate::codec::{RunRecord, ENDED_DIR};
use crate::error::{Result, StoreError, VaultError};
use crate::obs::{self, RunSpan};
use crate::settings::Settings;

/// Renames a directory. The filesystem implementation is [`FsRenamer`].
pub trait DirRenamer: fmt::Debug + Send + Sync {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`DirRenamer`] backed by `std::fs::rename`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRenamer;

impl DirRenamer for FsRenamer {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// `dir/<file name of path>`, refusing to overwrite.
fn destination(path: &Path, dir: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        StoreError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no directory name", path.display()),
        ))
    })?;
    let dest = dir.join(name);
    if dest.exists() {
        return Err(StoreError::DestinationExists { path: dest });
    }
    Ok(dest)
}

impl RecordStore {
    /// Move a run into the ended directory and drop it from the collection.
    pub fn discard(&mut self, id: &str) -> Result<StoredRun> {
        let _span = RunSpan::enter(id);
        let run = self
            .runs
            .get(id)
            .ok_or_else(|| StoreError::UnknownRecord { id: id.to_string() })?;

        let ended = self.root.join(ENDED_DIR);
        fs::create_dir_all(&ended)?;
        let dest = destination(run.path(), &ended)?;
        self.renamer.rename(run.path(), &dest)?;

        let mut run = self
            .runs
            .remove(id)
            .ok_or_else(|| StoreError::UnknownRecord { id: id.to_string() })?;
        run.relocate(dest);
        obs::emit_run_discarded(id, run.path());
        Ok(run)
    }

    /// The active run `record` corrects, if any. It must not live in `target`.
    fn restorable(&self, record: &RunRecord, target: &Path) -> Result<Option<&StoredRun>> {
        match self.runs.get(record.id()) {
            Some(run) if run.record().inner() != record.inner() => {
                if run.path() == target {
                    return Err(StoreError::RestoreIntoSelf {
                        id: record.id().to_string(),
                        path: target.to_path_buf(),
                    });
                }
                Ok(Some(run))
            }
            _ => Ok(None),
        }
    }

    /// Refuse `target` when another run already lives there, in memory or on
    /// disk. A run with the same id may be overwritten.
    fn check_target(&self, record: &RunRecord, target: &Path) -> Result<()> {
        let taken = |id: &str| StoreError::DirectoryTaken {
            path: target.to_path_buf(),
            id: id.to_string(),
        };
        if let Some(other) = self
            .runs
            .values()
            .find(|run| run.path() == target && run.id() != record.id())
        {
            return Err(taken(other.id()));
        }
        if target.join(CODE_FILE).is_file() {
            let existing = read_entry(target, self.parser.as_ref())?;
            if existing.record.id() != record.id() {
                return Err(taken(existing.record.id()));
            }
        }
        Ok(())
    }

    /// Fold an earlier save of `record` into `target`.
    ///
    /// Looks for an active run with the same id but different text. When one
    /// exists, its history directories and then its own directory are moved
    /// under `target`, and `[...history, run]` is returned. Otherwise nothing
    /// changes and the result is empty.
    pub fn restore(&mut self, record: &RunRecord, target: &Path) -> Result<Vec<SaveEntry>> {
        let _span = RunSpan::enter(record.id());
        let Some(matched) = self.restorable(record, target)? else {
            debug!(id = %record.id(), "no earlier save to restore");
            return Ok(Vec::new());
        };

        fs::create_dir_all(target)?;
        let mut moves = Vec::with_capacity(matched.history.len() + 1);
        for past in &matched.history {
            moves.push((past.path.clone(), destination(&past.path, target)?));
        }
        moves.push((matched.path().to_path_buf(), destination(matched.path(), target)?));

        for (from, to) in &moves {
            self.renamer.rename(from, to)?;
        }

        let Some(old) = self.runs.remove(record.id()) else {
            return Ok(Vec::new());
        };
        let StoredRun { mut entry, history } = old;
        let mut merged = Vec::with_capacity(history.len() + 1);
        for (mut past, (_, to)) in history.into_iter().zip(&moves) {
            past.relocate(to.clone());
            merged.push(past);
        }
        if let Some((_, to)) = moves.last() {
            entry.relocate(to.clone());
        }
        merged.push(entry);

        obs::emit_restore_resolved(record.id(), merged.len(), target);
        Ok(merged)
    }

    /// Save record text as a new active run.
    ///
    /// Creates `<root>/<category>/<date score tank>/code.txt`, picks up any
    /// screenshots already in that directory, optionally restores an earlier
    /// save into it and records the submission in `settings`. A directory
    /// already holding a run with another id is refused before anything is
    /// written.
    pub fn save(
        &mut self,
        text: &str,
        restore: bool,
        settings: &mut Settings,
        now: DateTime<Utc>,
    ) -> std::result::Result<StoredRun, VaultError> {
        let record = RunRecord::parse(text.trim(), self.parser.as_ref())?;
        let _span = RunSpan::enter(record.id());
        let dir_name = record
            .dir_name(now.date_naive())
            .map_err(StoreError::from)?;
        let target = self
            .root
            .join(record.category().dir_name())
            .join(dir_name);

        self.check_target(&record, &target)?;
        if restore {
            self.restorable(&record, &target)?;
        }
        fs::create_dir_all(&target).map_err(StoreError::from)?;
        fs::write(target.join(CODE_FILE), record.inner()).map_err(StoreError::from)?;

        let history = if restore {
            self.restore(&record, &target)?
        } else {
            Vec::new()
        };
        let (windowed, fullscreen) = find_screenshots(&target)?;

        settings.record_submission(record.id(), now);
        settings.save()?;

        let run = StoredRun {
            entry: SaveEntry {
                record,
                path: target,
                windowed,
                fullscreen,
            },
            history,
        };
        if let Some(previous) = self.runs.insert(run.id().to_string(), run.clone()) {
            if previous.path() != run.path() {
                warn!(
                    id = %run.id(),
                    previous = %previous.path().display(),
                    "earlier save left in place"
                );
            }
        }

        obs::emit_run_saved(run.id(), run.path(), run.history.len());
        Ok(run)
    }
}

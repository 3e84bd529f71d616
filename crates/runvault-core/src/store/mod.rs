//! Filesystem-backed record store.
//!
//! A store is opened against a root directory holding one subdirectory per
//! [`Category`]. Each run directory carries a `code.txt`, up to two
//! screenshots and nested history directories of the same shape.

pub mod archive;
pub mod filter;
pub mod layout;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::codec::{Category, RunRecord};
use crate::error::{Result, StoreError};
use crate::mode::ModeParser;
use crate::obs;

pub use archive::{DirRenamer, FsRenamer};
pub use filter::{FilterSet, QueryOptions};
pub use layout::{find_screenshots, CODE_FILE};

/// One run directory: the record plus its backing files.
#[derive(Debug, Clone)]
pub struct SaveEntry {
    pub record: RunRecord,
    pub path: PathBuf,
    pub windowed: Option<PathBuf>,
    pub fullscreen: Option<PathBuf>,
}

impl SaveEntry {
    /// Number of screenshots present, 0 to 2.
    pub fn screenshot_count(&self) -> u64 {
        u64::from(self.windowed.is_some()) + u64::from(self.fullscreen.is_some())
    }

    /// Point every path at `dir`, keeping file names.
    pub(crate) fn relocate(&mut self, dir: PathBuf) {
        self.windowed = self.windowed.take().map(|shot| rebase(&shot, &dir));
        self.fullscreen = self.fullscreen.take().map(|shot| rebase(&shot, &dir));
        self.path = dir;
    }
}

fn rebase(path: &Path, dir: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => dir.join(name),
        None => dir.to_path_buf(),
    }
}

/// An active run and its superseded saves, oldest first.
#[derive(Debug, Clone)]
pub struct StoredRun {
    pub entry: SaveEntry,
    pub history: Vec<SaveEntry>,
}

impl StoredRun {
    pub fn record(&self) -> &RunRecord {
        &self.entry.record
    }

    pub fn path(&self) -> &Path {
        &self.entry.path
    }

    pub fn id(&self) -> &str {
        self.entry.record.id()
    }

    /// Move the run to `dir`. History directories travel with it.
    pub(crate) fn relocate(&mut self, dir: PathBuf) {
        for past in &mut self.history {
            let moved = rebase(&past.path, &dir);
            past.relocate(moved);
        }
        self.entry.relocate(dir);
    }
}

/// The active collection of runs, keyed by record id.
#[derive(Debug)]
pub struct RecordStore {
    root: PathBuf,
    runs: BTreeMap<String, StoredRun>,
    parser: Arc<dyn ModeParser>,
    renamer: Arc<dyn DirRenamer>,
}

impl RecordStore {
    /// Load every run under `root`.
    ///
    /// A missing category directory is an empty category. A run directory
    /// without a readable `code.txt` fails the whole load.
    pub fn open(root: impl Into<PathBuf>, parser: Arc<dyn ModeParser>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StoreError::MissingRoot { path: root });
        }

        let mut runs = BTreeMap::new();
        for category in Category::ALL {
            let dir = root.join(category.dir_name());
            if !dir.is_dir() {
                debug!(category = %category, path = %dir.display(), "category directory missing");
                continue;
            }
            for run_dir in layout::list_dirs(&dir)? {
                let run = layout::read_run(&run_dir, parser.as_ref())?;
                if let Some(previous) = runs.insert(run.id().to_string(), run) {
                    warn!(
                        id = %previous.id(),
                        replaced = %previous.path().display(),
                        "duplicate run id, keeping the later directory"
                    );
                }
            }
        }

        obs::emit_store_opened(&root, runs.len());
        Ok(Self {
            root,
            runs,
            parser,
            renamer: Arc::new(FsRenamer),
        })
    }

    /// Replace the directory renamer used by discard and restore.
    pub fn with_renamer(mut self, renamer: Arc<dyn DirRenamer>) -> Self {
        self.renamer = renamer;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn parser(&self) -> &dyn ModeParser {
        self.parser.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&StoredRun> {
        self.runs.get(id)
    }

    /// A run or one of its past saves. `history_index` is 1-based, oldest first.
    pub fn view(&self, id: &str, history_index: Option<usize>) -> Result<&SaveEntry> {
        let run = self.get(id).ok_or_else(|| StoreError::UnknownRecord { id: id.to_string() })?;
        match history_index {
            None => Ok(&run.entry),
            Some(index) => index
                .checked_sub(1)
                .and_then(|i| run.history.get(i))
                .ok_or_else(|| StoreError::HistoryIndex {
                    id: id.to_string(),
                    index,
                    len: run.history.len(),
                }),
        }
    }

    /// Active runs ordered by id.
    pub fn runs(&self) -> impl Iterator<Item = &StoredRun> {
        self.runs.values()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Runs passing every filter in `options`.
    pub fn query(&self, options: &QueryOptions) -> Vec<&StoredRun> {
        let mut filters = FilterSet::new(self);
        filters.apply(options);
        let found = filters.finish();
        obs::emit_query_finished(self.len(), found.len());
        found
    }
}

//! Query-local narrowing of the active collection.

use super::{RecordStore, StoredRun};
use crate::codec::{Category, Region};
use crate::query::{FieldPredicate, NumericOp};

/// Filters for [`RecordStore::query`]. Unset filters keep every run.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Compared against the number of screenshots, 0 to 2.
    pub screenshots: Option<NumericOp>,
    /// Keep runs whose category is listed.
    pub categories: Option<Vec<Category>>,
    /// Compared against the number of past saves.
    pub history: Option<NumericOp>,
    pub region: Option<Region>,
    /// Compiled `[key;value]` pairs, all of which must match.
    pub fields: Vec<FieldPredicate>,
}

impl QueryOptions {
    pub fn with_screenshots(mut self, op: NumericOp) -> Self {
        self.screenshots = Some(op);
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn with_history(mut self, op: NumericOp) -> Self {
        self.history = Some(op);
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldPredicate>) -> Self {
        self.fields = fields;
        self
    }
}

/// A working copy of the collection, owned by one query.
#[derive(Debug)]
pub struct FilterSet<'a> {
    draft: Vec<&'a StoredRun>,
}

impl<'a> FilterSet<'a> {
    /// Seed with every active run.
    pub fn new(store: &'a RecordStore) -> Self {
        Self {
            draft: store.runs().collect(),
        }
    }

    pub fn retain(&mut self, keep: impl Fn(&StoredRun) -> bool) -> &mut Self {
        self.draft.retain(|run| keep(run));
        self
    }

    pub fn by_screenshot_count(&mut self, op: NumericOp) -> &mut Self {
        self.retain(|run| op.test(run.entry.screenshot_count()))
    }

    pub fn by_category(&mut self, categories: &[Category]) -> &mut Self {
        self.retain(|run| categories.contains(&run.record().category()))
    }

    pub fn by_history_count(&mut self, op: NumericOp) -> &mut Self {
        self.retain(|run| op.test(run.history.len() as u64))
    }

    pub fn by_region(&mut self, region: Region) -> &mut Self {
        self.retain(|run| run.record().server().region() == region)
    }

    pub fn by_field(&mut self, predicate: &FieldPredicate) -> &mut Self {
        self.retain(|run| predicate.matches(run.record()))
    }

    /// Narrow by every set option: screenshots, category, history, region,
    /// then each field predicate.
    pub fn apply(&mut self, options: &QueryOptions) -> &mut Self {
        if let Some(op) = options.screenshots {
            self.by_screenshot_count(op);
        }
        if let Some(categories) = &options.categories {
            self.by_category(categories);
        }
        if let Some(op) = options.history {
            self.by_history_count(op);
        }
        if let Some(region) = options.region {
            self.by_region(region);
        }
        for predicate in &options.fields {
            self.by_field(predicate);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.draft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draft.is_empty()
    }

    pub fn finish(self) -> Vec<&'a StoredRun> {
        self.draft
    }
}

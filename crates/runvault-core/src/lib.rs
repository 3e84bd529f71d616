//! runvault core library
//!
//! Codec for 14-field run records, a query compiler over their fields, a
//! filesystem-backed record store and the archival operations that move runs
//! between its directories.

pub mod codec;
pub mod config;
pub mod error;
pub mod mode;
pub mod obs;
pub mod query;
pub mod settings;
pub mod store;
pub mod telemetry;

pub use codec::{
    format_score, strip_wrapping, validate, wrap, Build, Category, FieldKey, FieldKind, Region,
    RunRecord, Server, ENDED_DIR, FIELD_COUNT,
};
pub use config::VaultConfig;
pub use error::{
    BuildParseError, QueryError, Result, ScoreFormatError, StoreError, ValidationError, VaultError,
};
pub use mode::{GameMode, ModeEntry, ModeParseError, ModeParser, TableMode, TableModeParser};
pub use query::{
    compile_date_op, compile_key_value_pairs, compile_numeric_op, Anchor, BuildPattern,
    FieldPredicate, NumericOp,
};
pub use settings::Settings;
pub use store::{
    DirRenamer, FilterSet, FsRenamer, QueryOptions, RecordStore, SaveEntry, StoredRun, CODE_FILE,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

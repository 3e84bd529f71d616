//! Run record codec.
//!
//! - `fields`: the positional 14-field schema and its validators
//! - `build`: the upgrade allocation vector
//! - `record`: validation, construction and formatting of records
//! - `server`, `category`, `score`: derived record values

pub mod build;
pub mod category;
pub mod fields;
pub mod record;
pub mod score;
pub mod server;

pub use build::Build;
pub use category::{Category, ENDED_DIR};
pub use fields::{FieldKey, FieldKind, FIELD_COUNT, FIELD_KINDS};
pub use record::{strip_wrapping, validate, wrap, RunRecord};
pub use score::format_score;
pub use server::{Region, Server};

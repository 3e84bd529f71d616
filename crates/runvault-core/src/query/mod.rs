//! Query compiler.
//!
//! Turns short operator expressions into predicates over record fields:
//! number operations, date cells and date operations, build patterns, mode
//! expressions and `[key;value]` pair lists.

pub mod build;
pub mod date;
pub mod numeric;
pub mod pairs;

pub use build::{Anchor, BuildPattern};
pub use date::{cell_to_unix, compile_date_op, compile_date_op_at, DATE_VALUE_LIMIT};
pub use numeric::{compile_numeric_op, NumericOp};
pub use pairs::{
    compile_field, compile_key_value_pairs, compile_key_value_pairs_at, compile_mode,
    normalize_tank, resolve_key, FieldPredicate,
};

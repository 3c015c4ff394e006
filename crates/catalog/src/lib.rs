//! `spindle-catalog` — the catalog domain: records, closed format/category
//! enumerations, field patching, and listing filter predicates.

pub mod filter;
pub mod record;

pub use filter::{Pagination, RecordFilter, RecordPage};
pub use record::{
    apply_stock_delta, NewRecord, Record, RecordCategory, RecordFormat, RecordKey, RecordPatch,
};

//! The files in `cleaning/` define the per-table cleaning rules and
//! the generic routine that applies them.

// Provides the declarative rule records of the four tables.
pub(crate) mod rules;
// Provides the generic cleaning routine.
pub(crate) mod cleaner;

pub use cleaner::{clean_table, Table};

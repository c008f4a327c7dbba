//! Field-level conversions applied by the table cleaners.

// Provides pure per-value conversions.
pub(crate) mod field;
// Provides the per-year categorical remapping.
pub(crate) mod remap;

pub use field::{
    age_from_birth_year,
    hex_to_decimal,
    lane_count,
    length_to_centimetres,
    time_bucket,
};
pub use remap::ContiguousRemap;

//! This file defines the declarative cleaning rules of the four
//! yearly source tables.
//! One generic routine in `cleaner.rs` consumes these records,
//! so the per-table knowledge lives here and nowhere else.


/// A value-level conversion applied to one column.
/// The actual conversions live in [`crate::transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnRule {
    /// Birth year to age, with the missing-year sentinel imputation.
    BirthYearToAge,

    /// Hexadecimal token to its decimal value.
    HexToDecimal,

    /// Length in metres (comma decimals) to centimetres.
    LengthToCentimetres,

    /// Integer lane count with the `#ERREUR` token mapped to -1.
    LaneCount,

    /// `HHMM` time token to a 12-minute bucket index.
    TimeBucket,

    /// Per-year contiguous remap of categorical codes.
    Remap,
}


/// Integer width a column is allowed to keep
/// instead of being narrowed to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Width {
    /// 16-bit signed, for columns whose values exceed the 8-bit range.
    I16,

    /// 64-bit signed, for the join keys
    /// whose uniqueness must survive the whole dataset.
    I64,
}


/// The cleaning recipe of one source table:
/// which columns to drop, which to read as text,
/// which transforms to run, how to rename,
/// and which columns escape the default 8-bit narrowing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableRules {
    /// Source file stem, e.g. `usagers` for `usagers-{year}.csv`.
    pub(crate) name: &'static str,

    /// Columns removed before anything else.
    pub(crate) drop: &'static [&'static str],

    /// Columns forced to text at read time, so hex digits,
    /// leading zeros, comma decimals and error tokens
    /// survive the type inference.
    pub(crate) read_as_text: &'static [&'static str],

    /// Per-column conversions, applied in the listed order.
    pub(crate) transforms: &'static [(&'static str, ColumnRule)],

    /// Renames applied after the transforms.
    pub(crate) rename: &'static [(&'static str, &'static str)],

    /// Columns kept at a wider width than the 8-bit default.
    pub(crate) wide: &'static [(&'static str, Width)],
}


/// Victims: one row per person involved in an accident.
/// The birth year becomes an age and the actor-position code
/// is decoded from hexadecimal.
/// Both join keys stay 64-bit.
pub(crate) const USAGERS: TableRules = TableRules {
    name: "usagers",
    drop: &["id_usager", "num_veh"],
    read_as_text: &["actp"],
    transforms: &[
        ("an_nais", ColumnRule::BirthYearToAge),
        ("actp", ColumnRule::HexToDecimal),
    ],
    rename: &[("an_nais", "age")],
    wide: &[("Num_Acc", Width::I64), ("id_vehicule", Width::I64)],
};


/// Vehicles: one row per vehicle.
/// Its accident id is dropped because the victims table
/// already carries it; `id_vehicule` is the join key.
pub(crate) const VEHICULES: TableRules = TableRules {
    name: "vehicules",
    drop: &["num_veh", "occutc", "Num_Acc"],
    read_as_text: &[],
    transforms: &[],
    rename: &[],
    wide: &[("id_vehicule", Width::I64)],
};


/// Locations: one row per accident site.
/// The road width moves from metres to centimetres,
/// which exceeds the 8-bit range, so it stays 16-bit.
pub(crate) const LIEUX: TableRules = TableRules {
    name: "lieux",
    drop: &["voie", "v1", "v2", "pr", "pr1", "lartpc"],
    read_as_text: &["nbv", "larrout"],
    transforms: &[
        ("larrout", ColumnRule::LengthToCentimetres),
        ("nbv", ColumnRule::LaneCount),
    ],
    rename: &[],
    wide: &[("Num_Acc", Width::I64), ("larrout", Width::I16)],
};


/// Circumstances: one row per accident.
/// Time collapses to 12-minute buckets, department and commune
/// codes are remapped to contiguous indices,
/// and the record id takes the shared accident-id name.
/// The commune index can exceed 127, so it stays 16-bit.
pub(crate) const CARCTERISTIQUES: TableRules = TableRules {
    name: "carcteristiques",
    drop: &["an", "adr", "lat", "long"],
    read_as_text: &["hrmn", "dep", "com"],
    transforms: &[
        ("hrmn", ColumnRule::TimeBucket),
        ("dep", ColumnRule::Remap),
        ("com", ColumnRule::Remap),
    ],
    rename: &[("Accident_Id", "Num_Acc")],
    wide: &[("Num_Acc", Width::I64), ("com", Width::I16)],
};

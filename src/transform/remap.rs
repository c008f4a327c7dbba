use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};


/// A bijection from the distinct raw codes of one categorical field
/// to the contiguous range `0..k-1`,
/// assigned in ascending lexicographic order of the raw codes.
///
/// A remap is built fresh from the observed value set of one year's
/// table and is never shared across years:
/// two different years may assign different indices to the same raw
/// code, so the remapped columns of two years are **not** comparable.
///
/// Raw codes are kept as strings on purpose.
/// French department codes such as `2A` are not numeric,
/// and commune codes carry leading zeros that must survive the sort.
///
/// # Example
/// ```
/// use accidata::transform::ContiguousRemap;
///
/// let remap = ContiguousRemap::from_values(["2A", "01", "971", "01"]);
/// assert_eq!(remap.len(), 3);
/// assert_eq!(remap.apply("01"), Some(0));
/// assert_eq!(remap.apply("2A"), Some(1));
/// assert_eq!(remap.apply("971"), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContiguousRemap {
    mapping: BTreeMap<String, i64>,
}


impl ContiguousRemap {
    /// Build the remap from the full observed value set of a field.
    /// Duplicates are collapsed before indices are assigned.
    #[inline]
    pub fn from_values<I, S>(values: I) -> Self
        where I: IntoIterator<Item = S>,
              S: AsRef<str>,
    {
        let mapping = values.into_iter()
            .map(|value| (value.as_ref().to_string(), 0i64))
            .collect::<BTreeMap<_, _>>()
            .into_keys()
            .enumerate()
            .map(|(index, value)| (value, index as i64))
            .collect::<BTreeMap<_, _>>();

        Self { mapping }
    }


    /// Map a raw code to its contiguous index.
    /// Returns `None` for a code that was not in the observed set.
    #[inline]
    pub fn apply(&self, raw: &str) -> Option<i64> {
        self.mapping.get(raw).copied()
    }


    /// The number of distinct raw codes, which equals the number of
    /// assigned indices.
    #[inline]
    pub fn len(&self) -> usize {
        self.mapping.len()
    }


    /// Returns `true` if the observed value set was empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

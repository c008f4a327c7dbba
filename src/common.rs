//! Defines constants and checker functions used across the library.

/// Defines the sentinel value and the default analysis parameters.
pub mod constants;

/// Defines some checker functions.
pub(crate) mod checker;

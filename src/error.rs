//! Error types for alias table loading.
//!
//! Per-post extraction is total and never returns an error; the only fallible
//! operation in this crate is loading the alias configuration at startup,
//! which is fatal for any deployment that needs city-code resolution.

use thiserror::Error;

/// Errors raised while building an [`crate::AliasTable`].
#[derive(Error, Debug)]
pub enum AliasLoadError {
    /// The configuration contained no entries. An empty table must be an
    /// explicit choice (`AliasTable::degraded`), never an accident.
    #[error("alias table is empty")]
    Empty,

    /// An entry listed no codes.
    #[error("alias entry '{alias}' has no codes")]
    NoCodes { alias: String },

    /// An entry's primary code is missing from its own code list.
    #[error("alias entry '{alias}': primary code '{primary}' not in code list")]
    PrimaryNotListed { alias: String, primary: String },

    /// I/O error while reading the configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration was not valid alias JSON.
    #[error("invalid alias JSON: {0}")]
    Json(#[from] serde_json::Error),
}

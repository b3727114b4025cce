//! Catalog error types.

use thiserror::Error;

/// Errors raised by catalog lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No definition registered under this id.
    #[error("unknown part definition: {0}")]
    UnknownPart(String),

    /// Category name not recognised.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

//! Fetch failures surfaced by catalog sources

use thiserror::Error;

use crate::navigation::Identifier;

/// Errors a catalog source can report for a single request
///
/// None of these are fatal: views render the affected section as empty and
/// keep navigation available.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("entry {0} not found")]
    NotFound(Identifier),

    #[error("entry {0} is outside the catalog range")]
    OutOfRange(Identifier),

    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

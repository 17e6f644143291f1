use thiserror::Error;

/// Errors surfaced to the embedding UI layer. Remote mirror failures are
/// deliberately absent: they degrade an operation (the record stays
/// local-only until the next sweep) but never fail it.
#[derive(Debug, Error)]
pub enum LembraError {
    #[error("Invalid data provided: Error message: `{0}`")]
    BadClientData(String),
    #[error("404 Not found. Error message: `{0}`")]
    NotFound(String),
    #[error("Local storage failure: `{0}`")]
    Storage(String),
}

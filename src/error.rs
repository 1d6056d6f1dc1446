use thiserror::Error;

/// Failures surfaced by a clean-up pass.
///
/// Only `InvalidArgument` and `Io` ever reach the caller of
/// [`CleanUpManager::execute`](crate::cleanup::CleanUpManager::execute); the
/// other variants are logged at the point they occur and the pass carries on.
#[derive(Error, Debug)]
pub enum CleanUpError {
    #[error("Unable to build code model for '{document}': {reason}")]
    ParseUnavailable { document: String, reason: String },

    #[error("Unable to load lazy initialized values for '{item}': {reason}")]
    LazyValueLoadFailure { item: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type CleanUpResult<T> = Result<T, CleanUpError>;

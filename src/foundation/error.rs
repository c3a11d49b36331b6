/// Convenience result type used across beatline APIs.
pub type SyncResult<T> = Result<T, SyncError>;

/// Top-level error type for storyboard normalization and timeline composition.
///
/// Only conditions that mean an upstream contract is broken surface here. Anything that can be
/// repaired by substitution, clamping or scaling is corrected in place and logged instead.
#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    /// The storyboard (or configuration) is structurally unusable and must be re-requested.
    #[error("validation error: {0}")]
    Validation(String),

    /// Timeline inputs are impossible to lay out (empty scene list, negative transition).
    #[error("composition error: {0}")]
    Composition(String),

    /// Serialization or deserialization failure outside the storyboard boundary.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SyncError {
    /// Build a [`SyncError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SyncError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Build a [`SyncError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

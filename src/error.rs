//! Errors raised by the dynamic dispatcher and the parallel copier.
//!
//! The static `Copyable` path cannot fail: a type without a copy strategy
//! is rejected by the compiler instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopyError {
    /// Neither a value type, nor `Copyable`, nor a recognized container.
    #[error(
        "type `{type_name}` cannot be deep copied: it is not a value type, \
         does not implement `Copyable`, and is not a recognized container"
    )]
    Unclassifiable { type_name: &'static str },

    /// A value was handed to a strategy resolved for a different type.
    #[error("value does not match the copy strategy resolved for `{expected}`")]
    TypeMismatch { expected: &'static str },

    /// Strategy resolution went deeper than the configured limit.
    #[error("container nesting exceeds the depth limit of {limit} at `{type_name}`")]
    NestingTooDeep { type_name: &'static str, limit: usize },

    /// The bounded worker pool could not be started.
    #[cfg(feature = "parallel")]
    #[error("failed to build the copy worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl CopyError {
    /// Name of the type the error is about, when there is one.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            CopyError::Unclassifiable { type_name } => Some(type_name),
            CopyError::TypeMismatch { expected } => Some(expected),
            CopyError::NestingTooDeep { type_name, .. } => Some(type_name),
            #[cfg(feature = "parallel")]
            CopyError::ThreadPool(_) => None,
        }
    }
}

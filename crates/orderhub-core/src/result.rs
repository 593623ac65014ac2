//! Convenience result type alias for OrderHub.

use crate::error::AppError;

/// A specialized `Result` type for OrderHub operations.
pub type AppResult<T> = Result<T, AppError>;

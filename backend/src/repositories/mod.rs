//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod routine;
pub mod user;

use crate::db;
use thiserror::Error;

pub use routine::{
    ExerciseRecord, NewExercise, RoutineChanges, RoutineFilter, RoutineRecord, RoutineRepository,
    RoutineWithExercises,
};
pub use user::{UserRecord, UserRepository};

/// Failure of a write path
///
/// Uniqueness is enforced by the store only; a rejected write or commit is
/// reported as `UniqueViolation` so callers can surface a conflict.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Classify an error returned by a write statement or by `commit`
    pub fn from_write(err: sqlx::Error) -> Self {
        if db::is_unique_violation(&err) {
            RepositoryError::UniqueViolation
        } else {
            RepositoryError::Database(err)
        }
    }
}

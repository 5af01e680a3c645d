//! Routine service
//!
//! Maps validated requests onto repository calls and repository results
//! onto response types. Name collisions are never pre-checked; they come
//! back from the store as `RepositoryError::UniqueViolation`.

use crate::error::ApiError;
use crate::repositories::{
    ExerciseRecord, NewExercise, RoutineChanges, RoutineFilter, RoutineRepository,
    RoutineWithExercises,
};
use gym_routines_shared::{
    CreateRoutineRequest, DuplicateRoutineRequest, ExerciseResponse, PaginatedResponse,
    RoutineListQuery, RoutineResponse, UpdateRoutineRequest,
};
use sqlx::PgPool;
use tracing::{info, warn};

const NAME_TAKEN: &str = "Routine name already exists";
const NOT_FOUND: &str = "Routine not found";

/// Routine service
pub struct RoutineService;

impl RoutineService {
    /// List routines matching the query, one page at a time
    pub async fn list(
        pool: &PgPool,
        query: &RoutineListQuery,
    ) -> Result<PaginatedResponse<RoutineResponse>, ApiError> {
        let filter = RoutineFilter {
            search: query.search_term(),
            day_of_week: query.day_of_week,
        };

        let (routines, total) =
            RoutineRepository::list(pool, filter, query.page_size(), query.offset()).await?;

        let items = routines.into_iter().map(Self::to_response).collect();
        Ok(PaginatedResponse::new(items, total, query.page(), query.page_size()))
    }

    /// Get a routine with its exercises
    pub async fn get(pool: &PgPool, id: i64) -> Result<RoutineResponse, ApiError> {
        RoutineRepository::get_routine_with_exercises(pool, id)
            .await?
            .map(Self::to_response)
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
    }

    /// Create a routine and its exercises
    pub async fn create(
        pool: &PgPool,
        req: CreateRoutineRequest,
    ) -> Result<RoutineResponse, ApiError> {
        let exercises: Vec<NewExercise> = req.exercises.into_iter().map(NewExercise::from).collect();

        let created = RoutineRepository::create(
            pool,
            &req.name,
            req.description.as_deref(),
            &exercises,
        )
        .await
        .map_err(|e| Self::write_error(e, &req.name))?;

        info!(routine_id = created.routine.id, exercises = exercises.len(), "Routine created");
        Ok(Self::to_response(created))
    }

    /// Partially update a routine
    pub async fn update(
        pool: &PgPool,
        id: i64,
        req: UpdateRoutineRequest,
    ) -> Result<RoutineResponse, ApiError> {
        let attempted_name = req.name.clone();
        let changes = RoutineChanges {
            name: req.name,
            description: req.description,
            exercises: req
                .exercises
                .map(|list| list.into_iter().map(NewExercise::from).collect()),
        };

        let updated = RoutineRepository::update(pool, id, changes)
            .await
            .map_err(|e| Self::write_error(e, attempted_name.as_deref().unwrap_or_default()))?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

        info!(routine_id = id, "Routine updated");
        Ok(Self::to_response(updated))
    }

    /// Delete a routine and, by cascade, its exercises
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), ApiError> {
        if !RoutineRepository::delete(pool, id).await? {
            return Err(ApiError::NotFound(NOT_FOUND.to_string()));
        }

        info!(routine_id = id, "Routine deleted");
        Ok(())
    }

    /// Copy a routine and its exercises under a new name
    pub async fn duplicate(
        pool: &PgPool,
        source_id: i64,
        req: DuplicateRoutineRequest,
    ) -> Result<RoutineResponse, ApiError> {
        let copy = RoutineRepository::duplicate(pool, source_id, &req.name)
            .await
            .map_err(|e| Self::write_error(e, &req.name))?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

        info!(source_id, routine_id = copy.routine.id, "Routine duplicated");
        Ok(Self::to_response(copy))
    }

    fn write_error(err: crate::repositories::RepositoryError, name: &str) -> ApiError {
        let err = ApiError::from_repository(err, NAME_TAKEN);
        if matches!(err, ApiError::Conflict(_)) {
            warn!(name, "Routine name collision rejected by the store");
        }
        err
    }

    /// Response view of a routine and its exercises
    pub fn to_response(loaded: RoutineWithExercises) -> RoutineResponse {
        RoutineResponse {
            id: loaded.routine.id,
            name: loaded.routine.name,
            description: loaded.routine.description,
            created_at: loaded.routine.created_at,
            exercises: loaded.exercises.into_iter().map(exercise_response).collect(),
        }
    }
}

fn exercise_response(record: ExerciseRecord) -> ExerciseResponse {
    ExerciseResponse {
        id: record.id,
        routine_id: record.routine_id,
        name: record.name,
        day_of_week: record.day_of_week,
        sets: record.sets,
        reps: record.reps,
        weight: record.weight,
        notes: record.notes,
        order: record.sort_order,
    }
}

//! Routine and exercise repository for database operations
//!
//! Exercises are always loaded explicitly: a routine row first, then its
//! exercises ordered by `sort_order, id`. Every write runs in a single
//! transaction, so a routine and its exercises become visible together or
//! not at all.

use super::RepositoryError;
use chrono::{DateTime, Utc};
use gym_routines_shared::{DayOfWeek, ExerciseInput};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;

/// Routine record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoutineRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Exercise record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: i64,
    pub routine_id: i64,
    pub name: String,
    pub day_of_week: DayOfWeek,
    pub sets: i32,
    pub reps: i32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub sort_order: i32,
}

/// A routine together with all of its exercises
#[derive(Debug, Clone)]
pub struct RoutineWithExercises {
    pub routine: RoutineRecord,
    pub exercises: Vec<ExerciseRecord>,
}

/// Input for inserting an exercise under a routine
#[derive(Debug, Clone, PartialEq)]
pub struct NewExercise {
    pub name: String,
    pub day_of_week: DayOfWeek,
    pub sets: i32,
    pub reps: i32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub sort_order: i32,
}

impl From<ExerciseInput> for NewExercise {
    fn from(input: ExerciseInput) -> Self {
        Self {
            name: input.name,
            day_of_week: input.day_of_week,
            sets: input.sets,
            reps: input.reps,
            weight: input.weight,
            notes: input.notes,
            sort_order: input.order,
        }
    }
}

impl From<&ExerciseRecord> for NewExercise {
    fn from(record: &ExerciseRecord) -> Self {
        Self {
            name: record.name.clone(),
            day_of_week: record.day_of_week,
            sets: record.sets,
            reps: record.reps,
            weight: record.weight,
            notes: record.notes.clone(),
            sort_order: record.sort_order,
        }
    }
}

/// Filters for listing routines
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutineFilter<'a> {
    /// Case-insensitive substring of the routine name
    pub search: Option<&'a str>,
    /// Only routines with at least one exercise on this day
    pub day_of_week: Option<DayOfWeek>,
}

/// Partial update of a routine
#[derive(Debug, Clone, Default)]
pub struct RoutineChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    /// Replaces the whole exercise set when present
    pub exercises: Option<Vec<NewExercise>>,
}

/// Escape LIKE wildcards and wrap the term for a substring match
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Routine repository
pub struct RoutineRepository;

impl RoutineRepository {
    /// List one page of routines, newest first, with their exercises
    ///
    /// Returns the page and the total number of routines matching `filter`.
    pub async fn list(
        pool: &PgPool,
        filter: RoutineFilter<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<RoutineWithExercises>, i64), sqlx::Error> {
        // Count and page read from one snapshot
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM routines r");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query.build_query_scalar().fetch_one(&mut *tx).await?;

        let mut page_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT r.id, r.name, r.description, r.created_at FROM routines r");
        push_filters(&mut page_query, filter);
        page_query
            .push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        let routines: Vec<RoutineRecord> = page_query.build_query_as().fetch_all(&mut *tx).await?;

        if routines.is_empty() {
            tx.commit().await?;
            return Ok((Vec::new(), total));
        }

        let ids: Vec<i64> = routines.iter().map(|r| r.id).collect();
        let exercises = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, routine_id, name, day_of_week, sets, reps, weight, notes, sort_order
            FROM exercises
            WHERE routine_id = ANY($1)
            ORDER BY routine_id, sort_order, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        let mut by_routine: HashMap<i64, Vec<ExerciseRecord>> = HashMap::new();
        for exercise in exercises {
            by_routine.entry(exercise.routine_id).or_default().push(exercise);
        }

        let items = routines
            .into_iter()
            .map(|routine| {
                let exercises = by_routine.remove(&routine.id).unwrap_or_default();
                RoutineWithExercises { routine, exercises }
            })
            .collect();

        Ok((items, total))
    }

    /// Fetch a routine and all of its exercises
    pub async fn get_routine_with_exercises(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<RoutineWithExercises>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        load_with_exercises(&mut conn, id).await
    }

    /// Create a routine with its exercises in one transaction
    pub async fn create(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
        exercises: &[NewExercise],
    ) -> Result<RoutineWithExercises, RepositoryError> {
        let mut tx = pool.begin().await?;

        let routine = insert_routine(&mut tx, name, description)
            .await
            .map_err(RepositoryError::from_write)?;
        let exercises = insert_exercises(&mut tx, routine.id, exercises).await?;

        // The name constraint is deferred: a collision surfaces here
        tx.commit().await.map_err(RepositoryError::from_write)?;

        Ok(RoutineWithExercises { routine, exercises })
    }

    /// Apply a partial update; `Ok(None)` when the routine does not exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: RoutineChanges,
    ) -> Result<Option<RoutineWithExercises>, RepositoryError> {
        let mut tx = pool.begin().await?;

        let (set_description, description) = match changes.description {
            Some(description) => (true, description),
            None => (false, None),
        };

        let routine = sqlx::query_as::<_, RoutineRecord>(
            r#"
            UPDATE routines SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END
            WHERE id = $1
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(set_description)
        .bind(description)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        let Some(routine) = routine else {
            return Ok(None);
        };

        let exercises = match changes.exercises {
            Some(replacement) => {
                sqlx::query("DELETE FROM exercises WHERE routine_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                insert_exercises(&mut tx, id, &replacement).await?
            }
            None => exercises_for(&mut tx, id).await?,
        };

        tx.commit().await.map_err(RepositoryError::from_write)?;

        Ok(Some(RoutineWithExercises { routine, exercises }))
    }

    /// Delete a routine; its exercises go with it through the FK cascade
    ///
    /// Returns whether a routine was deleted.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM routines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Copy a routine and all of its exercises under a new name
    ///
    /// `Ok(None)` when the source routine does not exist.
    pub async fn duplicate(
        pool: &PgPool,
        source_id: i64,
        new_name: &str,
    ) -> Result<Option<RoutineWithExercises>, RepositoryError> {
        let mut tx = pool.begin().await?;

        let Some(source) = load_with_exercises(&mut tx, source_id).await? else {
            return Ok(None);
        };

        let routine = insert_routine(&mut tx, new_name, source.routine.description.as_deref())
            .await
            .map_err(RepositoryError::from_write)?;
        let copies: Vec<NewExercise> = source.exercises.iter().map(NewExercise::from).collect();
        let exercises = insert_exercises(&mut tx, routine.id, &copies).await?;

        tx.commit().await.map_err(RepositoryError::from_write)?;

        Ok(Some(RoutineWithExercises { routine, exercises }))
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: RoutineFilter<'_>) {
    let mut separator = " WHERE ";

    if let Some(term) = filter.search {
        builder
            .push(separator)
            .push("r.name ILIKE ")
            .push_bind(like_pattern(term));
        separator = " AND ";
    }

    if let Some(day) = filter.day_of_week {
        // EXISTS keeps a routine once no matter how many exercises match
        builder
            .push(separator)
            .push("EXISTS (SELECT 1 FROM exercises e WHERE e.routine_id = r.id AND e.day_of_week = ")
            .push_bind(day)
            .push(")");
    }
}

async fn load_with_exercises(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<RoutineWithExercises>, sqlx::Error> {
    let routine = sqlx::query_as::<_, RoutineRecord>(
        r#"
        SELECT id, name, description, created_at
        FROM routines
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(routine) = routine else {
        return Ok(None);
    };

    let exercises = exercises_for(conn, routine.id).await?;
    Ok(Some(RoutineWithExercises { routine, exercises }))
}

async fn exercises_for(
    conn: &mut PgConnection,
    routine_id: i64,
) -> Result<Vec<ExerciseRecord>, sqlx::Error> {
    sqlx::query_as::<_, ExerciseRecord>(
        r#"
        SELECT id, routine_id, name, day_of_week, sets, reps, weight, notes, sort_order
        FROM exercises
        WHERE routine_id = $1
        ORDER BY sort_order, id
        "#,
    )
    .bind(routine_id)
    .fetch_all(conn)
    .await
}

async fn insert_routine(
    conn: &mut PgConnection,
    name: &str,
    description: Option<&str>,
) -> Result<RoutineRecord, sqlx::Error> {
    sqlx::query_as::<_, RoutineRecord>(
        r#"
        INSERT INTO routines (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description, created_at
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(conn)
    .await
}

async fn insert_exercises(
    conn: &mut PgConnection,
    routine_id: i64,
    exercises: &[NewExercise],
) -> Result<Vec<ExerciseRecord>, sqlx::Error> {
    if exercises.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO exercises (routine_id, name, day_of_week, sets, reps, weight, notes, sort_order) ",
    );
    builder.push_values(exercises, |mut row, exercise| {
        row.push_bind(routine_id)
            .push_bind(exercise.name.clone())
            .push_bind(exercise.day_of_week)
            .push_bind(exercise.sets)
            .push_bind(exercise.reps)
            .push_bind(exercise.weight)
            .push_bind(exercise.notes.clone())
            .push_bind(exercise.sort_order);
    });
    builder.push(
        " RETURNING id, routine_id, name, day_of_week, sets, reps, weight, notes, sort_order",
    );

    let mut inserted: Vec<ExerciseRecord> = builder.build_query_as().fetch_all(conn).await?;
    inserted.sort_by_key(|e| (e.sort_order, e.id));
    Ok(inserted)
}

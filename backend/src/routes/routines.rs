//! Routine routes
//!
//! Every handler requires a bearer token; the resolved user is only used
//! for the request log since routines are shared by all users.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::{ApiPath, ValidatedJson, ValidatedQuery};
use crate::services::RoutineService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use gym_routines_shared::{
    CreateRoutineRequest, DuplicateRoutineRequest, PaginatedResponse, RoutineListQuery,
    RoutineResponse, UpdateRoutineRequest,
};
use tracing::debug;

/// Create routine routes
pub fn routine_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routines).post(create_routine))
        .route(
            "/:id",
            get(get_routine).put(update_routine).delete(delete_routine),
        )
        .route("/:id/duplicar", post(duplicate_routine))
}

/// List routines
///
/// GET /routines?search=&dia_semana=&page=&page_size=
async fn list_routines(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<RoutineListQuery>,
) -> ApiResult<Json<PaginatedResponse<RoutineResponse>>> {
    debug!(user_id = auth_user.user.id, ?query, "Listing routines");
    let page = RoutineService::list(state.db(), &query).await?;
    Ok(Json(page))
}

/// GET /routines/:id
async fn get_routine(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<RoutineResponse>> {
    let routine = RoutineService::get(state.db(), id).await?;
    Ok(Json(routine))
}

/// Create a routine with its exercises
///
/// POST /routines
async fn create_routine(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateRoutineRequest>,
) -> ApiResult<(StatusCode, Json<RoutineResponse>)> {
    debug!(user_id = auth_user.user.id, "Creating routine");
    let routine = RoutineService::create(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(routine)))
}

/// Partially update a routine
///
/// PUT /routines/:id
///
/// Supplied `ejercicios` replace the routine's whole exercise set.
async fn update_routine(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(req): ValidatedJson<UpdateRoutineRequest>,
) -> ApiResult<Json<RoutineResponse>> {
    debug!(user_id = auth_user.user.id, routine_id = id, "Updating routine");
    let routine = RoutineService::update(state.db(), id, req).await?;
    Ok(Json(routine))
}

/// DELETE /routines/:id
async fn delete_routine(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    debug!(user_id = auth_user.user.id, routine_id = id, "Deleting routine");
    RoutineService::delete(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Copy a routine under a new name
///
/// POST /routines/:id/duplicar
async fn duplicate_routine(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(req): ValidatedJson<DuplicateRoutineRequest>,
) -> ApiResult<(StatusCode, Json<RoutineResponse>)> {
    debug!(user_id = auth_user.user.id, source_id = id, "Duplicating routine");
    let routine = RoutineService::duplicate(state.db(), id, req).await?;
    Ok((StatusCode::CREATED, Json(routine)))
}

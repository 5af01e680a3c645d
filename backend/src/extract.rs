//! Validating request extractors
//!
//! `ValidatedJson` and `ValidatedQuery` deserialize like axum's `Json` and
//! `Query`, then run the `validator` rules on the result. `ApiPath` is
//! axum's `Path` with the same rejection type. All of them reject with
//! `ApiError::Validation`, so a handler never sees malformed or out-of-range
//! input.

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Path parameters; a value that does not parse is a validation error
#[derive(Debug, Clone, Copy, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// JSON body that has passed validation
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string that has passed validation
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, StatusCode},
        routing::{get, post},
        Router,
    };
    use gym_routines_shared::{CreateRoutineRequest, RoutineListQuery};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                post(|ValidatedJson(req): ValidatedJson<CreateRoutineRequest>| async move {
                    req.name
                }),
            )
            .route(
                "/list",
                get(|ValidatedQuery(query): ValidatedQuery<RoutineListQuery>| async move {
                    format!("{}:{}", query.page(), query.page_size())
                }),
            )
            .route(
                "/items/:id",
                get(|ApiPath(id): ApiPath<i64>| async move { id.to_string() }),
            )
    }

    async fn post_json(body: &str) -> (StatusCode, Value) {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get_query(query: &str) -> (StatusCode, String) {
        get_uri(&format!("/list?{query}")).await
    }

    async fn get_uri(uri: &str) -> (StatusCode, String) {
        let request = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_valid_body_reaches_handler() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"nombre":"Full body"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let (status, body) = post_json(r#"{"nombre": "#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_day_is_validation_error() {
        let (status, body) = post_json(
            r#"{"nombre":"A","ejercicios":[{"nombre":"Press","dia_semana":"funday","series":3,"repeticiones":10}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_out_of_range_exercise_names_field() {
        let (status, body) = post_json(
            r#"{"nombre":"A","ejercicios":[{"nombre":"Press","dia_semana":"lunes","series":21,"repeticiones":10}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "ejercicios[0].series");
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let (status, body) = post_json(r#"{"nombre":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["field"], "nombre");
    }

    #[tokio::test]
    async fn test_numeric_path_reaches_handler() {
        let (status, body) = get_uri("/items/42").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
    }

    #[rstest::rstest]
    #[case("/items/abc")]
    #[case("/items/99999999999999999999")]
    #[case("/items/1.5")]
    #[tokio::test]
    async fn test_unparsable_path_is_structured_validation_error(#[case] uri: &str) {
        let (status, body) = get_uri(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_query_defaults_apply() {
        let (status, body) = get_query("").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "1:9");
    }

    #[tokio::test]
    async fn test_query_page_size_over_limit_rejected() {
        let (status, _) = get_query("page_size=51").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_query_page_zero_rejected() {
        let (status, _) = get_query("page=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_query_unknown_day_rejected() {
        let (status, _) = get_query("dia_semana=someday").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

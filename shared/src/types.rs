//! API request and response types
//!
//! Field names on the wire follow the client contract (`nombre`,
//! `dia_semana`, ...), while the Rust side uses English names.

use crate::models::DayOfWeek;
use crate::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Default number of routines per page
pub const DEFAULT_PAGE_SIZE: i64 = 9;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    #[validate(
        length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"),
        custom(function = "validation::no_nul_chars")
    )]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, max = 20, message = "Password must be between 4 and 20 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 4, max = 20, message = "Password must be between 4 and 20 characters"))]
    pub password: String,
}

/// Bearer token issued on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Public user record (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Routine and Exercise Types
// ============================================================================

fn default_order() -> i32 {
    1
}

/// Exercise as supplied when creating or replacing a routine's exercises
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ExerciseInput {
    #[serde(rename = "nombre")]
    #[validate(
        length(min = 1, max = 120, message = "Exercise name must be between 1 and 120 characters"),
        custom(function = "validation::no_nul_chars")
    )]
    pub name: String,
    #[serde(rename = "dia_semana")]
    pub day_of_week: DayOfWeek,
    #[serde(rename = "series")]
    #[validate(range(min = 1, max = 20, message = "Sets must be between 1 and 20"))]
    pub sets: i32,
    #[serde(rename = "repeticiones")]
    #[validate(range(min = 1, max = 50, message = "Reps must be between 1 and 50"))]
    pub reps: i32,
    #[serde(rename = "peso", default)]
    #[validate(range(min = 0.0, message = "Weight cannot be negative"))]
    pub weight: Option<f64>,
    #[serde(rename = "notas", default)]
    #[validate(length(max = 500, message = "Notes cannot exceed 500 characters"), custom(function = "validation::no_nul_chars"))]
    pub notes: Option<String>,
    #[serde(rename = "orden", default = "default_order")]
    #[validate(range(min = 1, message = "Order must be at least 1"))]
    pub order: i32,
}

/// Create routine request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoutineRequest {
    #[serde(rename = "nombre")]
    #[validate(
        length(min = 1, max = 120, message = "Routine name must be between 1 and 120 characters"),
        custom(function = "validation::no_nul_chars")
    )]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"), custom(function = "validation::no_nul_chars"))]
    pub description: Option<String>,
    #[serde(rename = "ejercicios", default)]
    #[validate(nested)]
    pub exercises: Vec<ExerciseInput>,
}

/// Partial routine update
///
/// `description` distinguishes an absent field (`None`, left unchanged) from
/// an explicit `null` (`Some(None)`, cleared).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRoutineRequest {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, max = 120, message = "Routine name must be between 1 and 120 characters"),
        custom(function = "validation::no_nul_chars")
    )]
    pub name: Option<String>,
    #[serde(
        rename = "descripcion",
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"), custom(function = "validation::no_nul_chars"))]
    pub description: Option<Option<String>>,
    #[serde(rename = "ejercicios", default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub exercises: Option<Vec<ExerciseInput>>,
}

/// Duplicate routine request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DuplicateRoutineRequest {
    #[serde(rename = "nombre")]
    #[validate(
        length(min = 1, max = 120, message = "Routine name must be between 1 and 120 characters"),
        custom(function = "validation::no_nul_chars")
    )]
    pub name: String,
}

/// Routine list query
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RoutineListQuery {
    #[serde(default)]
    #[validate(custom(function = "validation::no_nul_chars"))]
    pub search: Option<String>,
    #[serde(rename = "dia_semana", default)]
    pub day_of_week: Option<DayOfWeek>,
    #[serde(default)]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 1, max = 50, message = "Page size must be between 1 and 50"))]
    pub page_size: Option<i64>,
}

impl RoutineListQuery {
    /// Page number, 1-indexed
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Rows to skip for the requested page
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }

    /// Trimmed search term, `None` when empty
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Exercise response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub id: i64,
    #[serde(rename = "rutina_id")]
    pub routine_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "dia_semana")]
    pub day_of_week: DayOfWeek,
    #[serde(rename = "series")]
    pub sets: i32,
    #[serde(rename = "repeticiones")]
    pub reps: i32,
    #[serde(rename = "peso")]
    pub weight: Option<f64>,
    #[serde(rename = "notas")]
    pub notes: Option<String>,
    #[serde(rename = "orden")]
    pub order: i32,
}

/// Routine response with its exercises
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineResponse {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "ejercicios")]
    pub exercises: Vec<ExerciseResponse>,
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, page_size: i64) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            total_pages: total_pages(total, page_size),
        }
    }
}

/// `ceil(total / page_size)`, or 0 when there is nothing to page
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// Wraps any present value (including `null`) in `Some`
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

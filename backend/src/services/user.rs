//! User service for registration and login
//!
//! # Performance Optimizations
//!
//! - Password hashing/verification runs on blocking thread pool
//! - JWT service is passed by reference (pre-computed keys)

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{UserRecord, UserRepository};
use gym_routines_shared::{AuthError, LoginRequest, RegisterRequest, TokenResponse, UserResponse};
use sqlx::PgPool;
use tracing::{info, warn};

const EMAIL_TAKEN: &str = "Email already registered";

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user
    ///
    /// Input is already validated. A duplicate email is detected by the
    /// unique constraint when the insert commits.
    pub async fn register(
        pool: &PgPool,
        passwords: PasswordService,
        req: RegisterRequest,
    ) -> Result<UserResponse, ApiError> {
        info!(email = %req.email, "Registering new user");

        let password_hash = passwords.hash_async(req.password).await?;

        let user = UserRepository::create(pool, &req.name, &req.email, &password_hash)
            .await
            .map_err(|e| {
                let err = ApiError::from_repository(e, EMAIL_TAKEN);
                if matches!(err, ApiError::Conflict(_)) {
                    warn!(email = %req.email, "Registration attempted with existing email");
                }
                err
            })?;

        info!(user_id = user.id, "User registered");
        Ok(Self::to_response(user))
    }

    /// Login with email and password
    ///
    /// Unknown email and wrong password fail with the same error.
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        req: LoginRequest,
    ) -> Result<TokenResponse, ApiError> {
        let Some(user) = UserRepository::find_by_email(pool, &req.email).await? else {
            warn!(email = %req.email, "Invalid credentials");
            return Err(AuthError::InvalidCredentials.into());
        };

        let valid = PasswordService::verify_async(req.password, user.password_hash).await?;
        if !valid {
            warn!(email = %req.email, "Invalid credentials");
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = jwt_service.issue_token(user.id)?;

        info!(user_id = user.id, "Login successful");
        Ok(TokenResponse::bearer(access_token))
    }

    /// Public view of a user record
    pub fn to_response(user: UserRecord) -> UserResponse {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

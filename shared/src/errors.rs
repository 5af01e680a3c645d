//! Error types for the Gym Routines application

use thiserror::Error;

/// Authentication error types
///
/// The display strings are returned to clients verbatim, so they must not
/// reveal which credential check failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Not authenticated")]
    MissingToken,

    #[error("User not found")]
    UserNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(AuthError::MissingToken.to_string(), "Not authenticated");
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid token");
        assert_eq!(AuthError::UserNotFound.to_string(), "User not found");
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}

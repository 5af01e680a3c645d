//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the HTTP layer.

pub mod routine;
pub mod user;

pub use routine::RoutineService;
pub use user::UserService;

// holiflow-service/src/models/mod.rs
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde::{Deserialize, Serialize};

pub mod user;
pub use user::*;

pub mod team;
pub use team::*;

pub mod invitations;
pub use invitations::*;

pub mod vacation;
pub use vacation::*;

pub mod notification;
pub use notification::*;

pub mod access_log;
pub use access_log::*;

pub mod holiday;
pub use holiday::*;

// User models for authentication
#[derive(Serialize, Deserialize, Debug)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

// JWT claims structure for authentication
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub email: String,
    pub role: Role,
    pub exp: usize,   // Expiration time
    pub iat: usize,   // Issued at
}

// Custom error types
#[derive(Debug, Display, PartialEq)]
pub enum ServiceError {
    #[display(fmt = "Internal Server Error")]
    InternalServerError,
    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),
    #[display(fmt = "Unauthorized")]
    Unauthorized,
    #[display(fmt = "Not Found")]
    NotFound,
    #[display(fmt = "Forbidden")]
    Forbidden,
    #[display(fmt = "Conflict: {}", _0)]
    Conflict(String),
}

impl std::error::Error for ServiceError {}

impl From<RuleViolation> for ServiceError {
    fn from(violation: RuleViolation) -> Self {
        ServiceError::BadRequest(violation.to_string())
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError =>
                HttpResponse::InternalServerError().json("Internal Server Error"),
            ServiceError::BadRequest(ref message) =>
                HttpResponse::BadRequest().json(message),
            ServiceError::Unauthorized =>
                HttpResponse::Unauthorized().json("Unauthorized"),
            ServiceError::NotFound =>
                HttpResponse::NotFound().json("Not Found"),
            ServiceError::Forbidden =>
                HttpResponse::Forbidden().json("Forbidden: You don't have permission to access this resource"),
            ServiceError::Conflict(ref message) =>
                HttpResponse::Conflict().json(message),
        }
    }
}

use diesel::result::Error as DieselError;
use thiserror::Error;

/// Every failure a request can end in. Conversions live in
/// `features::errors::error_conversions`, HTTP rendering in
/// `features::errors::error_responses`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Conflicting concurrent update: {0}")]
    Conflict(String),
    #[error("Database error")]
    DatabaseError(DieselError),
    #[error("Connection pool error")]
    PoolError(r2d2::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn student_not_found(student_id: &str) -> Self {
        ApiError::NotFound {
            entity: "Student",
            id: student_id.to_string(),
        }
    }

    pub fn card_not_found(card_id: i32) -> Self {
        ApiError::NotFound {
            entity: "Card",
            id: card_id.to_string(),
        }
    }

    pub fn log_not_found(log_id: i32) -> Self {
        ApiError::NotFound {
            entity: "Log",
            id: log_id.to_string(),
        }
    }
}

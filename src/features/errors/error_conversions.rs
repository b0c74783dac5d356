use axum::extract::rejection::JsonRejection;
use diesel::result::Error as DieselError;
use tokio::task::JoinError;
use validator::ValidationErrors;

use crate::data::models::ApiError;

/// SQLite reports an exhausted `busy_timeout` as a plain database error.
fn is_lock_contention(message: &str) -> bool {
    message.contains("database is locked") || message.contains("database table is locked")
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> Self {
        if let DieselError::DatabaseError(_, info) = &err {
            if is_lock_contention(info.message()) {
                return ApiError::Conflict(info.message().to_string());
            }
        }
        ApiError::DatabaseError(err)
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> Self {
        ApiError::PoolError(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        ApiError::Internal(format!("blocking task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};

    #[derive(Debug)]
    struct Info(&'static str);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[test]
    fn busy_database_becomes_conflict() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new(Info("database is locked")),
        );
        assert!(matches!(ApiError::from(err), ApiError::Conflict(_)));
    }

    #[test]
    fn other_database_errors_stay_database_errors() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new(Info("CHECK constraint failed")),
        );
        assert!(matches!(ApiError::from(err), ApiError::DatabaseError(_)));
        assert!(matches!(
            ApiError::from(DieselError::NotFound),
            ApiError::DatabaseError(_)
        ));
    }
}

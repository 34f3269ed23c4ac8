use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use std::fmt;

use crate::services::employee::ServiceError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    DatabaseError(String),
    CryptoError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::CryptoError(msg) => write!(f, "Crypto Error: {}", msg),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(err) => AppError::BadRequest(err.to_string()),
            ServiceError::NotFound(id) => AppError::NotFound(format!("Employee {} not found", id)),
            ServiceError::Crypto(err) => {
                error!("Stored employee data failed to decrypt: {}", err);
                AppError::CryptoError(err.to_string())
            }
            ServiceError::Persistence(err) => {
                error!("Persistence failure: {}", err);
                AppError::DatabaseError(err.to_string())
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::CryptoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg.clone(),
            // Internal details stay in the logs.
            AppError::DatabaseError(_) | AppError::CryptoError(_) => {
                "Internal server error".to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;
    use crate::utils::crypto::CryptoError;
    use crate::utils::validation::ValidationError;

    #[test]
    fn maps_service_errors_to_status_codes() {
        let cases = [
            (
                ServiceError::Validation(ValidationError::TooManyActivePositions { count: 2 }),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::NotFound(3), StatusCode::NOT_FOUND),
            (ServiceError::Crypto(CryptoError::Decrypt), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ServiceError::Persistence(StoreError::Poisoned("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status_code(), status);
            assert_eq!(app.error_response().status(), status);
        }
    }

    #[test]
    fn validation_message_is_passed_through() {
        let app: AppError =
            ServiceError::Validation(ValidationError::TooManyActivePositions { count: 2 }).into();
        assert!(matches!(
            app,
            AppError::BadRequest(ref msg) if msg.starts_with("Only one active job position")
        ));
    }
}

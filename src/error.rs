use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    measurements::MeasurementError,
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("{message}")]
    Validation {
        message: String,
        missing: Vec<String>,
    },

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<MeasurementError> for AppError {
    fn from(err: MeasurementError) -> Self {
        let message = err.to_string();
        match err {
            MeasurementError::MissingRequiredMeasurement { missing } => AppError::Validation {
                message,
                missing: missing.into_iter().map(str::to_string).collect(),
            },
            MeasurementError::NonIntegerCount { .. } => AppError::BadRequest(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DbError(err) => {
                tracing::error!(error = %err, "database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::OrmError(err) => {
                tracing::error!(error = %err, "orm error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let message = self.to_string();
        let missing = match self {
            AppError::Validation { missing, .. } => Some(missing),
            _ => None,
        };

        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData {
                error: message,
                missing,
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::Category, measurements};

    #[test]
    fn measurement_error_maps_to_validation() {
        let err = measurements::validate(Category::Mirror, Some(80.0), None, None).unwrap_err();
        let app: AppError = err.into();
        match &app {
            AppError::Validation { missing, .. } => assert_eq!(missing, &vec!["width".to_string()]),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            app.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn fractional_count_is_bad_request() {
        let err =
            measurements::validate(Category::Column, Some(110.0), Some(6.5), None).unwrap_err();
        let app: AppError = err.into();
        assert!(matches!(&app, AppError::BadRequest(msg) if msg.contains("sides")));
        assert_eq!(app.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_status() {
        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
    }
}

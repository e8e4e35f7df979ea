//! Error type returned by every handler and extractor, and its JSON envelope.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use marquee_core::error::CoreError;
use serde::Serialize;

const SANITIZED_MESSAGE: &str = "An internal error occurred";

/// PostgreSQL SQLSTATE codes the API distinguishes.
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Handler error: domain failures from [`CoreError`] plus the ones that only
/// exist at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Body missing, malformed, or of the wrong shape.
    #[error("Invalid JSON body: {0}")]
    JsonBody(#[from] JsonRejection),

    /// Unparsable path segment or query string.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Logged in full; the client only sees a generic message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        // Server-side variants mean a route and its extractor disagree.
        if rejection.status().is_server_error() {
            Self::InternalError(rejection.body_text())
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// `{"error": "...", "code": "..."}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Status, machine code and client-facing message of one error.
struct Classified {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Classified {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn internal(detail: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed with an internal error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            SANITIZED_MESSAGE,
        )
    }
}

fn classify_core_error(err: &CoreError) -> Classified {
    match err {
        CoreError::NotFound { .. } | CoreError::NotFoundByKey { .. } => {
            Classified::new(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
        }
        CoreError::Validation(msg) => {
            Classified::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.as_str())
        }
        CoreError::Conflict(msg) => Classified::new(StatusCode::CONFLICT, "CONFLICT", msg.as_str()),
        CoreError::Unauthorized(msg) => {
            Classified::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.as_str())
        }
        CoreError::Forbidden(msg) => {
            Classified::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.as_str())
        }
        CoreError::Internal(msg) => Classified::internal(msg),
    }
}

/// Map a sqlx error onto the envelope.
///
/// Only unique violations on `uq_`-prefixed constraints become 409; other
/// unique indexes are not expected to fire from request data.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    let sqlx::Error::Database(db_err) = err else {
        return match err {
            sqlx::Error::RowNotFound => {
                Classified::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
            }
            other => Classified::internal(other),
        };
    };

    match (db_err.code().as_deref(), db_err.constraint()) {
        (Some(PG_UNIQUE_VIOLATION), Some(constraint)) if constraint.starts_with("uq_") => {
            Classified::new(
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            )
        }
        (Some(PG_FOREIGN_KEY_VIOLATION), _) => Classified::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Referenced resource does not exist",
        ),
        _ => Classified::internal(db_err),
    }
}

/// Whether `err` is a unique violation on the named constraint.
///
/// Handlers use this to report races on natural keys the same way as the
/// pre-insert check does.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION)
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

impl AppError {
    fn classify(&self) -> Classified {
        match self {
            Self::Core(core) => classify_core_error(core),
            Self::Database(err) => classify_sqlx_error(err),
            // Content-type problems keep their 415; everything else about the
            // body is a plain 400.
            Self::JsonBody(rejection) => {
                let status = match rejection.status() {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    _ => StatusCode::BAD_REQUEST,
                };
                Classified::new(status, "BAD_REQUEST", rejection.body_text())
            }
            Self::BadRequest(msg) => {
                Classified::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.as_str())
            }
            Self::InternalError(msg) => Classified::internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Classified {
            status,
            code,
            message,
        } = self.classify();
        let body = ErrorBody {
            error: message,
            code,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn every_core_variant_has_a_status() {
        let cases = [
            (CoreError::NotFound { entity: "Title", id: 3 }, StatusCode::NOT_FOUND),
            (
                CoreError::NotFoundByKey {
                    entity: "Category",
                    key: "films".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (CoreError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (CoreError::Conflict("dup".into()), StatusCode::CONFLICT),
            (CoreError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (CoreError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (
                CoreError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(status_of(err.into()), expected);
        }
    }

    #[test]
    fn row_not_found_is_404() {
        assert_eq!(
            status_of(AppError::Database(sqlx::Error::RowNotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn pool_timeout_is_sanitized() {
        let classified = classify_sqlx_error(&sqlx::Error::PoolTimedOut);
        assert_eq!(classified.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(classified.code, "INTERNAL_ERROR");
        assert_eq!(classified.message, SANITIZED_MESSAGE);
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(
            &sqlx::Error::RowNotFound,
            "uq_reviews_title_author"
        ));
    }

    #[test]
    fn bad_request_is_400() {
        assert_eq!(
            status_of(AppError::BadRequest("nope".into())),
            StatusCode::BAD_REQUEST
        );
    }
}

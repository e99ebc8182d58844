//! Error handling for SHELF HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shelf_db::StoreError;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::{NoContext, Timestamp, Uuid};

/// Standard error envelope for all HTTP errors
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub details: Vec<serde_json::Value>,
    pub message: String,
    pub code: String,
    pub trace_id: String,
    pub timestamp: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("query failed: {0}")]
    QueryFailed(#[source] StoreError),

    #[error("request exceeded {timeout_ms} ms")]
    TimedOut { timeout_ms: u64 },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::StoreUnavailable(_) | AppError::TimedOut { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::QueryFailed(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::QueryFailed(_) => "query_failed",
            AppError::TimedOut { .. } => "request_timeout",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Message shown to clients. Store diagnostics stay in the logs.
    fn public_message(&self) -> &'static str {
        match self {
            AppError::StoreUnavailable(_) => "The book store is currently unavailable",
            AppError::QueryFailed(_) => "The book store could not be read",
            AppError::TimedOut { .. } => "The request took too long to complete",
            AppError::Internal(_) => "An internal server error occurred",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable { .. } => AppError::StoreUnavailable(err),
            StoreError::QueryFailed(_) => AppError::QueryFailed(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v7(Timestamp::now(NoContext));
        let timestamp = OffsetDateTime::now_utc().to_string();
        let status = self.status();

        tracing::error!(
            error_id = %error_id,
            error_code = %self.code(),
            status_code = %status.as_u16(),
            cause = %self,
            "Request error"
        );

        let envelope = ErrorEnvelope {
            error: ErrorBody {
                details: Vec::new(),
                message: self.public_message().to_string(),
                code: self.code().to_string(),
                trace_id: error_id.to_string(),
                timestamp,
            },
        };

        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn unavailable() -> StoreError {
        StoreError::Unavailable {
            path: PathBuf::from("/srv/missing.sqlite3"),
            source: rusqlite_error(),
        }
    }

    fn rusqlite_error() -> shelf_db::rusqlite::Error {
        shelf_db::rusqlite::Error::QueryReturnedNoRows
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn store_errors_keep_their_kind() {
        assert!(matches!(
            AppError::from(unavailable()),
            AppError::StoreUnavailable(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::QueryFailed(rusqlite_error())),
            AppError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_error_response_mapping() {
        let response = AppError::from(unavailable()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = AppError::from(StoreError::QueryFailed(rusqlite_error())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn timeout_is_a_server_error() {
        let error = AppError::TimedOut { timeout_ms: 15000 };
        assert_eq!(error.code(), "request_timeout");
        assert_eq!(error.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_error_mapping() {
        let internal_error = anyhow::anyhow!("worker thread vanished");
        let response = AppError::Internal(internal_error).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_response_format() {
        let response = AppError::from(unavailable()).into_response();
        let body = body_json(response).await;

        assert_eq!(body["error"]["code"], "store_unavailable");
        assert_eq!(
            body["error"]["message"],
            "The book store is currently unavailable"
        );
        assert_eq!(body["error"]["details"], serde_json::json!([]));
        let trace_id = body["error"]["trace_id"].as_str().unwrap();
        assert!(Uuid::parse_str(trace_id).is_ok());
        assert!(body["error"]["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn store_path_is_not_leaked_to_clients() {
        let body = body_json(AppError::from(unavailable()).into_response()).await;
        assert!(!body.to_string().contains("missing.sqlite3"));
    }
}

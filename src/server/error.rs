use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Every failure a handler can report. The client only ever sees the status
/// code and the fixed message for it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable")]
    Unprocessable,
    #[error("internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        tracing::error!("Storage error: {}", error);
        ApiError::Unprocessable
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        ApiError::Unprocessable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn error_bodies_follow_fixed_table() {
        let cases = [
            (ApiError::BadRequest, 400, "bad request"),
            (ApiError::NotFound, 404, "resource not found"),
            (ApiError::MethodNotAllowed, 405, "method not allowed"),
            (ApiError::Unprocessable, 422, "unprocessable"),
            (ApiError::Internal, 500, "internal server error"),
        ];
        for (error, code, message) in cases {
            let (status, body) = body_of(error).await;
            assert_eq!(status.as_u16(), code);
            assert_eq!(
                body,
                serde_json::json!({"success": false, "error": code, "message": message})
            );
        }
    }

    #[test]
    fn storage_errors_are_unprocessable() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

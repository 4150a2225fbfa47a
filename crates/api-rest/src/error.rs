//! Mapping from storage and request failures to HTTP responses.
//!
//! Every failure is rendered as a [`BaseResponse`] with `data: null` and a single
//! [`ResponseException`] describing the problem.

use api_shared::{BaseResponse, ResponseException};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use filestore_core::FilesError;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

/// Errors a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Files(#[from] FilesError),

    #[error("request is not multipart: {0}")]
    NotMultipart(#[from] MultipartRejection),

    #[error("failed to read multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("no file part in request")]
    MissingFile,

    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid query string: {0}")]
    InvalidQuery(#[from] QueryRejection),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("no such endpoint")]
    ResourceNotFound,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Files(err) => match err {
                FilesError::InvalidName(_)
                | FilesError::InvalidInput(_)
                | FilesError::NameMismatch { .. }
                | FilesError::InvalidPattern { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.to_string())
                }
                FilesError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "FILE_NOT_FOUND",
                    "The requested file was not found.".into(),
                ),
                FilesError::InvalidRootDirectory(_) | FilesError::Io(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "APPLICATION_ERROR",
                    GENERIC_FAILURE.into(),
                ),
            },
            ApiError::NotMultipart(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_MULTIPART_REQUEST",
                "Expected a file upload, but the request was not multipart. Make sure you're sending 'multipart/form-data'.".into(),
            ),
            ApiError::Multipart(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "The uploaded file exceeds the maximum allowed size.".into(),
            ),
            ApiError::Multipart(err) => (
                StatusCode::BAD_REQUEST,
                "INVALID_MULTIPART_REQUEST",
                err.body_text(),
            ),
            ApiError::MissingFile => (
                StatusCode::BAD_REQUEST,
                "MISSING_FILE",
                "No file was uploaded. Make sure your request includes a 'file' field.".into(),
            ),
            ApiError::MissingParameter(name) => (
                StatusCode::BAD_REQUEST,
                "MISSING_PARAMETER",
                format!("Missing required parameter: {}.", name),
            ),
            ApiError::InvalidQuery(rejection) => (
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST",
                rejection.body_text(),
            ),
            ApiError::ResourceNotFound => (
                StatusCode::NOT_FOUND,
                "RESOURCE_NOT_FOUND",
                "This endpoint does not exist. Check the URL and try again.".into(),
            ),
            ApiError::Task(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "APPLICATION_ERROR",
                GENERIC_FAILURE.into(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
        } else {
            tracing::warn!("request rejected ({}): {}", code, self);
        }

        let body = BaseResponse::<String>::failure(vec![ResponseException::new(code, message)]);
        (status, Json(body)).into_response()
    }
}

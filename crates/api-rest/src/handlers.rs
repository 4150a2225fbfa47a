//! Request handlers for the `/files` routes and `/health`.

use crate::{ApiError, AppState};
use api_shared::{BaseResponse, BaseResponseMetadata, GetFileResponse, HealthRes, HealthService};
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use filestore_core::{FilesError, DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Multipart form accepted by upload and update.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Query string for `/files/search`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Pattern that must match the whole file name
    regex: Option<String>,
    /// Zero-based page index (default 0)
    page: Option<i64>,
    /// Page size (default 10)
    size: Option<i64>,
}

/// The `file` part of a multipart request.
struct FilePart {
    file_name: Option<String>,
    content: Bytes,
}

async fn read_file_part(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<FilePart, ApiError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(str::to_owned);
            let content = field.bytes().await?;
            return Ok(FilePart { file_name, content });
        }
    }
    Err(ApiError::MissingFile)
}

/// Runs a storage call on the blocking pool.
async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, FilesError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(task).await??)
}

/// Answers requests for unknown paths and unsupported methods.
pub async fn not_found() -> ApiError {
    ApiError::ResourceNotFound
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/files/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Storage path of the file", body = api_shared::PathResponse),
        (status = 400, description = "Invalid name or malformed upload", body = api_shared::PathResponse),
        (status = 500, description = "Internal server error", body = api_shared::PathResponse)
    )
)]
/// Upload a new file
///
/// The file is stored under the name it was uploaded with. If a file with that name is
/// already stored, its content is kept and the existing path is returned.
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BaseResponse<String>>, ApiError> {
    let part = read_file_part(multipart).await?;
    let name = part.file_name.unwrap_or_default();
    tracing::info!("upload_file: fileName={}", name);

    let files = state.files.clone();
    let stored = run_blocking(move || files.save(&name, &part.content[..])).await?;

    Ok(Json(BaseResponse::ok(stored.into_string())))
}

#[utoipa::path(
    put,
    path = "/files/update/{file_name}",
    params(("file_name" = String, Path, description = "Name of the stored file")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Storage path of the file", body = api_shared::PathResponse),
        (status = 400, description = "Invalid name or name mismatch", body = api_shared::PathResponse),
        (status = 404, description = "File not found", body = api_shared::PathResponse),
        (status = 500, description = "Internal server error", body = api_shared::PathResponse)
    )
)]
/// Replace the content of an existing file
pub async fn update_file(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BaseResponse<String>>, ApiError> {
    tracing::info!("update_file: fileName={}", file_name);
    let part = read_file_part(multipart).await?;

    let files = state.files.clone();
    let stored = run_blocking(move || {
        files.update(&file_name, &part.content[..], part.file_name.as_deref())
    })
    .await?;

    Ok(Json(BaseResponse::ok(stored.into_string())))
}

#[utoipa::path(
    get,
    path = "/files/download/{file_name}",
    params(("file_name" = String, Path, description = "Name of the stored file")),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = api_shared::PathResponse)
    )
)]
/// Download a file as an attachment
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, ApiError> {
    tracing::info!("download_file: fileName={}", file_name);

    let files = state.files.clone();
    let lookup = file_name.clone();
    let path = run_blocking(move || files.retrieve(&lookup)).await?;
    let content = tokio::fs::read(&path).await.map_err(FilesError::Io)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        content,
    )
        .into_response())
}

#[utoipa::path(
    delete,
    path = "/files/delete/{file_name}",
    params(("file_name" = String, Path, description = "Name of the stored file")),
    responses(
        (status = 200, description = "File deleted", body = api_shared::PathResponse),
        (status = 404, description = "File not found", body = api_shared::PathResponse),
        (status = 500, description = "Internal server error", body = api_shared::PathResponse)
    )
)]
/// Delete a file
pub async fn delete_file(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Json<BaseResponse<String>>, ApiError> {
    tracing::info!("delete_file: fileName={}", file_name);

    let files = state.files.clone();
    let lookup = file_name.clone();
    let removed = run_blocking(move || files.delete(&lookup)).await?;
    if !removed {
        tracing::debug!("delete_file: {} was already gone", file_name);
    }

    Ok(Json(BaseResponse::ok(format!("File deleted: {}", file_name))))
}

#[utoipa::path(
    get,
    path = "/files/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching files and pagination", body = api_shared::SearchResponse),
        (status = 400, description = "Missing or invalid parameters", body = api_shared::PathResponse),
        (status = 500, description = "Internal server error", body = api_shared::PathResponse)
    )
)]
/// List stored files whose name fully matches a regular expression
pub async fn search_files(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<BaseResponseMetadata<GetFileResponse>>, ApiError> {
    let Query(params) = params?;
    let regex = params.regex.ok_or(ApiError::MissingParameter("regex"))?;
    let page = params.page.unwrap_or(0);
    let size = params.size.unwrap_or(DEFAULT_PAGE_SIZE);
    tracing::info!("search_files: regex={}, page={}, size={}", regex, page, size);

    let files = state.files.clone();
    let listing = run_blocking(move || files.list_matching(&regex, page, size)).await?;

    Ok(Json(BaseResponseMetadata::from(listing)))
}

#[utoipa::path(
    get,
    path = "/files/count",
    responses(
        (status = 200, description = "Number of stored files", body = api_shared::CountResponse),
        (status = 500, description = "Internal server error", body = api_shared::PathResponse)
    )
)]
/// Count every stored file
pub async fn count_files(
    State(state): State<AppState>,
) -> Result<Json<BaseResponse<u64>>, ApiError> {
    tracing::info!("count_files");

    let files = state.files.clone();
    let count = run_blocking(move || files.count_all()).await?;

    Ok(Json(BaseResponse::ok(count)))
}

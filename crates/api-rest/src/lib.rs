//! # API REST
//!
//! REST API implementation for the file storage service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (multipart uploads, JSON envelopes, CORS, body limits)
//!
//! Storage work is delegated to [`FilesService`] and runs on tokio's blocking pool so
//! directory scans never stall the async workers.

#![warn(rust_2018_idioms)]

mod error;
mod handlers;

pub use error::ApiError;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put, MethodRouter};
use axum::Router;
use filestore_core::FilesService;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub files: Arc<FilesService>,
}

impl AppState {
    pub fn new(files: FilesService) -> Self {
        Self {
            files: Arc::new(files),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::upload_file,
        handlers::update_file,
        handlers::download_file,
        handlers::delete_file,
        handlers::search_files,
        handlers::count_files,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::PathResponse,
        api_shared::CountResponse,
        api_shared::SearchResponse,
        api_shared::GetFileResponse,
        api_shared::FileDto,
        api_shared::Metadata,
        api_shared::BasePagination,
        api_shared::ResponseException,
        handlers::UploadForm,
    ))
)]
pub struct ApiDoc;

/// Unsupported methods on a known path get the same answer as an unknown path.
fn only(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.fallback(handlers::not_found)
}

/// Builds the application router.
///
/// `max_upload_bytes` bounds every request body, which in practice limits uploads.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", only(get(handlers::health)))
        .route("/files/upload", only(post(handlers::upload_file)))
        .route("/files/update/:file_name", only(put(handlers::update_file)))
        .route("/files/download/:file_name", only(get(handlers::download_file)))
        .route("/files/delete/:file_name", only(delete(handlers::delete_file)))
        .route("/files/search", only(get(handlers::search_files)))
        .route("/files/count", only(get(handlers::count_files)))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "filestore-test-boundary";

    fn test_app(temp: &TempDir, max_upload_bytes: usize) -> Router {
        let root = temp.path().join("data-storage");
        std::fs::create_dir_all(&root).unwrap();
        let files = FilesService::new(&root).unwrap();
        router(AppState::new(files), max_upload_bytes)
    }

    fn multipart_request(method: &str, uri: &str, field: &str, file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn upload(file_name: &str, content: &str) -> Request<Body> {
        multipart_request("POST", "/files/upload", "file", file_name, content)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn text_body(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let response = send(&app, get("/health")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["ok"], true);
    }

    #[tokio::test]
    async fn upload_then_download() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let response = send(&app, upload("a.txt", "hello")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["data"].as_str().unwrap().ends_with("data-storage/18/a.txt"));
        assert!(body["exceptions"].is_null());

        let response = send(&app, get("/files/download/a.txt")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"a.txt\""
        );
        assert_eq!(text_body(response).await, "hello");
    }

    #[tokio::test]
    async fn duplicate_upload_keeps_first_content() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        send(&app, upload("a.txt", "X")).await;
        let response = send(&app, upload("a.txt", "Y")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, get("/files/download/a.txt")).await;
        assert_eq!(text_body(response).await, "X");
    }

    #[tokio::test]
    async fn upload_invalid_name_is_bad_request() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let response = send(&app, upload("bad name.txt", "x")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["data"].is_null());
        assert_eq!(body["exceptions"][0]["errorCode"], "INVALID_REQUEST");
        assert_eq!(
            body["exceptions"][0]["exceptionMessage"],
            "Invalid file name: bad name.txt"
        );
    }

    #[tokio::test]
    async fn upload_without_multipart_is_rejected() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let request = Request::builder()
            .method("POST")
            .uri("/files/upload")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["exceptions"][0]["errorCode"],
            "INVALID_MULTIPART_REQUEST"
        );
    }

    #[tokio::test]
    async fn upload_without_file_part_is_rejected() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let request = multipart_request("POST", "/files/upload", "attachment", "a.txt", "x");
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["exceptions"][0]["errorCode"],
            "MISSING_FILE"
        );
    }

    #[tokio::test]
    async fn upload_over_limit_is_rejected() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 64);

        let response = send(&app, upload("big.bin", &"x".repeat(4096))).await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            json_body(response).await["exceptions"][0]["errorCode"],
            "PAYLOAD_TOO_LARGE"
        );
        let count = json_body(send(&app, get("/files/count")).await).await;
        assert_eq!(count["data"], 0);
    }

    #[tokio::test]
    async fn update_replaces_content() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);
        send(&app, upload("a.txt", "X")).await;

        let request = multipart_request("PUT", "/files/update/a.txt", "file", "a.txt", "Z");
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, get("/files/download/a.txt")).await;
        assert_eq!(text_body(response).await, "Z");

        let count = json_body(send(&app, get("/files/count")).await).await;
        assert_eq!(count["data"], 1);
    }

    #[tokio::test]
    async fn update_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let request = multipart_request("PUT", "/files/update/a.txt", "file", "a.txt", "Z");
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await["exceptions"][0]["errorCode"],
            "FILE_NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn update_with_other_name_is_rejected() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);
        send(&app, upload("a.txt", "X")).await;

        let request = multipart_request("PUT", "/files/update/a.txt", "file", "b.txt", "Z");
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["exceptions"][0]["exceptionMessage"],
            "File name mismatch: expected 'a.txt', but received 'b.txt'."
        );
    }

    #[tokio::test]
    async fn delete_then_download_is_not_found() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);
        send(&app, upload("a.txt", "X")).await;

        let request = Request::builder()
            .method("DELETE")
            .uri("/files/delete/a.txt")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"], "File deleted: a.txt");

        let response = send(&app, get("/files/download/a.txt")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_returns_page_and_metadata() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);
        send(&app, upload("b2.txt", "2")).await;
        send(&app, upload("a1.txt", "1")).await;

        let response = send(&app, get("/files/search?regex=.*&page=0&size=10")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["files"][0]["fileName"], "a1.txt");
        assert_eq!(body["data"]["files"][1]["fileName"], "b2.txt");
        assert_eq!(body["metadata"]["pagination"]["totalRecords"], 2);
        assert_eq!(body["metadata"]["pagination"]["page"], 0);
        assert_eq!(body["metadata"]["pagination"]["size"], 10);
    }

    #[tokio::test]
    async fn search_uses_default_paging() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let body = json_body(send(&app, get("/files/search?regex=nomatch")).await).await;

        assert_eq!(body["data"]["files"].as_array().unwrap().len(), 0);
        assert_eq!(body["metadata"]["pagination"]["totalRecords"], 0);
        assert_eq!(body["metadata"]["pagination"]["size"], 10);
    }

    #[tokio::test]
    async fn search_with_invalid_regex_is_bad_request() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let response = send(&app, get("/files/search?regex=%5B")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["exceptions"][0]["exceptionMessage"],
            "Invalid regex pattern: ["
        );
    }

    #[tokio::test]
    async fn search_without_regex_is_missing_parameter() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let response = send(&app, get("/files/search?page=1")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["exceptions"][0]["errorCode"],
            "MISSING_PARAMETER"
        );
    }

    #[tokio::test]
    async fn search_with_non_numeric_page_is_bad_request() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let response = send(&app, get("/files/search?regex=.*&page=first")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["exceptions"][0]["errorCode"],
            "INVALID_REQUEST"
        );
    }

    #[tokio::test]
    async fn unknown_path_is_resource_not_found() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let response = send(&app, get("/files/nope")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert!(body["data"].is_null());
        assert_eq!(body["exceptions"][0]["errorCode"], "RESOURCE_NOT_FOUND");
        assert_eq!(
            body["exceptions"][0]["exceptionMessage"],
            "This endpoint does not exist. Check the URL and try again."
        );
    }

    #[tokio::test]
    async fn unsupported_method_is_resource_not_found() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);

        let request = Request::builder()
            .method("POST")
            .uri("/files/count")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await["exceptions"][0]["errorCode"],
            "RESOURCE_NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn count_reports_stored_files() {
        let temp = TempDir::new().unwrap();
        let app = test_app(&temp, 1024);
        send(&app, upload("a1.txt", "1")).await;
        send(&app, upload("b2.txt", "2")).await;

        let response = send(&app, get("/files/count")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"], 2);
    }
}

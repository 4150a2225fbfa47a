//! JSON response envelopes.
//!
//! Every endpoint (except downloads) answers with one of two envelopes:
//!
//! ```text
//! BaseResponse          { "data": ..., "exceptions": [...] | null }
//! BaseResponseMetadata  { "data": ..., "metadata": { "pagination": {...} }, "exceptions": ... }
//! ```
//!
//! On success `exceptions` is `null`; on failure `data` is `null` and `exceptions` holds
//! one entry describing the error.

use filestore_files::{FileDescriptor, ListingPage};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard envelope for single-value responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[aliases(PathResponse = BaseResponse<String>, CountResponse = BaseResponse<u64>)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T> {
    pub data: Option<T>,
    pub exceptions: Option<Vec<ResponseException>>,
}

impl<T> BaseResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            exceptions: None,
        }
    }

    pub fn failure(exceptions: Vec<ResponseException>) -> Self {
        Self {
            data: None,
            exceptions: Some(exceptions),
        }
    }
}

/// Envelope for paginated responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[aliases(SearchResponse = BaseResponseMetadata<GetFileResponse>)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponseMetadata<T> {
    pub data: Option<T>,
    pub metadata: Option<Metadata>,
    pub exceptions: Option<Vec<ResponseException>>,
}

/// Pagination metadata wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Metadata {
    pub pagination: BasePagination,
}

impl Metadata {
    pub fn new(total_records: u64, page: i64, size: i64) -> Self {
        Self {
            pagination: BasePagination {
                total_records,
                page,
                size,
            },
        }
    }
}

/// Total number of matches plus the page that was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BasePagination {
    pub total_records: u64,
    pub page: i64,
    pub size: i64,
}

/// A single error entry.
///
/// `exception_source` repeats the error code so older clients that key on it keep
/// working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseException {
    pub error_code: String,
    pub exception_source: String,
    pub exception_message: String,
}

impl ResponseException {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            exception_source: code.clone(),
            error_code: code,
            exception_message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileDto {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GetFileResponse {
    pub files: Vec<FileDto>,
}

impl From<FileDescriptor> for FileDto {
    fn from(descriptor: FileDescriptor) -> Self {
        Self {
            file_name: descriptor.name,
        }
    }
}

impl From<ListingPage> for BaseResponseMetadata<GetFileResponse> {
    fn from(page: ListingPage) -> Self {
        Self {
            data: Some(GetFileResponse {
                files: page.files.into_iter().map(FileDto::from).collect(),
            }),
            metadata: Some(Metadata::new(page.total_matching, page.page, page.size)),
            exceptions: None,
        }
    }
}

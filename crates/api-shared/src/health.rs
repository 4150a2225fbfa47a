use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness payload returned by `/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service for API front ends
///
/// Reports liveness only; it does not touch the storage root.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "File storage service is alive".into(),
        }
    }
}

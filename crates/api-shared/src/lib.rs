//! # API Shared
//!
//! Shared response types for the file storage APIs.
//!
//! Contains:
//! - JSON response envelopes (`models` module) with camelCase field names
//! - Shared services like `HealthService`
//!
//! Used by `api-rest`; kept separate so other front ends can produce identical payloads.

pub mod health;
pub mod models;

pub use health::{HealthRes, HealthService};
pub use models::*;

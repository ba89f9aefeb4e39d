//! HTTP API module for the workload engine.
//!
//! This module provides the REST endpoint that runs a workload batch over
//! course rows posted as JSON.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::WorkloadRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;

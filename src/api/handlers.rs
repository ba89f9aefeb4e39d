//! HTTP request handlers for the workload engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::WorkloadReport;

use super::request::WorkloadRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/workload", post(workload_handler))
        .with_state(state)
}

/// Handler for POST /workload endpoint.
///
/// Runs one workload batch over the posted rows and returns the report.
async fn workload_handler(
    State(state): State<AppState>,
    payload: Result<Json<WorkloadRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing workload request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::missing_content_type(),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return ApiErrorResponse::bad_request(error)
                .for_request(correlation_id)
                .into_response();
        }
    };

    let (run, records) = match request.into_run(state.config()) {
        Ok(resolved) => resolved,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Rejected workload request");
            return error_response(err, correlation_id);
        }
    };

    let mode = run.mode;
    let row_count = records.len();
    // The batch is CPU-bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || run.run(records))
        .await
        .unwrap_or_else(|join_error| {
            Err(EngineError::CalculationError {
                message: format!("workload run did not complete: {}", join_error),
            })
        });

    match outcome {
        Ok(report) => {
            log_report(correlation_id, &report);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(report),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                %mode,
                records = row_count,
                error = %err,
                "Workload run failed"
            );
            error_response(err, correlation_id)
        }
    }
}

fn log_report(correlation_id: Uuid, report: &WorkloadReport) {
    info!(
        correlation_id = %correlation_id,
        run_id = %report.run_id,
        records = report.records_processed,
        faculty = report.faculty.len(),
        unclassified = report.unclassified.len(),
        duration_us = report.audit_trace.duration_us,
        "Workload run completed successfully"
    );
}

fn error_response(err: EngineError, correlation_id: Uuid) -> Response {
    ApiErrorResponse::from(err)
        .for_request(correlation_id)
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use crate::config::{ConfigLoader, InstructorTracks, SpecialCourses, WorkloadPolicy};
    use crate::models::Track;

    fn create_test_state() -> AppState {
        let tracks: InstructorTracks = [(1001, Track::CareerTrack), (1002, Track::TenureTrack)]
            .into_iter()
            .collect();
        AppState::new(ConfigLoader::from_parts(
            WorkloadPolicy::default(),
            tracks,
            SpecialCourses::new(),
        ))
    }

    fn lecture_row(instructor: u64, catalog: &str, enrollment: u32) -> serde_json::Value {
        serde_json::json!({
            "Instructor Role": "PI",
            "Instructor Emplid": instructor,
            "Instructor": format!("Instructor {}", instructor),
            "Course Category (CCAT)": "Lecture",
            "Max Units": 3,
            "Enroll Total": enrollment,
            "Start Date": "2025-01-13",
            "Start Time": "09:10",
            "Facility Building": "SCI",
            "Facility Room": "101",
            "Term": "1251",
            "Subject": "BIO",
            "Cat Nbr": catalog,
            "Section": "001",
            "Unit": "BIO",
            "Class Description": "field ecology"
        })
    }

    async fn post_workload(body: String) -> Response {
        create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/workload")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn read_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_valid_request_returns_report() {
        let body = serde_json::json!({
            "records": [lecture_row(1001, "181", 40)]
        })
        .to_string();

        let response = post_workload(body).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let report: WorkloadReport = read_body(response).await;
        let summary = report.faculty_summary(1001).unwrap();
        assert_eq!(summary.total_load, Decimal::new(999, 2));
        assert_eq!(summary.courses[0], "BIO 181-001 - Field Ecology");
    }

    #[tokio::test]
    async fn test_split_mode_from_request() {
        let body = serde_json::json!({
            "records": [lecture_row(1002, "481", 20), lecture_row(1002, "581", 15)],
            "mode": "split"
        })
        .to_string();

        let response = post_workload(body).await;
        assert_eq!(response.status(), StatusCode::OK);
        let report: WorkloadReport = read_body(response).await;
        assert_eq!(report.adjustment_mode.to_string(), "split");
        assert_eq!(report.faculty_summary(1002).unwrap().total_load, Decimal::new(999, 2));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let response = post_workload("{invalid json".to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
        assert!(error.correlation_id.is_some());
    }

    #[tokio::test]
    async fn test_missing_records_returns_validation_error() {
        let response = post_workload(r#"{"mode": "collapse"}"#.to_string()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("records"));
    }

    #[tokio::test]
    async fn test_unsupported_mode_returns_400() {
        let body = serde_json::json!({
            "records": [lecture_row(1001, "181", 40)],
            "mode": "average"
        })
        .to_string();

        let response = post_workload(body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "UNSUPPORTED_ADJUSTMENT_MODE");
    }
}

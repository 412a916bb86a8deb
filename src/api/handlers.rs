//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{BatchCancellation, compute_employee};
use crate::export::{grid_csv, summary_csv};
use crate::models::{EmployeeOutcome, PayrollReport};

use super::request::PayrollRequest;
use super::response::{ApiError, ApiErrorResponse, AttendanceGrid, PayrollSummary, ShiftEntry};
use super::state::AppState;

type Payload = Result<Json<PayrollRequest>, JsonRejection>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll", post(payroll_handler))
        .route("/payroll/summary", post(summary_handler))
        .route("/payroll/csv", post(payroll_csv_handler))
        .route("/payroll/employee/:employee_id", post(employee_handler))
        .route("/attendance/grid", post(grid_handler))
        .route("/attendance/grid/csv", post(grid_csv_handler))
        .route("/config/shifts", get(list_shifts_handler))
        .route("/config/shifts/:shift_type", get(shift_handler))
        .with_state(state)
}

/// Handler for POST /payroll.
///
/// Returns the full report: every entry with its statuses, weekly buckets
/// and audit steps.
async fn payroll_handler(State(state): State<AppState>, payload: Payload) -> Response {
    match run_report(&state, payload).await {
        Ok(report) => json_response(StatusCode::OK, &report),
        Err(response) => response,
    }
}

/// Handler for POST /payroll/summary.
async fn summary_handler(State(state): State<AppState>, payload: Payload) -> Response {
    match run_report(&state, payload).await {
        Ok(report) => json_response(StatusCode::OK, &PayrollSummary::from(&report)),
        Err(response) => response,
    }
}

/// Handler for POST /payroll/csv.
async fn payroll_csv_handler(State(state): State<AppState>, payload: Payload) -> Response {
    match run_report(&state, payload).await {
        Ok(report) => csv_response(&format!("payroll-{}.csv", report.month), summary_csv(&report)),
        Err(response) => response,
    }
}

/// Handler for POST /attendance/grid.
async fn grid_handler(State(state): State<AppState>, payload: Payload) -> Response {
    match run_report(&state, payload).await {
        Ok(report) => json_response(StatusCode::OK, &AttendanceGrid::from(&report)),
        Err(response) => response,
    }
}

/// Handler for POST /attendance/grid/csv.
async fn grid_csv_handler(State(state): State<AppState>, payload: Payload) -> Response {
    match run_report(&state, payload).await {
        Ok(report) => csv_response(&format!("attendance-{}.csv", report.month), grid_csv(&report)),
        Err(response) => response,
    }
}

/// Handler for POST /payroll/employee/:employee_id.
///
/// Computes a single employee from the submitted records. Responds 404 when
/// the employee is not an active member of the roster, and 422 when their
/// line could not be computed or their ID is on the roster twice.
async fn employee_handler(
    Path(employee_id): Path<String>,
    State(state): State<AppState>,
    payload: Payload,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        employee_id = %employee_id,
        "Processing employee payroll request"
    );

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let (month, input) = match request.into_batch_input() {
        Ok(converted) => converted,
        Err(err) => return engine_error_response(correlation_id, err),
    };
    let records = match input.records_for(month, &employee_id) {
        Ok(records) => records,
        Err(err) => return engine_error_response(correlation_id, err),
    };
    let Some(records) = records else {
        warn!(
            correlation_id = %correlation_id,
            employee_id = %employee_id,
            "Employee not on active roster"
        );
        return json_response(
            StatusCode::NOT_FOUND,
            &ApiError::not_found("Employee", &employee_id),
        );
    };

    let entry = match compute_employee(state.policy(), month, &records) {
        Ok(entry) => entry,
        Err(err) => return engine_error_response(correlation_id, err),
    };
    match &entry.outcome {
        EmployeeOutcome::Computed { line, .. } => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                net_salary = %line.net_salary,
                "Employee payroll computed"
            );
            json_response(StatusCode::OK, &entry)
        }
        EmployeeOutcome::Failed { code, message } => json_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &ApiError::new(code.clone(), message.clone()),
        ),
    }
}

/// Handler for GET /config/shifts.
async fn list_shifts_handler(State(state): State<AppState>) -> Response {
    let shifts: Vec<ShiftEntry> = state
        .policy()
        .shifts
        .shifts
        .iter()
        .map(|(name, rule)| ShiftEntry {
            shift_type: name.clone(),
            overnight: rule.is_overnight(),
            rule: rule.clone(),
        })
        .collect();
    json_response(StatusCode::OK, &shifts)
}

/// Handler for GET /config/shifts/:shift_type.
async fn shift_handler(
    Path(shift_type): Path<String>,
    State(state): State<AppState>,
) -> Response {
    match state.policy().shifts.get(&shift_type) {
        Some(rule) => json_response(
            StatusCode::OK,
            &ShiftEntry {
                shift_type,
                overnight: rule.is_overnight(),
                rule: rule.clone(),
            },
        ),
        None => json_response(
            StatusCode::NOT_FOUND,
            &ApiError::not_found("Shift type", &shift_type),
        ),
    }
}

/// Parses the payload and runs the batch for the requested month.
async fn run_report(state: &AppState, payload: Payload) -> Result<PayrollReport, Response> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return Err(rejection_response(correlation_id, rejection)),
    };
    let (month, input) = request
        .into_batch_input()
        .map_err(|err| engine_error_response(correlation_id, err))?;

    let start_time = Instant::now();
    let report = state
        .batch()
        .run(month, input, &BatchCancellation::new())
        .await
        .map_err(|err| engine_error_response(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        month = %report.month,
        employees = report.totals.total_employees,
        failed = report.totals.failed_employees,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll request completed"
    );
    Ok(report)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
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
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}

fn engine_error_response(correlation_id: Uuid, err: crate::error::EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        code = err.code(),
        error = %err,
        "Payroll request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, &api_error.error)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn csv_response(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

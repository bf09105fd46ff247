//! HTTP request handlers for the rules engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    build_reconciliation, count_effective_days, days_between_inclusive, evaluate_leave_request,
    next_workday, validate_totals,
};
use crate::error::EngineError;
use crate::models::{Employee, HolidaySet, LeaveEvaluation, TotalsReconciliation};

use super::request::{
    InvoiceTotalsRequest, LeaveRequestBody, ValidateTotalsRequest, WorkingDaysRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, ApprovalNotice, InvoiceTotalsResponse, NoticeRecipient,
    WorkingDaysResponse,
};
use super::state::AppState;

/// Header carrying a client-chosen key for retry-safe submissions.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/leave/summary", post(leave_summary_handler))
        .route("/leave/approvals", post(leave_approval_handler))
        .route("/leave/working-days", post(working_days_handler))
        .route("/invoices/totals", post(invoice_totals_handler))
        .route("/invoices/validate", post(invoice_validate_handler))
        .with_state(state)
}

/// Handler for POST /leave/summary.
///
/// Returns the leave evaluation for a requested period.
async fn leave_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<LeaveRequestBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave summary request");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let evaluation = evaluate(&state, body);
    info!(
        correlation_id = %correlation_id,
        employee_id = %evaluation.employee_id,
        entitlement = evaluation.summary.entitlement,
        remaining_after = %evaluation.summary.remaining_after,
        duration_us = evaluation.audit_trace.duration_us,
        "Leave summary completed"
    );
    json_response(StatusCode::OK, &evaluation)
}

/// Handler for POST /leave/approvals.
///
/// Evaluates the request like `/leave/summary` and returns the notice for the
/// notification dispatcher. Repeated submissions are rejected with 409.
async fn leave_approval_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LeaveRequestBody>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing leave approval notice");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let idempotency_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty());

    if let Err(err) = check_duplicate(&state, &body, idempotency_key) {
        warn!(
            correlation_id = %correlation_id,
            employee_id = %body.employee.id,
            error = %err,
            "Approval notice rejected"
        );
        return error_response(err.into());
    }

    let recipient = NoticeRecipient {
        id: body.employee.id.clone(),
        name: body.employee.name.clone(),
        email: body.employee.email.clone(),
    };
    let requested_period = body.request;
    let evaluation = evaluate(&state, body);

    let notice = ApprovalNotice {
        notice_id: Uuid::new_v4(),
        employee: recipient,
        summary: evaluation.summary,
        requested_period,
    };
    info!(
        correlation_id = %correlation_id,
        notice_id = %notice.notice_id,
        employee_id = %notice.employee.id,
        effective_days = notice.summary.effective_days_this_request,
        "Approval notice prepared"
    );
    json_response(StatusCode::OK, &notice)
}

/// Handler for POST /leave/working-days.
async fn working_days_handler(
    State(state): State<AppState>,
    payload: Result<Json<WorkingDaysRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let holidays = merged_holidays(&state, &request.holidays);
    let response = WorkingDaysResponse {
        calendar_days: days_between_inclusive(request.start_date, request.end_date),
        effective_days: count_effective_days(request.start_date, request.end_date, &holidays),
        return_to_work: next_workday(request.end_date, &holidays),
    };
    info!(
        correlation_id = %correlation_id,
        start_date = %request.start_date,
        end_date = %request.end_date,
        effective_days = response.effective_days,
        "Working days counted"
    );
    json_response(StatusCode::OK, &response)
}

/// Handler for POST /invoices/totals.
///
/// Builds the reconciliation for one category of a cart and validates the
/// payment against it.
async fn invoice_totals_handler(
    State(state): State<AppState>,
    payload: Result<Json<InvoiceTotalsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing invoice totals request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let reconciliation = build_reconciliation(
        &request.items,
        request.category,
        request.discount,
        request.paid,
        request.usd_rate,
    );
    let validation = validate_totals(&reconciliation, state.config().invoice_policy().tolerance);

    if !validation.valid {
        warn!(
            correlation_id = %correlation_id,
            category = %reconciliation.category,
            violations = validation.violations.len(),
            "Invoice totals do not reconcile"
        );
    }
    info!(
        correlation_id = %correlation_id,
        category = %reconciliation.category,
        items_count = request.items.len(),
        total_lyd = %reconciliation.total_lyd,
        valid = validation.valid,
        duration_us = start_time.elapsed().as_micros(),
        "Invoice totals completed"
    );

    json_response(
        StatusCode::OK,
        &InvoiceTotalsResponse {
            reconciliation,
            validation,
        },
    )
}

/// Handler for POST /invoices/validate.
///
/// Checks totals entered on an invoice form without recomputing them.
async fn invoice_validate_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidateTotalsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let negative_tolerance = request
        .tolerance
        .filter(|tolerance| tolerance.is_sign_negative() && !tolerance.is_zero());
    if let Some(tolerance) = negative_tolerance {
        warn!(
            correlation_id = %correlation_id,
            tolerance = %tolerance,
            "Invoice validation rejected"
        );
        return error_response(ApiErrorResponse::bad_request(ApiError::validation_error(
            "tolerance must not be negative",
        )));
    }

    let tolerance = request
        .tolerance
        .unwrap_or(state.config().invoice_policy().tolerance);
    let totals: TotalsReconciliation = request.into();
    let validation = validate_totals(&totals, tolerance);

    info!(
        correlation_id = %correlation_id,
        category = %totals.category,
        valid = validation.valid,
        violations = validation.violations.len(),
        "Invoice totals validated"
    );
    json_response(StatusCode::OK, &validation)
}

/// Runs the leave evaluation for a request body.
fn evaluate(state: &AppState, body: LeaveRequestBody) -> LeaveEvaluation {
    let config = state.config();
    let holidays = merged_holidays(state, &body.holidays);
    let as_of: NaiveDate = body.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let employee: Employee = body.employee.into();

    evaluate_leave_request(
        &employee,
        body.request,
        &body.history,
        &holidays,
        as_of,
        config.leave_policy(),
    )
}

/// The configured holiday calendar plus the dates supplied with a request.
fn merged_holidays(state: &AppState, extra: &[String]) -> HolidaySet {
    let mut holidays = state.config().holidays().clone();
    holidays.extend(&HolidaySet::from_iso_strings(extra));
    holidays
}

fn check_duplicate(
    state: &AppState,
    body: &LeaveRequestBody,
    idempotency_key: Option<&str>,
) -> Result<(), EngineError> {
    let content = serde_json::to_vec(body).map_err(|err| EngineError::CalculationError {
        message: format!("Failed to fingerprint request: {}", err),
    })?;
    state.dedupe().check(&content, idempotency_key)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    (
        api_error.status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(api_error.error),
    )
        .into_response()
}

/// Maps a JSON extraction failure to a 400 response.
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
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    error_response(ApiErrorResponse::bad_request(error))
}

//! HTTP API module for the rules engine.
//!
//! This module provides the REST API endpoints for leave balances, working-day
//! counts and invoice totals reconciliation.

mod dedupe;
mod handlers;
mod request;
mod response;
mod state;

pub use dedupe::RequestDeduplicator;
pub use handlers::{IDEMPOTENCY_KEY_HEADER, create_router};
pub use request::{
    EmployeeRequest, InvoiceTotalsRequest, LeaveRequestBody, ValidateTotalsRequest,
    WorkingDaysRequest,
};
pub use response::{
    ApiError, ApprovalNotice, InvoiceTotalsResponse, NoticeRecipient, WorkingDaysResponse,
};
pub use state::AppState;

//! Request types for the rules engine API.
//!
//! This module defines the JSON request structures for the leave and invoice
//! endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    Category, Discount, Employee, InvoiceCartItem, LeavePeriod, LeaveRecord, PaymentBreakdown,
    TotalsReconciliation, parse_lenient_date,
};

/// Request body for `/leave/summary` and `/leave/approvals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestBody {
    /// The employee the request is for.
    pub employee: EmployeeRequest,
    /// Date the balance is computed at; defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// The requested leave period.
    pub request: LeavePeriod,
    /// The employee's leave history.
    #[serde(default)]
    pub history: Vec<LeaveRecord>,
    /// Extra holiday dates on top of the configured calendar, as ISO strings.
    #[serde(default)]
    pub holidays: Vec<String>,
}

/// Employee information as stored in the directory.
///
/// Dates are free text and parsed leniently; unparseable dates are treated as
/// missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address for notifications.
    #[serde(default)]
    pub email: Option<String>,
    /// Date of birth.
    #[serde(default)]
    pub date_of_birth: Option<String>,
    /// Contract start date.
    #[serde(default)]
    pub contract_start: Option<String>,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            name: req.name,
            email: req.email,
            date_of_birth: req.date_of_birth.as_deref().and_then(parse_lenient_date),
            contract_start: req.contract_start.as_deref().and_then(parse_lenient_date),
        }
    }
}

/// Request body for `/leave/working-days`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingDaysRequest {
    /// First day of the range.
    pub start_date: NaiveDate,
    /// Last day of the range.
    pub end_date: NaiveDate,
    /// Extra holiday dates on top of the configured calendar.
    #[serde(default)]
    pub holidays: Vec<String>,
}

/// Request body for `/invoices/totals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceTotalsRequest {
    /// The category of invoice being closed.
    pub category: Category,
    /// Every row of the cart.
    pub items: Vec<InvoiceCartItem>,
    /// Invoice-level discount.
    #[serde(default)]
    pub discount: Discount,
    /// What the customer paid.
    #[serde(default)]
    pub paid: PaymentBreakdown,
    /// Dinars per dollar, used for dollar-priced categories.
    #[serde(default)]
    pub usd_rate: Option<Decimal>,
}

/// Request body for `/invoices/validate`.
///
/// Checks totals already entered on an invoice form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTotalsRequest {
    /// The invoice category.
    pub category: Category,
    /// Total in dinars.
    pub total_lyd: Decimal,
    /// Total in the dollar field.
    pub total_usd: Decimal,
    /// What the customer paid.
    #[serde(default)]
    pub paid: PaymentBreakdown,
    /// Overrides the configured tolerance.
    #[serde(default)]
    pub tolerance: Option<Decimal>,
}

impl From<ValidateTotalsRequest> for TotalsReconciliation {
    fn from(req: ValidateTotalsRequest) -> Self {
        TotalsReconciliation {
            category: req.category,
            totals_by_category: [(req.category, req.total_lyd)].into_iter().collect(),
            subtotal: req.total_lyd,
            discount: Discount::default(),
            total_lyd: req.total_lyd,
            total_usd: req.total_usd,
            paid: req.paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveStatus;

    #[test]
    fn test_deserialize_leave_request() {
        let json = r#"{
            "employee": {
                "id": "emp_001",
                "date_of_birth": "1975-06-01T00:00:00.000Z",
                "contract_start": "2015-01-10"
            },
            "as_of": "2025-08-01",
            "request": { "start_date": "2025-08-03", "end_date": "2025-08-09" },
            "history": [
                { "start_date": "2025-03-02", "end_date": "2025-03-06", "status": "Approuvé" }
            ],
            "holidays": ["2025-08-05"]
        }"#;

        let body: LeaveRequestBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.history[0].status, LeaveStatus::Approved);
        assert_eq!(body.holidays.len(), 1);

        let employee: Employee = body.employee.into();
        assert_eq!(employee.date_of_birth, NaiveDate::from_ymd_opt(1975, 6, 1));
        assert_eq!(employee.contract_start, NaiveDate::from_ymd_opt(2015, 1, 10));
    }

    #[test]
    fn test_minimal_leave_request_uses_defaults() {
        let json = r#"{
            "employee": { "id": "emp_002" },
            "request": { "start_date": "2025-08-03", "end_date": "2025-08-04" }
        }"#;

        let body: LeaveRequestBody = serde_json::from_str(json).unwrap();
        assert!(body.as_of.is_none());
        assert!(body.history.is_empty());

        let employee: Employee = body.employee.into();
        assert!(employee.date_of_birth.is_none());
        assert!(employee.contract_start.is_none());
    }

    #[test]
    fn test_unparseable_employee_date_treated_as_missing() {
        let req = EmployeeRequest {
            id: "emp_003".to_string(),
            name: None,
            email: None,
            date_of_birth: Some("unknown".to_string()),
            contract_start: Some(String::new()),
        };
        let employee: Employee = req.into();
        assert!(employee.date_of_birth.is_none());
        assert!(employee.contract_start.is_none());
    }

    #[test]
    fn test_invoice_request_defaults() {
        let json = r#"{
            "category": "gold",
            "items": [{ "id": 1, "category": "gold", "price": "1000" }]
        }"#;
        let req: InvoiceTotalsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.discount, Discount::default());
        assert_eq!(req.paid, PaymentBreakdown::default());
        assert!(req.usd_rate.is_none());
    }

    #[test]
    fn test_validate_request_into_reconciliation() {
        let json = r#"{ "category": "gold", "total_lyd": 1000, "total_usd": 900 }"#;
        let req: ValidateTotalsRequest = serde_json::from_str(json).unwrap();
        let totals: TotalsReconciliation = req.into();
        assert_eq!(totals.total_lyd, Decimal::from(1000));
        assert_eq!(totals.total_usd, Decimal::from(900));
        assert_eq!(totals.totals_by_category[&Category::Gold], Decimal::from(1000));
    }
}

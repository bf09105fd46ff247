//! Leave and invoice rules engine for a jewelry ERP
//!
//! This crate provides the business rules behind leave approvals and invoice
//! closing: seniority-based leave entitlement and accrual, working-day counting
//! over the Friday rest day and the public holiday calendar, and multi-currency
//! invoice totals reconciliation.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;

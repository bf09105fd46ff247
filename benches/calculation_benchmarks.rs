//! Performance benchmarks for the rules engine.
//!
//! This benchmark suite covers the hot paths behind the HR and invoicing forms:
//! - Leave summary through the HTTP router
//! - Working-day counting over ranges of growing length
//! - Invoice totals for carts of growing size
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::hint::black_box;

use axum::{body::Body, http::Request};
use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rust_decimal::Decimal;
use tower::ServiceExt;

use erp_rules_engine::api::{AppState, create_router};
use erp_rules_engine::calculation::{build_reconciliation, count_effective_days, validate_totals};
use erp_rules_engine::config::ConfigLoader;
use erp_rules_engine::models::{
    Category, Discount, InvoiceCartItem, PaymentBreakdown,
};

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/libya").expect("Failed to load config");
    AppState::new(config)
}

/// Creates a leave summary request with `history_len` approved records.
fn create_leave_request(history_len: usize) -> serde_json::Value {
    let base = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
    let history: Vec<serde_json::Value> = (0..history_len)
        .map(|i| {
            let start = base + Days::new(i as u64 * 7);
            let end = start + Days::new(3);
            serde_json::json!({
                "start_date": start.to_string(),
                "end_date": end.to_string(),
                "status": if i % 3 == 0 { "Refusé" } else { "approved" }
            })
        })
        .collect();

    serde_json::json!({
        "employee": {
            "id": "emp_bench_001",
            "date_of_birth": "1975-06-01",
            "contract_start": "2015-01-10"
        },
        "as_of": "2025-08-01",
        "request": { "start_date": "2025-08-03", "end_date": "2025-08-21" },
        "history": history
    })
}

fn create_cart(size: usize) -> Vec<InvoiceCartItem> {
    (0..size)
        .map(|i| InvoiceCartItem {
            id: i as u64,
            category: match i % 3 {
                0 => Category::Gold,
                1 => Category::Diamond,
                _ => Category::Watch,
            },
            price: Decimal::new(125_050 + i as i64, 2),
            discount: None,
            final_total: None,
        })
        .collect()
}

/// Benchmark: Leave summary through the router.
///
/// Target: < 200μs mean
fn bench_leave_summary(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = create_leave_request(12).to_string();

    c.bench_function("leave_summary", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/leave/summary")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Working-day counts over ranges up to a year.
fn bench_effective_days(c: &mut Criterion) {
    let config = ConfigLoader::load("./config/libya").expect("Failed to load config");
    let holidays = config.holidays().clone();
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let mut group = c.benchmark_group("effective_days");
    for span in [7u64, 30, 90, 365].iter() {
        let end = start + Days::new(*span - 1);
        group.throughput(Throughput::Elements(*span));
        group.bench_with_input(BenchmarkId::new("days", span), span, |b, _| {
            b.iter(|| count_effective_days(black_box(start), black_box(end), &holidays))
        });
    }
    group.finish();
}

/// Benchmark: Invoice totals for carts of growing size.
fn bench_invoice_totals(c: &mut Criterion) {
    let paid = PaymentBreakdown {
        lyd: Decimal::new(500_000, 2),
        ..Default::default()
    };
    let tolerance = Decimal::new(1, 2);

    let mut group = c.benchmark_group("invoice_totals");
    for cart_size in [3usize, 30, 300].iter() {
        let items = create_cart(*cart_size);
        group.throughput(Throughput::Elements(*cart_size as u64));
        group.bench_with_input(BenchmarkId::new("items", cart_size), cart_size, |b, _| {
            b.iter(|| {
                let totals = build_reconciliation(
                    black_box(&items),
                    Category::Gold,
                    Discount::percentage(Decimal::from(5)),
                    paid,
                    None,
                );
                black_box(validate_totals(&totals, tolerance))
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_leave_summary,
    bench_effective_days,
    bench_invoice_totals,
);
criterion_main!(benches);

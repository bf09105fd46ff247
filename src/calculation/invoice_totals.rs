//! Invoice totals reconciliation.
//!
//! Works out the total of one category of a cart, applies the invoice
//! discount, and checks a multi-currency payment breakdown against the total.
//! Validation problems are returned as data, never as errors.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{
    Category, Discount, InvoiceCartItem, PaymentBreakdown, TotalsReconciliation, TotalsValidation,
    TotalsViolation, ViolationKind,
};

use super::rounding::round_amount;

/// The total of every cart row of `category`.
///
/// Rows of one open invoice all carry the same running total once it has been
/// saved, so when any row has a nonzero `final_total` the largest one wins.
/// Otherwise the row prices are summed, saturating at the bounds of
/// [`Decimal`].
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::compute_category_total;
/// use erp_rules_engine::models::{Category, InvoiceCartItem};
/// use rust_decimal::Decimal;
///
/// let items = vec![
///     InvoiceCartItem { id: 1, category: Category::Gold, price: Decimal::from(600), discount: None, final_total: None },
///     InvoiceCartItem { id: 2, category: Category::Gold, price: Decimal::from(400), discount: None, final_total: None },
///     InvoiceCartItem { id: 3, category: Category::Watch, price: Decimal::from(2500), discount: None, final_total: None },
/// ];
/// assert_eq!(compute_category_total(&items, Category::Gold), Decimal::from(1000));
/// ```
pub fn compute_category_total(items: &[InvoiceCartItem], category: Category) -> Decimal {
    let rows = || items.iter().filter(move |item| item.category == category);

    rows()
        .filter_map(|item| item.final_total)
        .filter(|total| !total.is_zero())
        .max()
        .unwrap_or_else(|| {
            rows().fold(Decimal::ZERO, |total, item| total.saturating_add(item.price))
        })
}

/// Totals for every category present in the cart.
pub fn totals_by_category(items: &[InvoiceCartItem]) -> BTreeMap<Category, Decimal> {
    let mut categories: Vec<Category> = items.iter().map(|item| item.category).collect();
    categories.sort();
    categories.dedup();

    categories
        .into_iter()
        .map(|category| (category, compute_category_total(items, category)))
        .collect()
}

/// Applies an invoice discount to a total.
///
/// A positive flat value takes precedence over a positive percentage. Results
/// beyond the range of [`Decimal`] saturate.
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::apply_discount;
/// use erp_rules_engine::models::Discount;
/// use rust_decimal::Decimal;
///
/// let total = Decimal::from(100);
/// assert_eq!(apply_discount(total, &Discount::flat(Decimal::from(10))), Decimal::from(90));
/// assert_eq!(apply_discount(total, &Discount::percentage(Decimal::from(10))), Decimal::from(90));
/// assert_eq!(apply_discount(total, &Discount::default()), total);
/// ```
pub fn apply_discount(total: Decimal, discount: &Discount) -> Decimal {
    let value = discount.value.unwrap_or_default();
    let percent = discount.percent.unwrap_or_default();

    if value > Decimal::ZERO {
        total.saturating_sub(value)
    } else if percent > Decimal::ZERO {
        total.saturating_sub(total.saturating_mul(percent / Decimal::ONE_HUNDRED))
    } else {
        total
    }
}

/// Checks a reconciliation against the payment rules.
///
/// Every rule is checked; all violations are reported together.
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::validate_totals;
/// use erp_rules_engine::models::{Category, Discount, PaymentBreakdown, TotalsReconciliation, ViolationKind};
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let totals = TotalsReconciliation {
///     category: Category::Gold,
///     totals_by_category: BTreeMap::new(),
///     subtotal: Decimal::from(1000),
///     discount: Discount::default(),
///     total_lyd: Decimal::from(1000),
///     total_usd: Decimal::from(900),
///     paid: PaymentBreakdown { lyd: Decimal::from(1000), ..Default::default() },
/// };
/// let validation = validate_totals(&totals, Decimal::new(1, 2));
/// assert!(!validation.valid);
/// assert!(validation.has(ViolationKind::GoldTotalsMismatch));
/// ```
pub fn validate_totals(totals: &TotalsReconciliation, tolerance: Decimal) -> TotalsValidation {
    let paid = &totals.paid;
    let mut violations = Vec::new();

    let paid_lyd = paid.total_lyd_equivalent();

    let out_of_range = [totals.subtotal, totals.total_lyd, totals.total_usd, paid_lyd]
        .into_iter()
        .any(is_saturated);
    if out_of_range {
        violations.push(TotalsViolation {
            kind: ViolationKind::AmountOutOfRange,
            message: "An invoice amount exceeds the largest supported value".to_string(),
        });
    }

    let difference = totals.total_lyd.saturating_sub(paid_lyd).abs();
    if difference > tolerance {
        violations.push(TotalsViolation {
            kind: ViolationKind::PaymentMismatch,
            message: format!(
                "Total {} LYD does not match payments of {} LYD (difference {})",
                totals.total_lyd, paid_lyd, difference
            ),
        });
    }

    if paid.usd_to_lyd > Decimal::ZERO && paid.usd <= Decimal::ZERO {
        violations.push(TotalsViolation {
            kind: ViolationKind::UsdAmountMissing,
            message: format!(
                "{} LYD recorded as paid in USD but no USD amount entered",
                paid.usd_to_lyd
            ),
        });
    }

    if paid.eur_to_lyd > Decimal::ZERO && paid.eur <= Decimal::ZERO {
        violations.push(TotalsViolation {
            kind: ViolationKind::EurAmountMissing,
            message: format!(
                "{} LYD recorded as paid in EUR but no EUR amount entered",
                paid.eur_to_lyd
            ),
        });
    }

    if totals.category == Category::Gold {
        let gold_difference = totals.total_lyd.saturating_sub(totals.total_usd).abs();
        if gold_difference > tolerance {
            violations.push(TotalsViolation {
                kind: ViolationKind::GoldTotalsMismatch,
                message: format!(
                    "Gold invoice totals differ: {} LYD vs {} in the USD field (difference {})",
                    totals.total_lyd, totals.total_usd, gold_difference
                ),
            });
        }
    }

    if totals.total_lyd.is_zero() {
        violations.push(TotalsViolation {
            kind: ViolationKind::ZeroTotal,
            message: "Invoice total is zero".to_string(),
        });
    }

    TotalsValidation {
        valid: violations.is_empty(),
        violations,
    }
}

/// True for amounts pinned at the bounds of [`Decimal`] by saturating
/// arithmetic.
fn is_saturated(amount: Decimal) -> bool {
    amount == Decimal::MAX || amount == Decimal::MIN
}

/// Builds the reconciliation for closing the `category` invoice of a cart.
///
/// Gold carries the discounted total in both total fields. Dollar-priced
/// categories carry it in `total_usd` and its dinar value at `usd_rate` in
/// `total_lyd`; without a rate `total_lyd` is 0 and validation will flag it.
pub fn build_reconciliation(
    items: &[InvoiceCartItem],
    category: Category,
    discount: Discount,
    paid: PaymentBreakdown,
    usd_rate: Option<Decimal>,
) -> TotalsReconciliation {
    let subtotal = compute_category_total(items, category);
    let discounted = round_amount(apply_discount(subtotal, &discount));

    let (total_lyd, total_usd) = match category {
        Category::Gold => (discounted, discounted),
        Category::Diamond | Category::Watch => {
            let rate = usd_rate.unwrap_or_default();
            (round_amount(discounted.saturating_mul(rate)), discounted)
        }
    };

    TotalsReconciliation {
        category,
        totals_by_category: totals_by_category(items),
        subtotal,
        discount,
        total_lyd,
        total_usd,
        paid,
    }
}

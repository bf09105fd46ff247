//! Invoice cart and totals reconciliation models.
//!
//! Gold is priced in Libyan dinars, diamonds and watches in US dollars. A cart
//! holds rows of one or more categories; an invoice is closed per category.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A currency accepted at the till.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Libyan dinar.
    Lyd,
    /// US dollar.
    Usd,
    /// Euro.
    Eur,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Lyd => write!(f, "LYD"),
            Currency::Usd => write!(f, "USD"),
            Currency::Eur => write!(f, "EUR"),
        }
    }
}

/// The product line a cart row belongs to.
///
/// # Example
///
/// ```
/// use erp_rules_engine::models::{Category, Currency};
///
/// assert_eq!(Category::Gold.native_currency(), Currency::Lyd);
/// assert_eq!(Category::Watch.native_currency(), Currency::Usd);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Gold jewelry, priced in LYD.
    Gold,
    /// Diamond jewelry, priced in USD.
    Diamond,
    /// Watches, priced in USD.
    Watch,
}

impl Category {
    /// The currency prices in this category are quoted in.
    pub fn native_currency(self) -> Currency {
        match self {
            Category::Gold => Currency::Lyd,
            Category::Diamond | Category::Watch => Currency::Usd,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Gold => write!(f, "gold"),
            Category::Diamond => write!(f, "diamond"),
            Category::Watch => write!(f, "watch"),
        }
    }
}

/// One row of an open invoice cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCartItem {
    /// Row identifier; rows are numbered in insertion order.
    pub id: u64,
    /// The row's product line.
    pub category: Category,
    /// Pre-discount price in the category's native currency.
    pub price: Decimal,
    /// Discount entered against this row, if any.
    #[serde(default)]
    pub discount: Option<Decimal>,
    /// Invoice total after discount, as written by the last save of the cart.
    ///
    /// Every row of an open invoice carries the same running total.
    #[serde(default)]
    pub final_total: Option<Decimal>,
}

/// An invoice-level discount. Either a flat amount or a percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    /// Flat amount in the invoice currency.
    #[serde(default)]
    pub value: Option<Decimal>,
    /// Percentage of the total (10 means 10%).
    #[serde(default)]
    pub percent: Option<Decimal>,
}

impl Discount {
    /// A flat discount.
    pub fn flat(value: Decimal) -> Self {
        Self {
            value: Some(value),
            percent: None,
        }
    }

    /// A percentage discount.
    pub fn percentage(percent: Decimal) -> Self {
        Self {
            value: None,
            percent: Some(percent),
        }
    }
}

/// How the customer paid, split by currency.
///
/// `usd_to_lyd` and `eur_to_lyd` are the dinar equivalents of the foreign
/// amounts, as entered by the cashier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    /// Paid in dinars.
    #[serde(default)]
    pub lyd: Decimal,
    /// Paid in dollars.
    #[serde(default)]
    pub usd: Decimal,
    /// Dinar equivalent of the dollar payment.
    #[serde(default)]
    pub usd_to_lyd: Decimal,
    /// Paid in euros.
    #[serde(default)]
    pub eur: Decimal,
    /// Dinar equivalent of the euro payment.
    #[serde(default)]
    pub eur_to_lyd: Decimal,
}

impl PaymentBreakdown {
    /// Total paid, expressed in dinars.
    ///
    /// Saturates at the bounds of [`Decimal`] instead of overflowing.
    pub fn total_lyd_equivalent(&self) -> Decimal {
        self.lyd
            .saturating_add(self.usd_to_lyd)
            .saturating_add(self.eur_to_lyd)
    }
}

/// The totals of one invoice, ready to be validated and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsReconciliation {
    /// The category the invoice is closed for.
    pub category: Category,
    /// Cart totals for every category present in the cart.
    pub totals_by_category: BTreeMap<Category, Decimal>,
    /// Pre-discount total of the invoiced category.
    pub subtotal: Decimal,
    /// Discount applied to the subtotal.
    pub discount: Discount,
    /// Invoice total in dinars.
    pub total_lyd: Decimal,
    /// Invoice total in dollars.
    pub total_usd: Decimal,
    /// Payment breakdown.
    pub paid: PaymentBreakdown,
}

/// The rule a reconciliation broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Payments do not add up to the total.
    PaymentMismatch,
    /// A dollar equivalent was entered without a dollar amount.
    UsdAmountMissing,
    /// A euro equivalent was entered without a euro amount.
    EurAmountMissing,
    /// Gold invoice whose LYD and USD totals disagree.
    GoldTotalsMismatch,
    /// Total is zero.
    ZeroTotal,
    /// An amount is too large to reconcile exactly.
    AmountOutOfRange,
}

/// A broken reconciliation rule with a message for the cashier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsViolation {
    /// Which rule was broken.
    pub kind: ViolationKind,
    /// Human-readable explanation.
    pub message: String,
}

/// The outcome of validating a [`TotalsReconciliation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsValidation {
    /// True when no rule is broken.
    pub valid: bool,
    /// Every broken rule, in rule order.
    pub violations: Vec<TotalsViolation>,
}

impl TotalsValidation {
    /// Returns true if `kind` is among the violations.
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_cart_item_with_numbers() {
        let json = r#"{ "id": 7, "category": "diamond", "price": 1250.5 }"#;
        let item: InvoiceCartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.category, Category::Diamond);
        assert_eq!(item.price, dec("1250.5"));
        assert!(item.final_total.is_none());
    }

    #[test]
    fn test_deserialize_cart_item_with_persisted_total() {
        let json = r#"{ "id": 8, "category": "gold", "price": "300", "final_total": "2850.00" }"#;
        let item: InvoiceCartItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.final_total, Some(dec("2850.00")));
    }

    #[test]
    fn test_currency_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Currency::Lyd).unwrap(), "\"LYD\"");
        assert_eq!(Currency::Eur.to_string(), "EUR");
    }

    #[test]
    fn test_payment_total_lyd_equivalent() {
        let paid = PaymentBreakdown {
            lyd: dec("500"),
            usd: dec("50"),
            usd_to_lyd: dec("350"),
            eur: dec("20"),
            eur_to_lyd: dec("150"),
        };
        assert_eq!(paid.total_lyd_equivalent(), dec("1000"));
    }

    #[test]
    fn test_payment_total_saturates_instead_of_overflowing() {
        let paid = PaymentBreakdown {
            lyd: dec("50000000000000000000000000000"),
            usd_to_lyd: dec("50000000000000000000000000000"),
            ..Default::default()
        };
        assert_eq!(paid.total_lyd_equivalent(), Decimal::MAX);
    }

    #[test]
    fn test_payment_breakdown_defaults_missing_fields() {
        let paid: PaymentBreakdown = serde_json::from_str(r#"{ "lyd": 100 }"#).unwrap();
        assert_eq!(paid.lyd, dec("100"));
        assert_eq!(paid.usd, Decimal::ZERO);
        assert_eq!(paid.eur_to_lyd, Decimal::ZERO);
    }

    #[test]
    fn test_discount_constructors() {
        assert_eq!(Discount::flat(dec("10")).value, Some(dec("10")));
        assert_eq!(Discount::percentage(dec("5")).percent, Some(dec("5")));
        assert_eq!(Discount::default(), Discount { value: None, percent: None });
    }
}

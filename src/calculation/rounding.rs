//! Rounding shared by the leave and invoice rules.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on accrued days and money amounts.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Rounds to two decimal places, halves away from zero.
///
/// # Example
///
/// ```
/// use erp_rules_engine::calculation::round_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_amount(Decimal::from_str("2.345").unwrap()), Decimal::from_str("2.35").unwrap());
/// assert_eq!(round_amount(Decimal::from_str("2.344").unwrap()), Decimal::from_str("2.34").unwrap());
/// ```
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_midpoint_rounds_up_not_to_even() {
        assert_eq!(round_amount(dec("0.125")), dec("0.13"));
        assert_eq!(round_amount(dec("0.135")), dec("0.14"));
    }

    #[test]
    fn test_negative_midpoint_rounds_away_from_zero() {
        assert_eq!(round_amount(dec("-0.125")), dec("-0.13"));
    }

    #[test]
    fn test_short_values_unchanged() {
        assert_eq!(round_amount(dec("19.3")), dec("19.3"));
        assert_eq!(round_amount(Decimal::ZERO), Decimal::ZERO);
    }
}

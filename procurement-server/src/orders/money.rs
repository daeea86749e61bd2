//! Money and quantity arithmetic using rust_decimal
//!
//! Values are stored as `f64` (SQLite REAL). Every comparison and sum goes
//! through `Decimal`, then converts back to `f64` for storage.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Quantities are kept to the gram / millilitre
const QUANTITY_DECIMAL_PLACES: u32 = 3;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Convert a quantity Decimal back to f64, rounded to 3 decimal places
#[inline]
pub fn quantity_to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(QUANTITY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// quantity × unit price, rounded to cents
pub fn line_subtotal(quantity: f64, unit_price: f64) -> Decimal {
    (to_decimal(quantity) * to_decimal(unit_price))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

pub fn sum_money(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, |acc, v| acc + v)
}

/// True when the two amounts differ by more than [`MONEY_TOLERANCE`]
#[inline]
pub fn exceeds_tolerance(expected: Decimal, actual: Decimal) -> bool {
    (expected - actual).abs() > MONEY_TOLERANCE
}

/// Format a monetary value for reports ("20.00")
pub fn format_money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{field_name} must be a finite number, got {value}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_subtotal() {
        assert_eq!(line_subtotal(10.0, 2.0), Decimal::new(2000, 2));
        assert_eq!(to_f64(line_subtotal(3.0, 0.1)), 0.3);
        // 0.333 × 3 = 0.999 → 1.00
        assert_eq!(to_f64(line_subtotal(0.333, 3.0)), 1.0);
    }

    #[test]
    fn test_tolerance_boundary() {
        let expected = to_decimal(20.0);
        assert!(!exceeds_tolerance(expected, to_decimal(20.01)));
        assert!(!exceeds_tolerance(expected, to_decimal(19.99)));
        assert!(exceeds_tolerance(expected, to_decimal(20.02)));
        assert!(exceeds_tolerance(expected, to_decimal(25.0)));
    }

    #[test]
    fn test_sum_money_avoids_float_drift() {
        let total = sum_money([to_decimal(0.1), to_decimal(0.2)]);
        assert_eq!(total, Decimal::new(3, 1));
        assert_eq!(to_f64(total), 0.3);
    }

    #[test]
    fn test_quantity_rounding() {
        let total = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(quantity_to_f64(total), 0.3);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(to_decimal(20.0)), "20.00");
        assert_eq!(format_money(to_decimal(2.5)), "2.50");
    }

    #[test]
    fn test_require_finite() {
        assert!(require_finite(1.0, "quantity").is_ok());
        assert!(require_finite(f64::NAN, "quantity").is_err());
        assert!(require_finite(f64::INFINITY, "quantity").is_err());
    }
}

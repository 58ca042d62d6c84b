//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored and serialized as `f64` currency units. Every sum and
//! product goes through `Decimal` and is rounded back to 2 places.

use rust_decimal::prelude::*;

use super::error::OrderError;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

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

/// Validate a catalog price
pub fn validate_price(price: f64) -> Result<(), OrderError> {
    if !price.is_finite() {
        return Err(OrderError::validation(format!(
            "price must be a finite number, got {price}"
        )));
    }
    if price < 0.0 {
        return Err(OrderError::validation(format!(
            "price must be non-negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(OrderError::validation(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

/// Validate a line quantity (must stay in `1..=MAX_QUANTITY`)
pub fn validate_quantity(quantity: i32) -> Result<(), OrderError> {
    if quantity < 1 {
        return Err(OrderError::validation(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(OrderError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

/// `price * quantity`, rounded
pub fn line_total(price: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(price) * Decimal::from(quantity))
}

/// Sum of amounts, rounded once at the end
pub fn sum<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_f64(amounts.into_iter().map(to_decimal).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_avoids_float_drift() {
        assert_eq!(line_total(0.1, 3), 0.3);
        assert_eq!(line_total(19.99, 3), 59.97);
    }

    #[test]
    fn test_sum_rounds_once() {
        assert_eq!(sum([0.1, 0.2]), 0.3);
        assert_eq!(sum([20.0, 5.0]), 25.0);
        assert_eq!(sum(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(-1005, 3)), -1.01);
    }

    #[test]
    fn test_validate_quantity_bounds() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(12.5).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(MAX_PRICE * 2.0).is_err());
    }
}

//! Inventory stock levels and adjustments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-hand quantity at or below which an item counts as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Coarse stock level shown next to inventory items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// More than `LOW_STOCK_THRESHOLD` on hand.
    InStock,
    /// Between 1 and `LOW_STOCK_THRESHOLD` on hand.
    LowStock,
    /// Nothing on hand.
    OutOfStock,
}

impl StockStatus {
    /// Classifies an on-hand quantity.
    #[must_use]
    pub fn from_quantity(quantity: i32) -> Self {
        if quantity <= 0 {
            Self::OutOfStock
        } else if quantity <= LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

/// Errors raised by stock adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockAdjustmentError {
    /// The adjustment would leave a negative quantity.
    #[error("Adjustment of {delta} would leave {current} below zero")]
    WouldGoNegative {
        /// Quantity before the adjustment.
        current: i32,
        /// Requested change.
        delta: i32,
    },

    /// The adjustment overflows.
    #[error("Adjustment of {delta} overflows quantity {current}")]
    Overflow {
        /// Quantity before the adjustment.
        current: i32,
        /// Requested change.
        delta: i32,
    },
}

impl StockAdjustmentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        422
    }
}

/// Applies a signed stock adjustment.
///
/// # Errors
///
/// Returns an error if the result would be negative or overflow.
pub fn apply_adjustment(current: i32, delta: i32) -> Result<i32, StockAdjustmentError> {
    let next = current
        .checked_add(delta)
        .ok_or(StockAdjustmentError::Overflow { current, delta })?;
    if next < 0 {
        return Err(StockAdjustmentError::WouldGoNegative { current, delta });
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, StockStatus::OutOfStock)]
    #[case(-2, StockStatus::OutOfStock)]
    #[case(1, StockStatus::LowStock)]
    #[case(5, StockStatus::LowStock)]
    #[case(6, StockStatus::InStock)]
    fn test_stock_status(#[case] quantity: i32, #[case] expected: StockStatus) {
        assert_eq!(StockStatus::from_quantity(quantity), expected);
    }

    #[test]
    fn test_adjustment() {
        assert_eq!(apply_adjustment(10, -4), Ok(6));
        assert_eq!(apply_adjustment(10, 5), Ok(15));
        assert_eq!(apply_adjustment(3, -3), Ok(0));
        assert_eq!(
            apply_adjustment(3, -4),
            Err(StockAdjustmentError::WouldGoNegative {
                current: 3,
                delta: -4
            })
        );
        assert!(matches!(
            apply_adjustment(i32::MAX, 1),
            Err(StockAdjustmentError::Overflow { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_adjustment_never_negative(current in 0i32..10_000, delta in -20_000i32..20_000) {
            match apply_adjustment(current, delta) {
                Ok(next) => {
                    prop_assert!(next >= 0);
                    prop_assert_eq!(next, current + delta);
                }
                Err(_) => prop_assert!(current + delta < 0),
            }
        }
    }
}

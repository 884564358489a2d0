//! Advisory stock checks for requested products.
//!
//! Requests may ask for more than is on hand; the shortfall is reported to
//! the caller but never blocks the write.

use std::collections::HashMap;

use serde::Serialize;

use crate::request::draft::ProductLine;

/// A product line asking for more than is on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockShortfall {
    /// Inventory item.
    pub inventory_item_id: i32,
    /// Quantity requested on this line.
    pub requested: i32,
    /// Quantity on hand when checked.
    pub available: i32,
}

/// Compares each line with on-hand quantities.
///
/// Lines are checked one by one, in order, each against the full on-hand
/// quantity. Items absent from `on_hand` are treated as having zero stock.
#[must_use]
pub fn check_stock(lines: &[ProductLine], on_hand: &HashMap<i32, i32>) -> Vec<StockShortfall> {
    lines
        .iter()
        .filter_map(|line| {
            let available = on_hand.get(&line.inventory_item_id).copied().unwrap_or(0);
            (line.requested_quantity > available).then_some(StockShortfall {
                inventory_item_id: line.inventory_item_id,
                requested: line.requested_quantity,
                available,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_shortfall_when_stock_covers_request() {
        let on_hand = HashMap::from([(1, 10), (2, 3)]);
        let lines = [ProductLine::new(1, 10), ProductLine::new(2, 1)];
        assert!(check_stock(&lines, &on_hand).is_empty());
    }

    #[test]
    fn test_shortfall_reported() {
        let on_hand = HashMap::from([(1, 2)]);
        let lines = [ProductLine::new(1, 5)];
        let shortfalls = check_stock(&lines, &on_hand);
        assert_eq!(
            shortfalls,
            vec![StockShortfall {
                inventory_item_id: 1,
                requested: 5,
                available: 2
            }]
        );
    }

    #[test]
    fn test_unknown_item_counts_as_empty() {
        let shortfalls = check_stock(&[ProductLine::new(9, 1)], &HashMap::new());
        assert_eq!(shortfalls.len(), 1);
        assert_eq!(shortfalls[0].available, 0);
    }

    #[test]
    fn test_each_line_checked_independently() {
        // Two lines for the same item each fit on their own.
        let on_hand = HashMap::from([(1, 4)]);
        let lines = [ProductLine::new(1, 3), ProductLine::new(1, 3)];
        assert!(check_stock(&lines, &on_hand).is_empty());
    }

    proptest! {
        #[test]
        fn prop_shortfall_iff_requested_exceeds_available(
            requested in 1i32..500,
            available in 0i32..500,
        ) {
            let on_hand = HashMap::from([(1, available)]);
            let shortfalls = check_stock(&[ProductLine::new(1, requested)], &on_hand);
            prop_assert_eq!(shortfalls.len() == 1, requested > available);
            if let Some(s) = shortfalls.first() {
                prop_assert!(s.requested > s.available);
            }
        }
    }
}

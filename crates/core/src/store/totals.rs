//! Derived cart figures, computed from a line-item snapshot.
//!
//! Nothing here is cached or persisted; every call folds over the items it
//! is given.

use rust_decimal::Decimal;

use super::cart::LineItem;
use crate::types::ProductId;

/// `price * quantity` for one line, in the base currency.
#[must_use]
pub fn line_total(item: &LineItem) -> Decimal {
    item.product.price() * Decimal::from(item.quantity)
}

/// Sum of quantities across all lines.
#[must_use]
pub fn total_items(items: &[LineItem]) -> u32 {
    items
        .iter()
        .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
}

/// Sum of line totals, in the base currency.
#[must_use]
pub fn total_price(items: &[LineItem]) -> Decimal {
    items.iter().map(line_total).sum()
}

/// Quantity of a product across all its variants, 0 if absent.
#[must_use]
pub fn item_quantity(items: &[LineItem], product_id: ProductId) -> u32 {
    items
        .iter()
        .filter(|item| item.product.id == product_id)
        .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ProductSnapshot;

    fn line(id: i32, price: i64, quantity: u32, variant: Option<&str>) -> LineItem {
        LineItem {
            product: ProductSnapshot::new(ProductId::new(id), format!("Tea {id}"), Decimal::new(price, 0))
                .unwrap(),
            quantity,
            selected_variant: variant.map(String::from),
        }
    }

    #[test]
    fn test_empty_totals() {
        assert_eq!(total_items(&[]), 0);
        assert_eq!(total_price(&[]), Decimal::ZERO);
        assert_eq!(item_quantity(&[], ProductId::new(1)), 0);
    }

    #[test]
    fn test_totals_fold_over_lines() {
        let items = [
            line(1, 1000, 2, None),
            line(2, 350, 1, None),
            line(1, 1200, 1, Some("100g")),
        ];

        assert_eq!(total_items(&items), 4);
        assert_eq!(total_price(&items), Decimal::new(3550, 0));
        assert_eq!(item_quantity(&items, ProductId::new(1)), 3);
        assert_eq!(item_quantity(&items, ProductId::new(9)), 0);
    }
}

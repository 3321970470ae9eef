//! Price resolution against the injected catalog.
//!
//! The stored `price` of a sale is **always** the line total produced here.
//! No create or edit path accepts a price from the caller; a client-supplied
//! price would be a tampering vector, so the catalog is the only source.

use crate::{Category, EngineError, Money, PriceCatalog, ResultEngine};

/// Resolves `(category, item, quantity)` to the line total
/// `unit_price * quantity`, in integer cents.
///
/// Errors:
/// - [`EngineError::UnknownItem`] when the item key is absent from the
///   category's table (form tampering signal).
/// - [`EngineError::InvalidQuantity`] when `quantity <= 0` or the
///   multiplication overflows.
pub fn resolve_price(
    catalog: &PriceCatalog,
    category: Category,
    item: &str,
    quantity: i64,
) -> ResultEngine<Money> {
    if quantity <= 0 {
        return Err(EngineError::InvalidQuantity(format!(
            "quantity must be a positive integer, got {quantity}"
        )));
    }

    let unit_price = catalog.unit_price(category, item).ok_or_else(|| {
        EngineError::UnknownItem(format!("{item} is not in the {category} catalog"))
    })?;

    unit_price
        .checked_mul(quantity)
        .ok_or_else(|| EngineError::InvalidQuantity("line total overflows".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PriceCatalog {
        PriceCatalog::new().with_item(Category::Water, "20L (Refill)", Money::from_major(250))
    }

    #[test]
    fn resolves_line_total_exactly() {
        let total = resolve_price(&catalog(), Category::Water, "20L (Refill)", 3).unwrap();
        assert_eq!(total, Money::from_major(750));
        assert_eq!(total.cents(), 75_000);
    }

    #[test]
    fn unknown_item_is_rejected() {
        let err = resolve_price(&catalog(), Category::Water, "50L (Refill)", 1).unwrap_err();
        assert!(matches!(err, EngineError::UnknownItem(_)));
        // Same item name under the wrong category is just as unknown.
        let err = resolve_price(&catalog(), Category::Gas, "20L (Refill)", 1).unwrap_err();
        assert!(matches!(err, EngineError::UnknownItem(_)));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        for quantity in [0, -1, i64::MIN] {
            let err = resolve_price(&catalog(), Category::Water, "20L (Refill)", quantity)
                .unwrap_err();
            assert!(matches!(err, EngineError::InvalidQuantity(_)));
        }
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let err = resolve_price(&catalog(), Category::Water, "20L (Refill)", i64::MAX / 2)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidQuantity(_)));
    }
}

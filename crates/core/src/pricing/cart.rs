//! Cart pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PricingError;
use crate::{IngredientId, round_currency};

/// One priced ingredient quantity within a cart or order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The ingredient being bought.
    pub identifier: IngredientId,
    /// How many units. Must be at least 1 to be priced.
    pub unit_count: i32,
    /// Price of a single unit. Must not be negative to be priced.
    pub unit_price: Decimal,
}

impl LineItem {
    /// Create a line item. Validation happens when it is priced.
    #[must_use]
    pub const fn new(identifier: IngredientId, unit_count: i32, unit_price: Decimal) -> Self {
        Self {
            identifier,
            unit_count,
            unit_price,
        }
    }

    /// Check the count and price, in that order.
    fn validate(&self) -> Result<(), PricingError> {
        if self.unit_count <= 0 {
            return Err(PricingError::InvalidQuantity {
                identifier: self.identifier,
                count: self.unit_count,
            });
        }
        if self.unit_price < Decimal::ZERO {
            return Err(PricingError::InvalidPrice {
                identifier: self.identifier,
                price: self.unit_price,
            });
        }
        Ok(())
    }

    /// Unrounded `unit_count * unit_price`, or `None` on overflow.
    #[must_use]
    pub fn checked_subtotal(&self) -> Option<Decimal> {
        Decimal::from(self.unit_count).checked_mul(self.unit_price)
    }

    /// Unrounded `unit_count * unit_price`, clamped at the `Decimal` bounds.
    pub(crate) fn subtotal(&self) -> Decimal {
        Decimal::from(self.unit_count).saturating_mul(self.unit_price)
    }
}

/// A line item together with its rounded line total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    /// The original line item.
    #[serde(flatten)]
    pub item: LineItem,
    /// `unit_count * unit_price`, rounded to cents.
    pub line_total: Decimal,
}

impl PricedLine {
    pub(crate) fn from_item(item: LineItem) -> Self {
        let line_total = round_currency(item.subtotal());
        Self { item, line_total }
    }
}

/// A cart with per-line totals and a grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedCart {
    /// Priced lines, in input order.
    pub items: Vec<PricedLine>,
    /// Sum of all line totals, rounded to cents.
    pub cart_total: Decimal,
}

/// Price a cart.
///
/// Each line total is `unit_count * unit_price` rounded to cents (half away
/// from zero). The cart total is the sum of the line totals, rounded again.
/// An empty cart prices to an empty item list with a total of `0.00`.
///
/// # Errors
///
/// Fails on the first offending item, in input order:
/// - [`PricingError::InvalidQuantity`] if `unit_count <= 0`
/// - [`PricingError::InvalidPrice`] if `unit_price < 0`
/// - [`PricingError::AmountOverflow`] if a total exceeds `Decimal` range
///
/// Nothing is returned on failure; there are no partial totals.
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use sous_chef_core::{IngredientId, LineItem, price_cart};
///
/// let cart = price_cart(&[
///     LineItem::new(IngredientId::new(1), 2, Decimal::new(150, 2)),
///     LineItem::new(IngredientId::new(2), 3, Decimal::new(99, 2)),
/// ])
/// .unwrap();
///
/// assert_eq!(cart.cart_total.to_string(), "5.97");
/// ```
pub fn price_cart(items: &[LineItem]) -> Result<PricedCart, PricingError> {
    let mut lines = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;

    for item in items {
        item.validate()?;

        let subtotal = item
            .checked_subtotal()
            .ok_or(PricingError::AmountOverflow {
                identifier: item.identifier,
            })?;
        let line_total = round_currency(subtotal);

        total = total
            .checked_add(line_total)
            .ok_or(PricingError::AmountOverflow {
                identifier: item.identifier,
            })?;

        lines.push(PricedLine {
            item: item.clone(),
            line_total,
        });
    }

    Ok(PricedCart {
        items: lines,
        cart_total: round_currency(total),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn item(id: i32, count: i32, price: Decimal) -> LineItem {
        LineItem::new(IngredientId::new(id), count, price)
    }

    #[test]
    fn test_price_cart_empty() {
        let cart = price_cart(&[]).unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.cart_total.to_string(), "0.00");
    }

    #[test]
    fn test_price_cart_two_items() {
        let cart = price_cart(&[item(1, 2, dec!(1.50)), item(2, 3, dec!(0.99))]).unwrap();

        let totals: Vec<String> = cart
            .items
            .iter()
            .map(|l| l.line_total.to_string())
            .collect();
        assert_eq!(totals, vec!["3.00", "2.97"]);
        assert_eq!(cart.cart_total.to_string(), "5.97");
    }

    #[test]
    fn test_price_cart_single_item_matches_rounded_product() {
        let cases = [
            (1, dec!(0)),
            (1, dec!(0.01)),
            (3, dec!(0.335)),
            (7, dec!(12.345)),
            (250, dec!(49.99)),
            (1, dec!(0.005)),
        ];

        for (count, price) in cases {
            let cart = price_cart(&[item(9, count, price)]).unwrap();
            let expected = round_currency(Decimal::from(count) * price);
            assert_eq!(cart.cart_total, expected, "count={count} price={price}");
            assert_eq!(cart.items[0].line_total, expected);
        }
    }

    #[test]
    fn test_price_cart_preserves_input_order() {
        let cart = price_cart(&[
            item(30, 1, dec!(1)),
            item(10, 1, dec!(2)),
            item(20, 1, dec!(3)),
        ])
        .unwrap();

        let ids: Vec<i32> = cart
            .items
            .iter()
            .map(|l| l.item.identifier.as_i32())
            .collect();
        assert_eq!(ids, vec![30, 10, 20]);
    }

    #[test]
    fn test_price_cart_rejects_zero_quantity() {
        let err = price_cart(&[item(1, 0, dec!(1.00))]).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidQuantity {
                identifier: IngredientId::new(1),
                count: 0
            }
        );
    }

    #[test]
    fn test_price_cart_rejects_negative_quantity() {
        let err = price_cart(&[item(1, -2, dec!(1.00))]).unwrap_err();
        assert!(matches!(err, PricingError::InvalidQuantity { count: -2, .. }));
    }

    #[test]
    fn test_price_cart_rejects_negative_price() {
        let err = price_cart(&[item(4, 1, dec!(-1))]).unwrap_err();
        assert_eq!(
            err,
            PricingError::InvalidPrice {
                identifier: IngredientId::new(4),
                price: dec!(-1)
            }
        );
    }

    #[test]
    fn test_price_cart_reports_first_invalid_item() {
        let err = price_cart(&[
            item(1, 1, dec!(1.00)),
            item(2, 1, dec!(-3.00)),
            item(3, 0, dec!(1.00)),
        ])
        .unwrap_err();
        assert!(matches!(err, PricingError::InvalidPrice { identifier, .. } if identifier.as_i32() == 2));
    }

    #[test]
    fn test_price_cart_overflow() {
        let err = price_cart(&[item(5, i32::MAX, Decimal::MAX)]).unwrap_err();
        assert!(matches!(err, PricingError::AmountOverflow { .. }));
    }

    #[test]
    fn test_priced_line_serializes_flat() {
        let cart = price_cart(&[item(1, 2, dec!(1.50))]).unwrap();
        let json = serde_json::to_value(&cart).unwrap();

        assert_eq!(json["items"][0]["identifier"], 1);
        assert_eq!(json["items"][0]["unit_count"], 2);
        assert_eq!(json["items"][0]["unit_price"], "1.50");
        assert_eq!(json["items"][0]["line_total"], "3.00");
        assert_eq!(json["cart_total"], "3.00");
    }
}

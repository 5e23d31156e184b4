//! Cart and order request/response bodies.
//!
//! The pricing itself lives in `sous_chef_core::pricing`; these types only
//! carry its results with ingredient names and images attached.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sous_chef_core::{IngredientId, LineItem, Order, OrderNumber, PricedLine};

/// One cart entry as sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: IngredientId,
    pub count: i32,
    pub price: Decimal,
}

impl From<CartLine> for LineItem {
    fn from(line: CartLine) -> Self {
        Self::new(line.id, line.count, line.price)
    }
}

/// `POST /cart/load` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadCartRequest {
    #[serde(default)]
    pub cart: Vec<CartLine>,
}

/// `POST /cart/submit` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitOrderRequest {
    #[serde(default)]
    pub order: Vec<CartLine>,
}

/// Display name and image for an ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLabel {
    pub name: String,
    pub image: Option<String>,
}

impl IngredientLabel {
    /// Label used when the recipe API can't describe an ingredient.
    #[must_use]
    pub fn fallback(id: IngredientId) -> Self {
        Self {
            name: format!("Ingredient {id}"),
            image: None,
        }
    }
}

/// A priced line with its ingredient label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub id: IngredientId,
    pub name: String,
    pub image: Option<String>,
    pub count: i32,
    pub price: Decimal,
    pub total: Decimal,
}

impl CartItemView {
    #[must_use]
    pub fn new(line: PricedLine, label: IngredientLabel) -> Self {
        Self {
            id: line.item.identifier,
            name: label.name,
            image: label.image,
            count: line.item.unit_count,
            price: line.item.unit_price,
            total: line.line_total,
        }
    }
}

/// `POST /cart/load` response body.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedCart {
    pub cart_items: Vec<CartItemView>,
    pub cart_total: Decimal,
}

/// A submitted or past order, labelled for display.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub order_number: OrderNumber,
    pub items: Vec<CartItemView>,
    pub order_total: Decimal,
}

impl OrderView {
    /// Label every line of `order` with `label_for`.
    #[must_use]
    pub fn new(order: Order, mut label_for: impl FnMut(IngredientId) -> IngredientLabel) -> Self {
        Self {
            order_number: order.order_number,
            items: order
                .items
                .into_iter()
                .map(|line| {
                    let label = label_for(line.item.identifier);
                    CartItemView::new(line, label)
                })
                .collect(),
            order_total: order.order_total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_cart_line_accepts_numeric_and_string_prices() {
        let line: CartLine =
            serde_json::from_str(r#"{"id": 9003, "count": 2, "price": 1.50}"#).unwrap();
        assert_eq!(line.price, dec!(1.50));

        let line: CartLine =
            serde_json::from_str(r#"{"id": 9003, "count": 2, "price": "0.99"}"#).unwrap();
        assert_eq!(line.price, dec!(0.99));
    }

    #[test]
    fn test_missing_cart_is_empty() {
        let body: LoadCartRequest = serde_json::from_str("{}").unwrap();
        assert!(body.cart.is_empty());
    }

    #[test]
    fn test_fallback_label() {
        let label = IngredientLabel::fallback(IngredientId::new(42));
        assert_eq!(label.name, "Ingredient 42");
        assert!(label.image.is_none());
    }

    #[test]
    fn test_item_view_copies_line() {
        let item = LineItem::new(IngredientId::new(1), 3, dec!(0.99));
        let line = PricedLine {
            item,
            line_total: dec!(2.97),
        };
        let view = CartItemView::new(
            line,
            IngredientLabel {
                name: "egg".to_string(),
                image: None,
            },
        );

        assert_eq!(view.count, 3);
        assert_eq!(view.total, dec!(2.97));
        assert_eq!(view.name, "egg");
    }

    #[test]
    fn test_order_view_uses_cart_item_shape() {
        let order = Order::from_items(
            OrderNumber::FIRST,
            vec![
                LineItem::new(IngredientId::new(9003), 2, dec!(1.50)),
                LineItem::new(IngredientId::new(11215), 3, dec!(0.99)),
            ],
        );
        let view = OrderView::new(order, IngredientLabel::fallback);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["order_number"], 1);
        assert_eq!(json["order_total"], "5.97");

        let first = &json["items"][0];
        assert_eq!(first["id"], 9003);
        assert_eq!(first["name"], "Ingredient 9003");
        assert_eq!(first["count"], 2);
        assert_eq!(first["total"], "3.00");
        assert!(first.get("identifier").is_none());
        assert!(first.get("line_total").is_none());
    }
}

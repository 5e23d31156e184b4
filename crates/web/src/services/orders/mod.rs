//! Order service.
//!
//! Thin adapter between the HTTP layer and the pricing engine in
//! `sous_chef_core::pricing`: it feeds the engine line items from the client
//! or the database and labels the results with recipe API metadata.

mod error;

pub use error::OrderError;

use sqlx::PgPool;
use tracing::{info, instrument};

use sous_chef_core::{
    IngredientId, LineItem, Order, UserId, aggregate_history, next_order_number, price_cart,
};

use super::ingredients::{LabelName, label_for, labels};
use crate::db::OrderRepository;
use crate::db::orders::{insert_order, lock_user, order_numbers};
use crate::models::cart::{CartItemView, CartLine, LoadedCart, OrderView};
use crate::spoonacular::RecipeClient;

/// Order service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
    recipes: &'a RecipeClient,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, recipes: &'a RecipeClient) -> Self {
        Self { pool, recipes }
    }

    /// Price a cart and label each line.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Pricing` if any line has a non-positive count or
    /// a negative price.
    #[instrument(skip(self, cart), fields(lines = cart.len()))]
    pub async fn load_cart(&self, cart: &[CartLine]) -> Result<LoadedCart, OrderError> {
        let items: Vec<LineItem> = cart.iter().copied().map(LineItem::from).collect();
        let priced = price_cart(&items)?;

        let ids = priced.items.iter().map(|line| line.item.identifier).collect();
        let labels = labels(self.recipes, ids, LabelName::Canonical).await;

        let cart_items = priced
            .items
            .into_iter()
            .map(|line| {
                let label = label_for(&labels, line.item.identifier);
                CartItemView::new(line, label)
            })
            .collect();

        Ok(LoadedCart {
            cart_items,
            cart_total: priced.cart_total,
        })
    }

    /// Validate and persist an order, stamped with the user's next order number.
    ///
    /// The user's row is locked for the whole transaction, so two concurrent
    /// submissions by the same user are numbered one after the other. The
    /// result is labelled the same way as [`Self::history`].
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyOrder` if there are no lines.
    /// Returns `OrderError::Pricing` if a line is invalid or the user has
    /// run out of order numbers.
    /// Returns `OrderError::Repository` if the user is missing or the insert
    /// conflicts.
    #[instrument(skip(self, order), fields(user_id = %user_id, lines = order.len()))]
    pub async fn submit(
        &self,
        user_id: UserId,
        order: &[CartLine],
    ) -> Result<OrderView, OrderError> {
        if order.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let items: Vec<LineItem> = order.iter().copied().map(LineItem::from).collect();
        // Reject bad lines before touching the database.
        price_cart(&items)?;

        let mut tx = self.pool.begin().await?;
        lock_user(&mut tx, user_id).await?;
        let existing = order_numbers(&mut tx, user_id).await?;
        let order_number = next_order_number(existing)?;
        insert_order(&mut tx, user_id, order_number, &items).await?;
        tx.commit().await?;

        info!(%order_number, "Order submitted");
        let order = Order::from_items(order_number, items);
        let ids = line_ids([&order]);
        let labels = labels(self.recipes, ids, LabelName::Original).await;
        Ok(OrderView::new(order, |id| label_for(&labels, id)))
    }

    /// The user's past orders, newest first, with ingredient labels.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the order lines can't be loaded.
    #[instrument(skip(self))]
    pub async fn history(&self, user_id: UserId) -> Result<Vec<OrderView>, OrderError> {
        let lines = OrderRepository::new(self.pool).lines_for_user(user_id).await?;
        Ok(self.label_orders(aggregate_history(lines)).await)
    }

    /// Attach `originalName` labels to every line of `orders`.
    async fn label_orders(&self, orders: Vec<Order>) -> Vec<OrderView> {
        let ids = line_ids(&orders);
        let labels = labels(self.recipes, ids, LabelName::Original).await;

        orders
            .into_iter()
            .map(|order| OrderView::new(order, |id| label_for(&labels, id)))
            .collect()
    }
}

/// Every ingredient ID across `orders`, duplicates included.
fn line_ids<'o>(orders: impl IntoIterator<Item = &'o Order>) -> Vec<IngredientId> {
    orders
        .into_iter()
        .flat_map(|order| &order.items)
        .map(|line| line.item.identifier)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use sous_chef_core::OrderNumber;

    use super::*;

    #[test]
    fn test_line_ids_spans_all_orders() {
        let first = Order::from_items(
            OrderNumber::FIRST,
            vec![LineItem::new(IngredientId::new(1), 1, dec!(1.00))],
        );
        let second = Order::from_items(
            OrderNumber::FIRST.checked_next().unwrap(),
            vec![
                LineItem::new(IngredientId::new(2), 1, dec!(2.00)),
                LineItem::new(IngredientId::new(1), 4, dec!(1.00)),
            ],
        );

        assert_eq!(
            line_ids([&second, &first]),
            [2, 1, 1].map(IngredientId::new)
        );
    }
}

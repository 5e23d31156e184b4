//! Order repository.
//!
//! Submission is split into steps that run on one connection so the caller
//! can hold them in a single transaction:
//!
//! 1. [`lock_user`] - `SELECT ... FOR UPDATE` on the user's row
//! 2. [`order_numbers`] - the user's existing order numbers
//! 3. [`insert_order`] - the header and its lines
//!
//! The `UNIQUE (user_id, order_number)` constraint backs the lock up; a
//! violation surfaces as `RepositoryError::Conflict`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use sous_chef_core::{IngredientId, LineItem, OrderId, OrderLine, OrderNumber, UserId};

use super::RepositoryError;

/// Message for a concurrent submission that lost the race.
pub const ORDER_NUMBER_TAKEN: &str = "order number already in use, please resubmit";

#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    order_number: OrderNumber,
    ingredient_id: IngredientId,
    ingredient_count: i32,
    ingredient_price: Decimal,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            order_number: row.order_number,
            item: LineItem::new(row.ingredient_id, row.ingredient_count, row.ingredient_price),
        }
    }
}

/// Lock the user's row until the surrounding transaction ends.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the user doesn't exist.
pub async fn lock_user(conn: &mut PgConnection, user_id: UserId) -> Result<(), RepositoryError> {
    sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(conn)
        .await?
        .map(|_| ())
        .ok_or(RepositoryError::NotFound)
}

/// The user's existing order numbers, in no particular order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn order_numbers(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Vec<OrderNumber>, RepositoryError> {
    let numbers: Vec<OrderNumber> =
        sqlx::query_scalar("SELECT order_number FROM orders WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(conn)
            .await?;
    Ok(numbers)
}

/// Insert an order header and its lines, in order.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the order number is already taken.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert_order(
    conn: &mut PgConnection,
    user_id: UserId,
    order_number: OrderNumber,
    items: &[LineItem],
) -> Result<OrderId, RepositoryError> {
    let order_id: OrderId = sqlx::query_scalar(
        r"
        INSERT INTO orders (user_id, order_number)
        VALUES ($1, $2)
        RETURNING id
        ",
    )
    .bind(user_id)
    .bind(order_number)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| RepositoryError::conflict_on_unique(e, ORDER_NUMBER_TAKEN))?;

    for (position, item) in (1_i32..).zip(items) {
        sqlx::query(
            r"
            INSERT INTO order_lines
                (order_id, position, ingredient_id, ingredient_count, ingredient_price)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(order_id)
        .bind(position)
        .bind(item.identifier)
        .bind(item.unit_count)
        .bind(item.unit_price)
        .execute(&mut *conn)
        .await?;
    }

    debug!(%order_id, %order_number, lines = items.len(), "Inserted order");
    Ok(order_id)
}

/// Repository for reading order history.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every order line the user has submitted, tagged with its order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored order number is not
    /// positive or an order's total is out of `Decimal` range.
    #[instrument(skip(self))]
    pub async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<OrderLine>, RepositoryError> {
        let rows: Vec<OrderLineRow> = sqlx::query_as(
            r"
            SELECT o.order_number, l.ingredient_id, l.ingredient_count, l.ingredient_price
            FROM order_lines l
            JOIN orders o ON o.id = l.order_id
            WHERE o.user_id = $1
            ORDER BY o.order_number, l.position
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::ColumnDecode { .. } => {
                RepositoryError::DataCorruption(format!("invalid order line in database: {e}"))
            }
            other => RepositoryError::Database(other),
        })?;

        let lines: Vec<OrderLine> = rows.into_iter().map(OrderLine::from).collect();
        check_order_totals(&lines)?;
        Ok(lines)
    }
}

/// Reject stored lines whose order total doesn't fit in a `Decimal`.
fn check_order_totals(lines: &[OrderLine]) -> Result<(), RepositoryError> {
    let mut totals: HashMap<OrderNumber, Decimal> = HashMap::new();

    for line in lines {
        let total = totals.entry(line.order_number).or_default();
        let current = *total;
        *total = line
            .item
            .checked_subtotal()
            .and_then(|subtotal| current.checked_add(subtotal))
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "order {} total out of range",
                    line.order_number
                ))
            })?;
    }

    Ok(())
}

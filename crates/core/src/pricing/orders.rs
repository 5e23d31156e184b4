//! Order numbering and order-history aggregation.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{LineItem, PricedLine, PricingError};
use crate::round_currency;

/// Error returned when an order number is not positive.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("order number must be positive (got {0})")]
pub struct InvalidOrderNumber(pub i32);

/// Per-user sequential order number, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct OrderNumber(i32);

impl OrderNumber {
    /// The number given to a user's first order.
    pub const FIRST: Self = Self(1);

    /// Create an order number.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOrderNumber`] if `value` is zero or negative.
    pub const fn new(value: i32) -> Result<Self, InvalidOrderNumber> {
        if value <= 0 {
            return Err(InvalidOrderNumber(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// The number after this one, or `None` at `i32::MAX`.
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for OrderNumber {
    type Error = InvalidOrderNumber;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderNumber> for i32 {
    fn from(number: OrderNumber) -> Self {
        number.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for OrderNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for OrderNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(raw)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for OrderNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

/// A persisted line item tagged with the order it was submitted in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The order this line belongs to.
    pub order_number: OrderNumber,
    /// What was bought.
    #[serde(flatten)]
    pub item: LineItem,
}

/// A submitted order: the lines sent together, with their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Per-user sequential number.
    pub order_number: OrderNumber,
    /// Lines in submission order.
    pub items: Vec<PricedLine>,
    /// Sum of `unit_count * unit_price` over all lines, rounded once to cents.
    pub order_total: Decimal,
}

impl Order {
    /// Build an order from its line items, computing line and order totals.
    ///
    /// Totals clamp at `Decimal::MAX` instead of failing. Callers holding
    /// untrusted lines check them with [`LineItem::checked_subtotal`] first.
    #[must_use]
    pub fn from_items(order_number: OrderNumber, items: Vec<LineItem>) -> Self {
        let raw_total = items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.subtotal()));

        Self {
            order_number,
            items: items.into_iter().map(PricedLine::from_item).collect(),
            order_total: round_currency(raw_total),
        }
    }
}

/// Allocate the next order number for a user.
///
/// Returns [`OrderNumber::FIRST`] when the user has no prior orders, otherwise
/// one more than the highest existing number. Gaps are never filled.
///
/// This is only the computation. The caller must read the existing numbers and
/// insert the new order in the same transaction.
///
/// # Errors
///
/// Returns [`PricingError::OrderNumberExhausted`] if the highest existing
/// number is `i32::MAX`.
///
/// # Example
///
/// ```
/// use sous_chef_core::{OrderNumber, next_order_number};
///
/// let existing = [3, 7].map(|n| OrderNumber::new(n).unwrap());
/// assert_eq!(next_order_number(existing).unwrap().get(), 8);
/// assert_eq!(next_order_number([]).unwrap(), OrderNumber::FIRST);
/// ```
pub fn next_order_number<I>(existing: I) -> Result<OrderNumber, PricingError>
where
    I: IntoIterator<Item = OrderNumber>,
{
    match existing.into_iter().max() {
        None => Ok(OrderNumber::FIRST),
        Some(last) => last
            .checked_next()
            .ok_or(PricingError::OrderNumberExhausted { last }),
    }
}

/// Regroup a user's flat order-line records into orders, newest first.
///
/// Lines are grouped by `order_number`, keeping their relative input order
/// within each group. Only numbers that actually occur are emitted, so gaps in
/// the sequence produce no empty orders. Each order total is the rounded sum of
/// the unrounded line subtotals.
///
/// Records are assumed to have been validated when the order was submitted;
/// this function never fails.
#[must_use]
pub fn aggregate_history<I>(records: I) -> Vec<Order>
where
    I: IntoIterator<Item = OrderLine>,
{
    let mut groups: BTreeMap<OrderNumber, Vec<LineItem>> = BTreeMap::new();
    for record in records {
        groups.entry(record.order_number).or_default().push(record.item);
    }

    groups
        .into_iter()
        .rev()
        .map(|(order_number, items)| Order::from_items(order_number, items))
        .collect()
}

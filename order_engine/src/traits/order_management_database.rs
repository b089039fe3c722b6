use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderId, OrderStatus},
    order_objects::{FullOrder, OrderQueryFilter},
};

/// The storage contract for the order lifecycle engine.
///
/// Consistency relies entirely on the implementation's transaction and row-update semantics: the
/// engine holds no locks of its own.
#[allow(async_fn_in_trait)]
pub trait OrderManagementDatabase: Clone {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Persists the order header and then all of its items inside a single atomic transaction.
    ///
    /// Commits only after every write succeeds; any failure before the commit rolls the whole
    /// transaction back, leaving no partial state. Returns the persisted header row.
    async fn insert_full_order(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<Order, OrderDatabaseError>;

    /// Fetches a single order with its items eagerly loaded. Read-only.
    async fn fetch_full_order(&self, id: &OrderId) -> Result<Option<FullOrder>, OrderDatabaseError>;

    /// Fetches a page of orders (with items) matching the filter, sorted by creation time
    /// descending.
    async fn search_orders(
        &self,
        query: OrderQueryFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<FullOrder>, OrderDatabaseError>;

    /// Counts every order matching the filter, independent of pagination.
    async fn count_orders(&self, query: OrderQueryFilter) -> Result<i64, OrderDatabaseError>;

    /// Sets the status on a single order as one row update, refreshing `updated_at` and, when
    /// `updated_by` is given, recording who made the change.
    ///
    /// There is no isolation guard around this write: two concurrent transitions on the same
    /// order race and the last write wins.
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        updated_by: Option<&str>,
    ) -> Result<Order, OrderDatabaseError>;

    /// Fetches every order currently in the given status, oldest first.
    async fn fetch_orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderDatabaseError>;

    /// Writes the given status onto every listed order in one bulk statement, stamping all rows
    /// with the same `updated_at`. Returns the updated rows.
    async fn bulk_update_status(
        &self,
        ids: &[OrderId],
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderDatabaseError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), OrderDatabaseError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderDatabaseError {
    #[error("We have an internal database engine problem: {0}")]
    DatabaseError(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
}

impl From<sqlx::Error> for OrderDatabaseError {
    fn from(e: sqlx::Error) -> Self {
        OrderDatabaseError::DatabaseError(e.to_string())
    }
}

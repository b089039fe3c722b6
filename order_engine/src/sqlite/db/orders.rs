use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};
use uuid::Uuid;

use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderStatus},
    order_objects::OrderQueryFilter,
    traits::OrderDatabaseError,
};

/// Inserts a new order header using the given connection. This is not atomic on its own. Embed
/// this call inside a transaction and pass `&mut *tx` as the connection argument to make the
/// header and its items one atomic write.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderDatabaseError> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (id, customer_name, customer_email, status, total, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *;
        "#,
    )
    .bind(order.id)
    .bind(order.customer_name)
    .bind(order.customer_email)
    .bind(OrderStatus::Pending.to_string())
    .bind(order.total)
    .bind(order.created_by)
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    Ok(order)
}

/// Inserts the line items for the given order. Not atomic on its own; see [`insert_order`].
pub async fn insert_order_items(
    order_id: &OrderId,
    items: Vec<NewOrderItem>,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, OrderDatabaseError> {
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        let row: OrderItem = sqlx::query_as(
            r#"
                INSERT INTO order_items (id, order_id, product_id, name, quantity, price)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *;
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(order_id.as_str())
        .bind(item.product_id)
        .bind(item.name)
        .bind(item.quantity)
        .bind(item.price)
        .fetch_one(&mut *conn)
        .await?;
        result.push(row);
    }
    Ok(result)
}

pub async fn fetch_order_by_id(id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Returns the items for a single order, in insertion order.
pub async fn fetch_items_for_order(
    id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY rowid")
        .bind(id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// Returns the items for every listed order in one round trip, in insertion order.
pub async fn fetch_items_for_orders(
    ids: &[OrderId],
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT * FROM order_items WHERE order_id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.as_str());
    }
    builder.push(") ORDER BY rowid");
    let items = builder.build_query_as::<OrderItem>().fetch_all(conn).await?;
    Ok(items)
}

/// Fetches one page of order headers matching the filter, most recently created first.
pub async fn search_orders(
    query: OrderQueryFilter,
    offset: i64,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM orders ");
    if let Some(status) = query.status {
        builder.push("WHERE status = ");
        builder.push_bind(status.to_string());
    }
    builder.push(" ORDER BY created_at DESC LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("🗃️ Result of search_orders: {:?}", orders.len());
    Ok(orders)
}

/// Counts every order matching the filter, independent of any pagination window.
pub async fn count_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM orders ");
    if let Some(status) = query.status {
        builder.push("WHERE status = ");
        builder.push_bind(status.to_string());
    }
    let count: i64 = builder.build_query_scalar().fetch_one(conn).await?;
    Ok(count)
}

pub(crate) async fn update_order_status(
    id: &OrderId,
    status: OrderStatus,
    updated_by: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderDatabaseError> {
    let result: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders
            SET status = $1, updated_at = $2, updated_by = COALESCE($3, updated_by)
            WHERE id = $4
            RETURNING *;
        "#,
    )
    .bind(status.to_string())
    .bind(Utc::now())
    .bind(updated_by)
    .bind(id.as_str())
    .fetch_optional(conn)
    .await?;
    result.ok_or_else(|| OrderDatabaseError::OrderNotFound(id.clone()))
}

pub async fn fetch_orders_by_status(
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE status = $1 ORDER BY created_at ASC")
        .bind(status.to_string())
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

/// Writes the status onto every listed order in one statement, all rows stamped with the same
/// `updated_at`. The id list is taken as-is; rows whose status changed since the caller read
/// them are overwritten regardless (last write wins).
pub(crate) async fn bulk_update_status(
    ids: &[OrderId],
    status: OrderStatus,
    updated_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, OrderDatabaseError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("UPDATE orders SET status = ");
    builder.push_bind(status.to_string());
    builder.push(", updated_at = ");
    builder.push_bind(updated_at);
    builder.push(" WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.as_str());
    }
    builder.push(") RETURNING *");
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    Ok(orders)
}

//! `SqliteDatabase` is a concrete implementation of an order engine backend.
//!
//! Unsurprisingly, it uses SQLite as the storage engine and implements the trait defined in the
//! [`crate::traits`] module.
use std::{collections::HashMap, fmt::Debug};

use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, new_pool, orders};
use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderStatus},
    order_objects::{FullOrder, OrderQueryFilter},
    traits::{OrderDatabaseError, OrderManagementDatabase},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderManagementDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_full_order(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<Order, OrderDatabaseError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        let items = orders::insert_order_items(&order.id, items, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order [{}] saved with {} items", order.id, items.len());
        Ok(order)
    }

    async fn fetch_full_order(&self, id: &OrderId) -> Result<Option<FullOrder>, OrderDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let order = match orders::fetch_order_by_id(id, &mut conn).await? {
            Some(order) => order,
            None => return Ok(None),
        };
        let items = orders::fetch_items_for_order(id, &mut conn).await?;
        Ok(Some(FullOrder { order, items }))
    }

    async fn search_orders(
        &self,
        query: OrderQueryFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<FullOrder>, OrderDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let headers = orders::search_orders(query, offset, limit, &mut conn).await?;
        let ids = headers.iter().map(|o| o.id.clone()).collect::<Vec<OrderId>>();
        let items = orders::fetch_items_for_orders(&ids, &mut conn).await?;
        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id.clone()).or_default().push(item);
        }
        let result = headers
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                FullOrder { order, items }
            })
            .collect();
        Ok(result)
    }

    async fn count_orders(&self, query: OrderQueryFilter) -> Result<i64, OrderDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let count = orders::count_orders(query, &mut conn).await?;
        Ok(count)
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        updated_by: Option<&str>,
    ) -> Result<Order, OrderDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order_status(id, status, updated_by, &mut conn).await
    }

    async fn fetch_orders_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let result = orders::fetch_orders_by_status(status, &mut conn).await?;
        Ok(result)
    }

    async fn bulk_update_status(
        &self,
        ids: &[OrderId],
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        orders::bulk_update_status(ids, status, updated_at, &mut conn).await
    }

    async fn close(&mut self) -> Result<(), OrderDatabaseError> {
        self.pool.close().await;
        Ok(())
    }
}

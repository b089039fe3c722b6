use std::fmt::Debug;

use chrono::Utc;
use log::*;
use ome_common::{compute_total, Money};

use crate::{
    db_types::{NewOrder, NewOrderItem, Order, OrderId, OrderStatus},
    order_api::errors::OrderLifecycleError,
    order_objects::{CreateOrderRequest, FullOrder, ItemRequest, OrderPage, OrderQueryFilter},
    traits::{OrderDatabaseError, OrderManagementDatabase},
};

/// The largest page size `fetch_orders` will serve; larger requests are clamped down to this.
pub const MAX_PAGE_SIZE: i64 = 100;

pub struct OrderLifecycleApi<B> {
    db: B,
}

impl<B> Debug for OrderLifecycleApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderLifecycleApi")
    }
}

impl<B> OrderLifecycleApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderLifecycleApi<B>
where B: OrderManagementDatabase
{
    /// Creates a new order with its line items in one atomic operation.
    ///
    /// The whole item batch is validated up front, in index order, before anything is written;
    /// the first failing index is reported. On success the order starts out `Pending`, its total
    /// is the sum of `quantity × unit price` over the items, and the freshly re-read aggregate
    /// is returned.
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<FullOrder, OrderLifecycleError> {
        if request.customer.name.trim().is_empty() || request.customer.email.trim().is_empty() {
            return Err(OrderLifecycleError::InvalidRequest(
                "customer name and customer email is required".to_string(),
            ));
        }
        if request.items.is_empty() {
            return Err(OrderLifecycleError::InvalidRequest("at least one item is required".to_string()));
        }
        let items = validate_items(&request.items)?;
        let total = compute_total(items.iter().map(|it| (it.quantity, it.price)));
        let order = NewOrder::new(request.customer.name.clone(), request.customer.email.clone(), total);
        let order_id = order.id.clone();
        let item_count = items.len();
        let inserted = self.db.insert_full_order(order, items).await.map_err(|e| {
            error!("🔄️ Failed to create order: {e}");
            OrderLifecycleError::Internal("Unable to create order".to_string())
        })?;
        info!("🔄️ Order created successfully (order_id={}, items={item_count})", inserted.id);
        self.fetch_order(&order_id).await
    }

    /// Returns the order with its items eagerly loaded. Read-only; `updated_at` is untouched.
    pub async fn fetch_order(&self, id: &OrderId) -> Result<FullOrder, OrderLifecycleError> {
        let full = self.db.fetch_full_order(id).await.map_err(|e| {
            error!("🔄️ Failed to fetch order {id}: {e}");
            OrderLifecycleError::Internal("Unable to fetch order details".to_string())
        })?;
        full.ok_or_else(|| OrderLifecycleError::OrderNotFound(id.clone()))
    }

    /// Returns a page of orders, most recent first, optionally filtered by status.
    ///
    /// Pages below 1 are clamped to 1 and the limit is clamped to `[1, MAX_PAGE_SIZE]`. The
    /// reported page count has a floor of one page even when nothing matches.
    pub async fn fetch_orders(
        &self,
        status: Option<OrderStatus>,
        page: i64,
        limit: i64,
    ) -> Result<OrderPage, OrderLifecycleError> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let mut query = OrderQueryFilter::default();
        if let Some(status) = status {
            query = query.with_status(status);
        }
        let total = self
            .db
            .count_orders(query.clone())
            .await
            .map_err(|e| opaque("Unable to fetch order list", e))?;
        let data = self
            .db
            .search_orders(query, (page - 1) * limit, limit)
            .await
            .map_err(|e| opaque("Unable to fetch order list", e))?;
        debug!("🔄️ fetch_orders returned {} records out of total {total}", data.len());
        let total_pages = ((total + limit - 1) / limit).max(1);
        Ok(OrderPage { data, total, page, limit, total_pages })
    }

    /// Moves the order to `next_status`, recording who made the change.
    ///
    /// Terminal orders (`Cancelled`, `Delivered`) reject every transition. Beyond that the
    /// target is deliberately unconstrained: any non-terminal order may move to any member of
    /// the enumeration, backward moves included.
    pub async fn update_status(
        &self,
        id: &OrderId,
        next_status: OrderStatus,
        updated_by: &str,
    ) -> Result<FullOrder, OrderLifecycleError> {
        let current = self.fetch_order(id).await?;
        if current.order.status.is_terminal() {
            return Err(OrderLifecycleError::InvalidRequest(format!(
                "Cannot change status from {}",
                current.order.status
            )));
        }
        let order = self.write_status(id, next_status, Some(updated_by)).await?;
        info!("🔄️ Order {id} status updated to {next_status} by {updated_by}");
        Ok(FullOrder { order, items: current.items })
    }

    /// Cancels a pending order. Cancellation is a status change; nothing is deleted.
    pub async fn cancel_order(&self, id: &OrderId) -> Result<FullOrder, OrderLifecycleError> {
        let current = self.fetch_order(id).await?;
        if current.order.status != OrderStatus::Pending {
            return Err(OrderLifecycleError::InvalidRequest(
                "Only pending orders can be cancelled".to_string(),
            ));
        }
        let order = self.write_status(id, OrderStatus::Cancelled, None).await?;
        info!("🔄️ Order {id} cancelled successfully");
        Ok(FullOrder { order, items: current.items })
    }

    /// Promotes every `Pending` order to `Processing` in one bulk write, stamping the whole
    /// batch with a single shared timestamp. A no-op when nothing is pending.
    ///
    /// The read and the write are two separate calls with no transaction spanning them, so a
    /// single-order transition landing in between can be overwritten by the bulk write. There
    /// is no version column to detect the lost update; last write wins.
    pub async fn promote_pending(&self) -> Result<Vec<Order>, OrderLifecycleError> {
        let pending = self
            .db
            .fetch_orders_by_status(OrderStatus::Pending)
            .await
            .map_err(|e| opaque("Unable to promote pending orders", e))?;
        if pending.is_empty() {
            debug!("🔄️ No pending orders found");
            return Ok(Vec::new());
        }
        let now = Utc::now();
        let ids = pending.iter().map(|o| o.id.clone()).collect::<Vec<OrderId>>();
        let promoted = self
            .db
            .bulk_update_status(&ids, OrderStatus::Processing, now)
            .await
            .map_err(|e| opaque("Unable to promote pending orders", e))?;
        info!("🔄️ Promoted {} orders to {}", promoted.len(), OrderStatus::Processing);
        Ok(promoted)
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    async fn write_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        updated_by: Option<&str>,
    ) -> Result<Order, OrderLifecycleError> {
        match self.db.update_order_status(id, status, updated_by).await {
            Ok(order) => Ok(order),
            Err(OrderDatabaseError::OrderNotFound(id)) => Err(OrderLifecycleError::OrderNotFound(id)),
            Err(e) => Err(opaque("Unable to update order status", e)),
        }
    }
}

/// Logs the real cause and hands the caller an opaque message instead.
fn opaque(context: &str, e: OrderDatabaseError) -> OrderLifecycleError {
    error!("🔄️ {context}: {e}");
    OrderLifecycleError::Internal(context.to_string())
}

fn validate_items(items: &[ItemRequest]) -> Result<Vec<NewOrderItem>, OrderLifecycleError> {
    let mut validated = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        if item.product_id.trim().is_empty() {
            return Err(OrderLifecycleError::InvalidRequest(format!("items[{idx}].productId required")));
        }
        if item.quantity <= 0 {
            return Err(OrderLifecycleError::InvalidRequest(format!("items[{idx}].quantity must be > 0")));
        }
        let price: Money = item
            .price
            .parse()
            .map_err(|_| OrderLifecycleError::InvalidRequest(format!("items[{idx}].price must be numeric")))?;
        validated.push(NewOrderItem {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            price,
        });
    }
    Ok(validated)
}

#[cfg(test)]
mod test {
    use super::validate_items;
    use crate::order_objects::ItemRequest;

    fn item(product_id: &str, quantity: i64, price: &str) -> ItemRequest {
        ItemRequest {
            product_id: product_id.to_string(),
            name: None,
            quantity,
            price: price.to_string(),
        }
    }

    #[test]
    fn reports_the_first_failing_index() {
        let items = vec![item("p1", 1, "1.00"), item("", 1, "1.00"), item("p3", 0, "oops")];
        let err = validate_items(&items).unwrap_err();
        assert_eq!(err.to_string(), "items[1].productId required");
    }

    #[test]
    fn checks_run_in_field_order_within_an_item() {
        let items = vec![item("p1", 0, "not-a-number")];
        let err = validate_items(&items).unwrap_err();
        assert_eq!(err.to_string(), "items[0].quantity must be > 0");
    }

    #[test]
    fn a_valid_batch_parses_prices() {
        let items = vec![item("p1", 2, "10.00"), item("p2", 1, "0.05")];
        let validated = validate_items(&items).unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(validated[0].price.value(), 1000);
        assert_eq!(validated[1].price.value(), 5);
    }
}

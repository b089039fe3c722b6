use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderItem, OrderStatus};

//--------------------------------------      FullOrder        -------------------------------------------------------
/// An order header together with its line items. This is the aggregate every read operation
/// returns; the flattened serde representation keeps the wire shape of a single order object
/// with an embedded `items` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullOrder {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

//--------------------------------------  CreateOrderRequest   -------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
}

/// A single requested line item. The price arrives as a decimal string and is only parsed into
/// [`ome_common::Money`] during validation, so a non-numeric price is a client error rather than
/// a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub product_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer: CustomerDetails,
    pub items: Vec<ItemRequest>,
}

impl CreateOrderRequest {
    pub fn new<N: Into<String>, E: Into<String>>(name: N, email: E) -> Self {
        Self {
            customer: CustomerDetails { name: name.into(), email: email.into() },
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, product_id: &str, quantity: i64, price: &str) -> Self {
        self.items.push(ItemRequest {
            product_id: product_id.to_string(),
            name: None,
            quantity,
            price: price.to_string(),
        });
        self
    }
}

//--------------------------------------   OrderQueryFilter    -------------------------------------------------------
/// Criteria for bulk order reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQueryFilter {
    pub status: Option<OrderStatus>,
}

impl OrderQueryFilter {
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
    }
}

//--------------------------------------      OrderPage        -------------------------------------------------------
/// One page of orders plus the pagination bookkeeping the caller needs for display.
///
/// `total` counts every matching order independent of pagination, and `total_pages` never drops
/// below 1, so an empty result still renders as a single empty page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    pub data: Vec<FullOrder>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use ome_common::Money;

    use super::FullOrder;
    use crate::db_types::{Order, OrderId, OrderItem, OrderStatus};

    #[test]
    fn full_order_serializes_flat_with_camel_case_keys() {
        let id = OrderId::random();
        let order = Order {
            id: id.clone(),
            customer_name: "A".to_string(),
            customer_email: "a@x.com".to_string(),
            status: OrderStatus::Pending,
            total: Money::from_cents(2000),
            created_by: "a@x.com".to_string(),
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let items = vec![OrderItem {
            id: "item-1".to_string(),
            order_id: id,
            product_id: "p1".to_string(),
            name: None,
            quantity: 2,
            price: Money::from_cents(1000),
        }];
        let json = serde_json::to_value(FullOrder { order, items }).unwrap();
        assert_eq!(json["customerName"], "A");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["total"], "20.00");
        assert_eq!(json["items"][0]["productId"], "p1");
        assert_eq!(json["items"][0]["price"], "10.00");
    }
}

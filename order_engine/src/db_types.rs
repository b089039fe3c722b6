use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use ome_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use uuid::Uuid;

//--------------------------------------        OrderId        -------------------------------------------------------
/// An opaque, immutable order identifier, assigned by the engine at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Generates a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------      OrderStatus      -------------------------------------------------------
/// The fixed set of states an order moves through.
///
/// The natural progression is `Pending → Processing → Shipped → Delivered`, with `Cancelled`
/// reachable only from `Pending`. `Cancelled` and `Delivered` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// The order is newly created and has not been picked up for fulfilment.
    Pending,
    /// The order is being prepared.
    Processing,
    /// The order has left the warehouse.
    Shipped,
    /// The order reached the customer. Terminal.
    Delivered,
    /// The order was cancelled while still pending. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Terminal states reject every outgoing transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Delivered)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Processing => write!(f, "Processing"),
            OrderStatus::Shipped => write!(f, "Shipped"),
            OrderStatus::Delivered => write!(f, "Delivered"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Order          -------------------------------------------------------
/// An order header row. Line items live in [`OrderItem`] and are joined on demand.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    /// Sum of `quantity × unit price` over the items, fixed at creation time.
    pub total: Money,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       OrderItem       -------------------------------------------------------
/// A single line item. Items are created together with their order and are immutable thereafter.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: OrderId,
    pub product_id: String,
    pub name: Option<String>,
    pub quantity: i64,
    pub price: Money,
}

//--------------------------------------       NewOrder        -------------------------------------------------------
/// A validated order header, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub total: Money,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(customer_name: String, customer_email: String, total: Money) -> Self {
        let created_by = customer_email.clone();
        Self {
            id: OrderId::random(),
            customer_name,
            customer_email,
            total,
            created_by,
            created_at: Utc::now(),
        }
    }
}

//--------------------------------------     NewOrderItem      -------------------------------------------------------
/// A validated line item, ready for insertion alongside its order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: String,
    pub name: Option<String>,
    pub quantity: i64,
    pub price: Money,
}

#[cfg(test)]
mod test {
    use super::{OrderId, OrderStatus};

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!("PENDING".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert_eq!("Cancelled".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("on-hold".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn only_cancelled_and_delivered_are_terminal() {
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Processing.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn status_serializes_in_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&OrderStatus::Pending).unwrap(), "\"PENDING\"");
    }

    #[test]
    fn random_order_ids_are_unique() {
        assert_ne!(OrderId::random(), OrderId::random());
    }
}

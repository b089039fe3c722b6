use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Clone, Error)]
pub enum OrderLifecycleError {
    /// Malformed input or an illegal state transition. The message is safe to surface to the
    /// caller and is never retried automatically.
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),
    /// A failure below the API. The underlying cause is logged; the message here is deliberately
    /// opaque so that internals never leak to the caller.
    #[error("{0}")]
    Internal(String),
}

//! Order Lifecycle Engine
//!
//! This library contains the core logic for managing customer orders: creation with line items,
//! status progression, cancellation, paginated retrieval and the bulk promotion of pending
//! orders. It is storage-agnostic.
//!
//! The library is divided into two main sections:
//! 1. The persistence gateway contract ([`mod@traits`]). Backends implement
//!    [`OrderManagementDatabase`] to provide atomic multi-row writes, eager-join reads and
//!    filtered, paginated bulk reads. An SQLite implementation ships behind the `sqlite` feature.
//!    You should never need to touch the database directly; the data types it traffics in are
//!    defined in the [`db_types`] module and are public.
//! 2. The order lifecycle API ([`OrderLifecycleApi`]). This is the public-facing surface of the
//!    engine, responsible for validating requests, guarding state transitions and keeping order
//!    totals consistent with their line items.

pub mod db_types;
mod order_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use order_api::{errors::OrderLifecycleError, order_objects, OrderLifecycleApi};

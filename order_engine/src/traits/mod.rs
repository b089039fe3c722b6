//! # Persistence gateway contract.
//!
//! This module defines the interface that database backends must expose in order to act as
//! storage for the order lifecycle engine.
//!
//! [`OrderManagementDatabase`] covers the four shapes of access the engine needs: an atomic
//! multi-row insert for an order and its items, a single-order read with items eagerly joined, a
//! filtered/sorted/paginated read with an independent total count, and a bulk read-by-status with
//! a matching bulk write. The engine never issues queries outside of these shapes, so any engine
//! offering these primitives is substitutable.

mod order_management_database;

pub use order_management_database::{OrderDatabaseError, OrderManagementDatabase};

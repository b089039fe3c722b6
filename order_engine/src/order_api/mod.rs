//! # Order lifecycle manager
//!
//! The public API of the engine. [`OrderLifecycleApi`] orchestrates creation, lookup, listing,
//! status transitions, cancellation and the bulk promotion of pending orders over an injected
//! [`crate::traits::OrderManagementDatabase`] backend.

pub mod api;
pub mod errors;
pub mod order_objects;

pub use api::OrderLifecycleApi;

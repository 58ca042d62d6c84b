//! Orders
//!
//! - [`cart`] - session cart, not yet persisted
//! - [`lifecycle`] - submission and status transitions
//! - [`queries`] - detail, listing and kitchen queue
//! - [`money`] - decimal arithmetic for prices and totals
//! - [`error`] - domain error taxonomy

pub mod cart;
pub mod error;
pub mod lifecycle;
pub mod money;
pub mod queries;

pub use cart::{Cart, CartLine, CartService};
pub use error::{ConflictKind, OrderError, Resource};
pub use lifecycle::{OrderLifecycle, SubmitRequest};
pub use queries::OrderQueries;

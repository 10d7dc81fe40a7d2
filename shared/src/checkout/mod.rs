//! Checkout domain types
//!
//! Entities and DTOs for the cart → order → payment workflow. These
//! are shared between the server and its clients, so every type here
//! is serde-serializable and carries no storage concerns.

mod types;

pub use types::*;

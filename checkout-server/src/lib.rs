//! Checkout Server - checkout and payment orchestration service
//!
//! # Architecture Overview
//!
//! The core of this service is the checkout workflow
//! (cart → order → payment → fulfillment-state). Everything else is
//! a narrow collaborator surface around it:
//!
//! - **checkout**: storage, pricing, coupon resolution, payment
//!   method strategies and the orchestrating manager
//! - **catalog**: in-memory price source consulted at cart-add time
//! - **api**: HTTP routes and handlers
//!
//! # Module Structure
//!
//! ```text
//! checkout-server/src/
//! ├── core/          # Config, state, server bootstrap
//! ├── checkout/      # Checkout orchestration (the core subsystem)
//! ├── catalog/       # Catalog collaborator
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logger, validation helpers
//! ```

pub mod api;
pub mod catalog;
pub mod checkout;
pub mod core;
pub mod utils;

// Re-export public types
pub use catalog::CatalogService;
pub use checkout::{CheckoutManager, CheckoutStorage};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use shared::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

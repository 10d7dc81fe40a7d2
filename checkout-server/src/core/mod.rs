//! Core module - server configuration, state and errors
//!
//! # Module structure
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared service state
//! - [`Server`] - HTTP server
//! - [`ServerError`] - bootstrap errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;

//! HTTP API for the homehome reward economy.
//!
//! Exposes the coin ledger, gacha, inventory, character affection and the
//! daily login bonus over JSON.
//!
//! # Authentication
//!
//! 1. **User bearer tokens** - end-user requests; the account system has
//!    already verified the user, the token only names them.
//! 2. **Service API keys** - reward credits and purchases sent by other
//!    services.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers call the synchronous store

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

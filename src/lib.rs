//! HS256 bearer-token authentication for axum services.
//!
//! - [`services::auth::TokenCodec`] issues and verifies signed, time-bounded tokens.
//! - [`middleware::auth::protect`] gates a router on a valid `Authorization: Bearer`
//!   header and hands the verified identity to handlers as [`api::v1::extractors::AuthCtx`].

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

//! API routing
//!
//! # Structure
//!
//! - [`health`] - health check (public)
//! - [`users`] - registration and lookup
//! - [`products`] - listing catalog
//! - [`orders`] - order lifecycle: create, pay, complete, cancel
//! - [`verifications`] - seller verification gate
//! - [`earnings`] - platform earnings report (admin)

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub mod earnings;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;
pub mod verifications;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(verifications::router())
        .merge(earnings::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

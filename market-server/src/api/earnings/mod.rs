//! Earnings API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/earnings", earning_routes())
}

fn earning_routes() -> Router<ServerState> {
    Router::new().route("/summary", get(handler::summary))
}

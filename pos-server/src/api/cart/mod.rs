//! Session cart API
//!
//! The session id is an opaque client-chosen key; the cart lives in the
//! in-memory session store until it is submitted or goes idle.

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{session_id}", get(handler::view).delete(handler::clear))
        .route("/{session_id}/items", post(handler::add_item))
        .route(
            "/{session_id}/items/{menu_item_id}/adjust",
            post(handler::adjust_quantity),
        )
        .route("/{session_id}/items/{menu_item_id}", delete(handler::remove_item))
        .route("/{session_id}/submit", post(handler::submit))
}

use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod catalog;
pub mod chat;
pub mod content;
pub mod doc;
pub mod health;
pub mod inbox;
pub mod notifications;
pub mod orders;
pub mod reservations;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    let admin = admin::router()
        .merge(catalog::admin_router())
        .merge(orders::admin_router())
        .merge(reservations::admin_router())
        .merge(content::admin_router())
        .merge(inbox::admin_router())
        .merge(notifications::admin_router());

    Router::new()
        .merge(catalog::router())
        .merge(orders::router())
        .merge(reservations::router())
        .merge(content::router())
        .merge(inbox::router())
        .merge(chat::router())
        .nest("/admin", admin)
}

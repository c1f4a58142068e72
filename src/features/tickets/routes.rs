use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::tickets::handlers;
use crate::features::tickets::services::{ClassificationService, TicketService};

/// Create routes for the tickets feature
///
/// Classification gets its own state so the CRUD routes work without an LLM.
pub fn routes(
    ticket_service: Arc<TicketService>,
    classification_service: Arc<ClassificationService>,
) -> Router {
    let crud = Router::new()
        .route(
            "/api/tickets/",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route("/api/tickets/stats/", get(handlers::ticket_stats))
        .route("/api/tickets/{id}/", patch(handlers::update_ticket))
        .with_state(ticket_service);

    let classify = Router::new()
        .route("/api/tickets/classify/", post(handlers::classify_ticket))
        .with_state(classification_service);

    crud.merge(classify)
}

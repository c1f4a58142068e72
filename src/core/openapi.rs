use utoipa::{Modify, OpenApi};

use crate::features::tickets::{
    dtos as tickets_dtos, handlers as tickets_handlers, models as tickets_models,
};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Tickets
        tickets_handlers::list_tickets,
        tickets_handlers::create_ticket,
        tickets_handlers::update_ticket,
        tickets_handlers::ticket_stats,
        tickets_handlers::classify_ticket,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Tickets
            tickets_models::TicketCategory,
            tickets_models::TicketPriority,
            tickets_models::TicketStatus,
            tickets_dtos::TicketResponseDto,
            tickets_dtos::CreateTicketDto,
            tickets_dtos::UpdateTicketDto,
            tickets_dtos::TicketStatsDto,
            tickets_dtos::PriorityBreakdown,
            tickets_dtos::CategoryBreakdown,
            tickets_dtos::ClassifyTicketDto,
            tickets_dtos::ClassificationResponseDto,
        )
    ),
    tags(
        (name = "tickets", description = "Support tickets, statistics and AI classification"),
    ),
    info(
        title = "Support Desk API",
        version = "0.1.0",
        description = "API documentation for Support Desk",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

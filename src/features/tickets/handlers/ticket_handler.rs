use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath, AppQuery};
use crate::features::tickets::dtos::{
    ClassificationResponseDto, ClassifyTicketDto, CreateTicketDto, ListTicketsQuery,
    TicketResponseDto, TicketStatsDto, UpdateTicketDto,
};
use crate::features::tickets::services::{ClassificationService, TicketService};
use crate::shared::types::ErrorResponse;

/// List tickets
///
/// Filters are optional and combinable; all present filters must match.
#[utoipa::path(
    get,
    path = "/api/tickets/",
    params(ListTicketsQuery),
    responses(
        (status = 200, description = "Matching tickets, newest first", body = Vec<TicketResponseDto>),
        (status = 400, description = "Malformed query string", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn list_tickets(
    State(service): State<Arc<TicketService>>,
    AppQuery(query): AppQuery<ListTicketsQuery>,
) -> Result<Json<Vec<TicketResponseDto>>> {
    let tickets = service.list(query).await?;
    Ok(Json(tickets))
}

/// Create a ticket
#[utoipa::path(
    post,
    path = "/api/tickets/",
    request_body = CreateTicketDto,
    responses(
        (status = 201, description = "Ticket created", body = TicketResponseDto),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn create_ticket(
    State(service): State<Arc<TicketService>>,
    AppJson(dto): AppJson<CreateTicketDto>,
) -> Result<(StatusCode, Json<TicketResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Partially update a ticket
///
/// Only the supplied fields change; `id` and `created_at` are read-only.
#[utoipa::path(
    patch,
    path = "/api/tickets/{id}/",
    params(
        ("id" = i64, Path, description = "Ticket ID")
    ),
    request_body = UpdateTicketDto,
    responses(
        (status = 200, description = "Ticket updated", body = TicketResponseDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Ticket not found or non-numeric id", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn update_ticket(
    State(service): State<Arc<TicketService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<UpdateTicketDto>,
) -> Result<Json<TicketResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ticket = service.update(id, dto).await?;
    Ok(Json(ticket))
}

/// Aggregate ticket statistics
#[utoipa::path(
    get,
    path = "/api/tickets/stats/",
    responses(
        (status = 200, description = "Ticket statistics", body = TicketStatsDto)
    ),
    tag = "tickets"
)]
pub async fn ticket_stats(
    State(service): State<Arc<TicketService>>,
) -> Result<Json<TicketStatsDto>> {
    let stats = service.stats().await?;
    Ok(Json(stats))
}

/// Suggest a category and priority for a description
///
/// The suggestion is not applied to any ticket.
#[utoipa::path(
    post,
    path = "/api/tickets/classify/",
    request_body = ClassifyTicketDto,
    responses(
        (status = 200, description = "Suggested classification", body = ClassificationResponseDto),
        (status = 400, description = "Missing or empty description", body = ErrorResponse),
        (status = 503, description = "Classification unavailable", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn classify_ticket(
    State(classifier): State<Arc<ClassificationService>>,
    AppJson(dto): AppJson<ClassifyTicketDto>,
) -> Result<Json<ClassificationResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    match classifier.classify(dto.description.trim()).await {
        Ok(suggestion) => Ok(Json(suggestion)),
        Err(e) => {
            tracing::warn!(upstream = e.is_upstream(), "Classify failed: {}", e);
            Err(e.into())
        }
    }
}

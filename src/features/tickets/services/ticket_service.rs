use std::sync::Arc;

use chrono::Utc;

use crate::core::error::{AppError, Result};
use crate::features::tickets::dtos::{
    CreateTicketDto, ListTicketsQuery, TicketResponseDto, TicketStatsDto, UpdateTicketDto,
};
use crate::features::tickets::repositories::TicketRepository;

/// Service for ticket operations
pub struct TicketService {
    repository: Arc<dyn TicketRepository>,
}

impl TicketService {
    pub fn new(repository: Arc<dyn TicketRepository>) -> Self {
        Self { repository }
    }

    /// List tickets matching the query filters
    pub async fn list(&self, query: ListTicketsQuery) -> Result<Vec<TicketResponseDto>> {
        let Some(filter) = query.into_filter() else {
            tracing::debug!("List filter cannot match any ticket");
            return Ok(Vec::new());
        };

        let tickets = self.repository.list(&filter).await?;
        Ok(tickets.into_iter().map(|t| t.into()).collect())
    }

    pub async fn create(&self, dto: CreateTicketDto) -> Result<TicketResponseDto> {
        let ticket = self.repository.create(dto.into()).await?;

        tracing::info!(
            "Ticket created: id={}, category={}, priority={}",
            ticket.id,
            ticket.category,
            ticket.priority
        );

        Ok(ticket.into())
    }

    /// Apply a partial update. Unknown ids leave the store untouched.
    pub async fn update(&self, id: i64, dto: UpdateTicketDto) -> Result<TicketResponseDto> {
        let ticket = self
            .repository
            .update(id, dto.into())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket '{}' not found", id)))?;

        tracing::info!("Ticket updated: id={}, status={}", ticket.id, ticket.status);

        Ok(ticket.into())
    }

    /// Aggregate statistics over all tickets
    pub async fn stats(&self) -> Result<TicketStatsDto> {
        let counts = self.repository.counts().await?;
        Ok(TicketStatsDto::from_counts(&counts, Utc::now()))
    }
}

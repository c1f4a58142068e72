use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::tickets::models::{
    NewTicket, Ticket, TicketCategory, TicketChanges, TicketFilter, TicketPriority, TicketStatus,
};
use crate::shared::validation::validate_text;

/// Response DTO for ticket
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketResponseDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Ticket> for TicketResponseDto {
    fn from(t: Ticket) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            category: t.category,
            priority: t.priority,
            status: t.status,
            created_at: t.created_at,
        }
    }
}

/// Request DTO for creating a ticket
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTicketDto {
    #[validate(
        length(max = 200, message = "Title must not exceed 200 characters"),
        custom(function = "validate_text")
    )]
    pub title: String,

    #[validate(custom(function = "validate_text"))]
    pub description: String,

    pub category: TicketCategory,

    pub priority: TicketPriority,

    /// Defaults to `open`
    #[serde(default)]
    pub status: TicketStatus,
}

impl From<CreateTicketDto> for NewTicket {
    fn from(dto: CreateTicketDto) -> Self {
        Self {
            title: dto.title.trim().to_string(),
            description: dto.description.trim().to_string(),
            category: dto.category,
            priority: dto.priority,
            status: dto.status,
        }
    }
}

/// Request DTO for partially updating a ticket. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTicketDto {
    #[validate(
        length(max = 200, message = "Title must not exceed 200 characters"),
        custom(function = "validate_text")
    )]
    pub title: Option<String>,

    #[validate(custom(function = "validate_text"))]
    pub description: Option<String>,

    pub category: Option<TicketCategory>,

    pub priority: Option<TicketPriority>,

    pub status: Option<TicketStatus>,
}

impl From<UpdateTicketDto> for TicketChanges {
    fn from(dto: UpdateTicketDto) -> Self {
        Self {
            title: dto.title.map(|s| s.trim().to_string()),
            description: dto.description.map(|s| s.trim().to_string()),
            category: dto.category,
            priority: dto.priority,
            status: dto.status,
        }
    }
}

/// Query params for listing tickets. Empty values are ignored.
///
/// Values are kept as sent; an unknown enum value filters out every ticket.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTicketsQuery {
    /// Exact category match
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<TicketCategory>)]
    pub category: Option<String>,

    /// Exact priority match
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<TicketPriority>)]
    pub priority: Option<String>,

    /// Exact status match
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<TicketStatus>)]
    pub status: Option<String>,

    /// Case-insensitive substring of title or description
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
}

impl ListTicketsQuery {
    /// Typed store filter, or `None` when no stored ticket can match
    pub fn into_filter(self) -> Option<TicketFilter> {
        let category = self.category.map(|v| v.parse::<TicketCategory>()).transpose().ok()?;
        let priority = self.priority.map(|v| v.parse::<TicketPriority>()).transpose().ok()?;
        let status = self.status.map(|v| v.parse::<TicketStatus>()).transpose().ok()?;

        // Stored text never contains NUL
        if self.search.as_deref().is_some_and(|s| s.contains('\0')) {
            return None;
        }

        Some(TicketFilter {
            category,
            priority,
            status,
            search: self.search,
        })
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty()))
}

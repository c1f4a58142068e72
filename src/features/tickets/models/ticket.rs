use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Ticket category enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ticket_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketCategory {
    Billing,
    Technical,
    Account,
    General,
}

impl TicketCategory {
    pub const ALL: [TicketCategory; 4] = [
        TicketCategory::Billing,
        TicketCategory::Technical,
        TicketCategory::Account,
        TicketCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketCategory::Billing => "billing",
            TicketCategory::Technical => "technical",
            TicketCategory::Account => "account",
            TicketCategory::General => "general",
        }
    }
}

/// Ticket priority enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ticket_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
            TicketPriority::Critical => "critical",
        }
    }
}

/// Ticket lifecycle status enum matching database enum
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketCategory {
    type Err = String;

    /// Exact, case-sensitive match on the wire value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "billing" => Ok(TicketCategory::Billing),
            "technical" => Ok(TicketCategory::Technical),
            "account" => Ok(TicketCategory::Account),
            "general" => Ok(TicketCategory::General),
            _ => Err(format!("'{}' is not a valid category", s)),
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TicketPriority::Low),
            "medium" => Ok(TicketPriority::Medium),
            "high" => Ok(TicketPriority::High),
            "critical" => Ok(TicketPriority::Critical),
            _ => Err(format!("'{}' is not a valid priority", s)),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(format!("'{}' is not a valid status", s)),
        }
    }
}

/// Database model for ticket
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a ticket; id and created_at come from the database
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct TicketChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<TicketCategory>,
    pub priority: Option<TicketPriority>,
    pub status: Option<TicketStatus>,
}

#[cfg(test)]
impl TicketChanges {
    pub fn apply_to(&self, ticket: &mut Ticket) {
        if let Some(ref title) = self.title {
            ticket.title = title.clone();
        }
        if let Some(ref description) = self.description {
            ticket.description = description.clone();
        }
        if let Some(category) = self.category {
            ticket.category = category;
        }
        if let Some(priority) = self.priority {
            ticket.priority = priority;
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
    }
}

/// Equality/substring filters for listing tickets. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub category: Option<TicketCategory>,
    pub priority: Option<TicketPriority>,
    pub status: Option<TicketStatus>,
    /// Case-insensitive substring over title or description
    pub search: Option<String>,
}

#[cfg(test)]
impl TicketFilter {
    /// In-memory equivalent of the SQL filter
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.category.is_some_and(|c| c != ticket.category) {
            return false;
        }
        if self.priority.is_some_and(|p| p != ticket.priority) {
            return false;
        }
        if self.status.is_some_and(|s| s != ticket.status) {
            return false;
        }
        match self.search {
            Some(ref needle) => {
                let needle = needle.to_lowercase();
                ticket.title.to_lowercase().contains(&needle)
                    || ticket.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Raw aggregate counts as returned by the store
#[derive(Debug, Clone, Default)]
pub struct TicketCounts {
    pub total: i64,
    pub open: i64,
    pub earliest_created_at: Option<DateTime<Utc>>,
    pub by_priority: Vec<(TicketPriority, i64)>,
    pub by_category: Vec<(TicketCategory, i64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> Ticket {
        Ticket {
            id: 1,
            title: "Refund for double charge".to_string(),
            description: "I was billed twice this month".to_string(),
            category: TicketCategory::Billing,
            priority: TicketPriority::High,
            status: TicketStatus::Open,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(
            serde_json::to_value(TicketStatus::InProgress).unwrap(),
            "in_progress"
        );
        assert_eq!(
            serde_json::from_str::<TicketCategory>("\"technical\"").unwrap(),
            TicketCategory::Technical
        );
        assert!(serde_json::from_str::<TicketPriority>("\"urgent\"").is_err());
        assert!(serde_json::from_str::<TicketCategory>("\"Billing\"").is_err());
    }

    #[test]
    fn test_from_str_is_exact() {
        assert_eq!("critical".parse::<TicketPriority>(), Ok(TicketPriority::Critical));
        assert_eq!("in_progress".parse::<TicketStatus>(), Ok(TicketStatus::InProgress));
        assert!("Critical".parse::<TicketPriority>().is_err());
        assert!(" account".parse::<TicketCategory>().is_err());
        assert_eq!(
            "unknown".parse::<TicketCategory>().unwrap_err(),
            "'unknown' is not a valid category"
        );
    }

    #[test]
    fn test_default_status_is_open() {
        assert_eq!(TicketStatus::default(), TicketStatus::Open);
    }

    #[test]
    fn test_changes_apply_only_supplied_fields() {
        let original = ticket();
        let mut updated = original.clone();

        TicketChanges {
            status: Some(TicketStatus::Closed),
            ..Default::default()
        }
        .apply_to(&mut updated);

        assert_eq!(updated.status, TicketStatus::Closed);
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.description, original.description);
        assert_eq!(updated.category, original.category);
        assert_eq!(updated.priority, original.priority);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[test]
    fn test_filter_matches() {
        let t = ticket();

        assert!(TicketFilter::default().matches(&t));
        assert!(TicketFilter {
            search: Some("DOUBLE".to_string()),
            ..Default::default()
        }
        .matches(&t));
        assert!(TicketFilter {
            search: Some("billed twice".to_string()),
            ..Default::default()
        }
        .matches(&t));
        assert!(TicketFilter {
            category: Some(TicketCategory::Billing),
            priority: Some(TicketPriority::High),
            ..Default::default()
        }
        .matches(&t));
        assert!(!TicketFilter {
            category: Some(TicketCategory::Billing),
            priority: Some(TicketPriority::Low),
            ..Default::default()
        }
        .matches(&t));
        assert!(!TicketFilter {
            status: Some(TicketStatus::Resolved),
            ..Default::default()
        }
        .matches(&t));
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::tickets::models::{
    NewTicket, Ticket, TicketCategory, TicketChanges, TicketCounts, TicketFilter, TicketPriority,
    TicketStatus,
};

const TICKET_COLUMNS: &str = "id, title, description, category, priority, status, created_at";

/// Persistence for tickets
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Tickets matching every present filter, newest first
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>>;

    async fn create(&self, ticket: NewTicket) -> Result<Ticket>;

    /// Applies `changes` and returns the updated row, or `None` if `id` does not exist
    async fn update(&self, id: i64, changes: TicketChanges) -> Result<Option<Ticket>>;

    /// Totals and per-priority/per-category counts, grouped by the store
    async fn counts(&self) -> Result<TicketCounts>;
}

/// PostgreSQL-backed ticket store
pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so the search term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn build_list_query(filter: &TicketFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM tickets WHERE TRUE", TICKET_COLUMNS));

    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category);
    }
    if let Some(priority) = filter.priority {
        qb.push(" AND priority = ").push_bind(priority);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(ref search) = filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    qb.push(" ORDER BY created_at DESC, id DESC");
    qb
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        let mut qb = build_list_query(filter);
        qb.build_query_as::<Ticket>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list tickets: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn create(&self, ticket: NewTicket) -> Result<Ticket> {
        let query = format!(
            r#"
            INSERT INTO tickets (title, description, category, priority, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            TICKET_COLUMNS
        );

        sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket.title)
            .bind(ticket.description)
            .bind(ticket.category)
            .bind(ticket.priority)
            .bind(ticket.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create ticket: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update(&self, id: i64, changes: TicketChanges) -> Result<Option<Ticket>> {
        // created_at is never part of the SET list
        let query = format!(
            r#"
            UPDATE tickets
            SET title = COALESCE($1, title),
                description = COALESCE($2, description),
                category = COALESCE($3, category),
                priority = COALESCE($4, priority),
                status = COALESCE($5, status)
            WHERE id = $6
            RETURNING {}
            "#,
            TICKET_COLUMNS
        );

        sqlx::query_as::<_, Ticket>(&query)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.category)
            .bind(changes.priority)
            .bind(changes.status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update ticket {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn counts(&self) -> Result<TicketCounts> {
        let (total, open, earliest_created_at): (i64, i64, Option<DateTime<Utc>>) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = $1),
                    MIN(created_at)
                FROM tickets
                "#,
            )
            .bind(TicketStatus::Open)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count tickets: {:?}", e);
                AppError::Database(e)
            })?;

        let by_priority: Vec<(TicketPriority, i64)> =
            sqlx::query_as("SELECT priority, COUNT(*) FROM tickets GROUP BY priority")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to group tickets by priority: {:?}", e);
                    AppError::Database(e)
                })?;

        let by_category: Vec<(TicketCategory, i64)> =
            sqlx::query_as("SELECT category, COUNT(*) FROM tickets GROUP BY category")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to group tickets by category: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(TicketCounts {
            total,
            open,
            earliest_created_at,
            by_priority,
            by_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("refund"), "refund");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("user_id"), "user\\_id");
        assert_eq!(escape_like("C:\\path"), "C:\\\\path");
    }

    #[test]
    fn test_list_query_without_filters() {
        let qb = build_list_query(&TicketFilter::default());
        assert_eq!(
            qb.sql(),
            "SELECT id, title, description, category, priority, status, created_at \
             FROM tickets WHERE TRUE ORDER BY created_at DESC, id DESC"
        );
    }

    #[test]
    fn test_list_query_combines_filters() {
        let filter = TicketFilter {
            category: Some(TicketCategory::Billing),
            priority: Some(TicketPriority::High),
            status: None,
            search: Some("refund".to_string()),
        };

        let qb = build_list_query(&filter);
        let sql = qb.sql();

        assert!(sql.contains(" AND category = $1"));
        assert!(sql.contains(" AND priority = $2"));
        assert!(!sql.contains("status ="));
        assert!(sql.contains(" AND (title ILIKE $3 OR description ILIKE $4)"));
        assert!(sql.ends_with(" ORDER BY created_at DESC, id DESC"));
    }
}

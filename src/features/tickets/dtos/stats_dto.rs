use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::tickets::models::{TicketCategory, TicketCounts, TicketPriority};

/// Ticket count per priority. Every priority is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriorityBreakdown {
    pub low: i64,
    pub medium: i64,
    pub high: i64,
    pub critical: i64,
}

impl PriorityBreakdown {
    fn slot(&mut self, priority: TicketPriority) -> &mut i64 {
        match priority {
            TicketPriority::Low => &mut self.low,
            TicketPriority::Medium => &mut self.medium,
            TicketPriority::High => &mut self.high,
            TicketPriority::Critical => &mut self.critical,
        }
    }

    pub fn from_rows(rows: &[(TicketPriority, i64)]) -> Self {
        let mut breakdown = Self::default();
        for &(priority, count) in rows {
            *breakdown.slot(priority) += count;
        }
        breakdown
    }
}

/// Ticket count per category. Every category is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryBreakdown {
    pub billing: i64,
    pub technical: i64,
    pub account: i64,
    pub general: i64,
}

impl CategoryBreakdown {
    fn slot(&mut self, category: TicketCategory) -> &mut i64 {
        match category {
            TicketCategory::Billing => &mut self.billing,
            TicketCategory::Technical => &mut self.technical,
            TicketCategory::Account => &mut self.account,
            TicketCategory::General => &mut self.general,
        }
    }

    pub fn from_rows(rows: &[(TicketCategory, i64)]) -> Self {
        let mut breakdown = Self::default();
        for &(category, count) in rows {
            *breakdown.slot(category) += count;
        }
        breakdown
    }
}

/// Aggregate ticket statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TicketStatsDto {
    pub total_tickets: i64,
    pub open_tickets: i64,
    /// Tickets per calendar day since the first ticket, one decimal place
    pub avg_tickets_per_day: f64,
    pub priority_breakdown: PriorityBreakdown,
    pub category_breakdown: CategoryBreakdown,
}

impl TicketStatsDto {
    /// Build the response from grouped counts, measuring elapsed days up to `now`
    pub fn from_counts(counts: &TicketCounts, now: DateTime<Utc>) -> Self {
        Self {
            total_tickets: counts.total,
            open_tickets: counts.open,
            avg_tickets_per_day: average_per_day(counts.total, counts.earliest_created_at, now),
            priority_breakdown: PriorityBreakdown::from_rows(&counts.by_priority),
            category_breakdown: CategoryBreakdown::from_rows(&counts.by_category),
        }
    }
}

/// `total / (whole days since earliest + 1)`, rounded to one decimal with ties to even
fn average_per_day(total: i64, earliest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(earliest) = earliest.filter(|_| total > 0) else {
        return 0.0;
    };

    // The day of the first ticket counts as day one
    let days_elapsed = (now - earliest).num_days().max(0) + 1;
    let avg = total as f64 / days_elapsed as f64;

    (avg * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_empty_store_is_fully_zeroed() {
        let stats = TicketStatsDto::from_counts(&TicketCounts::default(), Utc::now());

        assert_eq!(stats.total_tickets, 0);
        assert_eq!(stats.open_tickets, 0);
        assert_eq!(stats.avg_tickets_per_day, 0.0);
        assert_eq!(stats.priority_breakdown, PriorityBreakdown::default());
        assert_eq!(stats.category_breakdown, CategoryBreakdown::default());

        let body = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            body["priority_breakdown"],
            serde_json::json!({"low": 0, "medium": 0, "high": 0, "critical": 0})
        );
        assert_eq!(
            body["category_breakdown"],
            serde_json::json!({"billing": 0, "technical": 0, "account": 0, "general": 0})
        );
    }

    #[test]
    fn test_single_fresh_ticket_counts_as_one_day() {
        let now = Utc::now();
        let counts = TicketCounts {
            total: 1,
            open: 1,
            earliest_created_at: Some(now - Duration::seconds(5)),
            by_priority: vec![(TicketPriority::Low, 1)],
            by_category: vec![(TicketCategory::General, 1)],
        };

        let stats = TicketStatsDto::from_counts(&counts, now);

        assert_eq!(stats.avg_tickets_per_day, 1.0);
    }

    #[test]
    fn test_average_uses_whole_days_plus_one() {
        let now = Utc::now();
        // 2 days and 23 hours -> floor(2.96) + 1 = 3 days
        let earliest = now - Duration::days(2) - Duration::hours(23);

        assert_eq!(average_per_day(10, Some(earliest), now), 3.3);
        assert_eq!(average_per_day(9, Some(earliest), now), 3.0);
        assert_eq!(average_per_day(1, Some(earliest), now), 0.3);
    }

    #[test]
    fn test_average_rounds_ties_to_even() {
        let now = Utc::now();
        // 3 days and 1 hour -> 4 days
        let earliest = now - Duration::days(3) - Duration::hours(1);

        assert_eq!(average_per_day(1, Some(earliest), now), 0.2);
        assert_eq!(average_per_day(5, Some(earliest), now), 1.2);
        assert_eq!(average_per_day(3, Some(earliest), now), 0.8);
    }

    #[test]
    fn test_average_ignores_future_earliest() {
        let now = Utc::now();
        assert_eq!(
            average_per_day(4, Some(now + Duration::hours(1)), now),
            4.0
        );
    }

    #[test]
    fn test_single_value_breakdowns() {
        let counts = TicketCounts {
            total: 3,
            open: 2,
            earliest_created_at: Some(Utc::now()),
            by_priority: vec![(TicketPriority::High, 3)],
            by_category: vec![(TicketCategory::Billing, 3)],
        };

        let stats = TicketStatsDto::from_counts(&counts, Utc::now());

        assert_eq!(
            stats.priority_breakdown,
            PriorityBreakdown {
                low: 0,
                medium: 0,
                high: 3,
                critical: 0
            }
        );
        assert_eq!(
            stats.category_breakdown,
            CategoryBreakdown {
                billing: 3,
                technical: 0,
                account: 0,
                general: 0
            }
        );
        assert_eq!(stats.open_tickets, 2);
    }

    #[test]
    fn test_breakdown_from_mixed_rows() {
        let breakdown = CategoryBreakdown::from_rows(&[
            (TicketCategory::Technical, 4),
            (TicketCategory::Account, 1),
            (TicketCategory::General, 2),
        ]);

        assert_eq!(breakdown.billing, 0);
        assert_eq!(breakdown.technical, 4);
        assert_eq!(breakdown.account, 1);
        assert_eq!(breakdown.general, 2);
    }
}

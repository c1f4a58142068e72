//! In-process stand-ins for the database and the LLM provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;

use crate::core::error::Result;
use crate::features::tickets::models::{
    NewTicket, Ticket, TicketCategory, TicketChanges, TicketCounts, TicketFilter, TicketPriority,
    TicketStatus,
};
use crate::features::tickets::repositories::TicketRepository;
use crate::shared::llm::{ChatCompletionRequest, LlmClient, LlmError};

/// Ticket store kept in memory. Aggregates are grouped the same way the SQL does.
#[derive(Default)]
pub struct InMemoryTicketRepository {
    tickets: Mutex<Vec<Ticket>>,
    next_id: AtomicI64,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed row, e.g. to control `created_at`
    pub fn seed(&self, ticket: Ticket) {
        self.next_id.fetch_max(ticket.id, Ordering::SeqCst);
        self.tickets.lock().unwrap().push(ticket);
    }

    pub fn snapshot(&self) -> Vec<Ticket> {
        self.tickets.lock().unwrap().clone()
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        let mut tickets: Vec<Ticket> = self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tickets.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(tickets)
    }

    async fn create(&self, ticket: NewTicket) -> Result<Ticket> {
        let created = Ticket {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            title: ticket.title,
            description: ticket.description,
            category: ticket.category,
            priority: ticket.priority,
            status: ticket.status,
            created_at: Utc::now(),
        };
        self.tickets.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: TicketChanges) -> Result<Option<Ticket>> {
        let mut tickets = self.tickets.lock().unwrap();
        Ok(tickets.iter_mut().find(|t| t.id == id).map(|ticket| {
            changes.apply_to(ticket);
            ticket.clone()
        }))
    }

    async fn counts(&self) -> Result<TicketCounts> {
        let tickets = self.tickets.lock().unwrap();

        let mut by_priority: HashMap<TicketPriority, i64> = HashMap::new();
        let mut by_category: HashMap<TicketCategory, i64> = HashMap::new();
        for t in tickets.iter() {
            *by_priority.entry(t.priority).or_default() += 1;
            *by_category.entry(t.category).or_default() += 1;
        }

        Ok(TicketCounts {
            total: tickets.len() as i64,
            open: tickets
                .iter()
                .filter(|t| t.status == TicketStatus::Open)
                .count() as i64,
            earliest_created_at: tickets.iter().map(|t| t.created_at).min(),
            by_priority: by_priority.into_iter().collect(),
            by_category: by_category.into_iter().collect(),
        })
    }
}

/// Build a ticket row with generated text
pub fn fake_ticket(
    id: i64,
    category: TicketCategory,
    priority: TicketPriority,
    status: TicketStatus,
    created_at: DateTime<Utc>,
) -> Ticket {
    Ticket {
        id,
        title: Sentence(2..5).fake(),
        description: Paragraph(1..3).fake(),
        category,
        priority,
        status,
        created_at,
    }
}

/// Scripted LLM that records every request it receives
pub struct FakeLlmClient {
    reply: std::result::Result<String, LlmError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, ChatCompletionRequest)>>,
}

impl FakeLlmClient {
    /// Always answers with `text`
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Always fails with `error`
    pub fn failing(error: LlmError) -> Self {
        Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// API key and request of the most recent call
    pub fn last_request(&self) -> Option<(String, ChatCompletionRequest)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> std::result::Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((api_key.to_string(), request.clone()));

        self.reply.clone()
    }
}

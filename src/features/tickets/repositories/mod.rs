pub mod ticket_repository;

pub use ticket_repository::{PgTicketRepository, TicketRepository};

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgTicketRepository;
pub use services::{ClassificationService, TicketService};

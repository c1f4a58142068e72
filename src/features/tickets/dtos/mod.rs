pub mod classify_dto;
pub mod stats_dto;
pub mod ticket_dto;

pub use classify_dto::*;
pub use stats_dto::*;
pub use ticket_dto::*;

//! Ticket data provider and the filtered ticket view.

pub mod board;
pub mod store;

pub use board::{
    FILTER_ALL, FILTER_OPTIONS, StatusTone, TicketBoard, filter_tickets, next_filter,
    previous_filter, status_tone,
};
pub use store::{MockTicketStore, TicketStore};

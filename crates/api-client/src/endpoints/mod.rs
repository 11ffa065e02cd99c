//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a specific set of backend endpoints.
//!
//! ## Mapping to the backends
//!
//! | Module | Routes | Description |
//! |--------|--------|-------------|
//! | `tickets` | `/ticket/*` | Support tickets (user and admin views) |
//! | `predictions` | `/predictions/<source>/` | Renewable production forecasts |

pub mod predictions;
pub mod tickets;

pub use predictions::{EnergySource, PredictionPoint, PredictionSeries, PredictionsApi};
pub use tickets::{
    AdminUser, AssignedFilter, DeleteResult, NewTicket, Ticket, TicketFilters, TicketMessage,
    TicketPriority, TicketStats, TicketStatus, TicketsApi, UserRef, UserSummary,
};

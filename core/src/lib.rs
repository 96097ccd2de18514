//! Client core for the ticket desk service.
//!
//! # Overview
//! Three layers, leaves first:
//! - `http` / `transport`: plain-data requests and responses, the pure
//!   build and decode halves, and the `Transport` trait that performs the
//!   round trip (`UreqTransport` in production).
//! - `client`: `TicketClient`, typed list/get/create/update/delete calls.
//! - `controller`: `TicketController`, the owner of the loaded collection,
//!   the filters, the create form and the delete confirmation.
//!
//! # Design
//! - Only the controller holds state; the client and transport are
//!   reusable values.
//! - Errors travel up unchanged until the controller, which records them
//!   for display and returns them to the caller.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

mod testing;

pub use client::TicketClient;
pub use config::ClientConfig;
pub use controller::{LoadPhase, TicketController, TicketDraft, TicketView};
pub use error::{ApiError, ConfigError, ControllerError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Http, Transport, UreqTransport};
pub use types::{Ticket, TicketCreate, TicketFilter, TicketId, TicketPriority, TicketStatus, TicketUpdate};

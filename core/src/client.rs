//! Typed bindings for the ticket REST surface.
//!
//! # Design
//! `TicketClient` holds only an `Http` executor and carries no mutable state
//! between calls. Path and query rules live in free functions so they can be
//! checked without a transport. Creation posts to the singular `/ticket`
//! while every other call uses `/tickets`; that asymmetry is the backend's
//! contract and is kept as is.

use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::transport::{Http, Transport};
use crate::types::{Ticket, TicketCreate, TicketFilter, TicketId, TicketUpdate};

pub const COLLECTION_PATH: &str = "/tickets";
pub const CREATE_PATH: &str = "/ticket";

/// Path for `list`, with `status` then `priority` as query parameters.
pub fn list_path(filter: &TicketFilter) -> String {
    if filter.is_empty() {
        return COLLECTION_PATH.to_string();
    }
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(status) = filter.status {
        query.append_pair("status", status.as_str());
    }
    if let Some(priority) = filter.priority {
        query.append_pair("priority", priority.as_str());
    }
    format!("{COLLECTION_PATH}?{}", query.finish())
}

/// Single-resource path used by get, update and delete.
pub fn ticket_path(id: TicketId) -> String {
    format!("{COLLECTION_PATH}/{id}")
}

/// Synchronous client for the ticket API.
///
/// `get`, `create` and `update` return `None` when the server answers 204.
#[derive(Debug, Clone)]
pub struct TicketClient<T> {
    http: Http<T>,
}

impl<T: Transport> TicketClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            http: Http::new(base_url, transport),
        }
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    pub fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, ApiError> {
        let tickets = self.http.get(&list_path(filter))?;
        Ok(tickets.unwrap_or_default())
    }

    pub fn get(&self, id: TicketId) -> Result<Option<Ticket>, ApiError> {
        self.http.get(&ticket_path(id))
    }

    pub fn create(&self, payload: &TicketCreate) -> Result<Option<Ticket>, ApiError> {
        self.http.post(CREATE_PATH, payload)
    }

    pub fn update(&self, id: TicketId, payload: &TicketUpdate) -> Result<Option<Ticket>, ApiError> {
        self.http.put(&ticket_path(id), payload)
    }

    pub fn delete(&self, id: TicketId) -> Result<(), ApiError> {
        self.http
            .request::<(), serde::de::IgnoredAny>(HttpMethod::Delete, &ticket_path(id), None, &[])?;
        Ok(())
    }
}

//! Test fixtures shared by the unit tests in this crate.

#![cfg(test)]

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Ticket, TicketPriority, TicketStatus};

/// Transport that replays queued responses and records every request.
///
/// Once the queue is drained it answers `200 []`, which is what a list call
/// against an empty backend returns.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn push_text(&self, status: u16, body: &str) {
        self.push_json(status, body);
    }

    pub fn push_tickets(&self, tickets: &[Ticket]) {
        let body = serde_json::to_string(tickets).unwrap();
        self.push_json(200, &body);
    }

    pub fn push_ticket(&self, ticket: &Ticket) {
        let body = serde_json::to_string(ticket).unwrap();
        self.push_json(200, &body);
    }

    pub fn push_error(&self, error: ApiError) {
        self.responses.borrow_mut().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, method: HttpMethod) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|req| req.method == method)
            .count()
    }

    pub fn body_json(request: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(request.body.as_deref().unwrap()).unwrap()
    }
}

impl crate::transport::Transport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "[]")))
    }
}

pub fn ticket(id: u64, title: &str, status: TicketStatus, priority: TicketPriority) -> Ticket {
    Ticket {
        id,
        title: title.to_string(),
        description: format!("{title} description"),
        status,
        priority,
        created_at: Some("2026-10-01T09:00:00Z".to_string()),
        updated_at: None,
    }
}

//! View-state orchestration for the ticket list.
//!
//! # Design
//! `TicketController` owns the ticket collection and both filter paths:
//! `query` is sent to the server on every list read, `filter` is evaluated
//! locally against whatever was last loaded. Every successful mutation is
//! followed by a fresh `list` whose result replaces the collection
//! wholesale; the controller never splices a created, updated or deleted
//! ticket into its copy. Nothing is shown optimistically, so a failed
//! mutation leaves the collection, and therefore every displayed row, at its
//! last server value.
//!
//! All intent handlers take `&mut self`. Presentation reads state through
//! `view()` and can poll `revision()` to learn whether anything changed.

use tracing::{info, warn};

use crate::client::TicketClient;
use crate::config::ClientConfig;
use crate::error::ControllerError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Ticket, TicketCreate, TicketFilter, TicketId, TicketPriority, TicketStatus, TicketUpdate,
};

/// Progress of the most recent list read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Fields of the create form while it is open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
}

impl TicketDraft {
    /// Check required fields and produce the creation payload.
    pub fn to_create(&self) -> Result<TicketCreate, ControllerError> {
        if self.title.trim().is_empty() {
            return Err(ControllerError::Validation("title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(ControllerError::Validation("description is required".to_string()));
        }
        Ok(TicketCreate {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
        })
    }
}

/// Snapshot handed to presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketView<'a> {
    pub tickets: Vec<&'a Ticket>,
    pub phase: &'a LoadPhase,
    pub filter: TicketFilter,
    pub filter_summary: String,
    pub error: Option<&'a str>,
    pub composer: Option<&'a TicketDraft>,
    pub pending_delete: Option<&'a Ticket>,
    pub revision: u64,
}

#[derive(Debug)]
pub struct TicketController<T> {
    client: TicketClient<T>,
    tickets: Vec<Ticket>,
    query: TicketFilter,
    filter: TicketFilter,
    phase: LoadPhase,
    composer: Option<TicketDraft>,
    pending_delete: Option<TicketId>,
    error: Option<String>,
    revision: u64,
}

impl TicketController<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(TicketClient::new(&config.base_url, UreqTransport::new()))
    }
}

impl<T: Transport> TicketController<T> {
    pub fn new(client: TicketClient<T>) -> Self {
        Self {
            client,
            tickets: Vec::new(),
            query: TicketFilter::default(),
            filter: TicketFilter::default(),
            phase: LoadPhase::Idle,
            composer: None,
            pending_delete: None,
            error: None,
            revision: 0,
        }
    }

    pub fn client(&self) -> &TicketClient<T> {
        &self.client
    }

    /// The full collection from the last successful read.
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Tickets matching the client-side filter, in server order.
    pub fn visible(&self) -> Vec<&Ticket> {
        self.tickets.iter().filter(|t| self.filter.matches(t)).collect()
    }

    pub fn filter(&self) -> TicketFilter {
        self.filter
    }

    pub fn query(&self) -> TicketFilter {
        self.query
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn composer(&self) -> Option<&TicketDraft> {
        self.composer.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&Ticket> {
        self.pending_delete.and_then(|id| self.find(id))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Status a row should display: always the last value read from the server.
    pub fn displayed_status(&self, id: TicketId) -> Option<TicketStatus> {
        self.find(id).map(|t| t.status)
    }

    pub fn view(&self) -> TicketView<'_> {
        TicketView {
            tickets: self.visible(),
            phase: &self.phase,
            filter: self.filter,
            filter_summary: self.filter.summary(),
            error: self.error(),
            composer: self.composer(),
            pending_delete: self.pending_delete(),
            revision: self.revision,
        }
    }

    /// Read the collection with the current server-side query and replace it.
    ///
    /// On failure the previous collection is kept and the phase becomes
    /// `Error`. There is no retry.
    pub fn load(&mut self) -> Result<(), ControllerError> {
        self.phase = LoadPhase::Loading;
        self.touch();

        match self.client.list(&self.query) {
            Ok(tickets) => {
                info!(count = tickets.len(), "ticket list loaded");
                self.tickets = tickets;
                if self.pending_delete.is_some_and(|id| self.find(id).is_none()) {
                    self.pending_delete = None;
                }
                self.phase = LoadPhase::Ready;
                self.error = None;
                self.touch();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "ticket list failed to load");
                self.phase = LoadPhase::Error(e.to_string());
                self.surface(&e);
                Err(e.into())
            }
        }
    }

    /// Replace the server-side query parameters and reload.
    pub fn load_with(&mut self, query: TicketFilter) -> Result<(), ControllerError> {
        self.query = query;
        self.load()
    }

    /// Change the client-side predicate. Never touches the network.
    pub fn set_filter(&mut self, filter: TicketFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.touch();
        }
    }

    pub fn set_status_filter(&mut self, status: Option<TicketStatus>) {
        self.set_filter(TicketFilter { status, ..self.filter });
    }

    pub fn set_priority_filter(&mut self, priority: Option<TicketPriority>) {
        self.set_filter(TicketFilter { priority, ..self.filter });
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(TicketFilter::default());
    }

    /// Open the create form. An already open draft is kept as is.
    pub fn open_composer(&mut self) -> &mut TicketDraft {
        if self.composer.is_none() {
            self.touch();
        }
        self.composer.get_or_insert_with(TicketDraft::default)
    }

    pub fn draft_mut(&mut self) -> Option<&mut TicketDraft> {
        if self.composer.is_some() {
            self.touch();
        }
        self.composer.as_mut()
    }

    pub fn cancel_composer(&mut self) {
        if self.composer.take().is_some() {
            self.touch();
        }
    }

    /// Submit the open draft.
    ///
    /// Invalid drafts are rejected without a request. If the create call
    /// fails the draft stays open for another attempt. After a successful
    /// create the composer closes and the collection is re-read.
    pub fn submit_create(&mut self) -> Result<(), ControllerError> {
        let draft = self.composer.as_ref().ok_or(ControllerError::NotComposing)?;
        let payload = match draft.to_create() {
            Ok(payload) => payload,
            Err(e) => {
                self.surface(&e);
                return Err(e);
            }
        };

        match self.client.create(&payload) {
            Ok(created) => {
                info!(id = created.as_ref().map(|t| t.id), "ticket created");
                self.composer = None;
                self.touch();
                self.load()
            }
            Err(e) => {
                warn!(error = %e, "ticket creation failed");
                self.surface(&e);
                Err(e.into())
            }
        }
    }

    /// Change one ticket's status with a status-only patch, then re-read.
    ///
    /// Choosing the status the ticket already has sends nothing.
    pub fn submit_status_update(&mut self, id: TicketId, status: TicketStatus) -> Result<(), ControllerError> {
        if self.displayed_status(id) == Some(status) {
            return Ok(());
        }

        match self.client.update(id, &TicketUpdate::status(status)) {
            Ok(_) => {
                info!(id, status = %status, "ticket status updated");
                self.load()
            }
            Err(e) => {
                warn!(id, error = %e, "ticket status update failed");
                self.surface(&e);
                Err(e.into())
            }
        }
    }

    /// Arm the delete confirmation for `id`.
    ///
    /// Returns the ticket awaiting confirmation, or `None` when `id` is not
    /// in the loaded collection. A reload that drops the armed ticket disarms
    /// the gate.
    pub fn request_delete(&mut self, id: TicketId) -> Option<&Ticket> {
        if self.find(id).is_none() {
            return None;
        }
        if self.pending_delete != Some(id) {
            self.pending_delete = Some(id);
            self.touch();
        }
        self.find(id)
    }

    /// Resolve the armed confirmation.
    ///
    /// Declining sends nothing. Confirming deletes and then re-reads the
    /// collection; a failed delete leaves the collection as it was.
    pub fn confirm_delete(&mut self, confirmed: bool) -> Result<(), ControllerError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(());
        };
        self.touch();
        if !confirmed {
            info!(id, "ticket deletion cancelled");
            return Ok(());
        }

        match self.client.delete(id) {
            Ok(()) => {
                info!(id, "ticket deleted");
                self.load()
            }
            Err(e) => {
                warn!(id, error = %e, "ticket deletion failed");
                self.surface(&e);
                Err(e.into())
            }
        }
    }

    /// Request and resolve the confirmation in one step, asking `confirm`.
    ///
    /// An id that is not loaded is ignored and leaves any armed gate alone.
    pub fn delete_with_confirmation<F>(&mut self, id: TicketId, confirm: F) -> Result<(), ControllerError>
    where
        F: FnOnce(&Ticket) -> bool,
    {
        let Some(ticket) = self.request_delete(id) else {
            return Ok(());
        };
        let confirmed = confirm(ticket);
        self.confirm_delete(confirmed)
    }

    pub fn dismiss_error(&mut self) {
        if self.error.take().is_some() {
            self.touch();
        }
    }

    fn find(&self, id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    fn surface(&mut self, error: &dyn std::error::Error) {
        self.error = Some(error.to_string());
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

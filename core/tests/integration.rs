//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the ticket client
//! and the controller over real HTTP through `UreqTransport`. Validates that
//! request building, status classification and decoding agree with the
//! actual server.

use ticket_core::{
    ApiError, ClientConfig, LoadPhase, TicketClient, TicketController, TicketCreate, TicketFilter,
    TicketPriority, TicketStatus, TicketUpdate, UreqTransport,
};

/// Start the mock server on its own runtime thread and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn create(title: &str, priority: TicketPriority) -> TicketCreate {
    TicketCreate {
        title: title.to_string(),
        description: format!("{title} details"),
        priority,
    }
}

#[test]
fn client_crud_lifecycle() {
    let base_url = start_server();
    let client = TicketClient::new(&base_url, UreqTransport::new());

    // Step 1: list — should be empty.
    let tickets = client.list(&TicketFilter::default()).unwrap();
    assert!(tickets.is_empty(), "expected empty list");

    // Step 2: create a ticket.
    let created = client
        .create(&create("Printer broken", TicketPriority::Medium))
        .unwrap()
        .expect("create returns the ticket");
    assert_eq!(created.title, "Printer broken");
    assert_eq!(created.status, TicketStatus::New);
    assert!(created.created_at.is_some());
    let id = created.id;

    // Step 3: get the created ticket.
    let fetched = client.get(id).unwrap().expect("get returns the ticket");
    assert_eq!(fetched, created);

    // Step 4: status-only update.
    let updated = client
        .update(id, &TicketUpdate::status(TicketStatus::InProgress))
        .unwrap()
        .expect("update returns the ticket");
    assert_eq!(updated.status, TicketStatus::InProgress);
    assert_eq!(updated.title, "Printer broken");

    // Step 5: filtered list goes through query parameters.
    let filter = TicketFilter {
        status: Some(TicketStatus::InProgress),
        priority: Some(TicketPriority::Medium),
    };
    assert_eq!(client.list(&filter).unwrap().len(), 1);
    let filter = TicketFilter {
        status: Some(TicketStatus::Done),
        priority: None,
    };
    assert!(client.list(&filter).unwrap().is_empty());

    // Step 6: delete answers 204, which is not a decode error.
    client.delete(id).unwrap();

    // Step 7: get after delete — plain-text 404 surfaced verbatim.
    let err = client.get(id).unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    assert_eq!(err.to_string(), format!("ticket {id} not found"));

    // Step 8: delete again — same error shape.
    let err = client.delete(id).unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[test]
fn server_validation_text_is_surfaced() {
    let base_url = start_server();
    let client = TicketClient::new(&base_url, UreqTransport::new());

    let err = client.create(&create("   ", TicketPriority::Low)).unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "title must not be empty");
}

#[test]
fn unreachable_server_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TicketClient::new(&format!("http://{addr}"), UreqTransport::new());
    let err = client.list(&TicketFilter::default()).unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[test]
fn controller_reconciles_every_mutation_through_a_reload() {
    let base_url = start_server();
    let config = ClientConfig::new(&format!("{base_url}/")).unwrap();
    let mut ctl = TicketController::from_config(&config);

    ctl.load().unwrap();
    assert_eq!(ctl.phase(), &LoadPhase::Ready);
    assert!(ctl.tickets().is_empty());

    // Create two tickets through the composer.
    for (title, priority) in [("Login issue", TicketPriority::High), ("Paper jam", TicketPriority::Low)] {
        let draft = ctl.open_composer();
        draft.title = title.to_string();
        draft.description = format!("{title} details");
        draft.priority = priority;
        ctl.submit_create().unwrap();
    }
    assert!(ctl.composer().is_none());
    let titles: Vec<&str> = ctl.tickets().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Paper jam", "Login issue"]);

    // Inline status change, then client-side filtering.
    let login_id = ctl
        .tickets()
        .iter()
        .find(|t| t.title == "Login issue")
        .map(|t| t.id)
        .unwrap();
    ctl.submit_status_update(login_id, TicketStatus::Done).unwrap();
    assert_eq!(ctl.displayed_status(login_id), Some(TicketStatus::Done));

    ctl.set_status_filter(Some(TicketStatus::Done));
    let view = ctl.view();
    assert_eq!(view.tickets.len(), 1);
    assert_eq!(view.tickets[0].id, login_id);
    assert_eq!(view.filter_summary, "status: done");

    // Declined delete leaves everything in place; confirmed delete reloads.
    ctl.delete_with_confirmation(login_id, |_| false).unwrap();
    assert_eq!(ctl.tickets().len(), 2);
    ctl.delete_with_confirmation(login_id, |_| true).unwrap();
    assert_eq!(ctl.tickets().len(), 1);
    assert!(ctl.visible().is_empty());

    // Server-side query path.
    ctl.clear_filter();
    ctl.load_with(TicketFilter {
        status: Some(TicketStatus::Closed),
        priority: None,
    })
    .unwrap();
    assert!(ctl.tickets().is_empty());
}

#[test]
fn controller_surfaces_server_errors() {
    let base_url = start_server();
    let mut ctl = TicketController::new(TicketClient::new(&base_url, UreqTransport::new()));
    ctl.load().unwrap();

    let err = ctl.submit_status_update(99, TicketStatus::Done).unwrap_err();
    assert_eq!(err.to_string(), "ticket 99 not found");
    assert_eq!(ctl.error(), Some("ticket 99 not found"));
    assert!(ctl.tickets().is_empty());
}

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    New,
    InProgress,
    Done,
    Closed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTicket {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TicketPriority,
}

#[derive(Deserialize)]
pub struct UpdateTicket {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    tickets: BTreeMap<u64, Ticket>,
}

pub type Db = Arc<RwLock<Store>>;

/// Failures are answered with a plain-text body.
type ApiResult<T> = Result<T, (StatusCode, String)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/healthz", get(healthz))
        .route("/tickets", get(list_tickets))
        .route("/ticket", post(create_ticket))
        .route(
            "/tickets/{id}",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

fn not_found(id: u64) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("ticket {id} not found"))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_tickets(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Ticket>> {
    let store = db.read().await;
    let tickets = store
        .tickets
        .values()
        .rev()
        .filter(|t| params.status.is_none_or(|s| t.status == s))
        .filter(|t| params.priority.is_none_or(|p| t.priority == p))
        .cloned()
        .collect();
    Json(tickets)
}

async fn create_ticket(
    State(db): State<Db>,
    Json(input): Json<CreateTicket>,
) -> ApiResult<(StatusCode, Json<Ticket>)> {
    if input.title.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "title must not be empty".to_string(),
        ));
    }
    if input.description.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "description must not be empty".to_string(),
        ));
    }
    let mut store = db.write().await;
    store.next_id += 1;
    let stamp = now();
    let ticket = Ticket {
        id: store.next_id,
        title: input.title,
        description: input.description,
        status: TicketStatus::New,
        priority: input.priority,
        created_at: Some(stamp.clone()),
        updated_at: Some(stamp),
    };
    store.tickets.insert(ticket.id, ticket.clone());
    info!(id = ticket.id, "ticket created");
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn get_ticket(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<Ticket>> {
    let store = db.read().await;
    store
        .tickets
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(id))
}

async fn update_ticket(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTicket>,
) -> ApiResult<Json<Ticket>> {
    let mut store = db.write().await;
    let ticket = store.tickets.get_mut(&id).ok_or_else(|| not_found(id))?;
    if let Some(title) = input.title {
        ticket.title = title;
    }
    if let Some(description) = input.description {
        ticket.description = description;
    }
    if let Some(status) = input.status {
        ticket.status = status;
    }
    if let Some(priority) = input.priority {
        ticket.priority = priority;
    }
    ticket.updated_at = Some(now());
    info!(id, "ticket updated");
    Ok(Json(ticket.clone()))
}

async fn delete_ticket(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store.tickets.remove(&id).ok_or_else(|| not_found(id))?;
    info!(id, "ticket deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_serializes_to_json() {
        let ticket = Ticket {
            id: 1,
            title: "Test".to_string(),
            description: "Body".to_string(),
            status: TicketStatus::InProgress,
            priority: TicketPriority::High,
            created_at: None,
            updated_at: None,
        };
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["priority"], "high");
        assert!(json["created_at"].is_null());
    }

    #[test]
    fn create_ticket_defaults_priority_and_description() {
        let input: CreateTicket = serde_json::from_str(r#"{"title":"No extras"}"#).unwrap();
        assert_eq!(input.title, "No extras");
        assert!(input.description.is_empty());
        assert_eq!(input.priority, TicketPriority::Medium);
    }

    #[test]
    fn create_ticket_rejects_missing_title() {
        let result: Result<CreateTicket, _> = serde_json::from_str(r#"{"description":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_ticket_all_fields_optional() {
        let input: UpdateTicket = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.description.is_none());
        assert!(input.status.is_none());
        assert!(input.priority.is_none());
    }

    #[test]
    fn update_ticket_rejects_unknown_status() {
        let result: Result<UpdateTicket, _> = serde_json::from_str(r#"{"status":"archived"}"#);
        assert!(result.is_err());
    }
}

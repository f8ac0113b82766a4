use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Notice, SupportTicket, TicketCategory, TicketPriority};
use crate::services::session::Session;
use crate::services::support::{self, Faq, NewTicket};
use crate::state::AppState;

#[derive(Serialize)]
pub struct TicketsResponse {
    tickets: Vec<SupportTicket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
}

// GET /api/support/tickets
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<TicketsResponse>, AppError> {
    let tickets = match session.uid() {
        Some(uid) => {
            let db = state.conn()?;
            support::list_tickets(&db, uid)
        }
        None => Vec::new(),
    };

    Ok(Json(TicketsResponse {
        tickets,
        notice: None,
    }))
}

// POST /api/support/tickets
#[derive(Deserialize)]
pub struct TicketRequest {
    pub subject: String,
    #[serde(default)]
    pub category: TicketCategory,
    #[serde(default)]
    pub priority: TicketPriority,
    pub message: String,
    pub phone: Option<String>,
}

pub async fn submit_ticket(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(body): Json<TicketRequest>,
) -> Result<Json<TicketsResponse>, AppError> {
    let identity = session.require("submit a support request")?;

    let tickets = {
        let db = state.conn()?;
        support::submit_ticket(
            &db,
            &identity.uid,
            NewTicket {
                subject: body.subject,
                category: body.category,
                priority: body.priority,
                message: body.message,
                phone: body.phone,
            },
        )?
    };

    Ok(Json(TicketsResponse {
        tickets,
        notice: Some(Notice::success(
            "Support request submitted. Our team will contact you soon.",
        )),
    }))
}

// GET /api/support/faq
#[derive(Serialize)]
pub struct HelpResponse {
    faqs: &'static [Faq],
    categories: Vec<&'static str>,
    priorities: Vec<&'static str>,
    support_email: String,
}

pub async fn help(State(state): State<Arc<AppState>>) -> Json<HelpResponse> {
    Json(HelpResponse {
        faqs: support::FAQS,
        categories: TicketCategory::ALL.iter().map(|c| c.as_str()).collect(),
        priorities: TicketPriority::ALL.iter().map(|p| p.as_str()).collect(),
        support_email: state.config.support_email.clone(),
    })
}

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::{Map, Value};

use super::applied;
use crate::db::documents;
use crate::errors::AppError;
use crate::models::{
    decode_entries, fields, iso_timestamp, SupportTicket, TicketCategory, TicketPriority,
    TICKET_STATUS_OPEN,
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: &[Faq] = &[
    Faq {
        question: "How does SafePayAI verify a UPI ID?",
        answer: "We run a risk analysis using our Random Forest model and cross-check with stored flags. The UI shows warnings for high-risk recipients.",
    },
    Faq {
        question: "Where are my saved beneficiaries stored?",
        answer: "Saved beneficiaries are stored in your user document under `beneficiaries`. They are tied to your account UID.",
    },
    Faq {
        question: "What happens if the app is offline?",
        answer: "The app will work in offline mode for read operations. Writes may be saved locally and synced when the device reconnects (if enabled).",
    },
    Faq {
        question: "How do I report a fraud?",
        answer: "Use the support form below to report suspected fraud. Include transaction details and UPI IDs if available.",
    },
];

#[derive(Debug, Clone, Default)]
pub struct NewTicket {
    pub subject: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub message: String,
    pub phone: Option<String>,
}

pub fn build_ticket(input: NewTicket, now: &DateTime<Utc>) -> Result<SupportTicket, AppError> {
    let subject = input.subject.trim();
    let message = input.message.trim();
    if subject.is_empty() || message.is_empty() {
        return Err(AppError::Validation("Please enter a subject and message.".to_string()));
    }

    Ok(SupportTicket {
        id: format!("tkt_{}", now.timestamp_millis()),
        subject: subject.to_string(),
        category: input.category,
        priority: input.priority,
        message: message.to_string(),
        phone: input
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        status: TICKET_STATUS_OPEN.to_string(),
        created_at: iso_timestamp(now),
    })
}

/// Tickets newest first; store failures read as an empty list.
pub fn list_tickets(conn: &Connection, uid: &str) -> Vec<SupportTicket> {
    let loaded = documents::get_document(conn, uid).and_then(|doc| match doc {
        Some(doc) => doc.list(fields::SUPPORT_TICKETS),
        None => Ok(Vec::new()),
    });

    loaded.unwrap_or_else(|e| {
        tracing::error!(error = %e, uid, "failed to load support tickets");
        Vec::new()
    })
}

/// Prepends a new ticket, creating the user document if needed.
pub fn submit_ticket(
    conn: &Connection,
    uid: &str,
    input: NewTicket,
) -> Result<Vec<SupportTicket>, AppError> {
    let ticket = build_ticket(input, &Utc::now())?;

    let doc = documents::get_document(conn, uid)?;
    let (version, current) = match &doc {
        Some(doc) => (doc.version, doc.entries(fields::SUPPORT_TICKETS)?),
        None => (0, Vec::new()),
    };

    let ticket_id = ticket.id.clone();
    let mut updated = Vec::with_capacity(current.len() + 1);
    updated.push(serde_json::to_value(&ticket).map_err(anyhow::Error::from)?);
    updated.extend(current);
    let tickets = decode_entries(fields::SUPPORT_TICKETS, &updated);

    let mut update = Map::new();
    update.insert(fields::SUPPORT_TICKETS.to_string(), Value::Array(updated));
    applied(documents::set_merge(conn, uid, Some(version), update)?)?;

    tracing::info!(uid, ticket = %ticket_id, "support ticket submitted");
    Ok(tickets)
}

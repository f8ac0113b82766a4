use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, Sse};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::errors::AppError;
use crate::models::{Identity, Notice};
use crate::services::session::{self, Session};
use crate::state::AppState;

// POST /api/session (called by the identity gateway with `Authorization: Bearer <shared secret>`)
#[derive(Deserialize)]
pub struct SignInRequest {
    pub uid: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Serialize)]
pub struct SignInResponse {
    token: String,
    identity: Identity,
    notice: Notice,
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    let identity = Identity {
        uid: body.uid.trim().to_string(),
        display_name: body.display_name.filter(|n| !n.trim().is_empty()),
        photo_url: body.photo_url.filter(|p| !p.trim().is_empty()),
    };

    let token = session::sign_in(&state, identity.clone(), session::bearer_token(&headers)).await?;

    Ok(Json(SignInResponse {
        token,
        identity,
        notice: Notice::success("Signed in."),
    }))
}

// GET /api/session
pub async fn current(session: Session) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "identity": session.identity }))
}

// DELETE /api/session
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<serde_json::Value>, AppError> {
    session::sign_out(&state, &session).await?;
    Ok(Json(serde_json::json!({
        "ok": true,
        "notice": Notice::success("Signed out."),
    })))
}

// GET /api/session/events: SSE stream of the caller's session changes
#[derive(Deserialize)]
pub struct EventsQuery {
    pub token: Option<String>,
}

pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Token via query param (EventSource can't set headers)
    let current = session::resolve(&state, query.token).await;
    let uid = current.require("follow session changes")?.uid.clone();

    let rx = state.session_tx.subscribe();

    let live_stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) if event.uid() == uid => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(data).event("session_event")))
        }
        Ok(_) => None,
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(_)) => None,
    });

    let keepalive_stream = tokio_stream::StreamExt::map(
        tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(Duration::from_secs(30))),
        |_| Ok(Event::default().comment("keepalive")),
    );

    Ok(Sse::new(StreamExt::merge(live_stream, keepalive_stream)))
}

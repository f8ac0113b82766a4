use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde_json::{Map, Value};

use crate::db::documents;
use crate::errors::AppError;
use crate::models::{fields, Identity, SessionEvent};
use crate::state::AppState;

/// The caller's identity for one request. An anonymous session is a valid,
/// read-only state rather than an error.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
    pub identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn uid(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.uid.as_str())
    }

    /// The signed-in identity, or `Unauthorized` naming what needed it.
    pub fn require(&self, action: &str) -> Result<&Identity, AppError> {
        self.identity
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized(format!("Please sign in to {action}.")))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

pub async fn resolve(state: &AppState, token: Option<String>) -> Session {
    let Some(token) = token else {
        return Session::anonymous();
    };

    match state.auth.current_identity(&token).await {
        Ok(identity) => Session {
            token: Some(token),
            identity,
        },
        Err(e) => {
            tracing::error!(error = %e, "failed to resolve session, continuing anonymously");
            Session::anonymous()
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(resolve(state, bearer_token(&parts.headers)).await)
    }
}

/// Notifies session subscribers; ignored when nobody is listening.
pub fn publish(state: &AppState, event: SessionEvent) {
    tracing::debug!(uid = %event.uid(), ?event, "session event");
    let _ = state.session_tx.send(event);
}

/// Starts a session and makes sure the user has a document to write to.
/// `credential` is the gateway's bearer secret from the sign-in request.
pub async fn sign_in(
    state: &AppState,
    identity: Identity,
    credential: Option<String>,
) -> Result<String, AppError> {
    if identity.uid.trim().is_empty() {
        return Err(AppError::Validation("uid is required".to_string()));
    }

    let credential = credential.unwrap_or_default();
    let Some(token) = state.auth.sign_in(&identity, &credential).await? else {
        return Err(AppError::Unauthorized("Sign-in could not be verified.".to_string()));
    };

    {
        let db = state.conn()?;
        if documents::get_document(&db, &identity.uid)?.is_none() {
            let mut seed = Map::new();
            seed.insert(fields::NAME.to_string(), Value::from(identity.display_name.clone().unwrap_or_default()));
            seed.insert(fields::PHOTO_URL.to_string(), Value::from(identity.photo_url.clone().unwrap_or_default()));
            for list in [fields::BENEFICIARIES, fields::SUPPORT_TICKETS, fields::TRANSACTIONS] {
                seed.insert(list.to_string(), Value::Array(Vec::new()));
            }
            // A concurrent sign-in may have created it already; either way it exists.
            documents::set_merge(&db, &identity.uid, Some(0), seed)?;
            tracing::info!(uid = %identity.uid, "created user document");
        }
    }

    publish(state, SessionEvent::SignedIn { uid: identity.uid.clone() });
    Ok(token)
}

pub async fn sign_out(state: &AppState, session: &Session) -> Result<(), AppError> {
    let Some(token) = session.token.as_deref() else {
        return Err(AppError::Unauthorized("Not signed in.".to_string()));
    };

    match state.auth.sign_out(token).await? {
        Some(uid) => {
            tracing::info!(uid = %uid, "signed out");
            publish(state, SessionEvent::SignedOut { uid });
            Ok(())
        }
        None => Err(AppError::Unauthorized("Not signed in.".to_string())),
    }
}

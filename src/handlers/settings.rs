use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Notice, UserProfile};
use crate::services::session::Session;
use crate::services::settings;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProfileResponse {
    profile: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
}

// GET /api/settings/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = match &session.identity {
        Some(identity) => {
            let db = state.conn()?;
            Some(settings::load_profile(&db, identity))
        }
        None => None,
    };

    Ok(Json(ProfileResponse {
        profile,
        notice: None,
    }))
}

// PUT /api/settings/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(body): Json<UserProfile>,
) -> Result<Json<ProfileResponse>, AppError> {
    let identity = session.require("update your profile")?;

    let profile = {
        let db = state.conn()?;
        settings::update_profile(&db, &identity.uid, &body)?;
        settings::load_profile(&db, identity)
    };

    Ok(Json(ProfileResponse {
        profile: Some(profile),
        notice: Some(Notice::success("Profile updated successfully!")),
    }))
}

// DELETE /api/settings/account
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<serde_json::Value>, AppError> {
    settings::delete_account(&state, &session).await?;
    Ok(Json(serde_json::json!({
        "ok": true,
        "notice": Notice::success("Account deleted successfully."),
    })))
}

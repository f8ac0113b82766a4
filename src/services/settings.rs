use rusqlite::Connection;
use serde_json::{Map, Value};

use super::applied;
use super::session::{self, Session};
use crate::db::documents;
use crate::errors::AppError;
use crate::models::{fields, Identity, SessionEvent, UserProfile};
use crate::state::AppState;

/// Profile fields from the document, filling name and photo from the
/// identity when the document has none. Store failures fall back the same way.
pub fn load_profile(conn: &Connection, identity: &Identity) -> UserProfile {
    let mut profile = match documents::get_document(conn, &identity.uid) {
        Ok(Some(doc)) => UserProfile {
            name: doc.text(fields::NAME),
            phone: doc.text(fields::PHONE),
            photo_url: doc.text(fields::PHOTO_URL),
        },
        Ok(None) => UserProfile::default(),
        Err(e) => {
            tracing::error!(error = %e, uid = %identity.uid, "failed to load profile");
            UserProfile::default()
        }
    };

    if profile.name.is_empty() {
        profile.name = identity.display_name.clone().unwrap_or_default();
    }
    if profile.photo_url.is_empty() {
        profile.photo_url = identity.photo_url.clone().unwrap_or_default();
    }
    profile
}

pub fn update_profile(conn: &Connection, uid: &str, profile: &UserProfile) -> Result<(), AppError> {
    let mut update = Map::new();
    update.insert(fields::NAME.to_string(), Value::from(profile.name.trim()));
    update.insert(fields::PHONE.to_string(), Value::from(profile.phone.trim()));
    update.insert(fields::PHOTO_URL.to_string(), Value::from(profile.photo_url.trim()));

    applied(documents::update_fields(conn, uid, None, update)?)?;
    tracing::info!(uid, "profile updated");
    Ok(())
}

/// Deletes the user document, then the identity, then ends the session.
pub async fn delete_account(state: &AppState, session: &Session) -> Result<(), AppError> {
    let uid = session.require("delete your account")?.uid.clone();

    let removed = {
        let db = state.conn()?;
        documents::delete_document(&db, &uid)?
    };
    state.auth.delete_identity(&uid).await?;

    tracing::info!(uid = %uid, had_document = removed, "account deleted");
    session::publish(state, SessionEvent::Deleted { uid });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use serde_json::json;

    fn identity() -> Identity {
        Identity {
            uid: "u1".to_string(),
            display_name: Some("Varsha".to_string()),
            photo_url: Some("http://photo".to_string()),
        }
    }

    #[test]
    fn test_profile_falls_back_to_identity() {
        let conn = db::init_db(":memory:").unwrap();
        let profile = load_profile(&conn, &identity());
        assert_eq!(profile.name, "Varsha");
        assert_eq!(profile.photo_url, "http://photo");
        assert_eq!(profile.phone, "");

        let seed = json!({"name": "V. R.", "phone": "+91 98"}).as_object().cloned().unwrap();
        documents::set_merge(&conn, "u1", None, seed).unwrap();
        let profile = load_profile(&conn, &identity());
        assert_eq!(profile.name, "V. R.");
        assert_eq!(profile.phone, "+91 98");
        assert_eq!(profile.photo_url, "http://photo");
    }

    #[test]
    fn test_update_profile_keeps_other_fields() {
        let conn = db::init_db(":memory:").unwrap();
        let seed = json!({"name": "Old", "beneficiaries": [{"upi": "a@b"}]})
            .as_object()
            .cloned()
            .unwrap();
        documents::set_merge(&conn, "u1", None, seed).unwrap();

        let profile = UserProfile {
            name: " New ".to_string(),
            phone: "123".to_string(),
            photo_url: String::new(),
        };
        update_profile(&conn, "u1", &profile).unwrap();

        let doc = documents::get_document(&conn, "u1").unwrap().unwrap();
        assert_eq!(doc.data["name"], "New");
        assert_eq!(doc.data["phone"], "123");
        assert_eq!(doc.data["beneficiaries"][0]["upi"], "a@b");
    }

    #[test]
    fn test_update_profile_needs_document() {
        let conn = db::init_db(":memory:").unwrap();
        let err = update_profile(&conn, "ghost", &UserProfile::default()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

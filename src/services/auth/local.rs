use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use rusqlite::Connection;

use super::AuthProvider;
use crate::db::sessions;
use crate::models::Identity;

/// Session-table backed provider sharing the application database. Sign-in
/// is accepted only from callers holding the configured shared secret.
pub struct LocalAuthProvider {
    db: Arc<Mutex<Connection>>,
    shared_secret: String,
}

impl LocalAuthProvider {
    pub fn new(db: Arc<Mutex<Connection>>, shared_secret: impl Into<String>) -> Self {
        Self {
            db,
            shared_secret: shared_secret.into(),
        }
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> anyhow::Result<T>) -> anyhow::Result<T> {
        let conn = self.db.lock().map_err(|_| anyhow!("database lock poisoned"))?;
        f(&conn)
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_in(&self, identity: &Identity, credential: &str) -> anyhow::Result<Option<String>> {
        anyhow::ensure!(!identity.uid.trim().is_empty(), "uid must not be empty");
        if self.shared_secret.is_empty() || credential != self.shared_secret {
            tracing::warn!(uid = %identity.uid, "sign-in refused: bad credential");
            return Ok(None);
        }

        let token = self.with_conn(|conn| sessions::create_session(conn, identity))?;
        tracing::info!(uid = %identity.uid, "session started");
        Ok(Some(token))
    }

    async fn current_identity(&self, token: &str) -> anyhow::Result<Option<Identity>> {
        self.with_conn(|conn| sessions::identity_for_token(conn, token))
    }

    async fn sign_out(&self, token: &str) -> anyhow::Result<Option<String>> {
        self.with_conn(|conn| sessions::delete_session(conn, token))
    }

    async fn delete_identity(&self, uid: &str) -> anyhow::Result<()> {
        let removed = self.with_conn(|conn| sessions::delete_sessions_for_uid(conn, uid))?;
        tracing::info!(uid, sessions = removed, "identity deleted");
        Ok(())
    }
}

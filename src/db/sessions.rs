use rusqlite::{params, Connection, OptionalExtension};

use crate::models::Identity;

pub fn create_session(conn: &Connection, identity: &Identity) -> anyhow::Result<String> {
    let token = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO sessions (token, uid, display_name, photo_url) VALUES (?1, ?2, ?3, ?4)",
        params![token, identity.uid, identity.display_name, identity.photo_url],
    )?;
    Ok(token)
}

pub fn identity_for_token(conn: &Connection, token: &str) -> anyhow::Result<Option<Identity>> {
    let identity = conn
        .query_row(
            "SELECT uid, display_name, photo_url FROM sessions WHERE token = ?1",
            params![token],
            |row| {
                Ok(Identity {
                    uid: row.get(0)?,
                    display_name: row.get(1)?,
                    photo_url: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(identity)
}

/// Ends one session, returning the uid it belonged to.
pub fn delete_session(conn: &Connection, token: &str) -> anyhow::Result<Option<String>> {
    let uid: Option<String> = conn
        .query_row(
            "SELECT uid FROM sessions WHERE token = ?1",
            params![token],
            |row| row.get(0),
        )
        .optional()?;

    if uid.is_some() {
        conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    }
    Ok(uid)
}

pub fn delete_sessions_for_uid(conn: &Connection, uid: &str) -> anyhow::Result<usize> {
    let count = conn.execute("DELETE FROM sessions WHERE uid = ?1", params![uid])?;
    Ok(count)
}

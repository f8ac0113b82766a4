use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};

use crate::models::{iso_timestamp, UserDocument};

/// Result of a conditional document write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WriteOutcome {
    Applied { version: i64 },
    /// The stored version no longer matches the one the caller read.
    /// A missing document reports version 0.
    Conflict { current: i64 },
    /// `update_fields` targets documents that must already exist.
    Missing,
}

pub fn get_document(conn: &Connection, uid: &str) -> anyhow::Result<Option<UserDocument>> {
    let row = conn
        .query_row(
            "SELECT data, version, updated_at FROM user_documents WHERE uid = ?1",
            params![uid],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((data, version, updated_at)) => {
            let data: Map<String, Value> = serde_json::from_str(&data)?;
            Ok(Some(UserDocument {
                uid: uid.to_string(),
                data,
                version,
                updated_at,
            }))
        }
        None => Ok(None),
    }
}

/// Partial update of named top-level fields. Fails with `Missing` when the
/// document does not exist. `expected_version: None` writes unconditionally.
pub fn update_fields(
    conn: &Connection,
    uid: &str,
    expected_version: Option<i64>,
    fields: Map<String, Value>,
) -> anyhow::Result<WriteOutcome> {
    let Some(mut doc) = get_document(conn, uid)? else {
        return Ok(WriteOutcome::Missing);
    };
    if let Some(expected) = expected_version {
        if expected != doc.version {
            return Ok(WriteOutcome::Conflict { current: doc.version });
        }
    }

    doc.data.extend(fields);
    write_existing(conn, &doc)
}

/// Merges named fields into the document, creating it when missing.
pub fn set_merge(
    conn: &Connection,
    uid: &str,
    expected_version: Option<i64>,
    fields: Map<String, Value>,
) -> anyhow::Result<WriteOutcome> {
    let existing = get_document(conn, uid)?;
    let current = existing.as_ref().map(|d| d.version).unwrap_or(0);
    if let Some(expected) = expected_version {
        if expected != current {
            return Ok(WriteOutcome::Conflict { current });
        }
    }

    match existing {
        Some(mut doc) => {
            doc.data.extend(fields);
            write_existing(conn, &doc)
        }
        None => {
            let now = iso_timestamp(&Utc::now());
            let data = serde_json::to_string(&fields)?;
            let inserted = conn.execute(
                "INSERT INTO user_documents (uid, data, version, updated_at) VALUES (?1, ?2, 1, ?3)
                 ON CONFLICT(uid) DO NOTHING",
                params![uid, data, now],
            )?;
            if inserted == 0 {
                let current = get_document(conn, uid)?.map(|d| d.version).unwrap_or(0);
                return Ok(WriteOutcome::Conflict { current });
            }
            Ok(WriteOutcome::Applied { version: 1 })
        }
    }
}

pub fn delete_document(conn: &Connection, uid: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM user_documents WHERE uid = ?1", params![uid])?;
    Ok(count > 0)
}

fn write_existing(conn: &Connection, doc: &UserDocument) -> anyhow::Result<WriteOutcome> {
    let now = iso_timestamp(&Utc::now());
    let data = serde_json::to_string(&doc.data)?;
    let count = conn.execute(
        "UPDATE user_documents SET data = ?1, version = version + 1, updated_at = ?2
         WHERE uid = ?3 AND version = ?4",
        params![data, now, doc.uid, doc.version],
    )?;

    if count == 0 {
        let current = get_document(conn, &doc.uid)?.map(|d| d.version).unwrap_or(0);
        return Ok(WriteOutcome::Conflict { current });
    }
    Ok(WriteOutcome::Applied { version: doc.version + 1 })
}

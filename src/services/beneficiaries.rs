use chrono::Utc;
use rusqlite::Connection;
use serde_json::{Map, Value};

use super::applied;
use crate::db::documents;
use crate::errors::AppError;
use crate::models::{decode_entries, fields, iso_timestamp, Beneficiary};

#[derive(Debug)]
pub enum AddOutcome {
    Added(Vec<Beneficiary>),
    /// A beneficiary with the same UPI ID was already saved; nothing was written.
    Duplicate(Vec<Beneficiary>),
}

#[derive(Debug, Clone, Default)]
pub struct NewBeneficiary {
    pub name: String,
    pub upi: String,
    pub bank: String,
    pub phone: String,
}

fn upi_of(entry: &Value) -> Option<&str> {
    entry.get("upi").and_then(Value::as_str)
}

/// Appends `new` unless its UPI ID is already present. Stored entries are
/// carried over untouched.
pub fn append_unique(current: &[Value], new: Value) -> Option<Vec<Value>> {
    let upi = upi_of(&new);
    if current.iter().any(|entry| upi_of(entry) == upi) {
        return None;
    }
    let mut updated = current.to_vec();
    updated.push(new);
    Some(updated)
}

/// Drops every entry with the given UPI ID, keeping the rest exactly as stored.
pub fn remove_by_upi(current: &[Value], upi: &str) -> Vec<Value> {
    current
        .iter()
        .filter(|entry| upi_of(entry) != Some(upi))
        .cloned()
        .collect()
}

/// Saved beneficiaries; store failures read as an empty list.
pub fn list(conn: &Connection, uid: &str) -> Vec<Beneficiary> {
    let loaded = documents::get_document(conn, uid).and_then(|doc| match doc {
        Some(doc) => doc.list(fields::BENEFICIARIES),
        None => Ok(Vec::new()),
    });

    loaded.unwrap_or_else(|e| {
        tracing::error!(error = %e, uid, "failed to load beneficiaries");
        Vec::new()
    })
}

pub fn add(conn: &Connection, uid: &str, input: NewBeneficiary) -> Result<AddOutcome, AppError> {
    if input.name.trim().is_empty() || input.upi.trim().is_empty() {
        return Err(AppError::Validation("Name and UPI ID are required.".to_string()));
    }

    let doc = documents::get_document(conn, uid)?
        .ok_or_else(|| AppError::NotFound("user document".to_string()))?;
    let current = doc.entries(fields::BENEFICIARIES)?;

    let beneficiary = Beneficiary::new(
        &input.name,
        &input.upi,
        &input.bank,
        &input.phone,
        iso_timestamp(&Utc::now()),
    );
    let upi = beneficiary.upi.clone();
    let entry = serde_json::to_value(&beneficiary).map_err(anyhow::Error::from)?;

    let Some(updated) = append_unique(&current, entry) else {
        tracing::warn!(uid, upi = %upi, "beneficiary with same UPI already exists");
        return Ok(AddOutcome::Duplicate(decode_entries(fields::BENEFICIARIES, &current)));
    };

    write_list(conn, uid, doc.version, updated.clone())?;
    tracing::info!(uid, upi = %upi, "beneficiary added");
    Ok(AddOutcome::Added(decode_entries(fields::BENEFICIARIES, &updated)))
}

pub fn remove(conn: &Connection, uid: &str, upi: &str) -> Result<Vec<Beneficiary>, AppError> {
    let doc = documents::get_document(conn, uid)?
        .ok_or_else(|| AppError::NotFound("user document".to_string()))?;
    let current = doc.entries(fields::BENEFICIARIES)?;

    let updated = remove_by_upi(&current, upi);
    let removed = current.len() - updated.len();
    let remaining = decode_entries(fields::BENEFICIARIES, &updated);
    write_list(conn, uid, doc.version, updated)?;

    tracing::info!(uid, upi, removed, "beneficiary removed");
    Ok(remaining)
}

fn write_list(conn: &Connection, uid: &str, version: i64, list: Vec<Value>) -> Result<i64, AppError> {
    let mut update = Map::new();
    update.insert(fields::BENEFICIARIES.to_string(), Value::Array(list));
    applied(documents::update_fields(conn, uid, Some(version), update)?)
}

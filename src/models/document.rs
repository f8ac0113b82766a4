use anyhow::bail;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Top-level field names on a user document.
pub mod fields {
    pub const BENEFICIARIES: &str = "beneficiaries";
    pub const SUPPORT_TICKETS: &str = "supportTickets";
    pub const TRANSACTIONS: &str = "transactions";
    pub const NAME: &str = "name";
    pub const PHONE: &str = "phone";
    pub const PHOTO_URL: &str = "photoURL";
}

/// A user's document as read from the store, with the version it was read at.
#[derive(Debug, Clone)]
pub struct UserDocument {
    pub uid: String,
    pub data: Map<String, Value>,
    pub version: i64,
    pub updated_at: String,
}

impl UserDocument {
    /// Raw elements of an array field, treating absence as empty. Only a
    /// non-array value is an error.
    pub fn entries(&self, name: &str) -> anyhow::Result<Vec<Value>> {
        match self.data.get(name) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(_) => bail!("malformed field `{name}` on document {}: not an array", self.uid),
        }
    }

    /// Decodes an array field element by element; see [`decode_entries`].
    pub fn list<T: DeserializeOwned>(&self, name: &str) -> anyhow::Result<Vec<T>> {
        Ok(decode_entries(name, &self.entries(name)?))
    }

    /// String field, treating absent or non-string values as empty.
    pub fn text(&self, name: &str) -> String {
        self.data
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

/// Decodes each element on its own, skipping the ones that don't decode so
/// one bad record never hides the rest.
pub fn decode_entries<T: DeserializeOwned>(field: &str, items: &[Value]) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(error = %e, field, index, "skipping malformed entry");
                None
            }
        })
        .collect()
}

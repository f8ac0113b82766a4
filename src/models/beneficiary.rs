use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub upi: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub bank: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub added_at: String,
    /// Fields written by other clients (e.g. `photoURL`), kept as-is on rewrite.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Beneficiary {
    pub fn new(name: &str, upi: &str, bank: &str, phone: &str, added_at: String) -> Self {
        let bank = bank.trim();
        Self {
            name: name.trim().to_string(),
            upi: upi.trim().to_string(),
            bank: if bank.is_empty() { "Unknown".to_string() } else { bank.to_string() },
            phone: phone.trim().to_string(),
            added_at,
            extra: Map::new(),
        }
    }
}

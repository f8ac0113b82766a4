use serde::{Deserialize, Serialize};

/// The signed-in identity as reported by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub uid: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn { uid: String },
    SignedOut { uid: String },
    Deleted { uid: String },
}

impl SessionEvent {
    pub fn uid(&self) -> &str {
        match self {
            SessionEvent::SignedIn { uid }
            | SessionEvent::SignedOut { uid }
            | SessionEvent::Deleted { uid } => uid,
        }
    }
}

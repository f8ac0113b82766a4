use serde::{Deserialize, Serialize};

use super::lenient;

pub const TICKET_STATUS_OPEN: &str = "Open";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subject: String,
    /// Unknown or missing values read as the default.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub category: TicketCategory,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub priority: TicketPriority,
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum TicketCategory {
    #[default]
    Technical,
    Billing,
    #[serde(rename = "Fraud Report")]
    FraudReport,
    #[serde(rename = "Feature Request")]
    FeatureRequest,
    Other,
}

impl TicketCategory {
    pub const ALL: [TicketCategory; 5] = [
        TicketCategory::Technical,
        TicketCategory::Billing,
        TicketCategory::FraudReport,
        TicketCategory::FeatureRequest,
        TicketCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketCategory::Technical => "Technical",
            TicketCategory::Billing => "Billing",
            TicketCategory::FraudReport => "Fraud Report",
            TicketCategory::FeatureRequest => "Feature Request",
            TicketCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum TicketPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Normal,
        TicketPriority::High,
        TicketPriority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Normal => "Normal",
            TicketPriority::High => "High",
            TicketPriority::Urgent => "Urgent",
        }
    }
}

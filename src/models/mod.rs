pub mod beneficiary;
pub mod document;
pub mod identity;
pub mod lenient;
pub mod notice;
pub mod profile;
pub mod ticket;
pub mod transaction;

pub use beneficiary::Beneficiary;
pub use document::{decode_entries, fields, UserDocument};
pub use identity::{Identity, SessionEvent};
pub use notice::{Notice, NoticeLevel, RetryAction};
pub use profile::UserProfile;
pub use ticket::{SupportTicket, TicketCategory, TicketPriority, TICKET_STATUS_OPEN};
pub use transaction::{Transaction, TypeFilter};

use chrono::{DateTime, Utc};

/// ISO-8601 UTC with millisecond precision, e.g. `2025-03-15T14:00:00.000Z`.
pub fn iso_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

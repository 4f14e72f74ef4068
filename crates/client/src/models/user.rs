//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlas_core::{Email, UserId};

/// A registered user, exactly as persisted.
///
/// Records are append-only: created by registration, never updated in place,
/// removed only by a full data wipe. The password is stored and compared in
/// plain text for behavioral parity with the system this replaces; this is a
/// known weakness, not a template for real credential storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Timestamp-derived ID assigned at registration.
    pub id: UserId,
    /// Given name, trimmed.
    pub first_name: String,
    /// Family name, trimmed.
    pub last_name: String,
    /// Case-folded email; unique across all records.
    pub email: Email,
    /// Plain-text password.
    pub password: String,
    /// When the account was created.
    pub registered_at: DateTime<Utc>,
}

impl UserRecord {
    /// The denormalized snapshot stored in a session at login.
    #[must_use]
    pub fn snapshot(&self) -> super::CurrentUser {
        super::CurrentUser {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

//! Session-related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlas_core::{Email, UserId};

/// The identity snapshot a session carries.
///
/// Denormalized at login: later edits to the user record (were any possible)
/// would not be reflected here, and the session is deliberately not checked
/// against the user list after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The user's record ID.
    pub id: UserId,
    /// Given name at login time.
    pub first_name: String,
    /// Family name at login time.
    pub last_name: String,
    /// Case-folded email; also the favorites key.
    pub email: Email,
}

/// The singleton active session.
///
/// At most one exists per store; login overwrites it, logout deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Snapshot of the user who logged in.
    pub user: CurrentUser,
    /// When the session was established.
    pub established_at: DateTime<Utc>,
    /// Whether the user asked to be remembered.
    pub remember: bool,
}

//! Account store: registration, sessions, and favorites.
//!
//! All state lives in an injected [`KvStore`] as JSON blobs, one key per
//! concern: the registered-user list, the singleton active session, and one
//! favorites array per user keyed by case-folded email.
//!
//! Two propagation rules hold throughout:
//!
//! - Validation and domain failures are returned as [`AccountError`]
//!   variants the caller matches on; nothing here panics.
//! - Corrupt persisted JSON is absorbed on read - treated as absent/empty
//!   with a `warn` - and never surfaced to the caller.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use atlas_core::{CharacterId, Email, EmailError, UserId};

use crate::models::{CurrentUser, Session, UserRecord};
use crate::store::{KvStore, StoreError};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Storage keys used by the account store.
pub mod keys {
    /// Key for the whole registered-user list (JSON array).
    pub const REGISTERED_USERS: &str = "registered_users";

    /// Key for the singleton active session (JSON object).
    pub const ACTIVE_SESSION: &str = "active_session";

    /// Prefix for per-user favorite sets; the rest of the key is the
    /// case-folded email.
    pub const FAVORITES_PREFIX: &str = "favorites:";

    /// The favorites key for a given email.
    #[must_use]
    pub fn favorites(email: &atlas_core::Email) -> String {
        format!("{FAVORITES_PREFIX}{email}")
    }
}

/// Errors returned by account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A required field was empty.
    #[error("all fields are required")]
    InvalidInput,

    /// The email failed the (deliberately loose) format check.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password is shorter than the minimum.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Another account already uses this case-folded email.
    #[error("this email is already registered")]
    DuplicateEmail,

    /// No account matches the given email.
    #[error("no account found for this email")]
    UserNotFound,

    /// The password does not match the account.
    #[error("wrong password")]
    WrongPassword,

    /// Persisting a write failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Summary of the session user's account, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Case-folded email.
    pub email: Email,
    /// Number of favorited characters.
    pub favorite_count: usize,
    /// The favorited IDs, ascending.
    pub favorites: Vec<CharacterId>,
}

/// Registration, login/session, and favorites over a [`KvStore`].
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct AccountStore {
    store: Arc<dyn KvStore>,
}

impl AccountStore {
    /// Create an account store over the given key-value store.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new account.
    ///
    /// Names are trimmed and the email case-folded before storage. The new
    /// record is appended to the user list; the caller is *not* logged in.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if any field is empty, `InvalidEmail`/`WeakPassword`
    /// for format failures, `DuplicateEmail` if the case-folded email is
    /// taken, and `Storage` if the write fails.
    pub fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AccountError> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() || last_name.is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AccountError::InvalidInput);
        }

        let email = Email::parse(email)?;

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AccountError::WeakPassword);
        }

        let mut users = self.load_users();
        if users.iter().any(|u| u.email == email) {
            return Err(AccountError::DuplicateEmail);
        }

        let now = Utc::now();
        let record = UserRecord {
            id: UserId::from_timestamp(now),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email,
            password: password.to_owned(),
            registered_at: now,
        };
        debug!(email = %record.email, "Registering user");
        users.push(record);
        self.write_json(keys::REGISTERED_USERS, &users)
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Log in and establish the singleton session.
    ///
    /// The email is matched case-insensitively; the password in plain text.
    /// A successful login overwrites any existing session with a denormalized
    /// snapshot of the user taken now.
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `WrongPassword`, or `Storage` if the session write
    /// fails.
    pub fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<CurrentUser, AccountError> {
        let normalized = email.trim().to_lowercase();
        let users = self.load_users();
        let user = users
            .iter()
            .find(|u| u.email.as_str() == normalized)
            .ok_or(AccountError::UserNotFound)?;

        if user.password != password {
            return Err(AccountError::WrongPassword);
        }

        let session = Session {
            user: user.snapshot(),
            established_at: Utc::now(),
            remember,
        };
        self.write_json(keys::ACTIVE_SESSION, &session)?;
        debug!(email = %session.user.email, "Session established");
        Ok(session.user)
    }

    /// The session user, if a session exists and is readable.
    ///
    /// Corrupt session data is treated as "not logged in", never an error.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        let raw = self.store.get(keys::ACTIVE_SESSION)?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session.user),
            Err(err) => {
                warn!(error = %err, "Session data is corrupt, treating as logged out");
                None
            }
        }
    }

    /// Whether a session user is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// The session user, if any.
    ///
    /// The redirect-or-continue decision belongs to the presentation layer;
    /// this is just [`current_user`](Self::current_user) under the name the
    /// gatekeeping call sites use.
    #[must_use]
    pub fn require_auth(&self) -> Option<CurrentUser> {
        self.current_user()
    }

    /// Delete the session. Idempotent; a failed delete is logged, not raised.
    pub fn logout(&self) {
        if let Err(err) = self.store.remove(keys::ACTIVE_SESSION) {
            warn!(error = %err, "Failed to persist logout");
        }
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    /// The favorite set for a user.
    ///
    /// Absent or corrupt data yields an empty set. Stored IDs are normalized
    /// to positive integers; anything else in the array is dropped.
    #[must_use]
    pub fn favorites_of(&self, user: &CurrentUser) -> BTreeSet<CharacterId> {
        let Some(raw) = self.store.get(&keys::favorites(&user.email)) else {
            return BTreeSet::new();
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!(email = %user.email, error = %err, "Favorites data is corrupt, treating as empty");
                return BTreeSet::new();
            }
        };
        values.iter().filter_map(normalize_id).collect()
    }

    /// Whether the session user has favorited `id`. `false` with no session.
    #[must_use]
    pub fn is_favorite(&self, id: CharacterId) -> bool {
        self.current_user()
            .is_some_and(|user| self.favorites_of(&user).contains(&id))
    }

    /// Toggle `id` in the session user's favorite set.
    ///
    /// Returns the new membership state. With no session this is an inert
    /// `false`: the UI is expected to gate the action, so an unauthenticated
    /// toggle is simply ignored rather than treated as an error. A failed
    /// write is logged and the previous state stands.
    pub fn toggle_favorite(&self, id: CharacterId) -> bool {
        let Some(user) = self.current_user() else {
            debug!("Ignoring favorite toggle without a session");
            return false;
        };

        let mut favorites = self.favorites_of(&user);
        let added = favorites.insert(id);
        if !added {
            favorites.remove(&id);
        }

        if let Err(err) = self.write_json(&keys::favorites(&user.email), &favorites) {
            warn!(email = %user.email, error = %err, "Failed to persist favorites");
            return !added;
        }
        debug!(email = %user.email, %id, added, "Favorite toggled");
        added
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Every registered user record, passwords included.
    ///
    /// Debug listing only. Returning the stored password is behavioral parity
    /// with the system this replaces, and exactly as unwise there as here.
    #[must_use]
    pub fn all_users(&self) -> Vec<UserRecord> {
        self.load_users()
    }

    /// Account summary for the session user, if any.
    #[must_use]
    pub fn user_stats(&self) -> Option<UserStats> {
        let user = self.current_user()?;
        let favorites = self.favorites_of(&user);
        Some(UserStats {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            favorite_count: favorites.len(),
            favorites: favorites.into_iter().collect(),
        })
    }

    /// Delete all users, the session, and every favorite set. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if any removal fails to persist.
    pub fn wipe_all(&self) -> Result<(), AccountError> {
        self.store.remove(keys::REGISTERED_USERS)?;
        self.store.remove(keys::ACTIVE_SESSION)?;
        for key in self.store.keys() {
            if key.starts_with(keys::FAVORITES_PREFIX) {
                self.store.remove(&key)?;
            }
        }
        debug!("All account data wiped");
        Ok(())
    }

    // =========================================================================
    // Storage Helpers
    // =========================================================================

    fn load_users(&self) -> Vec<UserRecord> {
        let Some(raw) = self.store.get(keys::REGISTERED_USERS) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(users) => users,
            Err(err) => {
                warn!(error = %err, "User list is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AccountError> {
        let json = serde_json::to_string(value).map_err(StoreError::from)?;
        self.store.set(key, &json)?;
        Ok(())
    }
}

/// Normalize one stored favorites entry to a positive integer ID.
fn normalize_id(value: &serde_json::Value) -> Option<CharacterId> {
    let id = match value {
        serde_json::Value::Number(n) => n.as_u64()?,
        serde_json::Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u32::try_from(id)
        .ok()
        .filter(|&id| id > 0)
        .map(CharacterId::new)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store() -> AccountStore {
        AccountStore::new(Arc::new(MemoryStore::new()))
    }

    fn registered() -> AccountStore {
        let accounts = store();
        accounts
            .register("Rick", "Sanchez", "rick@example.com", "portalgun")
            .unwrap();
        accounts
    }

    // =========================================================================
    // Registration
    // =========================================================================

    #[test]
    fn test_register_appends_without_login() {
        let accounts = registered();
        assert_eq!(accounts.all_users().len(), 1);
        assert!(accounts.current_user().is_none());

        let user = &accounts.all_users()[0];
        assert_eq!(user.first_name, "Rick");
        assert_eq!(user.email.as_str(), "rick@example.com");
        assert_eq!(user.password, "portalgun");
    }

    #[test]
    fn test_register_trims_and_case_folds() {
        let accounts = store();
        accounts
            .register("  Morty ", " Smith ", "  Morty@Example.COM ", "aw-geez")
            .unwrap();
        let user = &accounts.all_users()[0];
        assert_eq!(user.first_name, "Morty");
        assert_eq!(user.last_name, "Smith");
        assert_eq!(user.email.as_str(), "morty@example.com");
    }

    #[test]
    fn test_register_rejects_empty_fields() {
        let accounts = store();
        for (first, last, email, password) in [
            ("", "Sanchez", "rick@example.com", "portalgun"),
            ("Rick", "  ", "rick@example.com", "portalgun"),
            ("Rick", "Sanchez", "", "portalgun"),
            ("Rick", "Sanchez", "rick@example.com", ""),
        ] {
            let err = accounts.register(first, last, email, password).unwrap_err();
            assert!(matches!(err, AccountError::InvalidInput), "{first:?} {last:?}");
        }
        assert!(accounts.all_users().is_empty());
    }

    #[test]
    fn test_register_rejects_bad_email_and_weak_password() {
        let accounts = store();
        assert!(matches!(
            accounts.register("Rick", "Sanchez", "no-at.com", "portalgun"),
            Err(AccountError::InvalidEmail(_))
        ));
        assert!(matches!(
            accounts.register("Rick", "Sanchez", "rick@com", "portalgun"),
            Err(AccountError::InvalidEmail(_))
        ));
        assert!(matches!(
            accounts.register("Rick", "Sanchez", "rick@example.com", "12345"),
            Err(AccountError::WeakPassword)
        ));
    }

    #[test]
    fn test_register_rejects_duplicate_case_folded_email() {
        let accounts = registered();
        let err = accounts
            .register("Other", "Rick", "RICK@EXAMPLE.COM", "different")
            .unwrap_err();
        assert!(matches!(err, AccountError::DuplicateEmail));
        assert_eq!(accounts.all_users().len(), 1);
    }

    // =========================================================================
    // Login & Session
    // =========================================================================

    #[test]
    fn test_login_unknown_email() {
        let accounts = registered();
        assert!(matches!(
            accounts.login("nobody@example.com", "whatever", false),
            Err(AccountError::UserNotFound)
        ));
    }

    #[test]
    fn test_login_wrong_password() {
        let accounts = registered();
        assert!(matches!(
            accounts.login("rick@example.com", "not-it", false),
            Err(AccountError::WrongPassword)
        ));
        assert!(!accounts.is_authenticated());
    }

    #[test]
    fn test_login_establishes_denormalized_session() {
        let accounts = registered();
        let user = accounts
            .login(" RICK@example.com ", "portalgun", true)
            .unwrap();
        assert_eq!(user.first_name, "Rick");
        assert_eq!(user.email.as_str(), "rick@example.com");

        assert!(accounts.is_authenticated());
        assert_eq!(accounts.current_user().unwrap(), user);
        assert_eq!(accounts.require_auth().unwrap(), user);
    }

    #[test]
    fn test_login_overwrites_previous_session() {
        let accounts = registered();
        accounts
            .register("Morty", "Smith", "morty@example.com", "aw-geez")
            .unwrap();

        accounts.login("rick@example.com", "portalgun", false).unwrap();
        accounts.login("morty@example.com", "aw-geez", false).unwrap();
        assert_eq!(
            accounts.current_user().unwrap().email.as_str(),
            "morty@example.com"
        );
    }

    #[test]
    fn test_logout_is_idempotent() {
        let accounts = registered();
        accounts.login("rick@example.com", "portalgun", false).unwrap();

        accounts.logout();
        assert!(!accounts.is_authenticated());
        accounts.logout();
        assert!(!accounts.is_authenticated());
    }

    #[test]
    fn test_corrupt_session_reads_as_logged_out() {
        let accounts = registered();
        accounts.store.set(keys::ACTIVE_SESSION, "{broken").unwrap();
        assert!(accounts.current_user().is_none());
        assert!(!accounts.is_authenticated());
    }

    #[test]
    fn test_corrupt_user_list_reads_as_empty() {
        let accounts = store();
        accounts.store.set(keys::REGISTERED_USERS, "not json").unwrap();
        assert!(accounts.all_users().is_empty());
        // And a registration afterwards repairs the blob.
        accounts
            .register("Rick", "Sanchez", "rick@example.com", "portalgun")
            .unwrap();
        assert_eq!(accounts.all_users().len(), 1);
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    fn logged_in() -> AccountStore {
        let accounts = registered();
        accounts.login("rick@example.com", "portalgun", false).unwrap();
        accounts
    }

    #[test]
    fn test_toggle_favorite_roundtrip() {
        let accounts = logged_in();
        let id = CharacterId::new(5);

        assert!(!accounts.is_favorite(id));
        assert!(accounts.toggle_favorite(id));
        assert!(accounts.is_favorite(id));

        assert!(!accounts.toggle_favorite(id));
        assert!(!accounts.is_favorite(id));
        let user = accounts.current_user().unwrap();
        assert!(accounts.favorites_of(&user).is_empty());
    }

    #[test]
    fn test_toggle_without_session_is_inert() {
        let accounts = registered();
        assert!(!accounts.toggle_favorite(CharacterId::new(5)));

        // Nothing was written for any user.
        accounts.login("rick@example.com", "portalgun", false).unwrap();
        let user = accounts.current_user().unwrap();
        assert!(accounts.favorites_of(&user).is_empty());
    }

    #[test]
    fn test_favorites_are_per_user() {
        let accounts = logged_in();
        accounts.toggle_favorite(CharacterId::new(1));

        accounts
            .register("Morty", "Smith", "morty@example.com", "aw-geez")
            .unwrap();
        accounts.login("morty@example.com", "aw-geez", false).unwrap();
        accounts.toggle_favorite(CharacterId::new(2));

        let morty = accounts.current_user().unwrap();
        assert_eq!(
            accounts.favorites_of(&morty).into_iter().collect::<Vec<_>>(),
            vec![CharacterId::new(2)]
        );

        accounts.login("rick@example.com", "portalgun", false).unwrap();
        let rick = accounts.current_user().unwrap();
        assert_eq!(
            accounts.favorites_of(&rick).into_iter().collect::<Vec<_>>(),
            vec![CharacterId::new(1)]
        );
    }

    #[test]
    fn test_favorites_normalize_stored_ids() {
        let accounts = logged_in();
        let user = accounts.current_user().unwrap();
        // Mixed integers, numeric strings, junk, and non-positive values.
        accounts
            .store
            .set(&keys::favorites(&user.email), r#"[3, "7", "x", -1, 0, null]"#)
            .unwrap();

        let favorites = accounts.favorites_of(&user);
        assert_eq!(
            favorites.into_iter().collect::<Vec<_>>(),
            vec![CharacterId::new(3), CharacterId::new(7)]
        );
    }

    #[test]
    fn test_corrupt_favorites_read_as_empty() {
        let accounts = logged_in();
        let user = accounts.current_user().unwrap();
        accounts
            .store
            .set(&keys::favorites(&user.email), "{nope")
            .unwrap();
        assert!(accounts.favorites_of(&user).is_empty());
    }

    #[test]
    fn test_user_stats() {
        let accounts = logged_in();
        accounts.toggle_favorite(CharacterId::new(8));
        accounts.toggle_favorite(CharacterId::new(2));

        let stats = accounts.user_stats().unwrap();
        assert_eq!(stats.first_name, "Rick");
        assert_eq!(stats.favorite_count, 2);
        assert_eq!(
            stats.favorites,
            vec![CharacterId::new(2), CharacterId::new(8)]
        );

        accounts.logout();
        assert!(accounts.user_stats().is_none());
    }

    // =========================================================================
    // Wipe
    // =========================================================================

    #[test]
    fn test_wipe_all_removes_everything() {
        let accounts = logged_in();
        accounts.toggle_favorite(CharacterId::new(1));

        accounts.wipe_all().unwrap();
        assert!(accounts.all_users().is_empty());
        assert!(accounts.current_user().is_none());
        assert!(
            accounts
                .store
                .keys()
                .iter()
                .all(|key| !key.starts_with(keys::FAVORITES_PREFIX))
        );
    }
}

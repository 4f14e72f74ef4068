//! Domain models for accounts, sessions, and favorites.

pub mod session;
pub mod user;

pub use session::{CurrentUser, Session};
pub use user::UserRecord;

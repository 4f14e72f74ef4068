//! Account, session, and favorites commands.
//!
//! Session gating happens here: commands that need a user ask the store for
//! the current session and refuse with a login hint when there is none.

use thiserror::Error;

use atlas_client::accounts::{AccountError, AccountStore};
use atlas_core::CharacterId;

/// Errors for account commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command needs a session and none exists.
    #[error("not logged in (use `atlas login` first)")]
    NotLoggedIn,

    /// A destructive command was run without confirmation.
    #[error("refusing to wipe without --yes")]
    NotConfirmed,

    /// The underlying account operation failed.
    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Register a new account.
pub fn register(
    accounts: &AccountStore,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), CommandError> {
    accounts.register(first_name, last_name, email, password)?;
    println!("Registered {}. Log in with `atlas login`.", email.trim().to_lowercase());
    Ok(())
}

/// Log in and establish the session.
pub fn login(
    accounts: &AccountStore,
    email: &str,
    password: &str,
    remember: bool,
) -> Result<(), CommandError> {
    let user = accounts.login(email, password, remember)?;
    println!("Logged in as {} {} <{}>", user.first_name, user.last_name, user.email);
    Ok(())
}

/// Delete the session. Succeeds even when no session exists.
pub fn logout(accounts: &AccountStore) {
    accounts.logout();
    println!("Logged out");
}

/// Print the session user.
pub fn whoami(accounts: &AccountStore) -> Result<(), CommandError> {
    let user = accounts.require_auth().ok_or(CommandError::NotLoggedIn)?;
    println!("{} {} <{}> (id {})", user.first_name, user.last_name, user.email, user.id);
    Ok(())
}

/// List every registered user.
pub fn users(accounts: &AccountStore) {
    let users = accounts.all_users();
    if users.is_empty() {
        println!("No registered users");
        return;
    }
    for user in &users {
        println!(
            "{:<13} {:<25} {} {} (registered {})",
            user.id.as_str(),
            user.email.as_str(),
            user.first_name,
            user.last_name,
            user.registered_at.format("%Y-%m-%d")
        );
    }
}

/// Print the session user's favorites.
pub fn favorites(accounts: &AccountStore) -> Result<(), CommandError> {
    let user = accounts.require_auth().ok_or(CommandError::NotLoggedIn)?;
    let favorites = accounts.favorites_of(&user);
    if favorites.is_empty() {
        println!("No favorites yet");
        return Ok(());
    }
    for id in &favorites {
        println!("{id}");
    }
    Ok(())
}

/// Toggle a character in the session user's favorites.
pub fn toggle_favorite(accounts: &AccountStore, id: u32) -> Result<(), CommandError> {
    if accounts.require_auth().is_none() {
        return Err(CommandError::NotLoggedIn);
    }
    let id = CharacterId::new(id);
    if accounts.toggle_favorite(id) {
        println!("Added #{id} to favorites");
    } else {
        println!("Removed #{id} from favorites");
    }
    Ok(())
}

/// Delete all account data. Requires explicit confirmation.
pub fn wipe(accounts: &AccountStore, confirmed: bool) -> Result<(), CommandError> {
    if !confirmed {
        return Err(CommandError::NotConfirmed);
    }
    accounts.wipe_all()?;
    println!("All account data wiped");
    Ok(())
}

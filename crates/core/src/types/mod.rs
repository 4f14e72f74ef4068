//! Core types for Character Atlas.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod character;
pub mod email;
pub mod id;
pub mod page;

pub use character::{Character, CharacterStatus, Origin};
pub use email::{Email, EmailError};
pub use id::*;
pub use page::{CharacterPage, PageInfo};

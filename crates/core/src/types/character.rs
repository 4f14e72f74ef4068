//! Character records as returned by the upstream catalog.
//!
//! These types mirror the catalog's JSON wire shape. They are owned by the
//! upstream service, not by this system; unknown fields are ignored on
//! deserialization so the client tolerates additive upstream changes.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::CharacterId;

/// A character's life status, as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterStatus {
    /// The character is alive.
    Alive,
    /// The character is dead.
    Dead,
    /// The catalog does not know.
    #[serde(rename = "unknown")]
    Unknown,
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alive => write!(f, "Alive"),
            Self::Dead => write!(f, "Dead"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A character's place of origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Human-readable location name.
    pub name: String,
}

/// An immutable character record from the upstream catalog.
///
/// Only [`Character::id`] is used as a join key against local favorites;
/// everything else is display data passed through to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Catalog-assigned ID, unique across the whole catalog.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Life status.
    pub status: CharacterStatus,
    /// Species label.
    pub species: String,
    /// Place of origin.
    pub origin: Origin,
    /// Portrait image URL.
    pub image: String,
    /// URLs of episodes the character appears in.
    pub episode: Vec<String>,
}

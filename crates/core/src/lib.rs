//! Character Atlas Core - Shared types library.
//!
//! This crate provides common types used across all Character Atlas components:
//! - `client` - The catalog/cache and account/favorites library
//! - `cli` - Command-line browser driving the client library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, and the upstream catalog record shapes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

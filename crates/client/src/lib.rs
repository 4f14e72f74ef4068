//! Character Atlas client library.
//!
//! The data layer behind the Character Atlas browser: a read-through cached
//! client for the upstream character catalog, and a local account store for
//! registration, sessions, and per-user favorites.
//!
//! # Architecture
//!
//! - [`catalog::CatalogClient`] - fetches characters and pages over HTTP,
//!   memoizes results with a TTL, and tolerates partial batch failures
//! - [`accounts::AccountStore`] - registration, login/session, and favorite
//!   sets, persisted to a flat key-value store
//! - [`store::KvStore`] - the storage seam; file-backed for real use,
//!   in-memory for tests
//!
//! The two components never call each other; the presentation layer (the
//! CLI binary, or any other frontend) composes them. Both are explicitly
//! constructed and injected - there is no global state in this crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use atlas_client::accounts::AccountStore;
//! use atlas_client::catalog::CatalogClient;
//! use atlas_client::config::ClientConfig;
//! use atlas_client::store::FileStore;
//!
//! let config = ClientConfig::from_env()?;
//! let catalog = CatalogClient::new(&config.catalog);
//! let accounts = AccountStore::new(Arc::new(FileStore::open(&config.data_path)?));
//!
//! let page = catalog.fetch_page(1).await?;
//! let user = accounts.login("rick@example.com", "portalgun", true)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
pub mod catalog;
pub mod config;
pub mod models;
pub mod store;

//! # Audio Catalog: a CRUD service for songs, podcasts and audiobooks
//!
//! The catalog stores three kinds of audio files and exposes one family of endpoints,
//! parameterized by the kind, to create, update, read and delete them.
//!
//! - **Kinds**: [`AudioKind`] names the three record shapes ([`Song`], [`Podcast`],
//!   [`Audiobook`]) and the form fields each one accepts.
//! - **Validation**: submitted form fields are collected into a [`FieldSet`] and checked
//!   against per-field bounds; failures are reported as [`ValidationError`].
//! - **Storage**: the [`DataStore`] trait has an in-memory implementation
//!   ([`InMemoryDataStore`]) and a SQLite one ([`sql::SqliteDataStore`]).
//! - **Dispatch**: the [`Dispatcher`] resolves a [`CatalogRequest`] to the handler for its
//!   kind and returns an [`Outcome`] or a [`CatalogError`].
//! - **HTTP**: [`create_catalog_router`] serves the dispatcher over axum.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ HTTP routes (axum) + response rendering │
//! ├─────────────────────────────────────────┤
//! │ Dispatcher (kind token -> handler)      │
//! ├─────────────────────────────────────────┤
//! │ Per-kind handlers + field validation    │
//! ├─────────────────────────────────────────┤
//! │ Data Store (in-memory or SQLite)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! # use std::sync::Arc;
//! # use audio_catalog::{CatalogRequest, Dispatcher, FieldSet, InMemoryDataStore, Operation, Outcome};
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let dispatcher = Dispatcher::new(Arc::new(InMemoryDataStore::new()));
//!
//! let mut fields = FieldSet::new();
//! fields.insert("name", "Blue in Green");
//! fields.insert("duration", "337");
//!
//! let outcome = dispatcher
//!     .dispatch(CatalogRequest::new(Operation::Create, "song", fields))
//!     .await
//!     .unwrap();
//! assert!(matches!(outcome, Outcome::Created { id: 1, .. }));
//! # });
//! ```

mod audio_file;
mod data_store;
mod dispatch;
mod errors;
mod kind;
mod participants;

/// Command-line helpers shared by the binaries.
pub mod cli_utils;

/// Daemon configuration.
pub mod config;

/// Per-kind validation and lifecycle handlers.
pub mod handler;

/// HTTP client for the catalog API.
pub mod http_utils;

/// HTTP rendering of outcomes and errors.
pub mod response;

/// SQLite-backed storage.
pub mod sql;

/// Field sets and field validation rules.
pub mod validate;

mod router;

pub use audio_file::{AudioFields, Audiobook, Podcast, Song, StoredAudio};
pub use data_store::{DataStore, InMemoryDataStore};
pub use dispatch::{CatalogRequest, Dispatcher, Operation, Outcome};
pub use errors::{CatalogError, DataStoreError};
pub use kind::{AudioKind, AudioKindParseError};
pub use participants::{MAX_PARTICIPANTS, Participants};
pub use router::{create_catalog_router, parse_id};
pub use validate::{FieldSet, ValidationError, parse_duration, validate_text};

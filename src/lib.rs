//! Metropolitan - browse the Metropolitan Museum of Art public collection.
//!
//! Fetches departments and search results from the collection API,
//! hydrates search hits into full artwork records, and exposes the results
//! as observable loading/success/error state for a front end.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 FRONT END (CLI, or any UI)                      │
//! │  Observes the latest FetchState of each session                 │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │ watch channels
//! ┌───────────────────────────────┴─────────────────────────────────┐
//! │                        SESSIONS                                 │
//! │  search / map / detail: one task per fetch, newest wins         │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │ Loading → Success | Error streams
//! ┌───────────────────────────────┴─────────────────────────────────┐
//! │                       REPOSITORY                                │
//! │  search → truncate → hydrate each id → skip failures → sort     │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │ CollectionApi
//! ┌───────────────────────────────┴─────────────────────────────────┐
//! │                     REMOTE CLIENT                               │
//! │  GET /departments, /search, /objects/{id}                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Runtime permissions are a separate small state machine in
//! [`permission`]; the map only runs once location is granted.

// === Data ===

/// Collection records, filters and map capitals.
pub mod model;

/// Loading / success / error wrapper.
pub mod fetch;

// === Fetching ===

/// Collection API client.
pub mod remote;

/// Search hydration and the fetch streams built on it.
pub mod repository;

/// Observable per-screen state.
pub mod session;

// === Platform ===

/// Runtime permission state machine.
pub mod permission;

/// Persisted preferences.
pub mod preferences;

/// Text output for the CLI.
pub mod render;

// === Re-exports ===

pub use fetch::FetchState;
pub use model::{ArtworkDetail, Department, GeoCapital, SearchFilters, EUROPEAN_CAPITALS};
pub use remote::{ClientConfig, CollectionApi, MetClient, RemoteError, SearchQuery};
pub use repository::{HydrationConfig, Repository};
pub use session::{DetailSession, MapSession, SearchSession};

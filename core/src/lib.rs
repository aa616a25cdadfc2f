//! Blocking client for a to-do sync service's history API.
//!
//! # Overview
//! The service keeps an append-only history log per account. Clients read the
//! current index, then commit changes keyed to it (`ancestor-index`); the
//! server answers with its new head index. Conflict detection happens on the
//! server.
//!
//! # Design
//! - `HistoryClient` only builds `HttpRequest` and parses `HttpResponse`
//!   values (host-does-IO), so the protocol is testable without a network.
//! - `Transport` executes requests; `UreqTransport` does blocking HTTP.
//! - `SyncClient` couples the two, logs failures, and returns `Option`.

pub mod client;
pub mod commit;
pub mod config;
pub mod error;
pub mod http;
pub mod item;
pub mod sync;
pub mod time;
pub mod token;

pub use client::{HistoryClient, HistoryPage};
pub use commit::{Commit, Operation, OperationKind, ENTITY_TASK};
pub use config::{ClientConfig, RequestHeaders};
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use item::{Destination, Status, TodoItem};
pub use sync::SyncClient;

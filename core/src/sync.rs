//! High-level operations against one account's history log.
//!
//! # Design
//! `SyncClient` is the single boundary where failures stop propagating:
//! every operation logs the error and returns `None`. Callers branch on
//! presence and keep the returned head index for their next commit. No
//! state is carried between calls; the ancestor index is always an argument.

use chrono::NaiveDate;
use tracing::{debug, error};

use crate::client::{HistoryClient, HistoryPage};
use crate::commit::Commit;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::http::{Transport, UreqTransport};
use crate::item::{Destination, TodoItem};

#[derive(Debug, Clone)]
pub struct SyncClient<T = UreqTransport> {
    api: HistoryClient,
    transport: T,
}

impl SyncClient<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> SyncClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, ConfigError> {
        Ok(Self {
            api: HistoryClient::new(config)?,
            transport,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The history page starting at `start_index`.
    pub fn fetch_history(&self, start_index: i64) -> Option<HistoryPage> {
        let result = self
            .transport
            .execute(self.api.build_history(start_index))
            .and_then(|response| self.api.parse_history(response));
        absent_on_error(result, "Error getting current index")
    }

    /// The server's current history index, read from `start_index`.
    pub fn get_current_index(&self, start_index: i64) -> Option<i64> {
        let index = self.fetch_history(start_index)?.current_item_index;
        debug!(index, "current history index");
        Some(index)
    }

    /// Create a task and return the new head index.
    pub fn create_todo(
        &self,
        index: i64,
        title: &str,
        destination: Destination,
        scheduled_date: Option<NaiveDate>,
        due_date: Option<NaiveDate>,
    ) -> Option<i64> {
        let item = TodoItem::new(index, title, destination)
            .with_scheduled_date(scheduled_date)
            .with_due_date(due_date);
        self.submit(index, &Commit::create(item))
    }

    /// Apply the fields set in `item` to task `uuid`.
    pub fn modify_todo(&self, index: i64, uuid: &str, item: TodoItem) -> Option<i64> {
        self.submit(index, &Commit::modify(uuid, item))
    }

    pub fn complete_todo(&self, index: i64, uuid: &str) -> Option<i64> {
        self.modify_todo(index, uuid, TodoItem::completed())
    }

    pub fn delete_todo(&self, index: i64, uuid: &str) -> Option<i64> {
        self.modify_todo(index, uuid, TodoItem::trashed())
    }

    /// Send a prepared commit with `index` as its ancestor.
    ///
    /// Use this over `create_todo` when the caller needs the generated item
    /// id (`Commit::item_id`) for later modifications.
    pub fn submit(&self, index: i64, commit: &Commit) -> Option<i64> {
        let result = self
            .api
            .build_commit(index, commit)
            .and_then(|request| self.transport.execute(request))
            .and_then(|response| self.api.parse_commit(response));
        let head = absent_on_error(result, "Error committing item")?;
        debug!(ancestor = index, head, item = commit.item_id(), "commit applied");
        Some(head)
    }
}

fn absent_on_error<V>(result: Result<V, ApiError>, context: &str) -> Option<V> {
    match result {
        Ok(value) => Some(value),
        Err(ApiError::Transport(err)) => {
            error!(%err, "HTTP request failed");
            None
        }
        Err(err) => {
            error!(%err, "{context}");
            None
        }
    }
}

//! Demo: read the current history index and create one inbox task.
//!
//! Usage: `todo-sync-demo [start-index]` with `TODO_SYNC_*` variables set in
//! the environment or a `.env` file.

use todo_sync::{ClientConfig, ConfigError, Destination, SyncClient};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_START_INDEX: i64 = 1540;

fn main() -> Result<(), ConfigError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_sync=debug,todo_sync_demo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let start_index = match std::env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            warn!(%arg, "start index is not an integer, using {DEFAULT_START_INDEX}");
            DEFAULT_START_INDEX
        }),
        None => DEFAULT_START_INDEX,
    };

    let config = ClientConfig::from_env()?;
    let client = SyncClient::new(&config)?;

    let index = client.get_current_index(start_index);
    debug!(?index, "current index");

    if let Some(index) = index {
        let new_index = client.create_todo(index, "HELLO WORLD", Destination::Inbox, None, None);
        debug!(?new_index, "new index");
    }

    Ok(())
}

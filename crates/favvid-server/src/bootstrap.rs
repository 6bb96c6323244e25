//! Store setup performed before the router starts serving.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use favvid_core::StorageError;
use favvid_storage::{JsonFileRepository, MySqlRepository};
use tracing::{error, info};

use crate::app::App;
use crate::state::AppState;

/// Builds the router for a JSON file store at `path`.
///
/// A store that cannot be initialized does not stop the server: the returned
/// router answers every request with a server error instead.
pub async fn json_file_router(path: impl AsRef<Path>) -> Router {
    let repository = JsonFileRepository::new(path.as_ref());

    match repository.initialize().await {
        Ok(()) => App::router(AppState::new(Arc::new(repository))),
        Err(err) => {
            error!(path = %path.as_ref().display(), error = %err, "failed to initialize video store");
            App::unavailable(err.to_string())
        }
    }
}

/// Connects to MySQL and makes sure the `videos` table exists.
pub async fn mysql_repository(database_url: &str) -> Result<MySqlRepository, StorageError> {
    let repository = MySqlRepository::connect(database_url).await?;
    repository.ensure_schema().await?;
    info!("connected to mysql video store");
    Ok(repository)
}

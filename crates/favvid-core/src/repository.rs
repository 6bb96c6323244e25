use crate::error::{Result, StorageError};
use crate::video::{NewVideo, VideoBookmark, VideoId, VideoPatch};
use async_trait::async_trait;

/// A read-only view of a record store.
///
/// Split from [`Repository`] so that listing and lookups can be handed out
/// without write access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Checks that `raw` is a well-formed id for this store.
    ///
    /// Returns `Err(InvalidId)` for ids the store could never have assigned.
    /// The default accepts any non-empty string.
    fn parse_id(&self, raw: &str) -> Result<VideoId> {
        if raw.is_empty() {
            return Err(StorageError::InvalidId("id cannot be empty".to_string()));
        }
        Ok(VideoId::new_unchecked(raw))
    }

    /// Returns every stored video, in store order.
    async fn list(&self) -> Result<Vec<VideoBookmark>>;

    /// Retrieves a single video.
    /// Returns `None` if the id does not exist.
    async fn get(&self, id: &VideoId) -> Result<Option<VideoBookmark>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Stores a new video, assigning its id and creation time.
    async fn create(&self, video: NewVideo) -> Result<VideoBookmark>;

    /// Merges `patch` over the stored video and stamps its update time.
    /// Returns `Err(NotFound)` if the id does not exist.
    async fn update(&self, id: &VideoId, patch: VideoPatch) -> Result<VideoBookmark>;

    /// Removes the video and returns it.
    /// Returns `Err(NotFound)` if the id does not exist.
    async fn delete(&self, id: &VideoId) -> Result<VideoBookmark>;
}

use async_trait::async_trait;
use favvid_core::error::{Result, StorageError};
use favvid_core::{
    Generator, NewVideo, ReadRepository, Repository, UuidGenerator, VideoBookmark, VideoId,
    VideoPatch,
};
use jiff::Timestamp;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, trace};

/// Attempts made to draw an id that is not already stored.
const MAX_ID_ATTEMPTS: usize = 16;

/// Record store backed by a single JSON file.
///
/// The file holds one pretty-printed JSON array with every record. Each
/// operation re-reads the whole file and scans it linearly by id, so every
/// call is O(n) in the collection size. Mutations rewrite the whole file.
///
/// All operations are serialized by a per-store mutex, so concurrent requests
/// inside one process never lose each other's writes. Writers in other
/// processes are not coordinated: the last write to the file wins.
///
/// The in-memory collection is only replaced after the file write succeeded,
/// so it always mirrors what is on disk.
#[derive(Debug)]
pub struct JsonFileRepository<G = UuidGenerator> {
    path: PathBuf,
    generator: G,
    records: Mutex<Vec<VideoBookmark>>,
}

impl JsonFileRepository<UuidGenerator> {
    /// Creates a store for `path` that assigns UUID v4 ids.
    ///
    /// Call [`initialize`](Self::initialize) before serving requests.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_generator(path, UuidGenerator)
    }
}

impl<G: Generator> JsonFileRepository<G> {
    pub fn with_generator(path: impl Into<PathBuf>, generator: G) -> Self {
        Self {
            path: path.into(),
            generator,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Makes sure the backing file exists.
    ///
    /// A missing file (and its parent directories) is created holding an
    /// empty array. An existing file is left untouched and loaded, which
    /// fails with `Parse` if its content is not a valid collection.
    pub async fn initialize(&self) -> Result<()> {
        let mut records = self.records.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        if fs::try_exists(&self.path).await? {
            *records = self.load().await?;
            info!(path = %self.path.display(), count = records.len(), "loaded video store");
        } else {
            self.persist(&[]).await?;
            records.clear();
            info!(path = %self.path.display(), "created empty video store");
        }

        Ok(())
    }

    /// Returns the last collection read from or written to disk.
    #[cfg(test)]
    async fn snapshot(&self) -> Vec<VideoBookmark> {
        self.records.lock().await.clone()
    }

    async fn load(&self) -> Result<Vec<VideoBookmark>> {
        let content = fs::read_to_string(&self.path).await?;
        let records = serde_json::from_str(&content)?;
        Ok(records)
    }

    async fn persist(&self, records: &[VideoBookmark]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;
        fs::write(&self.path, content).await?;
        Ok(())
    }

    fn fresh_id(&self, records: &[VideoBookmark]) -> Result<VideoId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.generator.generate();
            if position(records, &id).is_none() {
                return Ok(id);
            }
            debug!(id = %id, "generated id already stored, drawing another");
        }
        Err(StorageError::InvalidData(format!(
            "generator produced no unused id in {MAX_ID_ATTEMPTS} attempts"
        )))
    }
}

fn position(records: &[VideoBookmark], id: &VideoId) -> Option<usize> {
    records.iter().position(|record| &record.id == id)
}

#[async_trait]
impl<G: Generator> ReadRepository for JsonFileRepository<G> {
    async fn list(&self) -> Result<Vec<VideoBookmark>> {
        let mut records = self.records.lock().await;
        *records = self.load().await?;
        Ok(records.clone())
    }

    async fn get(&self, id: &VideoId) -> Result<Option<VideoBookmark>> {
        trace!(id = %id, "looking up video");
        let mut records = self.records.lock().await;
        *records = self.load().await?;
        Ok(position(&records, id).map(|index| records[index].clone()))
    }
}

#[async_trait]
impl<G: Generator> Repository for JsonFileRepository<G> {
    async fn create(&self, video: NewVideo) -> Result<VideoBookmark> {
        let mut records = self.records.lock().await;
        let mut next = self.load().await?;

        let record = video.into_record(self.fresh_id(&next)?, Timestamp::now());
        next.push(record.clone());
        self.persist(&next).await?;
        *records = next;

        debug!(id = %record.id, "created video");
        Ok(record)
    }

    async fn update(&self, id: &VideoId, patch: VideoPatch) -> Result<VideoBookmark> {
        let mut records = self.records.lock().await;
        let mut next = self.load().await?;

        let Some(index) = position(&next, id) else {
            *records = next;
            return Err(StorageError::NotFound(id.to_string()));
        };

        patch.apply(&mut next[index], Timestamp::now());
        let updated = next[index].clone();
        self.persist(&next).await?;
        *records = next;

        debug!(id = %id, "updated video");
        Ok(updated)
    }

    async fn delete(&self, id: &VideoId) -> Result<VideoBookmark> {
        let mut records = self.records.lock().await;
        let mut next = self.load().await?;

        let Some(index) = position(&next, id) else {
            *records = next;
            return Err(StorageError::NotFound(id.to_string()));
        };

        let removed = next.remove(index);
        self.persist(&next).await?;
        *records = next;

        debug!(id = %id, "deleted video");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use favvid_core::SeqGenerator;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> JsonFileRepository<SeqGenerator> {
        JsonFileRepository::with_generator(
            dir.path().join("videos.json"),
            SeqGenerator::with_prefix("vid"),
        )
    }

    fn video(name: &str) -> NewVideo {
        NewVideo::builder()
            .video_name(name)
            .channel_name("channel")
            .duration("10:00")
            .build()
    }

    #[tokio::test]
    async fn initialize_creates_empty_array() {
        let dir = TempDir::new().unwrap();
        let repo = store(&dir);

        repo.initialize().await.unwrap();

        let content = std::fs::read_to_string(repo.path()).unwrap();
        assert_eq!(content, "[]");
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn initialize_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested/deeper/videos.json"));

        repo.initialize().await.unwrap();

        assert!(repo.path().exists());
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let repo = store(&dir);
        repo.initialize().await.unwrap();
        repo.create(video("A")).await.unwrap();
        let before = std::fs::read_to_string(repo.path()).unwrap();

        repo.initialize().await.unwrap();

        let after = std::fs::read_to_string(repo.path()).unwrap();
        assert_eq!(before, after);
        assert_eq!(repo.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn initialize_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let repo = store(&dir);
        std::fs::write(repo.path(), "{not json").unwrap();

        let err = repo.initialize().await.unwrap_err();

        assert!(matches!(err, StorageError::Parse(_)));
    }

    #[tokio::test]
    async fn list_fails_when_file_is_missing() {
        let dir = TempDir::new().unwrap();
        let repo = store(&dir);

        let err = repo.list().await.unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
    }

    #[tokio::test]
    async fn file_is_pretty_printed_with_two_spaces() {
        let dir = TempDir::new().unwrap();
        let repo = store(&dir);
        repo.initialize().await.unwrap();

        repo.create(video("A")).await.unwrap();

        let content = std::fs::read_to_string(repo.path()).unwrap();
        assert!(content.starts_with("[\n  {\n    \"id\": \"vid000000\""));
    }

    #[tokio::test]
    async fn skips_generated_ids_that_are_already_stored() {
        let dir = TempDir::new().unwrap();
        let first = store(&dir);
        first.initialize().await.unwrap();
        first.create(video("A")).await.unwrap();

        // A second store restarts its counter at zero.
        let second = store(&dir);
        second.initialize().await.unwrap();
        let created = second.create(video("B")).await.unwrap();

        assert_eq!(created.id.as_str(), "vid000001");
    }

    #[tokio::test]
    async fn snapshot_mirrors_file_after_mutations() {
        let dir = TempDir::new().unwrap();
        let repo = store(&dir);
        repo.initialize().await.unwrap();

        let a = repo.create(video("A")).await.unwrap();
        repo.create(video("B")).await.unwrap();
        repo.update(&a.id, VideoPatch::builder().video_name("A2").build())
            .await
            .unwrap();
        repo.delete(&a.id).await.unwrap();

        let on_disk: Vec<VideoBookmark> =
            serde_json::from_str(&std::fs::read_to_string(repo.path()).unwrap()).unwrap();
        assert_eq!(repo.snapshot().await, on_disk);
        assert_eq!(on_disk.len(), 1);
    }
}

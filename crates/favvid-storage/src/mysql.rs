use async_trait::async_trait;
use favvid_core::error::{Result, StorageError};
use favvid_core::{
    NewVideo, ReadRepository, Repository, VideoBookmark, VideoDuration, VideoId, VideoPatch,
};
use jiff::Timestamp;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlExecutor, MySqlPool, Row};
use tracing::debug;

/// DDL for the `videos` table.
pub const SCHEMA: &str = include_str!("../ddl/mysql/videos.sql");

/// MySQL implementation of the repository contract.
///
/// Every video is one row of the `videos` table. The table schema enforces
/// the required fields, and ids come from the `AUTO_INCREMENT` primary key,
/// so a well-formed id is a positive decimal integer. Lookups go through the
/// primary key index.
///
/// Timestamps are stored as unix microseconds and `duration` as its JSON
/// encoding, so both text and numeric durations read back unchanged.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `videos` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Closes every pooled connection, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn parse_numeric_id(raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(StorageError::InvalidId(format!(
            "'{raw}' is not a positive integer id"
        ))),
    }
}

/// Current time truncated to the precision of the timestamp columns.
fn now_micros() -> Result<(Timestamp, i64)> {
    let micros = Timestamp::now().as_microsecond();
    let now = parse_timestamp(micros)?;
    Ok((now, micros))
}

fn parse_timestamp(micros: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(micros).map_err(|e| {
        StorageError::InvalidData(format!("invalid timestamp '{micros}': {e}"))
    })
}

fn encode_duration(duration: &VideoDuration) -> Result<String> {
    serde_json::to_string(duration).map_err(|e| StorageError::InvalidData(e.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn decode_row(row: &MySqlRow) -> Result<VideoBookmark> {
    let id: u64 = row.try_get("id").map_err(map_sqlx_error)?;
    let duration_raw: String = row.try_get("duration").map_err(map_sqlx_error)?;
    let duration = serde_json::from_str(&duration_raw).map_err(|e| {
        StorageError::InvalidData(format!("invalid duration '{duration_raw}': {e}"))
    })?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
    let updated_at: Option<i64> = row.try_get("updated_at").map_err(map_sqlx_error)?;
    let thumbnail_url: Option<String> = row.try_get("thumbnail_url").map_err(map_sqlx_error)?;

    Ok(VideoBookmark {
        id: VideoId::new_unchecked(id.to_string()),
        video_name: row.try_get("video_name").map_err(map_sqlx_error)?,
        channel_name: row.try_get("channel_name").map_err(map_sqlx_error)?,
        duration,
        thumbnail_url: non_empty(thumbnail_url),
        created_at: parse_timestamp(created_at)?,
        updated_at: updated_at.map(parse_timestamp).transpose()?,
    })
}

async fn fetch_video<'e, E: MySqlExecutor<'e>>(
    executor: E,
    id: u64,
    for_update: bool,
) -> Result<Option<VideoBookmark>> {
    let sql = if for_update {
        r#"
        SELECT id, video_name, channel_name, duration, thumbnail_url, created_at, updated_at
        FROM videos
        WHERE id = ?
        FOR UPDATE
        "#
    } else {
        r#"
        SELECT id, video_name, channel_name, duration, thumbnail_url, created_at, updated_at
        FROM videos
        WHERE id = ?
        "#
    };

    let row = sqlx::query(sql)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;

    row.as_ref().map(decode_row).transpose()
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    fn parse_id(&self, raw: &str) -> Result<VideoId> {
        let id = parse_numeric_id(raw)?;
        Ok(VideoId::new_unchecked(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<VideoBookmark>> {
        let rows = sqlx::query(
            r#"
            SELECT id, video_name, channel_name, duration, thumbnail_url, created_at, updated_at
            FROM videos
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(decode_row).collect()
    }

    async fn get(&self, id: &VideoId) -> Result<Option<VideoBookmark>> {
        let id = parse_numeric_id(id.as_str())?;
        fetch_video(&self.pool, id, false).await
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn create(&self, video: NewVideo) -> Result<VideoBookmark> {
        let (now, now_micros) = now_micros()?;
        let duration = encode_duration(&video.duration)?;
        let thumbnail_url = non_empty(video.thumbnail_url.clone());

        let result = sqlx::query(
            r#"
            INSERT INTO videos (video_name, channel_name, duration, thumbnail_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, NULL)
            "#,
        )
        .bind(&video.video_name)
        .bind(&video.channel_name)
        .bind(duration)
        .bind(thumbnail_url)
        .bind(now_micros)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let id = VideoId::new_unchecked(result.last_insert_id().to_string());
        debug!(id = %id, "created video");
        Ok(video.into_record(id, now))
    }

    async fn update(&self, id: &VideoId, patch: VideoPatch) -> Result<VideoBookmark> {
        let numeric_id = parse_numeric_id(id.as_str())?;
        let (_, now_micros) = now_micros()?;
        let duration = patch.duration.as_ref().map(encode_duration).transpose()?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            UPDATE videos
            SET video_name = COALESCE(?, video_name),
                channel_name = COALESCE(?, channel_name),
                duration = COALESCE(?, duration),
                thumbnail_url = COALESCE(?, thumbnail_url),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(patch.video_name)
        .bind(patch.channel_name)
        .bind(duration)
        .bind(non_empty(patch.thumbnail_url))
        .bind(now_micros)
        .bind(numeric_id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let updated = fetch_video(&mut *tx, numeric_id, false)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(id = %id, "updated video");
        Ok(updated)
    }

    async fn delete(&self, id: &VideoId) -> Result<VideoBookmark> {
        let numeric_id = parse_numeric_id(id.as_str())?;

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let removed = fetch_video(&mut *tx, numeric_id, true)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(numeric_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(id = %id, "deleted video");
        Ok(removed)
    }
}

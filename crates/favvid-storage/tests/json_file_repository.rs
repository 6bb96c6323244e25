use std::collections::HashSet;
use std::sync::Arc;

use favvid_core::{NewVideo, VideoBookmark, VideoDuration, VideoId, VideoPatch};
use favvid_storage::{JsonFileRepository, ReadRepository, Repository, StorageError};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    repo: JsonFileRepository,
}

impl Fixture {
    async fn start() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = JsonFileRepository::new(dir.path().join("videos.json"));
        repo.initialize().await.expect("initialize store");
        Self { _dir: dir, repo }
    }

    fn read_file(&self) -> Vec<VideoBookmark> {
        let content = std::fs::read_to_string(self.repo.path()).expect("read store file");
        serde_json::from_str(&content).expect("parse store file")
    }
}

fn video(name: &str, channel: &str, duration: impl Into<VideoDuration>) -> NewVideo {
    NewVideo::builder()
        .video_name(name)
        .channel_name(channel)
        .duration(duration)
        .build()
}

#[tokio::test]
async fn create_then_get_returns_same_fields() {
    let fixture = Fixture::start().await;
    let mut seen = HashSet::new();

    for (name, channel, duration) in [("A", "B", "10:00"), ("C", "D", "1:02:03"), ("E", "F", "0")] {
        let created = fixture
            .repo
            .create(video(name, channel, duration))
            .await
            .unwrap();
        assert!(!created.id.as_str().is_empty());
        assert!(seen.insert(created.id.clone()), "id reused: {}", created.id);

        let got = fixture.repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(got.video_name, name);
        assert_eq!(got.channel_name, channel);
        assert_eq!(got.duration, VideoDuration::from(duration));
        assert_eq!(got, created);
    }
}

#[tokio::test]
async fn numeric_duration_round_trips_through_the_file() {
    let fixture = Fixture::start().await;

    let created = fixture.repo.create(video("A", "B", 600_u64)).await.unwrap();

    let got = fixture.repo.get(&created.id).await.unwrap().unwrap();
    assert_eq!(got.duration, VideoDuration::from(600_u64));
}

#[tokio::test]
async fn missing_thumbnail_is_omitted_from_file() {
    let fixture = Fixture::start().await;

    fixture.repo.create(video("A", "B", "10:00")).await.unwrap();
    fixture
        .repo
        .create(
            NewVideo::builder()
                .video_name("C")
                .channel_name("D")
                .duration("1:00")
                .thumbnail_url("")
                .build(),
        )
        .await
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(fixture.repo.path()).unwrap()).unwrap();
    for record in raw.as_array().unwrap() {
        assert!(record.get("thumbnailUrl").is_none());
        assert!(record.get("updatedAt").is_none());
    }
}

#[tokio::test]
async fn update_merges_fields_and_stamps_updated_at() {
    let fixture = Fixture::start().await;
    let created = fixture
        .repo
        .create(
            NewVideo::builder()
                .video_name("A")
                .channel_name("B")
                .duration("10:00")
                .thumbnail_url("https://img.example/a.png")
                .build(),
        )
        .await
        .unwrap();

    let updated = fixture
        .repo
        .update(
            &created.id,
            VideoPatch::builder()
                .video_name("A2")
                .duration("15:00")
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.video_name, "A2");
    assert_eq!(updated.duration, VideoDuration::from("15:00"));
    assert_eq!(updated.channel_name, "B");
    assert_eq!(updated.thumbnail_url, created.thumbnail_url);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at.unwrap() >= created.created_at);

    assert_eq!(fixture.read_file(), vec![updated]);
}

#[tokio::test]
async fn delete_removes_exactly_one() {
    let fixture = Fixture::start().await;
    let mut created = Vec::new();
    for name in ["A", "B", "C", "D"] {
        created.push(fixture.repo.create(video(name, "chan", "1:00")).await.unwrap());
    }

    let removed = fixture.repo.delete(&created[1].id).await.unwrap();
    assert_eq!(removed, created[1]);

    let remaining = fixture.repo.list().await.unwrap();
    assert_eq!(remaining.len(), created.len() - 1);
    assert!(remaining.iter().all(|r| r.id != removed.id));
    let expected: Vec<_> = created
        .iter()
        .filter(|r| r.id != removed.id)
        .cloned()
        .collect();
    assert_eq!(remaining, expected);
}

#[tokio::test]
async fn absent_id_never_mutates_the_collection() {
    let fixture = Fixture::start().await;
    fixture.repo.create(video("A", "B", "10:00")).await.unwrap();
    let before = std::fs::read_to_string(fixture.repo.path()).unwrap();
    let missing = VideoId::new_unchecked("does-not-exist");

    assert!(fixture.repo.get(&missing).await.unwrap().is_none());

    let err = fixture
        .repo
        .update(&missing, VideoPatch::builder().video_name("X").build())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));

    let err = fixture.repo.delete(&missing).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));

    let after = std::fs::read_to_string(fixture.repo.path()).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn list_reports_malformed_file() {
    let fixture = Fixture::start().await;
    std::fs::write(fixture.repo.path(), "[{\"id\": 1}]").unwrap();

    let err = fixture.repo.list().await.unwrap_err();

    assert!(matches!(err, StorageError::Parse(_)));
}

#[tokio::test]
async fn reads_files_written_by_other_tools() {
    let fixture = Fixture::start().await;
    std::fs::write(
        fixture.repo.path(),
        r#"[
  {
    "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
    "videoName": "Test Video",
    "channelName": "Test Channel",
    "duration": "10:00",
    "createdAt": "2024-05-01T10:00:00.000Z"
  }
]"#,
    )
    .unwrap();

    let records = fixture.repo.list().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].video_name, "Test Video");
    assert_eq!(records[0].updated_at, None);
}

#[tokio::test]
async fn concurrent_creates_are_all_persisted() {
    let fixture = Arc::new(Fixture::start().await);
    let mut handles = Vec::new();

    for i in 0..16 {
        let fixture = Arc::clone(&fixture);
        handles.push(tokio::spawn(async move {
            fixture
                .repo
                .create(video(&format!("video-{i}"), "chan", "1:00"))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(fixture.repo.list().await.unwrap().len(), 16);
    assert_eq!(fixture.read_file().len(), 16);
}

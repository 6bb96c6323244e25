use crate::error::ValidationError;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use typed_builder::TypedBuilder;

/// Opaque identifier of a stored video bookmark.
///
/// Ids are assigned by the store at creation time. Each backend decides what a
/// well-formed id looks like, see [`ReadRepository::parse_id`][crate::ReadRepository::parse_id].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Wraps a raw id without checking its format.
    ///
    /// Use this only for ids produced by a generator or read back from a store.
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VideoId").field(&self.0).finish()
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Duration of a video as submitted by the client.
///
/// Clients send either a formatted string (`"10:00"`) or a plain number of
/// seconds; both are stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VideoDuration {
    Text(String),
    Number(serde_json::Number),
}

impl VideoDuration {
    fn is_blank(&self) -> bool {
        match self {
            VideoDuration::Text(text) => text.trim().is_empty(),
            VideoDuration::Number(_) => false,
        }
    }
}

impl From<&str> for VideoDuration {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for VideoDuration {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for VideoDuration {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl Display for VideoDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoDuration::Text(text) => f.write_str(text),
            VideoDuration::Number(number) => write!(f, "{number}"),
        }
    }
}

/// A favorited video as persisted by a record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoBookmark {
    pub id: VideoId,
    pub video_name: String,
    pub channel_name: String,
    pub duration: VideoDuration,
    /// Never stored as `null` or `""`; the key is simply absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub created_at: Timestamp,
    /// Set by updates only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

/// Fields of a video bookmark that is about to be created.
///
/// # Examples
///
/// ```
/// use favvid_core::NewVideo;
///
/// let video = NewVideo::builder()
///     .video_name("Rust in 100 seconds")
///     .channel_name("Fireship")
///     .duration("2:21")
///     .build()
///     .validate()
///     .unwrap();
/// assert!(video.thumbnail_url.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NewVideo {
    #[builder(setter(into))]
    pub video_name: String,
    #[builder(setter(into))]
    pub channel_name: String,
    #[builder(setter(into))]
    pub duration: VideoDuration,
    #[builder(default, setter(into, strip_option))]
    pub thumbnail_url: Option<String>,
}

impl NewVideo {
    /// Checks the required fields and drops an empty thumbnail url.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        require_text("videoName", &self.video_name)?;
        require_text("channelName", &self.channel_name)?;
        if self.duration.is_blank() {
            return Err(ValidationError::EmptyField("duration"));
        }
        self.thumbnail_url = non_empty(self.thumbnail_url);
        Ok(self)
    }

    /// Builds the stored record for this video.
    pub fn into_record(self, id: VideoId, created_at: Timestamp) -> VideoBookmark {
        VideoBookmark {
            id,
            video_name: self.video_name,
            channel_name: self.channel_name,
            duration: self.duration,
            thumbnail_url: non_empty(self.thumbnail_url),
            created_at,
            updated_at: None,
        }
    }
}

/// A partial update of a video bookmark.
///
/// Fields left as `None` keep their stored value. The id and the creation
/// time can never be patched.
#[derive(Debug, Clone, Default, PartialEq, TypedBuilder)]
pub struct VideoPatch {
    #[builder(default, setter(into, strip_option))]
    pub video_name: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub channel_name: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub duration: Option<VideoDuration>,
    #[builder(default, setter(into, strip_option))]
    pub thumbnail_url: Option<String>,
}

impl VideoPatch {
    /// Rejects supplied fields that would break a stored record and treats an
    /// empty thumbnail url as not supplied.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        if let Some(name) = &self.video_name {
            require_text("videoName", name)?;
        }
        if let Some(name) = &self.channel_name {
            require_text("channelName", name)?;
        }
        if self.duration.as_ref().is_some_and(VideoDuration::is_blank) {
            return Err(ValidationError::EmptyField("duration"));
        }
        self.thumbnail_url = non_empty(self.thumbnail_url);
        Ok(self)
    }

    /// Returns `true` if the patch does not touch any field.
    pub fn is_empty(&self) -> bool {
        self.video_name.is_none()
            && self.channel_name.is_none()
            && self.duration.is_none()
            && self.thumbnail_url.is_none()
    }

    /// Shallow-merges the patch over `record` and stamps `updated_at`.
    pub fn apply(self, record: &mut VideoBookmark, now: Timestamp) {
        if let Some(video_name) = self.video_name {
            record.video_name = video_name;
        }
        if let Some(channel_name) = self.channel_name {
            record.channel_name = channel_name;
        }
        if let Some(duration) = self.duration {
            record.duration = duration;
        }
        if let Some(thumbnail_url) = non_empty(self.thumbnail_url) {
            record.thumbnail_url = Some(thumbnail_url);
        }
        record.updated_at = Some(now);
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

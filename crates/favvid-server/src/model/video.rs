use favvid_core::{NewVideo, ValidationError, VideoBookmark, VideoDuration, VideoPatch};
use serde::{Deserialize, Serialize};

/// Body of `POST /` and `POST /video`.
///
/// Every field is optional at the JSON level so that a missing field is
/// reported as a validation error naming it. An `id` sent by the client is
/// ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    pub video_name: Option<String>,
    pub channel_name: Option<String>,
    pub duration: Option<VideoDuration>,
    pub thumbnail_url: Option<String>,
}

impl TryFrom<CreateVideoRequest> for NewVideo {
    type Error = ValidationError;

    fn try_from(request: CreateVideoRequest) -> Result<Self, Self::Error> {
        let video = NewVideo {
            video_name: request
                .video_name
                .ok_or(ValidationError::MissingField("videoName"))?,
            channel_name: request
                .channel_name
                .ok_or(ValidationError::MissingField("channelName"))?,
            duration: request
                .duration
                .ok_or(ValidationError::MissingField("duration"))?,
            thumbnail_url: request.thumbnail_url,
        };
        video.validate()
    }
}

/// Body of `PUT`/`PATCH` on a single video.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    pub video_name: Option<String>,
    pub channel_name: Option<String>,
    pub duration: Option<VideoDuration>,
    pub thumbnail_url: Option<String>,
}

impl TryFrom<UpdateVideoRequest> for VideoPatch {
    type Error = ValidationError;

    fn try_from(request: UpdateVideoRequest) -> Result<Self, Self::Error> {
        let patch = VideoPatch {
            video_name: request.video_name,
            channel_name: request.channel_name,
            duration: request.duration,
            thumbnail_url: request.thumbnail_url,
        };
        patch.validate()
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteVideoResponse {
    pub message: &'static str,
    pub video: VideoBookmark,
}

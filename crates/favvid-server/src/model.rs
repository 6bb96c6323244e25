pub mod video;

use serde::Serialize;

pub use video::{CreateVideoRequest, DeleteVideoResponse, UpdateVideoRequest};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Body of every client error response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

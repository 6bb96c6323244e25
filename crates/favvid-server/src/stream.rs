//! Newline-delimited JSON listing.

use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use favvid_core::VideoBookmark;
use futures::stream::{self, Stream};
use tracing::{debug, info};

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Logs when the client went away before the listing was fully written.
struct AbortGuard {
    total: usize,
    sent: usize,
}

impl Drop for AbortGuard {
    fn drop(&mut self) {
        if self.sent == self.total {
            debug!(lines = self.sent, "video stream completed");
        } else {
            info!(
                lines = self.sent,
                total = self.total,
                "connection aborted, video stream stopped"
            );
        }
    }
}

/// Turns a snapshot of the collection into one JSON document per line.
///
/// Each item is a complete, newline-terminated document, so a client that
/// disconnects never observes a partial line. Nothing is serialized past the
/// point where the body was dropped.
pub fn ndjson_lines(
    records: Vec<VideoBookmark>,
) -> impl Stream<Item = Result<String, serde_json::Error>> + Send + 'static {
    lines_from(records.into_iter())
}

fn lines_from<I>(
    records: I,
) -> impl Stream<Item = Result<String, serde_json::Error>> + Send + 'static
where
    I: ExactSizeIterator<Item = VideoBookmark> + Send + 'static,
{
    let guard = AbortGuard {
        total: records.len(),
        sent: 0,
    };

    stream::unfold((records, guard), |(mut records, mut guard)| async move {
        let record = records.next()?;

        let line = serde_json::to_string(&record).map(|mut line| {
            line.push('\n');
            line
        });
        guard.sent += 1;
        Some((line, (records, guard)))
    })
}

/// Streams `records` as an `application/x-ndjson` response.
pub fn ndjson_response(records: Vec<VideoBookmark>) -> Response {
    (
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        Body::from_stream(ndjson_lines(records)),
    )
        .into_response()
}

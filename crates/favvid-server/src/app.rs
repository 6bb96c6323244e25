use axum::routing::{get, post, MethodRouter};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::handlers::{
    create_video_handler, delete_video_handler, get_video_handler, health_handler,
    list_videos_handler, not_found_handler, stream_videos_handler, update_video_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Routes of the video API.
    ///
    /// Single videos are reachable both as `/{id}` and `/video/{id}`, and both
    /// `PUT` and `PATCH` update them. A known path with an unsupported method
    /// is answered like an unknown path.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/", get(list_videos_handler).post(create_video_handler))
            .route("/videos", get(stream_videos_handler))
            .route("/video", post(create_video_handler))
            .route("/video/{id}", video_item_routes())
            .route("/{id}", video_item_routes())
            .fallback(not_found_handler)
            .method_not_allowed_fallback(not_found_handler)
            .layer(CatchPanicLayer::new())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Router used when the store could not be initialized.
    ///
    /// Every request is answered with a server error naming `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Router {
        let reason = reason.into();

        Router::new()
            .fallback(move || {
                let reason = reason.clone();
                async move { AppError::StoreUnavailable(reason) }
            })
            .layer(TraceLayer::new_for_http())
    }
}

fn video_item_routes() -> MethodRouter<AppState> {
    get(get_video_handler)
        .put(update_video_handler)
        .patch(update_video_handler)
        .delete(delete_video_handler)
}

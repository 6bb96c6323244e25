//! HTTP server for the favvid video bookmark service.
//!
//! The same handlers serve both storage backends; the backend is chosen at
//! startup and handed to the router through [`AppState`].

pub mod app;
pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod stream;

pub use app::App;
pub use error::AppError;
pub use state::AppState;

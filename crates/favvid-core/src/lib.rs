//! Core types and traits for the favvid video bookmark service.
//!
//! This crate provides the [`VideoBookmark`] model and the repository
//! contract shared by every storage backend and the HTTP server.

pub mod error;
pub mod generator;
pub mod repository;
pub mod video;

pub use error::{Result, StorageError, ValidationError};
pub use generator::{seq::SeqGenerator, Generator, UuidGenerator};
pub use repository::{ReadRepository, Repository};
pub use video::{NewVideo, VideoBookmark, VideoDuration, VideoId, VideoPatch};

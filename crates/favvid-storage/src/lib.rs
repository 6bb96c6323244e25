//! Record store backends for favvid.
//!
//! [`JsonFileRepository`] keeps the whole collection in a single JSON file.
//! [`MySqlRepository`] stores one row per video in a typed table.

pub mod json_file;
pub mod mysql;

pub use favvid_core::{ReadRepository, Repository, Result, StorageError};
pub use json_file::JsonFileRepository;
pub use mysql::MySqlRepository;

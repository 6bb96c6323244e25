use crate::generator::Generator;
use crate::video::VideoId;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generates sequential ids like "vid000000", "vid000001", etc.
///
/// Ids are unique within a single instance. Stores that are reopened, or
/// shared between processes, need a fresh prefix or a starting offset.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl SeqGenerator {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, 0)
    }

    /// Starts counting at `offset`.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
            prefix: prefix.into(),
        }
    }
}

impl Generator for SeqGenerator {
    fn generate(&self) -> VideoId {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        VideoId::new_unchecked(format!("{}{:06}", self.prefix, count))
    }
}

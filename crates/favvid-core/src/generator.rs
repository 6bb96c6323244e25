pub mod seq;

use crate::video::VideoId;
use uuid::Uuid;

/// Trait for generating video ids.
///
/// Implementations are pure generators that don't interact with storage.
/// The generated id must be unique within the store it is used for.
pub trait Generator: Send + Sync + 'static {
    fn generate(&self) -> VideoId;
}

/// Generates random UUID v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl Generator for UuidGenerator {
    fn generate(&self) -> VideoId {
        VideoId::new_unchecked(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_generator_produces_distinct_ids() {
        let generator = UuidGenerator;

        let first = generator.generate();
        let second = generator.generate();

        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }
}

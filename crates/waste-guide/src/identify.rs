/// Mock waste identification.
///
/// The original assistant never shipped a classifier: identification is a
/// fixed result behind an artificial delay, and this port keeps it that way.
/// The delay is injected so tests can run with `Duration::ZERO`.
use std::time::Duration;

use crate::error::AppError;
use crate::model::Identification;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1_500);

pub struct Identifier {
    delay: Duration,
}

impl Identifier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// "Identify" the uploaded image. Deterministic stub: always a plastic
    /// bottle at 93%. An empty image name is the missing-upload error.
    pub async fn identify(&self, image_name: &str) -> Result<Identification, AppError> {
        if image_name.trim().is_empty() {
            return Err(AppError::MissingUpload);
        }

        tokio::time::sleep(self.delay).await;

        Ok(Identification {
            name: "Plastic Bottle".to_string(),
            category: "plastic".to_string(),
            confidence: 0.93,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identification_is_a_fixed_result() {
        let identifier = Identifier::new(Duration::ZERO);
        let first = identifier.identify("bin.jpg").await.unwrap();
        let second = identifier.identify("something-else.png").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.name, "Plastic Bottle");
        assert_eq!(first.category, "plastic");
        assert!((first.confidence - 0.93).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn missing_upload_is_rejected_with_the_exact_message() {
        let identifier = Identifier::new(Duration::ZERO);
        let err = identifier.identify("   ").await.unwrap_err();
        assert_eq!(err.to_string(), "Please upload an image.");
    }
}

// Banner image for a destination

use serde::Serialize;

use super::llm::{ImageGenerator, ImageQuality, ImageRequest};
use crate::domain::trip::Destination;

pub const IMAGE_SIZE: &str = "1024x1024";

/// Outcome of the image step; failure only affects what is displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    Generated { url: String },
    Unavailable { error: String },
}

impl ImageOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageOutcome::Generated { url } => Some(url),
            ImageOutcome::Unavailable { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ImageOutcome::Generated { .. } => None,
            ImageOutcome::Unavailable { error } => Some(error),
        }
    }
}

/// Fixed prompt and parameters: one standard-quality square image
pub fn destination_image_request(destination: &Destination) -> ImageRequest {
    ImageRequest {
        prompt: format!(
            "A wide, panoramic, vibrant view of {}, showcasing its most iconic and beautiful \
             features.  High quality, suitable for a travel website banner.",
            destination
        ),
        size: IMAGE_SIZE.to_string(),
        quality: ImageQuality::Standard,
        count: 1,
    }
}

/// Requests a banner image; never fails, never retries
pub async fn generate_destination_image(
    generator: &dyn ImageGenerator,
    destination: &Destination,
) -> ImageOutcome {
    match generator
        .generate(destination_image_request(destination))
        .await
    {
        Ok(url) => ImageOutcome::Generated { url },
        Err(e) => {
            tracing::warn!(destination = %destination, error = %e, "Image generation failed");
            ImageOutcome::Unavailable {
                error: format!("Error generating image: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::errors::{AgentError, AgentResult};
    use async_trait::async_trait;

    struct FixedGenerator(Option<&'static str>);

    #[async_trait]
    impl ImageGenerator for FixedGenerator {
        async fn generate(&self, request: ImageRequest) -> AgentResult<String> {
            assert_eq!(request.count, 1);
            assert_eq!(request.size, IMAGE_SIZE);
            assert_eq!(request.quality, ImageQuality::Standard);
            self.0
                .map(str::to_string)
                .ok_or_else(|| AgentError::ImageError("quota exceeded".to_string()))
        }
    }

    #[test]
    fn prompt_names_destination() {
        let destination = Destination::new("Kyoto").unwrap();

        let request = destination_image_request(&destination);

        assert!(request
            .prompt
            .starts_with("A wide, panoramic, vibrant view of Kyoto,"));
    }

    #[tokio::test]
    async fn success_returns_url() {
        let destination = Destination::new("Kyoto").unwrap();

        let outcome =
            generate_destination_image(&FixedGenerator(Some("https://img/1.png")), &destination)
                .await;

        assert_eq!(outcome.url(), Some("https://img/1.png"));
        assert!(outcome.error().is_none());
    }

    #[tokio::test]
    async fn failure_degrades_to_no_image() {
        let destination = Destination::new("Kyoto").unwrap();

        let outcome = generate_destination_image(&FixedGenerator(None), &destination).await;

        assert!(outcome.url().is_none());
        assert!(outcome.error().unwrap().contains("quota exceeded"));
    }
}

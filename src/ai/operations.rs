// Typed AI operations, one per workflow capability.
// Each builds a generateContent request (or the long-running video variant),
// issues it, and unwraps the response into domain values.

use std::time::Duration;

use crate::error::{Result, StyloError};
use crate::media::ImageFile;

use super::client::AiClient;
use super::types::{
    AspectRatio, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageConfig, Part, VideoImage, VideoInstance, VideoOperation, VideoParameters, VideoRequest,
};

const TEXT_MODEL: &str = "gemini-2.5-flash";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const VIDEO_MODEL: &str = "veo-3.0-generate-001";

/// How often to poll a long-running video operation.
const VIDEO_POLL_INTERVAL: Duration = Duration::from_secs(10);

impl AiClient {
    /// Rewrite a rough prompt into a richer one.
    pub async fn enhance_prompt(&self, prompt: &str) -> Result<String> {
        let instruction = format!(
            "Rewrite the following image generation prompt to be more vivid and \
             detailed. Reply with the rewritten prompt only.\n\n{}",
            prompt
        );
        let response = self
            .generate_content(TEXT_MODEL, vec![Part::text(instruction)], None)
            .await?;
        response.text().ok_or(StyloError::EmptyResponse)
    }

    /// Generate an image from a text prompt.
    pub async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<ImageFile> {
        self.request_image(vec![Part::text(prompt)], aspect_ratio)
            .await
    }

    /// Edit an existing image according to a prompt.
    pub async fn edit_image(
        &self,
        prompt: &str,
        image: &ImageFile,
        aspect_ratio: AspectRatio,
    ) -> Result<ImageFile> {
        self.request_image(vec![Part::image(image), Part::text(prompt)], aspect_ratio)
            .await
    }

    /// Composite clothing items onto a person.
    pub async fn create_outfit(
        &self,
        prompt: &str,
        person: &ImageFile,
        clothing: &[ImageFile],
        aspect_ratio: AspectRatio,
    ) -> Result<ImageFile> {
        let mut parts = vec![Part::image(person)];
        parts.extend(clothing.iter().map(Part::image));
        parts.push(Part::text(format!(
            "Dress the person in the first image with the clothing items from \
             the following images. {}",
            prompt
        )));
        self.request_image(parts, aspect_ratio).await
    }

    /// Place a product into a scene with a person.
    pub async fn create_product_scene(
        &self,
        prompt: &str,
        person: &ImageFile,
        product: &ImageFile,
    ) -> Result<ImageFile> {
        let parts = vec![
            Part::image(person),
            Part::image(product),
            Part::text(format!(
                "Create a natural scene of the person in the first image using \
                 the product in the second image. {}",
                prompt
            )),
        ];
        self.request_image(parts, AspectRatio::Square).await
    }

    /// Re-render a content image in the style of another image. The prompt is
    /// optional guidance appended after the base instruction.
    pub async fn transfer_style(
        &self,
        prompt: &str,
        content: &ImageFile,
        style: &ImageFile,
        aspect_ratio: AspectRatio,
    ) -> Result<ImageFile> {
        self.request_image(style_transfer_parts(prompt, content, style), aspect_ratio)
            .await
    }

    /// Animate an image into a short video. Returns a playable URL once the
    /// long-running operation completes; progress text is reported through
    /// the callback while waiting.
    pub async fn generate_video(
        &self,
        prompt: &str,
        image: Option<&ImageFile>,
        aspect_ratio: AspectRatio,
        progress: impl Fn(String),
    ) -> Result<String> {
        let request = VideoRequest {
            instances: vec![VideoInstance {
                prompt: prompt.to_string(),
                image: image.map(|img| VideoImage {
                    bytes_base64_encoded: img.base64.clone(),
                    mime_type: img.mime_type.clone(),
                }),
            }],
            parameters: VideoParameters {
                aspect_ratio: aspect_ratio.as_str().to_string(),
            },
        };

        progress("Starting video generation".to_string());
        let endpoint = format!("/models/{}:predictLongRunning", VIDEO_MODEL);
        let response = self.post(&endpoint, &request).await?;
        let mut operation: VideoOperation = response.json().await.map_err(StyloError::Api)?;

        let mut polls = 0u32;
        while !operation.done {
            polls += 1;
            progress(format!(
                "Rendering video, this can take a few minutes (check {})",
                polls
            ));
            tokio::time::sleep(VIDEO_POLL_INTERVAL).await;

            let response = self.get(&format!("/{}", operation.name)).await?;
            operation = response.json().await.map_err(StyloError::Api)?;
        }

        if let Some(error) = operation.error {
            return Err(StyloError::Other(error.message));
        }
        operation
            .video_uri()
            .map(|uri| uri.to_string())
            .ok_or(StyloError::EmptyResponse)
    }

    /// Issue a generateContent call expecting an image back.
    async fn request_image(
        &self,
        parts: Vec<Part>,
        aspect_ratio: AspectRatio,
    ) -> Result<ImageFile> {
        let config = GenerationConfig {
            image_config: Some(ImageConfig {
                aspect_ratio: aspect_ratio.as_str().to_string(),
            }),
        };
        let response = self
            .generate_content(IMAGE_MODEL, parts, Some(config))
            .await?;

        let inline = response.first_image().ok_or(StyloError::EmptyResponse)?;
        let name = format!(
            "creation.{}",
            crate::media::extension_for_mime(&inline.mime_type)
        );
        Ok(ImageFile::from_inline(
            inline.data.clone(),
            inline.mime_type.clone(),
            name,
        ))
    }

    async fn generate_content(
        &self,
        model: &str,
        parts: Vec<Part>,
        generation_config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config,
        };
        let endpoint = format!("/models/{}:generateContent", model);
        let response = self.post(&endpoint, &request).await?;
        let response: GenerateContentResponse = response.json().await.map_err(StyloError::Api)?;

        if let Some(feedback) = &response.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(StyloError::Blocked(reason.clone()));
            }
        }
        Ok(response)
    }
}

fn style_transfer_parts(prompt: &str, content: &ImageFile, style: &ImageFile) -> Vec<Part> {
    let mut parts = vec![
        Part::image(content),
        Part::image(style),
        Part::text("Redraw the first image in the artistic style of the second image."),
    ];
    let guidance = prompt.trim();
    if !guidance.is_empty() {
        parts.push(Part::text(guidance));
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> ImageFile {
        ImageFile::from_inline("QUJD".into(), "image/png".into(), name.into())
    }

    #[test]
    fn test_style_transfer_parts_without_guidance() {
        let parts = style_transfer_parts("   ", &image("content.png"), &image("style.png"));
        assert_eq!(parts.len(), 3);
        assert!(parts[0].inline_data.is_some());
        assert!(parts[1].inline_data.is_some());
        assert!(parts[2].text.is_some());
    }

    #[test]
    fn test_style_transfer_parts_appends_guidance() {
        let parts = style_transfer_parts("keep it moody", &image("content.png"), &image("style.png"));
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[3].text.as_deref(), Some("keep it moody"));
    }
}

use crate::{
    error::{Result, StudioError},
    models::{GeneratedImageRecord, GenerationOptions, ImageGenerationRequest, ProviderResponse},
    replicate::traits::ImageGenerator,
};
use async_trait::async_trait;
use reqwest::Client;

pub const GENERATE_IMAGE_PATH: &str = "/api/replicate/generate-image";

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    endpoint: String,
}

impl ImageClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GENERATE_IMAGE_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<GeneratedImageRecord> {
        let request = ImageGenerationRequest::new(prompt, options.clone());

        log::info!(
            "Generating image ({} steps, guidance {})",
            options.num_inference_steps,
            options.guidance_scale
        );
        log::debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| StudioError::Network(format!("Generation request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StudioError::Network(format!("Failed to read response: {}", e)))?;

        // The backend reports provider failures in the body, whatever the status.
        let parsed: ProviderResponse = serde_json::from_str(&body).map_err(|e| {
            StudioError::Generation(format!(
                "Invalid response from provider (status {}): {}",
                status, e
            ))
        })?;

        if let Some(error) = parsed.error {
            return Err(StudioError::Generation(error));
        }
        if !status.is_success() {
            return Err(StudioError::Generation(format!(
                "Provider returned status {}",
                status
            )));
        }

        let url = parsed
            .output
            .and_then(|output| output.into_iter().next())
            .ok_or_else(|| StudioError::Generation("No images generated".into()))?;

        log::info!("Image generated: {}", url);
        Ok(GeneratedImageRecord::new(url, prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::unreachable_url;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend_replying(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_IMAGE_PATH))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = ImageClient::new(Client::new(), "http://localhost:3000/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:3000/api/replicate/generate-image"
        );
    }

    #[tokio::test]
    async fn test_success_maps_first_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_IMAGE_PATH))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "prompt": "a red fox in snow",
                "numInferenceSteps": 50,
                "guidanceScale": 7.5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "output": ["http://x/img.png", "http://x/other.png"]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = ImageClient::new(Client::new(), &server.uri());

        let record = client
            .generate("a red fox in snow", &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(record.url, "http://x/img.png");
        assert_eq!(record.prompt, "a red fox in snow");
    }

    #[tokio::test]
    async fn test_error_payload_is_generation_error() {
        let server = backend_replying(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "rate limited" })),
        )
        .await;
        let client = ImageClient::new(Client::new(), &server.uri());

        let err = client
            .generate("cat", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Generation(ref msg) if msg == "rate limited"));
    }

    #[tokio::test]
    async fn test_error_payload_wins_over_status() {
        let server = backend_replying(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "model offline" })),
        )
        .await;
        let client = ImageClient::new(Client::new(), &server.uri());

        let err = client
            .generate("cat", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Generation(ref msg) if msg == "model offline"));
    }

    #[tokio::test]
    async fn test_empty_output_is_generation_error() {
        let server =
            backend_replying(ResponseTemplate::new(200).set_body_json(json!({ "output": [] })))
                .await;
        let client = ImageClient::new(Client::new(), &server.uri());

        let err = client
            .generate("cat", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Generation(_)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_generation_error() {
        let server =
            backend_replying(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
                .await;
        let client = ImageClient::new(Client::new(), &server.uri());

        let err = client
            .generate("cat", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Generation(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let client = ImageClient::new(Client::new(), &unreachable_url().await);

        let err = client
            .generate("cat", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Network(_)));
    }
}

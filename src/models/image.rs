use serde::{Deserialize, Serialize};

pub const MIN_INFERENCE_STEPS: u32 = 20;
pub const MAX_INFERENCE_STEPS: u32 = 100;
pub const DEFAULT_INFERENCE_STEPS: u32 = 50;

pub const MIN_GUIDANCE_SCALE: f32 = 1.0;
pub const MAX_GUIDANCE_SCALE: f32 = 20.0;
pub const GUIDANCE_SCALE_STEP: f32 = 0.5;
pub const DEFAULT_GUIDANCE_SCALE: f32 = 7.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub negative_prompt: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            num_inference_steps: DEFAULT_INFERENCE_STEPS,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            negative_prompt: None,
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Body of `POST /api/replicate/generate-image`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationRequest {
    pub prompt: String,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            prompt: prompt.into(),
            options,
        }
    }
}

/// Either `{ "output": [...] }` or `{ "error": "..." }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub output: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

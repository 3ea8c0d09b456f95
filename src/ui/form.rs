use crate::{
    error::{Result, StudioError},
    models::{
        GenerationOptions, GUIDANCE_SCALE_STEP, MAX_GUIDANCE_SCALE, MAX_INFERENCE_STEPS,
        MIN_GUIDANCE_SCALE, MIN_INFERENCE_STEPS,
    },
};
use colored::*;

/// Input form state. The numeric controls behave like range sliders: any
/// value set on them is clamped into range, so out-of-range parameters can
/// never be submitted.
#[derive(Debug, Clone, Default)]
pub struct GenerationForm {
    prompt: String,
    options: GenerationOptions,
}

impl GenerationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.set_steps(steps);
        self
    }

    pub fn with_guidance(mut self, guidance: f32) -> Self {
        self.set_guidance(guidance);
        self
    }

    pub fn with_negative_prompt(mut self, negative: impl Into<String>) -> Self {
        self.set_negative_prompt(negative);
        self
    }

    pub fn set_steps(&mut self, steps: u32) {
        self.options.num_inference_steps = steps.clamp(MIN_INFERENCE_STEPS, MAX_INFERENCE_STEPS);
    }

    pub fn set_guidance(&mut self, guidance: f32) {
        // An infinite value pins to the nearest end, like a slider; NaN has no position.
        let guidance = if guidance.is_nan() {
            MIN_GUIDANCE_SCALE
        } else {
            guidance
        };
        let snapped = (guidance / GUIDANCE_SCALE_STEP).round() * GUIDANCE_SCALE_STEP;
        self.options.guidance_scale = snapped.clamp(MIN_GUIDANCE_SCALE, MAX_GUIDANCE_SCALE);
    }

    pub fn set_negative_prompt(&mut self, negative: impl Into<String>) {
        let negative = negative.into();
        self.options.negative_prompt = if negative.trim().is_empty() {
            None
        } else {
            Some(negative)
        };
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn submit(&self) -> Result<(String, GenerationOptions)> {
        if self.prompt.trim().is_empty() {
            return Err(StudioError::Validation("Image description is required".into()));
        }
        Ok((self.prompt.clone(), self.options.clone()))
    }

    pub fn render(&self, is_loading: bool) -> String {
        let button = if is_loading {
            "⏳ Generating...".yellow().bold()
        } else {
            "Generate Image".blue().bold()
        };

        let mut lines = vec![
            format!("{} {}", "Image Description:".bold(), self.prompt),
            format!(
                "{} ({})",
                "Inference Steps".bold(),
                self.options.num_inference_steps
            ),
            format!("{} ({})", "Guidance Scale".bold(), self.options.guidance_scale),
        ];
        if let Some(negative) = &self.options.negative_prompt {
            lines.push(format!("{} {}", "Negative Prompt:".bold(), negative));
        }
        lines.push(format!("[ {} ]", button));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let form = GenerationForm::new();
        assert_eq!(form.options().num_inference_steps, 50);
        assert_eq!(form.options().guidance_scale, 7.5);
        assert!(form.options().negative_prompt.is_none());
    }

    #[test]
    fn test_steps_are_clamped() {
        assert_eq!(GenerationForm::new().with_steps(5).options().num_inference_steps, 20);
        assert_eq!(GenerationForm::new().with_steps(500).options().num_inference_steps, 100);
        assert_eq!(GenerationForm::new().with_steps(64).options().num_inference_steps, 64);
    }

    #[test]
    fn test_guidance_is_clamped_and_snapped() {
        assert_eq!(GenerationForm::new().with_guidance(0.1).options().guidance_scale, 1.0);
        assert_eq!(GenerationForm::new().with_guidance(42.0).options().guidance_scale, 20.0);
        assert_eq!(GenerationForm::new().with_guidance(7.3).options().guidance_scale, 7.5);
        assert_eq!(GenerationForm::new().with_guidance(f32::NAN).options().guidance_scale, 1.0);
        assert_eq!(
            GenerationForm::new().with_guidance(f32::INFINITY).options().guidance_scale,
            20.0
        );
        assert_eq!(
            GenerationForm::new().with_guidance(f32::NEG_INFINITY).options().guidance_scale,
            1.0
        );
    }

    #[test]
    fn test_blank_prompt_is_rejected() {
        let err = GenerationForm::new().with_prompt("   ").submit().unwrap_err();
        assert!(matches!(err, StudioError::Validation(_)));
    }

    #[test]
    fn test_submit_yields_prompt_and_options() {
        let (prompt, options) = GenerationForm::new()
            .with_prompt("a red fox in snow")
            .with_negative_prompt("")
            .submit()
            .unwrap();
        assert_eq!(prompt, "a red fox in snow");
        assert_eq!(options, GenerationOptions::default());
    }

    #[test]
    fn test_render_reflects_loading() {
        colored::control::set_override(false);
        let form = GenerationForm::new().with_prompt("cat").with_steps(30);
        assert!(form.render(false).contains("Generate Image"));
        assert!(form.render(true).contains("Generating..."));
        assert!(form.render(false).contains("Inference Steps (30)"));
        assert!(form.render(false).contains("Guidance Scale (7.5)"));
    }
}

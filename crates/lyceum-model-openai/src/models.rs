//! Known OpenAI model limits.

/// Context window and output reservation of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelLimits {
    pub context: u64,
    pub max_output: u64,
}

/// Limits for a model name, by family prefix.
pub fn limits(model: &str) -> ModelLimits {
    let (context, max_output) = if model.starts_with("gpt-5") {
        (400_000, 128_000)
    } else if model.starts_with("gpt-4.1") {
        (1_047_576, 32_768)
    } else {
        (128_000, 16_384)
    };
    ModelLimits {
        context,
        max_output,
    }
}

//! Known Gemini model limits.

/// Context window, output reservation and thinking support of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelLimits {
    pub context: u64,
    pub max_output: u64,
    pub thinking: bool,
}

/// (model prefix, context window, default max output tokens, thinking)
const MODELS: &[(&str, u64, u64, bool)] = &[
    ("gemini-2.5-pro", 1_048_576, 65_536, true),
    ("gemini-2.5-flash", 1_048_576, 65_536, true),
    ("gemini-2.0-flash", 1_048_576, 8_192, false),
    ("gemini-1.5-pro", 2_097_152, 8_192, false),
];

/// Limits for a model name, by family prefix.
pub fn limits(model: &str) -> ModelLimits {
    let (context, max_output, thinking) = MODELS
        .iter()
        .find(|(prefix, ..)| model.starts_with(prefix))
        .map(|&(_, context, output, thinking)| (context, output, thinking))
        .unwrap_or((1_048_576, 8_192, false));
    ModelLimits {
        context,
        max_output,
        thinking,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_25_family() {
        for model in ["gemini-2.5-pro", "gemini-2.5-flash", "gemini-2.5-flash-lite"] {
            let l = limits(model);
            assert_eq!(l.context - l.max_output, 1_048_576 - 65_536, "{}", model);
            assert!(l.thinking, "{}", model);
        }
    }

    #[test]
    fn test_older_models_do_not_think() {
        assert!(!limits("gemini-2.0-flash").thinking);
        assert_eq!(limits("gemini-1.5-pro").context, 2_097_152);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(
            limits("gemini-exp"),
            ModelLimits {
                context: 1_048_576,
                max_output: 8_192,
                thinking: false,
            }
        );
    }
}

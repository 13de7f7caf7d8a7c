//! Known Claude model limits.

/// (model prefix, context window, default max output tokens)
const MODELS: &[(&str, u64, u64)] = &[
    ("claude-opus-4", 200_000, 32_000),
    ("claude-sonnet-4", 200_000, 64_000),
    ("claude-3-7-sonnet", 200_000, 64_000),
    ("claude-3-5-sonnet", 200_000, 8_192),
    ("claude-3-5-haiku", 200_000, 8_192),
];

const FALLBACK_CONTEXT: u64 = 200_000;
const FALLBACK_MAX_OUTPUT: u64 = 8_192;

fn lookup(model: &str) -> Option<&'static (&'static str, u64, u64)> {
    MODELS.iter().find(|(prefix, _, _)| model.starts_with(prefix))
}

/// Context window in tokens.
pub fn context_window(model: &str) -> u64 {
    lookup(model).map(|m| m.1).unwrap_or(FALLBACK_CONTEXT)
}

/// Output tokens reserved when the configuration does not say otherwise.
pub fn default_max_output(model: &str) -> u64 {
    lookup(model).map(|m| m.2).unwrap_or(FALLBACK_MAX_OUTPUT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_models() {
        assert_eq!(context_window("claude-sonnet-4-20250514"), 200_000);
        assert_eq!(default_max_output("claude-opus-4-1-20250805"), 32_000);
    }

    #[test]
    fn test_unknown_model_falls_back() {
        assert_eq!(context_window("claude-next"), 200_000);
        assert_eq!(default_max_output("claude-next"), 8_192);
    }
}

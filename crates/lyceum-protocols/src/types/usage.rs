//! Token usage metrics reported by model adapters.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Token counts for one model call, or a sum over many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input: u64,
    #[serde(default)]
    pub output: u64,
    #[serde(default)]
    pub cached: u64,
    #[serde(default)]
    pub thinking: u64,
    #[serde(default)]
    pub total: u64,
}

impl TokenUsage {
    /// Usage with `total` derived from input and output.
    pub fn new(input: u64, output: u64) -> Self {
        Self {
            input,
            output,
            total: input + output,
            ..Default::default()
        }
    }

    pub fn with_cached(mut self, cached: u64) -> Self {
        self.cached = cached;
        self
    }

    pub fn with_thinking(mut self, thinking: u64) -> Self {
        self.thinking = thinking;
        self
    }
}

impl Add for TokenUsage {
    type Output = TokenUsage;

    fn add(mut self, rhs: TokenUsage) -> TokenUsage {
        self += rhs;
        self
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: TokenUsage) {
        self.input += rhs.input;
        self.output += rhs.output;
        self.cached += rhs.cached;
        self.thinking += rhs.thinking;
        self.total += rhs.total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_total() {
        let usage = TokenUsage::new(100, 20);
        assert_eq!(usage.total, 120);
        assert_eq!(usage.cached, 0);
    }

    #[test]
    fn test_sum() {
        let a = TokenUsage::new(10, 5).with_cached(3);
        let b = TokenUsage::new(1, 1).with_thinking(7);
        let sum = a + b;
        assert_eq!(sum.input, 11);
        assert_eq!(sum.output, 6);
        assert_eq!(sum.cached, 3);
        assert_eq!(sum.thinking, 7);
        assert_eq!(sum.total, 17);
    }

    #[test]
    fn test_deserialize_partial() {
        let usage: TokenUsage = serde_json::from_str(r#"{"input": 4}"#).unwrap();
        assert_eq!(usage.input, 4);
        assert_eq!(usage.total, 0);
    }
}

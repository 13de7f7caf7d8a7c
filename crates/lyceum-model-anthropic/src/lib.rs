//! Anthropic model adapter for Lyceum.

mod adapter;
mod api;
mod converter;
mod models;
mod parser;

pub use adapter::{AnthropicAdapter, DEFAULT_BASE_URL};
pub use models::{context_window, default_max_output};

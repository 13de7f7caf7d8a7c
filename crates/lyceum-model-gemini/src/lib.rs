//! Google Gemini model adapter for Lyceum.

mod adapter;
mod api;
mod converter;
mod models;
mod parser;

pub use adapter::{DEFAULT_BASE_URL, GeminiAdapter};
pub use models::{ModelLimits, limits};

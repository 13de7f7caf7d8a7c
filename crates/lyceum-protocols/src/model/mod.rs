//! Model adapter protocol definitions.
//!
//! An adapter hides one LLM vendor's wire format behind the turn/block model.

mod request;
mod traits;
mod validate;

pub use request::*;
pub use traits::*;
pub use validate::*;

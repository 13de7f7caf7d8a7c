//! Error types for the Lyceum protocol layer.

mod log;
mod model;
mod runtime;
mod tool;

pub use log::*;
pub use model::*;
pub use runtime::*;
pub use tool::*;

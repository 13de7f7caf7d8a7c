//! Tool server protocol definitions.
//!
//! Tool servers are the only way agents act on the world. Each server owns a
//! namespace; the runtime addresses its tools as `<serverId>-<toolName>`.

mod definition;
mod traits;

pub use definition::*;
pub use traits::*;

//! Config-file chains and the precedence stack that merges them.

mod error;
mod file;
mod iter;
mod snapshot;
mod stack;

pub use error::ConfigError;
pub use file::tokenize;
pub use iter::{directional, Directional};
pub use snapshot::{Origin, Snapshot};
pub use stack::{PrecedenceStack, SetFailure, Unrolled};

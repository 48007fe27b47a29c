pub mod config;
pub mod context;
mod error;

pub use config::{ConfigError, Origin, PrecedenceStack, SetFailure, Snapshot, Unrolled};
pub use context::{Flag, FlagError, FlagSet, FlagSetBuilder, FlagValue};
pub use error::Error;

use crate::config::ConfigError;
use crate::context::FlagError;
use thiserror::Error;

/// Top-level error type for the flagchain library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Flag(#[from] FlagError),
}

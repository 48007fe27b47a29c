use std::path::PathBuf;
use thiserror::Error;

use crate::context::FlagError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("flag set has not been parsed")]
    FlagsNotParsed,

    #[error("chain option is not a registered flag: -{0}")]
    UnknownChainOption(String),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError { path: PathBuf, source: FlagError },

    #[error("circular reference detected: {0}")]
    CircularReference(PathBuf),

    #[error("failed to process config file '{path}': {source}")]
    Chain {
        path: PathBuf,
        source: Box<ConfigError>,
    },

    #[error("failed to render stack: {0}")]
    Render(#[from] toml::ser::Error),
}

impl ConfigError {
    /// Follows [`ConfigError::Chain`] wrappers down to the error that
    /// stopped the load.
    pub fn innermost(&self) -> &ConfigError {
        let mut current = self;
        while let ConfigError::Chain { source, .. } = current {
            current = source.as_ref();
        }
        current
    }
}

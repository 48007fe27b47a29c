//! Config-file chain loading.
//!
//! A config file holds a command line: its tokens are parsed by the same
//! flag set as the process arguments. One option (the chain option) names
//! the next file to load.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::snapshot::{Origin, Snapshot};
use super::stack::PrecedenceStack;
use super::ConfigError;
use crate::context::FlagSet;

/// Splits config file contents into command-line tokens.
///
/// Line breaks count as spaces and every single space separates tokens, so
/// a run of separators yields empty tokens. An empty token is a positional
/// argument: it ends flag parsing, or serves as the value of a preceding
/// non-boolean flag.
pub fn tokenize(contents: &str) -> Vec<String> {
    contents
        .replace("\r\n", " ")
        .replace('\n', " ")
        .trim()
        .split(' ')
        .map(str::to_owned)
        .collect()
}

impl PrecedenceStack {
    /// Loads `path` and every file it links to through `chain_option`,
    /// pushing one snapshot per file.
    ///
    /// Each file's snapshot holds only the options that file itself set.
    /// Loading stops when a file leaves `chain_option` unset or empty.
    ///
    /// # Errors
    ///
    /// Fails if a file can't be read or parsed, or if a file links to a path
    /// already on the stack. Snapshots pushed before the failure stay on the
    /// stack. Errors from deeper files are wrapped in [`ConfigError::Chain`].
    pub fn process_config_file(
        &mut self,
        path: impl AsRef<Path>,
        chain_option: &str,
        flags: &mut FlagSet,
    ) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if flags.lookup(chain_option).is_none() {
            return Err(ConfigError::UnknownChainOption(chain_option.to_owned()));
        }
        if self.contains_file(path) {
            return Err(ConfigError::CircularReference(path.to_path_buf()));
        }

        debug!(path = %path.display(), "processing config file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let tokens = tokenize(&contents);
        let assigned = flags
            .parse(&tokens)
            .map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        if !flags.args().is_empty() {
            debug!(path = %path.display(), ignored = ?flags.args(), "trailing arguments ignored");
        }

        let snapshot = Snapshot::capture(Origin::File(path.to_path_buf()), flags, |name| {
            assigned.contains(name)
        });
        for (name, value) in snapshot.options() {
            debug!(path = %path.display(), %name, %value, "recorded option");
        }

        let next = snapshot
            .get(chain_option)
            .filter(|next| !next.is_empty())
            .map(PathBuf::from);
        self.push(snapshot);

        let Some(next) = next else {
            return Ok(());
        };
        if self.contains_file(&next) {
            return Err(ConfigError::CircularReference(next));
        }

        self.process_config_file(&next, chain_option, flags)
            .map_err(|source| ConfigError::Chain {
                path: next,
                source: Box::new(source),
            })
    }
}

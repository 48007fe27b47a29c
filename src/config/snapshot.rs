use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::FlagSet;

/// Where a snapshot's options came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// The command line of the running process.
    Process,
    File(PathBuf),
}

impl Origin {
    /// The file path, or `None` for the process command line.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Origin::Process => None,
            Origin::File(path) => Some(path),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Process => f.write_str("process"),
            Origin::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The options one source set explicitly, encoded as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    origin: Origin,
    options: BTreeMap<String, String>,
}

impl Snapshot {
    /// Creates a snapshot from already string-encoded options.
    pub fn new(origin: Origin, options: BTreeMap<String, String>) -> Self {
        Self { origin, options }
    }

    /// Captures the explicitly-set options of `flags` for which `keep`
    /// returns true.
    pub fn capture(origin: Origin, flags: &FlagSet, mut keep: impl FnMut(&str) -> bool) -> Self {
        let mut options = BTreeMap::new();
        flags.visit(|flag| {
            if keep(flag.name()) {
                options.insert(flag.name().to_owned(), flag.value().to_string());
            }
        });
        Self { origin, options }
    }

    /// Where the options were set.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The explicitly-set options, by name.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// The value of `name`, if this source set it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    /// Returns `true` if the source set no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

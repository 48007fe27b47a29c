use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::iter::directional;
use super::snapshot::{Origin, Snapshot};
use super::ConfigError;
use crate::context::{FlagError, FlagSet};

/// The ordered chain of option sources for one resolution run.
///
/// Index 0 always holds the process command line; every later entry is a
/// config file, in the order the chain discovered it. No two entries share
/// a file path.
///
/// ## Example
///
/// ```no_run
/// use flagchain::{FlagSet, PrecedenceStack};
///
/// let mut flags = FlagSet::builder("app")
///     .string("c", "", "Read flags from `FILE`")
///     .string("n", "", "Specify your `NAME`")
///     .build()?;
/// flags.parse(std::env::args().skip(1))?;
///
/// let stack = PrecedenceStack::load(&mut flags, "c")?;
/// let unrolled = stack.unroll(&mut flags, false);
/// println!("name = {:?}", unrolled.get("n"));
/// # Ok::<(), flagchain::Error>(())
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct PrecedenceStack {
    #[serde(rename = "source")]
    snapshots: Vec<Snapshot>,
}

impl PrecedenceStack {
    /// Creates a stack holding the options explicitly set on the command
    /// line that `flags` has already parsed.
    ///
    /// Returns [`ConfigError::FlagsNotParsed`] if `flags` was never parsed.
    pub fn new(flags: &FlagSet) -> Result<Self, ConfigError> {
        if !flags.parsed() {
            return Err(ConfigError::FlagsNotParsed);
        }
        Ok(Self {
            snapshots: vec![Snapshot::capture(Origin::Process, flags, |_| true)],
        })
    }

    /// Creates the stack and follows the config-file chain starting from the
    /// value of `chain_option` on the command line, if it is set.
    pub fn load(flags: &mut FlagSet, chain_option: &str) -> Result<Self, ConfigError> {
        let mut stack = Self::new(flags)?;
        let start = stack
            .process()
            .get(chain_option)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        if let Some(start) = start {
            stack.process_config_file(start, chain_option, flags)?;
        }
        Ok(stack)
    }

    /// Appends a file snapshot after every source discovered so far.
    ///
    /// A file that set no options still takes a slot. Process snapshots and
    /// files already on the stack are ignored; returns whether the snapshot
    /// was appended.
    pub(crate) fn push(&mut self, snapshot: Snapshot) -> bool {
        let accepted = match snapshot.origin().path() {
            Some(path) => !self.contains_file(path),
            None => false,
        };
        if accepted {
            self.snapshots.push(snapshot);
        } else {
            debug!(origin = %snapshot.origin(), "snapshot not pushed");
        }
        accepted
    }

    /// The command-line snapshot at the bottom of the stack.
    pub fn process(&self) -> &Snapshot {
        &self.snapshots[0]
    }

    /// Every snapshot, process first, then files in discovery order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Number of sources on the stack, the process included.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always `false`: a stack holds at least the process snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns `true` if a snapshot on the stack was loaded from `path`.
    pub fn contains_file(&self, path: &Path) -> bool {
        self.snapshots
            .iter()
            .any(|snapshot| snapshot.origin().path() == Some(path))
    }

    /// Merges the stack into one value per option without touching any
    /// flag set.
    ///
    /// With `late_set`, the last-discovered source wins and each earlier
    /// source only fills in options still missing. Without it, the process
    /// snapshot wins and later sources fill gaps in discovery order.
    pub fn effective(&self, late_set: bool) -> BTreeMap<String, String> {
        let split = if late_set {
            self.snapshots.split_last()
        } else {
            self.snapshots.split_first()
        };
        let Some((result, rest)) = split else {
            return BTreeMap::new();
        };

        let mut merged = result.options().clone();
        for snapshot in directional(rest, late_set) {
            for (name, value) in snapshot.options() {
                merged
                    .entry(name.clone())
                    .or_insert_with(|| value.clone());
            }
        }
        merged
    }

    /// Applies the merged options to `flags`.
    ///
    /// Options that `flags` rejects are logged and reported in the result;
    /// the remaining options are still applied.
    pub fn unroll(&self, flags: &mut FlagSet, late_set: bool) -> Unrolled {
        let effective = self.effective(late_set);
        let mut failures = Vec::new();

        for (name, value) in &effective {
            debug!(%name, %value, late_set, "unroll: set");
            if let Err(error) = flags.set(name, value) {
                warn!(%name, %value, %error, "failed to set flag");
                failures.push(SetFailure {
                    name: name.clone(),
                    value: value.clone(),
                    error,
                });
            }
        }

        Unrolled {
            effective,
            failures,
        }
    }

    /// Renders the stack as a TOML document with one `[[source]]` table per
    /// snapshot.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// An option the flag set refused during [`PrecedenceStack::unroll`].
#[derive(Debug, Clone, PartialEq)]
pub struct SetFailure {
    pub name: String,
    pub value: String,
    pub error: FlagError,
}

/// Outcome of [`PrecedenceStack::unroll`].
#[derive(Debug, Clone, PartialEq)]
pub struct Unrolled {
    effective: BTreeMap<String, String>,
    failures: Vec<SetFailure>,
}

impl Unrolled {
    /// The merged value of every option.
    pub fn effective(&self) -> &BTreeMap<String, String> {
        &self.effective
    }

    /// The merged value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.effective.get(name).map(String::as_str)
    }

    /// Options the flag set refused, in name order.
    pub fn failures(&self) -> &[SetFailure] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> FlagSet {
        FlagSet::builder("test")
            .string("c", "", "Read flags from `FILE`")
            .string("n", "", "Specify your `NAME`")
            .int("a", 0, "Specify your `AGE`")
            .bool("m", false, "Mark as a member")
            .build()
            .unwrap()
    }

    fn file(path: &str, options: &[(&str, &str)]) -> Snapshot {
        Snapshot::new(
            Origin::File(PathBuf::from(path)),
            options
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// process {n=fake, c=test.cfg}, test.cfg {a=30, c=parent.cfg},
    /// parent.cfg {m=true}
    fn scenario() -> (FlagSet, PrecedenceStack) {
        let mut flags = flags();
        flags.parse(["-n", "fake", "-c", "test.cfg"]).unwrap();
        let mut stack = PrecedenceStack::new(&flags).unwrap();
        assert!(stack.push(file("test.cfg", &[("a", "30"), ("c", "parent.cfg")])));
        assert!(stack.push(file("parent.cfg", &[("m", "true")])));
        (flags, stack)
    }

    #[test]
    fn test_new_requires_parsed_flags() {
        let result = PrecedenceStack::new(&flags());
        assert!(matches!(result, Err(ConfigError::FlagsNotParsed)));
    }

    #[test]
    fn test_new_captures_process_snapshot() {
        let (_, stack) = scenario();
        assert_eq!(stack.len(), 3);
        assert!(!stack.is_empty());
        assert_eq!(stack.process().origin(), &Origin::Process);
        assert_eq!(stack.process().get("n"), Some("fake"));
        assert_eq!(stack.process().get("a"), None);
    }

    #[test]
    fn test_push_keeps_origins_unique() {
        let mut flags = flags();
        flags.parse(Vec::<&str>::new()).unwrap();
        let mut stack = PrecedenceStack::new(&flags).unwrap();

        assert!(stack.push(file("e.cfg", &[])));
        assert!(!stack.push(Snapshot::new(Origin::Process, BTreeMap::new())));
        assert!(!stack.push(file("e.cfg", &[("a", "1")])));

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.snapshots()[1].origin(), &Origin::File(PathBuf::from("e.cfg")));
        assert!(stack.snapshots()[1].is_empty());
    }

    #[test]
    fn test_contains_file() {
        let (_, stack) = scenario();
        assert!(stack.contains_file(Path::new("parent.cfg")));
        assert!(!stack.contains_file(Path::new("other.cfg")));
    }

    #[test]
    fn test_early_set_process_wins() {
        let (_, stack) = scenario();
        let merged = stack.effective(false);

        assert_eq!(merged["n"], "fake");
        assert_eq!(merged["c"], "test.cfg");
        assert_eq!(merged["a"], "30");
        assert_eq!(merged["m"], "true");
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_late_set_last_file_wins() {
        let (_, mut stack) = scenario();
        assert!(stack.push(file("child.cfg", &[("a", "99")])));
        let merged = stack.effective(true);

        assert_eq!(merged["a"], "99");
        assert_eq!(merged["m"], "true");
        // test.cfg is closer to the end than the process snapshot.
        assert_eq!(merged["c"], "parent.cfg");
        assert_eq!(merged["n"], "fake");
    }

    #[test]
    fn test_merge_is_complete() {
        let (_, stack) = scenario();
        for late_set in [false, true] {
            let merged = stack.effective(late_set);
            for snapshot in stack.snapshots() {
                for name in snapshot.options().keys() {
                    assert!(merged.contains_key(name), "{name} missing");
                }
            }
        }
    }

    #[test]
    fn test_unroll_applies_to_flags() {
        let (mut flags, stack) = scenario();
        let unrolled = stack.unroll(&mut flags, true);

        assert!(unrolled.failures().is_empty());
        assert_eq!(unrolled.get("c"), Some("parent.cfg"));
        assert_eq!(flags.string("c"), Some("parent.cfg"));
        assert_eq!(flags.int("a"), Some(30));
        assert_eq!(flags.bool("m"), Some(true));
        assert!(flags.is_set("m"));
    }

    #[test]
    fn test_unroll_is_repeatable() {
        let (mut flags, stack) = scenario();
        let first = stack.unroll(&mut flags, false);
        let second = stack.unroll(&mut flags, false);
        assert_eq!(first, second);
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn test_unroll_reports_failures_and_continues() {
        let (_, stack) = scenario();
        let mut other = FlagSet::builder("other")
            .bool("a", false, "")
            .string("n", "", "")
            .build()
            .unwrap();

        let unrolled = stack.unroll(&mut other, false);
        let failed: Vec<_> = unrolled.failures().iter().map(|f| f.name.as_str()).collect();

        assert_eq!(failed, ["a", "c", "m"]);
        assert!(matches!(
            unrolled.failures()[0].error,
            FlagError::InvalidValue { .. }
        ));
        assert_eq!(other.string("n"), Some("fake"));
    }

    #[test]
    fn test_to_toml() {
        let (_, stack) = scenario();
        let rendered = stack.to_toml().unwrap();
        let table: toml::Table = toml::from_str(&rendered).unwrap();

        let sources = table["source"].as_array().unwrap();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0]["origin"].as_str(), Some("process"));
        assert_eq!(sources[0]["options"]["n"].as_str(), Some("fake"));
        assert_eq!(sources[1]["origin"]["file"].as_str(), Some("test.cfg"));
        assert_eq!(sources[2]["options"]["m"].as_str(), Some("true"));
    }
}

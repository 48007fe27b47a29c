//! The live option context mutated while resolving a configuration chain.

mod error;
pub mod token;
mod value;

use std::collections::{BTreeMap, BTreeSet};

pub use error::FlagError;
pub use token::{classify, Designator, FlagToken, Token};
pub use value::FlagValue;

/// A registered option together with its default and current value.
#[derive(Debug, Clone)]
pub struct Flag {
    name: String,
    usage: String,
    default: FlagValue,
    value: FlagValue,
}

impl Flag {
    /// The name the option is matched by, without dashes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The usage text given at registration.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The current value, which is the default until the option is set.
    pub fn value(&self) -> &FlagValue {
        &self.value
    }

    /// The value registered as the default.
    pub fn default_value(&self) -> &FlagValue {
        &self.default
    }

    fn assign(&mut self, raw: &str) -> Result<(), FlagError> {
        self.value = self
            .default
            .parse_like(raw)
            .map_err(|reason| FlagError::InvalidValue {
                name: self.name.clone(),
                value: raw.to_owned(),
                reason,
            })?;
        Ok(())
    }
}

/// A set of typed options that can be parsed from token sequences and
/// updated by name.
///
/// One `FlagSet` is constructed per resolution run and passed by `&mut` to
/// everything that reads or writes option state.
///
/// ## Example
///
/// ```
/// use flagchain::FlagSet;
///
/// let mut flags = FlagSet::builder("demo")
///     .string("c", "", "Read flags from `FILE`")
///     .int("a", 0, "Specify your `AGE`")
///     .build()?;
///
/// let set = flags.parse(["-a", "30"])?;
/// assert!(set.contains("a"));
/// assert_eq!(flags.int("a"), Some(30));
/// # Ok::<(), flagchain::FlagError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, Flag>,
    explicit: BTreeSet<String>,
    parsed: bool,
    args: Vec<String>,
}

impl FlagSet {
    /// Creates a new builder for registering options.
    pub fn builder(name: impl Into<String>) -> FlagSetBuilder {
        FlagSetBuilder {
            name: name.into(),
            flags: Vec::new(),
        }
    }

    /// The program name shown in [`usage`](Self::usage).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once [`parse`](Self::parse) has been called.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Arguments left over after the last parse stopped.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Parses a token sequence, assigning every option it names.
    ///
    /// Parsing stops at the first positional argument or after a `--`
    /// terminator; the remainder is available through [`args`](Self::args).
    /// Boolean options never consume the following token.
    ///
    /// Returns the names of the options assigned by this call. Options set
    /// before a failing token keep their new values.
    pub fn parse<I, S>(&mut self, args: I) -> Result<BTreeSet<String>, FlagError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parsed = true;
        let mut args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let mut assigned = BTreeSet::new();
        let mut index = 0;

        while let Some(arg) = args.get(index) {
            let flag = match classify(arg)? {
                Token::Positional(_) => break,
                Token::Terminator => {
                    index += 1;
                    break;
                }
                Token::Flag(flag) => flag,
            };
            index += 1;

            let Some(target) = self.flags.get_mut(flag.name) else {
                if flag.name == "help" || flag.name == "h" {
                    return Err(FlagError::Help);
                }
                return Err(FlagError::Undefined(flag.name.to_owned()));
            };

            let raw = if target.value.is_bool() {
                flag.value.unwrap_or("true")
            } else if let Some(value) = flag.value {
                value
            } else if let Some(next) = args.get(index) {
                index += 1;
                next.as_str()
            } else {
                return Err(FlagError::MissingArgument(flag.name.to_owned()));
            };

            target.assign(raw)?;
            self.explicit.insert(target.name.clone());
            assigned.insert(target.name.clone());
        }

        self.args = args.split_off(index);
        Ok(assigned)
    }

    /// Sets the named option from its string encoding and marks it as
    /// explicitly set.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), FlagError> {
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| FlagError::NoSuchFlag(name.to_owned()))?;
        flag.assign(value)?;
        self.explicit.insert(flag.name.clone());
        Ok(())
    }

    /// Visits the options that have been explicitly set, in name order.
    pub fn visit(&self, mut visitor: impl FnMut(&Flag)) {
        for name in &self.explicit {
            if let Some(flag) = self.flags.get(name) {
                visitor(flag);
            }
        }
    }

    /// Visits every registered option, in name order.
    pub fn visit_all(&self, mut visitor: impl FnMut(&Flag)) {
        self.flags.values().for_each(|flag| visitor(flag));
    }

    /// Returns the registered option called `name`.
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// Returns `true` if `name` was set by a parse or by [`set`](Self::set).
    pub fn is_set(&self, name: &str) -> bool {
        self.explicit.contains(name)
    }

    /// The current value of `name`, or `None` if it isn't registered.
    pub fn value(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name).map(Flag::value)
    }

    /// The current value of a string option.
    ///
    /// The typed getters return `None` when the option is unknown or of
    /// another type.
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.value(name)? {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The current value of an integer option.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.value(name)? {
            FlagValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The current value of an unsigned option.
    pub fn uint(&self, name: &str) -> Option<u64> {
        match self.value(name)? {
            FlagValue::Uint(u) => Some(*u),
            _ => None,
        }
    }

    /// The current value of a float option.
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.value(name)? {
            FlagValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The current value of a boolean option.
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.value(name)? {
            FlagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Renders a usage message listing every option with its default.
    ///
    /// A word wrapped in backquotes inside an option's usage text becomes
    /// the argument placeholder, so `"Read flags from `FILE`"` renders as
    /// `-c FILE`.
    pub fn usage(&self) -> String {
        let mut out = format!("Usage of {}:\n", self.name);
        for flag in self.flags.values() {
            let (placeholder, usage) = unquote_usage(flag);
            let mut line = format!("  -{}", flag.name);
            if !placeholder.is_empty() {
                line.push(' ');
                line.push_str(&placeholder);
            }
            if line.len() <= 4 {
                line.push('\t');
            } else {
                line.push_str("\n    \t");
            }
            line.push_str(&usage.replace('\n', "\n    \t"));
            if !flag.default.is_zero() {
                let default = match &flag.default {
                    FlagValue::String(s) => format!(" (default {s:?})"),
                    other => format!(" (default {other})"),
                };
                line.push_str(&default);
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

fn unquote_usage(flag: &Flag) -> (String, String) {
    if let Some((before, rest)) = flag.usage.split_once('`') {
        if let Some((name, after)) = rest.split_once('`') {
            return (name.to_owned(), format!("{before}{name}{after}"));
        }
    }
    (flag.default.type_name().to_owned(), flag.usage.clone())
}

/// Builder for registering the options of a [`FlagSet`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct FlagSetBuilder {
    name: String,
    flags: Vec<Flag>,
}

impl FlagSetBuilder {
    fn register(mut self, name: String, default: FlagValue, usage: String) -> Self {
        self.flags.push(Flag {
            name,
            usage,
            value: default.clone(),
            default,
        });
        self
    }

    /// Registers a string option.
    pub fn string(
        self,
        name: impl Into<String>,
        default: impl Into<String>,
        usage: impl Into<String>,
    ) -> Self {
        self.register(name.into(), FlagValue::String(default.into()), usage.into())
    }

    /// Registers an `i64` option.
    pub fn int(self, name: impl Into<String>, default: i64, usage: impl Into<String>) -> Self {
        self.register(name.into(), FlagValue::Int(default), usage.into())
    }

    /// Registers a `u64` option.
    pub fn uint(self, name: impl Into<String>, default: u64, usage: impl Into<String>) -> Self {
        self.register(name.into(), FlagValue::Uint(default), usage.into())
    }

    /// Registers an `f64` option.
    pub fn float(self, name: impl Into<String>, default: f64, usage: impl Into<String>) -> Self {
        self.register(name.into(), FlagValue::Float(default), usage.into())
    }

    /// Registers a boolean option. It never consumes the following token.
    pub fn bool(self, name: impl Into<String>, default: bool, usage: impl Into<String>) -> Self {
        self.register(name.into(), FlagValue::Bool(default), usage.into())
    }

    /// Builds the `FlagSet`.
    ///
    /// Returns an error if a name is registered twice, is empty, starts with
    /// `-` or contains `=`.
    pub fn build(self) -> Result<FlagSet, FlagError> {
        let mut flags = BTreeMap::new();
        for flag in self.flags {
            if flag.name.is_empty() || flag.name.starts_with('-') || flag.name.contains('=') {
                return Err(FlagError::InvalidName(flag.name));
            }
            if flags.contains_key(&flag.name) {
                return Err(FlagError::Redefined(flag.name));
            }
            flags.insert(flag.name.clone(), flag);
        }
        Ok(FlagSet {
            name: self.name,
            flags,
            explicit: BTreeSet::new(),
            parsed: false,
            args: Vec::new(),
        })
    }
}
